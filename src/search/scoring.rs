//! Field-weighted relevance scoring.

use serde::{Deserialize, Serialize};

use crate::catalog::{Listing, Locale};

use super::normalize::normalize;

/// Per-field weights applied once per (term, field) match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub name: u32,
    pub description: u32,
    pub tags: u32,
    pub address: u32,
    /// Applied when a term only matches the combined text of the listing.
    pub fallback: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            name: 10,
            description: 5,
            tags: 3,
            address: 2,
            fallback: 1,
        }
    }
}

/// Normalized searchable text of one listing.
///
/// Each bilingual field is the join of both locale variants, so an English
/// name still matches while browsing in Spanish.
#[derive(Debug, Clone)]
pub struct ListingText {
    name: String,
    description: String,
    tags: String,
    address: String,
    combined: String,
}

impl ListingText {
    #[must_use]
    pub fn new(listing: &Listing) -> Self {
        let name = normalize(&listing.name.joined());
        let description = normalize(&listing.description.joined());
        let tags = normalize(&format!(
            "{} {}",
            listing.tags.joined(),
            listing.amenities.joined()
        ));
        let address = normalize(&listing.address.joined());

        let mut combined = vec![
            name.clone(),
            description.clone(),
            tags.clone(),
            address.clone(),
            normalize(listing.category.label(Locale::Es)),
            normalize(listing.category.label(Locale::En)),
        ];
        if let Some(subcategory) = &listing.subcategory {
            combined.push(normalize(subcategory));
        }

        Self {
            name,
            description,
            tags,
            address,
            combined: combined.join(" "),
        }
    }
}

/// Score `text` against normalized `terms`. Zero means no match.
#[must_use]
pub fn score(text: &ListingText, terms: &[String], weights: &ScoreWeights) -> u32 {
    terms
        .iter()
        .filter(|term| !term.is_empty())
        .map(|term| score_term(text, term, weights))
        .sum()
}

fn score_term(text: &ListingText, term: &str, weights: &ScoreWeights) -> u32 {
    let fields = [
        (&text.name, weights.name),
        (&text.description, weights.description),
        (&text.tags, weights.tags),
        (&text.address, weights.address),
    ];

    let field_score: u32 = fields
        .iter()
        .filter(|(field, _)| field.contains(term))
        .map(|(_, weight)| *weight)
        .sum();

    if field_score > 0 {
        field_score
    } else if text.combined.contains(term) {
        weights.fallback
    } else {
        0
    }
}
