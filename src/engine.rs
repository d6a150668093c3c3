//! The pure search pipeline.
//!
//! `run` is a function of (catalog, criteria snapshot, evaluation time):
//! normalize → expand → score (non-empty query only) → facets → distances →
//! sort. Identical inputs always produce identical output.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

use crate::catalog::{Catalog, Category, Listing};
use crate::config::SearchConfig;
use crate::filter::{FilterCriteria, passes};
use crate::geo::distance_from;
use crate::rank::sort_results;
use crate::search::{ListingText, ScoreWeights, TermExpander, normalize, score};

/// One entry of a result list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedListing {
    pub listing: Arc<Listing>,
    /// Kilometers from the user; set only when a user location is known and
    /// the listing has valid coordinates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    /// Relevance score; set only when a non-empty query was active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<u32>,
}

/// Ordered outcome of one pipeline run.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SearchResults {
    pub items: Vec<RankedListing>,
    /// Expanded query terms; empty when no query was active.
    pub terms: Vec<String>,
    pub catalog_size: usize,
    /// Result count per category.
    pub category_counts: BTreeMap<Category, usize>,
}

impl SearchResults {
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.listing.id.as_str())
    }
}

/// Query expansion and scoring configuration applied to every run.
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    expander: TermExpander,
    weights: ScoreWeights,
}

impl SearchEngine {
    #[must_use]
    pub const fn new(expander: TermExpander, weights: ScoreWeights) -> Self {
        Self { expander, weights }
    }

    #[must_use]
    pub fn from_config(config: &SearchConfig) -> Self {
        let expander = config
            .extra_terms
            .iter()
            .fold(TermExpander::new(), |expander, (locale, terms)| {
                expander.with_extra_terms(*locale, terms)
            });
        Self::new(expander, config.weights)
    }

    /// Expanded term set for a raw query.
    #[must_use]
    pub fn terms_for(&self, criteria: &FilterCriteria) -> Vec<String> {
        self.expander
            .expand(&normalize(&criteria.search_query), criteria.locale)
    }

    /// Run the full pipeline over `catalog`.
    #[must_use]
    pub fn run(
        &self,
        catalog: &Catalog,
        criteria: &FilterCriteria,
        now: NaiveDateTime,
    ) -> SearchResults {
        let query = normalize(&criteria.search_query);
        let terms = self.expander.expand(&query, criteria.locale);

        let matched: Vec<(Arc<Listing>, Option<u32>)> = if query.is_empty() {
            catalog
                .listings()
                .iter()
                .map(|listing| (Arc::clone(listing), None))
                .collect()
        } else {
            catalog
                .listings()
                .iter()
                .filter_map(|listing| {
                    let points = score(&ListingText::new(listing), &terms, &self.weights);
                    (points > 0).then(|| (Arc::clone(listing), Some(points)))
                })
                .collect()
        };
        let matched_count = matched.len();

        let mut items: Vec<RankedListing> = matched
            .into_iter()
            .filter(|(listing, _)| passes(listing, criteria, now))
            .map(|(listing, match_score)| RankedListing {
                distance_km: distance_from(criteria.user_location, listing.coordinates),
                listing,
                match_score,
            })
            .collect();

        sort_results(&mut items, criteria);

        let mut category_counts = BTreeMap::new();
        for item in &items {
            *category_counts.entry(item.listing.category).or_insert(0) += 1;
        }

        debug!(
            query = %criteria.search_query,
            terms = terms.len(),
            matched = matched_count,
            results = items.len(),
            "search pipeline finished"
        );

        SearchResults {
            items,
            terms,
            catalog_size: catalog.len(),
            category_counts,
        }
    }
}
