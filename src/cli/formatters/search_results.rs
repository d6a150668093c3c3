//! Search results formatter
//!
//! Renders a published result list either as a colored listing for humans or
//! as a JSON document with localized fields resolved for the active locale.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::catalog::Locale;
use crate::cli::colors::GuiaStyles;
use crate::engine::{RankedListing, SearchResults};
use crate::filter::FilterCriteria;

/// A result list plus the criteria that produced it, truncated for display.
pub struct SearchReport<'a> {
    pub results: &'a SearchResults,
    pub criteria: &'a FilterCriteria,
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResultJson {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_level: Option<u8>,
    pub featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponseJson {
    pub query: String,
    pub locale: Locale,
    pub count: usize,
    pub shown: usize,
    pub catalog_size: usize,
    pub active_filters: usize,
    pub terms: Vec<String>,
    pub category_counts: BTreeMap<String, usize>,
    pub results: Vec<SearchResultJson>,
}

impl SearchReport<'_> {
    fn shown(&self) -> &[RankedListing] {
        let end = self.limit.min(self.results.items.len());
        &self.results.items[..end]
    }

    #[must_use]
    pub fn to_json(&self) -> SearchResponseJson {
        let locale = self.criteria.locale;
        let results: Vec<_> = self
            .shown()
            .iter()
            .map(|item| {
                let listing = &item.listing;
                SearchResultJson {
                    id: listing.id.clone(),
                    name: listing.display_name(locale).to_string(),
                    category: listing.category.id().to_string(),
                    subcategory: listing.subcategory.clone(),
                    rating: listing.rating,
                    price_level: listing.price_level,
                    featured: listing.featured,
                    distance_km: item.distance_km,
                    match_score: item.match_score,
                }
            })
            .collect();

        SearchResponseJson {
            query: self.criteria.search_query.clone(),
            locale,
            count: self.results.len(),
            shown: results.len(),
            catalog_size: self.results.catalog_size,
            active_filters: self.criteria.active_filter_count(),
            terms: self.results.terms.clone(),
            category_counts: self
                .results
                .category_counts
                .iter()
                .map(|(category, count)| (category.id().to_string(), *count))
                .collect(),
            results,
        }
    }

    #[must_use]
    pub fn format_human(&self) -> String {
        let locale = self.criteria.locale;
        debug!(target: "search", results = self.results.len(), "rendering results");

        if self.results.is_empty() {
            let mut out = GuiaStyles::warning(empty_message(locale)).to_string();
            if self.criteria.active_filter_count() > 0 {
                out.push('\n');
                out.push_str(clear_filters_hint(locale));
            }
            return out;
        }

        let mut out = GuiaStyles::muted(summary_line(self, locale)).to_string();
        out.push_str("\n\n");

        for (index, item) in self.shown().iter().enumerate() {
            out.push_str(&format_item(index + 1, item, locale));
            out.push('\n');
        }
        out
    }
}

fn format_item(position: usize, item: &RankedListing, locale: Locale) -> String {
    let listing = &item.listing;
    let mut line = format!(
        "{position:>3}. {} {}",
        GuiaStyles::title(listing.display_name(locale)),
        GuiaStyles::category(listing.category, listing.category.label(locale)),
    );
    if let Some(subcategory) = &listing.subcategory {
        line.push_str(&format!(" / {subcategory}"));
    }
    if let Some(rating) = listing.rating {
        line.push_str(&format!("  {}", GuiaStyles::rating(rating)));
    }
    if let Some(level) = listing.price_level {
        line.push_str(&format!("  {}", GuiaStyles::price(level)));
    }
    if let Some(km) = item.distance_km {
        line.push_str(&format!("  {}", GuiaStyles::muted(format_distance(km))));
    }
    if listing.featured {
        line.push_str(&format!("  {}", GuiaStyles::featured("★")));
    }
    line
}

/// Meters below one kilometer, one decimal above.
#[must_use]
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{:.0} m", km * 1000.0)
    } else {
        format!("{km:.1} km")
    }
}

fn summary_line(report: &SearchReport<'_>, locale: Locale) -> String {
    let shown = report.shown().len();
    let total = report.results.len();
    match locale {
        Locale::Es => format!(
            "{total} de {} lugares (mostrando {shown})",
            report.results.catalog_size
        ),
        Locale::En => format!(
            "{total} of {} places (showing {shown})",
            report.results.catalog_size
        ),
    }
}

const fn empty_message(locale: Locale) -> &'static str {
    match locale {
        Locale::Es => "No se encontraron lugares",
        Locale::En => "No places found",
    }
}

const fn clear_filters_hint(locale: Locale) -> &'static str {
    match locale {
        Locale::Es => "Prueba quitando algunos filtros",
        Locale::En => "Try removing some filters",
    }
}
