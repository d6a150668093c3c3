//! Listing catalog: data model and loading.
//!
//! The catalog is loaded once per session through a [`CatalogProvider`] and is
//! immutable afterwards. Listings are shared behind `Arc` so published results
//! can reference them without copying.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{GuiaError, Result};

pub mod types;

pub use types::{Category, Coordinates, DayHours, Listing, Locale, Localized, OperatingHours};

/// Source of the full listing collection.
pub trait CatalogProvider {
    /// Returns every listing. Invoked once at session start.
    fn load(&self) -> Result<Catalog>;
}

/// Immutable, validated collection of listings in catalog order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    listings: Arc<[Arc<Listing>]>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate or empty ids.
    pub fn new(listings: Vec<Listing>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(listings.len());
        for listing in &listings {
            if listing.id.trim().is_empty() {
                return Err(GuiaError::InvalidCatalog("listing with empty id".to_string()));
            }
            if !seen.insert(listing.id.as_str()) {
                return Err(GuiaError::InvalidCatalog(format!(
                    "duplicate listing id {}",
                    listing.id
                )));
            }
        }
        warn_on_suspicious_values(&listings);

        Ok(Self {
            listings: listings.into_iter().map(Arc::new).collect(),
        })
    }

    /// Parse a JSON array of listings.
    pub fn from_json(raw: &str) -> Result<Self> {
        let listings: Vec<Listing> = serde_json::from_str(raw)?;
        Self::new(listings)
    }

    #[must_use]
    pub fn listings(&self) -> &[Arc<Listing>] {
        &self.listings
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Arc<Listing>> {
        self.listings.iter().find(|listing| listing.id == id)
    }
}

/// Listings read from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl CatalogProvider for JsonFileCatalog {
    fn load(&self) -> Result<Catalog> {
        let raw = std::fs::read_to_string(&self.path).map_err(|err| {
            GuiaError::InvalidCatalog(format!("read catalog {}: {err}", self.path.display()))
        })?;
        let catalog = Catalog::from_json(&raw)?;
        info!(
            path = %self.path.display(),
            listings = catalog.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }
}

/// In-memory listings, mostly for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    listings: Vec<Listing>,
}

impl StaticCatalog {
    #[must_use]
    pub const fn new(listings: Vec<Listing>) -> Self {
        Self { listings }
    }
}

impl CatalogProvider for StaticCatalog {
    fn load(&self) -> Result<Catalog> {
        Catalog::new(self.listings.clone())
    }
}

// Out-of-range values are kept; the range facets exclude them.
fn warn_on_suspicious_values(listings: &[Listing]) {
    for listing in listings {
        if let Some(rating) = listing.rating.filter(|r| !(0.0..=5.0).contains(r)) {
            warn!(id = %listing.id, rating, "rating outside 0..=5");
        }
        if let Some(price) = listing.price_level.filter(|p| !(1..=4).contains(p)) {
            warn!(id = %listing.id, price, "price level outside 1..=4");
        }
        if let Some(coords) = listing.coordinates.filter(|c| !c.is_valid()) {
            warn!(id = %listing.id, lon = coords.lon, lat = coords.lat, "invalid coordinates");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SearchEngine;
    use crate::filter::FilterCriteria;
    use crate::test_utils::fixtures::{ListingBuilder, monday_noon, sample_listings};

    #[test]
    fn rejects_duplicate_ids() {
        let listings = vec![
            ListingBuilder::new("a", Category::Hotel).build(),
            ListingBuilder::new("a", Category::Restaurant).build(),
        ];
        let err = Catalog::new(listings).unwrap_err();
        assert!(matches!(err, GuiaError::InvalidCatalog(msg) if msg.contains("duplicate")));
    }

    #[test]
    fn rejects_empty_ids() {
        let listings = vec![ListingBuilder::new("  ", Category::Hotel).build()];
        assert!(Catalog::new(listings).is_err());
    }

    #[test]
    fn keeps_catalog_order() {
        let catalog = Catalog::new(sample_listings()).unwrap();
        let ids: Vec<_> = catalog.listings().iter().map(|l| l.id.as_str()).collect();
        let expected: Vec<_> = sample_listings().into_iter().map(|l| l.id).collect();
        assert_eq!(ids, expected);
        assert!(catalog.get("pyramid-es").is_some());
    }

    #[test]
    fn loads_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listings.json");
        std::fs::write(&path, serde_json::to_string(&sample_listings()).unwrap()).unwrap();

        let catalog = JsonFileCatalog::new(&path).load().unwrap();
        assert_eq!(catalog.len(), sample_listings().len());
    }

    #[test]
    fn warns_about_out_of_range_values() {
        let logs = crate::test_utils::logging::capture_logs();
        let catalog = Catalog::new(vec![
            ListingBuilder::new("ok", Category::Hotel).rating(4.0).price(2).build(),
            ListingBuilder::new("bad", Category::Hotel)
                .rating(7.5)
                .price(9)
                .at(-250.0, 18.98)
                .build(),
        ])
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(logs.count_at(tracing::Level::WARN), 3);
        assert!(logs.contains("invalid coordinates"));
    }

    #[test]
    fn one_malformed_listing_does_not_reject_the_catalog() {
        let raw = r#"[
            {"id": "good", "category": "restaurant", "rating": 4.5, "price_level": 2},
            {"id": "negative", "category": "restaurant", "rating": 4.0, "price_level": -1},
            {"id": "fraction", "category": "hotel", "rating": "n/a", "price_level": 2.5}
        ]"#;
        let catalog = Catalog::from_json(raw).unwrap();
        assert_eq!(catalog.len(), 3);

        let negative = catalog.get("negative").unwrap();
        assert_eq!(negative.price_level, None);
        let fraction = catalog.get("fraction").unwrap();
        assert_eq!((fraction.rating, fraction.price_level), (None, None));

        // The range facets drop the malformed listings.
        let criteria = FilterCriteria::default();
        let results = SearchEngine::default().run(&catalog, &criteria, monday_noon());
        assert_eq!(results.ids().collect::<Vec<_>>(), ["good"]);
    }

    #[test]
    fn static_catalog_validates_on_load() {
        let catalog = StaticCatalog::new(sample_listings()).load().unwrap();
        assert_eq!(catalog.len(), sample_listings().len());

        let duplicated = StaticCatalog::new(vec![
            ListingBuilder::new("dup", Category::Hotel).build(),
            ListingBuilder::new("dup", Category::Hotel).build(),
        ]);
        assert!(matches!(duplicated.load(), Err(GuiaError::InvalidCatalog(_))));
    }

    #[test]
    fn missing_file_is_invalid_catalog() {
        let err = JsonFileCatalog::new("/definitely/not/here.json")
            .load()
            .unwrap_err();
        assert!(matches!(err, GuiaError::InvalidCatalog(_)));
    }
}
