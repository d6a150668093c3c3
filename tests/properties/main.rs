//! Property tests for normalization, expansion, filtering and ranking.

use proptest::prelude::*;

use guia::catalog::{Catalog, Category, Coordinates, Locale};
use guia::engine::SearchEngine;
use guia::filter::{FilterCriteria, PriceRange, RatingRange, SortMode};
use guia::geo::haversine_km;
use guia::search::{TermExpander, normalize};
use guia::test_utils::fixtures::{ListingBuilder, monday_noon, sample_catalog};

fn locale() -> impl Strategy<Value = Locale> {
    prop_oneof![Just(Locale::Es), Just(Locale::En)]
}

fn sort_mode() -> impl Strategy<Value = SortMode> {
    prop_oneof![
        Just(SortMode::Featured),
        Just(SortMode::Rating),
        Just(SortMode::Name),
        Just(SortMode::Price),
        Just(SortMode::Distance),
    ]
}

fn catalog() -> impl Strategy<Value = Catalog> {
    prop::collection::vec(
        (
            "[a-zA-Záéíóúñ ]{0,12}",
            prop::option::of(0u8..6),
            prop::option::of(-1.0f64..6.0),
            any::<bool>(),
            prop::option::of((-100.0f64..-98.0, 18.0f64..20.0)),
        ),
        0..24,
    )
    .prop_map(|rows| {
        let listings = rows
            .into_iter()
            .enumerate()
            .map(|(i, (name, price, rating, featured, coords))| {
                let category = Category::ALL[i % Category::ALL.len()];
                let mut builder = ListingBuilder::new(&format!("l{i}"), category)
                    .name_es(&name)
                    .featured(featured);
                if let Some(price) = price {
                    builder = builder.price(price);
                }
                if let Some(rating) = rating {
                    builder = builder.rating(rating);
                }
                if let Some((lon, lat)) = coords {
                    builder = builder.at(lon, lat);
                }
                builder.build()
            })
            .collect();
        Catalog::new(listings).unwrap()
    })
}

proptest! {
    #[test]
    fn normalize_is_idempotent(text in "\\PC{0,40}") {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn expansion_starts_with_query(query in "[a-z ]{0,20}", locale in locale()) {
        let normalized = normalize(&query);
        let terms = TermExpander::new().expand(&normalized, locale);
        prop_assert_eq!(terms.first(), Some(&normalized));
        let mut unique = terms.clone();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(unique.len(), terms.len());
    }

    #[test]
    fn results_are_subset_of_catalog_and_pass_ranges(
        catalog in catalog(),
        lo in 1u8..=4,
        hi in 1u8..=4,
        rating_lo in 0.0f64..=5.0,
        sort in sort_mode(),
    ) {
        let criteria = FilterCriteria {
            price_range: PriceRange::new(lo, hi),
            rating_range: RatingRange::new(rating_lo, 5.0),
            sort_mode: sort,
            ..FilterCriteria::default()
        };
        let results = SearchEngine::default().run(&catalog, &criteria, monday_noon());

        prop_assert!(results.len() <= catalog.len());
        for item in &results.items {
            prop_assert!(catalog.get(&item.listing.id).is_some());
            let level = item.listing.price_level.unwrap();
            prop_assert!(criteria.price_range.contains(level));
            let rating = item.listing.rating.unwrap();
            prop_assert!((rating_lo..=5.0).contains(&rating));
        }
    }

    #[test]
    fn pipeline_is_deterministic(catalog in catalog(), sort in sort_mode(), query in "[a-z]{0,6}") {
        let criteria = FilterCriteria {
            search_query: query,
            sort_mode: sort,
            user_location: Some(Coordinates::new(-99.0966, 18.9858)),
            ..FilterCriteria::default()
        };
        let engine = SearchEngine::default();
        prop_assert_eq!(
            engine.run(&catalog, &criteria, monday_noon()),
            engine.run(&catalog, &criteria, monday_noon())
        );
    }

    #[test]
    fn distance_sort_is_monotonic(
        catalog in catalog(),
        lon in -100.0f64..-98.0,
        lat in 18.0f64..20.0,
    ) {
        let criteria = FilterCriteria {
            distance_sort_enabled: true,
            user_location: Some(Coordinates::new(lon, lat)),
            ..FilterCriteria::default()
        };
        let results = SearchEngine::default().run(&catalog, &criteria, monday_noon());
        let mut seen_unlocated = false;
        let mut last = 0.0f64;
        for item in &results.items {
            match item.distance_km {
                Some(km) => {
                    prop_assert!(!seen_unlocated);
                    prop_assert!(km >= last);
                    last = km;
                }
                None => seen_unlocated = true,
            }
        }
    }

    #[test]
    fn haversine_is_symmetric_and_bounded(
        a in (-180.0f64..=180.0, -90.0f64..=90.0),
        b in (-180.0f64..=180.0, -90.0f64..=90.0),
    ) {
        let a = Coordinates::new(a.0, a.1);
        let b = Coordinates::new(b.0, b.1);
        let ab = haversine_km(a, b).unwrap();
        let ba = haversine_km(b, a).unwrap();
        prop_assert!((ab - ba).abs() < 1e-6);
        prop_assert!((0.0..=20_016.0).contains(&ab));
    }
}

#[test]
fn sample_catalog_survives_every_sort_mode() {
    let catalog = sample_catalog();
    let modes = [
        SortMode::Featured,
        SortMode::Rating,
        SortMode::Name,
        SortMode::Price,
        SortMode::Distance,
    ];
    for sort_mode in modes {
        let criteria = FilterCriteria {
            sort_mode,
            ..FilterCriteria::default()
        };
        let results = SearchEngine::default().run(&catalog, &criteria, monday_noon());
        assert_eq!(results.len(), catalog.len(), "{sort_mode}");
    }
}
