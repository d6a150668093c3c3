use guia::catalog::{Catalog, Category, Coordinates, Locale};
use guia::engine::SearchEngine;
use guia::filter::{Feature, FilterCriteria, PriceRange, SortMode};
use guia::test_utils::fixtures::{ListingBuilder, monday_noon, sample_catalog};

fn run(catalog: &Catalog, criteria: &FilterCriteria) -> Vec<String> {
    SearchEngine::default()
        .run(catalog, criteria, monday_noon())
        .ids()
        .map(str::to_string)
        .collect()
}

#[test]
fn spanish_query_finds_english_only_listing() {
    let criteria = FilterCriteria {
        search_query: "piramide".to_string(),
        locale: Locale::Es,
        ..FilterCriteria::default()
    };
    let ids = run(&sample_catalog(), &criteria);
    assert!(ids.contains(&"pyramid-es".to_string()), "{ids:?}");
    assert!(ids.contains(&"pyramid-hike".to_string()), "{ids:?}");
}

#[test]
fn accented_query_matches_unaccented_text() {
    let criteria = FilterCriteria {
        search_query: "  PIRÁMIDE ".to_string(),
        ..FilterCriteria::default()
    };
    let plain = FilterCriteria {
        search_query: "piramide".to_string(),
        ..FilterCriteria::default()
    };
    assert_eq!(run(&sample_catalog(), &criteria), run(&sample_catalog(), &plain));
}

#[test]
fn price_range_is_inclusive() {
    let listings = [1u8, 2, 3, 4, 4]
        .into_iter()
        .enumerate()
        .map(|(i, level)| {
            ListingBuilder::new(&format!("l{i}"), Category::Restaurant)
                .price(level)
                .rating(4.0)
                .build()
        })
        .collect();
    let catalog = Catalog::new(listings).unwrap();
    let criteria = FilterCriteria {
        price_range: PriceRange::new(3, 4),
        ..FilterCriteria::default()
    };

    let mut ids = run(&catalog, &criteria);
    ids.sort();
    assert_eq!(ids, ["l2", "l3", "l4"]);
}

#[test]
fn featured_beats_higher_rating() {
    let catalog = Catalog::new(vec![
        ListingBuilder::new("b", Category::Hotel).rating(5.0).price(2).build(),
        ListingBuilder::new("a", Category::Hotel)
            .rating(4.9)
            .price(2)
            .featured(true)
            .build(),
    ])
    .unwrap();
    let criteria = FilterCriteria {
        sort_mode: SortMode::Featured,
        ..FilterCriteria::default()
    };
    assert_eq!(run(&catalog, &criteria), ["a", "b"]);
}

#[test]
fn features_use_or_semantics() {
    let catalog = Catalog::new(vec![
        ListingBuilder::new("wifi-only", Category::Restaurant)
            .wifi(true)
            .price(2)
            .rating(4.0)
            .build(),
        ListingBuilder::new("neither", Category::Restaurant)
            .price(2)
            .rating(4.0)
            .build(),
    ])
    .unwrap();
    let mut criteria = FilterCriteria::default();
    criteria.features.extend([Feature::Wifi, Feature::Parking]);

    assert_eq!(run(&catalog, &criteria), ["wifi-only"]);
}

#[test]
fn distance_sort_without_location_keeps_mode_order() {
    let catalog = sample_catalog();
    let by_mode = FilterCriteria {
        sort_mode: SortMode::Rating,
        ..FilterCriteria::default()
    };
    let with_toggle = FilterCriteria {
        distance_sort_enabled: true,
        ..by_mode.clone()
    };
    assert_eq!(run(&catalog, &with_toggle), run(&catalog, &by_mode));
}

#[test]
fn distance_sort_orders_nearest_first_and_unlocated_last() {
    let catalog = sample_catalog();
    let criteria = FilterCriteria {
        distance_sort_enabled: true,
        user_location: Some(Coordinates::new(-99.0966, 18.9858)),
        ..FilterCriteria::default()
    };
    let results = SearchEngine::default().run(&catalog, &criteria, monday_noon());

    let distances: Vec<_> = results.items.iter().map(|item| item.distance_km).collect();
    let located = distances.iter().take_while(|d| d.is_some()).count();
    assert!(distances[located..].iter().all(Option::is_none));
    let located: Vec<f64> = distances[..located].iter().flatten().copied().collect();
    assert!(located.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(results.ids().next(), Some("mezcaleria"));
}

#[test]
fn open_now_uses_evaluation_time() {
    let catalog = sample_catalog();
    let criteria = FilterCriteria {
        open_now: true,
        ..FilterCriteria::default()
    };
    let ids = run(&catalog, &criteria);
    assert!(ids.contains(&"colorines".to_string()));
    // Closed on Mondays.
    assert!(!ids.contains(&"mercado".to_string()));
    // Opens at 20:00.
    assert!(!ids.contains(&"mezcaleria".to_string()));
}

#[test]
fn runs_are_deterministic() {
    let catalog = sample_catalog();
    let criteria = FilterCriteria {
        search_query: "tepozteco".to_string(),
        sort_mode: SortMode::Name,
        ..FilterCriteria::default()
    };
    let engine = SearchEngine::default();
    assert_eq!(
        engine.run(&catalog, &criteria, monday_noon()),
        engine.run(&catalog, &criteria, monday_noon())
    );
}
