use std::time::Duration;

use guia::catalog::Category;
use guia::config::Config;
use guia::controller::{ControllerOptions, FilterController, FixedClock};
use guia::engine::SearchEngine;
use guia::filter::{CategoryFilter, SortMode};
use guia::test_utils::fixtures::{monday_noon, sample_catalog};

fn controller() -> FilterController {
    FilterController::new(
        sample_catalog(),
        SearchEngine::default(),
        ControllerOptions::default().with_clock(FixedClock(monday_noon())),
    )
    .unwrap()
}

#[tokio::test(start_paused = true)]
async fn five_rapid_queries_recompute_once() {
    let controller = controller();
    let mut updates = controller.subscribe();
    let before = controller.recompute_count();

    for query in ["m", "me", "mez", "mezc", "mezcal"] {
        controller.set_search_query(query);
        tokio::time::sleep(Duration::from_millis(60)).await;
    }
    assert!(!updates.has_changed().unwrap());

    updates.changed().await.unwrap();
    let published = updates.borrow_and_update().clone();
    assert_eq!(controller.recompute_count(), before + 1);
    assert_eq!(published.terms.first().map(String::as_str), Some("mezcal"));
    assert_eq!(published.ids().collect::<Vec<_>>(), ["mezcaleria"]);
}

#[tokio::test(start_paused = true)]
async fn results_stay_stale_until_debounce_fires() {
    let controller = controller();
    let initial = controller.results();

    controller.set_category(CategoryFilter::Only(Category::Restaurant));
    assert!(controller.is_dirty());
    assert_eq!(controller.results(), initial);

    let settled = controller.settled().await;
    assert!(!controller.is_dirty());
    assert!(settled.items.iter().all(|item| item.listing.category == Category::Restaurant));
    assert_eq!(controller.active_filter_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn configured_debounce_is_honored() {
    let config = Config::from_toml("[controller]\ndebounce_ms = 50\n").unwrap();
    let options = ControllerOptions::from_config(&config).with_clock(FixedClock(monday_noon()));
    let controller =
        FilterController::new(sample_catalog(), SearchEngine::default(), options).unwrap();
    let before = controller.recompute_count();

    controller.set_sort_mode(SortMode::Price);
    tokio::time::sleep(Duration::from_millis(51)).await;
    assert_eq!(controller.recompute_count(), before + 1);
}

#[tokio::test(start_paused = true)]
async fn dropping_controller_cancels_pending_run() {
    let controller = controller();
    let mut updates = controller.subscribe();
    controller.set_search_query("posada");
    drop(controller);

    tokio::time::sleep(Duration::from_secs(1)).await;
    // Sender is gone, so the receiver observes closure instead of a new value.
    assert!(updates.changed().await.is_err());
}

#[tokio::test(start_paused = true)]
async fn clones_share_state() {
    let controller = controller();
    let handle = controller.clone();
    handle.set_open_now(true);
    assert!(controller.criteria().open_now);

    let results = controller.settled().await;
    assert!(results.ids().any(|id| id == "colorines"));
    assert!(!results.ids().any(|id| id == "mercado"));
}
