use std::time::Duration;

use guia::catalog::Coordinates;
use guia::controller::{ControllerOptions, FilterController, FixedClock};
use guia::engine::SearchEngine;
use guia::filter::SortMode;
use guia::geo::{FixedLocation, GeolocationAcquirer, LocationProvider, NoLocation, PositionOptions};
use guia::test_utils::fixtures::{monday_noon, sample_catalog};
use guia::test_utils::logging::capture_logs;
use guia::GeolocationError;

const ZOCALO: Coordinates = Coordinates::new(-99.0966, 18.9858);

fn controller() -> FilterController {
    FilterController::new(
        sample_catalog(),
        SearchEngine::default(),
        ControllerOptions::default().with_clock(FixedClock(monday_noon())),
    )
    .unwrap()
}

struct Denied;

impl LocationProvider for Denied {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Err(GeolocationError::PermissionDenied)
    }
}

struct Stuck;

impl LocationProvider for Stuck {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        std::future::pending().await
    }
}

#[tokio::test(start_paused = true)]
async fn successful_fix_enables_distances() {
    let controller = controller();
    controller.set_sort_mode(SortMode::Distance);
    let acquirer = GeolocationAcquirer::new(FixedLocation(ZOCALO), PositionOptions::default());

    assert_eq!(acquirer.request(&controller).await, Ok(ZOCALO));
    assert_eq!(controller.criteria().user_location, Some(ZOCALO));

    let results = controller.settled().await;
    let first = &results.items[0];
    assert!(first.distance_km.is_some_and(|km| km < 0.1));
}

#[tokio::test(start_paused = true)]
async fn denied_permission_leaves_location_unset() {
    let logs = capture_logs();
    let controller = controller();
    let acquirer = GeolocationAcquirer::new(Denied, PositionOptions::default());

    let err = acquirer.request(&controller).await.unwrap_err();
    assert_eq!(err, GeolocationError::PermissionDenied);
    assert!(controller.criteria().user_location.is_none());
    assert!(!controller.is_dirty());
    assert!(logs.has_warnings());
}

#[tokio::test(start_paused = true)]
async fn stuck_provider_times_out() {
    let controller = controller();
    let options = PositionOptions {
        timeout: Duration::from_secs(2),
        ..PositionOptions::default()
    };
    let acquirer = GeolocationAcquirer::new(Stuck, options);

    let err = acquirer.request(&controller).await.unwrap_err();
    assert_eq!(err, GeolocationError::Timeout(Duration::from_secs(2)));
    assert!(controller.results().items.iter().all(|item| item.distance_km.is_none()));
}

#[tokio::test]
async fn missing_service_is_unavailable() {
    let acquirer = GeolocationAcquirer::new(NoLocation, PositionOptions::default());
    assert!(matches!(
        acquirer.locate().await,
        Err(GeolocationError::PositionUnavailable(_))
    ));
}
