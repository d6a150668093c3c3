//! Best-effort acquisition of the user's position.
//!
//! A lookup is bounded by a timeout and may reuse a recent fix. Failures are
//! reported to the caller and logged; they never touch the filter criteria.

use std::future::Future;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::catalog::Coordinates;
use crate::config::GeolocationConfig;
use crate::controller::FilterController;
use crate::error::GeolocationError;

/// Device location source (browser API, OS service, fixed position, ...).
pub trait LocationProvider: Send + Sync {
    fn current_position(
        &self,
    ) -> impl Future<Output = Result<Coordinates, GeolocationError>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub timeout: Duration,
    /// Oldest cached fix that is still acceptable.
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            maximum_age: Duration::from_secs(60),
        }
    }
}

impl From<&GeolocationConfig> for PositionOptions {
    fn from(config: &GeolocationConfig) -> Self {
        Self {
            timeout: Duration::from_millis(config.timeout_ms),
            maximum_age: Duration::from_millis(config.maximum_age_ms),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CachedFix {
    coordinates: Coordinates,
    acquired_at: Instant,
}

/// Resolves the user position and feeds it into a [`FilterController`].
pub struct GeolocationAcquirer<P> {
    provider: P,
    options: PositionOptions,
    last_fix: Mutex<Option<CachedFix>>,
}

impl<P: LocationProvider> GeolocationAcquirer<P> {
    pub fn new(provider: P, options: PositionOptions) -> Self {
        Self {
            provider,
            options,
            last_fix: Mutex::new(None),
        }
    }

    /// Resolve the current position without touching any controller.
    pub async fn locate(&self) -> Result<Coordinates, GeolocationError> {
        if let Some(fix) = self.fresh_fix() {
            debug!(lon = fix.lon, lat = fix.lat, "reusing cached position");
            return Ok(fix);
        }

        let timeout = self.options.timeout;
        let coordinates = tokio::time::timeout(timeout, self.provider.current_position())
            .await
            .map_err(|_| GeolocationError::Timeout(timeout))??;

        if !coordinates.is_valid() {
            return Err(GeolocationError::PositionUnavailable(format!(
                "provider returned invalid coordinates ({}, {})",
                coordinates.lon, coordinates.lat
            )));
        }

        *self.last_fix.lock() = Some(CachedFix {
            coordinates,
            acquired_at: Instant::now(),
        });
        Ok(coordinates)
    }

    /// Look up the position and hand it to `controller` on success.
    ///
    /// On failure the controller is left untouched; distance sorting stays a
    /// no-op until a later request succeeds.
    pub async fn request(
        &self,
        controller: &FilterController,
    ) -> Result<Coordinates, GeolocationError> {
        match self.locate().await {
            Ok(coordinates) => {
                controller.set_user_location(Some(coordinates));
                Ok(coordinates)
            }
            Err(err) => {
                warn!(error = %err, "geolocation unavailable, continuing without user location");
                Err(err)
            }
        }
    }

    fn fresh_fix(&self) -> Option<Coordinates> {
        let cached = (*self.last_fix.lock())?;
        (cached.acquired_at.elapsed() <= self.options.maximum_age).then_some(cached.coordinates)
    }
}

/// A provider that always reports the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinates);

impl LocationProvider for FixedLocation {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Ok(self.0)
    }
}

/// A provider for environments without any location service.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

impl LocationProvider for NoLocation {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Err(GeolocationError::PositionUnavailable(
            "no location service configured".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct CountingProvider {
        calls: Arc<AtomicUsize>,
        delay: Duration,
        result: Result<Coordinates, GeolocationError>,
    }

    impl LocationProvider for CountingProvider {
        async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.result.clone()
        }
    }

    fn provider(
        delay: Duration,
        result: Result<Coordinates, GeolocationError>,
    ) -> (CountingProvider, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            CountingProvider {
                calls: Arc::clone(&calls),
                delay,
                result,
            },
            calls,
        )
    }

    const HERE: Coordinates = Coordinates::new(-99.0966, 18.9858);

    #[tokio::test(start_paused = true)]
    async fn times_out_after_configured_duration() {
        let (slow, _) = provider(Duration::from_secs(30), Ok(HERE));
        let acquirer = GeolocationAcquirer::new(slow, PositionOptions::default());
        let err = acquirer.locate().await.unwrap_err();
        assert_eq!(err, GeolocationError::Timeout(Duration::from_secs(10)));
    }

    #[tokio::test(start_paused = true)]
    async fn reuses_fix_younger_than_maximum_age() {
        let (fast, calls) = provider(Duration::from_millis(50), Ok(HERE));
        let acquirer = GeolocationAcquirer::new(fast, PositionOptions::default());

        assert_eq!(acquirer.locate().await.unwrap(), HERE);
        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(acquirer.locate().await.unwrap(), HERE);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(31)).await;
        assert_eq!(acquirer.locate().await.unwrap(), HERE);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn rejects_invalid_coordinates() {
        let acquirer = GeolocationAcquirer::new(
            FixedLocation(Coordinates::new(500.0, 0.0)),
            PositionOptions::default(),
        );
        assert!(matches!(
            acquirer.locate().await,
            Err(GeolocationError::PositionUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn propagates_provider_errors() {
        let (denied, _) = provider(Duration::ZERO, Err(GeolocationError::PermissionDenied));
        let acquirer = GeolocationAcquirer::new(denied, PositionOptions::default());
        assert_eq!(acquirer.locate().await, Err(GeolocationError::PermissionDenied));

        let acquirer = GeolocationAcquirer::new(NoLocation, PositionOptions::default());
        assert!(acquirer.locate().await.is_err());
    }
}
