//! Geographic helpers: distances and user position lookup.

pub mod distance;
pub mod locate;

pub use distance::{EARTH_RADIUS_KM, distance_from, haversine_km};
pub use locate::{FixedLocation, GeolocationAcquirer, LocationProvider, NoLocation, PositionOptions};
