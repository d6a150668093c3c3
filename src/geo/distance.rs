//! Great-circle distance.

use crate::catalog::Coordinates;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers, or `None` if either point is invalid.
#[must_use]
pub fn haversine_km(from: Coordinates, to: Coordinates) -> Option<f64> {
    if !from.is_valid() || !to.is_valid() {
        return None;
    }

    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let dlat = (to.lat - from.lat).to_radians();
    let dlon = (to.lon - from.lon).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair past 1 for antipodal points.
    let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();
    Some(EARTH_RADIUS_KM * c)
}

/// Distance from an optional user position to an optional listing position.
#[must_use]
pub fn distance_from(user: Option<Coordinates>, listing: Option<Coordinates>) -> Option<f64> {
    haversine_km(user?, listing?)
}
