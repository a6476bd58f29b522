/// Mean Earth radius in kilometers (WGS84 approximation).
pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Position {
            latitude,
            longitude,
        }
    }
}

/// Great-circle distance in kilometers between two positions, using the
/// haversine formula over a mean-radius sphere.
#[must_use]
pub fn haversine_km(a: &Position, b: &Position) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let half_chord = (delta_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (delta_lon / 2.0).sin().powi(2);
    let angular_distance = 2.0 * half_chord.sqrt().asin();

    EARTH_RADIUS_KM * angular_distance
}
