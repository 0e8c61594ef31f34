//! Qibla bearing and great-circle distance to the Kaaba.

use serde::Serialize;

use crate::coordinates::Coordinates;
use crate::solar::{datan2, dcos, dsin, normalize_360};

pub const KAABA_LATITUDE: f64 = 21.4225;
pub const KAABA_LONGITUDE: f64 = 39.8262;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Qibla {
    /// Degrees clockwise from true north, in [0, 360).
    pub bearing: f64,
    pub distance_km: f64,
}

impl Qibla {
    pub fn from_lat_lon(latitude: f64, longitude: f64) -> Self {
        Self {
            bearing: qibla_bearing(latitude, longitude),
            distance_km: distance_km(latitude, longitude),
        }
    }
}

impl From<&Coordinates> for Qibla {
    fn from(c: &Coordinates) -> Self {
        Self::from_lat_lon(c.latitude(), c.longitude())
    }
}

fn at_kaaba(latitude: f64, longitude: f64) -> bool {
    latitude == KAABA_LATITUDE && longitude == KAABA_LONGITUDE
}

/// Initial great-circle bearing towards the Kaaba. An observer standing on
/// the Kaaba gets 0.
pub fn qibla_bearing(latitude: f64, longitude: f64) -> f64 {
    if at_kaaba(latitude, longitude) {
        return 0.0;
    }

    let d_lon = KAABA_LONGITUDE - longitude;
    let y = dsin(d_lon) * dcos(KAABA_LATITUDE);
    let x = dcos(latitude) * dsin(KAABA_LATITUDE)
        - dsin(latitude) * dcos(KAABA_LATITUDE) * dcos(d_lon);

    normalize_360(datan2(y, x))
}

/// Haversine distance to the Kaaba in kilometers.
pub fn distance_km(latitude: f64, longitude: f64) -> f64 {
    if at_kaaba(latitude, longitude) {
        return 0.0;
    }

    let half_d_lat = (KAABA_LATITUDE - latitude) / 2.0;
    let half_d_lon = (KAABA_LONGITUDE - longitude) / 2.0;
    let a = dsin(half_d_lat).powi(2)
        + dcos(latitude) * dcos(KAABA_LATITUDE) * dsin(half_d_lon).powi(2);

    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

pub fn qibla_direction(coords: &Coordinates) -> f64 {
    qibla_bearing(coords.latitude(), coords.longitude())
}

pub fn distance_to_kaaba_km(coords: &Coordinates) -> f64 {
    distance_km(coords.latitude(), coords.longitude())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Tz;

    #[test]
    fn tashkent() {
        let c = Coordinates::new(41.37, 69.26, 460.0, Tz::Asia__Tashkent).unwrap();
        assert!((qibla_direction(&c) - 240.22).abs() < 0.01);
        assert!((distance_to_kaaba_km(&c) - 3536.7).abs() < 1.0);
    }

    #[test]
    fn new_york_faces_north_east() {
        let q = Qibla::from_lat_lon(40.7128, -74.006);
        assert!((q.bearing - 58.48).abs() < 0.01);
        assert!((q.distance_km - 10306.3).abs() < 1.0);
    }

    #[test]
    fn jakarta_faces_west_north_west() {
        assert!((qibla_bearing(-6.2, 106.8) - 295.16).abs() < 0.01);
    }

    #[test]
    fn at_the_kaaba() {
        let q = Qibla::from_lat_lon(KAABA_LATITUDE, KAABA_LONGITUDE);
        assert_eq!(q.bearing, 0.0);
        assert_eq!(q.distance_km, 0.0);
    }

    #[test]
    fn bearing_range() {
        for lat in [-89.0, -45.0, 0.0, 21.0, 60.0, 89.0] {
            for lon in [-180.0, -90.0, 0.0, 39.0, 40.0, 120.0, 180.0] {
                let b = qibla_bearing(lat, lon);
                assert!((0.0..360.0).contains(&b), "({lat}, {lon}) -> {b}");
                let d = distance_km(lat, lon);
                assert!((0.0..=std::f64::consts::PI * EARTH_RADIUS_KM).contains(&d));
            }
        }
    }

    #[test]
    fn due_north_and_south() {
        // same meridian
        assert!(qibla_bearing(0.0, KAABA_LONGITUDE).abs() < 1e-9);
        assert!((qibla_bearing(50.0, KAABA_LONGITUDE) - 180.0).abs() < 1e-9);
    }
}
