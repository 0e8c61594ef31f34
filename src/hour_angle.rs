//! Hour angles for twilight depressions and Asr shadow lengths.
//!
//! Both solvers return NaN when the Sun never reaches the requested altitude
//! at the given latitude and declination (polar day/night). NaN is carried
//! through the assembler and resolved by the high-latitude correction, or
//! reported as an unavailable instant.

use crate::solar::{dacos, datan, dsin, dcos, dtan};

/// Hours from solar noon until the Sun's altitude reaches `altitude_deg`.
fn hours_to_altitude(altitude_deg: f64, declination_deg: f64, latitude_deg: f64) -> f64 {
    let cos_ha = (dsin(altitude_deg) - dsin(latitude_deg) * dsin(declination_deg))
        / (dcos(latitude_deg) * dcos(declination_deg));

    if !(-1.0..=1.0).contains(&cos_ha) {
        return f64::NAN;
    }

    dacos(cos_ha) / 15.0
}

/// Hour angle (hours) at which the Sun is `depression_deg` below the horizon.
pub fn hour_angle(depression_deg: f64, declination_deg: f64, latitude_deg: f64) -> f64 {
    hours_to_altitude(-depression_deg, declination_deg, latitude_deg)
}

/// Hour angle (hours) after noon at which an object's shadow equals
/// `shadow_ratio` times its height plus its noon shadow.
pub fn asr_hour_angle(shadow_ratio: f64, declination_deg: f64, latitude_deg: f64) -> f64 {
    let altitude = datan(1.0 / (shadow_ratio + dtan((latitude_deg - declination_deg).abs())));
    hours_to_altitude(altitude, declination_deg, latitude_deg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equinox_at_equator_is_six_hours() {
        let ha = hour_angle(0.0, 0.0, 0.0);
        assert!((ha - 6.0).abs() < 1e-9);
    }

    #[test]
    fn deeper_twilight_is_further_from_noon() {
        let rise = hour_angle(0.833, 10.0, 40.0);
        let civil = hour_angle(6.0, 10.0, 40.0);
        let astro = hour_angle(18.0, 10.0, 40.0);
        assert!(rise < civil && civil < astro);
    }

    #[test]
    fn polar_summer_twilight_is_unreachable() {
        // Tromso around the June solstice never gets 18 degrees dark
        assert!(hour_angle(18.0, 23.4, 69.65).is_nan());
        // ... and the Sun never sets
        assert!(hour_angle(0.833, 23.4, 69.65).is_nan());
    }

    #[test]
    fn polar_winter_sun_never_rises() {
        assert!(hour_angle(0.833, -23.4, 78.2).is_nan());
    }

    #[test]
    fn pole_is_unreachable() {
        assert!(hour_angle(18.0, 10.0, 90.0).is_nan());
    }

    #[test]
    fn hanafi_asr_is_later_than_shafii() {
        for lat in [-45.0, -10.0, 0.0, 21.4, 41.37, 55.0] {
            for decl in [-23.4, -10.0, 0.0, 12.0, 23.4] {
                let shafii = asr_hour_angle(1.0, decl, lat);
                let hanafi = asr_hour_angle(2.0, decl, lat);
                assert!(hanafi > shafii, "lat {lat} decl {decl}: {hanafi} <= {shafii}");
            }
        }
    }

    #[test]
    fn asr_at_equinox_equator() {
        // Sun overhead at noon, so Asr (ratio 1) is at 45 degrees altitude: 3 hours
        let ha = asr_hour_angle(1.0, 0.0, 0.0);
        assert!((ha - 3.0).abs() < 1e-9);
    }
}
