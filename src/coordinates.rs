use std::fmt;

use chrono::{NaiveDate, NaiveTime, Offset, TimeZone};
use chrono_tz::Tz;
use log::warn;

use crate::error::{Result, SalahError};

/// Observer location. Latitude and longitude are validated, elevation is
/// clamped to be non-negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
    elevation: f64,
    timezone: Tz,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64, elevation: f64, timezone: Tz) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            warn!("[Coordinates::new] rejected lat {latitude}, lon {longitude}");
            return Err(SalahError::InvalidCoordinates { latitude, longitude });
        }

        Ok(Self {
            latitude,
            longitude,
            elevation: if elevation > 0.0 { elevation } else { 0.0 },
            timezone,
        })
    }

    /// Coordinates at sea level with the zone given by IANA name.
    pub fn with_zone_name(latitude: f64, longitude: f64, elevation: f64, zone: &str) -> Result<Self> {
        let tz: Tz = zone
            .parse()
            .map_err(|_| SalahError::UnknownTimezone(zone.to_string()))?;
        Self::new(latitude, longitude, elevation, tz)
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Meters above sea level, never negative.
    pub fn elevation(&self) -> f64 {
        self.elevation
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// UTC offset in hours in effect on `date`.
    ///
    /// Taken at local noon, so a daylight-saving switch in the small hours
    /// applies to the whole day.
    pub fn utc_offset_hours(&self, date: NaiveDate) -> f64 {
        let noon = date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN));
        let offset = self
            .timezone
            .offset_from_local_datetime(&noon)
            .earliest()
            .unwrap_or_else(|| self.timezone.offset_from_utc_datetime(&noon));
        f64::from(offset.fix().local_minus_utc()) / 3600.0
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.4}, {:.4}, {:.0}m, {})",
            self.latitude,
            self.longitude,
            self.elevation,
            self.timezone.name()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range() {
        assert!(matches!(
            Coordinates::new(90.5, 0.0, 0.0, Tz::UTC),
            Err(SalahError::InvalidCoordinates { .. })
        ));
        assert!(Coordinates::new(0.0, -180.1, 0.0, Tz::UTC).is_err());
        assert!(Coordinates::new(f64::NAN, 0.0, 0.0, Tz::UTC).is_err());
    }

    #[test]
    fn accepts_boundaries() {
        assert!(Coordinates::new(90.0, 180.0, 0.0, Tz::UTC).is_ok());
        assert!(Coordinates::new(-90.0, -180.0, 0.0, Tz::UTC).is_ok());
    }

    #[test]
    fn clamps_negative_elevation() {
        let c = Coordinates::new(31.5, 35.4, -430.0, Tz::Asia__Jerusalem).unwrap();
        assert_eq!(c.elevation(), 0.0);
    }

    #[test]
    fn zone_by_name() {
        let c = Coordinates::with_zone_name(41.37, 69.26, 460.0, "Asia/Tashkent").unwrap();
        assert_eq!(c.timezone(), Tz::Asia__Tashkent);
        assert!(matches!(
            Coordinates::with_zone_name(0.0, 0.0, 0.0, "Mars/Olympus_Mons"),
            Err(SalahError::UnknownTimezone(_))
        ));
    }

    #[test]
    fn offset_follows_daylight_saving() {
        let london = Coordinates::new(51.5, -0.13, 0.0, Tz::Europe__London).unwrap();
        let winter = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let summer = NaiveDate::from_ymd_opt(2025, 7, 15).unwrap();
        assert_eq!(london.utc_offset_hours(winter), 0.0);
        assert_eq!(london.utc_offset_hours(summer), 1.0);

        // transition day itself (30 March 2025, 01:00 UTC)
        let switch = NaiveDate::from_ymd_opt(2025, 3, 30).unwrap();
        assert_eq!(london.utc_offset_hours(switch), 1.0);
    }

    #[test]
    fn fractional_offsets() {
        let kathmandu = Coordinates::new(27.7, 85.3, 1400.0, Tz::Asia__Kathmandu).unwrap();
        let d = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(kathmandu.utc_offset_hours(d), 5.75);
    }
}
