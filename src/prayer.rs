//! Daily prayer-time assembly.
//!
//! Instants are first computed as fractional local hours (possibly outside
//! [0, 24) or NaN), corrected for high latitudes, shifted by the manual
//! adjustments and only then wrapped into a time of day.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::coordinates::Coordinates;
use crate::error::{Result, SalahError};
use crate::hour_angle::{asr_hour_angle, hour_angle};
use crate::method::{AsrMethod, CalculationMethod, HighLatMethod, MethodParams};
use crate::solar::{julian_day, normalize_hour, SolarPosition};

/// Default Imsak lead before Fajr, minutes.
pub const DEFAULT_IMSAK_MINUTES: f64 = 10.0;

/// Twilight angle used to bound Isha under the high-latitude rule when the
/// method defines Isha as minutes after Maghrib.
pub const FIXED_ISHA_FALLBACK_ANGLE: f64 = 18.0;

/// Standard refraction plus solar semidiameter at the horizon, degrees.
const RISE_SET_ANGLE: f64 = 0.833;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Prayer {
    Imsak,
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
    Midnight,
    LastThird,
}

impl Prayer {
    pub const ALL: [Prayer; 9] = [
        Self::Imsak,
        Self::Fajr,
        Self::Sunrise,
        Self::Dhuhr,
        Self::Asr,
        Self::Maghrib,
        Self::Isha,
        Self::Midnight,
        Self::LastThird,
    ];

    /// The instants a day is counted down through.
    pub const DAILY: [Prayer; 6] = [
        Self::Fajr,
        Self::Sunrise,
        Self::Dhuhr,
        Self::Asr,
        Self::Maghrib,
        Self::Isha,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Imsak => "Imsak",
            Self::Fajr => "Fajr",
            Self::Sunrise => "Sunrise",
            Self::Dhuhr => "Dhuhr",
            Self::Asr => "Asr",
            Self::Maghrib => "Maghrib",
            Self::Isha => "Isha",
            Self::Midnight => "Midnight",
            Self::LastThird => "Last Third",
        }
    }
}

impl fmt::Display for Prayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Manual per-instant offsets in minutes. Midnight and the last third are
/// derived from the night and cannot be adjusted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Adjustments {
    pub imsak: i32,
    pub fajr: i32,
    pub sunrise: i32,
    pub dhuhr: i32,
    pub asr: i32,
    pub maghrib: i32,
    pub isha: i32,
}

/// Prayer times for one date. `None` marks an instant the Sun never
/// defines at this place and date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrayerTimes {
    pub date: NaiveDate,
    pub imsak: Option<NaiveTime>,
    pub fajr: Option<NaiveTime>,
    pub sunrise: Option<NaiveTime>,
    pub dhuhr: Option<NaiveTime>,
    pub asr: Option<NaiveTime>,
    pub maghrib: Option<NaiveTime>,
    pub isha: Option<NaiveTime>,
    pub midnight: Option<NaiveTime>,
    pub last_third: Option<NaiveTime>,
}

/// The next instant to wait for and how long until it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpcomingPrayer {
    pub prayer: Prayer,
    pub at: NaiveTime,
    pub remaining: Duration,
}

impl PrayerTimes {
    pub fn get(&self, prayer: Prayer) -> Option<NaiveTime> {
        match prayer {
            Prayer::Imsak => self.imsak,
            Prayer::Fajr => self.fajr,
            Prayer::Sunrise => self.sunrise,
            Prayer::Dhuhr => self.dhuhr,
            Prayer::Asr => self.asr,
            Prayer::Maghrib => self.maghrib,
            Prayer::Isha => self.isha,
            Prayer::Midnight => self.midnight,
            Prayer::LastThird => self.last_third,
        }
    }

    /// First of Fajr..Isha strictly after `now`; once Isha has passed, the
    /// Fajr of `tomorrow`.
    pub fn next_prayer(&self, now: NaiveTime, tomorrow: &PrayerTimes) -> Option<UpcomingPrayer> {
        for prayer in Prayer::DAILY {
            if let Some(at) = self.get(prayer) {
                if now < at {
                    return Some(UpcomingPrayer { prayer, at, remaining: at - now });
                }
            }
        }

        let at = tomorrow.fajr?;
        Some(UpcomingPrayer {
            prayer: Prayer::Fajr,
            at,
            remaining: (at - now) + Duration::days(1),
        })
    }
}

impl fmt::Display for PrayerTimes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hm = |t: Option<NaiveTime>| t.map_or_else(|| "N/A".to_string(), |t| t.format("%H:%M").to_string());

        writeln!(f, "Prayer Times for {}", self.date)?;
        writeln!(f, "─────────────────────────")?;
        for prayer in &Prayer::ALL[..7] {
            writeln!(f, "{:<12}{}", format!("{}:", prayer.name()), hm(self.get(*prayer)))?;
        }
        writeln!(f, "─────────────────────────")?;
        writeln!(f, "{:<12}{}", "Midnight:", hm(self.midnight))?;
        writeln!(f, "{:<12}{}", "Last Third:", hm(self.last_third))
    }
}

/// Fractional local hours for one day, before wrapping.
#[derive(Debug, Clone, Copy)]
struct DayHours {
    imsak: f64,
    fajr: f64,
    sunrise: f64,
    dhuhr: f64,
    asr: f64,
    maghrib: f64,
    isha: f64,
}

impl DayHours {
    fn adjusted(mut self, adj: &Adjustments) -> Self {
        let shift = |h: &mut f64, minutes: i32| *h += f64::from(minutes) / 60.0;
        shift(&mut self.imsak, adj.imsak);
        shift(&mut self.fajr, adj.fajr);
        shift(&mut self.sunrise, adj.sunrise);
        shift(&mut self.dhuhr, adj.dhuhr);
        shift(&mut self.asr, adj.asr);
        shift(&mut self.maghrib, adj.maghrib);
        shift(&mut self.isha, adj.isha);
        self
    }
}

/// Computes [`PrayerTimes`] for a location under one set of conventions.
///
/// Defaults: Muslim World League, Shafi'i Asr, angle-based high-latitude
/// rule, Imsak 10 minutes before Fajr, no adjustments.
#[derive(Debug, Clone)]
pub struct PrayerCalculator {
    coords: Coordinates,
    method: MethodParams,
    asr_method: AsrMethod,
    high_lat_method: HighLatMethod,
    adjustments: Adjustments,
    imsak_minutes: f64,
}

impl PrayerCalculator {
    pub fn new(coords: Coordinates) -> Self {
        Self {
            coords,
            method: CalculationMethod::default().params(),
            asr_method: AsrMethod::default(),
            high_lat_method: HighLatMethod::default(),
            adjustments: Adjustments::default(),
            imsak_minutes: DEFAULT_IMSAK_MINUTES,
        }
    }

    /// Named method or custom [`MethodParams`].
    pub fn method(mut self, method: impl Into<MethodParams>) -> Self {
        self.method = method.into();
        self
    }

    pub fn asr_method(mut self, asr_method: AsrMethod) -> Self {
        self.asr_method = asr_method;
        self
    }

    pub fn high_lat_method(mut self, high_lat_method: HighLatMethod) -> Self {
        self.high_lat_method = high_lat_method;
        self
    }

    pub fn adjustments(mut self, adjustments: Adjustments) -> Self {
        self.adjustments = adjustments;
        self
    }

    pub fn imsak_minutes(mut self, minutes: f64) -> Self {
        self.imsak_minutes = minutes;
        self
    }

    pub fn coordinates(&self) -> &Coordinates {
        &self.coords
    }

    pub fn method_params(&self) -> MethodParams {
        self.method
    }

    pub fn calculate(&self, date: NaiveDate) -> PrayerTimes {
        let offset = self.coords.utc_offset_hours(date);
        let jd = julian_day(date.year(), date.month(), date.day());

        let today = self.corrected_hours(jd, offset);
        // Corrected, not raw: at high latitudes the raw Fajr is NaN or lies
        // past the corrected bound, which would put midnight after Fajr.
        let next_fajr = self.corrected_hours(jd + 1.0, offset).fajr;

        let night = night_duration(today.maghrib, next_fajr);
        let midnight = today.maghrib + night / 2.0;
        let last_third = today.maghrib + night * 2.0 / 3.0;

        let h = today.adjusted(&self.adjustments);
        debug!(
            "[calculate] {date} offset {offset:+.2}h: fajr {:.4} sunrise {:.4} dhuhr {:.4} asr {:.4} maghrib {:.4} isha {:.4} night {:.4}",
            h.fajr, h.sunrise, h.dhuhr, h.asr, h.maghrib, h.isha, night
        );

        let times = PrayerTimes {
            date,
            imsak: hours_to_time(h.imsak),
            fajr: hours_to_time(h.fajr),
            sunrise: hours_to_time(h.sunrise),
            dhuhr: hours_to_time(h.dhuhr),
            asr: hours_to_time(h.asr),
            maghrib: hours_to_time(h.maghrib),
            isha: hours_to_time(h.isha),
            midnight: hours_to_time(midnight),
            last_third: hours_to_time(last_third),
        };

        let missing: Vec<&str> = Prayer::ALL
            .iter()
            .filter(|p| times.get(**p).is_none())
            .map(|p| p.name())
            .collect();
        if !missing.is_empty() {
            warn!(
                "[calculate] {date} at {}: unavailable {:?}",
                self.coords, missing
            );
        }

        times
    }

    /// Every day of a Gregorian month.
    pub fn calculate_month(&self, year: i32, month: u32) -> Result<Vec<PrayerTimes>> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or(SalahError::InvalidInput("no such gregorian month"))?;
        Ok(first
            .iter_days()
            .take_while(|d| d.month() == month)
            .map(|d| self.calculate(d))
            .collect())
    }

    /// Every day of a Gregorian year.
    pub fn calculate_year(&self, year: i32) -> Result<Vec<PrayerTimes>> {
        let first = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(SalahError::DateOutOfRange)?;
        Ok(first
            .iter_days()
            .take_while(|d| d.year() == year)
            .map(|d| self.calculate(d))
            .collect())
    }

    /// Solar instants for the Julian Day, without corrections.
    fn raw_hours(&self, jd: f64, utc_offset: f64) -> DayHours {
        let sun = SolarPosition::at(jd);
        let lat = self.coords.latitude();
        let decl = sun.declination;

        let dhuhr = 12.0 + utc_offset - self.coords.longitude() / 15.0 - sun.equation_of_time;

        let rise_set_angle = RISE_SET_ANGLE + 0.0347 * self.coords.elevation().sqrt();
        let rise_set = hour_angle(rise_set_angle, decl, lat);
        let sunrise = dhuhr - rise_set;
        let maghrib = dhuhr + rise_set;

        let fajr = dhuhr - hour_angle(self.method.fajr_angle, decl, lat);
        let asr = dhuhr + asr_hour_angle(self.asr_method.shadow_ratio(), decl, lat);

        let isha = if self.method.is_isha_fixed_interval() {
            maghrib + f64::from(self.method.isha_minutes) / 60.0
        } else {
            dhuhr + hour_angle(self.method.isha_angle, decl, lat)
        };

        DayHours {
            imsak: fajr - self.imsak_minutes / 60.0,
            fajr,
            sunrise,
            dhuhr,
            asr,
            maghrib,
            isha,
        }
    }

    fn corrected_hours(&self, jd: f64, utc_offset: f64) -> DayHours {
        let mut h = self.raw_hours(jd, utc_offset);
        self.correct_high_latitude(&mut h);
        h
    }

    /// Bound Fajr and Isha to a portion of the night measured between the
    /// uncorrected sunset and sunrise.
    fn correct_high_latitude(&self, h: &mut DayHours) {
        let night = 24.0 - (h.maghrib - h.sunrise);

        if let Some(portion) = self.high_lat_method.night_portion(self.method.fajr_angle) {
            let limit = portion * night;
            if h.fajr.is_nan() || h.sunrise - h.fajr > limit {
                h.fajr = h.sunrise - limit;
                h.imsak = h.fajr - self.imsak_minutes / 60.0;
            }
        }

        let isha_angle = if self.method.is_isha_fixed_interval() {
            FIXED_ISHA_FALLBACK_ANGLE
        } else {
            self.method.isha_angle
        };
        if let Some(portion) = self.high_lat_method.night_portion(isha_angle) {
            let limit = portion * night;
            if h.isha.is_nan() || h.isha - h.maghrib > limit {
                h.isha = h.maghrib + limit;
            }
        }
    }
}

/// Hours from Maghrib to the next day's Fajr, in (0, 24].
fn night_duration(maghrib: f64, next_fajr: f64) -> f64 {
    let d = (next_fajr + 24.0 - maghrib).rem_euclid(24.0);
    if d == 0.0 { 24.0 } else { d }
}

/// Wrap into [0, 24) and round to the nearest second.
fn hours_to_time(hours: f64) -> Option<NaiveTime> {
    if !hours.is_finite() {
        return None;
    }
    let secs = (normalize_hour(hours) * 3600.0).round() as u32 % 86_400;
    NaiveTime::from_num_seconds_from_midnight_opt(secs, 0)
}
