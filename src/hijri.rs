//! Tabular (arithmetic) Hijri calendar.
//!
//! Thirty-year cycles of 10 631 days with 11 leap years at fixed cycle
//! positions. Odd months have 30 days, even months 29, and Dhu al-Hijjah
//! gains a 30th day in leap years. No lunar observation is involved, so the
//! result may differ by a day or two from locally announced dates.

use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SalahError};
use crate::julian::{calendar_from_julian_day, julian_day};

/// Julian Day of 1 Muharram 1 AH (19 July 622 Gregorian, 0h).
pub const HIJRI_EPOCH_JD: f64 = 1_948_439.5;

const DAYS_PER_CYCLE: i64 = 10_631;
const LEAP_POSITIONS: [i32; 11] = [2, 5, 7, 10, 13, 16, 18, 21, 24, 26, 29];

pub const MONTH_NAMES: [&str; 12] = [
    "Muharram",
    "Safar",
    "Rabi' al-Awwal",
    "Rabi' al-Thani",
    "Jumada al-Awwal",
    "Jumada al-Thani",
    "Rajab",
    "Sha'ban",
    "Ramadan",
    "Shawwal",
    "Dhu al-Qi'dah",
    "Dhu al-Hijjah",
];

pub const MONTH_NAMES_ARABIC: [&str; 12] = [
    "مُحَرَّم",
    "صَفَر",
    "رَبِيع الأَوَّل",
    "رَبِيع الثَّانِي",
    "جُمَادَى الأُولَى",
    "جُمَادَى الآخِرَة",
    "رَجَب",
    "شَعْبَان",
    "رَمَضَان",
    "شَوَّال",
    "ذُو القَعْدَة",
    "ذُو الحِجَّة",
];

const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const WEEKDAY_NAMES_ARABIC: [&str; 7] = [
    "الأحد",
    "الإثنين",
    "الثلاثاء",
    "الأربعاء",
    "الخميس",
    "الجمعة",
    "السبت",
];

// ---------- Year/month structure ----------

fn cycle_position(year: i32) -> i32 {
    (year - 1).rem_euclid(30) + 1
}

pub fn is_leap_year(year: i32) -> bool {
    LEAP_POSITIONS.contains(&cycle_position(year))
}

pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) { 355 } else { 354 }
}

/// Length of `month` (1..=12) in `year`. Months outside 1..=12 are an error.
pub fn days_in_month(year: i32, month: u32) -> Result<u32> {
    if !(1..=12).contains(&month) {
        return Err(SalahError::InvalidHijriComponents { year, month, day: 1 });
    }
    Ok(month_length(year, month))
}

fn month_length(year: i32, month: u32) -> u32 {
    if month % 2 == 1 || (month == 12 && is_leap_year(year)) {
        30
    } else {
        29
    }
}

/// English month name; `None` outside 1..=12.
pub fn month_name(month: u32) -> Option<&'static str> {
    MONTH_NAMES.get(month.checked_sub(1)? as usize).copied()
}

pub fn month_name_arabic(month: u32) -> Option<&'static str> {
    MONTH_NAMES_ARABIC.get(month.checked_sub(1)? as usize).copied()
}

// ---------- HijriDate ----------

/// A date in the tabular Hijri calendar. Ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HijriDate {
    year: i32,
    month: u32,
    day: u32,
}

impl HijriDate {
    /// Validates ranges only (`year >= 1`, month 1..=12, day 1..=30). A
    /// 30th of a 29-day month is accepted here; callers building fixed dates
    /// must pick days that exist.
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self> {
        if year < 1 || !(1..=12).contains(&month) || !(1..=30).contains(&day) {
            return Err(SalahError::InvalidHijriComponents { year, month, day });
        }
        Ok(Self { year, month, day })
    }

    pub fn from_gregorian(date: NaiveDate) -> Result<Self> {
        Self::from_julian_day(julian_day(date.year(), date.month(), date.day()))
    }

    /// Hijri date containing the Julian Day. Fails before the epoch.
    pub fn from_julian_day(jd: f64) -> Result<Self> {
        if !jd.is_finite() {
            return Err(SalahError::DateOutOfRange);
        }

        let days = (jd.floor() + 0.5 - HIJRI_EPOCH_JD) as i64;
        if days < 0 {
            return Err(SalahError::DateOutOfRange);
        }

        let cycles = days.div_euclid(DAYS_PER_CYCLE);
        let mut remaining = days - cycles * DAYS_PER_CYCLE;

        let mut year_in_cycle = 30;
        for position in 1..=30 {
            let len = i64::from(days_in_year(position));
            if remaining < len {
                year_in_cycle = position;
                break;
            }
            if position < 30 {
                remaining -= len;
            }
        }

        let year = i32::try_from(cycles * 30)
            .ok()
            .and_then(|y| y.checked_add(year_in_cycle))
            .ok_or(SalahError::DateOutOfRange)?;

        let mut day_of_year = remaining + 1;
        let mut month = 12;
        for m in 1..=12 {
            let len = i64::from(month_length(year, m));
            if day_of_year <= len {
                month = m;
                break;
            }
            day_of_year -= len;
        }

        let day = day_of_year.clamp(1, 30) as u32;
        Self::new(year, month, day.min(month_length(year, month)))
    }

    pub fn to_gregorian(&self) -> Result<NaiveDate> {
        let (y, m, d) = calendar_from_julian_day(self.to_julian_day());
        NaiveDate::from_ymd_opt(y, m, d).ok_or(SalahError::DateOutOfRange)
    }

    /// Julian Day (0h) of this date.
    pub fn to_julian_day(&self) -> f64 {
        let elapsed_years = self.year - 1;
        let cycles = i64::from(elapsed_years / 30);

        let mut days = cycles * DAYS_PER_CYCLE;
        for position in 1..=elapsed_years % 30 {
            days += i64::from(days_in_year(position));
        }
        for m in 1..self.month {
            days += i64::from(month_length(self.year, m));
        }
        days += i64::from(self.day);

        HIJRI_EPOCH_JD + (days - 1) as f64
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn is_leap_year(&self) -> bool {
        is_leap_year(self.year)
    }

    pub fn days_in_month(&self) -> u32 {
        month_length(self.year, self.month)
    }

    pub fn days_in_year(&self) -> u32 {
        days_in_year(self.year)
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[self.month as usize - 1]
    }

    pub fn month_name_arabic(&self) -> &'static str {
        MONTH_NAMES_ARABIC[self.month as usize - 1]
    }

    // ---------- Arithmetic ----------

    pub fn plus_days(&self, days: i64) -> Result<Self> {
        Self::from_julian_day(self.to_julian_day() + days as f64)
    }

    pub fn minus_days(&self, days: i64) -> Result<Self> {
        self.plus_days(-days)
    }

    /// Carries into the year and clamps the day to the target month's length
    /// (30 Muharram + 1 month = 29 Safar).
    pub fn plus_months(&self, months: i64) -> Result<Self> {
        let total = i64::from(self.year - 1) * 12 + i64::from(self.month - 1) + months;
        let year = i32::try_from(total.div_euclid(12) + 1).map_err(|_| SalahError::DateOutOfRange)?;
        let month = (total.rem_euclid(12) + 1) as u32;
        if year < 1 {
            return Err(SalahError::DateOutOfRange);
        }
        Self::new(year, month, self.day.min(month_length(year, month)))
    }

    /// Same month and day `years` later, clamped to the month's length
    /// (30 Dhu al-Hijjah of a leap year lands on the 29th in a common year).
    pub fn plus_years(&self, years: i32) -> Result<Self> {
        let year = self.year.checked_add(years).ok_or(SalahError::DateOutOfRange)?;
        if year < 1 {
            return Err(SalahError::DateOutOfRange);
        }
        Self::new(year, self.month, self.day.min(month_length(year, self.month)))
    }

    pub fn is_before(&self, other: &HijriDate) -> bool {
        self < other
    }

    pub fn is_after(&self, other: &HijriDate) -> bool {
        self > other
    }

    // ---------- Day of week ----------

    /// 0 = Sunday ... 6 = Saturday.
    pub fn day_of_week(&self) -> u32 {
        ((self.to_julian_day() + 1.5).floor() as i64).rem_euclid(7) as u32
    }

    pub fn weekday(&self) -> Weekday {
        match self.day_of_week() {
            0 => Weekday::Sun,
            1 => Weekday::Mon,
            2 => Weekday::Tue,
            3 => Weekday::Wed,
            4 => Weekday::Thu,
            5 => Weekday::Fri,
            _ => Weekday::Sat,
        }
    }

    pub fn weekday_name(&self) -> &'static str {
        WEEKDAY_NAMES[self.day_of_week() as usize]
    }

    pub fn weekday_name_arabic(&self) -> &'static str {
        WEEKDAY_NAMES_ARABIC[self.day_of_week() as usize]
    }

    // ---------- Special days ----------

    pub fn is_ramadan(&self) -> bool {
        self.month == 9
    }

    pub fn is_first_ten_dhul_hijjah(&self) -> bool {
        self.month == 12 && self.day <= 10
    }

    /// Eid al-Fitr, Eid al-Adha and the days of Tashreeq.
    pub fn is_fasting_prohibited(&self) -> bool {
        matches!((self.month, self.day), (10, 1) | (12, 10..=13))
    }

    pub fn special_day(&self) -> Option<&'static str> {
        let name = match (self.month, self.day) {
            (1, 1) => "Islamic New Year",
            (1, 10) => "Day of Ashura",
            (3, 12) => "Mawlid al-Nabi",
            (7, 27) => "Isra and Mi'raj",
            (8, 15) => "Laylat al-Bara'at",
            (9, 1) => "First day of Ramadan",
            (9, 27) => "Laylat al-Qadr (probable)",
            (10, 1) => "Eid al-Fitr",
            (12, 8) => "Day of Tarwiyah",
            (12, 9) => "Day of Arafah",
            (12, 10) => "Eid al-Adha",
            (12, 11..=13) => "Days of Tashreeq",
            _ => return None,
        };
        Some(name)
    }

    // ---------- Formatting ----------

    /// `"17 جُمَادَى الآخِرَة 1447 هـ"`
    pub fn to_arabic_string(&self) -> String {
        format!("{} {} {} هـ", self.day, self.month_name_arabic(), self.year)
    }

    /// `DD/MM/YYYY`
    pub fn to_numeric_string(&self) -> String {
        format!("{:02}/{:02}/{:04}", self.day, self.month, self.year)
    }

    /// `YYYY-MM-DD`
    pub fn to_iso_string(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }

    /// `"Monday, 17 Jumada al-Thani 1447 AH (2025-12-08)"`
    pub fn to_full_string(&self) -> Result<String> {
        Ok(format!("{}, {} ({})", self.weekday_name(), self, self.to_gregorian()?))
    }
}

impl fmt::Display for HijriDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} AH", self.day, self.month_name(), self.year)
    }
}

impl TryFrom<NaiveDate> for HijriDate {
    type Error = SalahError;

    fn try_from(date: NaiveDate) -> Result<Self> {
        Self::from_gregorian(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn greg(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn hijri(y: i32, m: u32, d: u32) -> HijriDate {
        HijriDate::new(y, m, d).unwrap()
    }

    #[test]
    fn epoch_is_first_of_muharram() {
        let epoch = HijriDate::from_julian_day(HIJRI_EPOCH_JD).unwrap();
        assert_eq!(epoch, hijri(1, 1, 1));
        assert_eq!(hijri(1, 1, 1).to_julian_day(), HIJRI_EPOCH_JD);
        assert_eq!(hijri(1, 1, 1).to_gregorian().unwrap(), greg(622, 7, 19));
    }

    #[test]
    fn before_epoch_is_out_of_range() {
        assert!(matches!(
            HijriDate::from_julian_day(HIJRI_EPOCH_JD - 1.0),
            Err(SalahError::DateOutOfRange)
        ));
        assert!(hijri(1, 1, 1).minus_days(1).is_err());
    }

    #[test]
    fn reference_dates() {
        assert_eq!(HijriDate::from_gregorian(greg(2000, 1, 1)).unwrap(), hijri(1420, 9, 24));
        assert_eq!(HijriDate::from_gregorian(greg(2025, 12, 8)).unwrap(), hijri(1447, 6, 17));
        assert_eq!(hijri(1447, 1, 1).to_gregorian().unwrap(), greg(2025, 6, 27));
    }

    #[test]
    fn rejects_bad_components() {
        assert!(HijriDate::new(1446, 0, 1).is_err());
        assert!(HijriDate::new(1446, 13, 1).is_err());
        assert!(HijriDate::new(1446, 1, 0).is_err());
        assert!(HijriDate::new(1446, 1, 31).is_err());
        assert!(HijriDate::new(0, 1, 1).is_err());
        // day 30 of a 29-day month passes construction
        assert!(HijriDate::new(1446, 2, 30).is_ok());
    }

    #[test]
    fn leap_positions_in_cycle() {
        let leaps: Vec<i32> = (1..=30).filter(|y| is_leap_year(*y)).collect();
        assert_eq!(leaps, LEAP_POSITIONS.to_vec());
        let cycle: u32 = (1..=30).map(days_in_year).sum();
        assert_eq!(i64::from(cycle), DAYS_PER_CYCLE);
        // 1440..1450: 1441 (pos 1), 1442 (pos 2)...
        let recent: Vec<i32> = (1440..=1450).filter(|y| is_leap_year(*y)).collect();
        assert_eq!(recent, vec![1442, 1445, 1447, 1450]);
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(1446, 1).unwrap(), 30);
        assert_eq!(days_in_month(1446, 2).unwrap(), 29);
        assert_eq!(days_in_month(1446, 12).unwrap(), 29);
        assert_eq!(days_in_month(1447, 12).unwrap(), 30);
        assert!(days_in_month(1447, 13).is_err());
        assert_eq!(days_in_year(1447), 355);
        assert_eq!(days_in_year(1446), 354);
    }

    #[test]
    fn plus_days_crosses_months_and_years() {
        assert_eq!(hijri(1446, 1, 30).plus_days(1).unwrap(), hijri(1446, 2, 1));
        assert_eq!(hijri(1446, 12, 29).plus_days(1).unwrap(), hijri(1447, 1, 1));
        assert_eq!(hijri(1447, 12, 29).plus_days(1).unwrap(), hijri(1447, 12, 30));
        assert_eq!(hijri(1447, 1, 1).minus_days(1).unwrap(), hijri(1446, 12, 29));
        // Jumada al-Thani has 29 days
        assert_eq!(hijri(1447, 6, 17).plus_days(30).unwrap(), hijri(1447, 7, 18));
        assert_eq!(hijri(1447, 6, 17).plus_days(29).unwrap(), hijri(1447, 7, 17));
    }

    #[test]
    fn plus_days_past_the_last_year_is_out_of_range() {
        let late = hijri(i32::MAX - 5, 1, 1);
        assert!(late.plus_days(1).is_ok());
        assert!(matches!(late.plus_days(2200), Err(SalahError::DateOutOfRange)));
    }

    #[test]
    fn plus_months_clamps_day() {
        assert_eq!(hijri(1446, 1, 30).plus_months(1).unwrap(), hijri(1446, 2, 29));
        assert_eq!(hijri(1446, 11, 15).plus_months(2).unwrap(), hijri(1447, 1, 15));
        assert_eq!(hijri(1447, 1, 15).plus_months(-1).unwrap(), hijri(1446, 12, 15));
        assert_eq!(hijri(1446, 5, 30).plus_months(-24).unwrap(), hijri(1444, 5, 30));
        assert!(hijri(1, 1, 1).plus_months(-1).is_err());
    }

    #[test]
    fn plus_years_clamps_dhul_hijjah_30() {
        // 1447 is leap, 1448 is not
        assert_eq!(hijri(1447, 12, 30).plus_years(1).unwrap(), hijri(1448, 12, 29));
        assert_eq!(hijri(1446, 9, 1).plus_years(1).unwrap(), hijri(1447, 9, 1));
        assert!(hijri(5, 1, 1).plus_years(-5).is_err());
    }

    #[test]
    fn weekday_matches_gregorian() {
        let h = hijri(1447, 6, 17);
        assert_eq!(h.to_gregorian().unwrap().weekday(), Weekday::Mon);
        assert_eq!(h.day_of_week(), 1);
        assert_eq!(h.weekday(), Weekday::Mon);
        assert_eq!(h.weekday_name(), "Monday");
        assert_eq!(h.weekday_name_arabic(), "الإثنين");
    }

    #[test]
    fn ordering() {
        assert!(hijri(1446, 12, 29) < hijri(1447, 1, 1));
        assert!(hijri(1447, 2, 1) > hijri(1447, 1, 30));
        assert!(hijri(1447, 2, 2) > hijri(1447, 2, 1));
        assert!(hijri(1446, 12, 29).is_before(&hijri(1447, 1, 1)));
        assert!(hijri(1447, 1, 1).is_after(&hijri(1446, 12, 29)));
        assert!(!hijri(1447, 1, 1).is_after(&hijri(1447, 1, 1)));
    }

    #[test]
    fn formatting() {
        let h = hijri(1447, 6, 17);
        assert_eq!(h.to_string(), "17 Jumada al-Thani 1447 AH");
        assert_eq!(h.to_numeric_string(), "17/06/1447");
        assert_eq!(h.to_iso_string(), "1447-06-17");
        assert_eq!(h.to_full_string().unwrap(), "Monday, 17 Jumada al-Thani 1447 AH (2025-12-08)");
        assert!(h.to_arabic_string().ends_with("1447 هـ"));
    }

    #[test]
    fn special_days() {
        assert_eq!(hijri(1446, 10, 1).special_day(), Some("Eid al-Fitr"));
        assert_eq!(hijri(1446, 12, 12).special_day(), Some("Days of Tashreeq"));
        assert_eq!(hijri(1446, 4, 4).special_day(), None);
        assert!(hijri(1446, 12, 13).is_fasting_prohibited());
        assert!(!hijri(1446, 12, 9).is_fasting_prohibited());
        assert!(hijri(1446, 12, 9).is_first_ten_dhul_hijjah());
        assert!(hijri(1446, 9, 20).is_ramadan());
    }

    #[test]
    fn month_names() {
        assert_eq!(month_name(9), Some("Ramadan"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
        assert_eq!(month_name_arabic(9), Some("رَمَضَان"));
    }
}
