//! Prayer times, tabular Hijri calendar, Islamic events and Qibla.
//!
//! The Rust API lives in the modules below. The `extern "C"` functions at the
//! bottom wrap it for the mobile host: every call returns a heap-allocated
//! JSON string that must be released with [`free_json`].

use std::ffi::{c_char, CStr, CString};
use std::sync::Once;

use chrono::NaiveDate;
use log::{debug, error, info};
use serde::Serialize;

pub mod coordinates;
pub mod error;
pub mod events;
pub mod hijri;
pub mod hour_angle;
pub mod julian;
pub mod method;
pub mod prayer;
pub mod qibla;
pub mod settings;
pub mod solar;

pub use coordinates::Coordinates;
pub use error::{Result, SalahError};
pub use events::{EventType, IslamicEvent};
pub use hijri::HijriDate;
pub use method::{AsrMethod, CalculationMethod, HighLatMethod, MethodParams};
pub use prayer::{Adjustments, Prayer, PrayerCalculator, PrayerTimes, UpcomingPrayer};
pub use qibla::Qibla;
pub use settings::{CalculationSettings, MethodSelector};

// ---------- Output model ----------

/// Hijri date with its display strings, as handed to the host.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HijriView {
    year: i32,
    month: u32,
    day: u32,
    month_name: &'static str,
    month_name_arabic: &'static str,
    weekday: &'static str,
    formatted: String,
    formatted_arabic: String,
    iso: String,
    is_leap_year: bool,
    days_in_month: u32,
    special_day: Option<&'static str>,
    is_ramadan: bool,
    is_fasting_prohibited: bool,
}

impl From<HijriDate> for HijriView {
    fn from(h: HijriDate) -> Self {
        Self {
            year: h.year(),
            month: h.month(),
            day: h.day(),
            month_name: h.month_name(),
            month_name_arabic: h.month_name_arabic(),
            weekday: h.weekday_name(),
            formatted: h.to_string(),
            formatted_arabic: h.to_arabic_string(),
            iso: h.to_iso_string(),
            is_leap_year: h.is_leap_year(),
            days_in_month: h.days_in_month(),
            special_day: h.special_day(),
            is_ramadan: h.is_ramadan(),
            is_fasting_prohibited: h.is_fasting_prohibited(),
        }
    }
}

// ---------- C ABI ----------

const NULL_JSON: &str = "null";
const EMPTY_LIST_JSON: &str = "[]";

#[no_mangle]
pub extern "C" fn free_json(ptr: *mut c_char) {
    if ptr.is_null() {
        return;
    }
    unsafe {
        let _ = CString::from_raw(ptr);
    }
}

static INIT_LOGGER: Once = Once::new();

#[cfg(target_os = "android")]
fn init_logger() {
    use android_logger::Config;
    use log::LevelFilter;
    INIT_LOGGER.call_once(|| {
        android_logger::init_once(
            Config::default()
                .with_max_level(LevelFilter::Debug)
                .with_tag("salahcore"),
        );
    });
}

#[cfg(not(target_os = "android"))]
fn init_logger() {
    INIT_LOGGER.call_once(|| {
        let _ = env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .try_init();
    });
}

fn into_c_string(json: String) -> *mut c_char {
    // serde_json never emits interior NULs
    CString::new(json).unwrap_or_default().into_raw()
}

/// Serializes `result`, or logs the failure and hands back `fallback`.
fn respond<T: Serialize>(fn_name: &str, result: Result<T>, fallback: &str) -> *mut c_char {
    let json = result.and_then(|value| Ok(serde_json::to_string(&value)?));
    match json {
        Ok(json) => {
            info!("[{fn_name}] returning {} bytes", json.len());
            into_c_string(json)
        }
        Err(e) => {
            error!("[{fn_name}] {e}");
            into_c_string(fallback.to_string())
        }
    }
}

fn read_c_str(ptr: *const c_char) -> Result<String> {
    if ptr.is_null() {
        return Err(SalahError::InvalidInput("null string pointer"));
    }
    let s = unsafe { CStr::from_ptr(ptr) };
    s.to_str()
        .map(str::to_owned)
        .map_err(|_| SalahError::InvalidInput("string is not valid UTF-8"))
}

fn gregorian(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or(SalahError::InvalidInput("no such gregorian date"))
}

fn calculator_from_ptr(settings: *const c_char) -> Result<PrayerCalculator> {
    let json = read_c_str(settings)?;
    debug!("[calculator_from_ptr] settings: {json}");
    CalculationSettings::from_json(&json)?.into_calculator()
}

/// Prayer times for one date. `settings` is a [`CalculationSettings`] JSON
/// document. Returns a [`PrayerTimes`] object or `null`.
#[no_mangle]
pub extern "C" fn salah_times_json(
    settings: *const c_char,
    year: i32,
    month: u32,
    day: u32,
) -> *mut c_char {
    init_logger();
    info!("[salah_times_json] {year:04}-{month:02}-{day:02}");

    let result = calculator_from_ptr(settings)
        .and_then(|calc| Ok(calc.calculate(gregorian(year, month, day)?)));
    respond("salah_times_json", result, NULL_JSON)
}

/// Prayer times for every day of a Gregorian month, or `[]`.
#[no_mangle]
pub extern "C" fn salah_month_json(settings: *const c_char, year: i32, month: u32) -> *mut c_char {
    init_logger();
    info!("[salah_month_json] {year:04}-{month:02}");

    let result = calculator_from_ptr(settings).and_then(|calc| calc.calculate_month(year, month));
    respond("salah_month_json", result, EMPTY_LIST_JSON)
}

/// Hijri date for a Gregorian date, or `null`.
#[no_mangle]
pub extern "C" fn hijri_date_json(year: i32, month: u32, day: u32) -> *mut c_char {
    init_logger();
    info!("[hijri_date_json] {year:04}-{month:02}-{day:02}");

    let result = gregorian(year, month, day)
        .and_then(HijriDate::from_gregorian)
        .map(HijriView::from);
    respond("hijri_date_json", result, NULL_JSON)
}

/// Every catalog event falling in Gregorian `year`, or `[]`.
#[no_mangle]
pub extern "C" fn islamic_events_json(year: i32) -> *mut c_char {
    init_logger();
    info!("[islamic_events_json] {year}");

    respond("islamic_events_json", events::events_for_gregorian_year(year), EMPTY_LIST_JSON)
}

/// The next `count` events on or after the given date, or `[]`.
#[no_mangle]
pub extern "C" fn upcoming_events_json(year: i32, month: u32, day: u32, count: u32) -> *mut c_char {
    init_logger();
    info!("[upcoming_events_json] from {year:04}-{month:02}-{day:02}, count {count}");

    let result = gregorian(year, month, day)
        .and_then(|from| events::upcoming_events(from, count as usize));
    respond("upcoming_events_json", result, EMPTY_LIST_JSON)
}

/// Qibla bearing and distance for a position, or `null` when the position is
/// out of range.
#[no_mangle]
pub extern "C" fn qibla_json(latitude: f64, longitude: f64) -> *mut c_char {
    init_logger();
    info!("[qibla_json] lat {latitude}, lon {longitude}");

    let result = Coordinates::new(latitude, longitude, 0.0, chrono_tz::Tz::UTC)
        .map(|c| Qibla::from(&c));
    respond("qibla_json", result, NULL_JSON)
}
