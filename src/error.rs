use thiserror::Error;

/// Errors raised by the prayer-time and calendar engine.
///
/// Astronomically unreachable twilight angles are not errors; they surface as
/// `None` instants on [`crate::PrayerTimes`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SalahError {
    #[error("invalid coordinates: latitude {latitude} must be in [-90, 90] and longitude {longitude} in [-180, 180]")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("invalid hijri date {year}-{month}-{day}: year must be >= 1, month in 1..=12, day in 1..=30")]
    InvalidHijriComponents { year: i32, month: u32, day: u32 },

    #[error("date is outside the supported calendar range")]
    DateOutOfRange,

    #[error("unknown IANA time zone: {0}")]
    UnknownTimezone(String),

    #[error("invalid settings: {0}")]
    InvalidSettings(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
}

pub type Result<T> = std::result::Result<T, SalahError>;
