//! Low-precision solar position (about 0.01 degrees).
//!
//! Mean anomaly and mean longitude are linear in days since J2000; the
//! ecliptic longitude adds the two leading equation-of-centre terms.

pub use crate::julian::julian_day;

const J2000_JD: f64 = 2_451_545.0;

// ---------- Degree trigonometry ----------

pub(crate) fn dsin(deg: f64) -> f64 {
    deg.to_radians().sin()
}

pub(crate) fn dcos(deg: f64) -> f64 {
    deg.to_radians().cos()
}

pub(crate) fn dtan(deg: f64) -> f64 {
    deg.to_radians().tan()
}

pub(crate) fn dasin(x: f64) -> f64 {
    x.asin().to_degrees()
}

pub(crate) fn dacos(x: f64) -> f64 {
    x.acos().to_degrees()
}

pub(crate) fn datan(x: f64) -> f64 {
    x.atan().to_degrees()
}

pub(crate) fn datan2(y: f64, x: f64) -> f64 {
    y.atan2(x).to_degrees()
}

/// Normalize an angle to [0, 360) degrees.
pub fn normalize_360(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    // rem_euclid can round up to the modulus for tiny negative inputs
    if r >= 360.0 { 0.0 } else { r }
}

/// Normalize an hour value to [0, 24). NaN stays NaN.
pub fn normalize_hour(hours: f64) -> f64 {
    let r = hours.rem_euclid(24.0);
    if r >= 24.0 { 0.0 } else { r }
}

/// Declination and equation of time of the Sun for one Julian Day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarPosition {
    /// Apparent declination, degrees.
    pub declination: f64,
    /// Equation of time, hours (apparent minus mean solar time).
    pub equation_of_time: f64,
}

impl SolarPosition {
    pub fn at(jd: f64) -> Self {
        let e = Ecliptic::at(jd);
        Self {
            declination: e.declination(),
            equation_of_time: e.equation_of_time_hours(),
        }
    }
}

/// Intermediate ecliptic quantities shared by declination and EoT.
struct Ecliptic {
    /// Mean longitude, degrees.
    q: f64,
    /// Ecliptic longitude, degrees.
    l: f64,
    /// Obliquity of the ecliptic, degrees.
    e: f64,
}

impl Ecliptic {
    fn at(jd: f64) -> Self {
        let d = jd - J2000_JD;
        let g = normalize_360(357.529 + 0.985_600_28 * d);
        let q = normalize_360(280.459 + 0.985_647_36 * d);
        let l = normalize_360(q + 1.915 * dsin(g) + 0.020 * dsin(2.0 * g));
        let e = 23.439 - 0.000_000_36 * d;
        Self { q, l, e }
    }

    fn declination(&self) -> f64 {
        dasin(dsin(self.e) * dsin(self.l))
    }

    fn equation_of_time_hours(&self) -> f64 {
        let ra_hours = datan2(dcos(self.e) * dsin(self.l), dcos(self.l)) / 15.0;
        let eqt = self.q / 15.0 - normalize_hour(ra_hours);
        // q and RA wrap independently around the equinox; keep EoT near zero
        if eqt >= 12.0 {
            eqt - 24.0
        } else if eqt < -12.0 {
            eqt + 24.0
        } else {
            eqt
        }
    }
}

/// Solar declination in degrees for a Julian Day.
pub fn solar_declination(jd: f64) -> f64 {
    Ecliptic::at(jd).declination()
}

/// Equation of time in hours for a Julian Day.
pub fn equation_of_time_hours(jd: f64) -> f64 {
    Ecliptic::at(jd).equation_of_time_hours()
}
