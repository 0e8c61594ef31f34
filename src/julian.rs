//! Gregorian calendar <-> Julian Day conversion.
//!
//! Both directions use the classical Meeus formulation. Julian Days returned
//! here are at 0h UT, i.e. they end in `.5`.

/// Julian Day for a Gregorian calendar date.
///
/// January and February count as months 13 and 14 of the previous year, and
/// the Gregorian century correction `B = 2 - A + A/4` is always applied.
pub fn julian_day(year: i32, month: u32, day: u32) -> f64 {
    let (mut y, mut m) = (year, month as i32);
    if m <= 2 {
        y -= 1;
        m += 12;
    }

    let a = y / 100;
    let b = 2 - a + a / 4;

    (365.25 * f64::from(y + 4716)).floor()
        + (30.6001 * f64::from(m + 1)).floor()
        + f64::from(day)
        + f64::from(b)
        - 1524.5
}

/// Proleptic Gregorian `(year, month, day)` for a Julian Day, the inverse
/// of [`julian_day`].
///
/// There is no Julian-calendar branch below JD 2 299 161 (15 October 1582).
/// [`julian_day`] always applies the Gregorian century term, so the inverse
/// must too, or dates before 1582 would not round-trip.
pub fn calendar_from_julian_day(jd: f64) -> (i32, u32, u32) {
    let z = (jd + 0.5).floor() as i64;

    let alpha = ((z as f64 - 1_867_216.25) / 36_524.25).floor() as i64;
    let a = z + 1 + alpha - alpha.div_euclid(4);

    let b = a + 1524;
    let c = ((b as f64 - 122.1) / 365.25).floor() as i64;
    let d = (365.25 * c as f64).floor() as i64;
    let e = ((b - d) as f64 / 30.6001).floor() as i64;

    let day = b - d - (30.6001 * e as f64).floor() as i64;
    let month = if e < 14 { e - 1 } else { e - 13 };
    let year = if month > 2 { c - 4716 } else { c - 4715 };

    (year as i32, month as u32, day as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn j2000_epoch() {
        // 2000-01-01 0h UT
        assert_eq!(julian_day(2000, 1, 1), 2_451_544.5);
    }

    #[test]
    fn sputnik_launch() {
        // Meeus example 7.a
        assert_eq!(julian_day(1957, 10, 4), 2_436_115.5);
    }

    #[test]
    fn january_uses_previous_year() {
        assert_eq!(julian_day(2024, 3, 1) - julian_day(2024, 2, 28), 2.0);
        assert_eq!(julian_day(2023, 3, 1) - julian_day(2023, 2, 28), 1.0);
    }

    #[test]
    fn inverse_of_known_dates() {
        assert_eq!(calendar_from_julian_day(2_451_544.5), (2000, 1, 1));
        assert_eq!(calendar_from_julian_day(2_436_115.5), (1957, 10, 4));
        assert_eq!(calendar_from_julian_day(2_460_652.5), (2024, 12, 8));
    }

    #[test]
    fn proleptic_before_1582() {
        assert_eq!(calendar_from_julian_day(2_299_160.5), (1582, 10, 15));
        assert_eq!(calendar_from_julian_day(2_299_159.5), (1582, 10, 14));
        // 1 Muharram 1 AH
        assert_eq!(calendar_from_julian_day(1_948_439.5), (622, 7, 19));
        assert_eq!(julian_day(622, 7, 19), 1_948_439.5);
    }

    #[test]
    fn round_trip_across_a_century() {
        let mut jd = julian_day(1950, 1, 1);
        let end = julian_day(2050, 12, 31);
        while jd <= end {
            let (y, m, d) = calendar_from_julian_day(jd);
            assert_eq!(julian_day(y, m, d), jd);
            jd += 1.0;
        }
    }
}
