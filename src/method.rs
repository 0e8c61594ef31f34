//! Calculation conventions: twilight angles, Asr juristic method and
//! high-latitude rule.

use serde::{Deserialize, Serialize};

/// Numeric parameters of a calculation convention.
///
/// `isha_minutes > 0` means Isha is a fixed interval after Maghrib and
/// `isha_angle` is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodParams {
    pub fajr_angle: f64,
    pub isha_angle: f64,
    pub isha_minutes: u32,
}

impl MethodParams {
    pub const fn angles(fajr_angle: f64, isha_angle: f64) -> Self {
        Self { fajr_angle, isha_angle, isha_minutes: 0 }
    }

    pub const fn minutes_after_maghrib(fajr_angle: f64, isha_minutes: u32) -> Self {
        Self { fajr_angle, isha_angle: 0.0, isha_minutes }
    }

    pub fn is_isha_fixed_interval(&self) -> bool {
        self.isha_minutes > 0
    }
}

/// Named calculation conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalculationMethod {
    #[default]
    #[serde(alias = "MUSLIM_WORLD_LEAGUE")]
    Mwl,
    Isna,
    Egypt,
    #[serde(alias = "UMM_AL_QURA")]
    Makkah,
    Karachi,
    Tehran,
    Jafari,
    Singapore,
    Turkey,
    #[serde(alias = "GULF")]
    Dubai,
    Kuwait,
    Qatar,
    Russia,
    France,
}

struct MethodEntry {
    method: CalculationMethod,
    display_name: &'static str,
    params: MethodParams,
}

const METHOD_TABLE: [MethodEntry; 14] = [
    MethodEntry {
        method: CalculationMethod::Mwl,
        display_name: "Muslim World League",
        params: MethodParams::angles(18.0, 17.0),
    },
    MethodEntry {
        method: CalculationMethod::Isna,
        display_name: "Islamic Society of North America",
        params: MethodParams::angles(15.0, 15.0),
    },
    MethodEntry {
        method: CalculationMethod::Egypt,
        display_name: "Egyptian General Authority of Survey",
        params: MethodParams::angles(19.5, 17.5),
    },
    MethodEntry {
        method: CalculationMethod::Makkah,
        display_name: "Umm Al-Qura University, Makkah",
        params: MethodParams::minutes_after_maghrib(18.5, 90),
    },
    MethodEntry {
        method: CalculationMethod::Karachi,
        display_name: "University of Islamic Sciences, Karachi",
        params: MethodParams::angles(18.0, 18.0),
    },
    MethodEntry {
        method: CalculationMethod::Tehran,
        display_name: "Institute of Geophysics, University of Tehran",
        params: MethodParams::angles(17.7, 14.0),
    },
    MethodEntry {
        method: CalculationMethod::Jafari,
        display_name: "Shia Ithna-Ashari, Leva Institute, Qum",
        params: MethodParams::angles(16.0, 14.0),
    },
    MethodEntry {
        method: CalculationMethod::Singapore,
        display_name: "Majlis Ugama Islam Singapura, Singapore",
        params: MethodParams::angles(20.0, 18.0),
    },
    MethodEntry {
        method: CalculationMethod::Turkey,
        display_name: "Diyanet İşleri Başkanlığı, Turkey",
        params: MethodParams::angles(18.0, 17.0),
    },
    MethodEntry {
        method: CalculationMethod::Dubai,
        display_name: "Gulf Region",
        params: MethodParams::angles(18.2, 18.2),
    },
    MethodEntry {
        method: CalculationMethod::Kuwait,
        display_name: "Kuwait",
        params: MethodParams::angles(18.0, 17.5),
    },
    MethodEntry {
        method: CalculationMethod::Qatar,
        display_name: "Qatar",
        params: MethodParams::minutes_after_maghrib(18.0, 90),
    },
    MethodEntry {
        method: CalculationMethod::Russia,
        display_name: "Spiritual Administration of Muslims of Russia",
        params: MethodParams::angles(16.0, 15.0),
    },
    MethodEntry {
        method: CalculationMethod::France,
        display_name: "Union of Islamic Organizations of France",
        params: MethodParams::angles(12.0, 12.0),
    },
];

/// Integer method codes used by the external prayer-times API.
/// Codes not listed fall back to [`CalculationMethod::Mwl`].
const LEGACY_CODES: [(i32, CalculationMethod); 14] = [
    (1, CalculationMethod::Karachi),
    (2, CalculationMethod::Isna),
    (3, CalculationMethod::Mwl),
    (4, CalculationMethod::Makkah),
    (5, CalculationMethod::Egypt),
    (7, CalculationMethod::Tehran),
    (8, CalculationMethod::Dubai),
    (9, CalculationMethod::Kuwait),
    (10, CalculationMethod::Qatar),
    (11, CalculationMethod::Singapore),
    (12, CalculationMethod::France),
    (13, CalculationMethod::Turkey),
    (14, CalculationMethod::Russia),
    (16, CalculationMethod::Dubai),
];

impl CalculationMethod {
    pub const ALL: [CalculationMethod; 14] = [
        Self::Mwl,
        Self::Isna,
        Self::Egypt,
        Self::Makkah,
        Self::Karachi,
        Self::Tehran,
        Self::Jafari,
        Self::Singapore,
        Self::Turkey,
        Self::Dubai,
        Self::Kuwait,
        Self::Qatar,
        Self::Russia,
        Self::France,
    ];

    fn entry(self) -> &'static MethodEntry {
        // every variant has exactly one row in METHOD_TABLE
        METHOD_TABLE
            .iter()
            .find(|e| e.method == self)
            .unwrap_or(&METHOD_TABLE[0])
    }

    pub fn params(self) -> MethodParams {
        self.entry().params
    }

    pub fn display_name(self) -> &'static str {
        self.entry().display_name
    }

    pub fn from_legacy_code(code: i32) -> Self {
        LEGACY_CODES
            .iter()
            .find(|(c, _)| *c == code)
            .map_or(Self::Mwl, |(_, m)| *m)
    }
}

impl From<CalculationMethod> for MethodParams {
    fn from(method: CalculationMethod) -> Self {
        method.params()
    }
}

/// Juristic method for Asr: the shadow length factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AsrMethod {
    /// Shafi'i, Maliki, Hanbali: shadow ratio 1.
    #[default]
    Shafii,
    /// Hanafi: shadow ratio 2.
    Hanafi,
}

impl AsrMethod {
    pub fn shadow_ratio(self) -> f64 {
        match self {
            Self::Shafii => 1.0,
            Self::Hanafi => 2.0,
        }
    }

    /// API "school" code: 1 is Hanafi, anything else Shafi'i.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::Hanafi,
            _ => Self::Shafii,
        }
    }
}

/// Rule used to bound Fajr and Isha when twilight is too long or never ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HighLatMethod {
    None,
    /// Half of the night.
    NightMiddle,
    /// One seventh of the night.
    OneSeventh,
    /// `angle / 60` of the night.
    #[default]
    AngleBased,
}

impl HighLatMethod {
    /// Fraction of the night allotted to a twilight of `angle` degrees.
    /// `None` has no portion and never corrects.
    pub fn night_portion(self, angle: f64) -> Option<f64> {
        match self {
            Self::None => None,
            Self::NightMiddle => Some(0.5),
            Self::OneSeventh => Some(1.0 / 7.0),
            Self::AngleBased => Some(angle / 60.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_every_method_once() {
        for m in CalculationMethod::ALL {
            let rows = METHOD_TABLE.iter().filter(|e| e.method == m).count();
            assert_eq!(rows, 1, "{m:?}");
        }
    }

    #[test]
    fn known_parameters() {
        let russia = CalculationMethod::Russia.params();
        assert_eq!(russia.fajr_angle, 16.0);
        assert_eq!(russia.isha_angle, 15.0);
        assert!(!russia.is_isha_fixed_interval());

        let makkah = CalculationMethod::Makkah.params();
        assert_eq!(makkah.fajr_angle, 18.5);
        assert_eq!(makkah.isha_minutes, 90);
        assert!(makkah.is_isha_fixed_interval());
    }

    #[test]
    fn legacy_codes() {
        assert_eq!(CalculationMethod::from_legacy_code(1), CalculationMethod::Karachi);
        assert_eq!(CalculationMethod::from_legacy_code(8), CalculationMethod::Dubai);
        assert_eq!(CalculationMethod::from_legacy_code(16), CalculationMethod::Dubai);
        assert_eq!(CalculationMethod::from_legacy_code(14), CalculationMethod::Russia);
    }

    #[test]
    fn unknown_legacy_code_falls_back_to_mwl() {
        for code in [0, 6, 15, 17, 99, -1] {
            assert_eq!(CalculationMethod::from_legacy_code(code), CalculationMethod::Mwl);
        }
    }

    #[test]
    fn asr_codes() {
        assert_eq!(AsrMethod::from_code(0), AsrMethod::Shafii);
        assert_eq!(AsrMethod::from_code(1), AsrMethod::Hanafi);
        assert_eq!(AsrMethod::from_code(7), AsrMethod::Shafii);
        assert_eq!(AsrMethod::Hanafi.shadow_ratio(), 2.0);
    }

    #[test]
    fn night_portions() {
        assert_eq!(HighLatMethod::None.night_portion(18.0), None);
        assert_eq!(HighLatMethod::NightMiddle.night_portion(18.0), Some(0.5));
        assert_eq!(HighLatMethod::OneSeventh.night_portion(18.0), Some(1.0 / 7.0));
        assert_eq!(HighLatMethod::AngleBased.night_portion(18.0), Some(0.3));
    }

    #[test]
    fn serde_names() {
        let m: CalculationMethod = serde_json::from_str("\"RUSSIA\"").unwrap();
        assert_eq!(m, CalculationMethod::Russia);
        let m: CalculationMethod = serde_json::from_str("\"UMM_AL_QURA\"").unwrap();
        assert_eq!(m, CalculationMethod::Makkah);
        let h: HighLatMethod = serde_json::from_str("\"ONE_SEVENTH\"").unwrap();
        assert_eq!(h, HighLatMethod::OneSeventh);
        assert_eq!(serde_json::to_string(&AsrMethod::Hanafi).unwrap(), "\"HANAFI\"");
    }
}
