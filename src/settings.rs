//! JSON calculation settings handed over the C ABI.

use serde::{Deserialize, Serialize};

use crate::coordinates::Coordinates;
use crate::error::Result;
use crate::method::{AsrMethod, CalculationMethod, HighLatMethod};
use crate::prayer::{Adjustments, PrayerCalculator, DEFAULT_IMSAK_MINUTES};

/// Either a named method (`"RUSSIA"`) or a legacy API code (`14`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MethodSelector {
    Code(i32),
    Named(CalculationMethod),
}

impl Default for MethodSelector {
    fn default() -> Self {
        Self::Named(CalculationMethod::default())
    }
}

impl From<MethodSelector> for CalculationMethod {
    fn from(selector: MethodSelector) -> Self {
        match selector {
            MethodSelector::Code(code) => CalculationMethod::from_legacy_code(code),
            MethodSelector::Named(method) => method,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalculationSettings {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
    /// IANA zone name.
    pub timezone: String,
    pub method: MethodSelector,
    pub asr_method: AsrMethod,
    pub high_lat_method: HighLatMethod,
    pub adjustments: Adjustments,
    pub imsak_minutes: f64,
}

impl Default for CalculationSettings {
    fn default() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            elevation: 0.0,
            timezone: "UTC".to_string(),
            method: MethodSelector::default(),
            asr_method: AsrMethod::default(),
            high_lat_method: HighLatMethod::default(),
            adjustments: Adjustments::default(),
            imsak_minutes: DEFAULT_IMSAK_MINUTES,
        }
    }
}

impl CalculationSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn calculation_method(&self) -> CalculationMethod {
        self.method.into()
    }

    pub fn coordinates(&self) -> Result<Coordinates> {
        Coordinates::with_zone_name(self.latitude, self.longitude, self.elevation, &self.timezone)
    }

    pub fn into_calculator(self) -> Result<PrayerCalculator> {
        Ok(PrayerCalculator::new(self.coordinates()?)
            .method(self.calculation_method())
            .asr_method(self.asr_method)
            .high_lat_method(self.high_lat_method)
            .adjustments(self.adjustments)
            .imsak_minutes(self.imsak_minutes))
    }
}
