//! Air-quality reading model

use serde::{Deserialize, Serialize};

/// Current air-quality reading. Pollutant concentrations are in μg/m³;
/// a station may not report every pollutant, only the index is required.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AirQualitySample {
    /// US AQI index
    pub us_aqi: f64,
    pub pm10: Option<f64>,
    pub pm2_5: Option<f64>,
    pub nitrogen_dioxide: Option<f64>,
    pub ozone: Option<f64>,
    pub sulphur_dioxide: Option<f64>,
}

/// US AQI band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthyForSensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiCategory {
    pub fn from_index(us_aqi: f64) -> Self {
        if us_aqi <= 50.0 {
            Self::Good
        } else if us_aqi <= 100.0 {
            Self::Moderate
        } else if us_aqi <= 150.0 {
            Self::UnhealthyForSensitive
        } else if us_aqi <= 200.0 {
            Self::Unhealthy
        } else if us_aqi <= 300.0 {
            Self::VeryUnhealthy
        } else {
            Self::Hazardous
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::UnhealthyForSensitive => "Unhealthy (Sensitive)",
            Self::Unhealthy => "Unhealthy",
            Self::VeryUnhealthy => "Very Unhealthy",
            Self::Hazardous => "Hazardous",
        }
    }
}

impl AirQualitySample {
    pub fn category(&self) -> AqiCategory {
        AqiCategory::from_index(self.us_aqi)
    }
}
