//! Temperature unit conversion for display.
//!
//! Every temperature in the model is Celsius. Conversion happens only when a
//! value is rendered, and each rendered value is rounded on its own.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::AetherError;

/// Temperature unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TemperatureUnit {
    #[default]
    #[serde(rename = "C")]
    Celsius,
    #[serde(rename = "F")]
    Fahrenheit,
}

impl TemperatureUnit {
    /// The other unit, for a display toggle.
    pub fn toggled(self) -> Self {
        match self {
            Self::Celsius => Self::Fahrenheit,
            Self::Fahrenheit => Self::Celsius,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Celsius => "C",
            Self::Fahrenheit => "F",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for TemperatureUnit {
    type Err = AetherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c" | "celsius" => Ok(Self::Celsius),
            "f" | "fahrenheit" => Ok(Self::Fahrenheit),
            other => Err(AetherError::validation(format!(
                "unknown temperature unit '{other}'"
            ))),
        }
    }
}

/// Rounds halves toward positive infinity (-2.5 -> -2, 2.5 -> 3).
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// `round(celsius * 9/5 + 32)`
pub fn to_fahrenheit(celsius: f64) -> i64 {
    round_half_up(celsius * 9.0 / 5.0 + 32.0)
}

/// Integer shown for a canonical Celsius value in the chosen unit.
pub fn display_value(celsius: f64, unit: TemperatureUnit) -> i64 {
    match unit {
        TemperatureUnit::Celsius => round_half_up(celsius),
        TemperatureUnit::Fahrenheit => to_fahrenheit(celsius),
    }
}

/// Format a canonical Celsius value as e.g. `24°C` or `75°F`.
pub fn format_temperature(celsius: f64, unit: TemperatureUnit) -> String {
    format!("{}°{}", display_value(celsius, unit), unit)
}
