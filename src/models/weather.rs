//! Current conditions and daily record models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Current weather snapshot for a resolved location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentConditions {
    /// Temperature in Celsius
    pub temperature: f64,
    /// Human-readable description of weather conditions
    pub description: String,
    /// Relative humidity percentage (0-100)
    pub humidity: f64,
    /// Wind speed in km/h
    pub wind_speed: f64,
    /// Wind direction in degrees (0-360, where 0/360 is North)
    pub wind_degree: u16,
    /// Compass point the wind blows from, e.g. `SE`
    pub wind_direction: String,
    /// Atmospheric pressure in hPa
    pub pressure: f64,
    /// Cloud cover percentage (0-100)
    pub cloud_cover: f64,
    /// Precipitation amount in mm
    pub precipitation: f64,
    /// Visibility in kilometers
    pub visibility: f64,
    pub uv_index: f64,
    /// Apparent temperature in Celsius
    pub feels_like: f64,
    /// True when produced by the synthetic generator
    pub is_synthetic: bool,
}

/// How the apparent temperature compares to the measured one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeelsLike {
    Warmer,
    Colder,
    AboutRight,
}

impl FeelsLike {
    pub fn message(self) -> &'static str {
        match self {
            Self::Warmer => "Feels warmer than it is",
            Self::Colder => "Feels colder than it is",
            Self::AboutRight => "Feels about right",
        }
    }
}

impl CurrentConditions {
    pub fn feels_like_comparison(&self) -> FeelsLike {
        if self.feels_like > self.temperature {
            FeelsLike::Warmer
        } else if self.feels_like < self.temperature {
            FeelsLike::Colder
        } else {
            FeelsLike::AboutRight
        }
    }

    pub fn uv_label(&self) -> &'static str {
        uv_label(self.uv_index)
    }
}

/// UV index band label
pub fn uv_label(uv_index: f64) -> &'static str {
    if uv_index <= 2.0 {
        "Low"
    } else if uv_index <= 5.0 {
        "Medium"
    } else if uv_index <= 7.0 {
        "High"
    } else if uv_index <= 10.0 {
        "Very High"
    } else {
        "Extreme"
    }
}

/// Convert wind direction from degrees to a 16-point cardinal direction
pub fn wind_direction_to_cardinal(degrees: u16) -> &'static str {
    match degrees % 360 {
        0..=11 | 349..=359 => "N",
        12..=33 => "NNE",
        34..=56 => "NE",
        57..=78 => "ENE",
        79..=101 => "E",
        102..=123 => "ESE",
        124..=146 => "SE",
        147..=168 => "SSE",
        169..=191 => "S",
        192..=213 => "SSW",
        214..=236 => "SW",
        237..=258 => "WSW",
        259..=281 => "W",
        282..=303 => "WNW",
        304..=326 => "NW",
        _ => "NNW",
    }
}

/// One day of the trailing historical window
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DayRecord {
    pub date: NaiveDate,
    /// Daily maximum in Celsius
    pub max_temperature: f64,
    /// Daily minimum in Celsius
    pub min_temperature: f64,
    /// Daily mean in Celsius
    pub avg_temperature: f64,
    pub description: String,
    /// Wind speed in km/h; the archive provider does not report one
    pub wind_speed: Option<f64>,
    /// True when produced by the synthetic generator
    pub is_synthetic: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn conditions(temperature: f64, feels_like: f64) -> CurrentConditions {
        CurrentConditions {
            temperature,
            description: "Partly cloudy".to_string(),
            humidity: 60.0,
            wind_speed: 11.0,
            wind_degree: 250,
            wind_direction: "WSW".to_string(),
            pressure: 1015.0,
            cloud_cover: 50.0,
            precipitation: 0.0,
            visibility: 10.0,
            uv_index: 3.0,
            feels_like,
            is_synthetic: false,
        }
    }

    #[test]
    fn test_wind_direction_to_cardinal() {
        assert_eq!(wind_direction_to_cardinal(0), "N");
        assert_eq!(wind_direction_to_cardinal(45), "NE");
        assert_eq!(wind_direction_to_cardinal(90), "E");
        assert_eq!(wind_direction_to_cardinal(140), "SE");
        assert_eq!(wind_direction_to_cardinal(180), "S");
        assert_eq!(wind_direction_to_cardinal(270), "W");
        assert_eq!(wind_direction_to_cardinal(340), "NNW");
        assert_eq!(wind_direction_to_cardinal(360), "N");
    }

    #[rstest]
    #[case(0.0, "Low")]
    #[case(2.0, "Low")]
    #[case(5.0, "Medium")]
    #[case(6.0, "High")]
    #[case(10.0, "Very High")]
    #[case(11.0, "Extreme")]
    fn test_uv_label(#[case] uv: f64, #[case] expected: &str) {
        assert_eq!(uv_label(uv), expected);
    }

    #[test]
    fn test_feels_like_comparison() {
        assert_eq!(conditions(20.0, 22.0).feels_like_comparison(), FeelsLike::Warmer);
        assert_eq!(conditions(20.0, 18.0).feels_like_comparison(), FeelsLike::Colder);
        assert_eq!(conditions(20.0, 20.0).feels_like_comparison(), FeelsLike::AboutRight);
        assert_eq!(FeelsLike::Colder.message(), "Feels colder than it is");
    }
}
