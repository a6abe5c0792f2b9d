//! Resolved location model

use serde::{Deserialize, Serialize};

/// Latitude/longitude pair that keys the historical and air-quality fetches
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Location as resolved by the current-conditions stage. Immutable for the
/// lifetime of a session.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LocationRef {
    /// Location name (city, region, etc.)
    pub name: String,
    /// Country name as reported by the provider
    pub country: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// IANA timezone identifier, e.g. `Europe/London`
    pub timezone_id: String,
}

impl LocationRef {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Format location as coordinates string
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    /// `Name, Country`, or just the name when the country is unknown
    pub fn display_name(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn london() -> LocationRef {
        LocationRef {
            name: "London".to_string(),
            country: "United Kingdom".to_string(),
            latitude: 51.517,
            longitude: -0.106,
            timezone_id: "Europe/London".to_string(),
        }
    }

    #[test]
    fn test_coordinates() {
        let location = london();
        assert_eq!(location.coordinates(), Coordinates::new(51.517, -0.106));
        assert_eq!(location.format_coordinates(), "51.5170, -0.1060");
    }

    #[test]
    fn test_display_name() {
        let mut location = london();
        assert_eq!(location.display_name(), "London, United Kingdom");
        location.country.clear();
        assert_eq!(location.display_name(), "London");
    }
}
