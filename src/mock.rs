//! Synthetic records used by every fallback path.
//!
//! Values are random but bounded, and every record is schema-complete so
//! consumers never special-case synthetic data beyond its `is_synthetic` flag.
//! The random source is injected; a fixed seed reproduces the same output.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

use crate::models::weather::wind_direction_to_cardinal;
use crate::models::{CurrentConditions, DayRecord, LocationRef};

/// Descriptions rotated through for synthetic days
pub const DAY_DESCRIPTIONS: [&str; 5] = ["Sunny", "Partly Cloudy", "Rain", "Cloudy", "Clear"];

const CURRENT_DESCRIPTIONS: [&str; 5] = [
    "Sunny with a chance of Aether",
    "Partly Cloudy",
    "Light Rain",
    "Overcast",
    "Clear",
];

const SYNTHETIC_COUNTRY: &str = "Aetheria";
const SYNTHETIC_LATITUDE: f64 = 35.6895;
const SYNTHETIC_LONGITUDE: f64 = 139.6917;
const SYNTHETIC_TIMEZONE: &str = "Asia/Tokyo";

fn whole(rng: &mut StdRng, low: i32, high: i32) -> f64 {
    f64::from(rng.random_range(low..=high))
}

fn pick<'a>(rng: &mut StdRng, options: &[&'a str]) -> &'a str {
    options[rng.random_range(0..options.len())]
}

/// Seedable synthetic data source, shareable across concurrent fetchers
#[derive(Debug)]
pub struct MockDataGenerator {
    rng: Mutex<StdRng>,
}

impl Default for MockDataGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDataGenerator {
    /// Generator seeded from the thread-local entropy source
    pub fn new() -> Self {
        Self::seeded(rand::rng().random())
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }

    /// Synthetic location and current conditions for `label`
    pub fn current(&self, label: &str) -> (LocationRef, CurrentConditions) {
        debug!("Generating synthetic current conditions for '{}'", label);

        let location = LocationRef {
            name: label.to_string(),
            country: SYNTHETIC_COUNTRY.to_string(),
            latitude: SYNTHETIC_LATITUDE,
            longitude: SYNTHETIC_LONGITUDE,
            timezone_id: SYNTHETIC_TIMEZONE.to_string(),
        };

        let current = self.with_rng(|rng| {
            let temperature = whole(rng, 5, 32);
            let wind_degree = rng.random_range(0..360_u16);
            CurrentConditions {
                temperature,
                description: pick(rng, &CURRENT_DESCRIPTIONS).to_string(),
                humidity: whole(rng, 30, 90),
                wind_speed: whole(rng, 0, 30),
                wind_degree,
                wind_direction: wind_direction_to_cardinal(wind_degree).to_string(),
                pressure: whole(rng, 995, 1030),
                cloud_cover: whole(rng, 0, 100),
                precipitation: whole(rng, 0, 5),
                visibility: whole(rng, 5, 10),
                uv_index: whole(rng, 0, 11),
                feels_like: temperature + whole(rng, -3, 3),
                is_synthetic: true,
            }
        });

        (location, current)
    }

    /// Synthetic record for one date
    pub fn day(&self, date: NaiveDate, label: &str) -> DayRecord {
        debug!("Generating synthetic day {} for '{}'", date, label);

        self.with_rng(|rng| {
            let max_temperature = whole(rng, 25, 34);
            let min_temperature = whole(rng, 15, 19);
            DayRecord {
                date,
                max_temperature,
                min_temperature,
                avg_temperature: whole(rng, min_temperature as i32, max_temperature as i32),
                description: pick(rng, &DAY_DESCRIPTIONS).to_string(),
                wind_speed: Some(whole(rng, 10, 24)),
                is_synthetic: true,
            }
        })
    }
}
