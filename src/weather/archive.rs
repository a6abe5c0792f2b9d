//! Historical daily-archive adapter (Open-Meteo archive API).

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{HistoricalSource, get_json, trim_base};
use crate::config::ProvidersConfig;
use crate::error::FetchError;
use crate::mock::MockDataGenerator;
use crate::models::{Coordinates, DayRecord, HistoricalRange, HistoricalWindow};

const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,temperature_2m_mean";

/// Human-readable label for a WMO weather code
pub fn describe_weather_code(code: i64) -> &'static str {
    match code {
        0 => "Sunny",
        1..=3 => "Partly Cloudy",
        45 | 48 => "Fog",
        51 | 53 | 55 => "Drizzle",
        61 | 63 | 65 | 80 | 81 | 82 => "Rain",
        71 | 73 | 75 | 77 | 85 | 86 => "Snow",
        95 | 96 | 99 => "Thunderstorm",
        _ => "Cloudy",
    }
}

/// Daily series as returned by the archive: parallel arrays indexed by day
#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    daily: DailySeries,
}

#[derive(Debug, Deserialize)]
struct DailySeries {
    time: Vec<NaiveDate>,
    weather_code: Vec<Option<f64>>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    temperature_2m_mean: Vec<Option<f64>>,
}

impl DailySeries {
    fn has_consistent_lengths(&self) -> bool {
        let days = self.time.len();
        self.weather_code.len() == days
            && self.temperature_2m_max.len() == days
            && self.temperature_2m_min.len() == days
            && self.temperature_2m_mean.len() == days
    }

    /// Record for day `index`, or `None` if any of its values is missing
    fn record(&self, index: usize) -> Option<DayRecord> {
        let code = self.weather_code[index]?;
        Some(DayRecord {
            date: self.time[index],
            max_temperature: self.temperature_2m_max[index]?,
            min_temperature: self.temperature_2m_min[index]?,
            avg_temperature: self.temperature_2m_mean[index]?,
            description: describe_weather_code(code as i64).to_string(),
            wind_speed: None,
            is_synthetic: false,
        })
    }
}

/// Fetches the trailing seven days. Failures fall back to synthetic days.
pub struct HistoricalRangeFetcher {
    client: Client,
    base_url: String,
    mock: Arc<MockDataGenerator>,
}

impl HistoricalRangeFetcher {
    pub fn new(client: Client, providers: &ProvidersConfig, mock: Arc<MockDataGenerator>) -> Self {
        Self {
            client,
            base_url: trim_base(&providers.archive_url).to_string(),
            mock,
        }
    }

    fn request_url(&self, coordinates: Coordinates, window: &HistoricalWindow) -> String {
        format!(
            "{}/archive?latitude={}&longitude={}&start_date={}&end_date={}&daily={}&timezone=auto",
            self.base_url,
            coordinates.latitude,
            coordinates.longitude,
            window.start.format("%Y-%m-%d"),
            window.end.format("%Y-%m-%d"),
            DAILY_FIELDS
        )
    }

    #[instrument(skip(self), fields(start = %window.start, end = %window.end))]
    async fn fetch_live(
        &self,
        label: &str,
        coordinates: Coordinates,
        window: HistoricalWindow,
    ) -> std::result::Result<HistoricalRange, FetchError> {
        let payload = get_json(&self.client, &self.request_url(coordinates, &window)).await?;
        let response: ArchiveResponse = serde_json::from_value(payload)
            .map_err(|e| FetchError::schema(format!("invalid archive response: {e}")))?;
        self.decode(label, window, response.daily)
    }

    /// Merge the parallel arrays into records, patching individual
    /// incomplete days with synthetic ones.
    fn decode(
        &self,
        label: &str,
        window: HistoricalWindow,
        daily: DailySeries,
    ) -> std::result::Result<HistoricalRange, FetchError> {
        if !daily.has_consistent_lengths() {
            return Err(FetchError::schema("archive arrays have unequal lengths"));
        }

        let records: Vec<DayRecord> = (0..daily.time.len())
            .map(|index| {
                daily.record(index).unwrap_or_else(|| {
                    debug!(
                        "Archive day {} incomplete, substituting synthetic day",
                        daily.time[index]
                    );
                    self.mock.day(daily.time[index], label)
                })
            })
            .collect();

        HistoricalRange::new(window, records)
            .ok_or_else(|| FetchError::schema("archive days do not match the requested window"))
    }

    fn synthetic(&self, label: &str, window: HistoricalWindow) -> HistoricalRange {
        HistoricalRange::generate(window, |date| self.mock.day(date, label))
    }
}

#[async_trait]
impl HistoricalSource for HistoricalRangeFetcher {
    async fn resolve(
        &self,
        label: &str,
        coordinates: Coordinates,
        today: NaiveDate,
    ) -> HistoricalRange {
        let window = HistoricalWindow::ending_before(today);

        match self.fetch_live(label, coordinates, window).await {
            Ok(range) => {
                info!("Loaded {} archive days for '{}'", range.len(), label);
                range
            }
            Err(e) => {
                warn!("Historical fetch failed, using synthetic history: {}", e);
                self.synthetic(label, window)
            }
        }
    }
}
