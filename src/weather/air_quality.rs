//! Air-quality adapter (Open-Meteo air-quality API).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use super::{AirQualitySource, get_json, trim_base};
use crate::config::ProvidersConfig;
use crate::error::FetchError;
use crate::models::{AirQualitySample, Coordinates};

const CURRENT_FIELDS: &str = "us_aqi,pm10,pm2_5,nitrogen_dioxide,ozone,sulphur_dioxide";

#[derive(Debug, Deserialize)]
struct AirQualityResponse {
    current: Option<CurrentReading>,
}

#[derive(Debug, Deserialize)]
struct CurrentReading {
    us_aqi: f64,
    pm10: Option<f64>,
    pm2_5: Option<f64>,
    nitrogen_dioxide: Option<f64>,
    ozone: Option<f64>,
    sulphur_dioxide: Option<f64>,
}

impl From<CurrentReading> for AirQualitySample {
    fn from(reading: CurrentReading) -> Self {
        Self {
            us_aqi: reading.us_aqi,
            pm10: reading.pm10,
            pm2_5: reading.pm2_5,
            nitrogen_dioxide: reading.nitrogen_dioxide,
            ozone: reading.ozone,
            sulphur_dioxide: reading.sulphur_dioxide,
        }
    }
}

/// Fetches the current pollutant reading. There is no synthetic fallback:
/// any failure means "unavailable".
pub struct AirQualityFetcher {
    client: Client,
    base_url: String,
}

impl AirQualityFetcher {
    pub fn new(client: Client, providers: &ProvidersConfig) -> Self {
        Self {
            client,
            base_url: trim_base(&providers.air_quality_url).to_string(),
        }
    }

    fn request_url(&self, coordinates: Coordinates) -> String {
        format!(
            "{}/air-quality?latitude={}&longitude={}&current={}&timezone=auto",
            self.base_url, coordinates.latitude, coordinates.longitude, CURRENT_FIELDS
        )
    }

    async fn fetch_live(
        &self,
        coordinates: Coordinates,
    ) -> std::result::Result<AirQualitySample, FetchError> {
        let payload = get_json(&self.client, &self.request_url(coordinates))
            .await
            .map_err(|e| FetchError::air_quality_unavailable(e.to_string()))?;
        let response: AirQualityResponse = serde_json::from_value(payload)
            .map_err(|e| FetchError::air_quality_unavailable(format!("invalid response: {e}")))?;

        response
            .current
            .map(AirQualitySample::from)
            .ok_or_else(|| FetchError::air_quality_unavailable("response has no current reading"))
    }
}

#[async_trait]
impl AirQualitySource for AirQualityFetcher {
    async fn resolve(&self, coordinates: Coordinates) -> Option<AirQualitySample> {
        match self.fetch_live(coordinates).await {
            Ok(sample) => {
                info!(
                    "Air quality at {:.2},{:.2}: US AQI {}",
                    coordinates.latitude, coordinates.longitude, sample.us_aqi
                );
                Some(sample)
            }
            Err(e) => {
                debug!("{}", e);
                None
            }
        }
    }
}
