//! Provider adapters for current conditions, history and air quality.
//!
//! Each adapter owns its wire format and decodes it into the normalized
//! models at the boundary; nothing provider-shaped leaves this module.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::models::{
    AirQualitySample, Coordinates, CurrentConditions, HistoricalRange, LocationRef, Notice,
};
use crate::{AetherError, Result};

pub mod air_quality;
pub mod archive;
pub mod current;

pub use air_quality::AirQualityFetcher;
pub use archive::{HistoricalRangeFetcher, describe_weather_code};
pub use current::CurrentConditionsFetcher;

const USER_AGENT: &str = concat!("Aether/", env!("CARGO_PKG_VERSION"));
const SLOW_RESPONSE: Duration = Duration::from_secs(5);

/// Location and conditions produced by the current-conditions stage, live
/// or synthetic, plus any notice the fallback raised.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentResolution {
    pub location: LocationRef,
    pub current: CurrentConditions,
    pub notices: Vec<Notice>,
}

/// Resolves a query to a location and its current conditions. Never fails.
#[async_trait]
pub trait CurrentConditionsSource: Send + Sync {
    async fn resolve(&self, query: &str) -> CurrentResolution;
}

/// Resolves the seven days before `today`. Never fails and always yields
/// a full window.
#[async_trait]
pub trait HistoricalSource: Send + Sync {
    async fn resolve(
        &self,
        label: &str,
        coordinates: Coordinates,
        today: NaiveDate,
    ) -> HistoricalRange;
}

/// Resolves the current air-quality reading; `None` is a normal outcome.
#[async_trait]
pub trait AirQualitySource: Send + Sync {
    async fn resolve(&self, coordinates: Coordinates) -> Option<AirQualitySample>;
}

/// HTTP client shared by all adapters. The timeout bounds every request;
/// an elapsed timeout surfaces as a transport failure.
pub fn build_http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| AetherError::client(format!("Failed to create HTTP client: {e}")))
}

/// GET `url` and read the body as JSON. Anything short of a successful
/// response with a JSON body is a transport failure.
pub(crate) async fn get_json(client: &Client, url: &str) -> std::result::Result<Value, FetchError> {
    let start_time = Instant::now();

    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::transport(format!(
            "request failed with status: {} - {}",
            status,
            status.canonical_reason().unwrap_or("Unknown error")
        )));
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| FetchError::transport(format!("unreadable response body: {e}")))?;

    let elapsed = start_time.elapsed();
    debug!("HTTP {} in {:.3}s", status, elapsed.as_secs_f64());
    if elapsed > SLOW_RESPONSE {
        warn!("Slow provider response detected: {:.3}s", elapsed.as_secs_f64());
    }

    Ok(body)
}

/// Strip any trailing slash so paths can be appended with `format!`.
pub(crate) fn trim_base(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}
