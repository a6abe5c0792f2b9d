//! Current-conditions adapter with its direct → relay → synthetic chain.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use super::{CurrentConditionsSource, CurrentResolution, get_json, trim_base};
use crate::config::ProvidersConfig;
use crate::error::FetchError;
use crate::mock::MockDataGenerator;
use crate::models::{CurrentConditions, LocationRef, Notice};

type FetchResult<T> = std::result::Result<T, FetchError>;

/// Resolves a query to a location and its current conditions.
///
/// Order: direct request, then the relay proxy when the direct request
/// failed at transport level, then synthetic data. Provider rejections
/// (error payloads, missing fields) fall to synthetic data silently; a chain
/// that dies at transport level does so with a degraded-service notice.
pub struct CurrentConditionsFetcher {
    client: Client,
    base_url: String,
    relay_url: String,
    access_key: Option<String>,
    mock: Arc<MockDataGenerator>,
}

impl CurrentConditionsFetcher {
    pub fn new(client: Client, providers: &ProvidersConfig, mock: Arc<MockDataGenerator>) -> Self {
        Self {
            client,
            base_url: trim_base(&providers.current_url).to_string(),
            relay_url: trim_base(&providers.relay_url).to_string(),
            access_key: providers.access_key.clone(),
            mock,
        }
    }

    fn target_url(&self, access_key: &str, query: &str) -> String {
        format!(
            "{}/current?access_key={}&query={}",
            self.base_url,
            urlencoding::encode(access_key),
            urlencoding::encode(query)
        )
    }

    fn relay_request_url(&self, target: &str) -> String {
        format!("{}/get?url={}", self.relay_url, urlencoding::encode(target))
    }

    /// Direct request, falling over to the relay only on transport failure.
    #[instrument(skip(self, access_key))]
    async fn fetch_live(
        &self,
        access_key: &str,
        query: &str,
    ) -> FetchResult<(LocationRef, CurrentConditions)> {
        let target = self.target_url(access_key, query);

        let payload = match get_json(&self.client, &target).await {
            Ok(payload) => payload,
            Err(e) if e.is_transport() => {
                warn!("Direct request failed ({}), retrying through relay", e);
                self.fetch_relayed(&target).await?
            }
            Err(e) => return Err(e),
        };

        decode_payload(payload)
    }

    /// Relay request; the target's body arrives stringified in `contents`.
    #[instrument(level = "debug", skip_all)]
    async fn fetch_relayed(&self, target: &str) -> FetchResult<Value> {
        let envelope = get_json(&self.client, &self.relay_request_url(target)).await?;
        unwrap_relay_envelope(envelope)
    }

    fn synthetic(&self, query: &str, notices: Vec<Notice>) -> CurrentResolution {
        let (location, current) = self.mock.current(query);
        CurrentResolution {
            location,
            current,
            notices,
        }
    }
}

#[async_trait]
impl CurrentConditionsSource for CurrentConditionsFetcher {
    async fn resolve(&self, query: &str) -> CurrentResolution {
        info!("Resolving current conditions for '{}'", query);
        let start_time = Instant::now();

        let Some(access_key) = self.access_key.as_deref() else {
            warn!("No access key configured, using simulation mode");
            return self.synthetic(query, Vec::new());
        };

        match self.fetch_live(access_key, query).await {
            Ok((location, current)) => {
                info!(
                    "Resolved '{}' to {} ({}) in {:.3}s",
                    query,
                    location.display_name(),
                    location.format_coordinates(),
                    start_time.elapsed().as_secs_f64()
                );
                CurrentResolution {
                    location,
                    current,
                    notices: Vec::new(),
                }
            }
            Err(e) if e.is_location_not_found() => {
                warn!("Provider does not know '{}', falling back to synthetic data: {}", query, e);
                self.synthetic(
                    query,
                    vec![Notice::LocationNotFound {
                        query: query.to_string(),
                    }],
                )
            }
            Err(e) if e.is_provider_rejection() => {
                warn!("Provider rejected request, falling back to synthetic data: {}", e);
                self.synthetic(query, Vec::new())
            }
            Err(e) => {
                error!("Weather services unreachable, using simulation mode: {}", e);
                self.synthetic(query, vec![Notice::degraded_service()])
            }
        }
    }
}

/// Unwrap `{ contents: "<json>" }`. An envelope without `contents` is
/// passed through unchanged.
fn unwrap_relay_envelope(envelope: Value) -> FetchResult<Value> {
    match envelope.get("contents") {
        Some(Value::String(contents)) => serde_json::from_str(contents)
            .map_err(|e| FetchError::transport(format!("relay returned unparsable contents: {e}"))),
        Some(Value::Null) => Err(FetchError::transport("relay returned no contents")),
        Some(other) => Err(FetchError::transport(format!(
            "relay returned contents of unexpected type: {other}"
        ))),
        None => Ok(envelope),
    }
}

/// Turn a provider payload into models, classifying error payloads and
/// missing fields.
fn decode_payload(payload: Value) -> FetchResult<(LocationRef, CurrentConditions)> {
    if let Some(error) = payload.get("error") {
        let wire: weatherstack::ErrorBody =
            serde_json::from_value(error.clone()).unwrap_or_default();
        return Err(FetchError::application(
            wire.code,
            wire.info.unwrap_or_else(|| "unknown provider error".to_string()),
        ));
    }

    let response: weatherstack::CurrentResponse = serde_json::from_value(payload)
        .map_err(|e| FetchError::schema(format!("invalid current-conditions response: {e}")))?;
    debug!("Decoded current conditions for {}", response.location.name);

    Ok(response.into_models())
}

/// Weatherstack wire format
mod weatherstack {
    use serde::{Deserialize, Deserializer};

    use crate::models::{CurrentConditions, LocationRef};

    #[derive(Debug, Deserialize, Default)]
    pub struct ErrorBody {
        pub code: Option<i64>,
        pub info: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct CurrentResponse {
        pub location: LocationBody,
        pub current: CurrentBody,
    }

    #[derive(Debug, Deserialize)]
    pub struct LocationBody {
        pub name: String,
        #[serde(default)]
        pub country: String,
        #[serde(deserialize_with = "number_or_string")]
        pub lat: f64,
        #[serde(deserialize_with = "number_or_string")]
        pub lon: f64,
        #[serde(default)]
        pub timezone_id: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct CurrentBody {
        pub temperature: f64,
        pub weather_descriptions: Vec<String>,
        #[serde(default)]
        pub humidity: f64,
        #[serde(default)]
        pub wind_speed: f64,
        #[serde(default)]
        pub wind_degree: u16,
        #[serde(default)]
        pub wind_dir: String,
        #[serde(default)]
        pub pressure: f64,
        #[serde(default)]
        pub cloudcover: f64,
        #[serde(default)]
        pub precip: f64,
        #[serde(default)]
        pub visibility: f64,
        #[serde(default)]
        pub uv_index: f64,
        pub feelslike: Option<f64>,
    }

    /// Coordinates arrive as `"51.517"` from this provider.
    fn number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum NumberOrString {
            Number(f64),
            String(String),
        }

        match NumberOrString::deserialize(deserializer)? {
            NumberOrString::Number(value) => Ok(value),
            NumberOrString::String(text) => text.trim().parse().map_err(serde::de::Error::custom),
        }
    }

    impl CurrentResponse {
        pub fn into_models(self) -> (LocationRef, CurrentConditions) {
            let location = LocationRef {
                name: self.location.name,
                country: self.location.country,
                latitude: self.location.lat,
                longitude: self.location.lon,
                timezone_id: self.location.timezone_id,
            };

            let current = self.current;
            let description = current
                .weather_descriptions
                .into_iter()
                .next()
                .unwrap_or_else(|| "Unknown".to_string());

            let conditions = CurrentConditions {
                temperature: current.temperature,
                description,
                humidity: current.humidity,
                wind_speed: current.wind_speed,
                wind_degree: current.wind_degree,
                wind_direction: current.wind_dir,
                pressure: current.pressure,
                cloud_cover: current.cloudcover,
                precipitation: current.precip,
                visibility: current.visibility,
                uv_index: current.uv_index,
                feels_like: current.feelslike.unwrap_or(current.temperature),
                is_synthetic: false,
            };

            (location, conditions)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn london_payload() -> Value {
        json!({
            "request": {"type": "City", "query": "London, United Kingdom"},
            "location": {
                "name": "London",
                "country": "United Kingdom",
                "lat": "51.517",
                "lon": "-0.106",
                "timezone_id": "Europe/London"
            },
            "current": {
                "temperature": 13,
                "weather_descriptions": ["Partly cloudy"],
                "humidity": 77,
                "wind_speed": 15,
                "wind_degree": 240,
                "wind_dir": "WSW",
                "pressure": 1012,
                "cloudcover": 50,
                "precip": 0,
                "visibility": 10,
                "uv_index": 2,
                "feelslike": 11
            }
        })
    }

    #[test]
    fn test_decode_live_payload() {
        let (location, current) = decode_payload(london_payload()).unwrap();
        assert_eq!(location.name, "London");
        assert_eq!(location.latitude, 51.517);
        assert_eq!(location.longitude, -0.106);
        assert_eq!(location.timezone_id, "Europe/London");
        assert_eq!(current.temperature, 13.0);
        assert_eq!(current.description, "Partly cloudy");
        assert_eq!(current.wind_direction, "WSW");
        assert_eq!(current.feels_like, 11.0);
        assert!(!current.is_synthetic);
    }

    #[test]
    fn test_decode_numeric_coordinates() {
        let mut payload = london_payload();
        payload["location"]["lat"] = json!(51.5);
        payload["location"]["lon"] = json!(-0.1);
        let (location, _) = decode_payload(payload).unwrap();
        assert_eq!(location.coordinates().latitude, 51.5);
        assert_eq!(location.coordinates().longitude, -0.1);
    }

    #[test]
    fn test_decode_error_payload() {
        let payload = json!({
            "success": false,
            "error": {
                "code": 101,
                "type": "invalid_access_key",
                "info": "You have not supplied a valid API Access Key."
            }
        });
        let err = decode_payload(payload).unwrap_err();
        assert_eq!(
            err,
            FetchError::application(Some(101), "You have not supplied a valid API Access Key.")
        );
        assert!(!err.is_location_not_found());
    }

    #[test]
    fn test_decode_not_found_payload() {
        let payload = json!({
            "success": false,
            "error": {"code": 615, "type": "request_failed", "info": "Your API request failed."}
        });
        assert!(decode_payload(payload).unwrap_err().is_location_not_found());
    }

    #[test]
    fn test_decode_missing_current_is_schema_error() {
        let mut payload = london_payload();
        payload.as_object_mut().unwrap().remove("current");
        let err = decode_payload(payload).unwrap_err();
        assert!(matches!(err, FetchError::Schema { .. }));
    }

    #[test]
    fn test_decode_bad_coordinates_is_schema_error() {
        let mut payload = london_payload();
        payload["location"]["lat"] = json!("north-ish");
        assert!(matches!(decode_payload(payload), Err(FetchError::Schema { .. })));
    }

    #[test]
    fn test_unwrap_relay_envelope() {
        let envelope = json!({
            "contents": london_payload().to_string(),
            "status": {"http_code": 200}
        });
        let unwrapped = unwrap_relay_envelope(envelope).unwrap();
        assert_eq!(unwrapped["location"]["name"], "London");

        let passthrough = unwrap_relay_envelope(json!({"current": {}})).unwrap();
        assert!(passthrough.get("current").is_some());

        assert!(unwrap_relay_envelope(json!({"contents": "not json"})).unwrap_err().is_transport());
        assert!(unwrap_relay_envelope(json!({"contents": null})).unwrap_err().is_transport());
    }

    mod chain {
        use super::*;
        use crate::weather::build_http_client;
        use std::time::Duration;
        use wiremock::matchers::{method, path, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        const KEY: &str = "test-access-key";

        fn fetcher(
            direct: &MockServer,
            relay: &MockServer,
            access_key: Option<&str>,
        ) -> CurrentConditionsFetcher {
            let providers = ProvidersConfig {
                access_key: access_key.map(str::to_string),
                current_url: direct.uri(),
                relay_url: relay.uri(),
                ..ProvidersConfig::default()
            };
            let client = build_http_client(Duration::from_secs(2)).unwrap();
            let mock = Arc::new(MockDataGenerator::seeded(1));
            CurrentConditionsFetcher::new(client, &providers, mock)
        }

        async fn expect_untouched(server: &MockServer) {
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(200))
                .expect(0)
                .mount(server)
                .await;
        }

        #[tokio::test]
        async fn test_direct_success() {
            let direct = MockServer::start().await;
            let relay = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/current"))
                .and(query_param("access_key", KEY))
                .and(query_param("query", "London"))
                .respond_with(ResponseTemplate::new(200).set_body_json(london_payload()))
                .expect(1)
                .mount(&direct)
                .await;
            expect_untouched(&relay).await;

            let resolution = fetcher(&direct, &relay, Some(KEY)).resolve("London").await;
            assert_eq!(resolution.location.name, "London");
            assert!(!resolution.current.is_synthetic);
            assert!(resolution.notices.is_empty());
        }

        #[tokio::test]
        async fn test_relay_after_transport_failure() {
            let direct = MockServer::start().await;
            let relay = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(502))
                .mount(&direct)
                .await;
            Mock::given(method("GET"))
                .and(path("/get"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(json!({"contents": london_payload().to_string()})),
                )
                .expect(1)
                .mount(&relay)
                .await;

            let resolution = fetcher(&direct, &relay, Some(KEY)).resolve("London").await;
            assert_eq!(resolution.location.country, "United Kingdom");
            assert!(!resolution.current.is_synthetic);
            assert!(resolution.notices.is_empty());
        }

        #[tokio::test]
        async fn test_rejection_is_silent_and_skips_relay() {
            let direct = MockServer::start().await;
            let relay = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "success": false,
                    "error": {"code": 101, "info": "invalid key"}
                })))
                .mount(&direct)
                .await;
            expect_untouched(&relay).await;

            let resolution = fetcher(&direct, &relay, Some(KEY)).resolve("London").await;
            assert!(resolution.current.is_synthetic);
            assert_eq!(resolution.location.name, "London");
            assert!(resolution.notices.is_empty());
        }

        #[tokio::test]
        async fn test_unknown_location_raises_notice() {
            let direct = MockServer::start().await;
            let relay = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "success": false,
                    "error": {"code": 615, "info": "Your API request failed."}
                })))
                .mount(&direct)
                .await;

            let resolution = fetcher(&direct, &relay, Some(KEY)).resolve("Atlantis").await;
            assert!(resolution.current.is_synthetic);
            assert_eq!(
                resolution.notices,
                vec![Notice::LocationNotFound {
                    query: "Atlantis".to_string()
                }]
            );
        }

        #[tokio::test]
        async fn test_missing_current_is_silent() {
            let direct = MockServer::start().await;
            let relay = MockServer::start().await;
            let mut payload = london_payload();
            payload.as_object_mut().unwrap().remove("current");
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(200).set_body_json(payload))
                .mount(&direct)
                .await;

            let resolution = fetcher(&direct, &relay, Some(KEY)).resolve("London").await;
            assert!(resolution.current.is_synthetic);
            assert!(resolution.notices.is_empty());
        }

        #[tokio::test]
        async fn test_total_transport_failure_degrades() {
            let direct = MockServer::start().await;
            let relay = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(500))
                .mount(&direct)
                .await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(500))
                .expect(1)
                .mount(&relay)
                .await;

            let resolution = fetcher(&direct, &relay, Some(KEY)).resolve("Tokyo").await;
            assert!(resolution.current.is_synthetic);
            assert_eq!(resolution.notices, vec![Notice::degraded_service()]);
        }

        #[tokio::test]
        async fn test_no_access_key_never_hits_network() {
            let direct = MockServer::start().await;
            let relay = MockServer::start().await;
            expect_untouched(&direct).await;
            expect_untouched(&relay).await;

            let resolution = fetcher(&direct, &relay, None).resolve("Tokyo").await;
            assert!(resolution.current.is_synthetic);
            assert!(resolution.notices.is_empty());
        }
    }
}
