//! Session lifecycle: one search, one generation, one immutable Session.
//!
//! Current conditions resolve first. Once coordinates are known, history and
//! air quality resolve concurrently and are merged into fresh `Session`
//! values. Every commit is gated on the generation that started the work, so
//! results from a superseded search are dropped instead of published.

use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use crate::config::AetherConfig;
use crate::mock::MockDataGenerator;
use crate::models::{Generation, Session, SessionSnapshot};
use crate::weather::{
    AirQualityFetcher, AirQualitySource, CurrentConditionsFetcher, CurrentConditionsSource,
    HistoricalRangeFetcher, HistoricalSource, build_http_client,
};
use crate::{AetherError, Result};

type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// How a submission ended
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Every slot resolved and the session is the one currently published
    Completed(Arc<Session>),
    /// A newer submission took over before this one finished
    Superseded { generation: Generation },
}

impl SubmitOutcome {
    pub fn session(&self) -> Option<&Arc<Session>> {
        match self {
            Self::Completed(session) => Some(session),
            Self::Superseded { .. } => None,
        }
    }
}

pub struct FetchOrchestrator {
    current: Arc<dyn CurrentConditionsSource>,
    historical: Arc<dyn HistoricalSource>,
    air_quality: Arc<dyn AirQualitySource>,
    state: watch::Sender<SessionSnapshot>,
    clock: Clock,
}

impl FetchOrchestrator {
    pub fn new(
        current: Arc<dyn CurrentConditionsSource>,
        historical: Arc<dyn HistoricalSource>,
        air_quality: Arc<dyn AirQualitySource>,
    ) -> Self {
        Self {
            current,
            historical,
            air_quality,
            state: watch::Sender::new(SessionSnapshot::default()),
            clock: Arc::new(|| Utc::now().date_naive()),
        }
    }

    /// Wire the live provider adapters described by `config`
    pub fn from_config(config: &AetherConfig) -> Result<Self> {
        let client = build_http_client(config.providers.timeout())?;
        let mock = Arc::new(match config.mock.seed {
            Some(seed) => MockDataGenerator::seeded(seed),
            None => MockDataGenerator::new(),
        });

        info!(
            "Weather pipeline ready (simulation mode: {})",
            config.providers.access_key.is_none()
        );

        Ok(Self::new(
            Arc::new(CurrentConditionsFetcher::new(
                client.clone(),
                &config.providers,
                Arc::clone(&mock),
            )),
            Arc::new(HistoricalRangeFetcher::new(
                client.clone(),
                &config.providers,
                mock,
            )),
            Arc::new(AirQualityFetcher::new(client, &config.providers)),
        ))
    }

    /// Replace the source of "today" used to place the historical window
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Run a search to completion.
    ///
    /// Blank input is rejected before anything is published or requested.
    pub async fn submit(&self, query: &str) -> Result<SubmitOutcome> {
        let query = validate_query(query)?;
        let generation = self.begin();
        Ok(self.run(generation, query.to_string()).await)
    }

    /// Validate and start a search on the runtime, returning its handle.
    /// The generation is claimed before this returns, so submission order
    /// decides which search wins.
    pub fn submit_in_background(
        self: &Arc<Self>,
        query: &str,
    ) -> Result<JoinHandle<SubmitOutcome>> {
        let query = validate_query(query)?.to_string();
        let generation = self.begin();
        let orchestrator = Arc::clone(self);
        Ok(tokio::spawn(async move { orchestrator.run(generation, query).await }))
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// True while current conditions for the latest search are outstanding
    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn current_generation(&self) -> Generation {
        self.state.borrow().generation
    }

    /// Claim the next generation and clear the published session
    fn begin(&self) -> Generation {
        let mut claimed = 0;
        self.state.send_modify(|snapshot| {
            claimed = snapshot.generation + 1;
            *snapshot = SessionSnapshot::loading(claimed);
        });
        debug!("Started search generation {}", claimed);
        claimed
    }

    #[instrument(skip(self))]
    async fn run(&self, generation: Generation, query: String) -> SubmitOutcome {
        let resolution = self.current.resolve(&query).await;
        let session = Session::new(
            generation,
            query.as_str(),
            resolution.location,
            resolution.current,
            resolution.notices,
        );
        let coordinates = session.location.coordinates();

        let published = self.state.send_if_modified(|snapshot| {
            if snapshot.generation != generation {
                return false;
            }
            snapshot.loading = false;
            snapshot.session = Some(Arc::new(session));
            true
        });
        if !published {
            debug!("Discarding current conditions for superseded search '{}'", query);
            return SubmitOutcome::Superseded { generation };
        }

        let today = (self.clock)();
        let history = async {
            let range = self.historical.resolve(&query, coordinates, today).await;
            self.commit(generation, |session| session.with_history(range))
        };
        let air_quality = async {
            let sample = self.air_quality.resolve(coordinates).await;
            self.commit(generation, |session| session.with_air_quality(sample))
        };
        futures::join!(history, air_quality);

        let snapshot = self.state.borrow();
        match &snapshot.session {
            Some(session) if snapshot.generation == generation => {
                info!("Search '{}' complete", query);
                SubmitOutcome::Completed(Arc::clone(session))
            }
            _ => SubmitOutcome::Superseded { generation },
        }
    }

    /// Publish `update` applied to the live session, if `generation` is still current
    fn commit(&self, generation: Generation, update: impl FnOnce(&Session) -> Session) -> bool {
        let committed = self.state.send_if_modified(|snapshot| {
            if snapshot.generation != generation {
                return false;
            }
            let Some(current) = snapshot.session.as_deref() else {
                return false;
            };
            snapshot.session = Some(Arc::new(update(current)));
            true
        });

        if !committed {
            debug!("Dropped stale result for generation {}", generation);
        }
        committed
    }
}

fn validate_query(query: &str) -> Result<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(AetherError::validation("Location cannot be empty"));
    }
    Ok(trimmed)
}
