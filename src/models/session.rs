//! Session: the replace-only bundle tied to one location search

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{AirQualitySample, CurrentConditions, HistoricalRange, LocationRef};
use crate::condition::ConditionCategory;

/// Monotonically increasing search counter
pub type Generation = u64;

/// A slot filled in the background after the session is first published
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum Resolution<T> {
    #[default]
    Pending,
    Resolved(T),
}

impl<T> Resolution<T> {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    pub fn resolved(&self) -> Option<&T> {
        match self {
            Self::Resolved(value) => Some(value),
            Self::Pending => None,
        }
    }
}

/// User-visible, non-fatal notices attached to a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    /// Live services could not be reached; the session shows synthetic data
    DegradedService { message: String },
    /// The provider did not recognise the query; the session shows synthetic data
    LocationNotFound { query: String },
}

impl Notice {
    pub fn degraded_service() -> Self {
        Self::DegradedService {
            message: "Could not reach weather services. Using simulation mode.".to_string(),
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::DegradedService { message } => message.clone(),
            Self::LocationNotFound { query } => {
                format!("No weather data found for '{query}'. Showing simulated conditions.")
            }
        }
    }
}

/// Immutable session state. Each update produces a new `Session`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub generation: Generation,
    /// The query as the user typed it
    pub query: String,
    pub location: LocationRef,
    pub current: CurrentConditions,
    /// Theme category derived from the current description
    pub condition: ConditionCategory,
    pub history: Resolution<HistoricalRange>,
    /// `Resolved(None)` means the reading is unavailable, which is final
    pub air_quality: Resolution<Option<AirQualitySample>>,
    pub notices: Vec<Notice>,
}

impl Session {
    /// Session as first published, before background fetches finish
    pub fn new(
        generation: Generation,
        query: impl Into<String>,
        location: LocationRef,
        current: CurrentConditions,
        notices: Vec<Notice>,
    ) -> Self {
        let condition = ConditionCategory::classify(&current.description);
        Self {
            generation,
            query: query.into(),
            location,
            current,
            condition,
            history: Resolution::Pending,
            air_quality: Resolution::Pending,
            notices,
        }
    }

    pub fn with_history(&self, history: HistoricalRange) -> Self {
        Self {
            history: Resolution::Resolved(history),
            ..self.clone()
        }
    }

    pub fn with_air_quality(&self, sample: Option<AirQualitySample>) -> Self {
        Self {
            air_quality: Resolution::Resolved(sample),
            ..self.clone()
        }
    }

    /// Both background slots have resolved
    pub fn is_complete(&self) -> bool {
        self.history.is_resolved() && self.air_quality.is_resolved()
    }

    pub fn air_quality_sample(&self) -> Option<&AirQualitySample> {
        self.air_quality.resolved().and_then(Option::as_ref)
    }

    pub fn degraded_notice_count(&self) -> usize {
        self.notices
            .iter()
            .filter(|notice| matches!(notice, Notice::DegradedService { .. }))
            .count()
    }
}

/// What the orchestrator publishes to consumers
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub generation: Generation,
    /// True only while current conditions are outstanding
    pub loading: bool,
    pub session: Option<Arc<Session>>,
}

impl SessionSnapshot {
    pub fn loading(generation: Generation) -> Self {
        Self {
            generation,
            loading: true,
            session: None,
        }
    }
}
