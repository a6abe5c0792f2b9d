//! `Aether` - weather lookup with graceful degradation
//!
//! This library resolves a free-text location to current conditions, the
//! trailing seven days of history and an air-quality reading. Every
//! provider failure falls back to synthetic data, so a search always ends in
//! a displayable session.

pub mod condition;
pub mod config;
pub mod error;
pub mod logging;
pub mod mock;
pub mod models;
pub mod orchestrator;
pub mod units;
pub mod weather;

// Re-export core types for public API
pub use condition::ConditionCategory;
pub use config::AetherConfig;
pub use error::{AetherError, FetchError};
pub use mock::MockDataGenerator;
pub use models::{
    AirQualitySample, CurrentConditions, DayRecord, HistoricalRange, LocationRef, Notice, Session,
    SessionSnapshot,
};
pub use orchestrator::{FetchOrchestrator, SubmitOutcome};
pub use units::TemperatureUnit;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, AetherError>;
