//! Data models for Aether
//!
//! This module contains the normalized domain models organized by concern:
//! - Location: resolved place and coordinates
//! - Weather: current conditions and daily records
//! - History: the trailing seven-day window and its record set
//! - Air quality: current pollutant reading
//! - Session: the replace-only bundle published to consumers

pub mod air_quality;
pub mod history;
pub mod location;
pub mod session;
pub mod weather;

// Re-export all public types for convenient access
pub use air_quality::{AirQualitySample, AqiCategory};
pub use history::{HistoricalRange, HistoricalWindow, WINDOW_DAYS};
pub use location::{Coordinates, LocationRef};
pub use session::{Generation, Notice, Resolution, Session, SessionSnapshot};
pub use weather::{CurrentConditions, DayRecord, FeelsLike};
