//! Error types and handling for the Aether weather pipeline

use thiserror::Error;

/// Failure of a single provider request, classified by how the fallback
/// chain reacts to it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The request never reached the provider or never came back usable
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// The provider answered with an explicit error payload
    #[error("Provider error{}: {info}", code_suffix(.code))]
    Application { code: Option<i64>, info: String },

    /// The provider answered but required fields were missing or malformed
    #[error("Schema error: {message}")]
    Schema { message: String },

    /// Air quality could not be resolved; never surfaced to the user
    #[error("Air quality unavailable: {message}")]
    AirQualityUnavailable { message: String },
}

fn code_suffix(code: &Option<i64>) -> String {
    code.map(|c| format!(" {c}")).unwrap_or_default()
}

/// Weatherstack answers `615` when the query matched no known location.
pub const LOCATION_NOT_FOUND_CODE: i64 = 615;

impl FetchError {
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn application<S: Into<String>>(code: Option<i64>, info: S) -> Self {
        Self::Application {
            code,
            info: info.into(),
        }
    }

    pub fn schema<S: Into<String>>(message: S) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    pub fn air_quality_unavailable<S: Into<String>>(message: S) -> Self {
        Self::AirQualityUnavailable {
            message: message.into(),
        }
    }

    /// Transport failures move the chain on to its next step.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Application and schema failures end the live chain silently.
    pub fn is_provider_rejection(&self) -> bool {
        matches!(self, Self::Application { .. } | Self::Schema { .. })
    }

    pub fn is_location_not_found(&self) -> bool {
        matches!(
            self,
            Self::Application {
                code: Some(LOCATION_NOT_FOUND_CODE),
                ..
            }
        )
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::transport(format!("request timed out: {err}"))
        } else {
            FetchError::transport(err.to_string())
        }
    }
}

/// Main error type for the Aether library
#[derive(Error, Debug)]
pub enum AetherError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// HTTP client construction errors
    #[error("HTTP client error: {message}")]
    Client { message: String },

}

impl AetherError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn client<S: Into<String>>(message: S) -> Self {
        Self::Client {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AetherError::Config { .. } => {
                "Configuration error. Please check your config file and access key.".to_string()
            }
            AetherError::Validation { message } => format!("Invalid input: {message}"),
            AetherError::Client { .. } => {
                "Unable to connect to weather services. Please check your internet connection."
                    .to_string()
            }
        }
    }
}
