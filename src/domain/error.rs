//! Domain Errors
//!
//! A single tagged error type shared by the resolver, the sunrise proxy and
//! their outbound adapters. The inbound adapter maps each variant to an HTTP
//! status.

use thiserror::Error;

/// Failure taxonomy for location and sunrise lookups.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BedtimeError {
    /// A required parameter was missing or malformed. Correctable by the caller.
    #[error("{0}")]
    InvalidInput(String),

    /// A dependency answered with a non-success status, a failure envelope,
    /// or could not be reached at all (`status` is `None`).
    #[error("{message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    /// A dependency answered successfully but the payload is unusable.
    #[error("{0}")]
    Data(String),
}

impl BedtimeError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Upstream returned an HTTP error status.
    pub fn upstream_status(status: u16, status_text: &str) -> Self {
        Self::Upstream {
            status: Some(status),
            message: format!("External API error: {}", status_text),
        }
    }

    /// Upstream failed without an HTTP status we can pass through.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            status: None,
            message: message.into(),
        }
    }

    pub fn data(message: impl Into<String>) -> Self {
        Self::Data(message.into())
    }

    /// Upstream HTTP status carried by this error, if any.
    pub fn upstream_status_code(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BedtimeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::upstream("External API timed out")
        } else if err.is_decode() {
            Self::data(format!("Malformed upstream payload: {}", err))
        } else {
            Self::upstream(format!("External API unreachable: {}", err))
        }
    }
}
