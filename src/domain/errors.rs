//! Domain error types
//!
//! This module defines the error hierarchy for geobatch.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main geobatch error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum GeobatchError {
    /// Configuration-related errors (fatal before any lookup happens)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Input file errors (unreadable file, malformed rows)
    #[error("Input error: {0}")]
    Input(String),

    /// Geocoding provider errors
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Checkpoint persistence errors
    #[error("Checkpoint error: {0}")]
    Checkpoint(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Geocoding provider errors
///
/// Transport-level failures reported by a provider adapter. A provider that
/// simply cannot find an address does not produce one of these; it returns
/// [`crate::domain::Lookup::NotFound`] instead.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Failed to reach the provider
    #[error("Failed to connect to {provider}: {message}")]
    ConnectionFailed { provider: String, message: String },

    /// Request timed out
    #[error("Request to {provider} timed out: {message}")]
    Timeout { provider: String, message: String },

    /// Server error (5xx)
    #[error("Server error from {provider}: {status} - {message}")]
    ServerError {
        provider: String,
        status: u16,
        message: String,
    },

    /// Client error (4xx, or an error object in a 200 body)
    #[error("Client error from {provider}: {status} - {message}")]
    ClientError {
        provider: String,
        status: u16,
        message: String,
    },

    /// Response body could not be understood
    #[error("Invalid response from {provider}: {message}")]
    InvalidResponse { provider: String, message: String },

    /// HTTP session could not be built
    #[error("Failed to create HTTP session: {0}")]
    Session(String),
}

impl ProviderError {
    /// Classify a reqwest failure without leaking the reqwest type
    pub(crate) fn from_transport(provider: &str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout {
                provider: provider.to_string(),
                message: err.to_string(),
            }
        } else if err.is_decode() {
            ProviderError::InvalidResponse {
                provider: provider.to_string(),
                message: err.to_string(),
            }
        } else {
            ProviderError::ConnectionFailed {
                provider: provider.to_string(),
                message: err.to_string(),
            }
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for GeobatchError {
    fn from(err: std::io::Error) -> Self {
        GeobatchError::Io(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for GeobatchError {
    fn from(err: toml::de::Error) -> Self {
        GeobatchError::Configuration(format!("TOML parse error: {err}"))
    }
}
