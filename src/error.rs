//! Error types and handling for Greenplug
//!
//! This module defines the error types used throughout the application,
//! providing consistent error handling and reporting.

use thiserror::Error;

/// Result type alias for Greenplug operations
pub type Result<T> = std::result::Result<T, GreenplugError>;

/// Main error type for Greenplug
#[derive(Debug, Error)]
pub enum GreenplugError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// Provider payload missing fields, unparseable tokens or a bad date
    #[error("Malformed reading: {message}")]
    MalformedReading { message: String },

    /// Structurally valid reading with degenerate values (e.g. zero load)
    #[error("Invalid reading: {message}")]
    InvalidReading { message: String },

    /// HTTP transport failures against the provider or switch endpoints
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Metrics sink failures (non-fatal for the run)
    #[error("Metrics sink error: {message}")]
    MetricsSink { message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },
}

impl GreenplugError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        GreenplugError::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        GreenplugError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new malformed-reading error
    pub fn malformed_reading<S: Into<String>>(message: S) -> Self {
        GreenplugError::MalformedReading {
            message: message.into(),
        }
    }

    /// Create a new invalid-reading error
    pub fn invalid_reading<S: Into<String>>(message: S) -> Self {
        GreenplugError::InvalidReading {
            message: message.into(),
        }
    }

    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        GreenplugError::Transport {
            message: message.into(),
        }
    }

    /// Create a new metrics sink error
    pub fn metrics_sink<S: Into<String>>(message: S) -> Self {
        GreenplugError::MetricsSink {
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        GreenplugError::Io {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for GreenplugError {
    fn from(err: std::io::Error) -> Self {
        GreenplugError::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for GreenplugError {
    fn from(err: serde_yaml::Error) -> Self {
        GreenplugError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for GreenplugError {
    fn from(err: reqwest::Error) -> Self {
        GreenplugError::transport(err.to_string())
    }
}

impl From<chrono::ParseError> for GreenplugError {
    fn from(err: chrono::ParseError) -> Self {
        GreenplugError::malformed_reading(err.to_string())
    }
}
