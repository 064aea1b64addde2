//! Error types and handling for Strompris
//!
//! This module defines the error types used throughout the job. Every
//! terminal failure of a run ends up as one of these variants and is turned
//! into a status line and a non-zero exit code by `main`.

use thiserror::Error;

/// Result type alias for Strompris operations
pub type Result<T> = std::result::Result<T, StromprisError>;

/// Main error type for Strompris
#[derive(Debug, Error)]
pub enum StromprisError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// No persisted settings yet; first run
    #[error("Settings not found at {path}")]
    SettingsNotFound { path: String },

    /// Price source unreachable, timed out or answered with a non-success status
    #[error("Price source unavailable: {message}")]
    UpstreamUnavailable { message: String },

    /// Price schedule could not be decoded or lacks the requested hour
    #[error("Malformed price response: {message}")]
    MalformedResponse { message: String },

    /// Credential exchange rejected
    #[error("Authentication error{}: {message}", fmt_status(.status))]
    Auth {
        status: Option<u16>,
        message: String,
    },

    /// Price submission failed for a reason other than an expired credential
    #[error("Price submission failed{}: {message}", fmt_status(.status))]
    SubmissionFailed {
        status: Option<u16>,
        message: String,
    },

    /// Another run holds the lock
    #[error("Another run is in progress: {message}")]
    Locked { message: String },
}

fn fmt_status(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

impl StromprisError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Create a new serialization error
    pub fn serialization<S: Into<String>>(message: S) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new settings-not-found error
    pub fn settings_not_found<S: Into<String>>(path: S) -> Self {
        Self::SettingsNotFound { path: path.into() }
    }

    /// Create a new upstream-unavailable error
    pub fn upstream_unavailable<S: Into<String>>(message: S) -> Self {
        Self::UpstreamUnavailable {
            message: message.into(),
        }
    }

    /// Create a new malformed-response error
    pub fn malformed_response<S: Into<String>>(message: S) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create a new auth error
    pub fn auth<S: Into<String>>(status: Option<u16>, message: S) -> Self {
        Self::Auth {
            status,
            message: message.into(),
        }
    }

    /// Create a new submission error
    pub fn submission_failed<S: Into<String>>(status: Option<u16>, message: S) -> Self {
        Self::SubmissionFailed {
            status,
            message: message.into(),
        }
    }

    /// Create a new lock error
    pub fn locked<S: Into<String>>(message: S) -> Self {
        Self::Locked {
            message: message.into(),
        }
    }

    /// First run: nothing persisted yet
    pub const fn is_settings_not_found(&self) -> bool {
        matches!(self, Self::SettingsNotFound { .. })
    }
}

impl From<std::io::Error> for StromprisError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for StromprisError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

impl From<serde_json::Error> for StromprisError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

impl From<reqwest::Error> for StromprisError {
    fn from(err: reqwest::Error) -> Self {
        Self::upstream_unavailable(err.to_string())
    }
}
