//! Error handling module for the form engine.
//!
//! Provides the crate error type with stable codes that the bridge reports to the host.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
    pub const TRANSPORT_ERROR: &str = "TRANSPORT_ERROR";
    pub const UPSTREAM_STATUS: &str = "UPSTREAM_STATUS";
    pub const DECODE_ERROR: &str = "DECODE_ERROR";
    pub const BAD_EVENT: &str = "BAD_EVENT";
    pub const UNKNOWN_ROW: &str = "UNKNOWN_ROW";
    pub const IO_ERROR: &str = "IO_ERROR";
}

/// Form engine error type.
#[derive(Debug, Error)]
pub enum FormError {
    /// Configuration could not be loaded
    #[error("{code}: {0}", code = codes::CONFIG_ERROR)]
    Config(String),
    /// The request never produced a response (connect, timeout, ...)
    #[error("{code}: {0}", code = codes::TRANSPORT_ERROR)]
    Transport(String),
    /// The backend answered with a non-success status
    #[error("{code}: {url} answered {status}", code = codes::UPSTREAM_STATUS)]
    Status { url: String, status: u16 },
    /// A payload could not be decoded
    #[error("{code}: {0}", code = codes::DECODE_ERROR)]
    Decode(String),
    /// An inbound event was malformed
    #[error("{code}: {0}", code = codes::BAD_EVENT)]
    BadEvent(String),
    /// A control id did not carry a row index
    #[error("{code}: no row index in control id {0:?}", code = codes::UNKNOWN_ROW)]
    UnknownRow(String),
    /// Reading or writing the bridge streams failed
    #[error("{code}: {0}", code = codes::IO_ERROR)]
    Io(#[from] std::io::Error),
}

impl FormError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            FormError::Config(_) => codes::CONFIG_ERROR,
            FormError::Transport(_) => codes::TRANSPORT_ERROR,
            FormError::Status { .. } => codes::UPSTREAM_STATUS,
            FormError::Decode(_) => codes::DECODE_ERROR,
            FormError::BadEvent(_) => codes::BAD_EVENT,
            FormError::UnknownRow(_) => codes::UNKNOWN_ROW,
            FormError::Io(_) => codes::IO_ERROR,
        }
    }

    /// Get the error message without the code prefix.
    pub fn message(&self) -> String {
        match self {
            FormError::Config(msg)
            | FormError::Transport(msg)
            | FormError::Decode(msg)
            | FormError::BadEvent(msg) => msg.clone(),
            FormError::Status { url, status } => format!("{} answered {}", url, status),
            FormError::UnknownRow(id) => format!("no row index in control id {:?}", id),
            FormError::Io(err) => err.to_string(),
        }
    }
}

impl From<reqwest::Error> for FormError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            let url = err.url().map(|u| u.to_string()).unwrap_or_default();
            tracing::warn!("Upstream status error: {} from {}", status, url);
            return FormError::Status {
                url,
                status: status.as_u16(),
            };
        }
        if err.is_decode() {
            tracing::warn!("Undecodable response: {:?}", err);
            return FormError::Decode(format!("Response decode error: {}", err));
        }
        tracing::error!("Transport error: {:?}", err);
        FormError::Transport(format!("Transport error: {}", err))
    }
}

impl From<serde_json::Error> for FormError {
    fn from(err: serde_json::Error) -> Self {
        tracing::warn!("JSON error: {:?}", err);
        FormError::BadEvent(format!("JSON error: {}", err))
    }
}

/// Error details as reported on the bridge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

impl From<&FormError> for ErrorDetails {
    fn from(err: &FormError) -> Self {
        Self {
            code: err.error_code().to_string(),
            message: err.message(),
        }
    }
}
