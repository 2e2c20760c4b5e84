//! Defines the application's primary error type `AppError` and a convenience `Result` alias.
//!
//! Uses the `thiserror` crate for ergonomic error definition and provides `From`
//! implementations to convert common external errors into `AppError` variants.
//! Errors that do not implement `Clone` are wrapped in `Arc` to allow `AppError` to be cloneable.

use std::sync::Arc;
use thiserror::Error;

/// The primary error enumeration for all application-specific errors.
///
/// Upstream failures split into two kinds: `UpstreamStatus` for a non-2xx
/// response (status code plus body text), and `Transport` for anything that
/// happened below the HTTP layer (connect, timeout, body decode). Both are
/// caught at the API client boundary and converted into a per-stream error
/// status by the sensors; they never escape a refresh cycle.
#[derive(Error, Debug, Clone)]
pub enum AppError {
    /// Non-2xx HTTP response from a Google API endpoint.
    #[error("upstream returned HTTP {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// Network-level failure (connection, timeout, malformed body) from `reqwest`.
    #[error("transport error: {0}")]
    Transport(Arc<reqwest::Error>),

    /// Error during JSON parsing (`serde_json`). Wrapped in Arc as serde_json::Error is not Clone.
    #[error("JSON parsing error: {0}")]
    JsonParse(Arc<serde_json::Error>),

    /// Invalid configuration (out-of-range interval or forecast length).
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Error related to accessing environment variables.
    #[error("environment error: {0}")]
    Env(#[from] std::env::VarError),
}

/// A specialized `Result` type using the application's `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport(Arc::new(err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::JsonParse(Arc::new(err))
    }
}
