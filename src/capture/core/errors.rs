//! Error types for the capture subsystem.

use thiserror::Error;

/// Capture subsystem error type.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Invalid configuration or unsupported values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Invalid item content.
    #[error("invalid item: {0}")]
    InvalidItem(String),
    /// `SQLite` storage error (sync).
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// `SQLite` storage error (async).
    #[error("tokio-rusqlite error: {0}")]
    TokioSqlite(#[from] tokio_rusqlite::Error),
    /// HTTP client error from Rig.
    #[error("http client error: {0}")]
    HttpClient(#[from] rig::http_client::Error),
    /// Completion error.
    #[error("completion error: {0}")]
    Completion(#[from] rig::completion::CompletionError),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// URL parse error.
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// A store call exceeded its bounded timeout.
    #[error("store operation timed out after {0} seconds")]
    StoreTimeout(u64),
    /// A completion call exceeded its bounded timeout.
    #[error("completion timed out after {0} seconds")]
    CompletionTimeout(u64),
    /// The completion response was not well-formed for the requested
    /// contract (non-JSON, missing fields, unknown label).
    #[error("malformed completion response: {0}")]
    MalformedCompletion(String),
}

/// Convenience result alias for capture operations.
pub type CaptureResult<T> = Result<T, CaptureError>;
