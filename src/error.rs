// src/error.rs
//! Application error types with structured error handling.
//!
//! Three families of failure exist: bad operator input, transport
//! failures against the private API, and local file problems. Shape
//! anomalies in API responses are deliberately absent from this list:
//! missing tables, empty records and absent children degrade to empty
//! results instead of errors.

use std::path::PathBuf;
use thiserror::Error;

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("no notion auth values found; paste a full 'Copy as cURL' request including headers")]
    NoCredentialsFound,

    #[error("Network failure calling {endpoint}: {source}")]
    NetworkFailure {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("notion request to {endpoint} failed: status={status} body={body}")]
    NotionService {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    #[error("{table} record {id} not found in response")]
    RecordNotFound { table: String, id: String },

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    ValidationError(#[from] crate::types::ValidationError),

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<AppError>,
    },
}

impl AppError {
    /// Whether the private API answered but refused the request.
    ///
    /// An expired `token_v2` shows up as 401 or 403 rather than a network error.
    pub fn is_auth_rejection(&self) -> bool {
        match self {
            Self::NotionService { status, .. } => matches!(status, 401 | 403),
            Self::Context { source, .. } => source.is_auth_rejection(),
            _ => false,
        }
    }

    /// Prefixes the error with what the command was doing.
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;
