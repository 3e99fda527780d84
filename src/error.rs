use thiserror::Error;

use crate::domain::error::DomainError;

/// Configuration-related errors with structured variants.
///
/// These are fatal at startup only; nothing at cycle time produces them.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors raised by the marketplace fetch boundary.
///
/// Always recoverable: a failed fetch is retried on the next scheduled
/// cycle, never inline. Distinguishable from a successful empty snapshot.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {endpoint}")]
    Status { status: u16, endpoint: String },

    #[error("malformed payload: {0}")]
    Payload(String),
}

/// Errors raised by the history store.
///
/// Item-scoped: a failing append or read affects one product's processing
/// in one cycle and must never corrupt other products' logs.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("connection pool error: {0}")]
    Pool(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("failed to decode stored entry: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by a single notification channel.
///
/// Channel-scoped and never escalated; the fan-out sink aggregates them.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("output channel unavailable: {0}")]
    ChannelUnavailable(String),

    #[error("delivery failed: {0}")]
    Delivery(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Notify(#[from] NotifyError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;
