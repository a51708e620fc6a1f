//! Error types for the asset lineage publication pipeline.

use thiserror::Error;

/// Errors raised by an entity store gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("User not authorized: {0}")]
    Unauthorized(String),

    #[error("Metadata store unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while building the lineage context of one entity.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Store query failed while building context: {0}")]
    Store(#[from] StoreError),

    #[error("Context build panicked: {0}")]
    Panicked(String),
}

/// Errors raised by a publish channel.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Publish channel unavailable: {0}")]
    Unavailable(String),

    #[error("Event rejected by channel: {0}")]
    Rejected(String),

    #[error("Event serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Channel I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Request-level errors surfaced to the caller of a publication operation.
#[derive(Debug, Error)]
pub enum LineageError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("User not authorized: {0}")]
    Unauthorized(String),

    #[error("Metadata store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Context build failed: {0}")]
    ContextBuild(#[from] BuildError),

    #[error("Publish failed: {0}")]
    Publish(#[from] PublishError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<StoreError> for LineageError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidInput(msg) => LineageError::InvalidInput(msg),
            StoreError::Unauthorized(msg) => LineageError::Unauthorized(msg),
            StoreError::Unavailable(msg) => LineageError::StoreUnavailable(msg),
        }
    }
}

impl From<config::ConfigError> for LineageError {
    fn from(err: config::ConfigError) -> Self {
        LineageError::Config(err.to_string())
    }
}
