use std::error::Error;

use thiserror::Error;

/// Error type for publish operations.
///
/// Every variant is treated the same way by the dispatch core: the inbound
/// message that caused the publish is requeued.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Connection to the bus failed
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    /// Serialization of the event failed
    #[error("serialization failed: {0}")]
    SerializationFailed(String),
    /// The bus rejected the event
    #[error("event rejected: {0}")]
    Rejected(String),
    /// Subscriber-side failure (ack/nack could not be delivered)
    #[error("settle failed: {0}")]
    SettleFailed(String),
    /// Anything else, including a publisher that panicked
    #[error("publish error: {0}")]
    Other(#[source] Box<dyn Error + Send + Sync>),
}

impl From<bitcode::Error> for PublishError {
    fn from(err: bitcode::Error) -> Self {
        PublishError::SerializationFailed(err.to_string())
    }
}

/// Payload of an inbound envelope could not be turned into an event.
#[derive(Debug, Error)]
#[error("cannot decode {kind} payload of envelope {id}: {reason}")]
pub struct DecodeError {
    pub id: String,
    pub kind: String,
    pub reason: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(String),
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("{field} must not contain '.', '*' or '#': {value}")]
    InvalidSegment { field: &'static str, value: String },
    #[error("invalid value for {var}: {value}")]
    InvalidEnv { var: &'static str, value: String },
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(err.to_string())
    }
}
