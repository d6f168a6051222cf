//! Error types for the notifier.

/// Top-level error type for the bridge.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Stream error: {0}")]
    Stream(#[from] StreamError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

/// Configuration-related errors. Any of these is startup-fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Record payload decode failures. Each one drops exactly one record.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Payload is not valid UTF-8: {0}")]
    TextDecode(#[from] std::str::Utf8Error),

    #[error("Payload is not valid JSON: {0}")]
    StructureParse(#[from] serde_json::Error),

    #[error("Payload has no usable recipient address")]
    MissingRecipient,

    #[error("Payload ticketData is absent or malformed: {0}")]
    MissingTicketData(String),
}

/// Message-stream errors.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("Failed to connect to stream: {0}")]
    Connect(String),

    #[error("Broker-reported poll error: {0}")]
    Broker(String),

    #[error("Stream subscription closed: {0}")]
    Closed(String),
}

impl StreamError {
    /// Transient errors are logged and the loop keeps polling;
    /// everything else terminates it.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Broker(_))
    }
}

/// Mail dispatch errors. Logged with the recipient, never retried.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Invalid mail address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Failed to build mail message: {0}")]
    Message(String),

    #[error("SMTP transport failure: {0}")]
    Transport(String),
}

/// Result type alias for the bridge.
pub type Result<T> = std::result::Result<T, Error>;
