//! Error handling for msgtrace-core
//!
//! The interception layer itself never fails a call: every error in this
//! module belongs either to pipeline construction (invalid or duplicate step
//! names), to the transport (which propagates to the caller untouched), or to
//! configuration loading.

use thiserror::Error;

/// Result type alias for msgtrace operations
pub type Result<T> = std::result::Result<T, MsgTraceError>;

/// Main error type for the msgtrace-core library
#[derive(Debug, Error)]
pub enum MsgTraceError {
    /// Middleware pipeline errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
    /// Errors raised by the underlying transport
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    /// Serialization/deserialization errors
    #[error("Serialization error: {details}")]
    Serialization {
        /// Failure details
        details: String,
    },
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Generic errors with context
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Middleware pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A step with the same name is already registered
    #[error("Middleware '{name}' is already registered")]
    DuplicateName {
        /// Step name
        name: String,
    },
    /// The client does not expose a middleware stack
    #[error("Client '{client}' does not expose a middleware stack")]
    StackUnavailable {
        /// Client name
        client: String,
    },
}

/// Errors raised by the transport that executes commands
#[derive(Debug, Error)]
pub enum TransportError {
    /// The remote service rejected the command
    #[error("Command '{command}' was rejected: {reason}")]
    Rejected { command: String, reason: String },
    /// The command is not supported by this transport
    #[error("Command '{command}' is not supported")]
    UnsupportedCommand { command: String },
    /// The transport could not reach the service
    #[error("Service unreachable: {endpoint}")]
    Unreachable { endpoint: String },
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid value for '{key}': '{value}' (expected: {expected})")]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },
    /// Configuration parsing failed
    #[error("Failed to parse configuration '{path}': {reason}")]
    ParsingFailed { path: String, reason: String },
}

/// Validation errors
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Required field missing
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },
    /// Invalid format
    #[error("Invalid format for field '{field}': '{value}' (expected: {expected_format})")]
    InvalidFormat {
        field: String,
        value: String,
        expected_format: String,
    },
}

impl From<serde_json::Error> for MsgTraceError {
    fn from(err: serde_json::Error) -> Self {
        MsgTraceError::Serialization {
            details: err.to_string(),
        }
    }
}

#[cfg(feature = "config-support")]
impl From<toml::de::Error> for MsgTraceError {
    fn from(err: toml::de::Error) -> Self {
        MsgTraceError::Config(ConfigError::ParsingFailed {
            path: "<inline>".to_string(),
            reason: err.to_string(),
        })
    }
}

impl MsgTraceError {
    /// Create a generic error with a message
    pub fn other<S: Into<String>>(message: S) -> Self {
        MsgTraceError::Other {
            message: message.into(),
            source: None,
        }
    }

    /// Check if this is a recoverable error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            MsgTraceError::Transport(TransportError::Unreachable { .. })
                | MsgTraceError::Pipeline(PipelineError::DuplicateName { .. })
        )
    }
}
