//! Error types for transform configuration and execution.

use sonaug_signal::SignalError;
use thiserror::Error;

/// Result type for transform operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Errors that can occur while configuring or running transforms.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Required configuration missing or unusable. Raised at construction
    /// or instantiation, never deferred to `apply`.
    #[error("configuration error: {message}")]
    Configuration {
        /// What was wrong with the configuration.
        message: String,
    },

    /// A parameter the transform needs is absent from the bundle.
    #[error("missing parameter '{key}'")]
    MissingParam {
        /// The absent key.
        key: String,
    },

    /// A parameter is present but holds the wrong variant.
    #[error("parameter '{key}' has wrong type: expected {expected}")]
    WrongParamType {
        /// The offending key.
        key: String,
        /// The variant the caller asked for.
        expected: &'static str,
    },

    /// Signal load/derive failure.
    #[error(transparent)]
    Signal(#[from] SignalError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransformError {
    /// Creates a configuration error from a message.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a missing-parameter error.
    pub fn missing_param(key: impl Into<String>) -> Self {
        Self::MissingParam { key: key.into() }
    }
}
