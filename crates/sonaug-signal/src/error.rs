//! Error types for signal loading and processing.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for signal operations.
pub type SignalResult<T> = Result<T, SignalError>;

/// Errors that can occur while loading, deriving, or writing signals.
#[derive(Debug, Error)]
pub enum SignalError {
    /// WAV decode or encode failure, with the file's path for context.
    #[error("WAV error at {path}: {source}")]
    Wav {
        /// Path of the offending file.
        path: PathBuf,
        /// Underlying decoder/encoder error.
        #[source]
        source: hound::Error,
    },

    /// Requested load offset lies past the end of the file.
    #[error("offset {offset}s is past the end of {path} ({available:.3}s available)")]
    OffsetPastEnd {
        /// Path of the file being loaded.
        path: PathBuf,
        /// Requested offset in seconds.
        offset: f64,
        /// File duration in seconds.
        available: f64,
    },

    /// Signal construction with no channels or no samples.
    #[error("signal has no samples")]
    Empty,

    /// Channel buffers of unequal length.
    #[error("ragged channel buffers: {lengths:?}")]
    RaggedChannels {
        /// Per-channel sample counts.
        lengths: Vec<usize>,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SignalError {
    /// Wraps a hound error with the path it occurred at.
    pub fn wav(path: impl Into<PathBuf>, source: hound::Error) -> Self {
        Self::Wav {
            path: path.into(),
            source,
        }
    }
}
