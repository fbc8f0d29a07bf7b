//! Error types for melgram.

use thiserror::Error;

/// Main error type for spectrogram image generation.
#[derive(Error, Debug)]
pub enum MelgramError {
    /// The audio resource is missing, unreadable, or cannot be decoded.
    #[error("failed to load audio from {source_name}: {reason}")]
    AudioLoad { source_name: String, reason: String },

    /// Decoding succeeded but produced no samples.
    #[error("audio contains no usable samples")]
    InsufficientAudio,

    #[error("resampling failed: {0}")]
    Resample(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An image does not match the dimensions of the archive it is appended to.
    #[error("image is {actual_width}x{actual_height}, archive expects {expected_width}x{expected_height}")]
    ShapeMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MelgramError {
    pub(crate) fn audio_load(source_name: impl Into<String>, reason: impl ToString) -> Self {
        MelgramError::AudioLoad {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for melgram operations.
pub type MelgramResult<T> = Result<T, MelgramError>;
