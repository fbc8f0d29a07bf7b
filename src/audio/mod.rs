//! Audio input: decoding, downmixing and resampling.

pub mod loader;
pub mod resample;

pub use loader::{decode_audio_bytes, load_audio};
pub use resample::Resampler;

use crate::error::MelgramResult;
use crate::types::Waveform;
use std::path::Path;

/// Load a file and bring it to `target_sample_rate`, mono.
pub fn load_resampled(path: impl AsRef<Path>, target_sample_rate: u32) -> MelgramResult<Waveform> {
    let native = load_audio(path)?;
    Resampler::new(target_sample_rate).resample(&native)
}
