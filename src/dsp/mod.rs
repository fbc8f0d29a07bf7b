//! Spectral analysis and dynamic-range compression.
//!
//! Window and hop sizes are fixed: every image is computed with a 2048-sample
//! periodic Hann window advanced by 512 samples, frames centered on
//! `t * HOP_LENGTH`.

pub mod db;
pub mod fft;
pub mod mel;

use crate::error::{MelgramError, MelgramResult};
use crate::types::{MelSpectrogram, Waveform};
use mel::MelFilterbank;

/// STFT window length in samples.
pub const N_FFT: usize = 2048;

/// STFT hop in samples.
pub const HOP_LENGTH: usize = 512;

/// Compute the mel power spectrogram of a waveform.
///
/// The filterbank must have been built for the waveform's sample rate and
/// [`N_FFT`]. Fails with `InsufficientAudio` on an empty waveform.
pub fn mel_power_spectrogram(
    waveform: &Waveform,
    filterbank: &MelFilterbank,
) -> MelgramResult<MelSpectrogram> {
    if waveform.is_empty() {
        return Err(MelgramError::InsufficientAudio);
    }
    let frames = fft::stft_power(&waveform.samples, N_FFT, HOP_LENGTH);
    let spec = filterbank.apply(&frames);
    log::debug!(
        "mel spectrogram: {} samples @ {} Hz -> {}x{}",
        waveform.len(),
        waveform.sample_rate,
        spec.n_mels,
        spec.n_frames
    );
    Ok(spec)
}
