//! Dynamic-range compression: power → dB relative to peak → 8-bit.
//!
//! Normalization is per grid. Two recordings with the same spectral shape but
//! different loudness produce the same pixels; intensity is relative, not
//! absolute.

use crate::types::{DecibelGrid, MelSpectrogram, NormalizedGrid};

/// Floor applied to power values before taking the logarithm.
pub const AMIN: f32 = 1e-10;

/// Values more than this many dB below the peak are raised to `-TOP_DB`.
pub const TOP_DB: f32 = 80.0;

/// Convert a power spectrogram to dB relative to its own maximum.
///
/// The peak maps to exactly 0 dB, everything else lies in `[-TOP_DB, 0]`.
pub fn power_to_db(spec: &MelSpectrogram) -> DecibelGrid {
    let p_max = spec.data.iter().copied().fold(0.0f32, f32::max);
    let ref_db = 10.0 * p_max.max(AMIN).log10();

    let data = spec
        .data
        .iter()
        .map(|&p| (10.0 * p.max(AMIN).log10() - ref_db).max(-TOP_DB))
        .collect();

    DecibelGrid {
        n_mels: spec.n_mels,
        n_frames: spec.n_frames,
        data,
    }
}

/// Min-max rescale a decibel grid to `0..=255`, truncating toward zero.
///
/// A grid with no spread (e.g. digital silence) becomes all zeros with
/// `degenerate` set.
pub fn normalize(grid: &DecibelGrid) -> NormalizedGrid {
    let db_min = grid.min();
    let db_max = grid.max();
    let range = db_max - db_min;

    if !(range.is_finite() && range > 0.0) {
        log::warn!(
            "decibel grid {}x{} has no dynamic range (min {db_min}, max {db_max}); emitting a constant image",
            grid.n_mels,
            grid.n_frames
        );
        return NormalizedGrid {
            n_mels: grid.n_mels,
            n_frames: grid.n_frames,
            data: vec![0; grid.data.len()],
            degenerate: true,
        };
    }

    // Divide before scaling so db_max lands on exactly 255.
    let data = grid
        .data
        .iter()
        .map(|&db| ((db - db_min) / range * 255.0).clamp(0.0, 255.0) as u8)
        .collect();

    NormalizedGrid {
        n_mels: grid.n_mels,
        n_frames: grid.n_frames,
        data,
        degenerate: false,
    }
}
