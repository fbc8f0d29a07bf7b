//! Slaney-style mel filterbank.
//!
//! Linear below 1 kHz, logarithmic above, with each triangle normalized to
//! unit area (`2 / (f_right - f_left)`).

use crate::types::MelSpectrogram;

const F_SP: f64 = 200.0 / 3.0;
const MIN_LOG_HZ: f64 = 1000.0;
const MIN_LOG_MEL: f64 = MIN_LOG_HZ / F_SP;

fn logstep() -> f64 {
    6.4f64.ln() / 27.0
}

pub fn hz_to_mel(hz: f64) -> f64 {
    if hz >= MIN_LOG_HZ {
        MIN_LOG_MEL + (hz / MIN_LOG_HZ).ln() / logstep()
    } else {
        hz / F_SP
    }
}

pub fn mel_to_hz(mel: f64) -> f64 {
    if mel >= MIN_LOG_MEL {
        MIN_LOG_HZ * (logstep() * (mel - MIN_LOG_MEL)).exp()
    } else {
        F_SP * mel
    }
}

/// Triangular filters projecting `n_fft / 2 + 1` linear bins onto `n_mels` bands.
#[derive(Clone, Debug)]
pub struct MelFilterbank {
    n_mels: usize,
    n_freqs: usize,
    /// Row-major: `weights[mel * n_freqs + bin]`.
    weights: Vec<f32>,
}

impl MelFilterbank {
    pub fn new(n_mels: usize, n_fft: usize, sample_rate: u32, f_min: f32, f_max: f32) -> Self {
        let n_freqs = n_fft / 2 + 1;
        let sr = sample_rate as f64;

        let fft_freqs: Vec<f64> = (0..n_freqs).map(|k| k as f64 * sr / n_fft as f64).collect();

        // n_mels + 2 edges, evenly spaced on the mel axis
        let mel_min = hz_to_mel(f_min as f64);
        let mel_max = hz_to_mel(f_max as f64);
        let edges: Vec<f64> = (0..n_mels + 2)
            .map(|i| mel_to_hz(mel_min + (mel_max - mel_min) * i as f64 / (n_mels + 1) as f64))
            .collect();

        let mut weights = vec![0.0f32; n_mels * n_freqs];
        for m in 0..n_mels {
            let (left, center, right) = (edges[m], edges[m + 1], edges[m + 2]);
            let enorm = 2.0 / (right - left);
            let row = &mut weights[m * n_freqs..(m + 1) * n_freqs];
            for (w, &f) in row.iter_mut().zip(fft_freqs.iter()) {
                let lower = (f - left) / (center - left);
                let upper = (right - f) / (right - center);
                *w = (lower.min(upper).max(0.0) * enorm) as f32;
            }
            if row.iter().all(|&w| w == 0.0) {
                log::warn!(
                    "mel band {m} ({left:.1}-{right:.1} Hz) covers no FFT bin; it will stay empty"
                );
            }
        }

        Self {
            n_mels,
            n_freqs,
            weights,
        }
    }

    pub fn n_mels(&self) -> usize {
        self.n_mels
    }

    pub fn n_freqs(&self) -> usize {
        self.n_freqs
    }

    pub fn filter(&self, mel: usize) -> &[f32] {
        &self.weights[mel * self.n_freqs..(mel + 1) * self.n_freqs]
    }

    /// Project power frames (each `n_freqs` long) onto the mel bands.
    pub fn apply(&self, frames: &[Vec<f32>]) -> MelSpectrogram {
        let n_frames = frames.len();
        let mut data = vec![0.0f32; self.n_mels * n_frames];
        for (t, frame) in frames.iter().enumerate() {
            for m in 0..self.n_mels {
                data[m * n_frames + t] = self
                    .filter(m)
                    .iter()
                    .zip(frame.iter())
                    .map(|(w, p)| w * p)
                    .sum();
            }
        }
        MelSpectrogram {
            n_mels: self.n_mels,
            n_frames,
            data,
        }
    }
}
