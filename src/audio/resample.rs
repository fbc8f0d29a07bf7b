//! Band-limited sample rate conversion using rubato.

use crate::error::{MelgramError, MelgramResult};
use crate::types::Waveform;
use rubato::{
    Resampler as RubatoResampler, SincFixedIn, SincInterpolationParameters,
    SincInterpolationType, WindowFunction,
};

/// Input frames fed to the sinc filter per call.
const CHUNK_SIZE: usize = 1024;

/// Upper bound on silent chunks pushed through to drain the filter.
const MAX_FLUSHES: usize = 16;

/// Windowed-sinc resampler to a fixed target rate.
#[derive(Clone, Debug)]
pub struct Resampler {
    target_sample_rate: u32,
}

impl Resampler {
    pub fn new(target_sample_rate: u32) -> Self {
        Self { target_sample_rate }
    }

    pub fn target_sample_rate(&self) -> u32 {
        self.target_sample_rate
    }

    /// Resample a mono waveform to the target rate.
    ///
    /// The filter delay is removed and the output holds
    /// `ceil(len * target / source)` samples, time-aligned with the input.
    pub fn resample(&self, waveform: &Waveform) -> MelgramResult<Waveform> {
        if waveform.sample_rate == self.target_sample_rate {
            return Ok(waveform.clone());
        }
        if waveform.sample_rate == 0 {
            return Err(MelgramError::Resample("source sample rate is 0".into()));
        }
        if waveform.is_empty() {
            return Ok(Waveform::new(Vec::new(), self.target_sample_rate));
        }

        let ratio = self.target_sample_rate as f64 / waveform.sample_rate as f64;
        let expected = (waveform.len() as f64 * ratio).ceil() as usize;

        let params = SincInterpolationParameters {
            sinc_len: 256,
            f_cutoff: 0.95,
            interpolation: SincInterpolationType::Linear,
            oversampling_factor: 256,
            window: WindowFunction::BlackmanHarris2,
        };
        let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, params, CHUNK_SIZE, 1)
            .map_err(|e| MelgramError::Resample(format!("failed to create resampler: {e}")))?;
        let delay = resampler.output_delay();
        let wanted = delay + expected;
        let mut output = Vec::with_capacity(wanted + resampler.output_frames_max());

        let mut chunks = waveform.samples.chunks_exact(CHUNK_SIZE);
        for chunk in &mut chunks {
            let out = resampler
                .process(&[chunk], None)
                .map_err(|e| MelgramError::Resample(e.to_string()))?;
            output.extend_from_slice(&out[0]);
        }
        let rest = chunks.remainder();
        if !rest.is_empty() {
            let out = resampler
                .process_partial(Some(&[rest][..]), None)
                .map_err(|e| MelgramError::Resample(e.to_string()))?;
            output.extend_from_slice(&out[0]);
        }

        // Flush the filter tail with silence until the delayed signal is complete.
        // A single flush may legitimately yield no frames at low ratios.
        let mut flushes = 0;
        while output.len() < wanted && flushes < MAX_FLUSHES {
            let tail = resampler
                .process_partial(None::<&[Vec<f32>]>, None)
                .map_err(|e| MelgramError::Resample(e.to_string()))?;
            output.extend_from_slice(&tail[0]);
            flushes += 1;
        }

        let mut samples: Vec<f32> = output.into_iter().skip(delay).take(expected).collect();
        if samples.len() < expected {
            log::warn!(
                "resampler produced {} of {expected} samples; padding with silence",
                samples.len()
            );
            samples.resize(expected, 0.0);
        }
        log::debug!(
            "resampled {} -> {} Hz: {} -> {} samples",
            waveform.sample_rate,
            self.target_sample_rate,
            waveform.len(),
            samples.len()
        );
        Ok(Waveform::new(samples, self.target_sample_rate))
    }
}

impl Default for Resampler {
    fn default() -> Self {
        Self::new(8000)
    }
}
