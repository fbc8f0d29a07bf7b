//! The spectrogram image transformer: load → resample → mel → dB → 8-bit →
//! viridis → resize.

use crate::audio::{self, Resampler};
use crate::canvas;
use crate::config::SpectrogramConfig;
use crate::dsp::{self, db, mel::MelFilterbank};
use crate::error::MelgramResult;
use crate::types::{MelSpectrogram, NormalizedGrid, Waveform};
use image::RgbImage;
use std::path::Path;

/// Converts one recording at a time into a fixed-size RGB image.
///
/// Holds only the configuration and the precomputed filterbank, so a single
/// instance can be shared across threads and reused for any number of files.
#[derive(Clone, Debug)]
pub struct SpectrogramTransformer {
    config: SpectrogramConfig,
    filterbank: MelFilterbank,
}

impl SpectrogramTransformer {
    pub fn new(config: SpectrogramConfig) -> MelgramResult<Self> {
        config.validate()?;
        let filterbank = MelFilterbank::new(
            config.n_mels,
            dsp::N_FFT,
            config.sample_rate,
            0.0,
            config.f_max,
        );
        Ok(Self { config, filterbank })
    }

    pub fn config(&self) -> &SpectrogramConfig {
        &self.config
    }

    /// Load the audio file at `path` and transform it.
    pub fn transform_file(&self, path: impl AsRef<Path>) -> MelgramResult<RgbImage> {
        let waveform = audio::load_audio(path)?;
        self.transform_waveform(&waveform)
    }

    /// Decode an in-memory audio file and transform it.
    pub fn transform_bytes(&self, bytes: &[u8], ext_hint: Option<&str>) -> MelgramResult<RgbImage> {
        let waveform = audio::decode_audio_bytes(bytes, ext_hint)?;
        self.transform_waveform(&waveform)
    }

    /// Transform a mono waveform at any sample rate.
    pub fn transform_waveform(&self, waveform: &Waveform) -> MelgramResult<RgbImage> {
        let grid = self.normalized_grid(waveform)?;
        Ok(canvas::render_image(&grid, self.config.width, self.config.height))
    }

    /// Resample if needed, then compute the mel power spectrogram.
    pub fn mel_spectrogram(&self, waveform: &Waveform) -> MelgramResult<MelSpectrogram> {
        let waveform = Resampler::new(self.config.sample_rate).resample(waveform)?;
        dsp::mel_power_spectrogram(&waveform, &self.filterbank)
    }

    /// Everything up to (and including) the 8-bit rescale.
    pub fn normalized_grid(&self, waveform: &Waveform) -> MelgramResult<NormalizedGrid> {
        let spec = self.mel_spectrogram(waveform)?;
        let decibels = db::power_to_db(&spec);
        Ok(db::normalize(&decibels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::colors::viridis;
    use crate::error::MelgramError;

    fn sine(freq: f64, sample_rate: u32, secs: f64) -> Waveform {
        let n = (sample_rate as f64 * secs) as usize;
        let samples = (0..n)
            .map(|i| 0.5 * (2.0 * std::f64::consts::PI * freq * i as f64 / sample_rate as f64).sin() as f32)
            .collect();
        Waveform::new(samples, sample_rate)
    }

    fn transformer() -> SpectrogramTransformer {
        SpectrogramTransformer::new(SpectrogramConfig::default()).unwrap()
    }

    #[test]
    fn test_three_second_sine_end_to_end() {
        let t = transformer();
        let wave = sine(440.0, 8000, 3.0);

        let spec = t.mel_spectrogram(&wave).unwrap();
        assert_eq!(spec.n_mels, 128);
        let expected = 3 * 8000 / dsp::HOP_LENGTH;
        assert!((spec.n_frames as isize - expected as isize).abs() <= 1, "{} frames", spec.n_frames);

        let img = t.transform_waveform(&wave).unwrap();
        assert_eq!(img.dimensions(), (128, 128));
        assert_eq!(img.as_raw().len(), 128 * 128 * 3);
    }

    #[test]
    fn test_output_size_independent_of_duration() {
        let t = transformer();
        for secs in [0.01, 0.2, 1.0, 7.5] {
            let img = t.transform_waveform(&sine(300.0, 8000, secs)).unwrap();
            assert_eq!(img.dimensions(), (128, 128), "{secs} s");
        }
    }

    #[test]
    fn test_deterministic() {
        let t = transformer();
        let wave = sine(1234.0, 16000, 1.3);
        let a = t.transform_waveform(&wave).unwrap();
        let b = t.transform_waveform(&wave).unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_empty_waveform_is_insufficient() {
        let t = transformer();
        let err = t.transform_waveform(&Waveform::new(Vec::new(), 8000)).unwrap_err();
        assert!(matches!(err, MelgramError::InsufficientAudio));

        let err = t.transform_waveform(&Waveform::new(Vec::new(), 44100)).unwrap_err();
        assert!(matches!(err, MelgramError::InsufficientAudio));
    }

    #[test]
    fn test_silence_gives_constant_image() {
        let t = transformer();
        let silence = Waveform::new(vec![0.0; 8000], 8000);
        let grid = t.normalized_grid(&silence).unwrap();
        assert!(grid.degenerate);

        let img = t.transform_waveform(&silence).unwrap();
        assert_eq!(img.dimensions(), (128, 128));
        let floor = viridis().apply(0);
        assert!(img.pixels().all(|p| p.0 == floor));
    }

    #[test]
    fn test_normalized_range_spans_full_byte() {
        let t = transformer();
        let grid = t.normalized_grid(&sine(700.0, 8000, 2.0)).unwrap();
        assert!(!grid.degenerate);
        assert_eq!(grid.data.iter().copied().min(), Some(0));
        assert_eq!(grid.data.iter().copied().max(), Some(255));
    }

    #[test]
    fn test_tone_lights_up_matching_rows() {
        let t = transformer();
        let low = t.normalized_grid(&sine(200.0, 8000, 1.0)).unwrap();
        let high = t.normalized_grid(&sine(3000.0, 8000, 1.0)).unwrap();
        let brightest_row = |g: &NormalizedGrid| {
            (0..g.n_mels)
                .max_by_key(|&m| (0..g.n_frames).map(|f| g.get(m, f) as u32).sum::<u32>())
                .unwrap()
        };
        assert!(brightest_row(&low) < brightest_row(&high));
    }

    #[test]
    fn test_resamples_foreign_rate() {
        let t = transformer();
        let spec = t.mel_spectrogram(&sine(440.0, 16000, 3.0)).unwrap();
        assert_eq!(spec.n_frames, 1 + 24_000 / dsp::HOP_LENGTH);
    }

    #[test]
    fn test_tiny_foreign_rate_input_still_renders() {
        let t = transformer();
        for rate in [44100u32, 16000] {
            for n in [1usize, 8, 60] {
                let wave = Waveform::new(vec![0.3; n], rate);
                let spec = t.mel_spectrogram(&wave).unwrap();
                assert!(spec.n_frames >= 1, "rate {rate} n {n}");
                let img = t.transform_waveform(&wave).unwrap();
                assert_eq!(img.dimensions(), (128, 128), "rate {rate} n {n}");
            }
        }
    }

    #[test]
    fn test_custom_output_size() {
        let config = SpectrogramConfig {
            width: 64,
            height: 32,
            ..Default::default()
        };
        let t = SpectrogramTransformer::new(config).unwrap();
        let img = t.transform_waveform(&sine(440.0, 8000, 1.0)).unwrap();
        assert_eq!(img.dimensions(), (64, 32));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SpectrogramConfig {
            n_mels: 0,
            ..Default::default()
        };
        assert!(SpectrogramTransformer::new(config).is_err());
    }
}
