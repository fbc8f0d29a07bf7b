//! Transformation parameters.
//!
//! Only the documented parameters are configurable. Window and hop sizes are
//! fixed constants in [`crate::dsp`].

use crate::error::{MelgramError, MelgramResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrogramConfig {
    /// Target sample rate (Hz) every input is resampled to.
    pub sample_rate: u32,
    /// Number of mel bands (rows of the spectrogram).
    pub n_mels: usize,
    /// Upper edge of the mel filterbank (Hz).
    pub f_max: f32,
    /// Output image width in pixels.
    pub width: u32,
    /// Output image height in pixels.
    pub height: u32,
}

impl Default for SpectrogramConfig {
    fn default() -> Self {
        Self {
            sample_rate: 8000,
            n_mels: 128,
            f_max: 4000.0,
            width: 128,
            height: 128,
        }
    }
}

impl SpectrogramConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> MelgramResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> MelgramResult<()> {
        if self.sample_rate == 0 {
            return Err(MelgramError::InvalidConfig("sample_rate must be > 0".into()));
        }
        if self.n_mels == 0 {
            return Err(MelgramError::InvalidConfig("n_mels must be > 0".into()));
        }
        if self.width == 0 || self.height == 0 {
            return Err(MelgramError::InvalidConfig(format!(
                "output size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        let nyquist = self.sample_rate as f32 / 2.0;
        if !(self.f_max > 0.0 && self.f_max <= nyquist) {
            return Err(MelgramError::InvalidConfig(format!(
                "f_max {} Hz must lie in (0, {nyquist}] for a {} Hz sample rate",
                self.f_max, self.sample_rate
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SpectrogramConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sample_rate, 8000);
        assert_eq!(config.n_mels, 128);
        assert_eq!((config.width, config.height), (128, 128));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SpectrogramConfig = serde_json::from_str(r#"{"width": 64}"#).unwrap();
        assert_eq!(config.width, 64);
        assert_eq!(config.height, 128);
        assert_eq!(config.f_max, 4000.0);
    }

    #[test]
    fn test_f_max_above_nyquist_rejected() {
        let config = SpectrogramConfig {
            f_max: 5000.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(MelgramError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_size_rejected() {
        let config = SpectrogramConfig {
            height: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("melgram.json");
        std::fs::write(&path, r#"{"sample_rate": 16000, "f_max": 8000.0}"#).unwrap();
        let config = SpectrogramConfig::from_json_file(&path).unwrap();
        assert_eq!(config.sample_rate, 16000);
        assert_eq!(config.f_max, 8000.0);
        assert_eq!(config.n_mels, 128);
    }
}
