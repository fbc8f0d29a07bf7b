//! # melgram
//!
//! Turns speech recordings into fixed-size viridis mel-spectrogram images.
//!
//! The pipeline per file:
//! - decode and downmix to mono ([`audio::loader`])
//! - resample to 8 kHz ([`audio::resample`])
//! - 128-band mel power spectrogram up to 4 kHz ([`dsp`])
//! - dB relative to peak, then per-file min-max to 8 bit ([`dsp::db`])
//! - viridis colormap and bilinear resize to 128x128 ([`canvas`])
//!
//! ```no_run
//! use melgram::{SpectrogramConfig, SpectrogramTransformer};
//!
//! let transformer = SpectrogramTransformer::new(SpectrogramConfig::default())?;
//! let image = transformer.transform_file("Ses01F_impro01_F000.wav")?;
//! image.save("Ses01F_impro01_F000.wav.png")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod audio;
pub mod canvas;
pub mod config;
pub mod dsp;
pub mod error;
pub mod pipeline;
pub mod storage;
pub mod types;

pub use config::SpectrogramConfig;
pub use error::{MelgramError, MelgramResult};
pub use pipeline::SpectrogramTransformer;
pub use storage::{ImageSink, NpyArchiveWriter, PngDirectorySink};
pub use types::{DecibelGrid, MelSpectrogram, NormalizedGrid, Waveform};
