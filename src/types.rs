/// Mono audio with amplitudes in [-1, 1].
#[derive(Clone, Debug, PartialEq)]
pub struct Waveform {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self { samples, sample_rate }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Mel-band power spectrogram, row-major: `data[mel * n_frames + frame]`.
/// Row 0 is the lowest mel band.
#[derive(Clone, Debug)]
pub struct MelSpectrogram {
    pub n_mels: usize,
    pub n_frames: usize,
    pub data: Vec<f32>,
}

impl MelSpectrogram {
    pub fn get(&self, mel: usize, frame: usize) -> f32 {
        self.data[mel * self.n_frames + frame]
    }
}

/// Same layout as [`MelSpectrogram`], in dB relative to the grid's own peak.
#[derive(Clone, Debug)]
pub struct DecibelGrid {
    pub n_mels: usize,
    pub n_frames: usize,
    pub data: Vec<f32>,
}

impl DecibelGrid {
    pub fn get(&self, mel: usize, frame: usize) -> f32 {
        self.data[mel * self.n_frames + frame]
    }

    pub fn max(&self) -> f32 {
        self.data.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    pub fn min(&self) -> f32 {
        self.data.iter().copied().fold(f32::INFINITY, f32::min)
    }
}

/// Per-file min-max rescaled decibel grid.
#[derive(Clone, Debug)]
pub struct NormalizedGrid {
    pub n_mels: usize,
    pub n_frames: usize,
    pub data: Vec<u8>,
    /// Set when the decibel grid had zero spread and was mapped to a
    /// constant instead of being rescaled.
    pub degenerate: bool,
}

impl NormalizedGrid {
    pub fn get(&self, mel: usize, frame: usize) -> u8 {
        self.data[mel * self.n_frames + frame]
    }
}
