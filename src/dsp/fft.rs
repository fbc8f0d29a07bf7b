use realfft::RealFftPlanner;
use std::cell::RefCell;
use std::collections::HashMap;

thread_local! {
    static FFT_PLANNER: RefCell<RealFftPlanner<f32>> = RefCell::new(RealFftPlanner::new());
    static HANN_CACHE: RefCell<HashMap<usize, Vec<f32>>> = RefCell::new(HashMap::new());
}

/// Periodic Hann window: `0.5 * (1 - cos(2πi / N))`.
fn hann_window(size: usize) -> Vec<f32> {
    HANN_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .entry(size)
            .or_insert_with(|| {
                (0..size)
                    .map(|i| {
                        0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / size as f32).cos())
                    })
                    .collect()
            })
            .clone()
    })
}

/// Number of centered STFT frames for a signal of `len` samples.
pub fn frame_count(len: usize, hop_size: usize) -> usize {
    1 + len / hop_size
}

/// Compute the power spectrum `|X|²` of every STFT frame.
///
/// Frames are centered: the signal is zero-padded by `fft_size / 2` on each
/// side and frame `t` covers padded samples `t * hop .. t * hop + fft_size`.
/// This always yields at least one frame, even for inputs shorter than the
/// window. Each returned frame holds `fft_size / 2 + 1` bins.
pub fn stft_power(samples: &[f32], fft_size: usize, hop_size: usize) -> Vec<Vec<f32>> {
    let fft = FFT_PLANNER.with(|p| p.borrow_mut().plan_fft_forward(fft_size));
    let window = hann_window(fft_size);

    // Pre-allocate FFT buffers once and reuse across frames
    let mut input = fft.make_input_vec();
    let mut spectrum = fft.make_output_vec();

    let pad = fft_size / 2;
    let mut padded = vec![0.0f32; samples.len() + 2 * pad];
    padded[pad..pad + samples.len()].copy_from_slice(samples);

    let n_frames = frame_count(samples.len(), hop_size);
    let mut frames = Vec::with_capacity(n_frames);
    for frame_i in 0..n_frames {
        let pos = frame_i * hop_size;
        for (inp, (&s, &w)) in input
            .iter_mut()
            .zip(padded[pos..pos + fft_size].iter().zip(window.iter()))
        {
            *inp = s * w;
        }
        // Buffer lengths come from the plan itself, so this cannot fail.
        fft.process(&mut input, &mut spectrum)
            .expect("FFT buffers sized by plan");
        frames.push(spectrum.iter().map(|c| c.norm_sqr()).collect());
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, sample_rate: u32, num_samples: usize) -> Vec<f32> {
        (0..num_samples)
            .map(|i| {
                let t = i as f64 / sample_rate as f64;
                (2.0 * std::f64::consts::PI * freq * t).sin() as f32
            })
            .collect()
    }

    #[test]
    fn test_frame_count_centered() {
        assert_eq!(frame_count(24_000, 512), 47);
        assert_eq!(frame_count(0, 512), 1);
        assert_eq!(frame_count(511, 512), 1);
        assert_eq!(frame_count(512, 512), 2);
    }

    #[test]
    fn test_stft_peak_bin() {
        let sample_rate = 8000u32;
        let freq = 1000.0f64;
        let frames = stft_power(&sine(freq, sample_rate, 8000), 2048, 512);
        assert_eq!(frames.len(), frame_count(8000, 512));
        assert_eq!(frames[0].len(), 1025);

        // Middle frame is fully inside the signal
        let col = &frames[frames.len() / 2];
        let peak_bin = col
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .unwrap()
            .0;
        let freq_resolution = sample_rate as f64 / 2048.0;
        let peak_freq = peak_bin as f64 * freq_resolution;
        assert!(
            (peak_freq - freq).abs() < freq_resolution * 2.0,
            "Peak at {peak_freq} Hz, expected ~{freq} Hz"
        );
    }

    #[test]
    fn test_short_input_yields_one_frame() {
        let frames = stft_power(&[0.5; 100], 2048, 512);
        assert_eq!(frames.len(), 1);
        assert!(frames[0].iter().all(|p| p.is_finite() && *p >= 0.0));
        assert!(frames[0][0] > 0.0);
    }

    #[test]
    fn test_hann_window_periodic() {
        let w = hann_window(8);
        assert_eq!(w.len(), 8);
        assert!(w[0].abs() < 1e-7);
        assert!((w[4] - 1.0).abs() < 1e-6);
        // Periodic: w[1] == w[7]
        assert!((w[1] - w[7]).abs() < 1e-6);
    }
}
