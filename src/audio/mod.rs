//! Audio buffer type and sample helpers

pub mod io;

pub use io::{load_waveform, save_waveform};

/// Mono audio container carried through the pipeline
///
/// Samples stay float in [-1, 1] until WAV export; `bit_depth` records the
/// word size the degradation chain quantized to.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformBuffer {
    /// Audio samples (mono, normalized to [-1, 1])
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Effective word size of the samples (8, 12, or 16 bits)
    pub bit_depth: u16,
}

impl WaveformBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32, bit_depth: u16) -> Self {
        Self {
            samples,
            sample_rate,
            bit_depth,
        }
    }

    /// A buffer of pure silence with the given length
    pub fn silence(num_samples: usize, sample_rate: u32, bit_depth: u16) -> Self {
        Self::new(vec![0.0; num_samples], sample_rate, bit_depth)
    }

    /// Duration in seconds
    pub fn duration(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Largest absolute sample value
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |m, &s| m.max(s.abs()))
    }

    /// True when every sample is below the audibility threshold
    pub fn is_silent(&self) -> bool {
        self.peak() < 1e-4
    }
}

/// Scale so the peak hits `target`, leaving silence untouched
pub fn normalize_peak(samples: &mut [f32], target: f32) {
    let peak = samples.iter().fold(0.0f32, |m, &s| m.max(s.abs()));
    if peak > 1e-9 {
        let gain = target / peak;
        for s in samples.iter_mut() {
            *s *= gain;
        }
    }
}

/// Prepend and append silence
pub fn pad_silence(samples: &[f32], pad_left: usize, pad_right: usize) -> Vec<f32> {
    let mut padded = vec![0.0; pad_left + samples.len() + pad_right];
    padded[pad_left..pad_left + samples.len()].copy_from_slice(samples);
    padded
}

/// In-place raised-cosine fade at both ends
///
/// Fade lengths are clamped to half the signal so the two ramps never
/// overlap.
pub fn apply_fade(samples: &mut [f32], fade_in: usize, fade_out: usize) {
    let half = samples.len() / 2;
    let fade_in = fade_in.min(half);
    let fade_out = fade_out.min(half);

    for i in 0..fade_in {
        let t = i as f32 / fade_in as f32;
        samples[i] *= 0.5 * (1.0 - (std::f32::consts::PI * t).cos());
    }
    let n = samples.len();
    for i in 0..fade_out {
        let t = i as f32 / fade_out as f32;
        samples[n - 1 - i] *= 0.5 * (1.0 - (std::f32::consts::PI * t).cos());
    }
}

/// Root-mean-square level
pub fn compute_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|&s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
}

/// Convert a duration in milliseconds to a sample count
pub fn ms_to_samples(ms: u32, sample_rate: u32) -> usize {
    (ms as u64 * sample_rate as u64 / 1000) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_peak() {
        let mut samples = vec![0.1, -0.25, 0.2];
        normalize_peak(&mut samples, 0.8);
        assert!((samples[1].abs() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_leaves_silence() {
        let mut samples = vec![0.0; 100];
        normalize_peak(&mut samples, 0.8);
        assert!(samples.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_pad_silence() {
        let padded = pad_silence(&[1.0, 1.0], 3, 2);
        assert_eq!(padded.len(), 7);
        assert_eq!(&padded[..3], &[0.0, 0.0, 0.0]);
        assert_eq!(&padded[5..], &[0.0, 0.0]);
    }

    #[test]
    fn test_fade_endpoints() {
        let mut samples = vec![1.0; 100];
        apply_fade(&mut samples, 10, 10);
        assert_eq!(samples[0], 0.0);
        assert!(samples[50] == 1.0);
        assert!(samples[99] < 0.1);
    }

    #[test]
    fn test_fade_ramps_are_monotone() {
        let mut samples = vec![1.0; 200];
        apply_fade(&mut samples, 40, 40);
        for i in 1..=40 {
            assert!(samples[i] >= samples[i - 1], "fade-in dips at {}", i);
        }
        for i in 159..199 {
            assert!(samples[i + 1] <= samples[i], "fade-out rises at {}", i);
        }
    }

    #[test]
    fn test_compute_rms() {
        assert_eq!(compute_rms(&[]), 0.0);
        let rms = compute_rms(&[0.5, -0.5, 0.5, -0.5]);
        assert!((rms - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_fade_clamps_to_signal() {
        let mut samples = vec![1.0; 4];
        apply_fade(&mut samples, 100, 100);
        // Ramps clamp to half the buffer instead of overlapping
        assert_eq!(samples[0], 0.0);
    }

    #[test]
    fn test_ms_to_samples() {
        assert_eq!(ms_to_samples(1000, 22050), 22050);
        assert_eq!(ms_to_samples(100, 22050), 2205);
    }
}
