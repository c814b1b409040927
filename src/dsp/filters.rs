//! Small IIR building blocks for the degradation stages

/// One-pole low-pass filter
#[derive(Debug, Clone, Copy)]
pub struct OnePoleLowPass {
    alpha: f32,
    state: f32,
}

impl OnePoleLowPass {
    pub fn new(cutoff_hz: f32, sample_rate: f32) -> Self {
        let rc = 1.0 / (2.0 * std::f32::consts::PI * cutoff_hz.max(1.0));
        let dt = 1.0 / sample_rate;
        Self {
            alpha: dt / (rc + dt),
            state: 0.0,
        }
    }

    pub fn step(&mut self, x: f32) -> f32 {
        self.state += self.alpha * (x - self.state);
        self.state
    }
}

/// One-pole high-pass filter
#[derive(Debug, Clone, Copy)]
pub struct OnePoleHighPass {
    alpha: f32,
    prev_in: f32,
    prev_out: f32,
}

impl OnePoleHighPass {
    pub fn new(cutoff_hz: f32, sample_rate: f32) -> Self {
        let rc = 1.0 / (2.0 * std::f32::consts::PI * cutoff_hz.max(1.0));
        let dt = 1.0 / sample_rate;
        Self {
            alpha: rc / (rc + dt),
            prev_in: 0.0,
            prev_out: 0.0,
        }
    }

    pub fn step(&mut self, x: f32) -> f32 {
        let y = self.alpha * (self.prev_out + x - self.prev_in);
        self.prev_in = x;
        self.prev_out = y;
        y
    }
}

/// Two cascaded one-pole sections, 12 dB/octave
#[derive(Debug, Clone, Copy)]
pub struct TwoPoleLowPass {
    first: OnePoleLowPass,
    second: OnePoleLowPass,
}

impl TwoPoleLowPass {
    pub fn new(cutoff_hz: f32, sample_rate: f32) -> Self {
        Self {
            first: OnePoleLowPass::new(cutoff_hz, sample_rate),
            second: OnePoleLowPass::new(cutoff_hz, sample_rate),
        }
    }

    pub fn step(&mut self, x: f32) -> f32 {
        self.second.step(self.first.step(x))
    }
}

/// Filter a whole slice through a fresh two-pole low-pass
pub fn lowpass(samples: &[f32], cutoff_hz: f32, sample_rate: f32) -> Vec<f32> {
    let mut filter = TwoPoleLowPass::new(cutoff_hz, sample_rate);
    samples.iter().map(|&x| filter.step(x)).collect()
}

/// Filter a whole slice through a fresh one-pole high-pass
pub fn highpass(samples: &[f32], cutoff_hz: f32, sample_rate: f32) -> Vec<f32> {
    let mut filter = OnePoleHighPass::new(cutoff_hz, sample_rate);
    samples.iter().map(|&x| filter.step(x)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(freq: f32, sample_rate: f32, n: usize) -> Vec<f32> {
        (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate).sin())
            .collect()
    }

    fn rms(samples: &[f32]) -> f32 {
        (samples.iter().map(|&s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
    }

    #[test]
    fn test_lowpass_attenuates_high_frequencies() {
        let sr = 22050.0;
        let low = lowpass(&tone(200.0, sr, 4096), 1000.0, sr);
        let high = lowpass(&tone(8000.0, sr, 4096), 1000.0, sr);
        assert!(rms(&low) > rms(&high) * 4.0);
    }

    #[test]
    fn test_highpass_attenuates_low_frequencies() {
        let sr = 22050.0;
        let low = highpass(&tone(50.0, sr, 4096), 1000.0, sr);
        let high = highpass(&tone(5000.0, sr, 4096), 1000.0, sr);
        assert!(rms(&high) > rms(&low) * 4.0);
    }

    #[test]
    fn test_filters_preserve_length() {
        let input = tone(440.0, 22050.0, 777);
        assert_eq!(lowpass(&input, 3000.0, 22050.0).len(), 777);
        assert_eq!(highpass(&input, 200.0, 22050.0).len(), 777);
    }
}
