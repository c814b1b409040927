//! Vintage signal degradation chain
//!
//! Clean synthesis output runs through an ordered list of degradation
//! stages, then the degraded copy is blended back against the clean one by
//! `vintage_intensity`. Intensity 0 is the clean path untouched; 1 is the
//! full 1986 character.

pub mod filters;
pub mod stages;

use crate::audio::{apply_fade, ms_to_samples, pad_silence, WaveformBuffer};
use crate::config::QualityConfig;
use stages::{
    AnalogFrontEnd, FrequencyShaper, HarmonicEnricher, NoiseGate, Quantizer, Saturator,
    SpectralEnhancer, TemporalSmoother,
};

/// Per-render parameters handed to every stage
#[derive(Debug, Clone, Copy)]
pub struct StageContext {
    pub sample_rate: u32,
    pub intensity: f32,
    pub bit_depth: u16,
}

/// One length-preserving degradation stage
pub trait VintageStage: Send + Sync {
    fn name(&self) -> &'static str;
    fn process(&self, samples: &[f32], ctx: &StageContext) -> Vec<f32>;
}

/// The ordered stage list, built once from a config snapshot
pub struct VintageChain {
    stages: Vec<Box<dyn VintageStage>>,
    ctx: StageContext,
    padding: crate::config::PaddingConfig,
}

impl VintageChain {
    /// Select stages according to the feature toggles
    pub fn from_config(config: &QualityConfig) -> Self {
        let f = &config.features;
        let mut stages: Vec<Box<dyn VintageStage>> = Vec::new();

        if f.vintage_enabled {
            if f.analog_simulation {
                stages.push(Box::new(AnalogFrontEnd));
            }
            if f.frequency_shaping {
                stages.push(Box::new(FrequencyShaper));
            }
            stages.push(Box::new(Quantizer {
                extra_noise: f.quantization_noise,
            }));
            stages.push(Box::new(Saturator));
            if f.spectral_enhancement {
                stages.push(Box::new(SpectralEnhancer));
            }
            if f.harmonic_enrichment {
                stages.push(Box::new(HarmonicEnricher));
            }
            if f.noise_reduction {
                stages.push(Box::new(NoiseGate));
            }
            if f.temporal_smoothing {
                stages.push(Box::new(TemporalSmoother));
            }
        }

        Self {
            stages,
            ctx: StageContext {
                sample_rate: config.sample_rate,
                intensity: config.vintage_intensity.clamp(0.0, 1.0),
                bit_depth: config.bit_depth,
            },
            padding: config.padding,
        }
    }

    /// Stage names in processing order
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run the chain: degrade, blend against clean, then pad and fade
    ///
    /// Padding is the only step that changes length; nothing here touches
    /// the sample rate.
    pub fn degrade(&self, buffer: WaveformBuffer) -> WaveformBuffer {
        let intensity = self.ctx.intensity;
        let clean = buffer.samples;

        let mut blended = if self.stages.is_empty() || intensity <= 0.0 {
            clean
        } else {
            let mut degraded = clean.clone();
            for stage in &self.stages {
                log::debug!("applying stage {}", stage.name());
                degraded = stage.process(&degraded, &self.ctx);
                debug_assert_eq!(degraded.len(), clean.len(), "{} changed length", stage.name());
            }
            clean
                .iter()
                .zip(degraded.iter())
                .map(|(&c, &d)| c * (1.0 - intensity) + d * intensity)
                .collect()
        };

        // Fade the speech edges first, then wrap in silence
        let sr = self.ctx.sample_rate;
        apply_fade(
            &mut blended,
            ms_to_samples(self.padding.fade_in_ms, sr),
            ms_to_samples(self.padding.fade_out_ms, sr),
        );
        let pad_left = ms_to_samples(self.padding.start_silence_ms, sr);
        let pad_right = ms_to_samples(self.padding.end_silence_ms, sr);
        if pad_left > 0 || pad_right > 0 {
            blended = pad_silence(&blended, pad_left, pad_right);
        }

        WaveformBuffer::new(blended, sr, self.ctx.bit_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PaddingConfig;

    fn test_buffer(n: usize) -> WaveformBuffer {
        let samples = (0..n).map(|i| (i as f32 * 0.05).sin() * 0.5).collect();
        WaveformBuffer::new(samples, 22050, 16)
    }

    #[test]
    fn test_zero_intensity_is_identity_up_to_padding() {
        let mut config = QualityConfig::modern_retro();
        config.vintage_intensity = 0.0;
        config.padding = PaddingConfig::none();

        let input = test_buffer(2000);
        let output = VintageChain::from_config(&config).degrade(input.clone());
        assert_eq!(output.samples, input.samples);
    }

    #[test]
    fn test_full_intensity_changes_signal() {
        let mut config = QualityConfig::authentic_1986();
        config.padding = PaddingConfig::none();

        let input = test_buffer(2000);
        let output = VintageChain::from_config(&config).degrade(input.clone());
        assert_eq!(output.len(), input.len());
        assert_ne!(output.samples, input.samples);
    }

    #[test]
    fn test_padding_grows_output_by_configured_amount() {
        let config = QualityConfig::authentic_1986();
        let input = test_buffer(1000);
        let output = VintageChain::from_config(&config).degrade(input);

        let expected = 1000
            + ms_to_samples(config.padding.start_silence_ms, 22050)
            + ms_to_samples(config.padding.end_silence_ms, 22050);
        assert_eq!(output.len(), expected);
    }

    #[test]
    fn test_padding_edges_are_silent() {
        let config = QualityConfig::authentic_1986();
        let output = VintageChain::from_config(&config).degrade(test_buffer(1000));
        let pad = ms_to_samples(config.padding.start_silence_ms, 22050);
        assert!(output.samples[..pad].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_chain_is_deterministic() {
        let config = QualityConfig::enhanced_vintage();
        let a = VintageChain::from_config(&config).degrade(test_buffer(3000));
        let b = VintageChain::from_config(&config).degrade(test_buffer(3000));
        assert_eq!(a.samples, b.samples);
    }

    #[test]
    fn test_output_carries_configured_bit_depth() {
        let config = QualityConfig::authentic_1986();
        let output = VintageChain::from_config(&config).degrade(test_buffer(100));
        assert_eq!(output.bit_depth, config.bit_depth);
    }

    #[test]
    fn test_disabled_chain_passes_through() {
        let mut config = QualityConfig::authentic_1986();
        config.features.vintage_enabled = false;
        config.padding = PaddingConfig::none();
        let chain = VintageChain::from_config(&config);
        assert!(chain.stage_names().is_empty());

        let input = test_buffer(500);
        let output = chain.degrade(input.clone());
        assert_eq!(output.samples, input.samples);
    }
}
