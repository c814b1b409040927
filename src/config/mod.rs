//! Quality configuration for the synthesis pipeline
//!
//! A `QualityConfig` is an immutable snapshot: the engine publishes a new
//! snapshot on preset switches instead of mutating the active one, so
//! in-flight synthesis calls never observe a torn configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Built-in quality presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityPreset {
    /// Original Dr. Sbaitso sound: 8-bit, full vintage intensity
    Authentic1986,
    /// Improved quality with vintage character: 12-bit
    EnhancedVintage,
    /// High quality with a subtle vintage flavor: 16-bit
    ModernRetro,
}

impl QualityPreset {
    /// Parse a preset name as used in config files and on the CLI
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "authentic_1986" => Some(QualityPreset::Authentic1986),
            "enhanced_vintage" => Some(QualityPreset::EnhancedVintage),
            "modern_retro" => Some(QualityPreset::ModernRetro),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            QualityPreset::Authentic1986 => "authentic_1986",
            QualityPreset::EnhancedVintage => "enhanced_vintage",
            QualityPreset::ModernRetro => "modern_retro",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            QualityPreset::Authentic1986 => {
                "Original Dr. Sbaitso sound (8-bit, full vintage)"
            }
            QualityPreset::EnhancedVintage => {
                "Improved quality with vintage character (12-bit)"
            }
            QualityPreset::ModernRetro => {
                "High quality with subtle vintage flavor (16-bit)"
            }
        }
    }

    /// All built-in presets in display order
    pub fn all() -> [QualityPreset; 3] {
        [
            QualityPreset::Authentic1986,
            QualityPreset::EnhancedVintage,
            QualityPreset::ModernRetro,
        ]
    }
}

/// Feature toggles for the optional DSP refinement stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureToggles {
    /// Master switch for the vintage processing chain
    pub vintage_enabled: bool,
    /// Analog front-end simulation (harmonic distortion + DC offset)
    pub analog_simulation: bool,
    /// Band-limiting, bass roll-off and speech emphasis
    pub frequency_shaping: bool,
    /// Period-correct quantization noise on top of bit reduction
    pub quantization_noise: bool,
    /// Spectral enhancement refinement stage
    pub spectral_enhancement: bool,
    /// Harmonic enrichment refinement stage
    pub harmonic_enrichment: bool,
    /// Windowed noise-gate refinement stage
    pub noise_reduction: bool,
    /// Temporal smoothing refinement stage
    pub temporal_smoothing: bool,
    /// Extra boundary smoothing at diphone joins
    pub diphone_smoothing: bool,
}

impl Default for FeatureToggles {
    fn default() -> Self {
        Self {
            vintage_enabled: true,
            analog_simulation: true,
            frequency_shaping: true,
            quantization_noise: true,
            spectral_enhancement: false,
            harmonic_enrichment: false,
            noise_reduction: false,
            temporal_smoothing: false,
            diphone_smoothing: false,
        }
    }
}

/// Silence padding and edge-fade configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddingConfig {
    /// Silence prepended to the utterance in ms
    pub start_silence_ms: u32,
    /// Silence appended to the utterance in ms
    pub end_silence_ms: u32,
    /// Cosine fade-in length in ms
    pub fade_in_ms: u32,
    /// Cosine fade-out length in ms
    pub fade_out_ms: u32,
}

impl Default for PaddingConfig {
    fn default() -> Self {
        Self {
            start_silence_ms: 150,
            end_silence_ms: 250,
            fade_in_ms: 25,
            fade_out_ms: 50,
        }
    }
}

impl PaddingConfig {
    /// Padding with no added silence and no fades
    pub fn none() -> Self {
        Self {
            start_silence_ms: 0,
            end_silence_ms: 0,
            fade_in_ms: 0,
            fade_out_ms: 0,
        }
    }
}

/// Immutable quality snapshot consumed by the synthesizer and DSP chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Working sample rate in Hz, 8000-48000
    pub sample_rate: u32,
    /// Output bit depth: 8, 12 or 16
    pub bit_depth: u16,
    /// Number of formant resonators, 3-5
    pub formant_count: usize,
    /// Blend between clean (0.0) and fully degraded (1.0) signal paths
    pub vintage_intensity: f32,
    /// Speaking-rate scale applied to nominal phoneme durations, 0.5-2.0
    pub speaking_rate: f32,
    /// Monotone pitch baseline in Hz
    pub base_pitch_hz: f32,
    /// Depth of the slow per-utterance pitch variation, 0.0-1.0
    pub pitch_variation: f32,
    /// Optional stage toggles
    pub features: FeatureToggles,
    /// Silence padding and edge fades
    pub padding: PaddingConfig,
}

impl Default for QualityConfig {
    fn default() -> Self {
        QualityConfig::authentic_1986()
    }
}

impl QualityConfig {
    /// Original Dr. Sbaitso sound: 8-bit, full vintage intensity
    pub fn authentic_1986() -> Self {
        Self {
            sample_rate: crate::SAMPLE_RATE,
            bit_depth: 8,
            formant_count: 3,
            vintage_intensity: 1.0,
            speaking_rate: 1.0,
            base_pitch_hz: crate::BASE_PITCH_HZ,
            pitch_variation: 0.1,
            features: FeatureToggles::default(),
            padding: PaddingConfig {
                start_silence_ms: 100,
                end_silence_ms: 200,
                fade_in_ms: 10,
                fade_out_ms: 25,
            },
        }
    }

    /// Improved quality with vintage character: 12-bit
    pub fn enhanced_vintage() -> Self {
        Self {
            bit_depth: 12,
            formant_count: 4,
            vintage_intensity: 0.6,
            features: FeatureToggles {
                spectral_enhancement: true,
                diphone_smoothing: true,
                ..FeatureToggles::default()
            },
            padding: PaddingConfig::default(),
            ..QualityConfig::authentic_1986()
        }
    }

    /// High quality with a subtle vintage flavor: 16-bit
    pub fn modern_retro() -> Self {
        Self {
            bit_depth: 16,
            formant_count: 5,
            vintage_intensity: 0.1,
            features: FeatureToggles {
                spectral_enhancement: true,
                harmonic_enrichment: true,
                temporal_smoothing: true,
                diphone_smoothing: true,
                ..FeatureToggles::default()
            },
            padding: PaddingConfig {
                start_silence_ms: 200,
                end_silence_ms: 300,
                fade_in_ms: 50,
                fade_out_ms: 75,
            },
            ..QualityConfig::authentic_1986()
        }
    }

    /// Build the config for a built-in preset
    pub fn preset(preset: QualityPreset) -> Self {
        match preset {
            QualityPreset::Authentic1986 => QualityConfig::authentic_1986(),
            QualityPreset::EnhancedVintage => QualityConfig::enhanced_vintage(),
            QualityPreset::ModernRetro => QualityConfig::modern_retro(),
        }
    }

    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        let config: QualityConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    ///
    /// Out-of-range values are rejected here, never silently clamped.
    pub fn validate(&self) -> Result<()> {
        if !(8000..=48000).contains(&self.sample_rate) {
            return Err(Error::Config(format!(
                "sample_rate must be 8000-48000 Hz, got {}",
                self.sample_rate
            )));
        }
        if ![8, 12, 16].contains(&self.bit_depth) {
            return Err(Error::Config(format!(
                "bit_depth must be 8, 12 or 16, got {}",
                self.bit_depth
            )));
        }
        if !(3..=5).contains(&self.formant_count) {
            return Err(Error::Config(format!(
                "formant_count must be 3-5, got {}",
                self.formant_count
            )));
        }
        if !(0.0..=1.0).contains(&self.vintage_intensity) {
            return Err(Error::Config(format!(
                "vintage_intensity must be 0.0-1.0, got {}",
                self.vintage_intensity
            )));
        }
        if !(0.5..=2.0).contains(&self.speaking_rate) {
            return Err(Error::Config(format!(
                "speaking_rate must be 0.5-2.0, got {}",
                self.speaking_rate
            )));
        }
        if !(50.0..=400.0).contains(&self.base_pitch_hz) {
            return Err(Error::Config(format!(
                "base_pitch_hz must be 50-400 Hz, got {}",
                self.base_pitch_hz
            )));
        }
        if !(0.0..=1.0).contains(&self.pitch_variation) {
            return Err(Error::Config(format!(
                "pitch_variation must be 0.0-1.0, got {}",
                self.pitch_variation
            )));
        }
        Ok(())
    }

    /// Human-readable quality level, derived from the preset ladder
    pub fn quality_level(&self) -> &'static str {
        if self.bit_depth == 8
            && self.vintage_intensity >= 0.9
            && !self.features.diphone_smoothing
        {
            "Authentic 1986"
        } else if self.bit_depth <= 12 && self.vintage_intensity >= 0.5 {
            "Enhanced Vintage"
        } else if self.bit_depth >= 16 && self.vintage_intensity <= 0.5 {
            "Modern Retro"
        } else {
            "Custom"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        for preset in QualityPreset::all() {
            QualityConfig::preset(preset).validate().unwrap();
        }
    }

    #[test]
    fn test_rejects_bad_bit_depth() {
        let cfg = QualityConfig {
            bit_depth: 10,
            ..QualityConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("bit_depth"));
    }

    #[test]
    fn test_rejects_out_of_range_intensity() {
        let cfg = QualityConfig {
            vintage_intensity: 1.5,
            ..QualityConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("vintage_intensity"));
    }

    #[test]
    fn test_rejects_bad_sample_rate() {
        let cfg = QualityConfig {
            sample_rate: 4000,
            ..QualityConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_preset_names_round_trip() {
        for preset in QualityPreset::all() {
            assert_eq!(QualityPreset::from_name(preset.name()), Some(preset));
        }
        assert_eq!(QualityPreset::from_name("hifi"), None);
    }

    #[test]
    fn test_json_round_trip() {
        let cfg = QualityConfig::enhanced_vintage();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: QualityConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }

    #[test]
    fn test_quality_levels() {
        assert_eq!(QualityConfig::authentic_1986().quality_level(), "Authentic 1986");
        assert_eq!(QualityConfig::modern_retro().quality_level(), "Modern Retro");
    }
}
