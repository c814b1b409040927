//! Core synthesis engine

use rayon::prelude::*;
use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use crate::audio::{save_waveform, WaveformBuffer};
use crate::config::{QualityConfig, QualityPreset};
use crate::dsp::VintageChain;
use crate::pipeline::{CancelToken, PipelineStage};
use crate::synth::{DiphoneStore, FormantSynthesizer};
use crate::text::{PhonemeConverter, TextNormalizer};
use crate::{Error, Result};

/// Synthesis result
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    /// Generated audio samples
    pub audio: Vec<f32>,
    /// Sample rate
    pub sample_rate: u32,
    /// Word size the degradation chain quantized to
    pub bit_depth: u16,
    /// Duration in seconds
    pub duration: f32,
    /// Processing time in seconds
    pub processing_time: f32,
    /// Real-time factor
    pub rtf: f32,
    /// Phoneme units rendered
    pub phoneme_count: usize,
    /// Diphone pairs that fell back to reconstructed templates
    pub fallback_units: usize,
}

impl SynthesisResult {
    /// Save to WAV file at the rendered bit depth
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let buffer = WaveformBuffer::new(self.audio.clone(), self.sample_rate, self.bit_depth);
        save_waveform(path, &buffer)
    }

    /// Get duration formatted as MM:SS
    pub fn duration_formatted(&self) -> String {
        let minutes = (self.duration / 60.0) as u32;
        let seconds = (self.duration % 60.0) as u32;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// The Zpaytzo speech engine
///
/// Holds the rule tables, the diphone inventory, and an immutable quality
/// snapshot behind a lock. Each render snapshots the config once at entry, so a
/// preset switch mid-render affects only renders that start afterward.
pub struct ZpaytzoEngine {
    normalizer: TextNormalizer,
    converter: PhonemeConverter,
    synthesizer: FormantSynthesizer,
    store: Arc<DiphoneStore>,
    config: RwLock<Arc<QualityConfig>>,
}

impl ZpaytzoEngine {
    /// Create an engine with the built-in diphone inventory
    pub fn new(config: QualityConfig) -> Result<Self> {
        Self::with_store(config, Arc::new(DiphoneStore::builtin()))
    }

    /// Create an engine around an existing inventory
    pub fn with_store(config: QualityConfig, store: Arc<DiphoneStore>) -> Result<Self> {
        config.validate()?;
        if store.is_empty() {
            return Err(Error::Resource("diphone inventory is empty".to_string()));
        }
        log::info!(
            "initializing engine: {} Hz, {}-bit, intensity {:.2}, {} diphone units",
            config.sample_rate,
            config.bit_depth,
            config.vintage_intensity,
            store.len()
        );
        Ok(Self {
            normalizer: TextNormalizer::new(),
            converter: PhonemeConverter::new(),
            synthesizer: FormantSynthesizer::new(),
            store,
            config: RwLock::new(Arc::new(config)),
        })
    }

    /// Create an engine from a named preset
    pub fn preset(preset: QualityPreset) -> Result<Self> {
        Self::new(QualityConfig::preset(preset))
    }

    /// Snapshot of the active configuration
    pub fn config(&self) -> Arc<QualityConfig> {
        self.config.read().expect("config lock poisoned").clone()
    }

    /// Atomically replace the active configuration
    ///
    /// In-flight renders keep the snapshot they started with.
    pub fn set_config(&self, config: QualityConfig) -> Result<()> {
        config.validate()?;
        let mut guard = self.config.write().expect("config lock poisoned");
        *guard = Arc::new(config);
        Ok(())
    }

    /// Switch to a built-in preset
    pub fn set_preset(&self, preset: QualityPreset) {
        log::info!("switching preset to {}", preset.name());
        let applied = self.set_config(QualityConfig::preset(preset));
        debug_assert!(applied.is_ok(), "preset constructors validate");
    }

    /// Synthesize speech from text
    pub fn render(&self, text: &str) -> Result<SynthesisResult> {
        self.render_with(text, &CancelToken::new())
    }

    /// Synthesize speech, checking the token between stages
    pub fn render_with(&self, text: &str, cancel: &CancelToken) -> Result<SynthesisResult> {
        let start_time = Instant::now();
        let config = self.config();

        let preview: String = text.chars().take(50).collect();
        log::info!("starting render for: {}", preview);

        // 1. Lexical normalization
        log::debug!("{}: rewriting text...", PipelineStage::TextNormalization.name());
        let normalized = self.normalizer.normalize(text);
        cancel.checkpoint()?;

        let chain = VintageChain::from_config(&config);

        // Input with no speakable words renders as padding-only silence
        if normalized.is_empty() {
            log::info!("no speakable tokens, emitting padded silence");
            let buffer = chain.degrade(WaveformBuffer::silence(0, config.sample_rate, 16));
            return Ok(self.finish(buffer, 0, 0, start_time));
        }

        // 2. Grapheme-to-phoneme conversion
        log::debug!(
            "{}: converting {} tokens...",
            PipelineStage::PhonemeConversion.name(),
            normalized.tokens().len()
        );
        let sequence = self
            .converter
            .convert_sequence(&normalized, config.speaking_rate);
        cancel.checkpoint()?;

        // 3. Diphone formant synthesis
        log::debug!(
            "{}: rendering {} phoneme units...",
            PipelineStage::DiphoneSynthesis.name(),
            sequence.len()
        );
        let synthesized = self
            .synthesizer
            .synthesize(&sequence, &self.store, &config);
        cancel.checkpoint()?;

        if synthesized.fallback_units > 0 {
            log::debug!(
                "{} diphone pairs used fallback templates",
                synthesized.fallback_units
            );
        }

        // 4. Vintage degradation
        log::debug!("{}: applying chain...", PipelineStage::VintageProcessing.name());
        let buffer = chain.degrade(synthesized.buffer);

        Ok(self.finish(
            buffer,
            sequence.len(),
            synthesized.fallback_units,
            start_time,
        ))
    }

    /// Synthesize and save to file
    pub fn render_to_file(&self, text: &str, output_path: &str) -> Result<SynthesisResult> {
        let result = self.render(text)?;
        result.save(output_path)?;
        log::info!("saved audio to: {}", output_path);
        Ok(result)
    }

    /// Synthesize long text by splitting into sentence-aligned segments
    ///
    /// Segments render in parallel; each one is deterministic on its own,
    /// so the concatenated result is too.
    pub fn render_long(&self, text: &str, cancel: &CancelToken) -> Result<SynthesisResult> {
        let start_time = Instant::now();
        let config = self.config();

        let segments = super::segment_text(text, 200);
        if segments.is_empty() {
            return self.render_with(text, cancel);
        }
        log::info!("split text into {} segments", segments.len());

        let results: Result<Vec<SynthesisResult>> = segments
            .par_iter()
            .map(|segment| self.render_with(segment, cancel))
            .collect();
        let results = results?;

        let audio = super::concatenate_audio(
            &results.iter().map(|r| r.audio.clone()).collect::<Vec<_>>(),
            200,
            config.sample_rate,
        );
        let phoneme_count = results.iter().map(|r| r.phoneme_count).sum();
        let fallback_units = results.iter().map(|r| r.fallback_units).sum();

        let buffer = WaveformBuffer::new(audio, config.sample_rate, config.bit_depth);
        Ok(self.finish(buffer, phoneme_count, fallback_units, start_time))
    }

    /// Active sample rate
    pub fn sample_rate(&self) -> u32 {
        self.config().sample_rate
    }

    /// The shared diphone inventory
    pub fn store(&self) -> &DiphoneStore {
        &self.store
    }

    fn finish(
        &self,
        buffer: WaveformBuffer,
        phoneme_count: usize,
        fallback_units: usize,
        start_time: Instant,
    ) -> SynthesisResult {
        let processing_time = start_time.elapsed().as_secs_f32();
        let duration = buffer.duration();
        let rtf = if duration > 0.0 {
            processing_time / duration
        } else {
            0.0
        };

        log::info!(
            "render complete: {:.2}s audio in {:.2}s (RTF: {:.3})",
            duration,
            processing_time,
            rtf
        );

        SynthesisResult {
            sample_rate: buffer.sample_rate,
            bit_depth: buffer.bit_depth,
            duration,
            audio: buffer.samples,
            processing_time,
            rtf,
            phoneme_count,
            fallback_units,
        }
    }
}

impl std::fmt::Debug for ZpaytzoEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZpaytzoEngine")
            .field("config", &self.config())
            .field("diphone_units", &self.store.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::ms_to_samples;

    fn engine() -> ZpaytzoEngine {
        ZpaytzoEngine::new(QualityConfig::authentic_1986()).unwrap()
    }

    #[test]
    fn test_render_produces_audio() {
        let result = engine().render("Hello world").unwrap();
        assert!(result.duration > 0.0);
        assert!(!result.audio.is_empty());
        assert_eq!(result.sample_rate, 22050);
        assert_eq!(result.bit_depth, 8);
    }

    #[test]
    fn test_render_is_deterministic() {
        let e = engine();
        let a = e.render("determinism check").unwrap();
        let b = e.render("determinism check").unwrap();
        assert_eq!(a.audio, b.audio);
    }

    #[test]
    fn test_pure_punctuation_renders_padding_only() {
        let e = engine();
        let config = e.config();
        let result = e.render("?!...").unwrap();
        let expected = ms_to_samples(config.padding.start_silence_ms, config.sample_rate)
            + ms_to_samples(config.padding.end_silence_ms, config.sample_rate);
        assert_eq!(result.audio.len(), expected);
        assert!(result.audio.iter().all(|&s| s == 0.0));
        assert_eq!(result.phoneme_count, 0);
    }

    #[test]
    fn test_cancelled_token_aborts() {
        let e = engine();
        let token = CancelToken::new();
        token.cancel();
        let err = e.render_with("should not render", &token).unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }

    #[test]
    fn test_empty_inventory_is_rejected() {
        let err = ZpaytzoEngine::with_store(
            QualityConfig::default(),
            Arc::new(DiphoneStore::default()),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Resource(_)));
    }

    #[test]
    fn test_every_preset_applies() {
        let e = engine();
        for preset in QualityPreset::all() {
            e.set_preset(preset);
            assert_eq!(*e.config(), QualityConfig::preset(preset));
        }
    }

    #[test]
    fn test_preset_switch_changes_output() {
        let e = engine();
        let vintage = e.render("same words").unwrap();
        e.set_preset(QualityPreset::ModernRetro);
        let modern = e.render("same words").unwrap();
        assert_ne!(vintage.audio, modern.audio);
        assert_eq!(modern.bit_depth, 16);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = QualityConfig::authentic_1986();
        config.bit_depth = 7;
        assert!(ZpaytzoEngine::new(config).is_err());
    }

    #[test]
    fn test_set_config_rejects_invalid() {
        let e = engine();
        let mut bad = QualityConfig::authentic_1986();
        bad.sample_rate = 100;
        assert!(e.set_config(bad).is_err());
        // Active config is untouched
        assert_eq!(e.sample_rate(), 22050);
    }

    #[test]
    fn test_render_long_concatenates() {
        let e = engine();
        let text = "First sentence is here. Second sentence follows it. \
                    Third sentence runs a little longer than the others. \
                    Fourth sentence closes the paragraph.";
        let result = e.render_long(text, &CancelToken::new()).unwrap();
        assert!(result.duration > 1.0);
        assert!(result.phoneme_count > 0);
    }
}
