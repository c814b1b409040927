//! Pipeline orchestration
//!
//! Coordinates normalization, phoneme conversion, synthesis, and the
//! vintage degradation chain.

mod synthesis;

pub use synthesis::{SynthesisResult, ZpaytzoEngine};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::{Error, Result};

/// Pipeline stage enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    TextNormalization,
    PhonemeConversion,
    DiphoneSynthesis,
    VintageProcessing,
}

impl PipelineStage {
    /// Get stage name
    pub fn name(&self) -> &'static str {
        match self {
            PipelineStage::TextNormalization => "Text Normalization",
            PipelineStage::PhonemeConversion => "Phoneme Conversion",
            PipelineStage::DiphoneSynthesis => "Diphone Synthesis",
            PipelineStage::VintageProcessing => "Vintage Processing",
        }
    }

    /// Get all stages in order
    pub fn all() -> Vec<PipelineStage> {
        vec![
            PipelineStage::TextNormalization,
            PipelineStage::PhonemeConversion,
            PipelineStage::DiphoneSynthesis,
            PipelineStage::VintageProcessing,
        ]
    }
}

/// Cooperative cancellation handle
///
/// Cloning shares the flag; cancelling from any clone stops the render at
/// its next stage checkpoint. A cancelled render returns `Error::Cancelled`
/// and writes no output.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Bail out if cancellation was requested
    pub fn checkpoint(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Text segmentation for long-form synthesis
pub fn segment_text(text: &str, max_segment_len: usize) -> Vec<String> {
    use crate::text::TextNormalizer;

    let normalizer = TextNormalizer::new();
    let sentences = normalizer.split_sentences(text);

    let mut segments = Vec::new();
    let mut current_segment = String::new();

    for sentence in sentences {
        if current_segment.len() + sentence.len() > max_segment_len && !current_segment.is_empty()
        {
            segments.push(current_segment.trim().to_string());
            current_segment = sentence;
        } else {
            if !current_segment.is_empty() {
                current_segment.push(' ');
            }
            current_segment.push_str(&sentence);
        }
    }

    if !current_segment.trim().is_empty() {
        segments.push(current_segment.trim().to_string());
    }

    segments
}

/// Concatenate audio segments with silence between them
pub fn concatenate_audio(
    segments: &[Vec<f32>],
    silence_duration_ms: u32,
    sample_rate: u32,
) -> Vec<f32> {
    let silence_samples = (silence_duration_ms as usize * sample_rate as usize) / 1000;
    let silence = vec![0.0f32; silence_samples];

    let mut result = Vec::new();
    for (i, segment) in segments.iter().enumerate() {
        result.extend_from_slice(segment);
        if i < segments.len() - 1 {
            result.extend_from_slice(&silence);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        let stages = PipelineStage::all();
        assert_eq!(stages[0], PipelineStage::TextNormalization);
        assert_eq!(stages[3], PipelineStage::VintageProcessing);
    }

    #[test]
    fn test_cancel_token_shares_state() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(token.checkpoint().is_ok());
        clone.cancel();
        assert!(token.is_cancelled());
        assert!(matches!(token.checkpoint(), Err(Error::Cancelled)));
    }

    #[test]
    fn test_segment_short_text() {
        let segments = segment_text("Hello world.", 100);
        assert_eq!(segments.len(), 1);
    }

    #[test]
    fn test_segment_splits_on_sentences() {
        let text = "First sentence here. Second sentence here. Third sentence here.";
        let segments = segment_text(text, 25);
        assert!(segments.len() > 1);
        for segment in &segments {
            assert!(!segment.is_empty());
        }
    }

    #[test]
    fn test_concatenate_with_silence() {
        let segments = vec![vec![1.0; 10], vec![1.0; 10]];
        let out = concatenate_audio(&segments, 100, 1000);
        // 10 + 100 silence samples + 10
        assert_eq!(out.len(), 120);
        assert_eq!(out[15], 0.0);
    }
}
