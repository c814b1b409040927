//! zpaytzo - 1986-era diphone-concatenation speech synthesizer
//!
//! Recreates the sound of late-eighties rule-based text-to-speech: a
//! deterministic lexical rewrite engine, grapheme-to-phoneme conversion,
//! diphone-based formant synthesis, and a configurable vintage DSP chain
//! that degrades the clean signal down to period-correct 8-bit grit.
//!
//! # Features
//! - Ordered rewrite rules for contractions, abbreviations, numerals, and prosody
//! - Rule-based G2P with an irregular-word exception dictionary
//! - Source-filter synthesis over a 3-5 resonator bank
//! - Quality presets from "Authentic 1986" to "Modern Retro"
//!
//! # Example
//! ```no_run
//! use zpaytzo::{ZpaytzoEngine, QualityConfig};
//!
//! let engine = ZpaytzoEngine::new(QualityConfig::authentic_1986()).unwrap();
//! let result = engine.render("Hello world").unwrap();
//! result.save("hello.wav").unwrap();
//! ```

// Allow traditional for loops - often clearer for audio DSP code
#![allow(clippy::needless_range_loop)]

pub mod audio;
pub mod config;
pub mod dsp;
pub mod error;
pub mod pipeline;
pub mod synth;
pub mod text;

pub use audio::WaveformBuffer;
pub use config::{QualityConfig, QualityPreset};
pub use error::{Error, Result};
pub use pipeline::{CancelToken, SynthesisResult, ZpaytzoEngine};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default working sample rate for synthesis
pub const SAMPLE_RATE: u32 = 22050;

/// Synthesis frame hop in milliseconds
pub const FRAME_MS: u32 = 5;

/// Baseline fundamental frequency in Hz (average male voice, 1986 default)
pub const BASE_PITCH_HZ: f32 = 120.0;
