//! Diphone concatenation synthesis: unit inventory and formant rendering

pub mod diphone;
pub mod formant;

pub use diphone::{DiphoneSource, DiphoneStore, DiphoneTemplate, FormantFrame, MAX_FORMANTS};
pub use formant::{duration_samples, FormantSynthesizer, Resonator, SynthesizedAudio};
