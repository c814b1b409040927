//! Text front end: normalization and grapheme-to-phoneme conversion

pub mod g2p;
pub mod normalizer;
pub mod phoneme;

pub use g2p::PhonemeConverter;
pub use normalizer::{
    NormalizedText, ProsodyHint, TextNormalizer, Token, PAUSE_LONG_MS, PAUSE_MEDIUM_MS,
    PAUSE_SHORT_MS,
};
pub use phoneme::{Phoneme, PhonemeClass, PhonemeSequence, PhonemeUnit, Stress};
