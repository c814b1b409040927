//! The phoneme alphabet and phoneme sequence types
//!
//! Simplified ARPABET-style notation as used by 1986-era diphone
//! concatenation engines: 15 vowels/diphthongs, 24 consonants, and silence.

use std::fmt;

/// A symbol from the fixed phoneme alphabet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(clippy::upper_case_acronyms)]
pub enum Phoneme {
    // Vowels and diphthongs
    AA, AE, AH, AO, AW, AY, EH, ER, EY, IH, IY, OW, OY, UH, UW,
    // Stops
    B, D, G, K, P, T,
    // Affricates
    CH, JH,
    // Fricatives
    DH, F, HH, S, SH, TH, V, Z, ZH,
    // Nasals
    M, N, NG,
    // Liquids and glides
    L, R, W, Y,
    // Silence
    Sil,
}

/// Broad phoneme class, used for duration assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhonemeClass {
    Vowel,
    Diphthong,
    Stop,
    Affricate,
    Fricative,
    Nasal,
    Liquid,
    Silence,
}

impl Phoneme {
    /// All phonemes in the alphabet, silence last
    pub const ALL: [Phoneme; 40] = [
        Phoneme::AA, Phoneme::AE, Phoneme::AH, Phoneme::AO, Phoneme::AW,
        Phoneme::AY, Phoneme::EH, Phoneme::ER, Phoneme::EY, Phoneme::IH,
        Phoneme::IY, Phoneme::OW, Phoneme::OY, Phoneme::UH, Phoneme::UW,
        Phoneme::B, Phoneme::D, Phoneme::G, Phoneme::K, Phoneme::P,
        Phoneme::T, Phoneme::CH, Phoneme::JH, Phoneme::DH, Phoneme::F,
        Phoneme::HH, Phoneme::S, Phoneme::SH, Phoneme::TH, Phoneme::V,
        Phoneme::Z, Phoneme::ZH, Phoneme::M, Phoneme::N, Phoneme::NG,
        Phoneme::L, Phoneme::R, Phoneme::W, Phoneme::Y, Phoneme::Sil,
    ];

    /// Parse an ARPABET-style symbol
    pub fn from_symbol(s: &str) -> Option<Phoneme> {
        let p = match s {
            "AA" => Phoneme::AA, "AE" => Phoneme::AE, "AH" => Phoneme::AH,
            "AO" => Phoneme::AO, "AW" => Phoneme::AW, "AY" => Phoneme::AY,
            "EH" => Phoneme::EH, "ER" => Phoneme::ER, "EY" => Phoneme::EY,
            "IH" => Phoneme::IH, "IY" => Phoneme::IY, "OW" => Phoneme::OW,
            "OY" => Phoneme::OY, "UH" => Phoneme::UH, "UW" => Phoneme::UW,
            "B" => Phoneme::B, "D" => Phoneme::D, "G" => Phoneme::G,
            "K" => Phoneme::K, "P" => Phoneme::P, "T" => Phoneme::T,
            "CH" => Phoneme::CH, "JH" => Phoneme::JH, "DH" => Phoneme::DH,
            "F" => Phoneme::F, "HH" => Phoneme::HH, "S" => Phoneme::S,
            "SH" => Phoneme::SH, "TH" => Phoneme::TH, "V" => Phoneme::V,
            "Z" => Phoneme::Z, "ZH" => Phoneme::ZH, "M" => Phoneme::M,
            "N" => Phoneme::N, "NG" => Phoneme::NG, "L" => Phoneme::L,
            "R" => Phoneme::R, "W" => Phoneme::W, "Y" => Phoneme::Y,
            "SIL" => Phoneme::Sil,
            _ => return None,
        };
        Some(p)
    }

    /// ARPABET-style symbol for this phoneme
    pub fn symbol(&self) -> &'static str {
        match self {
            Phoneme::AA => "AA", Phoneme::AE => "AE", Phoneme::AH => "AH",
            Phoneme::AO => "AO", Phoneme::AW => "AW", Phoneme::AY => "AY",
            Phoneme::EH => "EH", Phoneme::ER => "ER", Phoneme::EY => "EY",
            Phoneme::IH => "IH", Phoneme::IY => "IY", Phoneme::OW => "OW",
            Phoneme::OY => "OY", Phoneme::UH => "UH", Phoneme::UW => "UW",
            Phoneme::B => "B", Phoneme::D => "D", Phoneme::G => "G",
            Phoneme::K => "K", Phoneme::P => "P", Phoneme::T => "T",
            Phoneme::CH => "CH", Phoneme::JH => "JH", Phoneme::DH => "DH",
            Phoneme::F => "F", Phoneme::HH => "HH", Phoneme::S => "S",
            Phoneme::SH => "SH", Phoneme::TH => "TH", Phoneme::V => "V",
            Phoneme::Z => "Z", Phoneme::ZH => "ZH", Phoneme::M => "M",
            Phoneme::N => "N", Phoneme::NG => "NG", Phoneme::L => "L",
            Phoneme::R => "R", Phoneme::W => "W", Phoneme::Y => "Y",
            Phoneme::Sil => "SIL",
        }
    }

    /// Broad class of this phoneme
    pub fn class(&self) -> PhonemeClass {
        use Phoneme::*;
        match self {
            AA | AE | AH | AO | EH | ER | IH | IY | UH | UW => PhonemeClass::Vowel,
            AW | AY | EY | OW | OY => PhonemeClass::Diphthong,
            B | D | G | K | P | T => PhonemeClass::Stop,
            CH | JH => PhonemeClass::Affricate,
            DH | F | HH | S | SH | TH | V | Z | ZH => PhonemeClass::Fricative,
            M | N | NG => PhonemeClass::Nasal,
            L | R | W | Y => PhonemeClass::Liquid,
            Sil => PhonemeClass::Silence,
        }
    }

    /// True for vowels and diphthongs (syllable nuclei)
    pub fn is_vowel(&self) -> bool {
        matches!(self.class(), PhonemeClass::Vowel | PhonemeClass::Diphthong)
    }

    /// True when the vocal folds vibrate during this phoneme
    pub fn is_voiced(&self) -> bool {
        use Phoneme::*;
        match self {
            Sil => false,
            P | T | K | CH | F | HH | S | SH | TH => false,
            _ => true,
        }
    }

    /// Nominal duration in milliseconds, before speaking-rate scaling
    ///
    /// Values follow a 1986-era duration table: vowels longest,
    /// alveolar stops shortest.
    pub fn nominal_duration_ms(&self) -> u32 {
        use Phoneme::*;
        match self {
            AA | AO => 120,
            AE | EH => 100,
            AH | IH | UH => 80,
            ER | IY | UW => 120,
            AW | AY | EY | OW | OY => 140,
            D | T => 40,
            B | G | K | P => 60,
            CH | JH => 80,
            F | S | SH | TH => 80,
            DH | HH | V | Z => 60,
            ZH | NG => 80,
            M | N | L | R | W | Y => 60,
            Sil => 20,
        }
    }
}

impl fmt::Display for Phoneme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Lexical stress level of a phoneme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stress {
    #[default]
    Unstressed,
    Primary,
}

/// One phoneme with its stress level and allotted duration
///
/// Created by the converter, consumed once by the synthesizer, never
/// mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhonemeUnit {
    pub phoneme: Phoneme,
    pub stress: Stress,
    pub duration_ms: u32,
}

impl PhonemeUnit {
    pub fn new(phoneme: Phoneme, stress: Stress, duration_ms: u32) -> Self {
        Self {
            phoneme,
            stress,
            duration_ms,
        }
    }

    /// Silence unit of the given duration
    pub fn silence(duration_ms: u32) -> Self {
        Self::new(Phoneme::Sil, Stress::Unstressed, duration_ms)
    }
}

/// An utterance-level phoneme sequence, bounded by silence at both ends
///
/// Invariants maintained by `push`: adjacent silence units are coalesced
/// (the longer duration wins) and the sequence is never empty once any
/// unit has been pushed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PhonemeSequence {
    units: Vec<PhonemeUnit>,
}

impl PhonemeSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a unit, coalescing adjacent silence
    pub fn push(&mut self, unit: PhonemeUnit) {
        if unit.phoneme == Phoneme::Sil {
            if let Some(last) = self.units.last_mut() {
                if last.phoneme == Phoneme::Sil {
                    last.duration_ms = last.duration_ms.max(unit.duration_ms);
                    return;
                }
            }
        }
        self.units.push(unit);
    }

    pub fn units(&self) -> &[PhonemeUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Total allotted duration in milliseconds
    pub fn total_duration_ms(&self) -> u64 {
        self.units.iter().map(|u| u.duration_ms as u64).sum()
    }

    /// True when the sequence contains no audible content
    pub fn is_silent(&self) -> bool {
        self.units.iter().all(|u| u.phoneme == Phoneme::Sil)
    }

    /// Adjacent phoneme pairs, in order
    pub fn pairs(&self) -> impl Iterator<Item = (&PhonemeUnit, &PhonemeUnit)> {
        self.units.iter().zip(self.units.iter().skip(1))
    }
}

impl fmt::Display for PhonemeSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbols: Vec<&str> = self.units.iter().map(|u| u.phoneme.symbol()).collect();
        f.write_str(&symbols.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_round_trip() {
        for p in Phoneme::ALL {
            assert_eq!(Phoneme::from_symbol(p.symbol()), Some(p));
        }
    }

    #[test]
    fn test_vowel_classification() {
        assert!(Phoneme::AE.is_vowel());
        assert!(Phoneme::OY.is_vowel());
        assert!(!Phoneme::K.is_vowel());
        assert!(!Phoneme::Sil.is_vowel());
    }

    #[test]
    fn test_voicing() {
        assert!(Phoneme::AA.is_voiced());
        assert!(Phoneme::Z.is_voiced());
        assert!(!Phoneme::S.is_voiced());
        assert!(!Phoneme::Sil.is_voiced());
    }

    #[test]
    fn test_vowels_longer_than_stops() {
        assert!(Phoneme::AE.nominal_duration_ms() > Phoneme::T.nominal_duration_ms());
        assert!(Phoneme::IY.nominal_duration_ms() > Phoneme::K.nominal_duration_ms());
    }

    #[test]
    fn test_silence_coalescing() {
        let mut seq = PhonemeSequence::new();
        seq.push(PhonemeUnit::silence(100));
        seq.push(PhonemeUnit::silence(300));
        seq.push(PhonemeUnit::new(Phoneme::AE, Stress::Primary, 100));
        seq.push(PhonemeUnit::silence(50));
        seq.push(PhonemeUnit::silence(200));

        assert_eq!(seq.len(), 3);
        assert_eq!(seq.units()[0].duration_ms, 300);
        assert_eq!(seq.units()[2].duration_ms, 200);
    }
}
