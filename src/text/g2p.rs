//! Rule-based grapheme-to-phoneme conversion
//!
//! The 1986 lookup order: exception dictionary, then two-letter digraph
//! rules, then contextual single-letter rules (silent E, magic E), then
//! plain letter maps. Unrecognized characters degrade to a neutral vowel
//! rather than failing.

use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::text::normalizer::NormalizedText;
use crate::text::phoneme::{Phoneme, PhonemeSequence, PhonemeUnit, Stress};

/// Silence carried at utterance edges so the first and last phonemes have
/// a neighbor to blend with
const EDGE_SILENCE_MS: u32 = 20;

lazy_static! {
    /// Irregular words that bypass the letter rules entirely
    static ref EXCEPTIONS: HashMap<&'static str, Vec<Phoneme>> = {
        use Phoneme::*;
        let entries: &[(&str, &[Phoneme])] = &[
            // Function words
            ("THE", &[DH, AH]),
            ("A", &[AH]),
            ("AN", &[AE, N]),
            ("AND", &[AE, N, D]),
            ("OF", &[AH, V]),
            ("TO", &[T, UW]),
            ("IN", &[IH, N]),
            ("IS", &[IH, Z]),
            ("IT", &[IH, T]),
            ("FOR", &[F, AO, R]),
            ("AS", &[AE, Z]),
            ("WITH", &[W, IH, TH]),
            ("HIS", &[HH, IH, Z]),
            ("HER", &[HH, ER]),
            ("HIM", &[HH, IH, M]),
            ("HAS", &[HH, AE, Z]),
            ("HAD", &[HH, AE, D]),
            ("HAVE", &[HH, AE, V]),
            ("BE", &[B, IY]),
            ("BEEN", &[B, IH, N]),
            ("WAS", &[W, AH, Z]),
            ("WERE", &[W, ER]),
            ("ARE", &[AA, R]),
            ("WHAT", &[W, AH, T]),
            ("WHEN", &[W, EH, N]),
            ("WHERE", &[W, EH, R]),
            ("WHO", &[HH, UW]),
            ("WHY", &[W, AY]),
            ("HOW", &[HH, AW]),
            ("WOULD", &[W, UH, D]),
            ("COULD", &[K, UH, D]),
            ("SHOULD", &[SH, UH, D]),
            ("NOT", &[N, AA, T]),
            // Number words
            ("ONE", &[W, AH, N]),
            ("TWO", &[T, UW]),
            ("THREE", &[TH, R, IY]),
            ("FOUR", &[F, AO, R]),
            ("FIVE", &[F, AY, V]),
            ("SIX", &[S, IH, K, S]),
            ("SEVEN", &[S, EH, V, AH, N]),
            ("EIGHT", &[EY, T]),
            ("NINE", &[N, AY, N]),
            ("TEN", &[T, EH, N]),
            ("ELEVEN", &[IH, L, EH, V, AH, N]),
            ("TWELVE", &[T, W, EH, L, V]),
            ("ZERO", &[Z, IH, R, OW]),
            ("NINETEEN", &[N, AY, N, T, IY, N]),
            ("EIGHTY", &[EY, T, IY]),
            ("HUNDRED", &[HH, AH, N, D, R, AH, D]),
            ("THOUSAND", &[TH, AW, Z, AH, N, D]),
            ("MILLION", &[M, IH, L, Y, AH, N]),
            ("BILLION", &[B, IH, L, Y, AH, N]),
            // Technology vocabulary
            ("COMPUTER", &[K, AH, M, P, Y, UW, T, ER]),
            ("PROGRAM", &[P, R, OW, G, R, AE, M]),
            ("SYSTEM", &[S, IH, S, T, AH, M]),
            ("MACHINE", &[M, AH, SH, IY, N]),
            ("DEVICE", &[D, IH, V, AY, S]),
            ("NETWORK", &[N, EH, T, W, ER, K]),
            ("SOFTWARE", &[S, AO, F, T, W, EH, R]),
            ("HARDWARE", &[HH, AA, R, D, W, EH, R]),
            ("MEMORY", &[M, EH, M, ER, IY]),
            ("PROCESSOR", &[P, R, AA, S, EH, S, ER]),
            ("TECHNOLOGY", &[T, EH, K, N, AA, L, AH, JH, IY]),
            ("ELECTRONIC", &[IH, L, EH, K, T, R, AA, N, IH, K]),
            ("DIGITAL", &[D, IH, JH, IH, T, AH, L]),
            ("INTERFACE", &[IH, N, T, ER, F, EY, S]),
            ("INFORMATION", &[IH, N, F, ER, M, EY, SH, AH, N]),
            ("DOCTOR", &[D, AA, K, T, ER]),
            ("HELLO", &[HH, EH, L, OW]),
            // Silent-letter words the rules get wrong
            ("KNIFE", &[N, AY, F]),
            ("KNOW", &[N, OW]),
            ("KNEE", &[N, IY]),
            ("WRITE", &[R, AY, T]),
            ("WRONG", &[R, AO, NG]),
            ("LAMB", &[L, AE, M]),
            ("THUMB", &[TH, AH, M]),
            ("DEBT", &[D, EH, T]),
            ("DOUBT", &[D, AW, T]),
            ("ISLAND", &[AY, L, AH, N, D]),
            ("LISTEN", &[L, IH, S, AH, N]),
            ("CASTLE", &[K, AE, S, AH, L]),
            ("CHRISTMAS", &[K, R, IH, S, M, AH, S]),
            ("WEDNESDAY", &[W, EH, N, Z, D, EY]),
            ("FEBRUARY", &[F, EH, B, R, UW, EH, R, IY]),
        ];
        entries.iter().map(|(w, p)| (*w, p.to_vec())).collect()
    };

    /// Two-letter combinations, matched before single letters
    static ref DIGRAPHS: HashMap<&'static str, Vec<Phoneme>> = {
        use Phoneme::*;
        let entries: &[(&str, &[Phoneme])] = &[
            // Consonant digraphs
            ("CH", &[CH]),
            ("SH", &[SH]),
            ("TH", &[TH]),
            ("WH", &[W]),
            ("PH", &[F]),
            ("GH", &[F]),
            ("CK", &[K]),
            ("NG", &[NG]),
            // Vowel teams
            ("AI", &[EY]),
            ("AY", &[EY]),
            ("EA", &[IY]),
            ("EE", &[IY]),
            ("EI", &[EY]),
            ("EY", &[EY]),
            ("IE", &[IY]),
            ("OA", &[OW]),
            ("OO", &[UW]),
            ("OU", &[AW]),
            ("OW", &[AW]),
            ("OY", &[OY]),
            ("UI", &[UW]),
            ("UE", &[UW]),
            ("AU", &[AO]),
            ("AW", &[AO]),
            ("EW", &[UW]),
            ("OI", &[OY]),
            // Silent-letter clusters
            ("QU", &[K, W]),
            ("KN", &[N]),
            ("WR", &[R]),
            ("MB", &[M]),
            ("BT", &[T]),
        ];
        entries.iter().map(|(w, p)| (*w, p.to_vec())).collect()
    };
}

/// Grapheme-to-phoneme converter with the vintage rule tables
#[derive(Debug, Default)]
pub struct PhonemeConverter;

impl PhonemeConverter {
    pub fn new() -> Self {
        Self
    }

    /// Convert one uppercase word to phonemes with stress and durations
    pub fn convert_word(&self, word: &str) -> Vec<PhonemeUnit> {
        let phonemes = if let Some(exact) = EXCEPTIONS.get(word) {
            exact.clone()
        } else {
            self.apply_letter_rules(word)
        };

        let stressed_nucleus = pick_stressed_nucleus(&phonemes);
        phonemes
            .into_iter()
            .enumerate()
            .map(|(i, p)| {
                let stress = if Some(i) == stressed_nucleus {
                    Stress::Primary
                } else {
                    Stress::Unstressed
                };
                PhonemeUnit::new(p, stress, p.nominal_duration_ms())
            })
            .collect()
    }

    /// Build the full silence-bounded sequence for a normalized utterance
    ///
    /// Pause hints become `Sil` units (coalesced by the sequence), and
    /// durations are scaled by `speaking_rate`.
    pub fn convert_sequence(&self, text: &NormalizedText, speaking_rate: f32) -> PhonemeSequence {
        let mut seq = PhonemeSequence::new();
        seq.push(PhonemeUnit::silence(EDGE_SILENCE_MS));

        for token in text.tokens() {
            for mut unit in self.convert_word(&token.text) {
                unit.duration_ms = scale_duration(unit.duration_ms, speaking_rate);
                if token.prosody.emphasis > 0 && unit.phoneme.is_vowel() {
                    // Emphasized words stretch their vowels slightly
                    unit.duration_ms += unit.duration_ms / 4;
                }
                seq.push(unit);
            }
            if token.prosody.pause_after_ms > 0 {
                seq.push(PhonemeUnit::silence(token.prosody.pause_after_ms));
            } else {
                // Inter-word gap keeps syllables from running together
                seq.push(PhonemeUnit::silence(EDGE_SILENCE_MS));
            }
        }

        seq.push(PhonemeUnit::silence(EDGE_SILENCE_MS));
        log::debug!(
            "converted {} tokens to {} phoneme units ({} ms)",
            text.tokens().len(),
            seq.len(),
            seq.total_duration_ms()
        );
        seq
    }

    /// Letter-by-letter rules: digraphs first, then contextual vowels,
    /// then the consonant map
    fn apply_letter_rules(&self, word: &str) -> Vec<Phoneme> {
        let letters: Vec<char> = word.chars().collect();
        let mut phonemes = Vec::with_capacity(letters.len());
        let mut i = 0;

        while i < letters.len() {
            if i + 1 < letters.len() {
                let digraph: String = letters[i..i + 2].iter().collect();
                if let Some(ps) = DIGRAPHS.get(digraph.as_str()) {
                    phonemes.extend_from_slice(ps);
                    i += 2;
                    continue;
                }
            }

            let letter = letters[i];
            if "AEIOUY".contains(letter) {
                if let Some(v) = vowel_in_context(&letters, i) {
                    phonemes.push(v);
                }
            } else if let Some(cs) = consonant_phonemes(letter) {
                phonemes.extend_from_slice(cs);
            } else if letter.is_ascii_digit() {
                // Digits are expanded upstream; a leftover digit means the
                // normalizer fell through, so degrade to a neutral vowel
                log::warn!("unexpected digit {:?} in word {:?}", letter, word);
                phonemes.push(Phoneme::AH);
            } else {
                log::warn!("no rule for character {:?} in word {:?}", letter, word);
                phonemes.push(Phoneme::AH);
            }
            i += 1;
        }

        phonemes
    }
}

/// Contextual vowel reading; None when the vowel is silent
fn vowel_in_context(letters: &[char], pos: usize) -> Option<Phoneme> {
    let vowel = letters[pos];
    let last = letters.len() - 1;

    // Silent E: word-final E after a consonant
    if vowel == 'E' && pos == last && pos > 0 && !"AEIOU".contains(letters[pos - 1]) {
        return None;
    }

    // Magic E: vowel-consonant-E lengthens the vowel
    if pos + 2 <= last && letters[pos + 2] == 'E' && !"AEIOU".contains(letters[pos + 1]) {
        match vowel {
            'A' => return Some(Phoneme::EY),
            'I' => return Some(Phoneme::AY),
            'O' => return Some(Phoneme::OW),
            'U' => return Some(Phoneme::UW),
            _ => {}
        }
    }

    Some(match vowel {
        'A' => Phoneme::AE,
        'E' => Phoneme::EH,
        'I' => Phoneme::IH,
        'O' => Phoneme::AO,
        'U' => Phoneme::AH,
        'Y' => Phoneme::IH,
        _ => Phoneme::AH,
    })
}

fn consonant_phonemes(letter: char) -> Option<&'static [Phoneme]> {
    use Phoneme::*;
    let ps: &'static [Phoneme] = match letter {
        'B' => &[B],
        'C' => &[K],
        'D' => &[D],
        'F' => &[F],
        'G' => &[G],
        'H' => &[HH],
        'J' => &[JH],
        'K' => &[K],
        'L' => &[L],
        'M' => &[M],
        'N' => &[N],
        'P' => &[P],
        'Q' => &[K, W],
        'R' => &[R],
        'S' => &[S],
        'T' => &[T],
        'V' => &[V],
        'W' => &[W],
        'X' => &[K, S],
        'Z' => &[Z],
        _ => return None,
    };
    Some(ps)
}

/// Pick the vowel nucleus that carries primary stress: monosyllables are
/// stressed, two-syllable words stress the first, longer words the second
fn pick_stressed_nucleus(phonemes: &[Phoneme]) -> Option<usize> {
    let nuclei: Vec<usize> = phonemes
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_vowel())
        .map(|(i, _)| i)
        .collect();
    match nuclei.len() {
        0 => None,
        1 | 2 => Some(nuclei[0]),
        _ => Some(nuclei[1]),
    }
}

fn scale_duration(nominal_ms: u32, speaking_rate: f32) -> u32 {
    let rate = speaking_rate.clamp(0.25, 4.0);
    ((nominal_ms as f32 / rate).round() as u32).max(1)
}
