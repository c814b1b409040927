//! Diphone unit store
//!
//! Units span from the center of one phoneme to the center of the next, so
//! concatenation points land on phoneme steady states. Each template holds
//! formant control points for its two endpoints; adjacent templates share
//! the steady state of their common phoneme, which makes unit boundaries
//! continuous by construction.

use std::collections::HashMap;

use crate::text::phoneme::Phoneme;

/// Resonator slots available to the synthesizer; how many are driven is a
/// quality setting (3 to 5)
pub const MAX_FORMANTS: usize = 5;

/// Fixed upper formants used when quality asks for more than the three
/// tabulated ones
const UPPER_FORMANTS: [(f32, f32, f32); 2] = [(3300.0, 250.0, 0.15), (3750.0, 300.0, 0.1)];

/// Formant bandwidth shared by the three tabulated formants, in Hz
const TABLE_BANDWIDTH_HZ: f32 = 100.0;

/// One set of resonator targets: frequency, bandwidth, amplitude per slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormantFrame {
    pub freq: [f32; MAX_FORMANTS],
    pub band: [f32; MAX_FORMANTS],
    pub amp: [f32; MAX_FORMANTS],
}

impl FormantFrame {
    /// Steady-state targets for one phoneme
    pub fn for_phoneme(p: Phoneme) -> Self {
        let (f, a) = phoneme_targets(p);
        let mut frame = FormantFrame {
            freq: [f[0], f[1], f[2], UPPER_FORMANTS[0].0, UPPER_FORMANTS[1].0],
            band: [
                TABLE_BANDWIDTH_HZ,
                TABLE_BANDWIDTH_HZ,
                TABLE_BANDWIDTH_HZ,
                UPPER_FORMANTS[0].1,
                UPPER_FORMANTS[1].1,
            ],
            amp: [a[0], a[1], a[2], UPPER_FORMANTS[0].2, UPPER_FORMANTS[1].2],
        };
        if p == Phoneme::Sil {
            frame.amp = [0.0; MAX_FORMANTS];
        }
        frame
    }

    /// Linear interpolation between two frames
    pub fn lerp(&self, other: &FormantFrame, t: f32) -> FormantFrame {
        let mut out = *self;
        for i in 0..MAX_FORMANTS {
            out.freq[i] += (other.freq[i] - self.freq[i]) * t;
            out.band[i] += (other.band[i] - self.band[i]) * t;
            out.amp[i] += (other.amp[i] - self.amp[i]) * t;
        }
        out
    }
}

/// A stored diphone: endpoint control frames for a phoneme pair
#[derive(Debug, Clone, Copy)]
pub struct DiphoneTemplate {
    pub left: Phoneme,
    pub right: Phoneme,
    pub start: FormantFrame,
    pub end: FormantFrame,
}

/// Whether a lookup hit a stored unit or was reconstructed on the fly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiphoneSource {
    Stored,
    Fallback,
}

/// The unit inventory, keyed by ordered phoneme pair
///
/// `Default` yields an empty inventory; the engine rejects those, so
/// callers normally start from `builtin()`.
#[derive(Debug, Default)]
pub struct DiphoneStore {
    templates: HashMap<(Phoneme, Phoneme), DiphoneTemplate>,
}

impl DiphoneStore {
    /// Build the built-in inventory: every pair touching silence or a
    /// vowel. Consonant clusters are reconstructed at lookup time, the
    /// same economy a 1986 ROM inventory made.
    pub fn builtin() -> Self {
        let mut templates = HashMap::new();
        for &left in Phoneme::ALL.iter() {
            for &right in Phoneme::ALL.iter() {
                if left == right {
                    continue;
                }
                let touches_nucleus = left.is_vowel()
                    || right.is_vowel()
                    || left == Phoneme::Sil
                    || right == Phoneme::Sil;
                if touches_nucleus {
                    templates.insert((left, right), make_template(left, right));
                }
            }
        }
        log::debug!("built diphone inventory with {} units", templates.len());
        Self { templates }
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Fetch the unit for a pair, reconstructing a fallback template from
    /// the endpoint steady states when the pair is not in the inventory.
    /// Never fails; the caller counts fallbacks for reporting.
    pub fn lookup(&self, left: Phoneme, right: Phoneme) -> (DiphoneTemplate, DiphoneSource) {
        match self.templates.get(&(left, right)) {
            Some(t) => (*t, DiphoneSource::Stored),
            None => (make_template(left, right), DiphoneSource::Fallback),
        }
    }
}

fn make_template(left: Phoneme, right: Phoneme) -> DiphoneTemplate {
    DiphoneTemplate {
        left,
        right,
        start: FormantFrame::for_phoneme(left),
        end: FormantFrame::for_phoneme(right),
    }
}

/// Per-phoneme formant frequencies and amplitudes, three formants each.
/// Vowel values follow the classic Peterson-Barney male averages.
fn phoneme_targets(p: Phoneme) -> ([f32; 3], [f32; 3]) {
    use Phoneme::*;
    match p {
        AA => ([730.0, 1090.0, 2440.0], [1.0, 0.6, 0.3]),
        AE => ([660.0, 1720.0, 2410.0], [1.0, 0.8, 0.3]),
        AH => ([520.0, 1190.0, 2390.0], [1.0, 0.5, 0.2]),
        AO => ([570.0, 840.0, 2410.0], [1.0, 0.4, 0.2]),
        EH => ([530.0, 1840.0, 2480.0], [1.0, 0.7, 0.3]),
        ER => ([490.0, 1350.0, 1690.0], [1.0, 0.6, 0.4]),
        IH => ([390.0, 1990.0, 2550.0], [1.0, 0.8, 0.3]),
        IY => ([270.0, 2290.0, 3010.0], [1.0, 0.9, 0.4]),
        OW => ([570.0, 840.0, 2410.0], [1.0, 0.4, 0.2]),
        UH => ([440.0, 1020.0, 2240.0], [1.0, 0.4, 0.2]),
        UW => ([300.0, 870.0, 2240.0], [1.0, 0.3, 0.2]),
        AY => ([660.0, 1720.0, 2410.0], [1.0, 0.8, 0.3]),
        AW => ([730.0, 1090.0, 2440.0], [1.0, 0.6, 0.3]),
        EY => ([530.0, 1840.0, 2480.0], [1.0, 0.7, 0.3]),
        OY => ([570.0, 840.0, 2410.0], [1.0, 0.4, 0.2]),
        B => ([200.0, 1000.0, 2500.0], [0.3, 0.2, 0.1]),
        D => ([200.0, 1700.0, 2600.0], [0.3, 0.2, 0.1]),
        G => ([200.0, 1400.0, 2200.0], [0.3, 0.2, 0.1]),
        P => ([200.0, 1000.0, 2500.0], [0.1, 0.1, 0.05]),
        T => ([200.0, 1700.0, 2600.0], [0.1, 0.1, 0.05]),
        K => ([200.0, 1400.0, 2200.0], [0.1, 0.1, 0.05]),
        M => ([250.0, 1000.0, 2200.0], [0.8, 0.3, 0.2]),
        N => ([250.0, 1700.0, 2600.0], [0.8, 0.3, 0.2]),
        NG => ([250.0, 1400.0, 2200.0], [0.8, 0.3, 0.2]),
        L => ([400.0, 1200.0, 2600.0], [0.9, 0.5, 0.3]),
        R => ([300.0, 1300.0, 1600.0], [0.9, 0.5, 0.4]),
        W => ([300.0, 870.0, 2240.0], [0.8, 0.3, 0.2]),
        Y => ([270.0, 2290.0, 3010.0], [0.8, 0.7, 0.3]),
        F => ([200.0, 1000.0, 4000.0], [0.2, 0.3, 0.8]),
        V => ([200.0, 1000.0, 4000.0], [0.4, 0.4, 0.6]),
        TH => ([200.0, 1400.0, 4500.0], [0.2, 0.3, 0.8]),
        DH => ([200.0, 1400.0, 4500.0], [0.4, 0.4, 0.6]),
        S => ([200.0, 2000.0, 6000.0], [0.1, 0.5, 1.0]),
        Z => ([200.0, 2000.0, 6000.0], [0.3, 0.6, 0.8]),
        SH => ([200.0, 1200.0, 4000.0], [0.1, 0.3, 0.9]),
        ZH => ([200.0, 1200.0, 4000.0], [0.3, 0.4, 0.7]),
        CH => ([200.0, 1200.0, 4000.0], [0.1, 0.3, 0.8]),
        JH => ([200.0, 1200.0, 4000.0], [0.3, 0.4, 0.6]),
        HH => ([300.0, 1500.0, 3000.0], [0.3, 0.2, 0.1]),
        // Neutral tract shape with the gain closed
        Sil => ([500.0, 1500.0, 2500.0], [0.0, 0.0, 0.0]),
    }
}
