//! Lexical rule engine: 1986-era text normalization
//!
//! An ordered table of rewrite rules (contractions, abbreviations, numerals,
//! punctuation-to-prosody) applied repeatedly until a fixed point. The
//! canonical output alphabet is uppercase words plus prosody markers, so
//! normalizing already-normalized text returns it unchanged.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;

/// Maximum rewrite passes before giving up on reaching a fixed point.
/// Guards against accidental rule cycles; two passes suffice in practice.
const MAX_PASSES: usize = 4;

/// Short pause (comma, semicolon) in ms
pub const PAUSE_SHORT_MS: u32 = 200;
/// Medium pause (colon) in ms
pub const PAUSE_MEDIUM_MS: u32 = 300;
/// Long pause (sentence boundary) in ms
pub const PAUSE_LONG_MS: u32 = 500;

const MARK_PAUSE_SHORT: &str = "<PAUSE_SHORT>";
const MARK_PAUSE_MEDIUM: &str = "<PAUSE_MEDIUM>";
const MARK_PAUSE_LONG: &str = "<PAUSE_LONG>";
const MARK_EMPHASIS: &str = "<EMPH>";

/// Prosody hint attached to a normalized token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProsodyHint {
    /// Emphasis level: 0 = neutral, 1 = emphasized (exclamation)
    pub emphasis: u8,
    /// Pause to insert after this token, in ms
    pub pause_after_ms: u32,
    /// True when a sentence ends after this token (pitch-drop point)
    pub sentence_boundary: bool,
}

/// One normalized word token with its prosody hint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub prosody: ProsodyHint,
}

/// Result of normalization: ordered tokens plus the canonical rewritten
/// string (words and prosody markers), which re-normalizes to itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    tokens: Vec<Token>,
    canonical: String,
}

impl NormalizedText {
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The canonical rewritten form, e.g. `DOCTOR SBAITSO <PAUSE_LONG>`
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Word texts without prosody markers
    pub fn words(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

lazy_static! {
    static ref WHITESPACE_REGEX: Regex = Regex::new(r"\s+").unwrap();
    static ref CARDINAL_REGEX: Regex = Regex::new(r"^\d+$").unwrap();
    static ref ORDINAL_REGEX: Regex = Regex::new(r"^(\d+)(ST|ND|RD|TH)$").unwrap();
    static ref DECIMAL_REGEX: Regex = Regex::new(r"^(\d+)\.(\d+)$").unwrap();
    static ref CURRENCY_REGEX: Regex = Regex::new(r"^\$(\d+)(?:\.(\d{2}))?$").unwrap();
}

/// Text normalization engine implementing the vintage rule table
#[derive(Debug)]
pub struct TextNormalizer {
    /// (contraction, expansion), longest key first
    contractions: Vec<(&'static str, &'static str)>,
    /// (abbreviation incl. trailing period, expansion), longest key first
    abbreviations: Vec<(&'static str, &'static str)>,
    /// Symbol characters spoken as words
    symbols: HashMap<char, &'static str>,
}

impl TextNormalizer {
    pub fn new() -> Self {
        let mut contractions = vec![
            ("WON'T", "WILL NOT"),
            ("CAN'T", "CANNOT"),
            ("DON'T", "DO NOT"),
            ("ISN'T", "IS NOT"),
            ("AREN'T", "ARE NOT"),
            ("WASN'T", "WAS NOT"),
            ("WEREN'T", "WERE NOT"),
            ("HAVEN'T", "HAVE NOT"),
            ("HASN'T", "HAS NOT"),
            ("HADN'T", "HAD NOT"),
            ("WOULDN'T", "WOULD NOT"),
            ("SHOULDN'T", "SHOULD NOT"),
            ("COULDN'T", "COULD NOT"),
            ("MUSTN'T", "MUST NOT"),
            ("NEEDN'T", "NEED NOT"),
            ("I'M", "I AM"),
            ("YOU'RE", "YOU ARE"),
            ("HE'S", "HE IS"),
            ("SHE'S", "SHE IS"),
            ("IT'S", "IT IS"),
            ("WE'RE", "WE ARE"),
            ("THEY'RE", "THEY ARE"),
            ("I'VE", "I HAVE"),
            ("YOU'VE", "YOU HAVE"),
            ("WE'VE", "WE HAVE"),
            ("THEY'VE", "THEY HAVE"),
            ("I'LL", "I WILL"),
            ("YOU'LL", "YOU WILL"),
            ("HE'LL", "HE WILL"),
            ("SHE'LL", "SHE WILL"),
            ("WE'LL", "WE WILL"),
            ("THEY'LL", "THEY WILL"),
            ("I'D", "I WOULD"),
            ("YOU'D", "YOU WOULD"),
            ("HE'D", "HE WOULD"),
            ("SHE'D", "SHE WOULD"),
            ("WE'D", "WE WOULD"),
            ("THEY'D", "THEY WOULD"),
        ];
        // Longest-match-first so e.g. WOULDN'T wins over a shorter suffix
        contractions.sort_by_key(|(k, _)| std::cmp::Reverse(k.len()));

        let mut abbreviations = vec![
            // Titles
            ("MR.", "MISTER"),
            ("MRS.", "MISSES"),
            ("MS.", "MISS"),
            ("DR.", "DOCTOR"),
            ("PROF.", "PROFESSOR"),
            ("REV.", "REVEREND"),
            ("SEN.", "SENATOR"),
            ("REP.", "REPRESENTATIVE"),
            ("GEN.", "GENERAL"),
            ("COL.", "COLONEL"),
            ("MAJ.", "MAJOR"),
            ("CAPT.", "CAPTAIN"),
            ("LT.", "LIEUTENANT"),
            ("SGT.", "SERGEANT"),
            // Common
            ("ETC.", "ET CETERA"),
            ("VS.", "VERSUS"),
            ("E.G.", "FOR EXAMPLE"),
            ("I.E.", "THAT IS"),
            ("A.M.", "A M"),
            ("P.M.", "P M"),
            ("INC.", "INCORPORATED"),
            ("CORP.", "CORPORATION"),
            ("LTD.", "LIMITED"),
            ("CO.", "COMPANY"),
            // Units
            ("FT.", "FEET"),
            ("IN.", "INCHES"),
            ("LB.", "POUND"),
            ("LBS.", "POUNDS"),
            ("OZ.", "OUNCE"),
            ("PT.", "PINT"),
            ("QT.", "QUART"),
            ("GAL.", "GALLON"),
            ("MPH", "MILES PER HOUR"),
            ("MPG", "MILES PER GALLON"),
            // Streets
            ("ST.", "STREET"),
            ("AVE.", "AVENUE"),
            ("BLVD.", "BOULEVARD"),
            ("RD.", "ROAD"),
            ("CT.", "COURT"),
            ("PL.", "PLACE"),
            ("APT.", "APARTMENT"),
        ];
        abbreviations.sort_by_key(|(k, _)| std::cmp::Reverse(k.len()));

        let mut symbols = HashMap::new();
        symbols.insert('-', "DASH");
        symbols.insert('_', "UNDERSCORE");
        symbols.insert('/', "SLASH");
        symbols.insert('\\', "BACKSLASH");
        symbols.insert('&', "AND");
        symbols.insert('@', "AT");
        symbols.insert('#', "HASH");
        symbols.insert('$', "DOLLAR");
        symbols.insert('%', "PERCENT");
        symbols.insert('*', "ASTERISK");
        symbols.insert('+', "PLUS");
        symbols.insert('=', "EQUALS");
        symbols.insert('<', "LESS THAN");
        symbols.insert('>', "GREATER THAN");
        symbols.insert('"', "QUOTE");
        symbols.insert('(', "");
        symbols.insert(')', "");
        symbols.insert('[', "");
        symbols.insert(']', "");
        symbols.insert('{', "");
        symbols.insert('}', "");
        symbols.insert('\'', "");

        Self {
            contractions,
            abbreviations,
            symbols,
        }
    }

    /// Apply the full normalization pipeline
    ///
    /// Pure function of the input and the static rule tables; malformed
    /// numeral patterns fall back to digit-by-digit spelling rather than
    /// failing.
    pub fn normalize(&self, text: &str) -> NormalizedText {
        let mut canonical = WHITESPACE_REGEX
            .replace_all(text.trim(), " ")
            .to_uppercase();

        for pass in 0..MAX_PASSES {
            let rewritten = self.rewrite_pass(&canonical);
            if rewritten == canonical {
                break;
            }
            if pass == MAX_PASSES - 1 {
                log::warn!("normalization did not reach a fixed point in {} passes", MAX_PASSES);
            }
            canonical = rewritten;
        }

        let tokens = self.parse_tokens(&canonical);
        NormalizedText { tokens, canonical }
    }

    /// One ordered rewrite pass over the token stream
    fn rewrite_pass(&self, text: &str) -> String {
        let mut out: Vec<String> = Vec::new();

        for raw in text.split_whitespace() {
            if is_marker(raw) {
                out.push(raw.to_string());
                continue;
            }

            let expanded = self.expand_contraction(raw);
            for word in expanded.split_whitespace() {
                self.rewrite_word(word, &mut out);
            }
        }

        out.join(" ")
    }

    fn expand_contraction(&self, word: &str) -> String {
        for (pat, repl) in &self.contractions {
            if word.contains(pat) {
                return word.replace(pat, repl);
            }
        }
        word.to_string()
    }

    /// Abbreviations, then numerals, then punctuation-to-prosody, in that
    /// priority order so "DR." never falls through to the generic
    /// trailing-period rule.
    fn rewrite_word(&self, word: &str, out: &mut Vec<String>) {
        // Category 1: abbreviation expansion (longest match first)
        for (abbr, expansion) in &self.abbreviations {
            if word == *abbr {
                out.push(expansion.to_string());
                return;
            }
            // Abbreviation followed by sentence punctuation, e.g. "ETC.,"
            if let Some(rest) = word.strip_prefix(abbr) {
                if !rest.is_empty() && rest.chars().all(|c| ".,!?;:".contains(c)) {
                    out.push(expansion.to_string());
                    push_pause_markers(rest, out);
                    return;
                }
            }
        }

        // Category 2: numeral expansion
        let (core, trailing) = split_trailing_punctuation(word);
        if let Some(words) = self.expand_numeral(core) {
            out.push(words);
            push_pause_markers(trailing, out);
            return;
        }

        // Category 3: punctuation-to-prosody and spoken symbols
        let mut cleaned = String::new();
        for c in core.chars() {
            if c.is_ascii_alphanumeric() {
                cleaned.push(c);
            } else if let Some(name) = self.symbols.get(&c) {
                if !name.is_empty() {
                    cleaned.push(' ');
                    cleaned.push_str(name);
                    cleaned.push(' ');
                }
            }
            // Everything else (stray periods, unicode) is dropped
        }
        for piece in cleaned.split_whitespace() {
            out.push(piece.to_string());
        }
        push_pause_markers(trailing, out);
    }

    /// Expand a numeral token, or None when it is not numeric
    fn expand_numeral(&self, core: &str) -> Option<String> {
        if core.is_empty() {
            return None;
        }

        if let Some(caps) = CURRENCY_REGEX.captures(core) {
            let dollars: u64 = caps[1].parse().ok()?;
            let mut words = format!(
                "{} {}",
                cardinal_words(dollars),
                if dollars == 1 { "DOLLAR" } else { "DOLLARS" }
            );
            if let Some(cents) = caps.get(2) {
                let cents: u64 = cents.as_str().parse().ok()?;
                if cents > 0 {
                    words.push_str(&format!(" AND {} CENTS", cardinal_words(cents)));
                }
            }
            return Some(words);
        }

        if let Some(caps) = ORDINAL_REGEX.captures(core) {
            let n: u64 = caps[1].parse().ok()?;
            return Some(ordinal_words(n));
        }

        if let Some(caps) = DECIMAL_REGEX.captures(core) {
            let int: u64 = caps[1].parse().ok()?;
            let mut words = format!("{} POINT", cardinal_words(int));
            for d in caps[2].chars() {
                words.push(' ');
                words.push_str(digit_word(d));
            }
            return Some(words);
        }

        if CARDINAL_REGEX.is_match(core) {
            return Some(match core.parse::<u64>() {
                Ok(n) if n >= 1000 && n <= 2999 && (n / 100) % 10 != 0 => year_words(n),
                Ok(n) if n < 1_000_000_000 => cardinal_words(n),
                // Too large or unparseable: spell digit by digit
                _ => core.chars().map(digit_word).collect::<Vec<_>>().join(" "),
            });
        }

        None
    }

    /// Turn the canonical word/marker stream into prosody-tagged tokens
    fn parse_tokens(&self, canonical: &str) -> Vec<Token> {
        let mut tokens: Vec<Token> = Vec::new();

        for piece in canonical.split_whitespace() {
            match piece {
                MARK_PAUSE_SHORT => apply_pause(&mut tokens, PAUSE_SHORT_MS, false),
                MARK_PAUSE_MEDIUM => apply_pause(&mut tokens, PAUSE_MEDIUM_MS, false),
                MARK_PAUSE_LONG => apply_pause(&mut tokens, PAUSE_LONG_MS, true),
                MARK_EMPHASIS => {
                    if let Some(last) = tokens.last_mut() {
                        last.prosody.emphasis = 1;
                    }
                }
                word => tokens.push(Token {
                    text: word.to_string(),
                    prosody: ProsodyHint::default(),
                }),
            }
        }

        tokens
    }

    /// Split text into sentences on terminal punctuation, for long-form
    /// segmentation
    pub fn split_sentences(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut current = String::new();

        for ch in text.chars() {
            current.push(ch);
            if ch == '.' || ch == '!' || ch == '?' {
                let trimmed = current.trim().to_string();
                if !trimmed.is_empty() {
                    sentences.push(trimmed);
                }
                current.clear();
            }
        }

        let trimmed = current.trim().to_string();
        if !trimmed.is_empty() {
            sentences.push(trimmed);
        }

        sentences
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_marker(word: &str) -> bool {
    word.starts_with('<') && word.ends_with('>')
}

fn apply_pause(tokens: &mut [Token], pause_ms: u32, boundary: bool) {
    if let Some(last) = tokens.last_mut() {
        last.prosody.pause_after_ms = last.prosody.pause_after_ms.max(pause_ms);
        last.prosody.sentence_boundary |= boundary;
    }
}

/// Split a trailing cluster of sentence punctuation off a token
fn split_trailing_punctuation(word: &str) -> (&str, &str) {
    let end = word
        .rfind(|c: char| !".,!?;:".contains(c))
        .map(|i| i + word[i..].chars().next().map_or(1, char::len_utf8))
        .unwrap_or(0);
    word.split_at(end)
}

/// Emit prosody markers for a trailing punctuation cluster
fn push_pause_markers(trailing: &str, out: &mut Vec<String>) {
    if trailing.is_empty() {
        return;
    }
    if trailing.contains('!') {
        out.push(MARK_EMPHASIS.to_string());
        out.push(MARK_PAUSE_LONG.to_string());
    } else if trailing.contains('.') || trailing.contains('?') {
        out.push(MARK_PAUSE_LONG.to_string());
    } else if trailing.contains(':') {
        out.push(MARK_PAUSE_MEDIUM.to_string());
    } else {
        out.push(MARK_PAUSE_SHORT.to_string());
    }
}

fn digit_word(d: char) -> &'static str {
    match d {
        '0' => "ZERO",
        '1' => "ONE",
        '2' => "TWO",
        '3' => "THREE",
        '4' => "FOUR",
        '5' => "FIVE",
        '6' => "SIX",
        '7' => "SEVEN",
        '8' => "EIGHT",
        '9' => "NINE",
        _ => "",
    }
}

const ONES: [&str; 20] = [
    "ZERO", "ONE", "TWO", "THREE", "FOUR", "FIVE", "SIX", "SEVEN", "EIGHT",
    "NINE", "TEN", "ELEVEN", "TWELVE", "THIRTEEN", "FOURTEEN", "FIFTEEN",
    "SIXTEEN", "SEVENTEEN", "EIGHTEEN", "NINETEEN",
];

const TENS: [&str; 10] = [
    "", "", "TWENTY", "THIRTY", "FORTY", "FIFTY", "SIXTY", "SEVENTY",
    "EIGHTY", "NINETY",
];

/// Cardinal number reading, up to the millions
fn cardinal_words(n: u64) -> String {
    match n {
        0..=19 => ONES[n as usize].to_string(),
        20..=99 => {
            let tens = TENS[(n / 10) as usize];
            if n % 10 == 0 {
                tens.to_string()
            } else {
                format!("{} {}", tens, ONES[(n % 10) as usize])
            }
        }
        100..=999 => {
            let hundreds = format!("{} HUNDRED", ONES[(n / 100) as usize]);
            if n % 100 == 0 {
                hundreds
            } else {
                format!("{} {}", hundreds, cardinal_words(n % 100))
            }
        }
        1_000..=999_999 => {
            let thousands = format!("{} THOUSAND", cardinal_words(n / 1000));
            if n % 1000 == 0 {
                thousands
            } else {
                format!("{} {}", thousands, cardinal_words(n % 1000))
            }
        }
        _ => {
            let millions = format!("{} MILLION", cardinal_words(n / 1_000_000));
            if n % 1_000_000 == 0 {
                millions
            } else {
                format!("{} {}", millions, cardinal_words(n % 1_000_000))
            }
        }
    }
}

/// Pairwise year reading: 1986 -> NINETEEN EIGHTY SIX, 1905 -> NINETEEN
/// OH FIVE, 1900 -> NINETEEN HUNDRED
fn year_words(n: u64) -> String {
    let hi = n / 100;
    let lo = n % 100;
    match lo {
        0 => format!("{} HUNDRED", cardinal_words(hi)),
        1..=9 => format!("{} OH {}", cardinal_words(hi), cardinal_words(lo)),
        _ => format!("{} {}", cardinal_words(hi), cardinal_words(lo)),
    }
}

const ORDINAL_ONES: [&str; 20] = [
    "ZEROTH", "FIRST", "SECOND", "THIRD", "FOURTH", "FIFTH", "SIXTH",
    "SEVENTH", "EIGHTH", "NINTH", "TENTH", "ELEVENTH", "TWELFTH",
    "THIRTEENTH", "FOURTEENTH", "FIFTEENTH", "SIXTEENTH", "SEVENTEENTH",
    "EIGHTEENTH", "NINETEENTH",
];

const ORDINAL_TENS: [&str; 10] = [
    "", "", "TWENTIETH", "THIRTIETH", "FORTIETH", "FIFTIETH", "SIXTIETH",
    "SEVENTIETH", "EIGHTIETH", "NINETIETH",
];

/// Ordinal number reading: 21 -> TWENTY FIRST
fn ordinal_words(n: u64) -> String {
    match n {
        0..=19 => ORDINAL_ONES[n as usize].to_string(),
        20..=99 if n % 10 == 0 => ORDINAL_TENS[(n / 10) as usize].to_string(),
        20..=99 => format!("{} {}", TENS[(n / 10) as usize], ORDINAL_ONES[(n % 10) as usize]),
        _ if n % 100 == 0 => format!("{}TH", cardinal_words(n)),
        _ => {
            let head = n - n % 100;
            format!("{} {}", cardinal_words(head), ordinal_words(n % 100))
        }
    }
}
