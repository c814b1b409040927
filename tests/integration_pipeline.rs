//! Pipeline Integration Tests for Zpaytzo
//!
//! These tests verify the complete synthesis pipeline from text to audio.
//! They exercise the full flow: text → normalization → phonemes → diphone
//! synthesis → vintage degradation → WAV.
//!
//! # Test Categories
//!
//! 1. **Lexical Engine**: normalization scenarios and idempotence
//! 2. **Synthesis**: length contract, determinism, scenario renders
//! 3. **Degradation**: quantization grid, padding contract, presets

use zpaytzo::audio::ms_to_samples;
use zpaytzo::pipeline::CancelToken;
use zpaytzo::synth::duration_samples;
use zpaytzo::text::{PhonemeConverter, PhonemeClass, Stress, TextNormalizer};
use zpaytzo::{QualityConfig, QualityPreset, ZpaytzoEngine};

// ============================================================================
// Lexical Engine Scenarios
// ============================================================================

/// Scenario: "Dr. Sbaitso" expands the title and uppercases
#[test]
fn test_scenario_doctor_sbaitso() {
    println!("📖 Testing title expansion:");

    let normalizer = TextNormalizer::new();
    let normalized = normalizer.normalize("Dr. Sbaitso");

    println!("   'Dr. Sbaitso' → '{}'", normalized.canonical());
    assert_eq!(normalized.canonical(), "DOCTOR SBAITSO");
    assert_eq!(normalized.words(), vec!["DOCTOR", "SBAITSO"]);
}

/// Scenario: "1986" reads as a year, not a cardinal
#[test]
fn test_scenario_year_reading() {
    println!("🔢 Testing year-style number reading:");

    let normalizer = TextNormalizer::new();
    let normalized = normalizer.normalize("1986");

    println!("   '1986' → '{}'", normalized.canonical());
    assert_eq!(normalized.canonical(), "NINETEEN EIGHTY SIX");
}

/// Normalization is idempotent: canonical text is a fixed point
#[test]
fn test_normalization_idempotence() {
    println!("🔁 Testing normalization idempotence:");

    let normalizer = TextNormalizer::new();
    let inputs = [
        "Dr. Sbaitso says: it's 1986!",
        "Mr. Smith paid $3.50 for the 21st time.",
        "don't stop, won't stop...",
        "HELLO WORLD",
    ];

    for input in inputs {
        let once = normalizer.normalize(input);
        let twice = normalizer.normalize(once.canonical());
        println!("   '{}' → '{}'", input, once.canonical());
        assert_eq!(once, twice, "re-normalizing changed: {:?}", input);
    }
}

// ============================================================================
// Synthesis Scenarios
// ============================================================================

/// Scenario: "cat" is stop-vowel-stop with a stressed nucleus
#[test]
fn test_scenario_cat_phonemes() {
    println!("🐱 Testing 'cat' phoneme structure:");

    let normalizer = TextNormalizer::new();
    let converter = PhonemeConverter::new();
    let normalized = normalizer.normalize("cat");
    let units = converter.convert_word(&normalized.words()[0]);

    assert_eq!(units.len(), 3);
    assert_eq!(units[0].phoneme.class(), PhonemeClass::Stop);
    assert!(units[1].phoneme.is_vowel());
    assert_eq!(units[2].phoneme.class(), PhonemeClass::Stop);
    assert_eq!(units[1].stress, Stress::Primary);

    for u in &units {
        println!("   {} ({} ms, {:?})", u.phoneme.symbol(), u.duration_ms, u.stress);
    }
}

/// Output length equals the sum of scaled phoneme durations plus padding
#[test]
fn test_length_contract() {
    println!("📏 Testing length contract:");

    let config = QualityConfig::authentic_1986();
    let engine = ZpaytzoEngine::new(config.clone()).unwrap();

    let normalizer = TextNormalizer::new();
    let converter = PhonemeConverter::new();
    let sequence = converter.convert_sequence(
        &normalizer.normalize("hello world"),
        config.speaking_rate,
    );

    let speech_samples: usize = sequence
        .units()
        .iter()
        .map(|u| duration_samples(u.duration_ms, config.sample_rate))
        .sum();
    let padding_samples = ms_to_samples(config.padding.start_silence_ms, config.sample_rate)
        + ms_to_samples(config.padding.end_silence_ms, config.sample_rate);

    let result = engine.render("hello world").unwrap();
    println!(
        "   speech {} + padding {} = {} samples, got {}",
        speech_samples,
        padding_samples,
        speech_samples + padding_samples,
        result.audio.len()
    );
    assert_eq!(result.audio.len(), speech_samples + padding_samples);
}

/// Same text and config render bit-identical audio
#[test]
fn test_determinism_across_engines() {
    println!("🎲 Testing cross-engine determinism:");

    let a = ZpaytzoEngine::new(QualityConfig::enhanced_vintage()).unwrap();
    let b = ZpaytzoEngine::new(QualityConfig::enhanced_vintage()).unwrap();

    let ra = a.render("the same text every time").unwrap();
    let rb = b.render("the same text every time").unwrap();

    println!("   {} samples rendered twice", ra.audio.len());
    assert_eq!(ra.audio, rb.audio);
}

/// Scenario: pure punctuation renders padding-only silence
#[test]
fn test_scenario_pure_punctuation() {
    println!("🤫 Testing punctuation-only input:");

    let config = QualityConfig::authentic_1986();
    let engine = ZpaytzoEngine::new(config.clone()).unwrap();
    let result = engine.render("?!, ... ;").unwrap();

    let expected = ms_to_samples(config.padding.start_silence_ms, config.sample_rate)
        + ms_to_samples(config.padding.end_silence_ms, config.sample_rate);
    println!("   {} samples of pure padding", result.audio.len());
    assert_eq!(result.audio.len(), expected);
    assert!(result.audio.iter().all(|&s| s == 0.0));
    assert_eq!(result.phoneme_count, 0);
}

/// Cancellation between stages aborts cleanly
#[test]
fn test_cancellation() {
    println!("🛑 Testing cooperative cancellation:");

    let engine = ZpaytzoEngine::new(QualityConfig::authentic_1986()).unwrap();
    let token = CancelToken::new();
    token.cancel();

    let err = engine.render_with("never rendered", &token).unwrap_err();
    println!("   cancelled render returned: {}", err);
    assert!(matches!(err, zpaytzo::Error::Cancelled));
}

// ============================================================================
// Degradation Chain
// ============================================================================

/// Full-intensity 8-bit output collapses onto the quantized level count
#[test]
fn test_quantization_grid_at_full_intensity() {
    println!("🪜 Testing 8-bit quantization grid:");

    let mut config = QualityConfig::authentic_1986();
    // Isolate quantization from the other degradation stages
    config.features.analog_simulation = false;
    config.features.frequency_shaping = false;
    config.features.quantization_noise = false;
    config.padding = zpaytzo::config::PaddingConfig::none();

    let engine = ZpaytzoEngine::new(config).unwrap();
    let result = engine.render("grid check").unwrap();

    // Saturation runs after quantization at full drive, but it maps the
    // grid monotonically; truncated values still cluster on few levels
    let distinct: std::collections::BTreeSet<i32> = result
        .audio
        .iter()
        .map(|&s| (s * 10000.0) as i32)
        .collect();
    assert!(distinct.len() <= 257, "too many distinct levels: {}", distinct.len());
}

/// Scenario: preset switch changes the sound but not the text front end
#[test]
fn test_scenario_preset_switch() {
    println!("🎚️  Testing preset switching:");

    let engine = ZpaytzoEngine::new(QualityConfig::authentic_1986()).unwrap();
    let vintage = engine.render("switch the preset").unwrap();

    engine.set_preset(QualityPreset::ModernRetro);
    let modern = engine.render("switch the preset").unwrap();

    println!(
        "   authentic: {}-bit, modern: {}-bit",
        vintage.bit_depth, modern.bit_depth
    );
    assert_eq!(vintage.bit_depth, 8);
    assert_eq!(modern.bit_depth, 16);
    assert_eq!(vintage.phoneme_count, modern.phoneme_count);
    assert_ne!(vintage.audio, modern.audio);
}

/// Padded edges are silent and faded edges ramp in
#[test]
fn test_padding_and_fade_contract() {
    println!("🔇 Testing padding contract:");

    let config = QualityConfig::modern_retro();
    let engine = ZpaytzoEngine::new(config.clone()).unwrap();
    let result = engine.render("padded speech").unwrap();

    let start_pad = ms_to_samples(config.padding.start_silence_ms, config.sample_rate);
    let end_pad = ms_to_samples(config.padding.end_silence_ms, config.sample_rate);

    assert!(result.audio[..start_pad].iter().all(|&s| s == 0.0));
    assert!(result.audio[result.audio.len() - end_pad..]
        .iter()
        .all(|&s| s == 0.0));
    println!(
        "   {} ms lead-in and {} ms tail verified silent",
        config.padding.start_silence_ms, config.padding.end_silence_ms
    );
}

// ============================================================================
// End-to-End I/O
// ============================================================================

/// Render, save, and reload a WAV at the vintage bit depth
#[test]
fn test_render_save_reload() {
    println!("💾 Testing WAV round trip:");

    let engine = ZpaytzoEngine::new(QualityConfig::authentic_1986()).unwrap();
    let result = engine.render("Hello, I am Doctor Sbaitso.").unwrap();

    let path = std::env::temp_dir().join("zpaytzo_integration.wav");
    result.save(&path).unwrap();

    let loaded = zpaytzo::audio::load_waveform(&path).unwrap();
    println!(
        "   wrote {} samples at {} Hz, read back {}",
        result.audio.len(),
        result.sample_rate,
        loaded.len()
    );
    assert_eq!(loaded.len(), result.audio.len());
    assert_eq!(loaded.sample_rate, result.sample_rate);
    assert_eq!(loaded.bit_depth, 8);

    std::fs::remove_file(&path).ok();
}

/// Long-form synthesis splits, renders, and concatenates
#[test]
fn test_long_form_synthesis() {
    println!("📜 Testing long-form synthesis:");

    let engine = ZpaytzoEngine::new(QualityConfig::authentic_1986()).unwrap();
    let text = "My name is Doctor Sbaitso. I am here to help you. \
                Please tell me about your problems. I will listen to everything you say.";

    let result = engine.render_long(text, &CancelToken::new()).unwrap();
    println!(
        "   {} phoneme units, {:.2}s of audio",
        result.phoneme_count, result.duration
    );
    assert!(result.duration > 2.0);
    assert!(result.phoneme_count > 40);
}
