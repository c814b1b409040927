//! Benchmark for the synthesis pipeline

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use zpaytzo::synth::{DiphoneStore, FormantSynthesizer};
use zpaytzo::text::{PhonemeConverter, TextNormalizer};
use zpaytzo::{QualityConfig, ZpaytzoEngine};

fn bench_text_processing(c: &mut Criterion) {
    let normalizer = TextNormalizer::new();
    let converter = PhonemeConverter::new();

    let plain_text = "Hello world, this is a test of the speech synthesis system.";
    let numeric_text = "In 1986 Dr. Smith paid $3.50 for the 21st edition.";

    c.bench_function("normalize_plain", |b| {
        b.iter(|| normalizer.normalize(black_box(plain_text)))
    });

    c.bench_function("normalize_numeric", |b| {
        b.iter(|| normalizer.normalize(black_box(numeric_text)))
    });

    let normalized = normalizer.normalize(plain_text);
    c.bench_function("phoneme_conversion", |b| {
        b.iter(|| converter.convert_sequence(black_box(&normalized), black_box(1.0)))
    });
}

fn bench_synthesis(c: &mut Criterion) {
    let config = QualityConfig::authentic_1986();
    let normalizer = TextNormalizer::new();
    let converter = PhonemeConverter::new();
    let store = DiphoneStore::builtin();
    let synthesizer = FormantSynthesizer::new();

    let sequence = converter.convert_sequence(
        &normalizer.normalize("the quick brown fox jumps over the lazy dog"),
        config.speaking_rate,
    );

    c.bench_function("formant_synthesis", |b| {
        b.iter(|| synthesizer.synthesize(black_box(&sequence), &store, &config))
    });
}

fn bench_full_pipeline(c: &mut Criterion) {
    let engine = ZpaytzoEngine::new(QualityConfig::authentic_1986()).unwrap();
    let text = "My name is Doctor Sbaitso. Please tell me about your problems.";

    c.bench_function("render_full_pipeline", |b| {
        b.iter(|| engine.render(black_box(text)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_text_processing,
    bench_synthesis,
    bench_full_pipeline
);
criterion_main!(benches);
