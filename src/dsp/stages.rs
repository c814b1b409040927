//! The individual vintage degradation stages
//!
//! Every stage preserves length and sample rate; only the padding step in
//! the chain itself changes length. Noise sources are seeded per call so
//! two runs over the same input produce the same output.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::audio::compute_rms;
use crate::dsp::filters::{highpass, lowpass};
use crate::dsp::{StageContext, VintageStage};
use crate::synth::Resonator;

const DITHER_SEED: u64 = 0xD17_43_12;
const THERMAL_SEED: u64 = 0x7E55_A1;

/// Soft even-harmonic distortion, DC offset, and thermal hiss of a cheap
/// analog input stage
#[derive(Debug, Default)]
pub struct AnalogFrontEnd;

impl VintageStage for AnalogFrontEnd {
    fn name(&self) -> &'static str {
        "analog_front_end"
    }

    fn process(&self, samples: &[f32], ctx: &StageContext) -> Vec<f32> {
        let i = ctx.intensity;
        let distortion = 0.002 * i;
        let dc_offset = 0.001 * i;
        let hiss = 0.0001 * i;
        let mut rng = StdRng::seed_from_u64(THERMAL_SEED);

        samples
            .iter()
            .map(|&x| {
                let even = distortion * x * x;
                x + even + dc_offset + rng.gen_range(-1.0f32..1.0) * hiss
            })
            .collect()
    }
}

/// Band-limiting the way an 8 kHz-class output path did: low-pass whose
/// cutoff slides down with intensity, bass roll-off, mild speech emphasis
#[derive(Debug, Default)]
pub struct FrequencyShaper;

impl VintageStage for FrequencyShaper {
    fn name(&self) -> &'static str {
        "frequency_shaping"
    }

    fn process(&self, samples: &[f32], ctx: &StageContext) -> Vec<f32> {
        let sr = ctx.sample_rate as f32;
        let i = ctx.intensity;

        // Cutoff slides from just under Nyquist down to 8 kHz at full
        // intensity; low sample rates have no headroom to slide
        let nyquist_limit = sr * 0.5 * 0.95;
        let cutoff = if nyquist_limit > 8000.0 {
            nyquist_limit - i * (nyquist_limit - 8000.0)
        } else {
            nyquist_limit
        };
        let mut out = lowpass(samples, cutoff, sr);

        let bass_cutoff = 200.0 * (1.0 + 0.5 * i);
        out = highpass(&out, bass_cutoff, sr);

        // Presence boost around 3 kHz keeps speech intelligible through
        // the band limit
        if i > 0.3 {
            let boost = 0.2 * i;
            let mut peak = Resonator::default();
            peak.set(3000.0, 500.0, sr);
            for x in out.iter_mut() {
                *x += boost * peak.step(*x);
            }
        }

        out
    }
}

/// Requantization to the configured word size
///
/// Full intensity truncates hard, the authentic zipper noise of 1986.
/// Below that, triangular dither scaled by `1 - intensity` spreads the
/// error into a noise floor.
#[derive(Debug)]
pub struct Quantizer {
    pub extra_noise: bool,
}

impl VintageStage for Quantizer {
    fn name(&self) -> &'static str {
        "quantization"
    }

    fn process(&self, samples: &[f32], ctx: &StageContext) -> Vec<f32> {
        let levels = (1u32 << (ctx.bit_depth - 1)) as f32;
        let step = 1.0 / levels;
        let i = ctx.intensity;
        let mut rng = StdRng::seed_from_u64(DITHER_SEED);

        samples
            .iter()
            .map(|&x| {
                let x = x.clamp(-1.0, 1.0);
                let mut q = if i >= 1.0 {
                    (x * levels).trunc() / levels
                } else {
                    // TPDF dither: sum of two uniforms
                    let amp = 0.5 * step * (1.0 - i);
                    let dither =
                        (rng.gen_range(-1.0f32..1.0) + rng.gen_range(-1.0f32..1.0)) * 0.5 * amp;
                    ((x + dither) * levels).round() / levels
                };
                if self.extra_noise && i > 0.0 {
                    q += rng.gen_range(-1.0f32..1.0) * 0.5 * step * i;
                }
                q
            })
            .collect()
    }
}

/// Soft saturation, drive scaled by intensity
#[derive(Debug, Default)]
pub struct Saturator;

impl VintageStage for Saturator {
    fn name(&self) -> &'static str {
        "saturation"
    }

    fn process(&self, samples: &[f32], ctx: &StageContext) -> Vec<f32> {
        let drive = 1.0 + 2.0 * ctx.intensity;
        let norm = drive.tanh();
        samples.iter().map(|&x| (x * drive).tanh() / norm).collect()
    }
}

/// High-band lift for a crisper vintage character
#[derive(Debug, Default)]
pub struct SpectralEnhancer;

impl VintageStage for SpectralEnhancer {
    fn name(&self) -> &'static str {
        "spectral_enhancement"
    }

    fn process(&self, samples: &[f32], ctx: &StageContext) -> Vec<f32> {
        let highs = highpass(samples, 3000.0, ctx.sample_rate as f32);
        samples
            .iter()
            .zip(highs.iter())
            .map(|(&x, &h)| x + 0.15 * h)
            .collect()
    }
}

/// Second-harmonic warmth
#[derive(Debug, Default)]
pub struct HarmonicEnricher;

impl VintageStage for HarmonicEnricher {
    fn name(&self) -> &'static str {
        "harmonic_enrichment"
    }

    fn process(&self, samples: &[f32], _ctx: &StageContext) -> Vec<f32> {
        samples.iter().map(|&x| x + 0.1 * x * x.abs()).collect()
    }
}

/// Windowed downward gate that thins out the noise floor between words
#[derive(Debug, Default)]
pub struct NoiseGate;

const GATE_WINDOW: usize = 256;
const GATE_THRESHOLD: f32 = 0.01;
const GATE_ATTENUATION: f32 = 0.5;

impl VintageStage for NoiseGate {
    fn name(&self) -> &'static str {
        "noise_reduction"
    }

    fn process(&self, samples: &[f32], _ctx: &StageContext) -> Vec<f32> {
        let mut out = samples.to_vec();
        for window in out.chunks_mut(GATE_WINDOW) {
            if compute_rms(window) < GATE_THRESHOLD {
                for s in window.iter_mut() {
                    *s *= GATE_ATTENUATION;
                }
            }
        }
        out
    }
}

/// Three-tap smoothing that takes the edge off concatenation seams
#[derive(Debug, Default)]
pub struct TemporalSmoother;

impl VintageStage for TemporalSmoother {
    fn name(&self) -> &'static str {
        "temporal_smoothing"
    }

    fn process(&self, samples: &[f32], _ctx: &StageContext) -> Vec<f32> {
        if samples.len() < 3 {
            return samples.to_vec();
        }
        let mut out = samples.to_vec();
        for n in 1..samples.len() - 1 {
            out[n] = 0.25 * samples[n - 1] + 0.5 * samples[n] + 0.25 * samples[n + 1];
        }
        out
    }
}
