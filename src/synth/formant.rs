//! Source-filter formant synthesis over the diphone timeline
//!
//! Excitation (sawtooth pulse train or noise) drives a small parallel bank
//! of second-order resonators, retuned every 5 ms frame from the diphone
//! control points. The whole utterance is rendered on one timeline, so the
//! output length is exactly the sum of the scaled phoneme durations.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::audio::{normalize_peak, WaveformBuffer};
use crate::config::QualityConfig;
use crate::synth::diphone::{DiphoneSource, DiphoneStore, FormantFrame, MAX_FORMANTS};
use crate::text::phoneme::{Phoneme, PhonemeSequence, Stress};
use crate::FRAME_MS;

/// Fixed excitation seed keeps renders bit-identical across runs
const NOISE_SEED: u64 = 0x5BA1_7500;

/// Vibrato rate for the pitch variation term, in Hz
const VIBRATO_HZ: f32 = 4.0;

/// Mixing weights for the resonator bank, strongest formant first
const FORMANT_MIX: [f32; MAX_FORMANTS] = [0.5, 0.3, 0.2, 0.12, 0.08];

/// Peak level after normalization, leaving headroom for the DSP chain
const TARGET_PEAK: f32 = 0.8;

/// Amplitude boost for primary-stressed phonemes
const STRESS_GAIN: f32 = 1.25;

/// Second-order digital resonator in the classic Klatt form
#[derive(Debug, Clone, Copy, Default)]
pub struct Resonator {
    a: f32,
    b: f32,
    c: f32,
    y1: f32,
    y2: f32,
}

impl Resonator {
    /// Retune to a center frequency and bandwidth without clearing state
    pub fn set(&mut self, freq: f32, bandwidth: f32, sample_rate: f32) {
        let r = (-std::f32::consts::PI * bandwidth / sample_rate).exp();
        self.b = 2.0 * r * (2.0 * std::f32::consts::PI * freq / sample_rate).cos();
        self.c = -(r * r);
        self.a = 1.0 - self.b - self.c;
    }

    pub fn step(&mut self, x: f32) -> f32 {
        let y = self.a * x + self.b * self.y1 + self.c * self.y2;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }

    pub fn reset(&mut self) {
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

/// Synthesis output plus bookkeeping about inventory coverage
#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    pub buffer: WaveformBuffer,
    /// Diphone pairs rendered from reconstructed fallback templates
    pub fallback_units: usize,
}

/// The diphone-driven formant synthesizer
#[derive(Debug, Default)]
pub struct FormantSynthesizer;

impl FormantSynthesizer {
    pub fn new() -> Self {
        Self
    }

    /// Render a phoneme sequence to audio
    ///
    /// The buffer length equals the sum of the per-unit durations in
    /// samples. A silent or empty sequence yields a silent buffer of the
    /// corresponding length; this never fails.
    pub fn synthesize(
        &self,
        sequence: &PhonemeSequence,
        store: &DiphoneStore,
        config: &QualityConfig,
    ) -> SynthesizedAudio {
        let units = sequence.units();

        // Per-unit lengths and phoneme centers on one shared timeline
        let lengths: Vec<usize> = units
            .iter()
            .map(|u| duration_samples(u.duration_ms, config.sample_rate))
            .collect();
        let total: usize = lengths.iter().sum();

        if units.is_empty() || total == 0 {
            return SynthesizedAudio {
                buffer: WaveformBuffer::new(Vec::new(), config.sample_rate, 16),
                fallback_units: 0,
            };
        }

        let mut centers = Vec::with_capacity(units.len());
        let mut offset = 0usize;
        for len in &lengths {
            centers.push(offset + len / 2);
            offset += len;
        }

        let mut out = vec![0.0f32; total];
        let mut state = VoiceState::new(config);
        let mut fallback_units = 0usize;

        // Steady head: timeline start up to the first phoneme center
        state.render_region(
            &mut out,
            0,
            centers[0],
            &FormantFrame::for_phoneme(units[0].phoneme),
            &FormantFrame::for_phoneme(units[0].phoneme),
            voicing_of(units[0].phoneme),
            voicing_of(units[0].phoneme),
            stress_gain(units[0].stress),
            stress_gain(units[0].stress),
        );

        // Diphone regions: center of each phoneme to center of the next
        for (i, (left, right)) in sequence.pairs().enumerate() {
            let (template, source) = store.lookup(left.phoneme, right.phoneme);
            if source == DiphoneSource::Fallback {
                fallback_units += 1;
                log::debug!(
                    "no stored unit for {}-{}, using fallback",
                    left.phoneme.symbol(),
                    right.phoneme.symbol()
                );
            }
            state.render_region(
                &mut out,
                centers[i],
                centers[i + 1],
                &template.start,
                &template.end,
                voicing_of(left.phoneme),
                voicing_of(right.phoneme),
                stress_gain(left.stress),
                stress_gain(right.stress),
            );
        }

        // Steady tail: last phoneme center to the end of the timeline
        let last = units.len() - 1;
        state.render_region(
            &mut out,
            centers[last],
            total,
            &FormantFrame::for_phoneme(units[last].phoneme),
            &FormantFrame::for_phoneme(units[last].phoneme),
            voicing_of(units[last].phoneme),
            voicing_of(units[last].phoneme),
            stress_gain(units[last].stress),
            stress_gain(units[last].stress),
        );

        if config.features.diphone_smoothing {
            smooth_seams(&mut out, &centers);
        }
        normalize_peak(&mut out, TARGET_PEAK);

        SynthesizedAudio {
            buffer: WaveformBuffer::new(out, config.sample_rate, 16),
            fallback_units,
        }
    }
}

/// Running synthesis state: excitation phase, resonator bank, noise source
struct VoiceState {
    sample_rate: f32,
    base_pitch_hz: f32,
    pitch_variation: f32,
    formant_count: usize,
    frame_len: usize,
    resonators: [Resonator; MAX_FORMANTS],
    phase: f32,
    rng: StdRng,
    /// Global sample index, carried across regions for a continuous pitch
    /// contour
    t: usize,
}

impl VoiceState {
    fn new(config: &QualityConfig) -> Self {
        let sample_rate = config.sample_rate as f32;
        Self {
            sample_rate,
            base_pitch_hz: config.base_pitch_hz,
            pitch_variation: config.pitch_variation,
            formant_count: config.formant_count.min(MAX_FORMANTS),
            frame_len: ((config.sample_rate as usize * FRAME_MS as usize) / 1000).max(1),
            resonators: [Resonator::default(); MAX_FORMANTS],
            phase: 0.0,
            rng: StdRng::seed_from_u64(NOISE_SEED),
            t: 0,
        }
    }

    /// Render one region of the timeline, easing from the start frame to
    /// the end frame. Parameters update once per 5 ms frame; excitation
    /// and filter state run per sample.
    #[allow(clippy::too_many_arguments)]
    fn render_region(
        &mut self,
        out: &mut [f32],
        start: usize,
        end: usize,
        from: &FormantFrame,
        to: &FormantFrame,
        voicing_from: f32,
        voicing_to: f32,
        gain_from: f32,
        gain_to: f32,
    ) {
        let span = end.saturating_sub(start);
        if span == 0 {
            return;
        }

        let mut pos = start;
        while pos < end {
            let chunk = self.frame_len.min(end - pos);
            // Cosine easing evaluated at the frame midpoint
            let u = (pos + chunk / 2 - start) as f32 / span as f32;
            let eased = 0.5 * (1.0 - (std::f32::consts::PI * u).cos());
            let frame = from.lerp(to, eased);
            let voicing = voicing_from + (voicing_to - voicing_from) * eased;
            let gain = gain_from + (gain_to - gain_from) * eased;

            for k in 0..self.formant_count {
                self.resonators[k].set(frame.freq[k].max(1.0), frame.band[k], self.sample_rate);
            }

            for sample in out[pos..pos + chunk].iter_mut() {
                let src = self.excitation(voicing);
                let mut acc = 0.0f32;
                for k in 0..self.formant_count {
                    acc += frame.amp[k] * FORMANT_MIX[k] * self.resonators[k].step(src);
                }
                *sample = acc * gain;
                self.t += 1;
            }
            pos += chunk;
        }
    }

    /// One excitation sample: band-limited-ish sawtooth pulse train blended
    /// with noise by the voicing fraction
    fn excitation(&mut self, voicing: f32) -> f32 {
        let t_sec = self.t as f32 / self.sample_rate;
        let vibrato =
            (2.0 * std::f32::consts::PI * VIBRATO_HZ * t_sec).sin() * self.pitch_variation;
        let f0 = self.base_pitch_hz * (1.0 + vibrato);

        self.phase += f0 / self.sample_rate;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        let saw = 2.0 * self.phase - 1.0;
        let noise: f32 = self.rng.gen_range(-1.0..1.0);

        voicing * saw + (1.0 - voicing) * noise * 0.7
    }
}

/// Triangular smoothing over a few samples around each concatenation point
fn smooth_seams(samples: &mut [f32], centers: &[usize]) {
    const HALF_WINDOW: usize = 24;
    for &c in centers {
        let lo = c.saturating_sub(HALF_WINDOW).max(1);
        let hi = (c + HALF_WINDOW).min(samples.len().saturating_sub(1));
        for n in lo..hi {
            samples[n] = 0.25 * samples[n - 1] + 0.5 * samples[n] + 0.25 * samples[n + 1];
        }
    }
}

fn voicing_of(p: Phoneme) -> f32 {
    if p == Phoneme::Sil {
        0.0
    } else if p.is_voiced() {
        1.0
    } else {
        0.0
    }
}

fn stress_gain(stress: Stress) -> f32 {
    match stress {
        Stress::Primary => STRESS_GAIN,
        Stress::Unstressed => 1.0,
    }
}

/// Unit duration in samples, rounded to nearest
pub fn duration_samples(duration_ms: u32, sample_rate: u32) -> usize {
    ((duration_ms as u64 * sample_rate as u64 + 500) / 1000) as usize
}
