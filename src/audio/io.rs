//! WAV input and output via `hound`

use crate::audio::WaveformBuffer;
use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;

/// Save a buffer as a mono PCM WAV at its recorded bit depth
///
/// 12-bit output uses a 16-bit container with the low four bits cleared,
/// the way 12-bit converters of the era actually stored words.
pub fn save_waveform<P: AsRef<Path>>(path: P, buffer: &WaveformBuffer) -> Result<()> {
    let container_bits = match buffer.bit_depth {
        8 => 8,
        12 | 16 => 16,
        other => {
            return Err(Error::InvalidFormat(format!(
                "unsupported bit depth for WAV export: {}",
                other
            )))
        }
    };

    let spec = WavSpec {
        channels: 1,
        sample_rate: buffer.sample_rate,
        bits_per_sample: container_bits,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)
        .map_err(|e| Error::Audio(format!("failed to create WAV writer: {}", e)))?;

    match buffer.bit_depth {
        8 => {
            for &s in &buffer.samples {
                let v = (s.clamp(-1.0, 1.0) * 127.0).round() as i8;
                writer
                    .write_sample(v)
                    .map_err(|e| Error::Audio(format!("failed to write sample: {}", e)))?;
            }
        }
        12 => {
            for &s in &buffer.samples {
                let v = (s.clamp(-1.0, 1.0) * 2047.0).round() as i16;
                writer
                    .write_sample(v << 4)
                    .map_err(|e| Error::Audio(format!("failed to write sample: {}", e)))?;
            }
        }
        _ => {
            for &s in &buffer.samples {
                let v = (s.clamp(-1.0, 1.0) * 32767.0).round() as i16;
                writer
                    .write_sample(v)
                    .map_err(|e| Error::Audio(format!("failed to write sample: {}", e)))?;
            }
        }
    }

    writer
        .finalize()
        .map_err(|e| Error::Audio(format!("failed to finalize WAV: {}", e)))?;
    Ok(())
}

/// Load a mono WAV back into a buffer, normalizing samples to [-1, 1]
pub fn load_waveform<P: AsRef<Path>>(path: P) -> Result<WaveformBuffer> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::FileNotFound(path.display().to_string()));
    }

    let reader =
        WavReader::open(path).map_err(|e| Error::Audio(format!("failed to open WAV: {}", e)))?;
    let spec = reader.spec();
    let channels = spec.channels as usize;

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::Audio(format!("failed to read samples: {}", e)))?,
        SampleFormat::Int => {
            let bits = spec.bits_per_sample;
            let max_val = (1i64 << (bits - 1)) as f32;
            let ints: Vec<i32> = reader
                .into_samples::<i32>()
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| Error::Audio(format!("failed to read samples: {}", e)))?;
            ints.iter().map(|&s| s as f32 / max_val).collect()
        }
    };

    // Mix down to mono if needed
    let mono: Vec<f32> = if channels > 1 {
        samples
            .chunks(channels)
            .map(|c| c.iter().sum::<f32>() / channels as f32)
            .collect()
    } else {
        samples
    };

    Ok(WaveformBuffer::new(
        mono,
        spec.sample_rate,
        spec.bits_per_sample,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = std::env::temp_dir();
        let path = dir.join("zpaytzo_io_test.wav");

        let samples: Vec<f32> = (0..1000)
            .map(|i| (i as f32 * 0.05).sin() * 0.5)
            .collect();
        let buffer = WaveformBuffer::new(samples.clone(), 22050, 16);
        save_waveform(&path, &buffer).unwrap();

        let loaded = load_waveform(&path).unwrap();
        assert_eq!(loaded.sample_rate, 22050);
        assert_eq!(loaded.len(), 1000);
        for (a, b) in samples.iter().zip(loaded.samples.iter()) {
            assert!((a - b).abs() < 1.0 / 16384.0);
        }

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_twelve_bit_container() {
        let dir = std::env::temp_dir();
        let path = dir.join("zpaytzo_io_12bit_test.wav");

        let buffer = WaveformBuffer::new(vec![0.25; 64], 22050, 12);
        save_waveform(&path, &buffer).unwrap();

        let reader = WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().bits_per_sample, 16);
        for s in reader.into_samples::<i16>() {
            // Low nibble is always clear in a 12-in-16 word
            assert_eq!(s.unwrap() & 0xF, 0);
        }

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_file() {
        let err = load_waveform("/nonexistent/zpaytzo.wav").unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
    }

    #[test]
    fn test_rejects_odd_bit_depth() {
        let buffer = WaveformBuffer::new(vec![0.0; 8], 22050, 24);
        let dir = std::env::temp_dir();
        let err = save_waveform(dir.join("zpaytzo_bad_depth.wav"), &buffer).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));
    }
}
