//! Zpaytzo CLI - 1986-era speech synthesis
//!
//! Command-line interface for the Zpaytzo synthesizer

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use zpaytzo::{
    pipeline::CancelToken, QualityConfig, QualityPreset, Result, ZpaytzoEngine,
};

#[derive(Parser)]
#[command(
    name = "zpaytzo",
    about = "Dr. Sbaitso-style diphone speech synthesizer",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize speech from text
    Say {
        /// Text to synthesize
        text: String,

        /// Output audio file path
        #[arg(short, long, default_value = "output.wav")]
        output: PathBuf,

        /// Quality preset (authentic_1986, enhanced_vintage, modern_retro)
        #[arg(short, long, default_value = "authentic_1986")]
        preset: String,

        /// Configuration file path (overrides the preset)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Vintage intensity override (0.0 = clean, 1.0 = full vintage)
        #[arg(long)]
        intensity: Option<f32>,

        /// Speaking rate override (1.0 = normal)
        #[arg(long)]
        rate: Option<f32>,
    },

    /// Synthesize a whole text file, sentence by sentence
    SayFile {
        /// Input text file
        #[arg(short, long)]
        input: PathBuf,

        /// Output audio file path
        #[arg(short, long, default_value = "output.wav")]
        output: PathBuf,

        /// Quality preset (authentic_1986, enhanced_vintage, modern_retro)
        #[arg(short, long, default_value = "authentic_1986")]
        preset: String,

        /// Configuration file path (overrides the preset)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Generate a configuration file for a preset
    InitConfig {
        /// Output path for config file
        #[arg(short, long, default_value = "zpaytzo.json")]
        output: PathBuf,

        /// Preset to start from
        #[arg(short, long, default_value = "authentic_1986")]
        preset: String,
    },

    /// List the built-in quality presets
    ListPresets,

    /// Show information about the system
    Info,
}

fn load_config(
    config: Option<PathBuf>,
    preset: &str,
    intensity: Option<f32>,
    rate: Option<f32>,
) -> Result<QualityConfig> {
    let mut cfg = if let Some(path) = config {
        QualityConfig::load(path)?
    } else {
        QualityConfig::preset(parse_preset(preset)?)
    };
    if let Some(i) = intensity {
        cfg.vintage_intensity = i;
    }
    if let Some(r) = rate {
        cfg.speaking_rate = r;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn parse_preset(name: &str) -> Result<QualityPreset> {
    QualityPreset::from_name(name).ok_or_else(|| {
        zpaytzo::Error::Config(format!(
            "unknown preset '{}', expected one of: authentic_1986, enhanced_vintage, modern_retro",
            name
        ))
    })
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Say {
            text,
            output,
            preset,
            config,
            intensity,
            rate,
        } => {
            let cfg = load_config(config, &preset, intensity, rate)?;
            let engine = ZpaytzoEngine::new(cfg)?;

            let result = engine.render_to_file(&text, &output.display().to_string())?;

            log::info!("Duration: {}", result.duration_formatted());
            log::info!("Processing time: {:.2}s", result.processing_time);
            log::info!("Real-time factor: {:.3}x", result.rtf);
            if result.fallback_units > 0 {
                log::info!("Fallback diphones: {}", result.fallback_units);
            }

            println!("✓ Synthesis complete: {}", output.display());
        }

        Commands::SayFile {
            input,
            output,
            preset,
            config,
        } => {
            let text = std::fs::read_to_string(&input)?;
            let cfg = load_config(config, &preset, None, None)?;
            let engine = ZpaytzoEngine::new(cfg)?;

            log::info!("Input file: {}", input.display());
            log::info!("Text length: {} characters", text.len());

            let result = engine.render_long(&text, &CancelToken::new())?;
            result.save(&output)?;

            log::info!("Duration: {}", result.duration_formatted());
            log::info!("Processing time: {:.2}s", result.processing_time);
            log::info!("Real-time factor: {:.3}x", result.rtf);

            println!("✓ Synthesis complete: {}", output.display());
        }

        Commands::InitConfig { output, preset } => {
            let config = QualityConfig::preset(parse_preset(&preset)?);
            config.save(&output)?;

            println!("✓ Configuration saved to: {}", output.display());
        }

        Commands::ListPresets => {
            println!("Built-in quality presets:");
            println!();
            for preset in QualityPreset::all() {
                let cfg = QualityConfig::preset(preset);
                println!(
                    "  {:<18} {}-bit, {} formants, intensity {:.1}",
                    preset.name(),
                    cfg.bit_depth,
                    cfg.formant_count,
                    cfg.vintage_intensity
                );
                println!("  {:<18} {}", "", preset.description());
                println!();
            }
        }

        Commands::Info => {
            println!("Zpaytzo - 1986-era Diphone Speech Synthesizer");
            println!("=============================================");
            println!("Version: {}", zpaytzo::VERSION);
            println!("Platform: {}", std::env::consts::OS);
            println!("Architecture: {}", std::env::consts::ARCH);
            println!();
            println!("Features:");
            println!("  - Rule-based text normalization and prosody hints");
            println!("  - Grapheme-to-phoneme conversion with exception dictionary");
            println!("  - Diphone concatenation with formant synthesis");
            println!("  - Configurable vintage signal degradation");
            println!("  - Parallel long-form synthesis with Rayon");
            println!();
            println!("Sample Rate: {} Hz", zpaytzo::SAMPLE_RATE);
            println!("Frame Hop: {} ms", zpaytzo::FRAME_MS);
            println!("Base Pitch: {} Hz", zpaytzo::BASE_PITCH_HZ);
            println!();
            println!("CPU Cores: {}", num_cpus::get());
            println!("Physical Cores: {}", num_cpus::get_physical());
        }
    }

    Ok(())
}
