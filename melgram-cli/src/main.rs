mod dataset;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use melgram::storage::PngDirectorySink;
use melgram::{SpectrogramConfig, SpectrogramTransformer};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "melgram")]
#[command(author, version, about = "Render audio to fixed-size viridis mel-spectrogram images", long_about = None)]
struct Cli {
    /// JSON file overriding sample_rate, n_mels, f_max, width, height
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a single audio file to a PNG
    Render {
        /// Audio file (wav, flac, ogg, mp3, m4a, aac)
        input: PathBuf,
        /// Output PNG path
        output: PathBuf,
    },

    /// Render every audio file under a directory tree
    Batch {
        /// Dataset root; each subdirectory is a session
        input: PathBuf,
        /// Directory receiving `<file name>.png` for every input
        output: PathBuf,
        /// Also stream each session into `<dir>/<session>_images.npy`
        #[arg(long)]
        archive_dir: Option<PathBuf>,
    },
}

fn load_config(path: Option<&Path>) -> Result<SpectrogramConfig> {
    match path {
        Some(p) => SpectrogramConfig::from_json_file(p)
            .with_context(|| format!("loading config {}", p.display())),
        None => Ok(SpectrogramConfig::default()),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    log::debug!("config: {config:?}");
    let transformer = SpectrogramTransformer::new(config)?;

    match cli.command {
        Commands::Render { input, output } => {
            let image = transformer
                .transform_file(&input)
                .with_context(|| format!("rendering {}", input.display()))?;
            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            image
                .save(&output)
                .with_context(|| format!("writing {}", output.display()))?;
            log::info!("{} -> {}", input.display(), output.display());
        }
        Commands::Batch {
            input,
            output,
            archive_dir,
        } => {
            let start = Instant::now();
            let sessions = dataset::discover_sessions(&input)?;
            let total: usize = sessions.iter().map(|s| s.files.len()).sum();
            log::info!(
                "found {total} audio files in {} sessions under {}",
                sessions.len(),
                input.display()
            );

            let mut sink = PngDirectorySink::new(&output)
                .with_context(|| format!("creating {}", output.display()))?;
            let report =
                dataset::run_batch(&transformer, &sessions, &mut sink, archive_dir.as_deref())?;

            log::info!(
                "total files processed: {} ({} failed) in {:.1}s",
                report.processed,
                report.failed,
                start.elapsed().as_secs_f64()
            );
        }
    }

    Ok(())
}
