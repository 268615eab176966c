use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use moonshot::SiteConfig;
use moonshot::app::{self, AppOptions, Demo};
use moonshot::sweep::{summarize, sweep};

#[derive(Parser)]
#[command(name = "moonshot", about = "Rockets, ants and a ball on a beam")]
struct Cli {
    /// JSON file overriding the built-in simulation settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the window and play the demos
    Run {
        /// Demo shown first
        #[arg(long, value_enum, default_value_t = Demo::Rocket)]
        demo: Demo,

        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        #[arg(long, default_value_t = 800)]
        width: u32,

        #[arg(long, default_value_t = 630)]
        height: u32,

        /// Font for the stats bar and moon glyph measurement
        #[arg(long, default_value = "assets/FiraSans-Regular.ttf")]
        font: PathBuf,

        /// Where the light/dark choice is remembered
        #[arg(long, default_value = ".moonshot-theme.json")]
        theme_file: PathBuf,
    },

    /// Fly many seeded rocket populations headless and report hits
    Sweep {
        /// Number of independent runs
        #[arg(long, default_value_t = 16)]
        runs: usize,

        /// Ticks per run
        #[arg(long, default_value_t = 20_000)]
        frames: usize,

        /// First seed; runs use consecutive seeds
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Run {
            demo,
            seed,
            width,
            height,
            font,
            theme_file,
        } => app::run(
            config,
            AppOptions {
                demo,
                seed,
                width,
                height,
                font,
                theme_file,
            },
        ),
        Commands::Sweep { runs, frames, seed } => {
            let reports = sweep(&config.engine, seed, runs, frames)?;
            for report in &reports {
                println!(
                    "seed {:>6}: {:>5} generations, {:>3} hits, fastest {}",
                    report.seed,
                    report.generations_run,
                    report.targets_reached,
                    report
                        .fewest_generations_to_target
                        .map_or_else(|| "-".to_string(), |g| g.to_string()),
                );
            }
            let summary = summarize(&reports);
            info!(
                runs = summary.runs,
                runs_with_hits = summary.runs_with_hits,
                total_hits = summary.total_hits,
                fastest = ?summary.fastest,
                "sweep finished"
            );
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}

fn load_config(path: Option<&PathBuf>) -> Result<SiteConfig> {
    let Some(path) = path else {
        return Ok(SiteConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: SiteConfig = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    config.validate()?;
    info!(path = %path.display(), "loaded config");
    Ok(config)
}
