use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;
use vanrakshak_core::config::AppConfig;
use vanrakshak_core::error::{ErrorCode, RecognitionError};
use vanrakshak_core::feed::{ActivityType, FeedSimulator, LiveFeed};
use vanrakshak_core::recognition::{ImagePayload, SpeciesRecognizer};
use vanrakshak_core::AcousticMonitor;

#[derive(Parser, Debug)]
#[command(
    name = "vanrakshak_cli",
    about = "Diagnostics harness for the Vanrakshak simulators and species recognition"
)]
struct Cli {
    /// JSON config file (defaults to assets/vanrakshak_config.json)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed the random source for reproducible output
    #[arg(long)]
    seed: Option<u64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate back-dated events for an initial view
    Seed {
        #[arg(long)]
        count: Option<usize>,
        /// Only print events of this type (e.g. poaching, animal-movement)
        #[arg(long)]
        only: Option<ActivityType>,
    },
    /// Run the live feed and print events as JSON lines
    Stream {
        /// Stop after this many events
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Override the configured tick interval
        #[arg(long)]
        interval_ms: Option<u64>,
    },
    /// Seed a feed and print dashboard counters
    Stats {
        #[arg(long)]
        count: Option<usize>,
    },
    /// Map a raw classifier label to a wildlife record
    MapLabel {
        #[arg(long)]
        label: String,
        #[arg(long, default_value_t = 1.0)]
        probability: f64,
    },
    /// Classify an image file through the provider chain
    Classify {
        #[arg(long)]
        image: PathBuf,
    },
    /// Poll the acoustic monitor and print detections
    Listen {
        #[arg(long, default_value_t = 50)]
        polls: usize,
    },
}

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli
        .config
        .as_ref()
        .map(AppConfig::load_from_file)
        .unwrap_or_else(AppConfig::load);

    match cli.command {
        Commands::Seed { count, only } => run_seed(&config, cli.seed, count, only),
        Commands::Stream { limit, interval_ms } => {
            run_stream(&config, cli.seed, limit, interval_ms)
        }
        Commands::Stats { count } => run_stats(&config, cli.seed, count),
        Commands::MapLabel { label, probability } => run_map_label(&label, probability),
        Commands::Classify { image } => run_classify(&config, image),
        Commands::Listen { polls } => run_listen(&config, cli.seed, polls),
    }
}

fn build_simulator(config: &AppConfig, seed: Option<u64>) -> Result<FeedSimulator> {
    let feed = config.feed.clone();
    let simulator = match seed {
        Some(seed) => FeedSimulator::seeded(feed, seed),
        None => FeedSimulator::with_config(feed),
    };
    simulator.context("building feed simulator")
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting tokio runtime")
}

fn run_seed(
    config: &AppConfig,
    seed: Option<u64>,
    count: Option<usize>,
    only: Option<ActivityType>,
) -> Result<ExitCode> {
    let mut simulator = build_simulator(config, seed)?;
    simulator.seed(count.unwrap_or(config.feed.seed_count));

    let events = simulator.filter_by_type(only);
    println!("{}", serde_json::to_string_pretty(&events)?);
    Ok(ExitCode::from(0))
}

fn run_stream(
    config: &AppConfig,
    seed: Option<u64>,
    limit: usize,
    interval_ms: Option<u64>,
) -> Result<ExitCode> {
    let simulator = Arc::new(Mutex::new(build_simulator(config, seed)?));

    runtime()?.block_on(async move {
        let live = match interval_ms {
            Some(ms) => {
                LiveFeed::spawn_with_interval(Arc::clone(&simulator), Duration::from_millis(ms))
            }
            None => LiveFeed::spawn(Arc::clone(&simulator)).context("starting live feed")?,
        };
        let mut events = live.subscribe();
        let mut printed = 0;

        while printed < limit {
            tokio::select! {
                received = events.recv() => match received {
                    Ok(event) => {
                        println!("{}", serde_json::to_string(&event)?);
                        printed += 1;
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "[vanrakshak_cli] subscriber lagged");
                    }
                    Err(RecvError::Closed) => break,
                },
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("[vanrakshak_cli] interrupted");
                    break;
                }
            }
        }

        live.stop();
        Ok::<_, anyhow::Error>(ExitCode::from(0))
    })
}

fn run_stats(config: &AppConfig, seed: Option<u64>, count: Option<usize>) -> Result<ExitCode> {
    let mut simulator = build_simulator(config, seed)?;
    simulator.seed(count.unwrap_or(config.feed.seed_count));

    println!("{}", serde_json::to_string_pretty(&simulator.stats())?);
    Ok(ExitCode::from(0))
}

fn run_map_label(label: &str, probability: f64) -> Result<ExitCode> {
    let recognizer = SpeciesRecognizer::new(Default::default());
    let result = recognizer.map_label(label, probability);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(ExitCode::from(0))
}

fn run_classify(config: &AppConfig, image_path: PathBuf) -> Result<ExitCode> {
    let image = ImagePayload::from_path(&image_path)
        .with_context(|| format!("reading {}", image_path.display()))?;
    let recognizer = SpeciesRecognizer::from_config(&config.recognition, None)
        .context("building recognizer")?;

    let outcome = runtime()?.block_on(recognizer.classify(&image));
    match outcome {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(ExitCode::from(0))
        }
        Err(err @ RecognitionError::ClassificationUnavailable { .. }) => {
            emit_failure(&err)?;
            Ok(ExitCode::from(2))
        }
        Err(err) => Err(err).context("classifying image"),
    }
}

fn run_listen(config: &AppConfig, seed: Option<u64>, polls: usize) -> Result<ExitCode> {
    let acoustic = config.acoustic.clone();
    let mut monitor = match seed {
        Some(seed) => AcousticMonitor::seeded(acoustic, seed),
        None => AcousticMonitor::with_config(acoustic),
    }
    .context("building acoustic monitor")?;

    monitor.start_listening();
    for _ in 0..polls {
        if let Some(detection) = monitor.poll() {
            println!("{}", serde_json::to_string(&detection)?);
        }
    }
    monitor.stop_listening();

    let recent = monitor.history();
    eprintln!("{} recent detections kept", recent.len());
    Ok(ExitCode::from(0))
}

fn emit_failure(err: &RecognitionError) -> Result<()> {
    let payload = FailurePayload {
        code: err.code(),
        message: err.message(),
    };
    eprintln!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

#[derive(Serialize)]
struct FailurePayload {
    code: i32,
    message: String,
}
