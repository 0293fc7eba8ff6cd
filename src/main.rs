use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::fs::File;
use std::path::PathBuf;
use std::process;
use std::time::{Duration, Instant};

use clap_verbosity_flag::{InfoLevel, Verbosity};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use accesskey_lib::extract::extract_candidates_from_file;
use accesskey_lib::{CapturedPacket, PacketVersion, SearchOutcome, search};

/// Recover a game title's access key from its image and a captured packet.
///
/// Without a packet, the candidate keys found in the image are listed.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the title image to scan for access keys.
    image: PathBuf,
    /// Hex dump of a packet sent by the title (SYN for V1 titles).
    packet: Option<String>,
    /// Print a JSON report instead of plain text.
    #[arg(long)]
    json: bool,
    /// Optional path to a file to write logs to, in addition to the console.
    #[arg(short, long)]
    log_file: Option<PathBuf>,
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

/// Everything a run found, for printing.
#[derive(Debug, Serialize)]
struct Report {
    image: PathBuf,
    candidates: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<PacketVersion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<SearchOutcome>,
    #[serde(skip)]
    elapsed: Duration,
    elapsed_ms: u128,
}

impl Report {
    fn new(image: PathBuf, candidates: Vec<String>) -> Self {
        Self {
            image,
            candidates,
            version: None,
            outcome: None,
            elapsed: Duration::ZERO,
            elapsed_ms: 0,
        }
    }

    fn finish(mut self, start: Instant) -> Self {
        self.elapsed = start.elapsed();
        self.elapsed_ms = self.elapsed.as_millis();
        self
    }

    fn print_text(&self, packet_given: bool) {
        if self.candidates.is_empty() {
            println!("No possible access keys found");
        } else if !packet_given {
            println!("No test packet given");
            println!("Possible access keys (the correct key is usually one of the first):");
            println!("{:?}", self.candidates);
        } else {
            match &self.outcome {
                Some(SearchOutcome::Match { key, .. }) => println!("Found working access key: {}", key),
                _ => println!(
                    "No possible access keys found for provided test packet. Was the test packet sent from the provided title?"
                ),
            }
        }
        println!("Parsing took: {:?}", self.elapsed);
    }
}

fn setup_logging(
    log_file_path: Option<PathBuf>,
    verbosity: &Verbosity<InfoLevel>,
) -> Result<Option<WorkerGuard>> {
    // stdout is reserved for the report
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .without_time();

    let (file_layer, guard) = if let Some(ref path) = log_file_path {
        let log_file = File::create(path)
            .with_context(|| format!("Failed to create log file at: {:?}", path))?;
        let (non_blocking_writer, guard) = tracing_appender::non_blocking(log_file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking_writer)
            .with_ansi(false)
            .with_target(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    // INFO by default, DEBUG with -v (per-key progress), TRACE with -vv
    let filter = EnvFilter::builder()
        .with_default_directive(verbosity.tracing_level_filter().into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    if let Some(path) = log_file_path {
        info!("Logging to file: {:?}", path);
    }

    Ok(guard)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = setup_logging(cli.log_file.clone(), &cli.verbose)?;

    if let Err(e) = run(&cli) {
        error!("Key search failed: {:?}", e);
        process::exit(1);
    }

    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let start = Instant::now();

    info!(image = ?cli.image, "Parsing image for access keys...");
    let candidates = extract_candidates_from_file(&cli.image)
        .with_context(|| format!("Failed to read image at: {:?}", cli.image))?;
    info!(count = candidates.len(), "Extracted candidate keys");

    let mut report = Report::new(cli.image.clone(), candidates);

    let packet_hex = cli.packet.as_deref().filter(|_| !report.candidates.is_empty());
    if let Some(packet_hex) = packet_hex {
        let packet = CapturedPacket::from_hex(packet_hex).context("Failed to decode test packet")?;
        info!(version = %packet.version(), size = packet.len(), "Decoded test packet");

        let outcome = search(&report.candidates, packet.as_ref()).context("Test packet is malformed")?;
        report.version = Some(packet.version());
        report.outcome = Some(outcome);
    }

    let report = report.finish(start);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print_text(cli.packet.is_some());
    }

    Ok(())
}
