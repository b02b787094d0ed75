//! CLI for the people registry.
//!
//! Pipeline: load scenario -> build registry -> replay steps -> NDJSON receipts.

mod scenario;
mod sink;

use alloy_primitives::U256;
use clap::{Parser, Subcommand};
use people_core::RegistryConfig;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "people", version, about = "Owner-gated people registry")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a JSON scenario against a fresh in-memory registry.
    Replay {
        /// Scenario file.
        scenario: PathBuf,

        /// Payment floor in wei; overrides the scenario's own value.
        #[arg(long, env = "PEOPLE_MIN_PAYMENT")]
        min_payment: Option<U256>,

        /// Write receipts to this file instead of stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Also print the event log after the receipts.
        #[arg(long, default_value_t = false)]
        events: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay {
            scenario: path,
            min_payment,
            out,
            events,
        } => {
            let t0 = Instant::now();

            let raw = std::fs::read_to_string(&path)?;
            let mut parsed: scenario::Scenario = serde_json::from_str(&raw)?;
            if min_payment.is_some() {
                parsed.min_payment = min_payment;
            }
            tracing::info!(
                path = %path.display(),
                steps = parsed.steps.len(),
                accounts = parsed.accounts.len(),
                "loaded scenario"
            );

            let replay = scenario::replay(&parsed, RegistryConfig::default())?;

            let rows = match out {
                Some(out_path) => {
                    let mut s = sink::NdjsonSink::new(std::fs::File::create(&out_path)?);
                    s.write_rows(&replay.receipts)?;
                    if events {
                        s.write_rows(&replay.events)?;
                    }
                    s.finish()?
                }
                None => {
                    let mut s = sink::NdjsonSink::stdout();
                    s.write_rows(&replay.receipts)?;
                    if events {
                        s.write_rows(&replay.events)?;
                    }
                    s.finish()?
                }
            };

            tracing::info!(
                rows,
                failures = replay.failures(),
                elapsed_ms = t0.elapsed().as_millis(),
                "replay complete"
            );
        }
    }

    Ok(())
}
