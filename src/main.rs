//! GAVEL: replay driver.
//!
//! Loads configuration, initialises structured logging, and replays a
//! recorded game transcript through the bidding engine, logging every
//! decision and a closing summary.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use gavel::config::{self, AppConfig};
use gavel::replay::{self, GameTranscript};
use gavel::storage;

#[derive(Parser)]
#[command(name = "gavel")]
#[command(about = "Replay a recorded auction game through the GAVEL bidding engine")]
#[command(version)]
struct Cli {
    /// JSON transcript of the rounds one participant saw
    transcript: PathBuf,

    /// Configuration file (defaults are used if it does not exist)
    #[arg(long, default_value = "config.toml")]
    config: String,

    /// Write the final engine state to this file
    #[arg(long)]
    save_state: Option<String>,
}

fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cli = Cli::parse();
    let cfg = AppConfig::load_or_default(&cli.config)?;

    init_logging(&cfg.logging);

    let transcript_path = cli
        .transcript
        .to_str()
        .context("Transcript path is not valid UTF-8")?;
    let transcript = GameTranscript::load(transcript_path)?;
    info!(
        participant = %transcript.participant_id,
        rounds = transcript.rounds.len(),
        items_needed_start = cfg.engine.items_needed_start,
        "Replaying transcript"
    );

    let report = replay::replay(&transcript, &cfg.engine)?;

    if let Some(path) = cli.save_state.as_deref() {
        storage::save_state(&report.participant_id, &report.final_state, Some(path))?;
        info!(path, "Final engine state saved");
    }

    info!(
        participant = %report.participant_id,
        rounds = report.rounds,
        withdrawn = report.rounds_withdrawn,
        total_bid = %report.total_bid,
        "Replay complete"
    );
    println!("{report}");

    Ok(())
}

fn init_logging(cfg: &config::LoggingConfig) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_filter = cfg.filter.as_deref().unwrap_or("gavel=info");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let json_logging = cfg.json || std::env::var("GAVEL_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
