//! Persistence layer.
//!
//! Saves and loads a game's engine state to/from a JSON file so an
//! orchestrator restart mid-game can resume bidding where it left off.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::strategy::EngineState;

/// Default state file path.
const DEFAULT_STATE_FILE: &str = "gavel_state.json";

/// On-disk wrapper around the engine state.
#[derive(Debug, Serialize, Deserialize)]
struct StoredState {
    participant_id: String,
    saved_at: DateTime<Utc>,
    state: EngineState,
}

/// Save engine state for `participant_id` to a JSON file.
pub fn save_state(participant_id: &str, state: &EngineState, path: Option<&str>) -> Result<()> {
    let path = path.unwrap_or(DEFAULT_STATE_FILE);
    let stored = StoredState {
        participant_id: participant_id.to_string(),
        saved_at: Utc::now(),
        state: state.clone(),
    };
    let json = serde_json::to_string_pretty(&stored).context("Failed to serialise engine state")?;

    std::fs::write(path, &json).context(format!("Failed to write state to {path}"))?;

    debug!(
        path,
        participant = participant_id,
        items_still_needed = state.items_still_needed,
        "State saved"
    );
    Ok(())
}

/// Load engine state from a JSON file.
/// Returns None if the file doesn't exist (fresh game).
pub fn load_state(path: Option<&str>) -> Result<Option<(String, EngineState)>> {
    let path = path.unwrap_or(DEFAULT_STATE_FILE);

    if !Path::new(path).exists() {
        info!(path, "No saved state found, starting fresh");
        return Ok(None);
    }

    let json = std::fs::read_to_string(path).context(format!("Failed to read state from {path}"))?;

    let stored: StoredState =
        serde_json::from_str(&json).context(format!("Failed to parse state from {path}"))?;

    info!(
        path,
        participant = %stored.participant_id,
        saved_at = %stored.saved_at,
        last_round = ?stored.state.last_round,
        "State loaded from disk"
    );

    Ok(Some((stored.participant_id, stored.state)))
}

/// Delete the state file (for testing or reset).
pub fn delete_state(path: Option<&str>) -> Result<()> {
    let path = path.unwrap_or(DEFAULT_STATE_FILE);
    if Path::new(path).exists() {
        std::fs::remove_file(path).context(format!("Failed to delete state file {path}"))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
