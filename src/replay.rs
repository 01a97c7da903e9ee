//! Transcript replay.
//!
//! Feeds a recorded sequence of round contexts through a fresh engine and
//! collects every decision. Used by the binary and by integration tests to
//! check how the heuristic behaves over a whole game.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

use crate::config::EngineConfig;
use crate::strategy::{BidDecision, BidEngine, EngineState};
use crate::types::{GavelError, RoundContext};

/// The rounds one participant saw during a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameTranscript {
    pub participant_id: String,
    pub rounds: Vec<RoundContext>,
}

impl GameTranscript {
    /// Load a transcript from a JSON file.
    pub fn load(path: &str) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read transcript: {path}"))?;
        serde_json::from_str(&json).with_context(|| format!("Failed to parse transcript: {path}"))
    }

    /// Check round order and that the participant is on the roster.
    pub fn validate(&self) -> Result<(), GavelError> {
        if let Some(first) = self.rounds.first() {
            if first.participant(&self.participant_id).is_none() {
                return Err(GavelError::UnknownParticipant(self.participant_id.clone()));
            }
        }
        for pair in self.rounds.windows(2) {
            if pair[1].round_index <= pair[0].round_index {
                return Err(GavelError::RoundOutOfOrder {
                    previous: pair[0].round_index,
                    got: pair[1].round_index,
                });
            }
        }
        Ok(())
    }
}

/// Outcome of a replay.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub participant_id: String,
    pub decisions: Vec<BidDecision>,
    pub rounds: usize,
    /// Rounds where the final bid was zero.
    pub rounds_withdrawn: usize,
    pub total_bid: Decimal,
    /// Engine state after the last round, e.g. for saving.
    #[serde(skip)]
    pub final_state: EngineState,
}

impl fmt::Display for ReplayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: rounds={} withdrawn={} total_bid={}",
            self.participant_id, self.rounds, self.rounds_withdrawn, self.total_bid,
        )
    }
}

/// Replay `transcript` through a new engine built from `config`.
pub fn replay(transcript: &GameTranscript, config: &EngineConfig) -> Result<ReplayReport> {
    config.validate()?;
    transcript.validate()?;

    let mut engine = BidEngine::new(transcript.participant_id.clone(), config.clone());
    let mut decisions = Vec::with_capacity(transcript.rounds.len());

    for ctx in &transcript.rounds {
        let decision = engine.compute_bid(ctx);
        info!(
            round = decision.round_index,
            category = %decision.category,
            priority = %decision.priority,
            bid = %decision.bid,
            "Bid placed"
        );
        decisions.push(decision);
    }

    let rounds_withdrawn = decisions.iter().filter(|d| d.bid.is_zero()).count();
    let total_bid = decisions
        .iter()
        .fold(Decimal::ZERO, |sum, d| sum.saturating_add(d.bid));

    Ok(ReplayReport {
        participant_id: transcript.participant_id.clone(),
        rounds: decisions.len(),
        rounds_withdrawn,
        total_bid,
        decisions,
        final_state: engine.into_state(),
    })
}
