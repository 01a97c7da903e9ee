//! Shared types for the GAVEL bidding engine.
//!
//! These types form the data model used across all modules: what the
//! auction orchestrator hands us each round, and the discrete priority
//! levels the strategy pipeline works with.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// A class of collectible item (an artist) offered in a round.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        Self(name)
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Discrete urgency level for the item on offer.
///
/// Each level carries a fixed weight that doubles as the bid scaling
/// factor. Ordering follows the weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Multiplicative weight applied to the per-item budget.
    pub fn weight(self) -> Decimal {
        match self {
            Priority::High => dec!(0.9),
            Priority::Medium => dec!(0.6),
            Priority::Low => dec!(0.3),
        }
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight().cmp(&other.weight())
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "HIGH"),
            Priority::Medium => write!(f, "MEDIUM"),
            Priority::Low => write!(f, "LOW"),
        }
    }
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

/// Required counts per slot, largest first (e.g. `[3, 2, 1]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<u32>", into = "Vec<u32>")]
pub struct CollectionTarget(Vec<u32>);

impl CollectionTarget {
    /// Build a target; slots are ranked descending regardless of input order.
    pub fn new(mut slots: Vec<u32>) -> Self {
        slots.sort_unstable_by(|a, b| b.cmp(a));
        Self(slots)
    }

    /// Requirement for a slot. A missing slot counts as already satisfied (0).
    pub fn slot(&self, index: usize) -> u32 {
        self.0.get(index).copied().unwrap_or(0)
    }

    /// Number of slots in the target.
    pub fn slot_count(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<u32>> for CollectionTarget {
    fn from(slots: Vec<u32>) -> Self {
        Self::new(slots)
    }
}

impl From<CollectionTarget> for Vec<u32> {
    fn from(target: CollectionTarget) -> Self {
        target.0
    }
}

/// Items won so far, per category. Absent categories count as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnedCollection(HashMap<Category, u32>);

impl OwnedCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, category: &Category) -> u32 {
        self.0.get(category).copied().unwrap_or(0)
    }

    /// Counts of every category present, in no particular order.
    pub fn counts(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.values().copied()
    }

    /// Record one more item of `category`.
    pub fn add(&mut self, category: Category) {
        *self.0.entry(category).or_insert(0) += 1;
    }
}

impl FromIterator<(Category, u32)> for OwnedCollection {
    fn from_iter<I: IntoIterator<Item = (Category, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Round context
// ---------------------------------------------------------------------------

/// Price paid by the winner of a round.
///
/// Accepted as input but not consumed by the bid computation: the same
/// heuristic is used under both rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PaymentRule {
    /// Winner pays their own bid.
    #[default]
    FirstPrice,
    /// Winner pays the runner-up's bid.
    SecondPrice,
}

impl TryFrom<u8> for PaymentRule {
    type Error = GavelError;

    fn try_from(rank: u8) -> Result<Self, Self::Error> {
        match rank {
            1 => Ok(PaymentRule::FirstPrice),
            2 => Ok(PaymentRule::SecondPrice),
            other => Err(GavelError::InvalidPaymentRule(other)),
        }
    }
}

impl From<PaymentRule> for u8 {
    fn from(rule: PaymentRule) -> Self {
        match rule {
            PaymentRule::FirstPrice => 1,
            PaymentRule::SecondPrice => 2,
        }
    }
}

/// Read-only view of one participant for the current round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantSnapshot {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub owned: OwnedCollection,
    /// Remaining budget.
    pub budget: Decimal,
    #[serde(default)]
    pub score: Decimal,
}

/// Everything the orchestrator tells us about the round being bid on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundContext {
    /// Zero-based round index.
    pub round_index: usize,
    pub current_category: Category,
    /// Full category order for the whole game.
    pub schedule: Vec<Category>,
    /// All participants, including ourselves.
    pub participants: Vec<ParticipantSnapshot>,
    /// Winner id of each settled round, oldest first.
    #[serde(default)]
    pub winner_ids: Vec<String>,
    /// Amount paid in each settled round, oldest first.
    #[serde(default)]
    pub amounts_paid: Vec<Decimal>,
    pub target: CollectionTarget,
    pub round_limit: usize,
    pub starting_budget: Decimal,
    #[serde(default)]
    pub payment_rule: PaymentRule,
}

impl RoundContext {
    /// Look up a participant on the roster.
    pub fn participant(&self, id: &str) -> Option<&ParticipantSnapshot> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Winner of the most recently settled round.
    pub fn last_winner(&self) -> Option<&str> {
        self.winner_ids.last().map(String::as_str)
    }

    /// Amount paid in the most recently settled round.
    pub fn last_amount_paid(&self) -> Option<Decimal> {
        self.amounts_paid.last().copied()
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for GAVEL.
///
/// The bidding pipeline itself never fails; these cover configuration,
/// input decoding and transcript replay.
#[derive(Debug, thiserror::Error)]
pub enum GavelError {
    #[error("Invalid payment rule: {0} (expected 1 or 2)")]
    InvalidPaymentRule(u8),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Round {got} is out of order (previous round was {previous})")]
    RoundOutOfOrder { previous: usize, got: usize },

    #[error("Participant not on roster: {0}")]
    UnknownParticipant(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
