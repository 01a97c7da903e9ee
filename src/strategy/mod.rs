//! Bidding engine: priority evaluation, budget allocation, market-rate
//! capping and the endgame floor.

pub mod allocator;
pub mod clamp;
pub mod history;
pub mod priority;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::types::{Category, OwnedCollection, ParticipantSnapshot, Priority, RoundContext};
use allocator::BudgetAllocator;
use clamp::BidClamp;
use history::{PriceHistory, PriceHistoryTracker};
use priority::{PriorityConfig, PriorityEvaluator};

// ---------------------------------------------------------------------------
// Engine state
// ---------------------------------------------------------------------------

/// Mutable per-game state. One instance per game, never shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineState {
    pub price_history: PriceHistory,
    /// Countdown used to size the per-item budget share.
    pub items_still_needed: u32,
    /// Category offered in the previous invocation.
    pub last_category: Option<Category>,
    /// Round index of the previous invocation.
    pub last_round: Option<usize>,
    /// Most recent rolling average computed per category.
    #[serde(default)]
    pub last_averages: HashMap<Category, Decimal>,
}

impl EngineState {
    pub fn new(items_still_needed: u32) -> Self {
        Self {
            price_history: PriceHistory::new(),
            items_still_needed,
            last_category: None,
            last_round: None,
            last_averages: HashMap::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Decision record
// ---------------------------------------------------------------------------

/// Everything the engine worked out for one round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidDecision {
    pub round_index: usize,
    pub category: Category,
    pub base_priority: Priority,
    pub opponent_priority: Priority,
    /// Priority after the scarcity override; scales the bid.
    pub priority: Priority,
    pub items_still_needed: u32,
    /// Budget share scaled by priority, before any cap.
    pub raw_bid: Decimal,
    pub market_average: Option<Decimal>,
    pub capped_bid: Decimal,
    /// Whole-unit, non-negative bid handed back to the auction.
    pub bid: Decimal,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Computes one bid per round for a single participant.
///
/// Must be called once per round in increasing round order: the price
/// history and countdown both depend on the previous call.
pub struct BidEngine {
    participant_id: String,
    config: EngineConfig,
    evaluator: PriorityEvaluator,
    tracker: PriceHistoryTracker,
    clamp: BidClamp,
    state: EngineState,
}

impl BidEngine {
    pub fn new(participant_id: impl Into<String>, config: EngineConfig) -> Self {
        let state = EngineState::new(config.items_needed_start);
        Self::with_state(participant_id, config, state)
    }

    /// Resume a game from a previously saved state.
    pub fn with_state(
        participant_id: impl Into<String>,
        config: EngineConfig,
        state: EngineState,
    ) -> Self {
        Self {
            participant_id: participant_id.into(),
            evaluator: PriorityEvaluator::new(PriorityConfig {
                scarcity_threshold: config.scarcity_threshold,
            }),
            tracker: PriceHistoryTracker::new(config.price_window),
            clamp: BidClamp::new(config.endgame_threshold),
            config,
            state,
        }
    }

    pub fn participant_id(&self) -> &str {
        &self.participant_id
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn into_state(self) -> EngineState {
        self.state
    }

    /// Most recent rolling average computed for `category`.
    pub fn last_average(&self, category: &Category) -> Option<Decimal> {
        self.state.last_averages.get(category).copied()
    }

    /// Bid for the current round.
    pub fn bid(&mut self, ctx: &RoundContext) -> Decimal {
        self.compute_bid(ctx).bid
    }

    /// Run the full pipeline for one round.
    ///
    /// Steps:
    /// 1. Attribute the last settled price to the previous round's category.
    /// 2. Remember the current category for next round.
    /// 3. Tick the countdown down if we won the last round.
    /// 4. Evaluate priority (base → opponents → scarcity).
    /// 5. Size the raw bid from the remaining budget.
    /// 6. Cap at the rolling market average.
    /// 7. Apply the endgame floor and round down to a whole unit.
    pub fn compute_bid(&mut self, ctx: &RoundContext) -> BidDecision {
        if let Some(previous) = self.state.last_round {
            if ctx.round_index <= previous {
                warn!(
                    previous,
                    round = ctx.round_index,
                    "Round index did not increase; state may be inconsistent"
                );
            }
        }
        self.state.last_round = Some(ctx.round_index);

        // 1–2: one-round lag between the price and the category it belongs to
        if ctx.round_index > 0 {
            match (self.state.last_category.take(), ctx.last_amount_paid()) {
                (Some(previous), Some(amount)) => {
                    self.tracker
                        .record_outcome(&mut self.state.price_history, &previous, amount);
                }
                (previous, amount) => {
                    debug!(
                        round = ctx.round_index,
                        last_category = ?previous,
                        amount = ?amount,
                        "Nothing to record for previous round"
                    );
                }
            }
        }
        self.state.last_category = Some(ctx.current_category.clone());

        // 3
        if ctx.last_winner() == Some(self.participant_id.as_str())
            && self.state.items_still_needed > self.config.items_needed_floor
        {
            self.state.items_still_needed -= 1;
            debug!(
                items_still_needed = self.state.items_still_needed,
                "Won last round"
            );
        }

        let fallback;
        let me = match ctx.participant(&self.participant_id) {
            Some(me) => me,
            None => {
                warn!(
                    participant = %self.participant_id,
                    round = ctx.round_index,
                    "Not on roster; bidding with an empty collection and no budget"
                );
                fallback = ParticipantSnapshot {
                    id: self.participant_id.clone(),
                    name: self.participant_id.clone(),
                    owned: OwnedCollection::new(),
                    budget: Decimal::ZERO,
                    score: Decimal::ZERO,
                };
                &fallback
            }
        };

        // 4
        let trace = self.evaluator.evaluate(
            &ctx.current_category,
            me,
            &ctx.participants,
            &ctx.target,
            &ctx.schedule,
            ctx.round_index,
        );

        // 5
        let items = self.state.items_still_needed;
        let raw_bid = BudgetAllocator::allocate(trace.effective, me.budget, items);

        // 6
        let market_average = self
            .tracker
            .rolling_average(&self.state.price_history, &ctx.current_category);
        if let Some(avg) = market_average {
            self.state
                .last_averages
                .insert(ctx.current_category.clone(), avg);
        }
        let capped_bid = PriceHistoryTracker::cap_bid(raw_bid, market_average);

        // 7
        let bid = self
            .clamp
            .finalize(capped_bid, trace.effective, items)
            .floor()
            .max(Decimal::ZERO);

        debug!(
            round = ctx.round_index,
            category = %ctx.current_category,
            base = %trace.base,
            priority = %trace.effective,
            items_still_needed = items,
            raw_bid = %raw_bid,
            market_average = ?market_average,
            bid = %bid,
            "Bid computed"
        );

        BidDecision {
            round_index: ctx.round_index,
            category: ctx.current_category.clone(),
            base_priority: trace.base,
            opponent_priority: trace.after_opponents,
            priority: trace.effective,
            items_still_needed: items,
            raw_bid,
            market_average,
            capped_bid,
            bid,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
