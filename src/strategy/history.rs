//! Settled-price history and market-rate capping.
//!
//! Every round we learn what the previous item sold for. Those prices are
//! kept per category, and a rolling average over the most recent ones caps
//! our bid so we never pay over the going rate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::types::Category;

/// Settled prices per category, oldest first. Append-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceHistory(HashMap<Category, Vec<Decimal>>);

impl PriceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// All prices recorded for `category`; empty if none.
    pub fn prices(&self, category: &Category) -> &[Decimal] {
        self.0.get(category).map(Vec::as_slice).unwrap_or(&[])
    }

    fn push(&mut self, category: Category, amount: Decimal) {
        self.0.entry(category).or_default().push(amount);
    }

    /// Total number of recorded prices across categories.
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct PriceHistoryTracker {
    window: usize,
}

impl PriceHistoryTracker {
    /// `window` is the number of most recent prices averaged (at least 1).
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
        }
    }

    /// Record the price just settled. `category` must be the one offered in
    /// the round that settled, i.e. the previous round's category.
    pub fn record_outcome(
        &self,
        history: &mut PriceHistory,
        category: &Category,
        amount: Decimal,
    ) {
        history.push(category.clone(), amount);
        debug!(
            category = %category,
            amount = %amount,
            recorded = history.prices(category).len(),
            "Settled price recorded"
        );
    }

    /// Mean of the last `window` prices for `category`, if any.
    ///
    /// A window whose sum does not fit in a `Decimal` yields `None`, the
    /// same as having no history.
    pub fn rolling_average(
        &self,
        history: &PriceHistory,
        category: &Category,
    ) -> Option<Decimal> {
        let prices = history.prices(category);
        if prices.is_empty() {
            return None;
        }
        let recent = &prices[prices.len().saturating_sub(self.window)..];
        let average = recent
            .iter()
            .try_fold(Decimal::ZERO, |sum, p| sum.checked_add(*p))
            .and_then(|sum| sum.checked_div(Decimal::from(recent.len())));
        if average.is_none() {
            warn!(
                category = %category,
                window = recent.len(),
                "Rolling average overflowed; ignoring price history"
            );
        }
        average
    }

    /// Cap `bid` at the market average. Never raises a bid.
    pub fn cap_bid(bid: Decimal, average: Option<Decimal>) -> Decimal {
        match average {
            Some(avg) if bid >= avg => avg,
            _ => bid,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
