//! Endgame floor rule.

use rust_decimal::Decimal;

use crate::types::Priority;

/// Withdraws from LOW priority items once few items are still needed.
pub struct BidClamp {
    endgame_threshold: u32,
}

impl BidClamp {
    pub fn new(endgame_threshold: u32) -> Self {
        Self { endgame_threshold }
    }

    pub fn finalize(&self, bid: Decimal, priority: Priority, items_still_needed: u32) -> Decimal {
        if items_still_needed < self.endgame_threshold && priority == Priority::Low {
            Decimal::ZERO
        } else {
            bid
        }
    }
}
