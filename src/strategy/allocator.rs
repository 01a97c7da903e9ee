//! Budget allocation.
//!
//! Splits the remaining budget evenly over the items still needed and
//! scales the share by priority. As the countdown shrinks each remaining
//! item gets a larger slice.

use rust_decimal::Decimal;

use crate::types::Priority;

pub struct BudgetAllocator;

impl BudgetAllocator {
    /// Raw bid: `floor(|budget| / items_still_needed) * priority.weight`.
    ///
    /// `items_still_needed` is clamped to at least 1.
    pub fn allocate(
        priority: Priority,
        remaining_budget: Decimal,
        items_still_needed: u32,
    ) -> Decimal {
        let items = Decimal::from(items_still_needed.max(1));
        let per_item = (remaining_budget.abs() / items).floor();
        per_item * priority.weight()
    }
}
