//! Priority evaluation.
//!
//! Decides how urgently the item on offer is needed, in three stages:
//! our own collection versus the target, opponents' needs for the same
//! category, and how many more of the category the schedule still holds.
//! Each stage may only raise the level.

use tracing::debug;

use crate::types::{Category, CollectionTarget, OwnedCollection, ParticipantSnapshot, Priority};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PriorityConfig {
    /// Fewer remaining occurrences (current round included) than this
    /// forces HIGH.
    pub scarcity_threshold: usize,
}

impl Default for PriorityConfig {
    fn default() -> Self {
        Self {
            scarcity_threshold: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// Evaluator
// ---------------------------------------------------------------------------

/// Priority at each stage of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityTrace {
    pub base: Priority,
    pub after_opponents: Priority,
    pub effective: Priority,
}

pub struct PriorityEvaluator {
    config: PriorityConfig,
}

impl PriorityEvaluator {
    pub fn new(config: PriorityConfig) -> Self {
        Self { config }
    }

    /// Urgency of `category` judged only from a collection and the target.
    ///
    /// A category not owned at all is always HIGH. Otherwise the top slot
    /// is filled first: while the largest owned count is short of
    /// `target[0]`, categories tied for that count are HIGH and the rest
    /// LOW. Once it is met, the same rule is applied to the second-largest
    /// distinct count against `target[1]`. With both met, MEDIUM.
    ///
    /// Ties are not broken, so several categories can be HIGH at once.
    pub fn base_priority(
        &self,
        category: &Category,
        owned: &OwnedCollection,
        target: &CollectionTarget,
    ) -> Priority {
        let count = owned.count(category);
        if count == 0 {
            return Priority::High;
        }

        let mut distinct: Vec<u32> = owned.counts().collect();
        distinct.sort_unstable_by(|a, b| b.cmp(a));
        distinct.dedup();

        // `count > 0` means `category` is present, so `distinct` is non-empty.
        let highest = distinct.first().copied().unwrap_or(0);
        if highest < target.slot(0) {
            return if count == highest {
                Priority::High
            } else {
                Priority::Low
            };
        }

        let second_highest = if target.slot_count() < 2 {
            0
        } else {
            distinct.get(1).copied().unwrap_or(0)
        };
        if second_highest < target.slot(1) {
            return if count == second_highest {
                Priority::High
            } else {
                Priority::Low
            };
        }

        Priority::Medium
    }

    /// Escalate to HIGH when an opponent also wants `category`, but less
    /// urgently than we do. Never lowers.
    pub fn adjust_for_opponents(
        &self,
        priority: Priority,
        category: &Category,
        self_id: &str,
        participants: &[ParticipantSnapshot],
        target: &CollectionTarget,
    ) -> Priority {
        let mut priority = priority;
        for opponent in participants.iter().filter(|p| p.id != self_id) {
            let theirs = self.base_priority(category, &opponent.owned, target);
            if theirs > Priority::Low && priority >= Priority::Medium && theirs < priority {
                debug!(
                    opponent = %opponent.id,
                    category = %category,
                    theirs = %theirs,
                    ours = %priority,
                    "Opponent competes for category"
                );
                priority = Priority::High;
            }
        }
        priority
    }

    /// Force HIGH when few of `category` remain in the schedule.
    pub fn adjust_for_scarcity(
        &self,
        priority: Priority,
        category: &Category,
        schedule: &[Category],
        round_index: usize,
    ) -> Priority {
        let remaining = schedule
            .get(round_index..)
            .unwrap_or(&[])
            .iter()
            .filter(|c| *c == category)
            .count();

        if remaining < self.config.scarcity_threshold {
            debug!(
                category = %category,
                remaining,
                threshold = self.config.scarcity_threshold,
                "Category scarce, forcing HIGH"
            );
            Priority::High
        } else {
            priority
        }
    }

    /// Run all three stages: base, opponents, scarcity.
    pub fn evaluate(
        &self,
        category: &Category,
        me: &ParticipantSnapshot,
        participants: &[ParticipantSnapshot],
        target: &CollectionTarget,
        schedule: &[Category],
        round_index: usize,
    ) -> PriorityTrace {
        let base = self.base_priority(category, &me.owned, target);
        let after_opponents =
            self.adjust_for_opponents(base, category, &me.id, participants, target);
        let effective = self.adjust_for_scarcity(after_opponents, category, schedule, round_index);
        PriorityTrace {
            base,
            after_opponents,
            effective,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
