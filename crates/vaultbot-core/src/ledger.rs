//! Per-user daily budget ledger.
//!
//! Tracks accumulated spend per user against a daily ceiling. The epoch
//! key is the calendar date at call time: whenever the stored date
//! differs from `today`, the accumulated total is reset to zero before
//! the operation proceeds. This lazy rollover is a pure function of
//! (stored epoch, today) at each entry point -- there is no scheduled
//! reset job, so behavior is unchanged across process restarts.
//!
//! The ceiling is strict-at-check: a query admitted under budget may
//! record a cost that pushes the total past the ceiling; the NEXT query
//! is then the one denied. Spend within a day is monotonically
//! non-decreasing and never negative.
//!
//! Thread safety: interior mutability via [`RwLock`]; check and record
//! each run under one write-lock acquisition so concurrent operations
//! on the same user cannot lose updates.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::NaiveDate;
use tracing::debug;

/// Outcome of a budget check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BudgetDecision {
    /// Spend so far is under the ceiling.
    Allowed,
    /// Ceiling reached; no further queries today.
    Denied {
        /// Accumulated spend at the time of the check, in USD.
        spent_usd: f64,
        /// The configured daily ceiling, in USD.
        limit_usd: f64,
    },
}

impl BudgetDecision {
    /// Whether the check passed.
    pub fn is_allowed(self) -> bool {
        matches!(self, BudgetDecision::Allowed)
    }
}

/// One user's spend accumulation for a single calendar day.
#[derive(Debug, Clone, Copy)]
struct SpendRecord {
    /// The calendar day this record accumulates under.
    date: NaiveDate,
    /// Accumulated spend in USD. Never negative.
    spent_usd: f64,
}

/// Tracks per-user daily spend against a configurable ceiling.
pub struct BudgetLedger {
    /// One active record per user; superseded on date rollover.
    records: RwLock<HashMap<i64, SpendRecord>>,
    /// Daily ceiling in USD.
    daily_budget_usd: f64,
}

impl BudgetLedger {
    /// Create a ledger with the given daily ceiling.
    pub fn new(daily_budget_usd: f64) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            daily_budget_usd,
        }
    }

    /// The configured daily ceiling.
    pub fn daily_budget_usd(&self) -> f64 {
        self.daily_budget_usd
    }

    /// Check whether the user may spend today. Denies once accumulated
    /// spend has reached the ceiling.
    pub fn check_on(&self, user_id: i64, today: NaiveDate) -> BudgetDecision {
        let mut records = self.records.write().expect("budget ledger lock poisoned");
        let record = Self::rolled_over(&mut records, user_id, today);

        if record.spent_usd >= self.daily_budget_usd {
            debug!(
                user_id,
                spent_usd = record.spent_usd,
                limit_usd = self.daily_budget_usd,
                "query denied by budget"
            );
            return BudgetDecision::Denied {
                spent_usd: record.spent_usd,
                limit_usd: self.daily_budget_usd,
            };
        }
        BudgetDecision::Allowed
    }

    /// Add a completed query's cost to today's total.
    ///
    /// Negative costs are ignored so the accumulated total can never
    /// decrease within a day.
    pub fn record_spend_on(&self, user_id: i64, today: NaiveDate, cost_usd: f64) {
        if cost_usd <= 0.0 {
            return;
        }
        let mut records = self.records.write().expect("budget ledger lock poisoned");
        let record = Self::rolled_over(&mut records, user_id, today);
        record.spent_usd += cost_usd;
    }

    /// Accumulated spend for `today`. A record from a previous day
    /// reads as zero without being mutated.
    pub fn spend_on(&self, user_id: i64, today: NaiveDate) -> f64 {
        let records = self.records.read().expect("budget ledger lock poisoned");
        match records.get(&user_id) {
            Some(record) if record.date == today => record.spent_usd,
            _ => 0.0,
        }
    }

    /// Remaining budget for `today`, clamped to zero.
    pub fn remaining_on(&self, user_id: i64, today: NaiveDate) -> f64 {
        (self.daily_budget_usd - self.spend_on(user_id, today)).max(0.0)
    }

    /// Get-or-insert the user's record, applying the lazy date rollover.
    fn rolled_over<'a>(
        records: &'a mut HashMap<i64, SpendRecord>,
        user_id: i64,
        today: NaiveDate,
    ) -> &'a mut SpendRecord {
        let record = records.entry(user_id).or_insert(SpendRecord {
            date: today,
            spent_usd: 0.0,
        });
        if record.date != today {
            debug!(user_id, %today, "resetting daily spend");
            record.date = today;
            record.spent_usd = 0.0;
        }
        record
    }
}
