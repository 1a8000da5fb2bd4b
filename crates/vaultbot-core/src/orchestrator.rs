//! Query admission and execution.
//!
//! A query passes three gates in a fixed order before the engine is
//! called: cooldown, then daily budget, then the answer cache. The
//! ordering means a cached answer still consumes a cooldown slot and
//! still requires remaining budget, so cache hits cannot be used to
//! sidestep admission. On a successful engine call the reported cost is
//! recorded and the answer cached; a failed call records and caches
//! nothing.
//!
//! No lock is held across the engine await. Each gate takes and
//! releases its own lock before the next runs, so two queries admitted
//! concurrently can both reach the engine; the budget is a strict
//! ceiling at check time, not a reservation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use tracing::{info, warn};
use vaultbot_engine::{AskRequest, QueryEngine};
use vaultbot_types::config::{LimitsConfig, TierConfig};
use vaultbot_types::Tier;

use crate::cache::{AnswerCache, CachedAnswer};
use crate::cooldown::{Admission, CooldownGate};
use crate::ledger::{BudgetDecision, BudgetLedger};

/// Result of submitting a query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// The query produced an answer.
    Answered {
        answer: CachedAnswer,
        /// Whether it came from the cache rather than a fresh engine call.
        cached: bool,
    },
    /// Denied by the cooldown gate.
    RateLimited {
        /// Whole seconds until the next query would be admitted.
        wait_secs: u64,
    },
    /// Denied by the daily budget.
    OverBudget { spent_usd: f64, limit_usd: f64 },
    /// The engine call failed. Nothing was charged or cached.
    Failed { reason: String },
}

/// Runs queries through admission gates and the engine.
pub struct QueryOrchestrator {
    gate: CooldownGate,
    ledger: BudgetLedger,
    cache: AnswerCache,
    engine: Arc<dyn QueryEngine>,
    fast: TierConfig,
    thorough: TierConfig,
}

impl QueryOrchestrator {
    pub fn new(
        engine: Arc<dyn QueryEngine>,
        limits: &LimitsConfig,
        fast: TierConfig,
        thorough: TierConfig,
    ) -> Self {
        Self {
            gate: CooldownGate::new(Duration::from_secs(limits.cooldown_seconds)),
            ledger: BudgetLedger::new(limits.daily_budget_usd),
            cache: AnswerCache::new(Duration::from_secs(limits.cache_ttl_seconds)),
            engine,
            fast,
            thorough,
        }
    }

    /// Submit a query at the current wall clock and local date.
    pub async fn ask(&self, user_id: i64, question: &str, tier: Tier) -> QueryOutcome {
        self.ask_at(user_id, question, tier, Instant::now(), Local::now().date_naive())
            .await
    }

    /// Submit a query at an explicit instant and date.
    pub async fn ask_at(
        &self,
        user_id: i64,
        question: &str,
        tier: Tier,
        now: Instant,
        today: NaiveDate,
    ) -> QueryOutcome {
        if let Admission::Denied { wait_secs } = self.gate.check_and_record_at(user_id, now) {
            return QueryOutcome::RateLimited { wait_secs };
        }

        if let BudgetDecision::Denied {
            spent_usd,
            limit_usd,
        } = self.ledger.check_on(user_id, today)
        {
            return QueryOutcome::OverBudget {
                spent_usd,
                limit_usd,
            };
        }

        if let Some(answer) = self.cache.get_at(user_id, question, now) {
            info!(user_id, %tier, "answer served from cache");
            return QueryOutcome::Answered {
                answer,
                cached: true,
            };
        }

        let tier_cfg = self.tier(tier);
        let request = AskRequest {
            question: question.to_string(),
            model: tier_cfg.model.clone(),
            max_turns: tier_cfg.max_turns,
            max_budget_usd: tier_cfg.max_budget_usd,
        };

        let response = match self.engine.ask(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(user_id, %tier, error = %e, "engine call failed");
                return QueryOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        self.ledger.record_spend_on(user_id, today, response.cost_usd);
        info!(
            user_id,
            %tier,
            model = %response.model,
            cost_usd = response.cost_usd,
            spent_usd = self.ledger.spend_on(user_id, today),
            "query answered"
        );

        let answer = CachedAnswer {
            answer: response.answer,
            model: response.model,
            cost_usd: response.cost_usd,
            input_tokens: response.usage.input_tokens,
            output_tokens: response.usage.output_tokens,
        };
        self.cache.store_at(user_id, question, answer.clone(), now);

        QueryOutcome::Answered {
            answer,
            cached: false,
        }
    }

    /// Spend recorded today for this user.
    pub fn spent_today(&self, user_id: i64) -> f64 {
        self.ledger.spend_on(user_id, Local::now().date_naive())
    }

    /// Budget left today for this user, clamped to zero.
    pub fn remaining_today(&self, user_id: i64) -> f64 {
        self.ledger.remaining_on(user_id, Local::now().date_naive())
    }

    /// The configured daily ceiling.
    pub fn daily_budget_usd(&self) -> f64 {
        self.ledger.daily_budget_usd()
    }

    fn tier(&self, tier: Tier) -> &TierConfig {
        match tier {
            Tier::Fast => &self.fast,
            Tier::Thorough => &self.thorough,
        }
    }
}
