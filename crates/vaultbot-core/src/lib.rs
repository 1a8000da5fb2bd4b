//! Request admission and accounting core for vaultbot.
//!
//! Everything here guards a single scarce resource: paid engine calls.
//! A query must pass the cooldown gate and the daily budget ledger, and
//! miss the answer cache, before money is spent. Captures pass through
//! the dedup guard instead so Telegram redeliveries do not create
//! duplicate notes.
//!
//! # Architecture
//!
//! - [`ExpiringMap`] is the shared TTL map under the cache and dedup guard
//! - [`CooldownGate`] enforces minimum spacing between admitted queries
//! - [`BudgetLedger`] tracks per-user daily spend with lazy date rollover
//! - [`AnswerCache`] returns recent answers without an engine call
//! - [`DedupGuard`] drops redelivered captures
//! - [`QueryOrchestrator`] runs the gates in order and calls the engine
//! - [`Heartbeat`] keeps a periodic task alive during slow engine calls
//!
//! All components use interior mutability and take `&self`, so one
//! instance behind an [`std::sync::Arc`] serves every concurrent task.
//! Time-dependent operations have `_at`/`_on` variants taking an explicit
//! instant or date; production callers use the wall clock.

pub mod cache;
pub mod cooldown;
pub mod dedup;
pub mod expiry;
mod hash;
pub mod heartbeat;
pub mod ledger;
pub mod orchestrator;

pub use cache::{AnswerCache, CachedAnswer};
pub use cooldown::{Admission, CooldownGate};
pub use dedup::DedupGuard;
pub use expiry::ExpiringMap;
pub use heartbeat::Heartbeat;
pub use ledger::{BudgetDecision, BudgetLedger};
pub use orchestrator::{QueryOrchestrator, QueryOutcome};
