//! Configuration schema.
//!
//! Loaded once at startup from a JSON file (default
//! `~/.vaultbot/config.json`). Every field carries a serde default so a
//! partial config is valid; unknown fields are silently ignored for
//! forward compatibility. [`Config::validate`] collects every problem
//! rather than stopping at the first.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, VaultbotError};
use crate::event::Tier;

/// Root configuration for vaultbot.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Telegram transport settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Vault (note store) settings.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Admission, budget, cache and dedup limits.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// External question-answering engine settings.
    #[serde(default)]
    pub engine: EngineConfig,
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&data)?;
        Ok(config)
    }

    /// Default config file location: `~/.vaultbot/config.json`.
    ///
    /// Falls back to a relative path when no home directory is available.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".vaultbot").join("config.json"))
            .unwrap_or_else(|| PathBuf::from(".vaultbot/config.json"))
    }

    /// Validate required settings, collecting all problems.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.telegram.token.is_empty() {
            errors.push("telegram.token not set".to_string());
        }
        if self.telegram.allowed_user_id == 0 {
            errors.push("telegram.allowed_user_id not set".to_string());
        }
        if !self.vault.path.exists() {
            errors.push(format!(
                "vault.path does not exist: {}",
                self.vault.path.display()
            ));
        }
        if self.limits.daily_budget_usd < 0.0 {
            errors.push("limits.daily_budget_usd must not be negative".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(VaultbotError::ConfigInvalid {
                reason: errors.join("; "),
            })
        }
    }

    /// Per-tier engine ceilings.
    pub fn tier(&self, tier: Tier) -> &TierConfig {
        match tier {
            Tier::Fast => &self.engine.fast,
            Tier::Thorough => &self.engine.thorough,
        }
    }
}

// ── Telegram ─────────────────────────────────────────────────────────────

/// Telegram transport settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TelegramConfig {
    /// Bot token from @BotFather.
    #[serde(default)]
    pub token: String,

    /// The single authorized principal. Messages from anyone else are
    /// silently dropped. 0 means unset and fails validation.
    #[serde(default, alias = "allowedUserId")]
    pub allowed_user_id: i64,
}

// ── Vault ────────────────────────────────────────────────────────────────

/// Vault (note store) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Path to the vault git repository.
    #[serde(default = "default_vault_path")]
    pub path: PathBuf,

    /// Folder within the vault where captures land.
    #[serde(default = "default_inbox_folder", alias = "inboxFolder")]
    pub inbox_folder: String,

    /// Whether to commit captures to git.
    #[serde(default = "default_true", alias = "gitEnabled")]
    pub git_enabled: bool,

    /// Whether to push after each commit.
    #[serde(default = "default_true", alias = "gitAutoPush")]
    pub git_auto_push: bool,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            path: default_vault_path(),
            inbox_folder: default_inbox_folder(),
            git_enabled: true,
            git_auto_push: true,
        }
    }
}

fn default_vault_path() -> PathBuf {
    PathBuf::from(".")
}
fn default_inbox_folder() -> String {
    "0-Inbox".into()
}
fn default_true() -> bool {
    true
}

// ── Limits ───────────────────────────────────────────────────────────────

/// Admission, budget, cache and dedup limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Minimum spacing between admitted queries per user, in seconds.
    #[serde(default = "default_cooldown_seconds", alias = "cooldownSeconds")]
    pub cooldown_seconds: u64,

    /// Daily spend ceiling per user, in USD.
    #[serde(default = "default_daily_budget_usd", alias = "dailyBudgetUsd")]
    pub daily_budget_usd: f64,

    /// Answer cache time-to-live, in seconds.
    #[serde(default = "default_cache_ttl_seconds", alias = "cacheTtlSeconds")]
    pub cache_ttl_seconds: u64,

    /// Capture dedup window, in seconds.
    #[serde(default = "default_dedup_window_seconds", alias = "dedupWindowSeconds")]
    pub dedup_window_seconds: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            cooldown_seconds: default_cooldown_seconds(),
            daily_budget_usd: default_daily_budget_usd(),
            cache_ttl_seconds: default_cache_ttl_seconds(),
            dedup_window_seconds: default_dedup_window_seconds(),
        }
    }
}

fn default_cooldown_seconds() -> u64 {
    30
}
fn default_daily_budget_usd() -> f64 {
    1.00
}
fn default_cache_ttl_seconds() -> u64 {
    300
}
fn default_dedup_window_seconds() -> u64 {
    300
}

// ── Engine ───────────────────────────────────────────────────────────────

/// External question-answering engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// HTTP endpoint of the agent service.
    #[serde(default = "default_engine_endpoint")]
    pub endpoint: String,

    /// Ceilings for the fast tier.
    #[serde(default = "default_fast_tier")]
    pub fast: TierConfig,

    /// Ceilings for the thorough tier.
    #[serde(default = "default_thorough_tier")]
    pub thorough: TierConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            endpoint: default_engine_endpoint(),
            fast: default_fast_tier(),
            thorough: default_thorough_tier(),
        }
    }
}

/// Per-tier engine ceilings.
///
/// The turn count and budget are collaboration limits passed through to
/// the engine, not wall-clock timeouts enforced here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierConfig {
    /// Model identifier passed to the engine.
    pub model: String,

    /// Maximum conversational turns per call.
    #[serde(alias = "maxTurns")]
    pub max_turns: u32,

    /// Maximum spend per call, in USD.
    #[serde(alias = "maxBudgetUsd")]
    pub max_budget_usd: f64,
}

fn default_engine_endpoint() -> String {
    "http://127.0.0.1:8787/ask".into()
}
fn default_fast_tier() -> TierConfig {
    TierConfig {
        model: "haiku".into(),
        max_turns: 5,
        max_budget_usd: 0.02,
    }
}
fn default_thorough_tier() -> TierConfig {
    TierConfig {
        model: "sonnet".into(),
        max_turns: 10,
        max_budget_usd: 0.15,
    }
}
