//! Engine configuration.
//!
//! The host may post a JSON object to `/api/config`; any field it leaves out
//! keeps its default. Defaults match the storage keys the site has always
//! used, so existing saves and streaks keep loading.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::daily::DEFAULT_SEED_PREFIX;
use crate::game::session::DEFAULT_MAX_ATTEMPTS;
use crate::game::snapshot::DEFAULT_PROGRESS_KEY;
use crate::game::streak::{DEFAULT_LAST_WIN_KEY, DEFAULT_STREAK_KEY, STREAK_EVENT};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Attempts per round, shared by character and name guesses.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Store key holding every saved session.
    #[serde(default = "default_progress_key")]
    pub progress_key: String,
    #[serde(default = "default_streak_key")]
    pub streak_key: String,
    #[serde(default = "default_last_win_key")]
    pub last_win_key: String,
    /// Prefix of the daily shuffle seed. Changing it reshuffles every day.
    #[serde(default = "default_daily_seed_prefix")]
    pub daily_seed_prefix: String,
    /// Name of the DOM event the host dispatches when the daily streak changes.
    #[serde(default = "default_streak_event")]
    pub streak_event: String,
}

const MIN_ATTEMPTS: u32 = 2;
/// The attempt bar holds one slot per attempt.
const MAX_ATTEMPTS: u32 = 64;

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_progress_key() -> String {
    DEFAULT_PROGRESS_KEY.to_string()
}

fn default_streak_key() -> String {
    DEFAULT_STREAK_KEY.to_string()
}

fn default_last_win_key() -> String {
    DEFAULT_LAST_WIN_KEY.to_string()
}

fn default_daily_seed_prefix() -> String {
    DEFAULT_SEED_PREFIX.to_string()
}

fn default_streak_event() -> String {
    STREAK_EVENT.to_string()
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            progress_key: default_progress_key(),
            streak_key: default_streak_key(),
            last_win_key: default_last_win_key(),
            daily_seed_prefix: default_daily_seed_prefix(),
            streak_event: default_streak_event(),
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_ATTEMPTS..=MAX_ATTEMPTS).contains(&self.max_attempts) {
            return Err(ConfigError::Invalid(format!(
                "max_attempts must be between {} (one is reserved for the name) and {}, got {}",
                MIN_ATTEMPTS, MAX_ATTEMPTS, self.max_attempts
            )));
        }
        let keys = [&self.progress_key, &self.streak_key, &self.last_win_key];
        if keys.iter().any(|k| k.is_empty()) {
            return Err(ConfigError::Invalid("storage keys must not be empty".to_string()));
        }
        if keys[0] == keys[1] || keys[0] == keys[2] || keys[1] == keys[2] {
            return Err(ConfigError::Invalid("storage keys must be distinct".to_string()));
        }
        Ok(())
    }
}
