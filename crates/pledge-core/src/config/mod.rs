mod channels;
mod defaults;
mod providers;


pub use channels::*;
pub use providers::*;

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::PledgeError;
use crate::profile::{ClockTime, Settings, Tone};
use defaults::*;

/// Top-level Pledge configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pledge: PledgeConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
}

/// General bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PledgeConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Optional log file path. Empty = stderr only.
    #[serde(default)]
    pub log_file: String,
}

impl Default for PledgeConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
            log_file: String::new(),
        }
    }
}

/// Scheduler configuration -- the minute tick that fires reminders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Settings applied to profiles created on first contact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default = "default_tone")]
    pub tone: Tone,
    #[serde(default = "default_morning_time")]
    pub morning_time: ClockTime,
    #[serde(default = "default_evening_time")]
    pub evening_time: ClockTime,
    #[serde(default = "default_weekly_review_day")]
    pub weekly_review_day: Weekday,
    #[serde(default = "default_weekly_review_time")]
    pub weekly_review_time: ClockTime,
    #[serde(default = "default_deadline_time")]
    pub deadline_time: ClockTime,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for ProfileConfig {
    fn from(s: &Settings) -> Self {
        Self {
            tone: s.tone,
            morning_time: s.morning_time,
            evening_time: s.evening_time,
            weekly_review_day: s.weekly_review_day,
            weekly_review_time: s.weekly_review_time,
            deadline_time: s.deadline_time,
            timezone: s.timezone.clone(),
        }
    }
}

impl From<&ProfileConfig> for Settings {
    fn from(p: &ProfileConfig) -> Self {
        Self {
            morning_time: p.morning_time,
            evening_time: p.evening_time,
            weekly_review_time: p.weekly_review_time,
            weekly_review_day: p.weekly_review_day,
            deadline_time: p.deadline_time,
            timezone: p.timezone.clone(),
            tone: p.tone,
        }
    }
}

/// Apply `TELEGRAM_BOT_TOKEN` / `OPENAI_API_KEY` when the file leaves them empty.
fn apply_env_overrides(config: &mut Config) {
    if let Ok(token) = std::env::var("TELEGRAM_BOT_TOKEN") {
        if let Some(tg) = config.channel.telegram.as_mut() {
            if tg.bot_token.is_empty() {
                tg.bot_token = token;
            }
        }
    }
    if let Ok(key) = std::env::var("OPENAI_API_KEY") {
        if let Some(oa) = config.provider.openai.as_mut() {
            if oa.api_key.is_empty() {
                oa.api_key = key;
            }
        }
    }
}

/// Parse configuration from a TOML string.
pub fn parse(content: &str) -> Result<Config, PledgeError> {
    toml::from_str(content).map_err(|e| PledgeError::Config(format!("failed to parse config: {e}")))
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, PledgeError> {
    let path = Path::new(path);
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PledgeError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        parse(&content)?
    } else {
        info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        Config::default()
    };

    apply_env_overrides(&mut config);
    Ok(config)
}
