//! Default value functions used by serde for config deserialization.

use crate::profile::{ClockTime, Settings, Tone};
use chrono::Weekday;

pub fn default_name() -> String {
    "pledge".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_provider() -> String {
    "none".to_string()
}

pub fn default_true() -> bool {
    true
}

pub fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

pub fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

pub fn default_tone() -> Tone {
    Settings::default().tone
}

pub fn default_morning_time() -> ClockTime {
    Settings::default().morning_time
}

pub fn default_evening_time() -> ClockTime {
    Settings::default().evening_time
}

pub fn default_weekly_review_day() -> Weekday {
    Settings::default().weekly_review_day
}

pub fn default_weekly_review_time() -> ClockTime {
    Settings::default().weekly_review_time
}

pub fn default_deadline_time() -> ClockTime {
    Settings::default().deadline_time
}

pub fn default_timezone() -> String {
    Settings::default().timezone
}
