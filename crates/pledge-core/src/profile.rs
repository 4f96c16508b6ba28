//! Per-user domain model: settings, the day's tasks, and weekly counters.

use chrono::{DateTime, FixedOffset, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum number of tasks a single morning commit may carry.
pub const MAX_TASKS: usize = 3;

/// Alignment value a fresh week starts with.
pub const DEFAULT_ALIGNMENT: f64 = 0.5;

/// Reason recorded on tasks closed by the deadline sweep.
pub const DEADLINE_REASON: &str = "deadline exceeded";

// ---------------------------------------------------------------------------
// Wall-clock time
// ---------------------------------------------------------------------------

/// A 24-hour wall-clock time with minute precision, written `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a 24-hour HH:MM time")]
pub struct InvalidClockTime(pub String);

impl ClockTime {
    /// Build from components; `None` when out of range.
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    /// Truncate any time-of-day value to its minute.
    pub fn of<T: Timelike>(t: &T) -> Self {
        Self {
            hour: t.hour() as u8,
            minute: t.minute() as u8,
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Whether `t` falls inside this exact minute.
    pub fn matches<T: Timelike>(&self, t: &T) -> bool {
        t.hour() == u32::from(self.hour) && t.minute() == u32::from(self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = InvalidClockTime;

    /// Strict `HH:MM`: exactly two digits on each side, 00-23 and 00-59.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || InvalidClockTime(s.to_string());
        let (h, m) = s.split_once(':').ok_or_else(err)?;
        let two_digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
        if !two_digits(h) || !two_digits(m) {
            return Err(err());
        }
        let hour: u8 = h.parse().map_err(|_| err())?;
        let minute: u8 = m.parse().map_err(|_| err())?;
        Self::new(hour, minute).ok_or_else(err)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = InvalidClockTime;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

// ---------------------------------------------------------------------------
// Tone
// ---------------------------------------------------------------------------

/// Reply-phrasing style.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Gentle encouragement (default).
    #[default]
    Mild,
    /// Blunt and to the point.
    Sharp,
    /// Drill-sergeant, merciless.
    Dos,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tone '{0}'")]
pub struct InvalidTone(pub String);

impl Tone {
    pub const ALL: [Tone; 3] = [Tone::Mild, Tone::Sharp, Tone::Dos];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mild => "mild",
            Self::Sharp => "sharp",
            Self::Dos => "dos",
        }
    }
}

impl FromStr for Tone {
    type Err = InvalidTone;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mild" => Ok(Self::Mild),
            "sharp" => Ok(Self::Sharp),
            "dos" => Ok(Self::Dos),
            _ => Err(InvalidTone(s.to_string())),
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Per-user configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub morning_time: ClockTime,
    pub evening_time: ClockTime,
    pub weekly_review_time: ClockTime,
    /// Serialized as the three-letter abbreviation ("Sun").
    pub weekly_review_day: Weekday,
    pub deadline_time: ClockTime,
    /// IANA zone name. Not validated on write.
    pub timezone: String,
    pub tone: Tone,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            morning_time: ClockTime { hour: 7, minute: 30 },
            evening_time: ClockTime { hour: 21, minute: 30 },
            weekly_review_time: ClockTime { hour: 19, minute: 0 },
            weekly_review_day: Weekday::Sun,
            deadline_time: ClockTime { hour: 23, minute: 0 },
            timezone: "Asia/Tokyo".to_string(),
            tone: Tone::Mild,
        }
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Done,
    Miss,
}

/// One committed task for the current day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskEntry {
    /// 1-based position, shown to users as A/B/C.
    pub slot: u8,
    pub description: String,
    pub status: TaskStatus,
    /// Only meaningful when `status == Miss`.
    pub reason: Option<String>,
}

impl TaskEntry {
    pub fn pending(slot: u8, description: impl Into<String>) -> Self {
        Self {
            slot,
            description: description.into(),
            status: TaskStatus::Pending,
            reason: None,
        }
    }

    /// Letter label for the slot (1 → 'A').
    pub fn label(&self) -> char {
        slot_label(self.slot)
    }
}

/// Letter label for a 1-based slot.
pub fn slot_label(slot: u8) -> char {
    char::from(b'A' + slot.saturating_sub(1))
}

/// Counters accumulated by evening reports until the weekly aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyStats {
    pub total_tasks: u32,
    pub completed_tasks: u32,
    pub missed_tasks: u32,
    /// In [0, 1].
    pub alignment: f64,
}

impl Default for WeeklyStats {
    fn default() -> Self {
        Self {
            total_tasks: 0,
            completed_tasks: 0,
            missed_tasks: 0,
            alignment: DEFAULT_ALIGNMENT,
        }
    }
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Everything the bot knows about one chat identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub settings: Settings,
    /// Invariant: at most [`MAX_TASKS`] entries.
    pub current_tasks: Vec<TaskEntry>,
    pub last_morning_commit_at: Option<DateTime<FixedOffset>>,
    pub last_evening_report_at: Option<DateTime<FixedOffset>>,
    pub weekly_stats: WeeklyStats,
    /// UTC minute (seconds since epoch / 60) the scheduler last evaluated this profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_evaluated_minute: Option<i64>,
}

impl UserProfile {
    pub fn new(id: impl Into<String>, settings: Settings) -> Self {
        Self {
            id: id.into(),
            settings,
            current_tasks: Vec::new(),
            last_morning_commit_at: None,
            last_evening_report_at: None,
            weekly_stats: WeeklyStats::default(),
            last_evaluated_minute: None,
        }
    }

    /// The fixed context shape handed to the default responder.
    pub fn snapshot(&self) -> ProfileSnapshot {
        ProfileSnapshot {
            current_tasks: self.current_tasks.clone(),
            weekly_stats: self.weekly_stats.clone(),
            settings: self.settings.clone(),
            last_morning_commit_at: self.last_morning_commit_at,
            last_evening_report_at: self.last_evening_report_at,
        }
    }
}

/// Read-only view of a profile for the default responder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub current_tasks: Vec<TaskEntry>,
    pub weekly_stats: WeeklyStats,
    pub settings: Settings,
    pub last_morning_commit_at: Option<DateTime<FixedOffset>>,
    pub last_evening_report_at: Option<DateTime<FixedOffset>>,
}

// ---------------------------------------------------------------------------
// Conversation state
// ---------------------------------------------------------------------------

/// Which settings value, if any, the next text message is expected to carry.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    #[default]
    Normal,
    AwaitingMorningTime,
    AwaitingEveningTime,
    AwaitingWeeklyTime,
    AwaitingTone,
    AwaitingDeadlineTime,
    AwaitingTimezone,
}
