//! Timezone-aware wall clock.
//!
//! The scheduler and the task cycle never read the system clock directly: they
//! receive a UTC instant and project it into the user's zone here.

use crate::error::PledgeError;
use crate::profile::ClockTime;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;

/// Resolve an IANA zone name.
pub fn parse_tz(zone: &str) -> Result<Tz, PledgeError> {
    zone.trim()
        .parse::<Tz>()
        .map_err(|_| PledgeError::Timezone(zone.to_string()))
}

/// A UTC instant seen from one user's zone.
#[derive(Debug, Clone, Copy)]
pub struct LocalMoment {
    pub tz: Tz,
    pub at: DateTime<Tz>,
}

impl LocalMoment {
    /// Wall-clock `HH:MM` at this moment.
    pub fn time(&self) -> ClockTime {
        ClockTime::of(&self.at)
    }

    pub fn weekday(&self) -> Weekday {
        self.at.weekday()
    }

    pub fn date(&self) -> NaiveDate {
        self.at.date_naive()
    }

    /// The moment as a fixed-offset timestamp, the form stored on profiles.
    pub fn stamp(&self) -> DateTime<FixedOffset> {
        self.at.fixed_offset()
    }

    /// Whether `stamp` falls on this moment's local calendar date.
    pub fn is_same_day(&self, stamp: Option<DateTime<FixedOffset>>) -> bool {
        stamp.is_some_and(|s| s.with_timezone(&self.tz).date_naive() == self.date())
    }
}

/// Project `now` into `zone`. Unknown zones surface as [`PledgeError::Timezone`].
pub fn local_moment(zone: &str, now: DateTime<Utc>) -> Result<LocalMoment, PledgeError> {
    let tz = parse_tz(zone)?;
    Ok(LocalMoment {
        tz,
        at: now.with_timezone(&tz),
    })
}
