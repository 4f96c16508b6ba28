//! Task cycle engine: morning commit, evening report, weekly aggregate,
//! deadline sweep.
//!
//! Every function mutates a profile the caller has already locked, so a
//! report and a sweep for the same user never interleave.

pub mod parse;


use chrono::{DateTime, FixedOffset, Utc};
use pledge_core::{
    clock::local_moment,
    profile::{TaskEntry, TaskStatus, UserProfile, WeeklyStats, DEADLINE_REASON, MAX_TASKS},
};
use tracing::warn;

/// Why a commit was refused. Nothing is mutated on rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitRejection {
    Empty,
    TooMany(usize),
}

/// A report arrived before anything was committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoCommit;

/// Outcome of an evening report, counted over all current tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSummary {
    pub done: usize,
    pub missed: usize,
    pub total: usize,
}

/// Figures produced by the weekly aggregate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeeklyReport {
    /// Rounded percentage, 0 when nothing was reported.
    pub completion_rate: u32,
    /// Alignment as it stood before the reset, in `[0, 1]`.
    pub alignment: f64,
}

/// `now` in the profile's zone. An unknown zone falls back to UTC so the
/// stamp is still recorded.
fn local_stamp(profile: &UserProfile, now: DateTime<Utc>) -> DateTime<FixedOffset> {
    match local_moment(&profile.settings.timezone, now) {
        Ok(moment) => moment.stamp(),
        Err(e) => {
            warn!("{}: {e}, stamping in UTC", profile.id);
            now.fixed_offset()
        }
    }
}

/// Replace today's tasks with the items in `body` (marker already stripped).
pub fn commit<'a>(
    profile: &'a mut UserProfile,
    body: &str,
    now: DateTime<Utc>,
) -> Result<&'a [TaskEntry], CommitRejection> {
    let items = parse::parse_commit_items(body);
    if items.is_empty() {
        return Err(CommitRejection::Empty);
    }
    if items.len() > MAX_TASKS {
        return Err(CommitRejection::TooMany(items.len()));
    }

    profile.current_tasks = items
        .into_iter()
        .zip(1u8..)
        .map(|(description, slot)| TaskEntry::pending(slot, description))
        .collect();
    profile.last_morning_commit_at = Some(local_stamp(profile, now));
    Ok(profile.current_tasks.as_slice())
}

/// Apply an evening report (marker already stripped) and accumulate stats.
///
/// Only pending tasks are updated; for each slot the first parsed result
/// wins. Pairs naming slots with no task are ignored.
pub fn report(
    profile: &mut UserProfile,
    body: &str,
    now: DateTime<Utc>,
) -> Result<ReportSummary, NoCommit> {
    if profile.current_tasks.is_empty() {
        return Err(NoCommit);
    }

    let results = parse::parse_report(body);
    for task in profile
        .current_tasks
        .iter_mut()
        .filter(|t| t.status == TaskStatus::Pending)
    {
        if let Some(result) = results.iter().find(|r| r.slot == task.slot) {
            task.status = result.status;
            task.reason = result.reason.clone();
        }
    }
    profile.last_evening_report_at = Some(local_stamp(profile, now));

    let summary = ReportSummary {
        done: count_status(&profile.current_tasks, TaskStatus::Done),
        missed: count_status(&profile.current_tasks, TaskStatus::Miss),
        total: profile.current_tasks.len(),
    };
    let stats = &mut profile.weekly_stats;
    stats.total_tasks += summary.total as u32;
    stats.completed_tasks += summary.done as u32;
    stats.missed_tasks += summary.missed as u32;
    Ok(summary)
}

fn count_status(tasks: &[TaskEntry], status: TaskStatus) -> usize {
    tasks.iter().filter(|t| t.status == status).count()
}

/// Compute the weekly figures, then reset the stats and clear today's tasks.
/// A second call in the same period reports 0%.
pub fn weekly_aggregate(profile: &mut UserProfile) -> WeeklyReport {
    let stats = std::mem::take(&mut profile.weekly_stats);
    profile.current_tasks.clear();
    WeeklyReport {
        completion_rate: completion_rate(&stats),
        alignment: stats.alignment,
    }
}

fn completion_rate(stats: &WeeklyStats) -> u32 {
    if stats.total_tasks == 0 {
        return 0;
    }
    (100.0 * f64::from(stats.completed_tasks) / f64::from(stats.total_tasks)).round() as u32
}

/// Whether the last commit still awaits a report or a sweep.
///
/// Compares stamps rather than calendar dates, so a cycle committed before
/// local midnight stays open for evening and deadline times set after it.
pub fn is_open(profile: &UserProfile) -> bool {
    match profile.last_morning_commit_at {
        Some(committed) => profile
            .last_evening_report_at
            .map_or(true, |reported| reported < committed),
        None => false,
    }
}

/// Close an unreported day: every pending task becomes a miss. Weekly stats
/// are left alone. Returns how many tasks were swept.
pub fn deadline_sweep(profile: &mut UserProfile, now: DateTime<Utc>) -> usize {
    let mut swept = 0;
    for task in profile
        .current_tasks
        .iter_mut()
        .filter(|t| t.status == TaskStatus::Pending)
    {
        task.status = TaskStatus::Miss;
        task.reason = Some(DEADLINE_REASON.to_string());
        swept += 1;
    }
    profile.last_evening_report_at = Some(local_stamp(profile, now));
    swept
}
