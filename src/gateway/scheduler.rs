//! Minute scheduler: per-user reminders, the weekly review, and the
//! deadline sweep.
//!
//! Every profile is evaluated independently against its own zone. Triggers
//! use exact-minute equality; missed minutes are not caught up.

use super::Gateway;
use crate::cycle;
use crate::tone::{self, t};
use chrono::{DateTime, Timelike, Utc};
use pledge_core::{
    clock::{local_moment, LocalMoment},
    message::OutgoingMessage,
    profile::UserProfile,
    traits::Channel,
};
use pledge_memory::Store;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Morning,
    Evening,
    Weekly,
    Deadline,
}

/// One outbound message produced by a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub identity: String,
    pub kind: NotificationKind,
    pub message: OutgoingMessage,
}

/// Evaluate every profile for the minute containing `now`.
///
/// Mutations (weekly reset, deadline sweep) are applied before returning.
/// A profile already evaluated in this UTC minute is skipped, so a repeated
/// tick never aggregates twice.
pub async fn evaluate_tick(store: &Store, now: DateTime<Utc>) -> Vec<Notification> {
    let minute = now.timestamp().div_euclid(60);
    let mut out = Vec::new();

    for (identity, handle) in store.handles().await {
        let mut profile = handle.lock().await;
        if profile.last_evaluated_minute == Some(minute) {
            debug!("scheduler: {identity} already evaluated this minute");
            continue;
        }
        profile.last_evaluated_minute = Some(minute);

        let moment = match local_moment(&profile.settings.timezone, now) {
            Ok(m) => m,
            Err(e) => {
                warn!("scheduler: skipping {identity}: {e}");
                continue;
            }
        };

        for (kind, message) in evaluate_profile(&mut profile, &moment, now) {
            out.push(Notification {
                identity: identity.clone(),
                kind,
                message,
            });
        }
    }

    out
}

fn evaluate_profile(
    profile: &mut UserProfile,
    moment: &LocalMoment,
    now: DateTime<Utc>,
) -> Vec<(NotificationKind, OutgoingMessage)> {
    let mut out = Vec::new();
    let local = moment.time();
    let tone = profile.settings.tone;
    let committed_today = moment.is_same_day(profile.last_morning_commit_at);

    if local == profile.settings.morning_time && !committed_today {
        out.push((
            NotificationKind::Morning,
            OutgoingMessage::text(t("morning_reminder", tone)),
        ));
    }

    if local == profile.settings.evening_time && cycle::is_open(profile) {
        out.push((
            NotificationKind::Evening,
            OutgoingMessage::text(t("evening_reminder", tone)),
        ));
    }

    if local == profile.settings.deadline_time && cycle::is_open(profile) {
        let swept = cycle::deadline_sweep(profile, now);
        info!("scheduler: deadline sweep for {} ({swept} missed)", profile.id);
        out.push((
            NotificationKind::Deadline,
            OutgoingMessage::text(tone::deadline_notice(tone, swept)),
        ));
    }

    if moment.weekday() == profile.settings.weekly_review_day
        && local == profile.settings.weekly_review_time
    {
        let report = cycle::weekly_aggregate(profile);
        info!(
            "scheduler: weekly review for {} ({}%)",
            profile.id, report.completion_rate
        );
        out.push((
            NotificationKind::Weekly,
            OutgoingMessage::text(tone::weekly_report(
                tone,
                report.completion_rate,
                report.alignment,
            )),
        ));
    }

    out
}

/// Time until the next wall-clock minute boundary.
fn until_next_minute(now: DateTime<Utc>) -> Duration {
    let into_minute =
        u64::from(now.second()) * 1000 + u64::from(now.timestamp_subsec_millis().min(999));
    Duration::from_millis(60_000 - into_minute)
}

impl Gateway {
    /// Background task: evaluate all profiles once per minute.
    ///
    /// Each notification is sent on its own task so one slow send never
    /// delays another user.
    pub(super) async fn scheduler_loop(store: Store, channel: Arc<dyn Channel>) {
        info!("scheduler started");
        loop {
            // Clock-aligned sleep: fire just after each minute boundary.
            tokio::time::sleep(until_next_minute(Utc::now())).await;

            let notifications = evaluate_tick(&store, Utc::now()).await;
            for note in notifications {
                let channel = channel.clone();
                tokio::spawn(async move {
                    debug!("scheduler: {:?} to {}", note.kind, note.identity);
                    if let Err(e) = channel.send(&note.identity, note.message).await {
                        error!("scheduler: failed to notify {}: {e}", note.identity);
                    }
                });
            }
        }
    }
}
