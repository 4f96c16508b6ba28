//! Setting command handlers: /tone, /time, /deadline, /tz.
//!
//! A successful change closes any open sub-dialog; a usage error leaves
//! everything as it was.

use super::{args, tone_of, CommandContext};
use crate::dialog::{apply_setting, parse_weekly, timezone_confirmation};
use crate::tone::{self, t};
use pledge_core::message::OutgoingMessage;
use pledge_core::profile::{ClockTime, Tone};
use pledge_memory::ProfileHandle;

/// Handle /tone: set the reply style or list the valid values.
pub(super) async fn handle_tone(ctx: &CommandContext<'_>, handle: &ProfileHandle) -> OutgoingMessage {
    let current = tone_of(handle).await;
    let parsed = match args(ctx.text).as_slice() {
        [value] => value.parse::<Tone>().ok(),
        _ => None,
    };
    match parsed {
        Some(new_tone) => {
            apply_setting(ctx.store, ctx.identity, handle, |s| s.tone = new_tone).await;
            OutgoingMessage::text(tone::tone_set(new_tone))
        }
        None => OutgoingMessage::text(tone::tone_usage(current)),
    }
}

/// Handle /time: `am|pm HH:MM` or `weekly <day> HH:MM`.
pub(super) async fn handle_time(ctx: &CommandContext<'_>, handle: &ProfileHandle) -> OutgoingMessage {
    let tone = tone_of(handle).await;
    let usage = || OutgoingMessage::text(t("usage_time", tone));

    let args = args(ctx.text);
    let Some((kind, rest)) = args.split_first() else {
        return usage();
    };

    match kind.to_ascii_lowercase().as_str() {
        "am" | "pm" => {
            let Some(time) = single_time(rest) else {
                return usage();
            };
            let morning = kind.eq_ignore_ascii_case("am");
            apply_setting(ctx.store, ctx.identity, handle, |s| {
                if morning {
                    s.morning_time = time;
                } else {
                    s.evening_time = time;
                }
            })
            .await;
            let label = if morning { "label_morning" } else { "label_evening" };
            OutgoingMessage::text(tone::setting_updated(tone, label, &time.to_string()))
        }
        "weekly" => match parse_weekly(&rest.join(" ")) {
            Some((Some(day), time)) => {
                apply_setting(ctx.store, ctx.identity, handle, |s| {
                    s.weekly_review_day = day;
                    s.weekly_review_time = time;
                })
                .await;
                OutgoingMessage::text(tone::setting_updated(
                    tone,
                    "label_weekly",
                    &format!("{day} {time}"),
                ))
            }
            _ => usage(),
        },
        _ => usage(),
    }
}

/// Handle /deadline HH:MM.
pub(super) async fn handle_deadline(
    ctx: &CommandContext<'_>,
    handle: &ProfileHandle,
) -> OutgoingMessage {
    let tone = tone_of(handle).await;
    match single_time(&args(ctx.text)) {
        Some(time) => {
            apply_setting(ctx.store, ctx.identity, handle, |s| s.deadline_time = time).await;
            OutgoingMessage::text(tone::setting_updated(
                tone,
                "label_deadline",
                &time.to_string(),
            ))
        }
        None => OutgoingMessage::text(t("usage_deadline", tone)),
    }
}

/// Handle /tz <zone>. The zone is stored as given.
pub(super) async fn handle_tz(ctx: &CommandContext<'_>, handle: &ProfileHandle) -> OutgoingMessage {
    let tone = tone_of(handle).await;
    let zone = args(ctx.text).join(" ");
    if zone.is_empty() {
        return OutgoingMessage::text(t("usage_tz", tone));
    }
    apply_setting(ctx.store, ctx.identity, handle, |s| s.timezone = zone.clone()).await;
    OutgoingMessage::text(timezone_confirmation(tone, &zone))
}

fn single_time(args: &[&str]) -> Option<ClockTime> {
    match args {
        [time] => time.parse().ok(),
        _ => None,
    }
}
