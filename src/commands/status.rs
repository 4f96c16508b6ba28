//! Read-only command handlers: /help, /settings, /today.

use crate::dialog::settings_actions;
use crate::tone;
use pledge_core::message::OutgoingMessage;
use pledge_memory::ProfileHandle;

pub(super) async fn handle_help(handle: &ProfileHandle) -> OutgoingMessage {
    let tone = handle.lock().await.settings.tone;
    OutgoingMessage::text(tone::help(tone))
}

/// Handle /settings: overview plus one quick action per setting.
pub(super) async fn handle_settings(handle: &ProfileHandle) -> OutgoingMessage {
    let settings = handle.lock().await.settings.clone();
    OutgoingMessage::with_actions(
        tone::settings_summary(&settings),
        settings_actions(settings.tone),
    )
}

/// Handle /today: today's tasks and the running weekly counters.
pub(super) async fn handle_today(handle: &ProfileHandle) -> OutgoingMessage {
    let profile = handle.lock().await;
    OutgoingMessage::text(tone::today_summary(
        profile.settings.tone,
        &profile.current_tasks,
        &profile.weekly_stats,
    ))
}
