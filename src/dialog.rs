//! Settings sub-dialogs.
//!
//! A menu selection opens an `Awaiting*` state; the next text the user sends
//! is resolved against it. Valid input applies the setting and closes the
//! dialog, invalid input keeps it open for another try.

use crate::tone::{self, t};
use chrono::Weekday;
use pledge_core::{
    clock::parse_tz,
    message::{OutgoingMessage, QuickAction},
    profile::{ClockTime, ConversationState, Settings, Tone},
};
use pledge_memory::{ProfileHandle, Store};
use tracing::debug;

pub(crate) const MENU_MORNING: &str = "settings:morning";
pub(crate) const MENU_EVENING: &str = "settings:evening";
pub(crate) const MENU_WEEKLY: &str = "settings:weekly";
pub(crate) const MENU_DEADLINE: &str = "settings:deadline";
pub(crate) const MENU_TONE: &str = "settings:tone";
pub(crate) const MENU_TIMEZONE: &str = "settings:timezone";
/// Prefix of the tone picker's keys, e.g. `tone:sharp`.
pub(crate) const TONE_KEY_PREFIX: &str = "tone:";

/// Quick actions attached to the `/settings` overview.
pub(crate) fn settings_actions(tone: Tone) -> Vec<QuickAction> {
    [
        ("menu_morning", MENU_MORNING),
        ("menu_evening", MENU_EVENING),
        ("menu_weekly", MENU_WEEKLY),
        ("menu_deadline", MENU_DEADLINE),
        ("menu_tone", MENU_TONE),
        ("menu_timezone", MENU_TIMEZONE),
    ]
    .into_iter()
    .map(|(label, key)| QuickAction::new(t(label, tone), key))
    .collect()
}

/// One quick action per tone.
pub(crate) fn tone_actions() -> Vec<QuickAction> {
    Tone::ALL
        .iter()
        .map(|tone| QuickAction::new(tone.as_str(), format!("{TONE_KEY_PREFIX}{tone}")))
        .collect()
}

/// Parse `HH:MM` or `<day> HH:MM`. The day is `None` when omitted.
pub(crate) fn parse_weekly(input: &str) -> Option<(Option<Weekday>, ClockTime)> {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    match tokens.as_slice() {
        [time] => Some((None, time.parse().ok()?)),
        [day, time] => Some((Some(day.parse().ok()?), time.parse().ok()?)),
        _ => None,
    }
}

/// Apply `update` to the profile's settings, then close any open sub-dialog.
/// Returns the settings as they stand afterwards.
pub(crate) async fn apply_setting(
    store: &Store,
    identity: &str,
    handle: &ProfileHandle,
    update: impl FnOnce(&mut Settings),
) -> Settings {
    let settings = {
        let mut profile = handle.lock().await;
        update(&mut profile.settings);
        profile.settings.clone()
    };
    store.clear_state(identity).await;
    settings
}

/// Confirmation for a timezone change, warning when the zone is unknown.
pub(crate) fn timezone_confirmation(tone: Tone, zone: &str) -> String {
    let confirmed = tone::setting_updated(tone, "label_timezone", zone);
    match parse_tz(zone) {
        Ok(_) => confirmed,
        Err(_) => format!("{confirmed}\n{}", t("tz_unknown_warning", tone)),
    }
}

/// The plain `HH:MM` settings, keyed by the state that edits them.
fn time_field(settings: &mut Settings, state: ConversationState) -> Option<&mut ClockTime> {
    match state {
        ConversationState::AwaitingMorningTime => Some(&mut settings.morning_time),
        ConversationState::AwaitingEveningTime => Some(&mut settings.evening_time),
        ConversationState::AwaitingDeadlineTime => Some(&mut settings.deadline_time),
        _ => None,
    }
}

fn time_label(state: ConversationState) -> Option<&'static str> {
    match state {
        ConversationState::AwaitingMorningTime => Some("label_morning"),
        ConversationState::AwaitingEveningTime => Some("label_evening"),
        ConversationState::AwaitingDeadlineTime => Some("label_deadline"),
        _ => None,
    }
}

async fn tone_of(handle: &ProfileHandle) -> Tone {
    handle.lock().await.settings.tone
}

async fn reset(store: &Store, identity: &str, tone: Tone) -> OutgoingMessage {
    store.clear_state(identity).await;
    OutgoingMessage::text(t("reset_notice", tone))
}

/// Handle a quick-action selection.
pub async fn handle_menu(store: &Store, identity: &str, key: &str) -> OutgoingMessage {
    let handle = store.get_or_create(identity).await;
    let tone = tone_of(&handle).await;

    if let Some(value) = key.strip_prefix(TONE_KEY_PREFIX) {
        return match value.parse::<Tone>() {
            Ok(new_tone) => {
                apply_setting(store, identity, &handle, |s| s.tone = new_tone).await;
                OutgoingMessage::text(tone::tone_set(new_tone))
            }
            Err(_) => reset(store, identity, tone).await,
        };
    }

    let (state, prompt) = match key {
        MENU_MORNING => (ConversationState::AwaitingMorningTime, "ask_morning_time"),
        MENU_EVENING => (ConversationState::AwaitingEveningTime, "ask_evening_time"),
        MENU_WEEKLY => (ConversationState::AwaitingWeeklyTime, "ask_weekly_time"),
        MENU_DEADLINE => (ConversationState::AwaitingDeadlineTime, "ask_deadline_time"),
        MENU_TONE => (ConversationState::AwaitingTone, "ask_tone"),
        MENU_TIMEZONE => (ConversationState::AwaitingTimezone, "ask_timezone"),
        _ => {
            debug!("unknown menu key '{key}' from {identity}");
            return reset(store, identity, tone).await;
        }
    };

    store.set_state(identity, state).await;
    if state == ConversationState::AwaitingTone {
        OutgoingMessage::with_actions(t(prompt, tone), tone_actions())
    } else {
        OutgoingMessage::text(t(prompt, tone))
    }
}

/// Resolve text sent while a sub-dialog is open.
pub async fn resolve(
    store: &Store,
    identity: &str,
    state: ConversationState,
    text: &str,
) -> OutgoingMessage {
    let Some(handle) = store.get(identity).await else {
        return reset(store, identity, Tone::default()).await;
    };
    let tone = tone_of(&handle).await;
    let input = text.trim();

    if let Some(label) = time_label(state) {
        return match input.parse::<ClockTime>() {
            Ok(time) => {
                apply_setting(store, identity, &handle, |s| {
                    if let Some(field) = time_field(s, state) {
                        *field = time;
                    }
                })
                .await;
                OutgoingMessage::text(tone::setting_updated(tone, label, &time.to_string()))
            }
            Err(_) => OutgoingMessage::text(t("retry_time", tone)),
        };
    }

    match state {
        ConversationState::AwaitingWeeklyTime => match parse_weekly(input) {
            Some((day, time)) => {
                let settings = apply_setting(store, identity, &handle, |s| {
                    if let Some(day) = day {
                        s.weekly_review_day = day;
                    }
                    s.weekly_review_time = time;
                })
                .await;
                let value = format!(
                    "{} {}",
                    settings.weekly_review_day, settings.weekly_review_time
                );
                OutgoingMessage::text(tone::setting_updated(tone, "label_weekly", &value))
            }
            None => OutgoingMessage::text(t("retry_weekly", tone)),
        },
        ConversationState::AwaitingTone => match input.parse::<Tone>() {
            Ok(new_tone) => {
                apply_setting(store, identity, &handle, |s| s.tone = new_tone).await;
                OutgoingMessage::text(tone::tone_set(new_tone))
            }
            Err(_) => OutgoingMessage::with_actions(t("retry_tone", tone), tone_actions()),
        },
        ConversationState::AwaitingTimezone if input.is_empty() => {
            OutgoingMessage::text(t("retry_timezone", tone))
        }
        ConversationState::AwaitingTimezone => {
            apply_setting(store, identity, &handle, |s| s.timezone = input.to_string()).await;
            OutgoingMessage::text(timezone_confirmation(tone, input))
        }
        _ => reset(store, identity, tone).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_with(identity: &str, state: ConversationState) -> Store {
        let store = Store::default();
        store.get_or_create(identity).await;
        store.set_state(identity, state).await;
        store
    }

    async fn settings(store: &Store, identity: &str) -> Settings {
        store
            .get(identity)
            .await
            .unwrap()
            .lock()
            .await
            .settings
            .clone()
    }

    #[test]
    fn test_parse_weekly_forms() {
        let (day, time) = parse_weekly("19:00").unwrap();
        assert_eq!(day, None);
        assert_eq!(time.to_string(), "19:00");

        let (day, time) = parse_weekly("fri 08:15").unwrap();
        assert_eq!(day, Some(Weekday::Fri));
        assert_eq!(time.to_string(), "08:15");

        assert!(parse_weekly("Funday 08:15").is_none());
        assert!(parse_weekly("Fri 8:15").is_none());
        assert!(parse_weekly("").is_none());
        assert!(parse_weekly("Fri 08:15 extra").is_none());
    }

    #[tokio::test]
    async fn test_valid_time_applies_and_clears() {
        let store = store_with("u", ConversationState::AwaitingMorningTime).await;
        let reply = resolve(&store, "u", ConversationState::AwaitingMorningTime, " 06:05 ").await;
        assert!(reply.text.contains("06:05"));
        assert_eq!(settings(&store, "u").await.morning_time.to_string(), "06:05");
        assert_eq!(store.state("u").await, ConversationState::Normal);
    }

    #[tokio::test]
    async fn test_invalid_time_keeps_state() {
        for bad in ["24:00", "7:30", "12:60", "noon"] {
            let store = store_with("u", ConversationState::AwaitingDeadlineTime).await;
            let reply = resolve(&store, "u", ConversationState::AwaitingDeadlineTime, bad).await;
            assert_eq!(reply.text, t("retry_time", Tone::Mild));
            assert_eq!(
                store.state("u").await,
                ConversationState::AwaitingDeadlineTime
            );
            assert_eq!(settings(&store, "u").await, Settings::default());
        }
    }

    #[tokio::test]
    async fn test_weekly_time_only_keeps_day() {
        let store = store_with("u", ConversationState::AwaitingWeeklyTime).await;
        resolve(&store, "u", ConversationState::AwaitingWeeklyTime, "20:00").await;
        let s = settings(&store, "u").await;
        assert_eq!(s.weekly_review_day, Weekday::Sun);
        assert_eq!(s.weekly_review_time.to_string(), "20:00");
    }

    #[tokio::test]
    async fn test_weekly_with_day() {
        let store = store_with("u", ConversationState::AwaitingWeeklyTime).await;
        let reply = resolve(&store, "u", ConversationState::AwaitingWeeklyTime, "Sat 09:00").await;
        assert!(reply.text.contains("Sat 09:00"));
        assert_eq!(settings(&store, "u").await.weekly_review_day, Weekday::Sat);
        assert_eq!(store.state("u").await, ConversationState::Normal);
    }

    #[tokio::test]
    async fn test_tone_dialog() {
        let store = store_with("u", ConversationState::AwaitingTone).await;
        let reply = resolve(&store, "u", ConversationState::AwaitingTone, "loud").await;
        assert_eq!(reply.quick_actions, tone_actions());
        assert_eq!(store.state("u").await, ConversationState::AwaitingTone);

        let reply = resolve(&store, "u", ConversationState::AwaitingTone, "DOS").await;
        assert_eq!(reply.text, tone::tone_set(Tone::Dos));
        assert_eq!(settings(&store, "u").await.tone, Tone::Dos);
        assert_eq!(store.state("u").await, ConversationState::Normal);
    }

    #[tokio::test]
    async fn test_timezone_free_text() {
        let store = store_with("u", ConversationState::AwaitingTimezone).await;
        let reply = resolve(&store, "u", ConversationState::AwaitingTimezone, "  ").await;
        assert_eq!(reply.text, t("retry_timezone", Tone::Mild));

        let reply = resolve(&store, "u", ConversationState::AwaitingTimezone, "Moon/Base").await;
        assert!(reply.text.contains(t("tz_unknown_warning", Tone::Mild)));
        assert_eq!(settings(&store, "u").await.timezone, "Moon/Base");
        assert_eq!(store.state("u").await, ConversationState::Normal);

        store.set_state("u", ConversationState::AwaitingTimezone).await;
        let reply =
            resolve(&store, "u", ConversationState::AwaitingTimezone, "Europe/Paris").await;
        assert!(!reply.text.contains(t("tz_unknown_warning", Tone::Mild)));
    }

    #[tokio::test]
    async fn test_normal_state_resets() {
        let store = store_with("u", ConversationState::Normal).await;
        let reply = resolve(&store, "u", ConversationState::Normal, "hello").await;
        assert_eq!(reply.text, t("reset_notice", Tone::Mild));
    }

    #[tokio::test]
    async fn test_menu_opens_state() {
        let store = Store::default();
        let reply = handle_menu(&store, "u", MENU_EVENING).await;
        assert_eq!(reply.text, t("ask_evening_time", Tone::Mild));
        assert_eq!(store.state("u").await, ConversationState::AwaitingEveningTime);

        let reply = handle_menu(&store, "u", MENU_TONE).await;
        assert_eq!(reply.quick_actions.len(), 3);
        assert_eq!(store.state("u").await, ConversationState::AwaitingTone);
    }

    #[tokio::test]
    async fn test_menu_tone_key_sets_directly() {
        let store = store_with("u", ConversationState::AwaitingTone).await;
        handle_menu(&store, "u", "tone:sharp").await;
        assert_eq!(settings(&store, "u").await.tone, Tone::Sharp);
        assert_eq!(store.state("u").await, ConversationState::Normal);
    }

    #[tokio::test]
    async fn test_menu_unknown_key_resets() {
        let store = store_with("u", ConversationState::AwaitingTone).await;
        let reply = handle_menu(&store, "u", "settings:volume").await;
        assert_eq!(reply.text, t("reset_notice", Tone::Mild));
        assert_eq!(store.state("u").await, ConversationState::Normal);

        let reply = handle_menu(&store, "u", "tone:loud").await;
        assert_eq!(reply.text, t("reset_notice", Tone::Mild));
    }

    #[test]
    fn test_settings_actions_keys() {
        let keys: Vec<String> = settings_actions(Tone::Mild)
            .into_iter()
            .map(|a| a.key)
            .collect();
        assert_eq!(
            keys,
            vec![
                MENU_MORNING,
                MENU_EVENING,
                MENU_WEEKLY,
                MENU_DEADLINE,
                MENU_TONE,
                MENU_TIMEZONE
            ]
        );
    }
}
