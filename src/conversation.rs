//! Conversation state machine: decides how one inbound event is interpreted.
//!
//! Text resolution order, first match wins:
//! 1. an open settings sub-dialog (slash commands still go to dispatch)
//! 2. morning-commit marker
//! 3. evening-report marker
//! 4. slash command
//! 5. the weekly review trigger
//! 6. the default responder

use crate::commands::{self, Command, CommandContext};
use crate::cycle::{self, parse, CommitRejection};
use crate::dialog;
use crate::tone::{self, t};
use chrono::{DateTime, Utc};
use pledge_core::{
    context::Context,
    message::{InboundEvent, OutgoingMessage, ReplyHandle},
    profile::ConversationState,
    traits::Provider,
};
use pledge_memory::{ProfileHandle, Store};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The core's entry point for inbound events.
pub struct Conversation {
    store: Store,
    provider: Option<Arc<dyn Provider>>,
}

impl Conversation {
    /// `provider` answers free text; `None` uses the canned fallback.
    pub fn new(store: Store, provider: Option<Arc<dyn Provider>>) -> Self {
        Self { store, provider }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Handle one event. Returns the reply and where to send it, or `None`
    /// when the event expects no answer (unfollow).
    pub async fn handle_event(
        &self,
        event: InboundEvent,
        now: DateTime<Utc>,
    ) -> Option<(ReplyHandle, OutgoingMessage)> {
        match event {
            InboundEvent::Text {
                identity,
                text,
                reply,
            } => Some((reply, self.handle_text(&identity, &text, now).await)),
            InboundEvent::Follow { identity, reply } => {
                info!("follow from {identity}");
                let handle = self.store.get_or_create(&identity).await;
                let tone = handle.lock().await.settings.tone;
                let text = format!("{}\n\n{}", t("welcome", tone), tone::help(tone));
                Some((reply, OutgoingMessage::text(text)))
            }
            InboundEvent::Unfollow { identity } => {
                info!("unfollow from {identity}");
                self.store.remove(&identity).await;
                self.store.clear_state(&identity).await;
                None
            }
            InboundEvent::MenuSelection {
                identity,
                key,
                reply,
            } => Some((reply, dialog::handle_menu(&self.store, &identity, &key).await)),
        }
    }

    /// Interpret one text message. Always produces a reply.
    pub async fn handle_text(&self, identity: &str, text: &str, now: DateTime<Utc>) -> OutgoingMessage {
        let is_command = text.trim_start().starts_with('/');

        let state = self.store.state(identity).await;
        if state != ConversationState::Normal && !is_command {
            debug!("{identity}: resolving {state:?}");
            return dialog::resolve(&self.store, identity, state, text).await;
        }

        let handle = self.store.get_or_create(identity).await;

        if let Some((marker, body)) = parse::strip_marker(text) {
            return match marker {
                parse::Marker::Commit => commit(&handle, body, now).await,
                parse::Marker::Report => report(&handle, body, now).await,
            };
        }

        if is_command {
            return self.dispatch_command(identity, text, &handle).await;
        }

        if parse::is_weekly_trigger(text) {
            let mut profile = handle.lock().await;
            let weekly = cycle::weekly_aggregate(&mut profile);
            info!("{identity}: on-demand weekly review ({}%)", weekly.completion_rate);
            return OutgoingMessage::text(tone::weekly_report(
                profile.settings.tone,
                weekly.completion_rate,
                weekly.alignment,
            ));
        }

        self.respond(&handle, text).await
    }

    async fn dispatch_command(
        &self,
        identity: &str,
        text: &str,
        handle: &ProfileHandle,
    ) -> OutgoingMessage {
        match Command::parse(text) {
            Some(cmd) => {
                let ctx = CommandContext {
                    store: &self.store,
                    identity,
                    text,
                };
                commands::handle(cmd, &ctx).await
            }
            None => {
                debug!("{identity}: unknown command {text:?}");
                self.store.clear_state(identity).await;
                let tone = handle.lock().await.settings.tone;
                OutgoingMessage::text(t("unknown_command", tone))
            }
        }
    }

    /// Default responder: the provider when configured, canned text otherwise.
    async fn respond(&self, handle: &ProfileHandle, text: &str) -> OutgoingMessage {
        let (tone, snapshot) = {
            let profile = handle.lock().await;
            (profile.settings.tone, profile.snapshot())
        };

        let Some(provider) = &self.provider else {
            return OutgoingMessage::text(t("fallback", tone));
        };

        let context = Context::new(text, t("system_prompt", tone), snapshot);
        match provider.complete(&context).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("{} responder failed: {e}", provider.name());
                OutgoingMessage::text(t("fallback", tone))
            }
        }
    }
}

async fn commit(handle: &ProfileHandle, body: &str, now: DateTime<Utc>) -> OutgoingMessage {
    let mut profile = handle.lock().await;
    let tone = profile.settings.tone;
    let text = match cycle::commit(&mut profile, body, now) {
        Ok(tasks) => tone::commit_confirmed(tone, tasks),
        Err(CommitRejection::Empty) => t("commit_empty", tone).to_string(),
        Err(CommitRejection::TooMany(n)) => {
            debug!("rejected commit of {n} tasks");
            t("commit_too_many", tone).to_string()
        }
    };
    OutgoingMessage::text(text)
}

async fn report(handle: &ProfileHandle, body: &str, now: DateTime<Utc>) -> OutgoingMessage {
    let mut profile = handle.lock().await;
    let tone = profile.settings.tone;
    let text = match cycle::report(&mut profile, body, now) {
        Ok(summary) => tone::report_summary(tone, summary.done, summary.missed, summary.total),
        Err(cycle::NoCommit) => t("commit_first", tone).to_string(),
    };
    OutgoingMessage::text(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use pledge_core::error::PledgeError;
    use pledge_core::profile::{TaskStatus, Tone};
    use std::sync::Mutex;

    /// Provider that echoes what it was given, or fails on demand.
    struct EchoProvider {
        fail: bool,
        seen: Mutex<Vec<Context>>,
    }

    impl EchoProvider {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                fail,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Provider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        fn requires_api_key(&self) -> bool {
            false
        }

        async fn complete(&self, context: &Context) -> Result<OutgoingMessage, PledgeError> {
            self.seen.lock().unwrap().push(context.clone());
            if self.fail {
                return Err(PledgeError::Provider("boom".into()));
            }
            Ok(OutgoingMessage::text(format!(
                "echo: {}",
                context.current_message
            )))
        }

        async fn is_available(&self) -> bool {
            true
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap()
    }

    fn reply(text: &str) -> ReplyHandle {
        ReplyHandle::new(text)
    }

    async fn tasks(conv: &Conversation, id: &str) -> Vec<TaskStatus> {
        let handle = conv.store().get(id).await.unwrap();
        let profile = handle.lock().await;
        profile.current_tasks.iter().map(|t| t.status).collect()
    }

    #[tokio::test]
    async fn test_commit_then_report_flow() {
        let conv = Conversation::new(Store::default(), None);
        let out = conv.handle_text("u", "am: write, gym, read", now()).await;
        assert!(out.text.contains("A. write"));

        let out = conv
            .handle_text("u", "pm: A=done, B=miss(overslept), C=done", now())
            .await;
        assert!(out.text.starts_with("2/3 done, 1 missed."));
        assert_eq!(
            tasks(&conv, "u").await,
            vec![TaskStatus::Done, TaskStatus::Miss, TaskStatus::Done]
        );
    }

    #[tokio::test]
    async fn test_report_before_commit_gives_guidance() {
        let conv = Conversation::new(Store::default(), None);
        let out = conv.handle_text("u", "evening: A=done", now()).await;
        assert_eq!(out.text, t("commit_first", Tone::Mild));
        let handle = conv.store().get("u").await.unwrap();
        assert_eq!(handle.lock().await.weekly_stats.total_tasks, 0);
    }

    #[tokio::test]
    async fn test_commit_rejections() {
        let conv = Conversation::new(Store::default(), None);
        let out = conv.handle_text("u", "am: a, b, c, d", now()).await;
        assert_eq!(out.text, t("commit_too_many", Tone::Mild));
        let out = conv.handle_text("u", "am:", now()).await;
        assert_eq!(out.text, t("commit_empty", Tone::Mild));
        assert!(tasks(&conv, "u").await.is_empty());
    }

    #[tokio::test]
    async fn test_open_dialog_takes_precedence_over_markers() {
        let conv = Conversation::new(Store::default(), None);
        conv.store().get_or_create("u").await;
        conv.store()
            .set_state("u", ConversationState::AwaitingMorningTime)
            .await;

        let out = conv.handle_text("u", "am: a, b", now()).await;
        assert_eq!(out.text, t("retry_time", Tone::Mild));
        assert!(tasks(&conv, "u").await.is_empty());

        conv.handle_text("u", "06:00", now()).await;
        assert_eq!(
            conv.store().state("u").await,
            ConversationState::Normal
        );
    }

    #[tokio::test]
    async fn test_command_escapes_open_dialog() {
        let conv = Conversation::new(Store::default(), None);
        conv.store().get_or_create("u").await;
        conv.store()
            .set_state("u", ConversationState::AwaitingTimezone)
            .await;

        conv.handle_text("u", "/tone sharp", now()).await;
        let handle = conv.store().get("u").await.unwrap();
        assert_eq!(handle.lock().await.settings.tone, Tone::Sharp);
        assert_eq!(handle.lock().await.settings.timezone, "Asia/Tokyo");
        assert_eq!(conv.store().state("u").await, ConversationState::Normal);
    }

    #[tokio::test]
    async fn test_help_during_timezone_dialog_is_not_stored() {
        let conv = Conversation::new(Store::default(), None);
        conv.store().get_or_create("u").await;
        conv.store()
            .set_state("u", ConversationState::AwaitingTimezone)
            .await;

        let out = conv.handle_text("u", "/help", now()).await;
        assert_eq!(out.text, tone::help(Tone::Mild));
        assert_eq!(conv.store().state("u").await, ConversationState::Normal);

        // The dialog is closed, so a zone typed afterwards is plain text.
        let out = conv.handle_text("u", "Europe/Paris", now()).await;
        assert_eq!(out.text, t("fallback", Tone::Mild));
        let handle = conv.store().get("u").await.unwrap();
        assert_eq!(handle.lock().await.settings.timezone, "Asia/Tokyo");
    }

    #[tokio::test]
    async fn test_unknown_command_clears_state() {
        let conv = Conversation::new(Store::default(), None);
        conv.store().set_state("u", ConversationState::AwaitingTone).await;
        let out = conv.handle_text("u", "/dance", now()).await;
        assert_eq!(out.text, t("unknown_command", Tone::Mild));
        assert_eq!(conv.store().state("u").await, ConversationState::Normal);
    }

    #[tokio::test]
    async fn test_weekly_trigger_runs_aggregate() {
        let conv = Conversation::new(Store::default(), None);
        conv.handle_text("u", "am: a, b", now()).await;
        conv.handle_text("u", "pm: A=done, B=done", now()).await;

        let out = conv.handle_text("u", "Weekly Review", now()).await;
        assert!(out.text.contains("100%"));
        let out = conv.handle_text("u", "weekly review", now()).await;
        assert!(out.text.contains(" 0%"));
        assert!(tasks(&conv, "u").await.is_empty());
    }

    #[tokio::test]
    async fn test_free_text_without_provider_uses_fallback() {
        let conv = Conversation::new(Store::default(), None);
        let out = conv.handle_text("u", "how's it going", now()).await;
        assert_eq!(out.text, t("fallback", Tone::Mild));
    }

    #[tokio::test]
    async fn test_free_text_goes_to_provider_with_snapshot() {
        let provider = EchoProvider::new(false);
        let conv = Conversation::new(Store::default(), Some(provider.clone()));
        conv.handle_text("u", "/tone sharp", now()).await;
        conv.handle_text("u", "am: ship it", now()).await;

        let out = conv.handle_text("u", "am I on track?", now()).await;
        assert_eq!(out.text, "echo: am I on track?");

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].system_prompt, t("system_prompt", Tone::Sharp));
        assert_eq!(seen[0].profile.current_tasks[0].description, "ship it");
        assert!(seen[0].profile.last_morning_commit_at.is_some());
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back() {
        let conv = Conversation::new(Store::default(), Some(EchoProvider::new(true)));
        let out = conv.handle_text("u", "hello", now()).await;
        assert_eq!(out.text, t("fallback", Tone::Mild));
    }

    #[tokio::test]
    async fn test_follow_and_unfollow() {
        let conv = Conversation::new(Store::default(), None);
        let (handle, out) = conv
            .handle_event(
                InboundEvent::Follow {
                    identity: "u".into(),
                    reply: reply("chat-1"),
                },
                now(),
            )
            .await
            .unwrap();
        assert_eq!(handle, reply("chat-1"));
        assert!(out.text.starts_with(t("welcome", Tone::Mild)));
        assert!(out.text.contains("/settings"));
        assert!(conv.store().get("u").await.is_some());

        conv.store().set_state("u", ConversationState::AwaitingTone).await;
        let none = conv
            .handle_event(
                InboundEvent::Unfollow {
                    identity: "u".into(),
                },
                now(),
            )
            .await;
        assert!(none.is_none());
        assert!(conv.store().get("u").await.is_none());
        assert_eq!(conv.store().state("u").await, ConversationState::Normal);
    }

    #[tokio::test]
    async fn test_menu_selection_event() {
        let conv = Conversation::new(Store::default(), None);
        let (_, out) = conv
            .handle_event(
                InboundEvent::MenuSelection {
                    identity: "u".into(),
                    key: crate::dialog::MENU_DEADLINE.into(),
                    reply: reply("u"),
                },
                now(),
            )
            .await
            .unwrap();
        assert_eq!(out.text, t("ask_deadline_time", Tone::Mild));
        assert_eq!(
            conv.store().state("u").await,
            ConversationState::AwaitingDeadlineTime
        );
    }

    #[tokio::test]
    async fn test_text_event_routes_reply_handle() {
        let conv = Conversation::new(Store::default(), None);
        let (handle, _) = conv
            .handle_event(
                InboundEvent::Text {
                    identity: "u".into(),
                    text: "/help".into(),
                    reply: reply("chat-9"),
                },
                now(),
            )
            .await
            .unwrap();
        assert_eq!(handle, reply("chat-9"));
    }
}
