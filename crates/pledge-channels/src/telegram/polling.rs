//! Long-polling update loop and Channel trait implementation.

use super::types::{TgResponse, TgUpdate};
use super::TelegramChannel;
use async_trait::async_trait;
use pledge_core::{
    error::PledgeError,
    message::{InboundEvent, OutgoingMessage, ReplyHandle},
    traits::Channel,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn start(&self) -> Result<mpsc::Receiver<InboundEvent>, PledgeError> {
        self.register_commands().await;

        let (tx, rx) = mpsc::channel(64);
        let client = self.client.clone();
        let base_url = self.base_url.clone();
        let allowed_users = self.config.allowed_users.clone();
        let last_update_id = self.last_update_id.clone();

        info!("Telegram channel starting long polling...");

        tokio::spawn(async move {
            let mut backoff_secs: u64 = 1;

            loop {
                let last = last_update_id.lock().await;
                let offset = last.map(|id| id + 1);
                drop(last);

                let mut url = format!("{base_url}/getUpdates?timeout=30");
                if let Some(off) = offset {
                    url.push_str(&format!("&offset={off}"));
                }

                let resp = match client
                    .get(&url)
                    .timeout(std::time::Duration::from_secs(35))
                    .send()
                    .await
                {
                    Ok(r) => r,
                    Err(e) => {
                        error!("telegram poll error (retry in {backoff_secs}s): {e}");
                        tokio::time::sleep(std::time::Duration::from_secs(backoff_secs)).await;
                        backoff_secs = (backoff_secs * 2).min(60);
                        continue;
                    }
                };

                let body: TgResponse<Vec<TgUpdate>> = match resp.json().await {
                    Ok(b) => b,
                    Err(e) => {
                        error!("telegram parse error (retry in {backoff_secs}s): {e}");
                        tokio::time::sleep(std::time::Duration::from_secs(backoff_secs)).await;
                        backoff_secs = (backoff_secs * 2).min(60);
                        continue;
                    }
                };

                if !body.ok {
                    error!(
                        "telegram API error (retry in {backoff_secs}s): {}",
                        body.description.unwrap_or_default()
                    );
                    tokio::time::sleep(std::time::Duration::from_secs(backoff_secs)).await;
                    backoff_secs = (backoff_secs * 2).min(60);
                    continue;
                }

                // Successful poll -- reset backoff.
                backoff_secs = 1;

                let updates = body.result.unwrap_or_default();

                if let Some(last_update) = updates.last() {
                    *last_update_id.lock().await = Some(last_update.update_id);
                }

                for update in updates {
                    // Stop the client-side spinner on the pressed button.
                    if let Some(ref cq) = update.callback_query {
                        answer_callback(&client, &base_url, &cq.id).await;
                    }

                    let Some(event) = map_update(update, &allowed_users) else {
                        continue;
                    };

                    debug!(
                        "telegram: {} event from {}",
                        event.kind(),
                        event.identity()
                    );
                    if tx.send(event).await.is_err() {
                        info!("telegram channel receiver dropped, stopping poll");
                        return;
                    }
                }
            }
        });

        Ok(rx)
    }

    async fn send(&self, identity: &str, message: OutgoingMessage) -> Result<(), PledgeError> {
        // Private chats share the user's id.
        let chat_id = parse_chat_id(identity)?;
        self.send_text(chat_id, &message.text, &message.quick_actions)
            .await
    }

    async fn reply(
        &self,
        handle: &ReplyHandle,
        message: OutgoingMessage,
    ) -> Result<(), PledgeError> {
        let chat_id = parse_chat_id(handle.as_str())?;
        self.send_text(chat_id, &message.text, &message.quick_actions)
            .await
    }

    async fn stop(&self) -> Result<(), PledgeError> {
        info!("Telegram channel stopped");
        Ok(())
    }
}

fn parse_chat_id(raw: &str) -> Result<i64, PledgeError> {
    raw.parse()
        .map_err(|e| PledgeError::Channel(format!("invalid telegram chat_id '{raw}': {e}")))
}

/// Translate one Telegram update into an inbound event.
///
/// Returns `None` for updates the bot ignores: group chats, unauthorized
/// users, non-text messages, and membership changes other than leaving.
pub(crate) fn map_update(update: TgUpdate, allowed_users: &[i64]) -> Option<InboundEvent> {
    let allowed = |user_id: i64| allowed_users.is_empty() || allowed_users.contains(&user_id);

    if let Some(cq) = update.callback_query {
        if !allowed(cq.from.id) {
            warn!("ignoring callback from unauthorized user {}", cq.from.id);
            return None;
        }
        let chat_id = cq.message.as_ref().map_or(cq.from.id, |m| m.chat.id);
        return Some(InboundEvent::MenuSelection {
            identity: cq.from.id.to_string(),
            key: cq.data?,
            reply: ReplyHandle::new(chat_id.to_string()),
        });
    }

    if let Some(member) = update.my_chat_member {
        if member.chat.chat_type != "private" {
            return None;
        }
        return match member.new_chat_member.status.as_str() {
            "kicked" | "left" => Some(InboundEvent::Unfollow {
                identity: member.from.id.to_string(),
            }),
            _ => None,
        };
    }

    let msg = update.message?;
    let user = msg.from?;

    if !allowed(user.id) {
        warn!("ignoring message from unauthorized user {}", user.id);
        return None;
    }

    // Accountability is person-to-person; groups are ignored.
    if matches!(msg.chat.chat_type.as_str(), "group" | "supergroup" | "channel") {
        debug!("telegram: ignoring group message from chat {}", msg.chat.id);
        return None;
    }

    let text = msg.text?;
    let identity = user.id.to_string();
    let reply = ReplyHandle::new(msg.chat.id.to_string());

    let first = text.split_whitespace().next().unwrap_or_default();
    let command = first.split('@').next().unwrap_or(first);
    if command == "/start" {
        return Some(InboundEvent::Follow { identity, reply });
    }

    Some(InboundEvent::Text {
        identity,
        text,
        reply,
    })
}

/// Acknowledge a callback query. Best-effort.
async fn answer_callback(client: &reqwest::Client, base_url: &str, callback_id: &str) {
    let body = serde_json::json!({ "callback_query_id": callback_id });
    match client
        .post(format!("{base_url}/answerCallbackQuery"))
        .json(&body)
        .send()
        .await
    {
        Ok(resp) if !resp.status().is_success() => {
            warn!("telegram answerCallbackQuery failed: {}", resp.status());
        }
        Ok(_) => {}
        Err(e) => warn!("telegram answerCallbackQuery failed: {e}"),
    }
}
