//! Message sending: text with optional inline keyboard, and command registration.

use super::TelegramChannel;
use crate::utils::split_message;
use pledge_core::{error::PledgeError, message::QuickAction};
use tracing::{info, warn};

/// Buttons per keyboard row.
const BUTTONS_PER_ROW: usize = 2;

/// Build an `inline_keyboard` reply markup from quick actions.
pub(crate) fn inline_keyboard(actions: &[QuickAction]) -> serde_json::Value {
    let rows: Vec<Vec<serde_json::Value>> = actions
        .chunks(BUTTONS_PER_ROW)
        .map(|row| {
            row.iter()
                .map(|a| serde_json::json!({ "text": a.label, "callback_data": a.key }))
                .collect()
        })
        .collect();
    serde_json::json!({ "inline_keyboard": rows })
}

impl TelegramChannel {
    /// Send a text message to a specific chat. The keyboard, if any, rides
    /// on the last chunk.
    pub(crate) async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        actions: &[QuickAction],
    ) -> Result<(), PledgeError> {
        let chunks = split_message(text, 4096);
        let last = chunks.len().saturating_sub(1);

        for (i, chunk) in chunks.into_iter().enumerate() {
            let url = format!("{}/sendMessage", self.base_url);
            let mut body = serde_json::json!({
                "chat_id": chat_id,
                "text": chunk,
            });
            if i == last && !actions.is_empty() {
                body["reply_markup"] = inline_keyboard(actions);
            }

            let resp = self
                .client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| PledgeError::Channel(format!("telegram send failed: {e}")))?;

            let status = resp.status();
            if !status.is_success() {
                let error_text = resp.text().await.unwrap_or_default();
                return Err(PledgeError::Channel(format!(
                    "telegram send failed ({status}): {error_text}"
                )));
            }
        }

        Ok(())
    }

    /// Register bot commands with Telegram so users see an autocomplete menu.
    /// Best-effort: logs failures but does not propagate errors.
    pub(crate) async fn register_commands(&self) {
        let commands = serde_json::json!({
            "commands": [
                { "command": "help", "description": "Show available commands" },
                { "command": "today", "description": "Today's tasks and this week's tally" },
                { "command": "settings", "description": "Change reminder times, tone, timezone" },
                { "command": "tone", "description": "Set reply tone: mild, sharp, dos" },
                { "command": "time", "description": "Set am/pm/weekly reminder times" },
                { "command": "deadline", "description": "Set the daily report deadline" },
                { "command": "tz", "description": "Set your timezone" },
            ]
        });

        let url = format!("{}/setMyCommands", self.base_url);
        match self.client.post(&url).json(&commands).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("telegram: registered bot commands");
            }
            Ok(resp) => {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                warn!("telegram: setMyCommands failed ({status}): {body}");
            }
            Err(e) => {
                warn!("telegram: setMyCommands request failed: {e}");
            }
        }
    }
}
