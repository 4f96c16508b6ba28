//! Telegram Bot API deserialization types.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct TgResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TgUpdate {
    pub update_id: i64,
    pub message: Option<TgMessage>,
    pub callback_query: Option<TgCallbackQuery>,
    pub my_chat_member: Option<TgChatMemberUpdated>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub(crate) struct TgMessage {
    pub message_id: i64,
    pub from: Option<TgUser>,
    pub chat: TgChat,
    pub text: Option<String>,
}

/// A press on an inline keyboard button.
#[derive(Debug, Deserialize)]
pub(crate) struct TgCallbackQuery {
    pub id: String,
    pub from: TgUser,
    pub message: Option<TgMessage>,
    pub data: Option<String>,
}

/// The bot's membership in a chat changed (e.g. the user blocked it).
#[derive(Debug, Deserialize)]
pub(crate) struct TgChatMemberUpdated {
    pub chat: TgChat,
    pub from: TgUser,
    pub new_chat_member: TgChatMember,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TgChatMember {
    /// "member", "kicked", "left", ...
    pub status: String,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub(crate) struct TgUser {
    pub id: i64,
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TgChat {
    pub id: i64,
    /// Chat type: "private", "group", "supergroup", or "channel".
    #[serde(default, rename = "type")]
    pub chat_type: String,
}
