use serde::{Deserialize, Serialize};

/// Opaque routing token for answering a specific inbound event
/// (e.g. a Telegram chat id). The core never inspects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyHandle(pub String);

impl ReplyHandle {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A discrete event delivered by a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InboundEvent {
    /// Plain text typed by the user.
    Text {
        identity: String,
        text: String,
        reply: ReplyHandle,
    },
    /// The user subscribed (added the bot, pressed start).
    Follow { identity: String, reply: ReplyHandle },
    /// The user unsubscribed or blocked the bot.
    Unfollow { identity: String },
    /// The user picked one of the quick actions from a menu.
    MenuSelection {
        identity: String,
        key: String,
        reply: ReplyHandle,
    },
}

impl InboundEvent {
    pub fn identity(&self) -> &str {
        match self {
            Self::Text { identity, .. }
            | Self::Follow { identity, .. }
            | Self::Unfollow { identity }
            | Self::MenuSelection { identity, .. } => identity,
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Follow { .. } => "follow",
            Self::Unfollow { .. } => "unfollow",
            Self::MenuSelection { .. } => "menu",
        }
    }
}

/// A selectable option attached to an outgoing message.
/// Selecting it comes back as [`InboundEvent::MenuSelection`] carrying `key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickAction {
    pub label: String,
    pub key: String,
}

impl QuickAction {
    pub fn new(label: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            key: key.into(),
        }
    }
}

/// An outgoing message to send through a channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub text: String,
    /// Empty for plain text.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quick_actions: Vec<QuickAction>,
    #[serde(default)]
    pub metadata: MessageMetadata,
}

impl OutgoingMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_actions(text: impl Into<String>, quick_actions: Vec<QuickAction>) -> Self {
        Self {
            text: text.into(),
            quick_actions,
            ..Default::default()
        }
    }
}

/// Metadata about how a message was generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MessageMetadata {
    /// Which provider produced this response, empty for built-in replies.
    pub provider_used: String,
    /// Token count (if available from the provider).
    pub tokens_used: Option<u64>,
    /// Wall-clock processing time in milliseconds.
    pub processing_time_ms: u64,
    /// Model identifier (if applicable).
    pub model: Option<String>,
}
