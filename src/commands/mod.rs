//! Built-in slash commands: instant responses, no provider call.

mod settings;
mod status;


use pledge_core::message::OutgoingMessage;
use pledge_core::profile::Tone;
use pledge_memory::{ProfileHandle, Store};

/// Grouped context for command execution.
pub struct CommandContext<'a> {
    pub store: &'a Store,
    pub identity: &'a str,
    pub text: &'a str,
}

/// Known bot commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Tone,
    Time,
    Deadline,
    Tz,
    Help,
    Settings,
    Today,
}

impl Command {
    /// Parse a command from message text. Returns `None` for unknown `/` prefixes.
    pub fn parse(text: &str) -> Option<Self> {
        let first = text.split_whitespace().next()?;
        // Strip @botname suffix (e.g. "/help@pledge_bot" → "/help").
        let cmd = first.split('@').next().unwrap_or(first);
        match cmd {
            "/tone" => Some(Self::Tone),
            "/time" => Some(Self::Time),
            "/deadline" => Some(Self::Deadline),
            "/tz" => Some(Self::Tz),
            "/help" => Some(Self::Help),
            "/settings" => Some(Self::Settings),
            "/today" => Some(Self::Today),
            _ => None,
        }
    }
}

/// Arguments after the command token.
fn args(text: &str) -> Vec<&str> {
    text.split_whitespace().skip(1).collect()
}

async fn tone_of(handle: &ProfileHandle) -> Tone {
    handle.lock().await.settings.tone
}

/// Handle a command and return the reply.
pub async fn handle(cmd: Command, ctx: &CommandContext<'_>) -> OutgoingMessage {
    let handle = ctx.store.get_or_create(ctx.identity).await;
    // Setting commands clear the state only when their write succeeds.
    if matches!(cmd, Command::Help | Command::Settings | Command::Today) {
        ctx.store.clear_state(ctx.identity).await;
    }
    match cmd {
        Command::Tone => settings::handle_tone(ctx, &handle).await,
        Command::Time => settings::handle_time(ctx, &handle).await,
        Command::Deadline => settings::handle_deadline(ctx, &handle).await,
        Command::Tz => settings::handle_tz(ctx, &handle).await,
        Command::Help => status::handle_help(&handle).await,
        Command::Settings => status::handle_settings(&handle).await,
        Command::Today => status::handle_today(&handle).await,
    }
}
