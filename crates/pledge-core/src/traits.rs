use crate::{
    context::Context,
    error::PledgeError,
    message::{InboundEvent, OutgoingMessage, ReplyHandle},
};
use async_trait::async_trait;

/// Default responder: answers free text that matched no rule.
///
/// Implementations receive the user's message plus a fixed profile snapshot
/// and return opaque text.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Whether this provider requires an API key to function.
    fn requires_api_key(&self) -> bool;

    /// Send a context to the provider and get a response.
    async fn complete(&self, context: &Context) -> Result<OutgoingMessage, PledgeError>;

    /// Check if the provider is available and ready.
    async fn is_available(&self) -> bool;
}

/// Messaging channel: the inbound event source and the outbound sink.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Start listening. Returns a receiver that yields inbound events.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<InboundEvent>, PledgeError>;

    /// Push a message to an identity (scheduler notifications).
    async fn send(&self, identity: &str, message: OutgoingMessage) -> Result<(), PledgeError>;

    /// Answer a specific inbound event.
    async fn reply(&self, handle: &ReplyHandle, message: OutgoingMessage)
        -> Result<(), PledgeError>;

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), PledgeError>;
}
