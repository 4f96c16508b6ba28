//! Gateway: the main event loop connecting the channel, the conversation
//! engine, and the minute scheduler.

mod scheduler;


use crate::conversation::Conversation;
use chrono::Utc;
use pledge_core::{message::InboundEvent, traits::Channel};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Routes inbound events to the conversation engine and replies through the
/// channel.
pub struct Gateway {
    channel: Arc<dyn Channel>,
    conversation: Conversation,
    scheduler_enabled: bool,
    /// Identities with an event in flight. Later events for the same identity
    /// are buffered here and handled in arrival order.
    active_senders: Mutex<HashMap<String, Vec<InboundEvent>>>,
}

impl Gateway {
    pub fn new(
        channel: Arc<dyn Channel>,
        conversation: Conversation,
        scheduler_enabled: bool,
    ) -> Self {
        Self {
            channel,
            conversation,
            scheduler_enabled,
            active_senders: Mutex::new(HashMap::new()),
        }
    }

    /// Run the main event loop until ctrl-c or the channel closes.
    pub async fn run(self: Arc<Self>) -> anyhow::Result<()> {
        let mut rx = self.channel.start().await?;
        info!(
            "Pledge gateway running | channel: {} | scheduler: {}",
            self.channel.name(),
            if self.scheduler_enabled {
                "enabled"
            } else {
                "disabled"
            },
        );

        let sched_handle = self.scheduler_enabled.then(|| {
            let store = self.conversation.store().clone();
            let channel = self.channel.clone();
            tokio::spawn(async move {
                Self::scheduler_loop(store, channel).await;
            })
        });

        loop {
            tokio::select! {
                incoming = rx.recv() => match incoming {
                    Some(event) => {
                        let gw = self.clone();
                        tokio::spawn(async move {
                            gw.dispatch_event(event).await;
                        });
                    }
                    None => {
                        warn!("channel {} closed its event stream", self.channel.name());
                        break;
                    }
                },
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        self.shutdown(sched_handle).await;
        Ok(())
    }

    /// Dispatch an event: buffer if the identity is busy, otherwise process.
    async fn dispatch_event(self: Arc<Self>, event: InboundEvent) {
        let sender_key = event.identity().to_string();

        {
            let mut active = self.active_senders.lock().await;
            if let Some(buffer) = active.get_mut(&sender_key) {
                debug!("buffered {} event from {sender_key}", event.kind());
                buffer.push(event);
                return;
            }
            active.insert(sender_key.clone(), Vec::new());
        }

        self.handle_event(event).await;

        // Drain anything that arrived meanwhile.
        loop {
            let next = {
                let mut active = self.active_senders.lock().await;
                match active.get_mut(&sender_key) {
                    Some(buf) if !buf.is_empty() => Some(buf.remove(0)),
                    _ => {
                        active.remove(&sender_key);
                        None
                    }
                }
            };

            match next {
                Some(buffered) => self.handle_event(buffered).await,
                None => break,
            }
        }
    }

    async fn handle_event(&self, event: InboundEvent) {
        let identity = event.identity().to_string();
        let kind = event.kind();
        let Some((reply, message)) = self.conversation.handle_event(event, Utc::now()).await
        else {
            return;
        };
        debug!("{kind} from {identity} answered");
        if let Err(e) = self.channel.reply(&reply, message).await {
            error!("failed to reply to {identity}: {e}");
        }
    }

    async fn shutdown(&self, sched_handle: Option<tokio::task::JoinHandle<()>>) {
        info!("Shutting down...");
        if let Some(h) = sched_handle {
            h.abort();
        }
        if let Err(e) = self.channel.stop().await {
            warn!("failed to stop channel {}: {e}", self.channel.name());
        }
        info!("Shutdown complete.");
    }
}
