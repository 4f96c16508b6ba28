//! Conversation state: which settings value, if any, the next text answers.

use super::Store;
use pledge_core::profile::ConversationState;

impl Store {
    /// Current state for `id`; `Normal` when nothing is open.
    pub async fn state(&self, id: &str) -> ConversationState {
        self.sessions
            .read()
            .await
            .get(id)
            .copied()
            .unwrap_or_default()
    }

    /// Open (or replace) a sub-dialog. Setting `Normal` clears it.
    pub async fn set_state(&self, id: &str, state: ConversationState) {
        let mut sessions = self.sessions.write().await;
        if state == ConversationState::Normal {
            sessions.remove(id);
        } else {
            sessions.insert(id.to_string(), state);
        }
    }

    /// Close any open sub-dialog. Returns the state that was open.
    pub async fn clear_state(&self, id: &str) -> ConversationState {
        self.sessions
            .write()
            .await
            .remove(id)
            .unwrap_or_default()
    }
}
