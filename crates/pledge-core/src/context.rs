use crate::profile::ProfileSnapshot;
use serde::{Deserialize, Serialize};

/// Everything the default responder gets to see for one message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Context {
    /// Persona instructions (tone-specific).
    pub system_prompt: String,
    /// The user's message, verbatim.
    pub current_message: String,
    /// Fixed-shape view of the sender's profile.
    pub profile: ProfileSnapshot,
}

impl Context {
    pub fn new(message: &str, system_prompt: &str, profile: ProfileSnapshot) -> Self {
        Self {
            system_prompt: system_prompt.to_string(),
            current_message: message.to_string(),
            profile,
        }
    }
}
