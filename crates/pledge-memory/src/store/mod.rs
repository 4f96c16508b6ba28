//! Owned key-value stores behind accessor contracts.
//!
//! Split into focused submodules:
//! - `profiles`: lazy profile creation, lookup, removal
//! - `sessions`: per-identity conversation state (open settings sub-dialogs)

mod profiles;
mod sessions;


use pledge_core::profile::{ConversationState, Settings, UserProfile};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Shared handle to one profile. Every mutation happens under its lock, so a
/// report and a deadline sweep for the same user never interleave.
pub type ProfileHandle = Arc<Mutex<UserProfile>>;

/// Profile and session store, cheap to clone.
#[derive(Clone)]
pub struct Store {
    defaults: Arc<Settings>,
    profiles: Arc<RwLock<HashMap<String, ProfileHandle>>>,
    sessions: Arc<RwLock<HashMap<String, ConversationState>>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl Store {
    /// Create an empty store. `defaults` seed every new profile.
    pub fn new(defaults: Settings) -> Self {
        Self {
            defaults: Arc::new(defaults),
            profiles: Arc::new(RwLock::new(HashMap::new())),
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Settings applied to profiles created from now on.
    pub fn defaults(&self) -> &Settings {
        &self.defaults
    }
}
