//! Profile lifecycle: lazy creation, lookup, enumeration, removal.

use super::{ProfileHandle, Store};
use pledge_core::profile::UserProfile;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

impl Store {
    /// Return the profile for `id`, creating it with the store defaults on
    /// first contact. Concurrent first calls observe the same profile.
    pub async fn get_or_create(&self, id: &str) -> ProfileHandle {
        if let Some(handle) = self.profiles.read().await.get(id) {
            return handle.clone();
        }

        let mut profiles = self.profiles.write().await;
        profiles
            .entry(id.to_string())
            .or_insert_with(|| {
                info!("profile created for {id}");
                Arc::new(Mutex::new(UserProfile::new(id, (*self.defaults).clone())))
            })
            .clone()
    }

    /// Look up an existing profile without creating one.
    pub async fn get(&self, id: &str) -> Option<ProfileHandle> {
        self.profiles.read().await.get(id).cloned()
    }

    /// Drop the profile entirely (unsubscribe). Returns whether one existed.
    pub async fn remove(&self, id: &str) -> bool {
        let removed = self.profiles.write().await.remove(id).is_some();
        if removed {
            info!("profile removed for {id}");
        }
        removed
    }

    /// Snapshot of all `(identity, handle)` pairs, for the scheduler tick.
    pub async fn handles(&self) -> Vec<(String, ProfileHandle)> {
        self.profiles
            .read()
            .await
            .iter()
            .map(|(id, h)| (id.clone(), h.clone()))
            .collect()
    }

    /// Number of known profiles.
    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.profiles.read().await.is_empty()
    }
}
