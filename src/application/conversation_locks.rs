//! Per-phone ordering of chat messages.
//!
//! Merging is an overlay, so two messages from the same phone must be
//! processed in arrival order. Each phone gets its own async mutex; other
//! phones proceed in parallel.
//!
//! The locks are process-local. Deployments with several instances must
//! route a given phone to the same instance.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::foundation::PhoneNumber;

/// Idle lock entries are pruned once the map grows past this size.
const PRUNE_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, Default)]
pub struct ConversationLocks {
    locks: Arc<Mutex<HashMap<PhoneNumber, Arc<Mutex<()>>>>>,
}

impl ConversationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `phone`'s conversation.
    ///
    /// The guard releases the lock when dropped.
    pub async fn acquire(&self, phone: &PhoneNumber) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            if locks.len() >= PRUNE_THRESHOLD {
                // Only the map holds these: nobody owns or awaits them
                locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            }
            locks.entry(phone.clone()).or_default().clone()
        };
        lock.lock_owned().await
    }

    pub async fn tracked(&self) -> usize {
        self.locks.lock().await.len()
    }
}
