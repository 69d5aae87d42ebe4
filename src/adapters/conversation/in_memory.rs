//! In-memory conversation store for testing and development.
//!
//! Not shared between processes; multi-instance deployments use the
//! Redis store.

use async_trait::async_trait;
use chrono::Duration;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::conversation::{BookingFields, ConversationContext};
use crate::domain::foundation::{DomainError, PhoneNumber, Timestamp};
use crate::ports::{Clock, ConversationStore};

pub struct InMemoryConversationStore {
    contexts: Arc<RwLock<HashMap<PhoneNumber, ConversationContext>>>,
    greeted: Arc<RwLock<HashMap<PhoneNumber, Timestamp>>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    greeting_ttl: Duration,
}

impl InMemoryConversationStore {
    pub fn new(clock: Arc<dyn Clock>, ttl: Duration, greeting_ttl: Duration) -> Self {
        Self {
            contexts: Arc::new(RwLock::new(HashMap::new())),
            greeted: Arc::new(RwLock::new(HashMap::new())),
            clock,
            ttl,
            greeting_ttl,
        }
    }

    /// Number of stored contexts, expired or not.
    pub async fn stored(&self) -> usize {
        self.contexts.read().await.len()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn get(&self, phone: &PhoneNumber) -> Result<Option<ConversationContext>, DomainError> {
        let now = self.clock.now();
        let contexts = self.contexts.read().await;
        Ok(contexts
            .get(phone)
            .filter(|ctx| !ctx.is_expired(now, self.ttl))
            .cloned())
    }

    async fn merge(
        &self,
        phone: &PhoneNumber,
        fields: BookingFields,
    ) -> Result<ConversationContext, DomainError> {
        let now = self.clock.now();
        let mut contexts = self.contexts.write().await;

        let ctx = contexts
            .entry(phone.clone())
            .or_insert_with(|| ConversationContext::new(phone.clone(), now));
        if ctx.is_expired(now, self.ttl) {
            *ctx = ConversationContext::new(phone.clone(), now);
        }
        ctx.merge(fields, now);
        Ok(ctx.clone())
    }

    async fn save(&self, context: &ConversationContext) -> Result<(), DomainError> {
        let mut stored = context.clone();
        stored.last_updated = self.clock.now();
        self.contexts
            .write()
            .await
            .insert(stored.phone.clone(), stored);
        Ok(())
    }

    async fn delete(&self, phone: &PhoneNumber) -> Result<(), DomainError> {
        self.contexts.write().await.remove(phone);
        Ok(())
    }

    async fn expire(&self) -> Result<usize, DomainError> {
        let now = self.clock.now();

        let mut contexts = self.contexts.write().await;
        let before = contexts.len();
        contexts.retain(|_, ctx| !ctx.is_expired(now, self.ttl));
        let removed = before - contexts.len();

        self.greeted
            .write()
            .await
            .retain(|_, at| now.duration_since(at) < self.greeting_ttl);

        if removed > 0 {
            tracing::debug!(removed, "Evicted idle conversations");
        }
        Ok(removed)
    }

    async fn mark_greeted(&self, phone: &PhoneNumber) -> Result<bool, DomainError> {
        let now = self.clock.now();
        let mut greeted = self.greeted.write().await;
        match greeted.get(phone) {
            Some(at) if now.duration_since(at) < self.greeting_ttl => Ok(false),
            _ => {
                greeted.insert(phone.clone(), now);
                Ok(true)
            }
        }
    }
}
