//! Redis-backed conversation store for multi-instance deployments.
//!
//! Contexts are JSON values written with `SET .. EX ttl`, so Redis evicts
//! idle conversations on its own. Reads still check `last_updated` against
//! the clock. The greeting marker uses `SET NX EX`, which makes
//! "first greeting" atomic across instances.

use async_trait::async_trait;
use chrono::Duration;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::sync::Arc;

use crate::domain::conversation::{BookingFields, ConversationContext};
use crate::domain::foundation::{DomainError, PhoneNumber};
use crate::ports::{Clock, ConversationStore};

const DEFAULT_KEY_PREFIX: &str = "barber_booking";

#[derive(Clone)]
pub struct RedisConversationStore {
    conn: MultiplexedConnection,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    greeting_ttl: Duration,
    key_prefix: String,
}

impl RedisConversationStore {
    pub fn new(
        conn: MultiplexedConnection,
        clock: Arc<dyn Clock>,
        ttl: Duration,
        greeting_ttl: Duration,
    ) -> Self {
        Self {
            conn,
            clock,
            ttl,
            greeting_ttl,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }

    /// Namespaces keys, e.g. per account.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    fn context_key(&self, phone: &PhoneNumber) -> String {
        format!("{}:conversation:{}", self.key_prefix, phone)
    }

    fn greeting_key(&self, phone: &PhoneNumber) -> String {
        format!("{}:greeted:{}", self.key_prefix, phone)
    }

    fn ttl_secs(duration: Duration) -> u64 {
        duration.num_seconds().max(1) as u64
    }

    async fn write(&self, context: &ConversationContext) -> Result<(), DomainError> {
        let payload = serde_json::to_string(context).map_err(|e| {
            DomainError::cache("Failed to serialize conversation context", e)
        })?;

        let mut conn = self.conn.clone();
        redis::cmd("SET")
            .arg(self.context_key(&context.phone))
            .arg(payload)
            .arg("EX")
            .arg(Self::ttl_secs(self.ttl))
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e| DomainError::cache("Failed to store conversation context", e))
    }
}

#[async_trait]
impl ConversationStore for RedisConversationStore {
    async fn get(&self, phone: &PhoneNumber) -> Result<Option<ConversationContext>, DomainError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get(self.context_key(phone))
            .await
            .map_err(|e: redis::RedisError| DomainError::cache("Failed to read conversation context", e))?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        let context: ConversationContext = match serde_json::from_str(&raw) {
            Ok(context) => context,
            Err(e) => {
                // Unreadable payloads (e.g. from an older schema) restart the dialogue
                tracing::warn!(phone = %phone, error = %e, "Discarding unreadable conversation context");
                return Ok(None);
            }
        };

        if context.is_expired(self.clock.now(), self.ttl) {
            return Ok(None);
        }
        Ok(Some(context))
    }

    async fn merge(
        &self,
        phone: &PhoneNumber,
        fields: BookingFields,
    ) -> Result<ConversationContext, DomainError> {
        let now = self.clock.now();
        let mut context = self
            .get(phone)
            .await?
            .unwrap_or_else(|| ConversationContext::new(phone.clone(), now));
        context.merge(fields, now);
        self.write(&context).await?;
        Ok(context)
    }

    async fn save(&self, context: &ConversationContext) -> Result<(), DomainError> {
        let mut stored = context.clone();
        stored.last_updated = self.clock.now();
        self.write(&stored).await
    }

    async fn delete(&self, phone: &PhoneNumber) -> Result<(), DomainError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(self.context_key(phone))
            .await
            .map_err(|e: redis::RedisError| DomainError::cache("Failed to delete conversation context", e))
    }

    async fn expire(&self) -> Result<usize, DomainError> {
        // Keys carry EX; Redis evicts them itself
        Ok(0)
    }

    async fn mark_greeted(&self, phone: &PhoneNumber) -> Result<bool, DomainError> {
        let mut conn = self.conn.clone();
        let set: Option<String> = redis::cmd("SET")
            .arg(self.greeting_key(phone))
            .arg(1)
            .arg("NX")
            .arg("EX")
            .arg(Self::ttl_secs(self.greeting_ttl))
            .query_async(&mut conn)
            .await
            .map_err(|e| DomainError::cache("Failed to record greeting", e))?;
        Ok(set.is_some())
    }
}
