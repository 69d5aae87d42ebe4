//! Conversation state store port.
//!
//! Holds one partial booking context per phone number plus the one-time
//! greeting marker. Backed by a shared cache in production so several
//! instances see the same conversations.

use async_trait::async_trait;

use crate::domain::conversation::{BookingFields, ConversationContext};
use crate::domain::foundation::{DomainError, PhoneNumber};

#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Current context for `phone`.
    ///
    /// A context idle for longer than the TTL is reported as `None`.
    async fn get(&self, phone: &PhoneNumber) -> Result<Option<ConversationContext>, DomainError>;

    /// Overlays `fields` onto the live context (or a fresh one) and resets
    /// its idle timer. Returns the merged context.
    async fn merge(
        &self,
        phone: &PhoneNumber,
        fields: BookingFields,
    ) -> Result<ConversationContext, DomainError>;

    /// Replaces the stored context and resets its idle timer.
    async fn save(&self, context: &ConversationContext) -> Result<(), DomainError>;

    /// Drops the context for `phone`, if any.
    async fn delete(&self, phone: &PhoneNumber) -> Result<(), DomainError>;

    /// Evicts idle contexts. Returns how many were removed.
    ///
    /// Stores with native key expiry may return 0; reads stay correct
    /// either way.
    async fn expire(&self) -> Result<usize, DomainError>;

    /// Records that `phone` has been greeted.
    ///
    /// Returns `true` only for the first call within the greeting TTL.
    async fn mark_greeted(&self, phone: &PhoneNumber) -> Result<bool, DomainError>;
}
