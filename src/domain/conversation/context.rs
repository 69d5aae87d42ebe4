//! Per-phone partial booking context.

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::DialogueState;
use crate::domain::foundation::{PhoneNumber, StateMachine, Timestamp, ValidationError};

/// Idle time after which a conversation context is treated as absent.
pub const DEFAULT_CONTEXT_TTL_MINUTES: i64 = 30;

/// Booking fields gathered so far. Every field is optional until the end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl BookingFields {
    pub fn is_empty(&self) -> bool {
        self.service.is_none() && self.date.is_none() && self.time.is_none() && self.name.is_none()
    }

    /// Overlays `incoming`: present fields replace, absent fields are kept.
    pub fn overlay(&mut self, incoming: BookingFields) {
        if incoming.service.is_some() {
            self.service = incoming.service;
        }
        if incoming.date.is_some() {
            self.date = incoming.date;
        }
        if incoming.time.is_some() {
            self.time = incoming.time;
        }
        if incoming.name.is_some() {
            self.name = incoming.name;
        }
    }

    /// Collection state for the first missing field, in priority order
    /// service, date, time, then name when the client is new.
    pub fn first_missing(&self, needs_name: bool) -> Option<DialogueState> {
        if self.service.is_none() {
            Some(DialogueState::CollectService)
        } else if self.date.is_none() {
            Some(DialogueState::CollectDate)
        } else if self.time.is_none() {
            Some(DialogueState::CollectTime)
        } else if needs_name && self.name.is_none() {
            Some(DialogueState::CollectName)
        } else {
            None
        }
    }
}

/// Conversation state for one phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationContext {
    pub phone: PhoneNumber,
    pub fields: BookingFields,
    pub state: DialogueState,
    /// Free slot offered after a conflict; an affirmative reply accepts it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_time: Option<NaiveTime>,
    pub last_updated: Timestamp,
}

impl ConversationContext {
    pub fn new(phone: PhoneNumber, now: Timestamp) -> Self {
        Self {
            phone,
            fields: BookingFields::default(),
            state: DialogueState::default(),
            suggested_time: None,
            last_updated: now,
        }
    }

    /// Overlays new fields and refreshes `last_updated`.
    pub fn merge(&mut self, incoming: BookingFields, now: Timestamp) {
        self.fields.overlay(incoming);
        self.last_updated = now;
    }

    /// True once the context has been idle for strictly longer than `ttl`.
    pub fn is_expired(&self, now: Timestamp, ttl: Duration) -> bool {
        now.duration_since(&self.last_updated) > ttl
    }

    /// Moves the dialogue to `target`, rejecting illegal jumps.
    pub fn advance(&mut self, target: DialogueState) -> Result<(), ValidationError> {
        self.state = self.state.transition_to(target)?;
        Ok(())
    }
}
