//! Client directory entities.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AccountId, ClientId, PhoneNumber, Timestamp, ValidationError};

/// A barbershop client, keyed by phone number within an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub phone: PhoneNumber,
    pub account_id: AccountId,
    pub created_at: Timestamp,
}

impl Client {
    /// Registers a new client. Names are trimmed and must not be blank.
    pub fn register(
        name: &str,
        phone: PhoneNumber,
        account_id: AccountId,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        let name = name.split_whitespace().collect::<Vec<_>>().join(" ");
        if name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        Ok(Self {
            id: ClientId::new(),
            name,
            phone,
            account_id,
            created_at: now,
        })
    }

    /// First name, used to personalize replies.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}
