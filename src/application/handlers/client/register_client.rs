//! RegisterClientHandler - explicit client creation for unknown phones.

use std::sync::Arc;

use crate::domain::client::Client;
use crate::domain::foundation::{AccountId, PhoneNumber};
use crate::domain::scheduling::BookingError;
use crate::ports::{ClientDirectory, Clock};

#[derive(Debug, Clone)]
pub struct RegisterClientCommand {
    pub name: String,
    pub phone: PhoneNumber,
}

/// Creates a client under the owning account.
///
/// Registering a phone that already exists returns the stored client
/// unchanged.
pub struct RegisterClientHandler {
    clients: Arc<dyn ClientDirectory>,
    clock: Arc<dyn Clock>,
    account_id: AccountId,
}

impl RegisterClientHandler {
    pub fn new(clients: Arc<dyn ClientDirectory>, clock: Arc<dyn Clock>, account_id: AccountId) -> Self {
        Self {
            clients,
            clock,
            account_id,
        }
    }

    pub async fn handle(&self, cmd: RegisterClientCommand) -> Result<Client, BookingError> {
        let client = Client::register(&cmd.name, cmd.phone, self.account_id.clone(), self.clock.now())?;
        let stored = self.clients.create(client).await?;
        tracing::info!(client_id = %stored.id, phone = %stored.phone, "Client registered");
        Ok(stored)
    }
}
