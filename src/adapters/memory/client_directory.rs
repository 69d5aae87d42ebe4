//! In-memory client directory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::client::Client;
use crate::domain::foundation::{DomainError, PhoneNumber};
use crate::ports::ClientDirectory;

#[derive(Debug, Clone, Default)]
pub struct InMemoryClientDirectory {
    clients: Arc<RwLock<HashMap<PhoneNumber, Client>>>,
}

impl InMemoryClientDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.clients.read().await.len()
    }
}

#[async_trait]
impl ClientDirectory for InMemoryClientDirectory {
    async fn find_by_phone(&self, phone: &PhoneNumber) -> Result<Option<Client>, DomainError> {
        Ok(self.clients.read().await.get(phone).cloned())
    }

    async fn create(&self, client: Client) -> Result<Client, DomainError> {
        let mut clients = self.clients.write().await;
        let stored = clients.entry(client.phone.clone()).or_insert(client);
        Ok(stored.clone())
    }
}
