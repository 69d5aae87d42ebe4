//! In-memory service catalog and working hours.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::DomainError;
use crate::domain::scheduling::{Service, WorkInterval};
use crate::ports::{ServiceCatalog, WorkingHoursCatalog};

/// Both configuration feeds held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    services: Arc<RwLock<Vec<Service>>>,
    intervals: Arc<RwLock<Vec<WorkInterval>>>,
}

impl InMemoryCatalog {
    pub fn new(services: Vec<Service>, intervals: Vec<WorkInterval>) -> Self {
        Self {
            services: Arc::new(RwLock::new(services)),
            intervals: Arc::new(RwLock::new(intervals)),
        }
    }

    /// Replaces a service's entry, e.g. to simulate a price change.
    pub async fn upsert_service(&self, service: Service) {
        let mut services = self.services.write().await;
        services.retain(|s| !s.matches_name(service.name()));
        services.push(service);
    }

    pub async fn replace_intervals(&self, intervals: Vec<WorkInterval>) {
        *self.intervals.write().await = intervals;
    }
}

#[async_trait]
impl ServiceCatalog for InMemoryCatalog {
    async fn list_services(&self) -> Result<Vec<Service>, DomainError> {
        let mut services = self.services.read().await.clone();
        services.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(services)
    }

    async fn find_service(&self, name: &str) -> Result<Option<Service>, DomainError> {
        let services = self.services.read().await;
        Ok(services.iter().find(|s| s.matches_name(name)).cloned())
    }
}

#[async_trait]
impl WorkingHoursCatalog for InMemoryCatalog {
    async fn list_work_intervals(&self) -> Result<Vec<WorkInterval>, DomainError> {
        Ok(self.intervals.read().await.clone())
    }
}
