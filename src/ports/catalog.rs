//! Read-only configuration feeds: services and working hours.
//!
//! Both feeds are administered elsewhere; the booking engine only reads them.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::scheduling::{Service, WorkInterval};

/// Port for the service catalog.
#[async_trait]
pub trait ServiceCatalog: Send + Sync {
    /// All bookable services, ordered by name.
    async fn list_services(&self) -> Result<Vec<Service>, DomainError>;

    /// Case-insensitive lookup by exact name.
    ///
    /// Returns `None` if no service has that name.
    async fn find_service(&self, name: &str) -> Result<Option<Service>, DomainError>;
}

/// Port for weekly working hours.
#[async_trait]
pub trait WorkingHoursCatalog: Send + Sync {
    /// Every configured interval, active or not.
    async fn list_work_intervals(&self) -> Result<Vec<WorkInterval>, DomainError>;
}
