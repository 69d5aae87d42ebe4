//! ListClientAppointmentsHandler - Query handler for a client's upcoming bookings.

use std::sync::Arc;

use super::Scheduler;
use crate::domain::client::Client;
use crate::domain::foundation::PhoneNumber;
use crate::domain::scheduling::{Appointment, BookingError, NotFoundKind};
use crate::ports::ClientDirectory;

#[derive(Debug, Clone)]
pub struct ListClientAppointmentsQuery {
    pub phone: PhoneNumber,
}

#[derive(Debug, Clone)]
pub struct ClientAppointments {
    pub client: Client,
    /// Scheduled appointments starting from now, ordered by start.
    pub appointments: Vec<Appointment>,
}

pub struct ListClientAppointmentsHandler {
    scheduler: Scheduler,
    clients: Arc<dyn ClientDirectory>,
}

impl ListClientAppointmentsHandler {
    pub fn new(scheduler: Scheduler, clients: Arc<dyn ClientDirectory>) -> Self {
        Self { scheduler, clients }
    }

    pub async fn handle(&self, query: ListClientAppointmentsQuery) -> Result<ClientAppointments, BookingError> {
        let client = self
            .clients
            .find_by_phone(&query.phone)
            .await?
            .ok_or_else(|| BookingError::NotFound(NotFoundKind::Client(query.phone.clone())))?;

        let appointments = self
            .scheduler
            .appointments()
            .find_upcoming_by_client(&client.id, &self.scheduler.now())
            .await?;

        Ok(ClientAppointments {
            client,
            appointments,
        })
    }
}
