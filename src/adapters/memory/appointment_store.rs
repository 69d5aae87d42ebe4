//! In-memory appointment store.
//!
//! A single mutex guards the whole map, which trivially serializes
//! reservations for every date.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::foundation::{
    AppointmentId, AppointmentStatus, ClientId, DomainError, ErrorCode, Timestamp,
};
use crate::domain::scheduling::{Appointment, TimeWindow};
use crate::ports::{AppointmentStore, ReserveOutcome};

#[derive(Debug, Clone, Default)]
pub struct InMemoryAppointmentStore {
    appointments: Arc<Mutex<HashMap<AppointmentId, Appointment>>>,
}

impl InMemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts without any conflict check. Test setup only.
    pub async fn insert_unchecked(&self, appointment: Appointment) {
        self.appointments
            .lock()
            .await
            .insert(appointment.id, appointment);
    }

    /// Every stored appointment, ordered by start.
    pub async fn all(&self) -> Vec<Appointment> {
        let mut all: Vec<Appointment> = self.appointments.lock().await.values().cloned().collect();
        all.sort_by_key(|a| a.start);
        all
    }
}

#[async_trait]
impl AppointmentStore for InMemoryAppointmentStore {
    async fn reserve(
        &self,
        appointment: &Appointment,
        _business_date: NaiveDate,
    ) -> Result<ReserveOutcome, DomainError> {
        let mut appointments = self.appointments.lock().await;
        let window = appointment.window();

        let taken = appointments
            .values()
            .any(|existing| existing.is_scheduled() && existing.window().overlaps(&window));
        if taken {
            return Ok(ReserveOutcome::Conflict);
        }

        appointments.insert(appointment.id, appointment.clone());
        Ok(ReserveOutcome::Reserved)
    }

    async fn find_scheduled_overlapping(
        &self,
        from: &Timestamp,
        to: &Timestamp,
    ) -> Result<Vec<Appointment>, DomainError> {
        let range = TimeWindow {
            start: *from.as_datetime(),
            end: *to.as_datetime(),
        };
        let appointments = self.appointments.lock().await;
        let mut found: Vec<Appointment> = appointments
            .values()
            .filter(|a| a.is_scheduled() && a.window().overlaps(&range))
            .cloned()
            .collect();
        found.sort_by_key(|a| a.start);
        Ok(found)
    }

    async fn find_by_id(&self, id: &AppointmentId) -> Result<Option<Appointment>, DomainError> {
        Ok(self.appointments.lock().await.get(id).cloned())
    }

    async fn update_status(
        &self,
        id: &AppointmentId,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> Result<bool, DomainError> {
        let mut appointments = self.appointments.lock().await;
        let appointment = appointments.get_mut(id).ok_or_else(|| {
            DomainError::new(
                ErrorCode::AppointmentNotFound,
                format!("Appointment {} not found", id),
            )
        })?;
        if appointment.status != from {
            return Ok(false);
        }
        appointment.status = to;
        Ok(true)
    }

    async fn find_upcoming_by_client(
        &self,
        client_id: &ClientId,
        from: &Timestamp,
    ) -> Result<Vec<Appointment>, DomainError> {
        let appointments = self.appointments.lock().await;
        let mut found: Vec<Appointment> = appointments
            .values()
            .filter(|a| a.client_id == *client_id && a.is_scheduled() && a.start >= *from)
            .cloned()
            .collect();
        found.sort_by_key(|a| a.start);
        Ok(found)
    }
}
