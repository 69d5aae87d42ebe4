//! Appointment store port.
//!
//! # Design
//!
//! - **Reserve-or-fail**: the overlap check and the insert happen in one
//!   critical section, serialized per business date
//! - **Scheduled-only conflicts**: completed and cancelled appointments
//!   never block a slot

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::foundation::{AppointmentId, AppointmentStatus, ClientId, DomainError, Timestamp};
use crate::domain::scheduling::Appointment;

/// Result of an atomic reservation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReserveOutcome {
    /// The appointment was inserted.
    Reserved,
    /// A scheduled appointment already overlaps the requested window.
    Conflict,
}

#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Inserts `appointment` unless a scheduled appointment overlaps it.
    ///
    /// Concurrent calls for the same `business_date` are serialized, so of
    /// N overlapping attempts exactly one returns `Reserved`.
    async fn reserve(
        &self,
        appointment: &Appointment,
        business_date: NaiveDate,
    ) -> Result<ReserveOutcome, DomainError>;

    /// Scheduled appointments whose window intersects `[from, to)`,
    /// ordered by start.
    async fn find_scheduled_overlapping(
        &self,
        from: &Timestamp,
        to: &Timestamp,
    ) -> Result<Vec<Appointment>, DomainError>;

    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &AppointmentId) -> Result<Option<Appointment>, DomainError>;

    /// Moves an appointment from `from` to `to` in one conditional write.
    ///
    /// Returns `false` when the stored status is no longer `from`, leaving
    /// the row untouched.
    ///
    /// # Errors
    ///
    /// - `AppointmentNotFound` if the appointment doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update_status(
        &self,
        id: &AppointmentId,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> Result<bool, DomainError>;

    /// Scheduled appointments of a client starting at or after `from`,
    /// ordered by start.
    async fn find_upcoming_by_client(
        &self,
        client_id: &ClientId,
        from: &Timestamp,
    ) -> Result<Vec<Appointment>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appointment_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn AppointmentStore) {}
    }
}
