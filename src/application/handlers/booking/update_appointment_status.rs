//! UpdateAppointmentStatusHandler - Command handler for completing or cancelling.

use std::sync::Arc;

use crate::domain::foundation::{AppointmentId, AppointmentStatus};
use crate::domain::scheduling::{Appointment, BookingError, NotFoundKind};
use crate::ports::AppointmentStore;

#[derive(Debug, Clone)]
pub struct UpdateAppointmentStatusCommand {
    pub appointment_id: AppointmentId,
    pub status: AppointmentStatus,
}

/// Moves a scheduled appointment to a terminal status.
///
/// Completed and cancelled appointments are never reactivated; such a
/// request is a validation error.
pub struct UpdateAppointmentStatusHandler {
    appointments: Arc<dyn AppointmentStore>,
}

impl UpdateAppointmentStatusHandler {
    pub fn new(appointments: Arc<dyn AppointmentStore>) -> Self {
        Self { appointments }
    }

    pub async fn handle(&self, cmd: UpdateAppointmentStatusCommand) -> Result<Appointment, BookingError> {
        // 1. Load
        let mut appointment = self
            .appointments
            .find_by_id(&cmd.appointment_id)
            .await?
            .ok_or(BookingError::NotFound(NotFoundKind::Appointment(cmd.appointment_id)))?;

        // 2. Validate transition
        let from = appointment.status;
        appointment.transition_status(cmd.status)?;

        // 3. Persist, only if nobody changed the status since the load
        let applied = self
            .appointments
            .update_status(&appointment.id, from, appointment.status)
            .await?;
        if !applied {
            tracing::warn!(
                appointment_id = %appointment.id,
                to = %appointment.status,
                "Appointment status changed concurrently"
            );
            return Err(BookingError::validation(
                "status",
                format!("appointment {} is no longer {}", appointment.id, from),
            ));
        }

        tracing::info!(
            appointment_id = %appointment.id,
            from = %from,
            to = %appointment.status,
            "Appointment status updated"
        );

        Ok(appointment)
    }
}
