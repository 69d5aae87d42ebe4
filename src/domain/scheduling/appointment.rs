//! Appointment entity and time windows.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::Service;
use crate::domain::foundation::{
    AppointmentId, AppointmentStatus, ClientId, StateMachine, Timestamp, ValidationError,
};

/// Half-open time range `[start, end)` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, duration_minutes: u32) -> Self {
        Self {
            start,
            end: start + Duration::minutes(duration_minutes as i64),
        }
    }

    /// `a` and `b` conflict iff `a.start < b.end && b.start < a.end`.
    ///
    /// Back-to-back windows (one ends exactly when the other starts) do not overlap.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A booked appointment on the shop's single shared calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub client_id: ClientId,
    pub service_name: String,
    /// Price copied from the catalog when the booking was made.
    pub price_cents: i64,
    pub start: Timestamp,
    pub duration_minutes: u32,
    pub status: AppointmentStatus,
    pub created_at: Timestamp,
}

impl Appointment {
    /// Creates a new scheduled appointment, snapshotting the service price.
    pub fn schedule(client_id: ClientId, service: &Service, start: Timestamp, now: Timestamp) -> Self {
        Self {
            id: AppointmentId::new(),
            client_id,
            service_name: service.name().to_string(),
            price_cents: service.price_cents(),
            start,
            duration_minutes: service.duration_minutes(),
            status: AppointmentStatus::Scheduled,
            created_at: now,
        }
    }

    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(*self.start.as_datetime(), self.duration_minutes)
    }

    pub fn end(&self) -> Timestamp {
        Timestamp::from_datetime(self.window().end)
    }

    pub fn is_scheduled(&self) -> bool {
        self.status.occupies_calendar()
    }

    /// Moves the appointment to a new status, rejecting reactivation.
    pub fn transition_status(&mut self, target: AppointmentStatus) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(target)?;
        Ok(())
    }
}
