//! HTTP DTOs for booking endpoints.
//!
//! Dates travel as `YYYY-MM-DD`, times as `HH:MM` in the business timezone.

use serde::{Deserialize, Serialize};

use crate::adapters::http::error::ErrorResponse;
use crate::application::handlers::booking::{AvailabilityView, ConflictCheck};
use crate::domain::scheduling::{format_cents, Appointment, BusinessCalendar};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to book a slot. `name` registers an unknown phone first.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingRequest {
    pub phone: String,
    #[serde(default)]
    pub name: Option<String>,
    pub service: String,
    pub date: String,
    pub time: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityParams {
    pub date: String,
    pub service: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConflictParams {
    pub date: String,
    pub time: String,
    pub service: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct AppointmentResponse {
    pub id: String,
    pub client_id: String,
    pub service: String,
    pub price_cents: i64,
    pub price: String,
    pub date: String,
    pub time: String,
    pub duration_minutes: u32,
    pub status: String,
}

impl AppointmentResponse {
    pub fn from_appointment(appointment: &Appointment, calendar: &BusinessCalendar) -> Self {
        let start = appointment.start.as_datetime();
        Self {
            id: appointment.id.to_string(),
            client_id: appointment.client_id.to_string(),
            service: appointment.service_name.clone(),
            price_cents: appointment.price_cents,
            price: format_cents(appointment.price_cents),
            date: calendar.local_date(start).format("%Y-%m-%d").to_string(),
            time: calendar.local_time(start).format("%H:%M").to_string(),
            duration_minutes: appointment.duration_minutes,
            status: appointment.status.to_string(),
        }
    }
}

/// Outcome of a booking attempt: `appointment` on success, `error` otherwise.
#[derive(Debug, Clone, Serialize)]
pub struct BookingResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment: Option<AppointmentResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation_message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotResponse {
    pub time: String,
    pub available: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntervalResponse {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityResponse {
    pub date: String,
    pub service: String,
    pub closed: bool,
    pub slots: Vec<SlotResponse>,
    pub work_intervals: Vec<IntervalResponse>,
}

impl From<AvailabilityView> for AvailabilityResponse {
    fn from(view: AvailabilityView) -> Self {
        Self {
            date: view.date.format("%Y-%m-%d").to_string(),
            service: view.service,
            closed: view.closed,
            slots: view
                .slots
                .into_iter()
                .map(|s| SlotResponse {
                    time: s.time.format("%H:%M").to_string(),
                    available: s.available,
                })
                .collect(),
            work_intervals: view
                .work_intervals
                .into_iter()
                .map(|i| IntervalResponse {
                    start: i.start.format("%H:%M").to_string(),
                    end: i.end.format("%H:%M").to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConflictResponse {
    pub has_conflict: bool,
    pub next_available: Option<String>,
    pub bookable: bool,
}

impl From<ConflictCheck> for ConflictResponse {
    fn from(check: ConflictCheck) -> Self {
        Self {
            has_conflict: check.has_conflict,
            next_available: check.next_available.map(|t| t.format("%H:%M").to_string()),
            bookable: check.bookable,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientAppointmentsResponse {
    pub client_id: String,
    pub name: String,
    pub appointments: Vec<AppointmentResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::booking::IntervalView;
    use crate::domain::scheduling::SlotAvailability;
    use chrono::{NaiveDate, NaiveTime};

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn availability_formats_times_as_hh_mm() {
        let view = AvailabilityView {
            date: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            service: "Corte".to_string(),
            closed: false,
            slots: vec![SlotAvailability {
                time: hm(9, 0),
                available: false,
            }],
            work_intervals: vec![IntervalView {
                start: hm(9, 0),
                end: hm(12, 0),
            }],
        };

        let json = serde_json::to_value(AvailabilityResponse::from(view)).unwrap();
        assert_eq!(json["date"], "2024-01-08");
        assert_eq!(json["slots"][0]["time"], "09:00");
        assert_eq!(json["slots"][0]["available"], false);
        assert_eq!(json["work_intervals"][0]["end"], "12:00");
    }

    #[test]
    fn conflict_without_alternative_serializes_null() {
        let json = serde_json::to_value(ConflictResponse::from(ConflictCheck {
            has_conflict: true,
            next_available: None,
            bookable: false,
        }))
        .unwrap();
        assert!(json["next_available"].is_null());
    }
}
