//! Booking command and query handlers.

mod check_conflict;
mod create_booking;
mod list_client_appointments;
mod query_availability;
mod scheduler;
mod update_appointment_status;

#[cfg(test)]
pub(crate) mod test_support;

pub use check_conflict::{CheckConflictHandler, CheckConflictQuery, ConflictCheck};
pub use create_booking::{
    CreateBookingCommand, CreateBookingHandler, CreateBookingResult, DEFAULT_HORIZON_MONTHS,
};
pub use list_client_appointments::{
    ClientAppointments, ListClientAppointmentsHandler, ListClientAppointmentsQuery,
};
pub use query_availability::{
    AvailabilityView, IntervalView, QueryAvailabilityHandler, QueryAvailabilityQuery,
};
pub use scheduler::{DayPlan, Scheduler};
pub use update_appointment_status::{UpdateAppointmentStatusCommand, UpdateAppointmentStatusHandler};
