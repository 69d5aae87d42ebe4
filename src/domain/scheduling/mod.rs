//! Scheduling domain: working hours, slots, conflicts and appointments.
//!
//! # Module Organization
//!
//! - `calendar` - Business-timezone date arithmetic
//! - `service` - Service catalog entries
//! - `work_interval` - Weekly working-hour intervals
//! - `appointment` - Appointment entity and time windows
//! - `slots` - Candidate start enumeration (`SlotComputer`)
//! - `conflict` - Overlap detection and alternatives (`ConflictResolver`)
//! - `errors` - Booking error taxonomy

mod appointment;
mod calendar;
mod conflict;
mod errors;
mod service;
mod slots;
mod work_interval;

pub use appointment::{Appointment, TimeWindow};
pub use calendar::{parse_booking_date, parse_booking_time, weekday_label, BusinessCalendar};
pub use conflict::{ConflictResolver, SlotAvailability};
pub use errors::{BookingError, NotFoundKind};
pub use service::{format_cents, Service};
pub use slots::{DaySchedule, SlotComputer, DEFAULT_GRANULARITY_MINUTES};
pub use work_interval::WorkInterval;
