//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod booking;
pub mod chat;
pub mod client;

pub use booking::{
    AvailabilityView, CheckConflictHandler, CheckConflictQuery, ClientAppointments,
    ConflictCheck, CreateBookingCommand, CreateBookingHandler, CreateBookingResult, DayPlan,
    IntervalView, ListClientAppointmentsHandler, ListClientAppointmentsQuery,
    QueryAvailabilityHandler, QueryAvailabilityQuery, Scheduler, UpdateAppointmentStatusCommand,
    UpdateAppointmentStatusHandler, DEFAULT_HORIZON_MONTHS,
};
pub use chat::{ChatInput, ChatReply, DialogueManager, HandleChatMessageCommand, DEFAULT_SLOT_HINTS};
pub use client::{RegisterClientCommand, RegisterClientHandler};
