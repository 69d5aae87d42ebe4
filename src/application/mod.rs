//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Booking handlers write through the appointment store; the dialogue
//! manager composes them behind a chat interface.

pub mod conversation_locks;
pub mod handlers;

pub use conversation_locks::ConversationLocks;
pub use handlers::{
    // Booking handlers
    AvailabilityView, CheckConflictHandler, CheckConflictQuery, ClientAppointments,
    ConflictCheck, CreateBookingCommand, CreateBookingHandler, CreateBookingResult,
    ListClientAppointmentsHandler, ListClientAppointmentsQuery, QueryAvailabilityHandler,
    QueryAvailabilityQuery, Scheduler, UpdateAppointmentStatusCommand,
    UpdateAppointmentStatusHandler,
    // Client handlers
    RegisterClientCommand, RegisterClientHandler,
    // Chat
    ChatInput, ChatReply, DialogueManager, HandleChatMessageCommand,
};
