//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the booking domain.

mod appointment_status;
mod errors;
mod ids;
mod phone;
mod state_machine;
mod timestamp;

pub use appointment_status::AppointmentStatus;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{AccountId, AppointmentId, ClientId};
pub use phone::PhoneNumber;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
