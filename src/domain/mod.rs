//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, enums, errors)
//! - `scheduling` - Working hours, slot computation, conflicts, appointments
//! - `client` - Customer records keyed by phone number
//! - `conversation` - Chat slot filling: extraction, intents, dialogue state

pub mod client;
pub mod conversation;
pub mod foundation;
pub mod scheduling;
