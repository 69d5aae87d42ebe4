//! Conversation domain: slot filling for chat bookings.
//!
//! # Module Organization
//!
//! - `context` - Per-phone partial booking fields with overlay merge and TTL
//! - `state` - Dialogue state machine
//! - `extractor` - Free text to booking fields
//! - `intent` - Intent classification and agent action parsing
//! - `replies` - Customer-facing texts and yes/no understanding

mod context;
mod extractor;
mod intent;
pub mod replies;
mod state;
mod text;

pub use context::{BookingFields, ConversationContext, DEFAULT_CONTEXT_TTL_MINUTES};
pub use extractor::EntityExtractor;
pub use intent::{AgentAction, Intent, IntentError};
pub use replies::Confirmation;
pub use state::DialogueState;
