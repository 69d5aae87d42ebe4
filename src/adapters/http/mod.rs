//! HTTP adapters - REST API implementations.
//!
//! Each use-case group has its own adapter (DTOs, handlers, routes);
//! `router` assembles them with the shared middleware stack.

pub mod booking;
pub mod chat;
pub mod error;
mod router;

pub use booking::{booking_routes, BookingHandlers};
pub use chat::{chat_routes, ChatHandlers};
pub use error::ErrorResponse;
pub use router::{build_router, RouterSettings};
