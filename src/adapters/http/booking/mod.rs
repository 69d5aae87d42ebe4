//! Booking HTTP adapter.

pub mod dto;
mod handlers;
mod routes;

pub use handlers::BookingHandlers;
pub use routes::booking_routes;
