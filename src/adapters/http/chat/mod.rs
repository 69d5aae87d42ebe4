//! Chat HTTP adapter.

pub mod dto;
mod handlers;
mod routes;

pub use handlers::ChatHandlers;
pub use routes::chat_routes;
