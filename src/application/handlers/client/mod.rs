//! Client command handlers.

mod register_client;

pub use register_client::{RegisterClientCommand, RegisterClientHandler};
