//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Configuration Feeds
//!
//! - `ServiceCatalog` - Bookable services with price and duration
//! - `WorkingHoursCatalog` - Weekly work intervals
//!
//! ## Persistence
//!
//! - `ClientDirectory` - Clients by phone number
//! - `AppointmentStore` - Appointments with atomic reserve-or-fail
//! - `ConversationStore` - Per-phone dialogue context with TTL
//!
//! ## Infrastructure
//!
//! - `Clock` - Injectable time source

mod appointment_store;
mod catalog;
mod client_directory;
mod clock;
mod conversation_store;

pub use appointment_store::{AppointmentStore, ReserveOutcome};
pub use catalog::{ServiceCatalog, WorkingHoursCatalog};
pub use client_directory::ClientDirectory;
pub use clock::Clock;
pub use conversation_store::ConversationStore;
