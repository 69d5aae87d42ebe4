//! PostgreSQL adapters - Database implementations of the booking ports.
//!
//! - `PostgresCatalog` - services and working hours (read-only)
//! - `PostgresClientDirectory` - clients keyed by phone
//! - `PostgresAppointmentStore` - appointments with reserve-or-fail inserts

mod appointment_store;
mod catalog;
mod client_directory;

pub use appointment_store::PostgresAppointmentStore;
pub use catalog::PostgresCatalog;
pub use client_directory::PostgresClientDirectory;
