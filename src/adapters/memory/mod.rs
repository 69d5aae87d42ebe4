//! In-memory adapters for tests and single-process development.

mod appointment_store;
mod catalog;
mod client_directory;

pub use appointment_store::InMemoryAppointmentStore;
pub use catalog::InMemoryCatalog;
pub use client_directory::InMemoryClientDirectory;
