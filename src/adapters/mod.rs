//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `clock` - System and manual clocks
//! - `memory` - In-memory catalog, client directory and appointment store
//! - `conversation` - Conversation stores (in-memory, Redis)
//! - `postgres` - PostgreSQL persistence
//! - `http` - Axum REST API

mod clock;
pub mod conversation;
pub mod http;
pub mod memory;
pub mod postgres;

pub use clock::{ManualClock, SystemClock};
pub use conversation::{InMemoryConversationStore, RedisConversationStore};
pub use memory::{InMemoryAppointmentStore, InMemoryCatalog, InMemoryClientDirectory};
pub use postgres::{PostgresAppointmentStore, PostgresCatalog, PostgresClientDirectory};
