//! Conversation store adapters.
//!
//! - `in_memory` - Single-process store for tests and development
//! - `redis` - Shared store for multi-instance deployments

mod in_memory;
mod redis;

pub use self::redis::RedisConversationStore;
pub use in_memory::InMemoryConversationStore;
