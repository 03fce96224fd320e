//! Storage adapters.

mod in_memory;

pub use in_memory::{InMemoryConversationStore, InMemoryMemoryStore};
