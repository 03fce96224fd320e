//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `llm` - Language model clients (OpenAI-compatible, mock)
//! - `store` - Conversation and memory persistence (in-memory)
//! - `exemplars` - Curated reference-reply lookup
//! - `http` - Axum routes, handlers and DTOs

pub mod exemplars;
pub mod http;
pub mod llm;
pub mod store;

pub use exemplars::InMemoryExemplarIndex;
pub use llm::{MockLanguageModel, OpenAiCompatConfig, OpenAiCompatProvider};
pub use store::{InMemoryConversationStore, InMemoryMemoryStore};
