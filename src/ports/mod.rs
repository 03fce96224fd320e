//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `LanguageModel` - LLM completion service
//! - `ConversationStore` / `MemoryStore` - persistence boundary
//! - `ExemplarIndex` - golden-example retrieval

mod exemplar_index;
mod llm;
mod store;

pub use exemplar_index::{Exemplar, ExemplarIndex};
pub use llm::{ChatCompletion, ChatMessage, ChatRequest, LanguageModel, LlmError, MessageRole};
pub use store::{ConversationStore, MemoryStore, StoreError};
