//! Exemplar retrieval adapters.

mod in_memory;

pub use in_memory::InMemoryExemplarIndex;
