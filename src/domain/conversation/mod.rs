//! Conversation domain module.
//!
//! The conversation aggregate, its message history and the turn-level
//! state exposed on the wire.

mod conversation;
mod message;
mod state;

pub use conversation::Conversation;
pub use message::{Message, Role};
pub use state::TurnState;
