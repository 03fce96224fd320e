//! Application handlers.
//!
//! Command handlers that orchestrate domain operations through ports.

pub mod chat_turn;
pub mod get_conversation;
pub mod memory_update;
pub mod open_conversation;

pub use chat_turn::{
    ChatTurnCommand, ChatTurnError, ChatTurnHandler, ChatTurnResult, GateOutcome, TurnConfig,
    TurnRoute,
};
pub use get_conversation::{
    GetConversationError, GetConversationHandler, GetConversationQuery, GetConversationResult,
};
pub use memory_update::{
    MemoryUpdateCommand, MemoryUpdateError, MemoryUpdateHandler, MemoryUpdateResult,
};
pub use open_conversation::{
    OpenConversationCommand, OpenConversationError, OpenConversationHandler,
    OpenConversationResult,
};
