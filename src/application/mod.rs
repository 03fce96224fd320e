//! Application layer - Commands, Handlers, and LLM orchestration.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Prompt assembly, structured-output parsing, and the crisis screen live
//! here beside the handlers they serve.

pub mod handlers;
pub mod prompts;
pub mod safety;
pub mod structured;

pub use handlers::{
    ChatTurnCommand, ChatTurnError, ChatTurnHandler, ChatTurnResult, GateOutcome,
    GetConversationError, GetConversationHandler, GetConversationQuery, GetConversationResult,
    MemoryUpdateCommand, MemoryUpdateError, MemoryUpdateHandler, MemoryUpdateResult,
    OpenConversationCommand, OpenConversationError, OpenConversationHandler,
    OpenConversationResult, TurnConfig, TurnRoute,
};
pub use safety::{CrisisAssessment, CrisisScreen, ScreenSource};
pub use structured::complete_structured;
