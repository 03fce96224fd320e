//! HTTP adapters - REST API for the check-in dialogue.
//!
//! Exposes the conversation lifecycle and chat-turn endpoints.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::AppState;
pub use routes::routes;
