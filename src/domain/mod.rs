//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `routing` - Intent routing, emotion signals and crisis prefiltering
//! - `intake` - Slot parsers, gap detection and the intake picture
//! - `socratic` - Question policy, slot tracker and the stage machine
//! - `skills` - Coping skill registry, selection and rendering
//! - `contract` - Output contract sanitizer, validator and crisis gate
//! - `memory` - Fact extraction types, forgetting curve, consolidation
//! - `conversation` - Conversation aggregate and turn state

pub mod contract;
pub mod conversation;
pub mod foundation;
pub mod intake;
pub mod memory;
pub mod routing;
pub mod skills;
pub mod socratic;
