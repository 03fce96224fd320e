//! Heartline - AI psychological check-in assistant
//!
//! This crate implements the dialogue orchestration core: intent routing,
//! Socratic gap-filling assessment, skill recommendation with a strict
//! output contract, and a two-layer crisis safety gate.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
