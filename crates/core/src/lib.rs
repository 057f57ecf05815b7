//! # rummage core
//!
//! Domain types, traits, and error definitions for the rummage research
//! agent. This crate has **zero framework dependencies** — it defines the
//! domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The two external collaborators — the remote language model and the search
//! backends — are defined as traits here (`ModelClient`, `Tool`).
//! Implementations live in their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Testing the turn state machine with scripted mocks
//! - A clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod event;
pub mod message;
pub mod model;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ModelError, Result, ToolError};
pub use event::{EventBus, TurnEvent};
pub use message::{Conversation, Message, MessageToolCall, Role};
pub use model::{ModelClient, ModelRequest, ModelResponse, ToolDefinition, Usage};
pub use tool::{Tool, ToolCall, ToolOutcome, ToolRegistry};
