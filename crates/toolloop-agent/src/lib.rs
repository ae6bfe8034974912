//! Toolloop Agent: the tool-calling conversation loop.
//!
//! This crate contains:
//! - **tools**: Tool trait, registry, argument validation, executor, built-in tools
//! - **conversation**: the append-only message log with call correlation
//! - **agent_loop**: the model ↔ tool state machine
//! - **agents**: the chat, react, and drafter variants
//! - **transcript**: the memory driver's log file

pub mod agent_loop;
pub mod agents;
pub mod conversation;
pub mod error;
pub mod tools;
pub mod transcript;

#[cfg(test)]
pub(crate) mod test_support;

pub use agent_loop::{AgentLoop, LoopState, Run, RunOutcome, Termination};
pub use conversation::Conversation;
pub use error::{ConversationError, RegistryError, RunError, ToolError};
pub use tools::{Draft, Tool, ToolExecutor, ToolOutcome, ToolRegistry};
