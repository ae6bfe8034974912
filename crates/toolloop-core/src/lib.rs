//! Toolloop core: conversation types, gateway errors, configuration, and
//! path helpers shared by every other crate in the workspace.

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use error::GatewayError;
pub use types::{LlmResponse, Message, ToolCall, ToolDefinition};
