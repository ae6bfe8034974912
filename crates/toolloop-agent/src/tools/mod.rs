//! Tools: trait, registry, argument validation, executor, and built-ins.

pub mod base;
pub mod calculator;
pub mod document;
pub mod executor;
pub mod registry;
pub mod schema;

pub use base::Tool;
pub use calculator::ArithmeticTool;
pub use document::{Draft, SaveTool, UpdateTool};
pub use executor::{ToolExecutor, ToolOutcome};
pub use registry::ToolRegistry;
