//! Error taxonomy for tools, the registry, conversations, and runs.
//!
//! `ToolError` never aborts a run: the executor turns it into a `tool`
//! message the model can read. `RunError` always does.

use thiserror::Error;
use toolloop_core::GatewayError;

/// Failure of a single tool invocation. Its `Display` text is exactly what
/// the model sees in the resulting `tool` message.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ToolError {
    #[error("Error: Tool '{0}' not found")]
    Unknown(String),

    #[error("Error: Invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },

    #[error("Error executing {tool}: {reason}")]
    Execution { tool: String, reason: String },
}

/// Registry construction failure. Raised at startup, never during a run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RegistryError {
    #[error("tool '{0}' is already registered")]
    DuplicateTool(String),
}

/// A message that would break tool-call correlation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConversationError {
    #[error("tool result '{0}' does not match any unresolved invocation")]
    UnmatchedToolResult(String),

    #[error("{} tool invocation(s) still unresolved: {}", .0.len(), .0.join(", "))]
    Unresolved(Vec<String>),
}

/// Failure that ends a run without reaching `DONE`.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("run exceeded {0} model calls without finishing")]
    IterationLimit(usize),

    #[error(transparent)]
    Conversation(#[from] ConversationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_text() {
        assert_eq!(
            ToolError::Unknown("subtract_wrong".into()).to_string(),
            "Error: Tool 'subtract_wrong' not found"
        );
        assert_eq!(
            ToolError::Execution {
                tool: "save".into(),
                reason: "disk full".into()
            }
            .to_string(),
            "Error executing save: disk full"
        );
    }

    #[test]
    fn test_unresolved_lists_ids() {
        let err = ConversationError::Unresolved(vec!["c1".into(), "c2".into()]);
        assert_eq!(err.to_string(), "2 tool invocation(s) still unresolved: c1, c2");
    }

    #[test]
    fn test_gateway_error_converts() {
        let err: RunError = GatewayError::RateLimited("429".into()).into();
        assert!(matches!(err, RunError::Gateway(GatewayError::RateLimited(_))));
    }
}
