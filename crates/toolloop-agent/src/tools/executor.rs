//! Tool Executor: resolves one invocation into one `tool` message.
//!
//! Every failure (unknown tool, bad arguments, tool error) becomes message
//! content the model can read. Nothing here aborts a run.

use tracing::{debug, info, warn};

use toolloop_core::types::{Message, ToolCall};
use toolloop_core::utils::truncate_string;

use super::registry::ToolRegistry;
use super::schema::{parse_arguments, validate_arguments};
use crate::error::ToolError;

/// Result of resolving one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutcome {
    /// The `tool` message correlated to the invocation.
    pub message: Message,
    /// Set when the invocation failed; the text is already in `message`.
    pub error: Option<ToolError>,
}

impl ToolOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Executes invocations against a registry.
pub struct ToolExecutor<'a, S> {
    registry: &'a ToolRegistry<S>,
}

impl<'a, S> ToolExecutor<'a, S> {
    pub fn new(registry: &'a ToolRegistry<S>) -> Self {
        Self { registry }
    }

    /// Look up, validate, and run one invocation.
    pub fn execute(&self, call: &ToolCall, state: &mut S) -> ToolOutcome {
        match self.try_execute(call, state) {
            Ok(content) => {
                info!(tool = %call.name(), call_id = %call.id, "tool executed");
                debug!(tool = %call.name(), result = %truncate_string(&content, 200), "tool result");
                ToolOutcome {
                    message: Message::tool_result(&call.id, content),
                    error: None,
                }
            }
            Err(err) => {
                warn!(tool = %call.name(), call_id = %call.id, error = %err, "tool invocation failed");
                ToolOutcome {
                    message: Message::tool_result(&call.id, err.to_string()),
                    error: Some(err),
                }
            }
        }
    }

    fn try_execute(&self, call: &ToolCall, state: &mut S) -> Result<String, ToolError> {
        let name = call.name();
        let tool = self.registry.lookup(name)?;

        let invalid = |reason: String| ToolError::InvalidArguments {
            tool: name.to_string(),
            reason,
        };
        let params = parse_arguments(&call.function.arguments).map_err(invalid)?;
        validate_arguments(&tool.parameters(), &params).map_err(invalid)?;

        tool.execute(&params, state).map_err(|e| ToolError::Execution {
            tool: name.to_string(),
            reason: format!("{e:#}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Arc;

    use tempfile::TempDir;

    use crate::tools::base::{require_string, Tool};
    use crate::tools::calculator::ArithmeticTool;
    use crate::tools::document::{Draft, SaveTool};

    /// Appends its argument to a shared log.
    struct PushTool;

    impl Tool<Vec<String>> for PushTool {
        fn name(&self) -> &str {
            "push"
        }
        fn description(&self) -> &str {
            "Push an item"
        }
        fn parameters(&self) -> Value {
            json!({
                "type": "object",
                "properties": {
                    "item": { "type": "string" },
                    "priority": { "type": "string", "enum": ["low", "high"] }
                },
                "required": ["item"]
            })
        }
        fn execute(&self, params: &HashMap<String, Value>, state: &mut Vec<String>) -> anyhow::Result<String> {
            let item = require_string(params, "item")?;
            state.push(item);
            Ok(format!("{} item(s)", state.len()))
        }
    }

    struct FailTool;

    impl Tool<Vec<String>> for FailTool {
        fn name(&self) -> &str {
            "fail"
        }
        fn description(&self) -> &str {
            "Always fails"
        }
        fn parameters(&self) -> Value {
            json!({"type": "object", "properties": {}})
        }
        fn execute(&self, _params: &HashMap<String, Value>, _state: &mut Vec<String>) -> anyhow::Result<String> {
            Err(anyhow::anyhow!("disk on fire").context("could not write"))
        }
    }

    fn registry() -> ToolRegistry<Vec<String>> {
        let mut reg: ToolRegistry<Vec<String>> = ToolRegistry::new();
        reg.register(Arc::new(PushTool)).unwrap();
        reg.register(Arc::new(FailTool)).unwrap();
        reg
    }

    #[test]
    fn test_success_produces_correlated_message() {
        let reg = registry();
        let mut log = Vec::new();
        let outcome = ToolExecutor::new(&reg).execute(&ToolCall::new("c1", "push", r#"{"item":"x"}"#), &mut log);

        assert!(outcome.succeeded());
        assert_eq!(outcome.message, Message::tool_result("c1", "1 item(s)"));
        assert_eq!(log, vec!["x"]);
    }

    #[test]
    fn test_unknown_tool_is_content() {
        let reg = registry();
        let outcome = ToolExecutor::new(&reg).execute(&ToolCall::new("c1", "subtract_wrong", "{}"), &mut Vec::new());

        assert_eq!(outcome.error, Some(ToolError::Unknown("subtract_wrong".into())));
        assert_eq!(outcome.message.role(), "tool");
        assert_eq!(outcome.message.tool_call_id(), Some("c1"));
        assert_eq!(outcome.message.content(), "Error: Tool 'subtract_wrong' not found");
    }

    #[test]
    fn test_invalid_arguments_do_not_run_tool() {
        let reg = registry();
        let mut log = Vec::new();
        let outcome = ToolExecutor::new(&reg).execute(&ToolCall::new("c1", "push", r#"{"item": 5}"#), &mut log);

        assert!(matches!(outcome.error, Some(ToolError::InvalidArguments { .. })));
        assert_eq!(
            outcome.message.content(),
            r#"Error: Invalid arguments for push: 5 is not of type "string""#
        );
        assert!(log.is_empty());
    }

    #[test]
    fn test_enum_violation_is_content() {
        let reg = registry();
        let mut log = Vec::new();
        let call = ToolCall::new("c1", "push", r#"{"item":"x","priority":"urgent"}"#);
        let outcome = ToolExecutor::new(&reg).execute(&call, &mut log);

        assert!(matches!(outcome.error, Some(ToolError::InvalidArguments { .. })));
        let content = outcome.message.content();
        assert!(content.starts_with("Error: Invalid arguments for push: "), "{content}");
        assert!(content.contains("urgent"), "{content}");
        assert!(log.is_empty());
    }

    #[test]
    fn test_malformed_json_arguments() {
        let reg = registry();
        let outcome = ToolExecutor::new(&reg).execute(&ToolCall::new("c1", "push", "not json"), &mut Vec::new());
        assert!(outcome
            .message
            .content()
            .starts_with("Error: Invalid arguments for push: arguments are not valid JSON"));
    }

    #[test]
    fn test_execution_error_keeps_cause_chain() {
        let reg = registry();
        let outcome = ToolExecutor::new(&reg).execute(&ToolCall::new("c9", "fail", ""), &mut Vec::new());

        assert!(!outcome.succeeded());
        assert_eq!(
            outcome.message.content(),
            "Error executing fail: could not write: disk on fire"
        );
    }

    #[test]
    fn test_unknown_tool_is_idempotent() {
        let reg = registry();
        let exec = ToolExecutor::new(&reg);
        let call = ToolCall::new("c1", "nope", "{}");
        let first = exec.execute(&call, &mut Vec::new());
        let second = exec.execute(&call, &mut Vec::new());
        assert_eq!(first, second);
    }

    #[test]
    fn test_pure_invocation_is_idempotent() {
        let reg = ToolRegistry::<()>::new()
            .with_tool(Arc::new(ArithmeticTool::add()))
            .unwrap();
        let exec = ToolExecutor::new(&reg);
        let call = ToolCall::new("c1", "add", r#"{"a":40,"b":12}"#);

        let first = exec.execute(&call, &mut ());
        let second = exec.execute(&call, &mut ());

        assert_eq!(first.message.content(), "52");
        assert_eq!(first, second);
    }

    #[test]
    fn test_repeated_save_rewrites_file() {
        let tmp = TempDir::new().unwrap();
        let reg = ToolRegistry::<Draft>::new()
            .with_tool(Arc::new(SaveTool))
            .unwrap();
        let exec = ToolExecutor::new(&reg);
        let mut draft = Draft::new(tmp.path());
        draft.document = "Quarterly plan".into();
        let call = ToolCall::new("c1", "save", r#"{"filename":"plan"}"#);
        let path = tmp.path().join("plan.txt");

        for _ in 0..2 {
            let outcome = exec.execute(&call, &mut draft);
            assert!(outcome.succeeded(), "{}", outcome.message.content());
            assert_eq!(std::fs::read_to_string(&path).unwrap(), "Quarterly plan");
            assert_eq!(draft.saved_to.as_deref(), Some(path.as_path()));
        }
    }

    #[test]
    fn test_integer_outside_i64_rejected_before_execution() {
        let reg = ToolRegistry::<()>::new()
            .with_tool(Arc::new(ArithmeticTool::add()))
            .unwrap();
        let call = ToolCall::new("c1", "add", r#"{"a":18446744073709551615,"b":1}"#);
        let outcome = ToolExecutor::new(&reg).execute(&call, &mut ());

        assert!(matches!(outcome.error, Some(ToolError::InvalidArguments { .. })));
        let content = outcome.message.content();
        assert!(content.starts_with("Error: Invalid arguments for add: "), "{content}");
        assert!(content.contains("18446744073709551615"), "{content}");
    }
}
