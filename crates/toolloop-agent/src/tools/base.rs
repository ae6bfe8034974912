//! Tool trait: the interface every agent tool implements.

use serde_json::Value;
use std::collections::HashMap;

use toolloop_core::types::ToolDefinition;

// ─────────────────────────────────────────────
// Tool trait
// ─────────────────────────────────────────────

/// Every agent tool implements this trait.
///
/// `S` is the agent's auxiliary state (the drafter's document, for example).
/// Tools are the only code allowed to mutate it. Execution is synchronous:
/// the tool finishes before the loop resolves the next invocation.
pub trait Tool<S = ()>: Send + Sync {
    /// Unique name used by the model to call this tool (e.g. `"save"`).
    fn name(&self) -> &str;

    /// Human-readable description shown to the model.
    fn description(&self) -> &str;

    /// JSON Schema describing the parameters.
    ///
    /// Must be `{"type": "object", "properties": {...}, "required": [...]}`.
    fn parameters(&self) -> Value;

    /// Execute the tool with already-validated arguments.
    ///
    /// Returns the text the model reads. An `Err` is caught by the executor
    /// and reported back to the model as an error message.
    fn execute(&self, params: &HashMap<String, Value>, state: &mut S) -> anyhow::Result<String>;

    /// Build the `ToolDefinition` sent to the model.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description(), self.parameters())
    }
}

// ─────────────────────────────────────────────
// Param helpers
// ─────────────────────────────────────────────

/// Extract a required `String` param, returning a user-friendly error.
pub fn require_string(params: &HashMap<String, Value>, key: &str) -> anyhow::Result<String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| anyhow::anyhow!("Missing required parameter: {key}"))
}

/// Extract a required integer param that fits in an `i64`.
pub fn require_i64(params: &HashMap<String, Value>, key: &str) -> anyhow::Result<i64> {
    let value = params
        .get(key)
        .ok_or_else(|| anyhow::anyhow!("Missing required integer parameter: {key}"))?;
    value
        .as_i64()
        .ok_or_else(|| anyhow::anyhow!("Parameter {key} is not a valid 64-bit integer: {value}"))
}
