//! Argument decoding and validation against a tool's JSON schema.

use serde_json::Value;
use std::collections::HashMap;

/// Decode the raw argument string the model sent.
///
/// An empty (or whitespace-only) string is treated as `{}`; anything that
/// is not a JSON object is rejected.
pub fn parse_arguments(raw: &str) -> Result<HashMap<String, Value>, String> {
    if raw.trim().is_empty() {
        return Ok(HashMap::new());
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map.into_iter().collect()),
        Ok(other) => Err(format!("expected a JSON object, got {}", type_name(&other))),
        Err(e) => Err(format!("arguments are not valid JSON ({e})")),
    }
}

/// Check decoded arguments against a parameter schema.
///
/// Every violation is reported, joined with `; `.
pub fn validate_arguments(schema: &Value, args: &HashMap<String, Value>) -> Result<(), String> {
    let validator =
        jsonschema::Validator::new(schema).map_err(|e| format!("invalid tool schema: {e}"))?;

    let instance = Value::Object(args.iter().map(|(k, v)| (k.clone(), v.clone())).collect());
    if validator.is_valid(&instance) {
        return Ok(());
    }
    let errors: Vec<String> = validator.iter_errors(&instance).map(|e| e.to_string()).collect();
    Err(errors.join("; "))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
