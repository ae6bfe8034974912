//! Integer arithmetic tools used by the react agent.

use serde_json::{json, Value};
use std::collections::HashMap;

use super::base::{require_i64, Tool};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
}

impl Operation {
    fn apply(self, a: i64, b: i64) -> Option<i64> {
        match self {
            Operation::Add => a.checked_add(b),
            Operation::Subtract => a.checked_sub(b),
            Operation::Multiply => a.checked_mul(b),
        }
    }
}

/// `add(a, b)`, `subtract(a, b)` or `multiply(a, b)` on integers.
///
/// Stateless, so it can be registered for any auxiliary state type.
pub struct ArithmeticTool {
    op: Operation,
}

impl ArithmeticTool {
    pub fn new(op: Operation) -> Self {
        Self { op }
    }

    pub fn add() -> Self {
        Self::new(Operation::Add)
    }

    pub fn subtract() -> Self {
        Self::new(Operation::Subtract)
    }

    pub fn multiply() -> Self {
        Self::new(Operation::Multiply)
    }
}

impl<S> Tool<S> for ArithmeticTool {
    fn name(&self) -> &str {
        match self.op {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
        }
    }

    fn description(&self) -> &str {
        match self.op {
            Operation::Add => "Add two integers together.",
            Operation::Subtract => "Subtract the second integer from the first.",
            Operation::Multiply => "Multiply two integers.",
        }
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "a": {
                    "type": "integer",
                    "minimum": i64::MIN,
                    "maximum": i64::MAX,
                    "description": "First operand"
                },
                "b": {
                    "type": "integer",
                    "minimum": i64::MIN,
                    "maximum": i64::MAX,
                    "description": "Second operand"
                }
            },
            "required": ["a", "b"],
            "additionalProperties": false
        })
    }

    fn execute(&self, params: &HashMap<String, Value>, _state: &mut S) -> anyhow::Result<String> {
        let a = require_i64(params, "a")?;
        let b = require_i64(params, "b")?;
        self.op
            .apply(a, b)
            .map(|n| n.to_string())
            .ok_or_else(|| anyhow::anyhow!("integer overflow"))
    }
}
