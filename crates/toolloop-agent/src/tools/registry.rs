//! Tool Registry: maps tool names to implementations.
//!
//! Built once per agent variant and read-only for the duration of a run.

use std::collections::HashMap;
use std::sync::Arc;

use toolloop_core::types::ToolDefinition;
use tracing::info;

use super::base::Tool;
use crate::error::{RegistryError, ToolError};

// ─────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────

/// Stores tools keyed by name.
///
/// Owns `Arc<dyn Tool<S>>` so one tool value can back several registries.
pub struct ToolRegistry<S = ()> {
    tools: HashMap<String, Arc<dyn Tool<S>>>,
}

impl<S> ToolRegistry<S> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Fails if the name is already taken.
    pub fn register(&mut self, tool: Arc<dyn Tool<S>>) -> Result<(), RegistryError> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(RegistryError::DuplicateTool(name));
        }
        info!(tool = %name, "registered tool");
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_tool(mut self, tool: Arc<dyn Tool<S>>) -> Result<Self, RegistryError> {
        self.register(tool)?;
        Ok(self)
    }

    /// Look up a tool by name.
    pub fn lookup(&self, name: &str) -> Result<&Arc<dyn Tool<S>>, ToolError> {
        self.tools
            .get(name)
            .ok_or_else(|| ToolError::Unknown(name.to_string()))
    }

    /// Names of all registered tools, sorted for determinism.
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Model-facing definitions of every tool, sorted by name.
    ///
    /// Each call builds a fresh iterator; nothing is cached between calls.
    pub fn describe_all(&self) -> impl Iterator<Item = ToolDefinition> + '_ {
        let mut tools: Vec<&Arc<dyn Tool<S>>> = self.tools.values().collect();
        tools.sort_by(|a, b| a.name().cmp(b.name()));
        tools.into_iter().map(|t| t.to_definition())
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl<S> Default for ToolRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}
