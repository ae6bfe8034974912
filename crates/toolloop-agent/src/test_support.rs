//! Scripted gateway shared by the loop and agent tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use toolloop_core::types::{LlmResponse, Message, ToolCall, ToolDefinition};
use toolloop_core::GatewayError;
use toolloop_providers::ModelGateway;

/// Replays canned replies and records every request it receives.
pub struct ScriptedGateway {
    replies: Mutex<VecDeque<Result<LlmResponse, GatewayError>>>,
    seen: Mutex<Vec<Vec<Message>>>,
    tools_seen: Mutex<Vec<Vec<String>>>,
}

impl ScriptedGateway {
    pub fn new(replies: Vec<LlmResponse>) -> Self {
        Self::with_results(replies.into_iter().map(Ok).collect())
    }

    pub fn with_results(replies: Vec<Result<LlmResponse, GatewayError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            seen: Mutex::new(Vec::new()),
            tools_seen: Mutex::new(Vec::new()),
        }
    }

    /// Conversations passed to `send`, one per call.
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.seen.lock().unwrap().clone()
    }

    /// Tool names offered on each call.
    pub fn offered_tools(&self) -> Vec<Vec<String>> {
        self.tools_seen.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    async fn send(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<LlmResponse, GatewayError> {
        self.seen.lock().unwrap().push(messages.to_vec());
        self.tools_seen
            .lock()
            .unwrap()
            .push(tools.iter().map(|t| t.function.name.clone()).collect());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Unavailable("script exhausted".into())))
    }

    fn model(&self) -> &str {
        "scripted"
    }

    fn display_name(&self) -> &str {
        "Scripted"
    }
}

/// A reply requesting the given `(id, name, arguments)` invocations.
pub fn calls(content: Option<&str>, invocations: &[(&str, &str, &str)]) -> LlmResponse {
    LlmResponse::with_tool_calls(
        content.map(str::to_string),
        invocations
            .iter()
            .map(|(id, name, args)| ToolCall::new(*id, *name, *args))
            .collect(),
    )
}
