//! Model gateway trait: the boundary between the orchestration loop and a
//! hosted language model.
//!
//! `HttpGateway` in `http_gateway.rs` covers every OpenAI-compatible API;
//! `RetryingGateway` in `retry.rs` decorates any gateway with backoff.

use async_trait::async_trait;
use toolloop_core::types::{LlmResponse, Message, ToolDefinition};
use toolloop_core::GatewayError;

/// Sampling parameters passed with each call.
#[derive(Clone, Debug, PartialEq)]
pub struct LlmRequestConfig {
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
}

impl Default for LlmRequestConfig {
    fn default() -> Self {
        Self {
            max_tokens: 1000,
            temperature: 0.3,
        }
    }
}

/// A hosted model that answers a conversation.
///
/// Implementations hold no conversational memory: everything the model
/// sees is in `messages`.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Send the conversation plus the available tool descriptions.
    ///
    /// Returns the model's reply: text, tool invocations, or both.
    /// Transport and provider failures are returned as `GatewayError`.
    async fn send(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<LlmResponse, GatewayError>;

    /// Model identifier used for calls.
    fn model(&self) -> &str;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}
