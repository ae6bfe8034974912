//! Generic HTTP model gateway for OpenAI-compatible APIs.
//!
//! Talks directly to any `/chat/completions` endpoint: OpenAI, Gemini's
//! OpenAI surface, DeepSeek, Groq, OpenRouter, Anthropic, self-hosted vLLM.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::StatusCode;
use tracing::{debug, error, warn};

use toolloop_core::types::{
    ChatCompletionRequest, ChatCompletionResponse, LlmResponse, Message, ToolDefinition,
};
use toolloop_core::GatewayError;

use crate::registry::{resolve_model_name, ProviderConfig, ProviderSpec};
use crate::traits::{LlmRequestConfig, ModelGateway};

/// Request timeout for a single completion call.
const REQUEST_TIMEOUT_SECS: u64 = 120;

// ─────────────────────────────────────────────
// HttpGateway
// ─────────────────────────────────────────────

/// A model gateway that talks to any OpenAI-compatible HTTP API.
pub struct HttpGateway {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    /// API base URL (e.g. `"https://api.openai.com/v1"`).
    api_base: String,
    /// API key for Bearer authentication.
    api_key: String,
    /// Model identifier as configured by the user.
    model: String,
    /// Sampling parameters sent with every call.
    request_config: LlmRequestConfig,
    /// Extra headers to send with each request.
    extra_headers: HeaderMap,
    /// Provider spec for model resolution and display.
    spec: &'static ProviderSpec,
}

impl std::fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGateway")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("provider", &self.spec.display_name)
            .finish()
    }
}

impl HttpGateway {
    /// Create a gateway from a provider config and spec.
    pub fn new(
        config: &ProviderConfig,
        spec: &'static ProviderSpec,
        model: &str,
        request_config: LlmRequestConfig,
    ) -> Self {
        // config > spec default > standard OpenAI path
        let api_base = config
            .api_base
            .clone()
            .or_else(|| spec.default_api_base.map(String::from))
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string());

        let mut extra_headers = HeaderMap::new();
        if let Some(ref headers) = config.extra_headers {
            for (key, value) in headers {
                match (
                    HeaderName::from_bytes(key.as_bytes()),
                    HeaderValue::from_str(value),
                ) {
                    (Ok(name), Ok(val)) => {
                        extra_headers.insert(name, val);
                    }
                    _ => warn!("Invalid header: {}={}", key, value),
                }
            }
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "falling back to default HTTP client");
                reqwest::Client::new()
            });

        HttpGateway {
            client,
            api_base,
            api_key: config.api_key.clone(),
            model: model.to_string(),
            request_config,
            extra_headers,
            spec,
        }
    }

    /// Build the full chat completions URL.
    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }

    fn request_body(&self, messages: &[Message], tools: &[ToolDefinition]) -> ChatCompletionRequest {
        let tools = (!tools.is_empty()).then(|| tools.to_vec());
        ChatCompletionRequest {
            model: resolve_model_name(&self.model, self.spec),
            messages: messages.to_vec(),
            tool_choice: tools.as_ref().map(|_| "auto".to_string()),
            tools,
            max_tokens: Some(self.request_config.max_tokens),
            temperature: Some(self.request_config.temperature),
        }
    }
}

/// Classify a non-success HTTP status.
fn status_error(status: StatusCode, body: String) -> GatewayError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        GatewayError::RateLimited(body)
    } else if status.is_server_error() {
        GatewayError::Unavailable(format!("{status}: {body}"))
    } else {
        GatewayError::Api {
            status: status.as_u16(),
            body,
        }
    }
}

#[async_trait]
impl ModelGateway for HttpGateway {
    async fn send(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<LlmResponse, GatewayError> {
        let body = self.request_body(messages, tools);

        debug!(
            provider = self.spec.display_name,
            model = %body.model,
            messages = messages.len(),
            tools = tools.len(),
            "Calling model gateway"
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .headers(self.extra_headers.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = self.spec.display_name, error = %e, "HTTP request failed");
                GatewayError::Unavailable(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(
                provider = self.spec.display_name,
                status = %status,
                body = %error_text,
                "API error"
            );
            return Err(status_error(status, error_text));
        }

        let parsed = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| {
                error!(provider = self.spec.display_name, error = %e, "Failed to parse response");
                GatewayError::InvalidResponse(e.to_string())
            })?;

        let reply = parsed
            .into_response()
            .ok_or_else(|| GatewayError::InvalidResponse("no choices in response".into()))?;

        debug!(
            provider = self.spec.display_name,
            has_content = reply.content.is_some(),
            tool_calls = reply.tool_calls.len(),
            finish_reason = reply.finish_reason.as_deref().unwrap_or("?"),
            "Model reply received"
        );
        Ok(reply)
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn display_name(&self) -> &str {
        self.spec.display_name
    }
}

// ─────────────────────────────────────────────
// Builder (convenience)
// ─────────────────────────────────────────────

/// Build an `HttpGateway` from a model name and a map of provider configs.
///
/// Matches the model to a configured provider, then creates the gateway.
pub fn create_gateway(
    model: &str,
    providers: &std::collections::HashMap<String, ProviderConfig>,
    request_config: LlmRequestConfig,
) -> Result<HttpGateway, String> {
    let (config, spec) = crate::registry::match_provider(model, providers).ok_or_else(|| {
        format!(
            "No configured provider found for model '{}'. \
             Set the appropriate API key (e.g. GEMINI_API_KEY, OPENAI_API_KEY).",
            model
        )
    })?;

    debug!(
        provider = spec.display_name,
        model = model,
        api_base = config.api_base.as_deref().unwrap_or("default"),
        "Creating model gateway"
    );

    Ok(HttpGateway::new(config, spec, model, request_config))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
