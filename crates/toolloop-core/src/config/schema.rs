//! Configuration schema.
//!
//! Hierarchy: `Config` → `AgentConfig`, `ProvidersConfig`, `RetryConfig`,
//! `TranscriptConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration: loaded from `~/.toolloop/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub agent: AgentConfig,
    pub providers: ProvidersConfig,
    pub retry: RetryConfig,
    pub transcript: TranscriptConfig,
}

// ─────────────────────────────────────────────
// Agent
// ─────────────────────────────────────────────

/// Settings shared by every agent variant.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentConfig {
    /// Directory the drafter saves documents into.
    pub workspace: String,
    /// Model identifier sent to the gateway.
    pub model: String,
    /// Maximum tokens to generate per reply.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
    /// Gateway calls allowed in one run before it is aborted.
    pub max_tool_iterations: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            workspace: "~/.toolloop/workspace".to_string(),
            model: "gemini-2.0-flash".to_string(),
            max_tokens: 1000,
            temperature: 0.3,
            max_tool_iterations: 20,
        }
    }
}

// ─────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────

/// Configuration for a single model provider (API key, base URL, headers).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    /// API key for authentication.
    #[serde(default)]
    pub api_key: String,
    /// Custom API base URL (overrides provider default).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Extra HTTP headers to send with each request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_headers: Option<HashMap<String, String>>,
}

impl ProviderConfig {
    /// Whether this provider has a configured API key.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// All provider configurations, one per supported backend.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProvidersConfig {
    pub openrouter: ProviderConfig,
    pub anthropic: ProviderConfig,
    pub openai: ProviderConfig,
    pub deepseek: ProviderConfig,
    pub gemini: ProviderConfig,
    pub groq: ProviderConfig,
    pub vllm: ProviderConfig,
}

impl ProvidersConfig {
    /// `(name, config)` pairs in provider-registry order.
    pub fn entries(&self) -> [(&'static str, &ProviderConfig); 7] {
        [
            ("openrouter", &self.openrouter),
            ("anthropic", &self.anthropic),
            ("openai", &self.openai),
            ("deepseek", &self.deepseek),
            ("gemini", &self.gemini),
            ("groq", &self.groq),
            ("vllm", &self.vllm),
        ]
    }

    /// Mutable access by provider name (e.g. `"gemini"`).
    pub fn get_mut(&mut self, name: &str) -> Option<&mut ProviderConfig> {
        match name {
            "openrouter" => Some(&mut self.openrouter),
            "anthropic" => Some(&mut self.anthropic),
            "openai" => Some(&mut self.openai),
            "deepseek" => Some(&mut self.deepseek),
            "gemini" => Some(&mut self.gemini),
            "groq" => Some(&mut self.groq),
            "vllm" => Some(&mut self.vllm),
            _ => None,
        }
    }

    /// Get a provider config by name.
    pub fn get_by_name(&self, name: &str) -> Option<&ProviderConfig> {
        self.entries()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, c)| c)
    }

    /// Convert to a `HashMap` for use with the provider registry.
    pub fn to_map(&self) -> HashMap<String, ProviderConfig> {
        self.entries()
            .into_iter()
            .map(|(name, config)| (name.to_string(), config.clone()))
            .collect()
    }
}

// ─────────────────────────────────────────────
// Retry
// ─────────────────────────────────────────────

/// Caller-side retry policy wrapped around the model gateway.
///
/// The orchestration loop itself never retries.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RetryConfig {
    /// Attempts per gateway call (1 disables retrying).
    pub max_attempts: u32,
    /// Backoff before the first retry.
    pub initial_backoff_ms: u64,
    /// Upper bound for any single backoff.
    pub max_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            initial_backoff_ms: 250,
            max_backoff_ms: 2_000,
        }
    }
}

// ─────────────────────────────────────────────
// Transcript
// ─────────────────────────────────────────────

/// Where the memory agent writes its conversation log on exit.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranscriptConfig {
    pub path: String,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            path: "logging.txt".to_string(),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_scripts() {
        let config = Config::default();
        assert_eq!(config.agent.model, "gemini-2.0-flash");
        assert_eq!(config.agent.max_tokens, 1000);
        assert_eq!(config.agent.temperature, 0.3);
        assert_eq!(config.agent.max_tool_iterations, 20);
        assert_eq!(config.transcript.path, "logging.txt");
    }

    #[test]
    fn test_provider_lookup() {
        let mut providers = ProvidersConfig::default();
        providers.gemini.api_key = "g-123".to_string();

        assert!(providers.get_by_name("gemini").unwrap().is_configured());
        assert!(!providers.get_by_name("openai").unwrap().is_configured());
        assert!(providers.get_by_name("nonexistent").is_none());
    }

    #[test]
    fn test_get_mut_and_map() {
        let mut providers = ProvidersConfig::default();
        providers.get_mut("groq").unwrap().api_key = "gsk".into();
        assert!(providers.get_mut("unknown").is_none());

        let map = providers.to_map();
        assert_eq!(map.len(), 7);
        assert_eq!(map["groq"].api_key, "gsk");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = serde_json::json!({
            "providers": { "openai": { "apiKey": "sk-test" } },
            "retry": { "maxAttempts": 5 }
        });

        let config: Config = serde_json::from_value(json).unwrap();
        assert_eq!(config.providers.openai.api_key, "sk-test");
        assert!(!config.providers.gemini.is_configured());
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.initial_backoff_ms, 250);
        assert_eq!(config.agent.max_tokens, 1000);
    }

    #[test]
    fn test_serialized_keys_are_camel_case() {
        let json = serde_json::to_value(Config::default()).unwrap();
        assert!(json["agent"].get("maxToolIterations").is_some());
        assert!(json["retry"].get("initialBackoffMs").is_some());
        assert!(json["agent"].get("max_tokens").is_none());
    }
}
