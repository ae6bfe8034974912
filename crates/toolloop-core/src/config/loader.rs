//! Config loader: reads `~/.toolloop/config.json`, then merges `.env` and
//! environment variables.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.toolloop/config.json`
//! 3. Environment variables `TOOLLOOP_<SECTION>__<FIELD>` (override JSON)
//! 4. Conventional provider keys (`GEMINI_API_KEY`, ...) fill keys still empty

use std::path::{Path, PathBuf};
use std::sync::Once;

use tracing::{debug, info, warn};

use super::schema::Config;

static ENV_LOADER: Once = Once::new();

/// Conventional API-key variables per provider, as the vendors document them.
const PROVIDER_KEY_VARS: &[(&str, &str)] = &[
    ("openrouter", "OPENROUTER_API_KEY"),
    ("anthropic", "ANTHROPIC_API_KEY"),
    ("openai", "OPENAI_API_KEY"),
    ("deepseek", "DEEPSEEK_API_KEY"),
    ("gemini", "GEMINI_API_KEY"),
    ("groq", "GROQ_API_KEY"),
    ("vllm", "HOSTED_VLLM_API_KEY"),
];

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load `.env` from the working directory, once per process.
pub fn ensure_env_loaded() {
    ENV_LOADER.call_once(|| {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }
    });
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    ensure_env_loaded();
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
    apply_env_overrides(load_config_from_path(&config_path))
}

/// Load config from a specific file path, without env overrides.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config {}: {}", path.display(), e);
            Config::default()
        }
    }
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config).map_err(std::io::Error::other)?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Env var format: `TOOLLOOP_<SECTION>__<FIELD>` (double underscore as delimiter).
///
/// Supported overrides:
/// - `TOOLLOOP_AGENT__MODEL`, `__MAX_TOKENS`, `__TEMPERATURE`,
///   `__MAX_TOOL_ITERATIONS`, `__WORKSPACE`
/// - `TOOLLOOP_PROVIDERS__<NAME>__API_KEY`, `TOOLLOOP_PROVIDERS__<NAME>__API_BASE`
/// - `TOOLLOOP_RETRY__MAX_ATTEMPTS`
/// - `TOOLLOOP_TRANSCRIPT__PATH`
fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(val) = std::env::var("TOOLLOOP_AGENT__MODEL") {
        config.agent.model = val;
    }
    if let Some(n) = parse_env("TOOLLOOP_AGENT__MAX_TOKENS") {
        config.agent.max_tokens = n;
    }
    if let Some(t) = parse_env("TOOLLOOP_AGENT__TEMPERATURE") {
        config.agent.temperature = t;
    }
    if let Some(n) = parse_env("TOOLLOOP_AGENT__MAX_TOOL_ITERATIONS") {
        config.agent.max_tool_iterations = n;
    }
    if let Ok(val) = std::env::var("TOOLLOOP_AGENT__WORKSPACE") {
        config.agent.workspace = val;
    }

    for (name, conventional) in PROVIDER_KEY_VARS {
        let Some(provider) = config.providers.get_mut(name) else {
            continue;
        };
        let upper = name.to_uppercase();
        if let Ok(val) = std::env::var(format!("TOOLLOOP_PROVIDERS__{upper}__API_KEY")) {
            provider.api_key = val;
        }
        if let Ok(val) = std::env::var(format!("TOOLLOOP_PROVIDERS__{upper}__API_BASE")) {
            provider.api_base = Some(val);
        }
        if provider.api_key.is_empty() {
            if let Ok(val) = std::env::var(conventional) {
                provider.api_key = val;
            }
        }
    }

    if let Some(n) = parse_env("TOOLLOOP_RETRY__MAX_ATTEMPTS") {
        config.retry.max_attempts = n;
    }
    if let Ok(val) = std::env::var("TOOLLOOP_TRANSCRIPT__PATH") {
        config.transcript.path = val;
    }

    config
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(var = key, value = %raw, "ignoring unparsable environment override");
            None
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
