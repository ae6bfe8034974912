//! Toolloop CLI: entry point.
//!
//! # Commands
//!
//! - `toolloop chat`: conversation kept across turns
//! - `toolloop memory`: like chat, writes a transcript on exit
//! - `toolloop draft`: document drafter, ends when the document is saved
//! - `toolloop react [-m MESSAGE]`: calculator agent (single-shot or REPL)
//! - `toolloop status`: show configuration and provider status
//! - `toolloop init`: create config + workspace

mod helpers;
mod init;
mod repl;
mod session;
mod status;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use toolloop_agent::agents::{chat_agent, drafter_agent, react_agent};
use toolloop_core::config::{load_config, Config};
use toolloop_providers::{create_gateway, LlmRequestConfig, ModelGateway, RetryPolicy, RetryingGateway};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// 🔁 Toolloop: tool-calling conversation agents
#[derive(Parser)]
#[command(name = "toolloop", version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true, default_value_t = false)]
    logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the model, keeping the conversation across turns
    Chat,

    /// Chat, then write the conversation to the transcript file on exit
    Memory,

    /// Draft a document with the `update` and `save` tools
    Draft,

    /// Solve arithmetic with the `add`, `subtract` and `multiply` tools
    React {
        /// Single message (non-interactive). Omit for REPL mode.
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Show configuration and provider status
    Status,

    /// Initialize configuration and workspace
    Init,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.logs);

    match cli.command {
        Commands::Chat => {
            let config = load_config(None);
            let agent = chat_agent(build_gateway(&config)?)
                .with_max_iterations(config.agent.max_tool_iterations as usize);
            session::chat(agent, "chat", None).await
        }
        Commands::Memory => {
            let config = load_config(None);
            let agent = chat_agent(build_gateway(&config)?)
                .with_max_iterations(config.agent.max_tool_iterations as usize);
            let transcript = helpers::expand_tilde(&config.transcript.path);
            session::chat(agent, "memory", Some(transcript)).await
        }
        Commands::Draft => {
            let config = load_config(None);
            let agent = drafter_agent(build_gateway(&config)?)?
                .with_max_iterations(config.agent.max_tool_iterations as usize);
            let dir = helpers::expand_tilde(&config.agent.workspace);
            session::draft(agent, dir).await
        }
        Commands::React { message } => {
            let config = load_config(None);
            let agent = react_agent(build_gateway(&config)?)?
                .with_max_iterations(config.agent.max_tool_iterations as usize);
            session::react(agent, message).await
        }
        Commands::Status => status::run(),
        Commands::Init => init::run(),
    }
}

/// Build the model gateway from config: HTTP client wrapped in retries.
fn build_gateway(config: &Config) -> Result<Arc<dyn ModelGateway>> {
    let request_config = LlmRequestConfig {
        max_tokens: config.agent.max_tokens,
        temperature: config.agent.temperature,
    };
    let gateway = create_gateway(
        &config.agent.model,
        &config.providers.to_map(),
        request_config,
    )
    .map_err(|e| anyhow::anyhow!(e))
    .context("failed to create model gateway")?;

    info!(model = %config.agent.model, "model gateway ready");
    Ok(Arc::new(RetryingGateway::new(
        gateway,
        RetryPolicy::from(&config.retry),
    )))
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "toolloop=debug,info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_react_message_and_global_logs() {
        let cli = Cli::try_parse_from(["toolloop", "react", "-m", "2+2", "--logs"]).unwrap();
        assert!(cli.logs);
        assert!(matches!(cli.command, Commands::React { message: Some(ref m) } if m == "2+2"));
    }

    #[test]
    fn build_gateway_needs_a_key() {
        let mut config = Config::default();
        config.agent.model = "some-unknown-model".into();
        assert!(build_gateway(&config).is_err());

        config.providers.openrouter.api_key = "sk-or-test".into();
        assert!(build_gateway(&config).is_ok());
    }
}
