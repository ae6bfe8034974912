//! `toolloop status`: show configuration and provider status.
//!
//! - Shows config path, workspace, model and the provider it resolves to
//! - Shows API key status for each provider

use anyhow::Result;
use colored::Colorize;

use toolloop_core::config::{get_config_path, load_config, Config};
use toolloop_providers::registry::{match_provider, PROVIDERS};

/// Run the status command.
pub fn run() -> Result<()> {
    let config = load_config(None);
    let config_path = get_config_path();

    println!();
    println!("{}", "🔁 Toolloop Status".cyan().bold());
    println!();

    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        mark(config_path.exists())
    );

    let workspace = crate::helpers::expand_tilde(&config.agent.workspace);
    println!(
        "  {:<18} {} {}",
        "Workspace:".bold(),
        workspace.display(),
        mark(workspace.exists())
    );

    println!("  {:<18} {}", "Model:".bold(), config.agent.model);
    println!("  {:<18} {}", "Provider:".bold(), resolved_provider(&config));

    println!(
        "  {:<18} {} | max_tokens: {} | max_tool_iterations: {}",
        "Parameters:".bold(),
        format!("temp: {}", config.agent.temperature).dimmed(),
        format!("{}", config.agent.max_tokens).dimmed(),
        format!("{}", config.agent.max_tool_iterations).dimmed(),
    );
    println!(
        "  {:<18} {} attempt(s), backoff {}–{} ms",
        "Retry:".bold(),
        config.retry.max_attempts,
        config.retry.initial_backoff_ms,
        config.retry.max_backoff_ms,
    );
    println!("  {:<18} {}", "Transcript:".bold(), config.transcript.path);

    println!();
    println!("  {}", "Providers:".bold());
    let providers_map = config.providers.to_map();
    for spec in PROVIDERS {
        let configured = providers_map
            .get(spec.name)
            .is_some_and(|p| p.is_configured());
        let status = if configured {
            format!("{} (key set)", "✓".green())
        } else {
            format!("{}", "· not configured".dimmed())
        };
        println!("    {:<20} {}", spec.display_name, status);
    }
    println!();

    Ok(())
}

/// Display name of the provider the configured model resolves to.
fn resolved_provider(config: &Config) -> String {
    match match_provider(&config.agent.model, &config.providers.to_map()) {
        Some((_, spec)) => spec.display_name.to_string(),
        None => "none (no matching API key)".red().to_string(),
    }
}

fn mark(exists: bool) -> String {
    if exists {
        "✓".green().to_string()
    } else {
        "(not found)".red().to_string()
    }
}
