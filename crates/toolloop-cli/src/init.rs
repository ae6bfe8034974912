//! `toolloop init`: create the config file and working directories.
//!
//! - Writes `~/.toolloop/config.json` with defaults (never overwrites)
//! - Creates the workspace and REPL history directories

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use toolloop_core::config::{get_config_path, load_config, save_config, Config};
use toolloop_core::utils::get_history_path;

use crate::helpers::expand_tilde;

/// Run the init command.
pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔁 Toolloop — Setup".cyan().bold());
    println!();

    init_at(&get_config_path(), &get_history_path())?;

    println!();
    println!(
        "{}",
        "  Setup complete! Set GEMINI_API_KEY (or edit the config), then run `toolloop chat`.".green()
    );
    println!();
    Ok(())
}

/// Create `config_path` if missing, plus the workspace and history dirs.
fn init_at(config_path: &Path, history: &Path) -> Result<()> {
    let config = if config_path.exists() {
        println!(
            "  {} config already exists at {}",
            "✓".green(),
            config_path.display()
        );
        load_config(Some(config_path))
    } else {
        // Plain defaults: keys from the environment stay out of the file.
        let config = Config::default();
        save_config(&config, Some(config_path))
            .with_context(|| format!("failed to write {}", config_path.display()))?;
        println!(
            "  {} created config at {}",
            "✓".green(),
            config_path.display()
        );
        config
    };

    let workspace = expand_tilde(&config.agent.workspace);
    std::fs::create_dir_all(&workspace)
        .with_context(|| format!("failed to create workspace: {}", workspace.display()))?;
    println!("  {} workspace at {}", "✓".green(), workspace.display());

    std::fs::create_dir_all(history)
        .with_context(|| format!("failed to create {}", history.display()))?;
    println!("  {} history at {}", "✓".green(), history.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(tmp: &TempDir) -> Config {
        let mut config = Config::default();
        config.agent.workspace = tmp.path().join("ws").to_string_lossy().into_owned();
        config
    }

    #[test]
    fn creates_workspace_and_history() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.json");
        save_config(&config_in(&tmp), Some(&config_path)).unwrap();

        init_at(&config_path, &tmp.path().join("history")).unwrap();

        assert!(tmp.path().join("ws").is_dir());
        assert!(tmp.path().join("history").is_dir());
    }

    #[test]
    fn keeps_existing_config() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.json");
        let mut config = config_in(&tmp);
        config.agent.model = "gpt-4o-mini".into();
        save_config(&config, Some(&config_path)).unwrap();
        let before = std::fs::read_to_string(&config_path).unwrap();

        init_at(&config_path, &tmp.path().join("history")).unwrap();

        assert_eq!(std::fs::read_to_string(&config_path).unwrap(), before);
    }
}
