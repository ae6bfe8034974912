//! Line input for the interactive drivers.
//!
//! Uses `rustyline` for readline-style editing with one persistent history
//! file per agent.

use std::path::PathBuf;

use anyhow::Result;
use rustyline::config::Configurer;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{DefaultEditor, Editor};
use tracing::debug;

use toolloop_core::utils::get_history_path;

/// Exit commands (case-insensitive match).
const EXIT_COMMANDS: &[&str] = &["exit", "quit", "/exit", "/quit", ":q"];

/// A prompt that reads user turns until an exit command or Ctrl-C/Ctrl-D.
pub struct Repl {
    editor: Editor<(), DefaultHistory>,
    history: PathBuf,
}

impl Repl {
    /// Open an editor with the history of `agent` loaded.
    pub fn new(agent: &str) -> Result<Self> {
        let mut editor = DefaultEditor::new()?;
        editor.set_max_history_size(1000)?;

        let history = history_path(agent);
        if history.exists() {
            let _ = editor.load_history(&history);
            debug!("loaded REPL history from {}", history.display());
        }

        Ok(Self { editor, history })
    }

    /// Next non-empty input line, or `None` when the user wants to leave.
    pub fn read_line(&mut self, prompt: &str) -> Option<String> {
        loop {
            let input = match self.editor.readline(prompt) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return None,
                Err(e) => {
                    eprintln!("Input error: {e}");
                    return None;
                }
            };

            let trimmed = input.trim();
            if trimmed.is_empty() {
                continue;
            }
            if is_exit_command(trimmed) {
                println!("\nGoodbye! 👋");
                return None;
            }

            let _ = self.editor.add_history_entry(trimmed);
            return Some(trimmed.to_string());
        }
    }

    /// Persist history to disk.
    pub fn save_history(&mut self) {
        if let Some(parent) = self.history.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(e) = self.editor.save_history(&self.history) {
            debug!("failed to save history: {e}");
        }
    }
}

/// History file of one agent: `~/.toolloop/history/<agent>`.
fn history_path(agent: &str) -> PathBuf {
    get_history_path().join(agent)
}

/// Check if input is an exit command.
fn is_exit_command(input: &str) -> bool {
    let lower = input.to_lowercase();
    EXIT_COMMANDS.contains(&lower.as_str())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
