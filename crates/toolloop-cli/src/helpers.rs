//! Shared CLI helpers: path expansion, reply printing, banners.

use std::path::PathBuf;

use colored::Colorize;

use toolloop_core::types::Message;

/// Expand `~` at the start of a path to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_next::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs_next::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

/// Print the model's final reply.
pub fn print_reply(reply: &str) {
    println!();
    if reply.is_empty() {
        println!("{} {}", "AI:".cyan().bold(), "(no response)".dimmed());
    } else {
        println!("{} {reply}", "AI:".cyan().bold());
    }
    println!();
}

/// Echo the tool traffic of one run: requested tools and their results.
pub fn print_tool_activity(messages: &[Message]) {
    for message in messages {
        match message {
            Message::Assistant { .. } if message.has_tool_calls() => {
                if !message.content().is_empty() {
                    println!("\n{} {}", "AI:".cyan().bold(), message.content());
                }
                let names: Vec<&str> = message.tool_calls().iter().map(|c| c.name()).collect();
                println!("{} {}", "🔧 USING TOOLS:".yellow(), names.join(", "));
            }
            Message::Tool { content, .. } => {
                println!("{} {content}", "🛠️  TOOL RESULT:".green());
            }
            _ => {}
        }
    }
}

/// Print a run-level failure. The REPL keeps going after this.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("\n{} {err:#}\n", "❌ Error:".red().bold());
}

/// Print the banner shown at REPL start.
pub fn print_banner(title: &str) {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", format!("=== {title} ===").cyan().bold(), version.dimmed());
    println!("{}", "Type a message, or \"exit\" to quit.".dimmed());
    println!();
}

/// Print a "thinking" placeholder while the model is working.
pub fn print_thinking() {
    eprint!("{}", "⠿ thinking...".dimmed());
}

/// Clear the "thinking" placeholder.
pub fn clear_thinking() {
    eprint!("\r{}\r", " ".repeat(40));
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_tilde_home() {
        let result = expand_tilde("~/foo/bar");
        assert!(result.ends_with("foo/bar"));
        assert!(!result.starts_with("~"));
    }

    #[test]
    fn expand_tilde_no_tilde() {
        let result = expand_tilde("/absolute/path");
        assert_eq!(result, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn expand_tilde_relative() {
        assert_eq!(expand_tilde("logging.txt"), PathBuf::from("logging.txt"));
    }
}
