//! Plain-text conversation transcript written by the memory driver on exit.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;
use tracing::info;

use toolloop_core::types::Message;

/// Render user and assistant turns; other roles are left out.
pub fn render_transcript(messages: &[Message]) -> String {
    let mut out = String::from("Your Conversation Log:\n");
    for message in messages {
        match message {
            Message::User { content } => {
                let _ = writeln!(out, "You: {content}");
            }
            Message::Assistant {
                content: Some(content),
                ..
            } if !content.is_empty() => {
                let _ = write!(out, "AI: {content}\n\n");
            }
            _ => {}
        }
    }
    out.push_str("End of Conversation");
    out
}

/// Write the transcript to `path`, replacing any existing file.
pub fn write_transcript(path: &Path, messages: &[Message]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(path, render_transcript(messages))
        .with_context(|| format!("writing transcript to {}", path.display()))?;
    info!(path = %path.display(), messages = messages.len(), "transcript saved");
    Ok(())
}
