//! Console drivers for the agent variants.
//!
//! Each driver owns the long-lived pieces (conversation, draft) and hands
//! one user turn at a time to the agent loop. A failed run leaves the
//! conversation exactly as it was before the turn.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::{info, warn};

use toolloop_agent::agents::DRAFTER_GREETING;
use toolloop_agent::transcript::write_transcript;
use toolloop_agent::{AgentLoop, Conversation, Draft, RunOutcome, Termination};

use crate::helpers;
use crate::repl::Repl;

/// Run one user turn on top of `conversation`.
///
/// On success the conversation is replaced by the extended one; on failure
/// it is left untouched.
pub async fn take_turn<S>(
    agent: &AgentLoop<S>,
    conversation: &mut Conversation,
    state: &mut S,
    input: &str,
) -> Result<RunOutcome> {
    let mut next = conversation.clone();
    next.push_user(input)?;
    let outcome = agent.run(next, state).await?;
    *conversation = outcome.conversation.clone();
    Ok(outcome)
}

/// Chat REPL keeping one conversation across turns.
///
/// With `transcript` set (the memory agent), the conversation is written
/// there when the user leaves.
pub async fn chat(agent: AgentLoop, name: &str, transcript: Option<PathBuf>) -> Result<()> {
    let title = if transcript.is_some() { "MEMORY AGENT" } else { "SIMPLE CHAT AGENT" };
    helpers::print_banner(title);

    let mut repl = Repl::new(name)?;
    let mut conversation = Conversation::new();

    while let Some(input) = repl.read_line("You: ") {
        helpers::print_thinking();
        let result = take_turn(&agent, &mut conversation, &mut (), &input).await;
        helpers::clear_thinking();
        match result {
            Ok(outcome) => helpers::print_reply(outcome.final_reply().unwrap_or_default()),
            Err(e) => helpers::print_error(&e),
        }
    }
    repl.save_history();

    if let Some(path) = transcript {
        save_transcript(&path, conversation)?;
    }
    Ok(())
}

fn save_transcript(path: &Path, conversation: Conversation) -> Result<()> {
    write_transcript(path, &conversation.into_messages())?;
    println!("Conversation saved to {}", path.display());
    Ok(())
}

/// Drafting session: runs until a save succeeds or the user leaves.
pub async fn draft(agent: AgentLoop<Draft>, dir: PathBuf) -> Result<()> {
    helpers::print_banner("DRAFTER AGENT");

    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create document dir: {}", dir.display()))?;
    let mut repl = Repl::new("drafter")?;
    let mut conversation = Conversation::new();
    let mut document = Draft::new(dir);

    // The session opens with the greeting as the first user turn.
    let mut pending = Some(DRAFTER_GREETING.to_string());

    loop {
        let input = match pending.take() {
            Some(text) => text,
            None => match repl.read_line("What would you like to do with the document? ") {
                Some(text) => text,
                None => break,
            },
        };

        helpers::print_thinking();
        let result = take_turn(&agent, &mut conversation, &mut document, &input).await;
        helpers::clear_thinking();

        match result {
            Ok(outcome) => {
                helpers::print_tool_activity(outcome.new_messages());
                if let Some(reply) = outcome.final_reply() {
                    helpers::print_reply(reply);
                }
                if let Termination::Tool(tool) = &outcome.termination {
                    info!(tool = %tool, "drafting session finished");
                    if let Some(path) = &document.saved_to {
                        println!("\n💾 Document has been saved to: {}", path.display());
                    }
                    break;
                }
            }
            Err(e) => helpers::print_error(&e),
        }
    }
    repl.save_history();

    if document.saved_to.is_none() && !document.document.is_empty() {
        warn!("drafting session ended without saving");
    }
    println!("\n{}", "=== DRAFTER FINISHED ===".cyan().bold());
    Ok(())
}

/// Calculator agent: one fresh conversation per prompt.
pub async fn react(agent: AgentLoop, message: Option<String>) -> Result<()> {
    if let Some(message) = message {
        return react_once(&agent, &message).await;
    }

    helpers::print_banner("REACT AGENT");
    let mut repl = Repl::new("react")?;
    while let Some(input) = repl.read_line("You: ") {
        if let Err(e) = react_once(&agent, &input).await {
            helpers::print_error(&e);
        }
    }
    repl.save_history();
    Ok(())
}

async fn react_once(agent: &AgentLoop, input: &str) -> Result<()> {
    helpers::print_thinking();
    let result = take_turn(agent, &mut Conversation::new(), &mut (), input).await;
    helpers::clear_thinking();

    let outcome = result?;
    helpers::print_tool_activity(outcome.new_messages());
    helpers::print_reply(outcome.final_reply().unwrap_or_default());
    Ok(())
}
