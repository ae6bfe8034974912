//! Agent variants: registry, prompt, and termination policy per agent.

use std::sync::Arc;

use toolloop_providers::ModelGateway;

use crate::agent_loop::AgentLoop;
use crate::error::RegistryError;
use crate::tools::calculator::ArithmeticTool;
use crate::tools::document::{Draft, SaveTool, UpdateTool};
use crate::tools::registry::ToolRegistry;

/// System prompt of the react agent.
pub const REACT_PROMPT: &str = "You are an AI assistant that performs calculations using tools.";

/// First user turn of a drafting session.
pub const DRAFTER_GREETING: &str =
    "I'm ready to help you update a document. What would you like to create?";

/// Plain chat with no tools. Used by both the chat and memory drivers.
pub fn chat_agent(gateway: Arc<dyn ModelGateway>) -> AgentLoop {
    AgentLoop::new(gateway, ToolRegistry::new())
}

/// Calculator agent with `add`, `subtract` and `multiply`.
pub fn react_agent(gateway: Arc<dyn ModelGateway>) -> Result<AgentLoop, RegistryError> {
    let tools = ToolRegistry::<()>::new()
        .with_tool(Arc::new(ArithmeticTool::add()))?
        .with_tool(Arc::new(ArithmeticTool::subtract()))?
        .with_tool(Arc::new(ArithmeticTool::multiply()))?;
    Ok(AgentLoop::new(gateway, tools).with_system_prompt(|_: &()| REACT_PROMPT.to_string()))
}

/// Document drafter. A successful `save` ends the run.
pub fn drafter_agent(gateway: Arc<dyn ModelGateway>) -> Result<AgentLoop<Draft>, RegistryError> {
    let tools = ToolRegistry::<Draft>::new()
        .with_tool(Arc::new(UpdateTool))?
        .with_tool(Arc::new(SaveTool))?;
    Ok(AgentLoop::new(gateway, tools)
        .with_termination_tool("save")
        .with_system_prompt(drafter_prompt))
}

/// Drafter system prompt showing the current document.
pub fn drafter_prompt(draft: &Draft) -> String {
    format!(
        "You are Drafter, a helpful writing assistant. You help users update and modify documents.\n\
         - Use the 'update' tool to modify document content.\n\
         - Use the 'save' tool to save the document and finish.\n\
         - Always show the current document state after modifications.\n\
         Current document content: {}",
        draft.document
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use toolloop_core::types::{LlmResponse, Message};

    use crate::agent_loop::Termination;
    use crate::conversation::Conversation;
    use crate::test_support::{calls, ScriptedGateway};

    fn seeded(text: &str) -> Conversation {
        let mut conv = Conversation::new();
        conv.push_user(text).unwrap();
        conv
    }

    #[test]
    fn test_react_tools() {
        let agent = react_agent(Arc::new(ScriptedGateway::new(vec![]))).unwrap();
        assert_eq!(agent.tools().tool_names(), vec!["add", "multiply", "subtract"]);
        assert!(!agent.is_termination_tool("add"));
    }

    #[test]
    fn test_drafter_tools() {
        let agent = drafter_agent(Arc::new(ScriptedGateway::new(vec![]))).unwrap();
        assert_eq!(agent.tools().tool_names(), vec!["save", "update"]);
        assert!(agent.is_termination_tool("save"));
        assert!(!agent.is_termination_tool("update"));
    }

    #[test]
    fn test_drafter_prompt_shows_document() {
        let mut draft = Draft::new("/tmp");
        draft.document = "Meeting at 3 PM".into();
        let prompt = drafter_prompt(&draft);
        assert!(prompt.starts_with("You are Drafter"));
        assert!(prompt.ends_with("Current document content: Meeting at 3 PM"));
    }

    #[tokio::test]
    async fn test_react_multi_step_calculation() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            calls(None, &[("c1", "add", r#"{"a":40,"b":12}"#)]),
            calls(None, &[("c2", "multiply", r#"{"a":52,"b":6}"#)]),
            LlmResponse::text("The result is 312."),
        ]));
        let agent = react_agent(gateway.clone()).unwrap();

        let outcome = agent
            .run(seeded("Add 40 + 12 and then multiply the result by 6."), &mut ())
            .await
            .unwrap();

        assert_eq!(outcome.final_reply(), Some("The result is 312."));
        let requests = gateway.requests();
        assert_eq!(requests[0][0], Message::system(REACT_PROMPT));
        assert_eq!(requests[2].last().unwrap().content(), "312");
    }

    #[tokio::test]
    async fn test_chat_agent_plain_reply() {
        let gateway = Arc::new(ScriptedGateway::new(vec![LlmResponse::text("Hi Bob!")]));
        let agent = chat_agent(gateway.clone());

        let outcome = agent.run(seeded("I'm Bob"), &mut ()).await.unwrap();
        assert_eq!(outcome.termination, Termination::Reply);
        assert_eq!(outcome.final_reply(), Some("Hi Bob!"));
        assert!(gateway.offered_tools()[0].is_empty());
    }

    #[tokio::test]
    async fn test_drafter_session_across_turns() {
        let tmp = TempDir::new().unwrap();
        let gateway = Arc::new(ScriptedGateway::new(vec![
            LlmResponse::text("What should the document say?"),
            calls(
                Some("Updating now."),
                &[("c1", "update", r#"{"content":"Meeting at 3 PM"}"#)],
            ),
            LlmResponse::text("Done. Anything else?"),
            calls(None, &[("c2", "save", r#"{"filename":"meeting"}"#)]),
        ]));
        let agent = drafter_agent(gateway.clone()).unwrap();
        let mut draft = Draft::new(tmp.path());

        let first = agent.run(seeded(DRAFTER_GREETING), &mut draft).await.unwrap();
        assert_eq!(first.final_reply(), Some("What should the document say?"));

        let mut conv = first.conversation;
        conv.push_user("Write: Meeting at 3 PM").unwrap();
        let second = agent.run(conv, &mut draft).await.unwrap();
        assert_eq!(second.final_reply(), Some("Done. Anything else?"));
        assert_eq!(draft.document, "Meeting at 3 PM");

        let mut conv = second.conversation;
        conv.push_user("Save it as meeting").unwrap();
        let third = agent.run(conv, &mut draft).await.unwrap();
        assert_eq!(third.termination, Termination::Tool("save".into()));
        assert_eq!(
            std::fs::read_to_string(tmp.path().join("meeting.txt")).unwrap(),
            "Meeting at 3 PM"
        );
        assert_eq!(gateway.calls(), 4);
    }
}
