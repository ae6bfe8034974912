//! Conversation: the append-only message log of one run.
//!
//! Tracks which invocations of the latest assistant message are still
//! unresolved, so a tool result can never be attached to the wrong call and
//! no other message can be appended while calls are pending.

use toolloop_core::types::{Message, ToolCall};

use crate::error::ConversationError;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Conversation {
    messages: Vec<Message>,
    /// Unresolved invocations of the latest assistant message, in order.
    pending: Vec<ToolCall>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a conversation from existing messages, checking correlation.
    pub fn from_messages(messages: impl IntoIterator<Item = Message>) -> Result<Self, ConversationError> {
        let mut conversation = Self::new();
        for message in messages {
            conversation.push(message)?;
        }
        Ok(conversation)
    }

    /// Append a message.
    ///
    /// - a `tool` message must resolve one pending invocation;
    /// - any other message is rejected while invocations are pending;
    /// - an assistant message with invocations makes them pending.
    pub fn push(&mut self, message: Message) -> Result<(), ConversationError> {
        if let Some(id) = message.tool_call_id() {
            let pos = self
                .pending
                .iter()
                .position(|call| call.id == id)
                .ok_or_else(|| ConversationError::UnmatchedToolResult(id.to_string()))?;
            self.pending.remove(pos);
        } else {
            if !self.pending.is_empty() {
                return Err(ConversationError::Unresolved(self.pending_ids()));
            }
            self.pending = message.tool_calls().to_vec();
        }
        self.messages.push(message);
        Ok(())
    }

    pub fn push_user(&mut self, content: impl Into<String>) -> Result<(), ConversationError> {
        self.push(Message::user(content))
    }

    /// Invocations still waiting for a `tool` result, in request order.
    pub fn pending_calls(&self) -> &[ToolCall] {
        &self.pending
    }

    /// `true` when no invocation is awaiting a result.
    pub fn is_settled(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Content of the last assistant message that requested no tools.
    pub fn final_reply(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| matches!(m, Message::Assistant { .. }) && !m.has_tool_calls())
            .map(Message::content)
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }

    fn pending_ids(&self) -> Vec<String> {
        self.pending.iter().map(|c| c.id.clone()).collect()
    }
}
