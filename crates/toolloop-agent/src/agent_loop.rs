//! Agent loop: the model ↔ tool state machine.
//!
//! A run alternates between asking the model gateway for a reply and
//! resolving the tools it requested, until the model answers without tools
//! or a termination tool succeeds:
//!
//! ```text
//! AwaitingModel ──(reply with tools)──▶ ExecutingTools
//!       ▲                                   │
//!       └──────────(results appended)───────┘
//! AwaitingModel ──(plain reply)──────▶ Done
//! ExecutingTools ─(termination tool ok)─▶ Done
//! ```
//!
//! The gateway call is the only await point. Tools run synchronously, one at
//! a time, in the order the model requested them.

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, error, info};

use toolloop_core::types::{Message, ToolCall, ToolDefinition};
use toolloop_providers::ModelGateway;

use crate::conversation::Conversation;
use crate::error::RunError;
use crate::tools::executor::ToolExecutor;
use crate::tools::registry::ToolRegistry;

/// Default cap on model calls per run.
pub const DEFAULT_MAX_ITERATIONS: usize = 20;

/// Builds a system message from the auxiliary state before each model call.
pub type SystemPrompt<S> = Box<dyn Fn(&S) -> String + Send + Sync>;

/// Phase of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    AwaitingModel,
    ExecutingTools,
    Done,
}

/// Why a run reached `Done`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Termination {
    /// The model replied without requesting tools.
    Reply,
    /// The named termination tool succeeded.
    Tool(String),
}

// ─────────────────────────────────────────────
// AgentLoop
// ─────────────────────────────────────────────

/// One agent variant: a gateway, its tools, and its termination policy.
///
/// Holds no per-run state, so one `AgentLoop` can drive any number of
/// independent runs.
pub struct AgentLoop<S = ()> {
    gateway: Arc<dyn ModelGateway>,
    tools: ToolRegistry<S>,
    termination_tools: HashSet<String>,
    system_prompt: Option<SystemPrompt<S>>,
    max_iterations: usize,
}

impl<S> AgentLoop<S> {
    pub fn new(gateway: Arc<dyn ModelGateway>, tools: ToolRegistry<S>) -> Self {
        Self {
            gateway,
            tools,
            termination_tools: HashSet::new(),
            system_prompt: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Flag a tool whose successful invocation ends the run.
    pub fn with_termination_tool(mut self, name: impl Into<String>) -> Self {
        self.termination_tools.insert(name.into());
        self
    }

    /// Prepend a system message computed from the auxiliary state.
    ///
    /// The message is rebuilt before every model call and never stored in
    /// the conversation.
    pub fn with_system_prompt(mut self, prompt: impl Fn(&S) -> String + Send + Sync + 'static) -> Self {
        self.system_prompt = Some(Box::new(prompt));
        self
    }

    /// Cap on model calls per run (at least 1).
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub fn tools(&self) -> &ToolRegistry<S> {
        &self.tools
    }

    pub fn is_termination_tool(&self, name: &str) -> bool {
        self.termination_tools.contains(name)
    }

    /// Begin a run over `conversation`.
    ///
    /// Starts in `ExecutingTools` if the conversation ends with unresolved
    /// invocations, otherwise in `AwaitingModel`.
    pub fn start<'a>(&'a self, conversation: Conversation, state: &'a mut S) -> Run<'a, S> {
        let phase = if conversation.is_settled() {
            LoopState::AwaitingModel
        } else {
            LoopState::ExecutingTools
        };
        Run {
            agent: self,
            seeded_len: conversation.len(),
            conversation,
            state,
            phase,
            termination: None,
            iterations: 0,
        }
    }

    /// Drive a run to completion.
    pub async fn run(&self, conversation: Conversation, state: &mut S) -> Result<RunOutcome, RunError> {
        self.start(conversation, state).finish().await
    }
}

// ─────────────────────────────────────────────
// Run
// ─────────────────────────────────────────────

/// A single run in progress.
pub struct Run<'a, S> {
    agent: &'a AgentLoop<S>,
    conversation: Conversation,
    state: &'a mut S,
    phase: LoopState,
    termination: Option<Termination>,
    iterations: usize,
    seeded_len: usize,
}

impl<S> Run<'_, S> {
    pub fn phase(&self) -> LoopState {
        self.phase
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Perform one transition and return the new phase. A no-op once `Done`.
    pub async fn step(&mut self) -> Result<LoopState, RunError> {
        match self.phase {
            LoopState::AwaitingModel => self.call_model().await?,
            LoopState::ExecutingTools => self.execute_tools()?,
            LoopState::Done => {}
        }
        Ok(self.phase)
    }

    /// Step until `Done`.
    pub async fn finish(mut self) -> Result<RunOutcome, RunError> {
        while self.step().await? != LoopState::Done {}
        Ok(RunOutcome {
            termination: self.termination.unwrap_or(Termination::Reply),
            conversation: self.conversation,
            seeded_len: self.seeded_len,
        })
    }

    async fn call_model(&mut self) -> Result<(), RunError> {
        let agent = self.agent;
        if self.iterations >= agent.max_iterations {
            error!(max = agent.max_iterations, "iteration limit reached");
            return Err(RunError::IterationLimit(agent.max_iterations));
        }
        self.iterations += 1;

        let mut response = {
            let messages: Cow<'_, [Message]> = match &agent.system_prompt {
                Some(prompt) => {
                    let mut with_prompt = Vec::with_capacity(self.conversation.len() + 1);
                    with_prompt.push(Message::system(prompt(&*self.state)));
                    with_prompt.extend_from_slice(self.conversation.messages());
                    Cow::Owned(with_prompt)
                }
                None => Cow::Borrowed(self.conversation.messages()),
            };
            let tools: Vec<ToolDefinition> = agent.tools.describe_all().collect();

            debug!(
                gateway = agent.gateway.display_name(),
                model = agent.gateway.model(),
                iteration = self.iterations,
                messages = messages.len(),
                tools = tools.len(),
                "calling model gateway"
            );

            agent.gateway.send(&messages, &tools).await.map_err(|e| {
                error!(gateway = agent.gateway.display_name(), error = %e, "model gateway failed");
                RunError::from(e)
            })?
        };

        normalize_call_ids(&mut response.tool_calls, self.iterations);
        let requested = response.tool_calls.len();
        self.conversation.push(response.into_message())?;

        if requested > 0 {
            debug!(iteration = self.iterations, requested, "model requested tools");
            self.phase = LoopState::ExecutingTools;
        } else {
            info!(iteration = self.iterations, "run finished with model reply");
            self.termination = Some(Termination::Reply);
            self.phase = LoopState::Done;
        }
        Ok(())
    }

    fn execute_tools(&mut self) -> Result<(), RunError> {
        let agent = self.agent;
        let executor = ToolExecutor::new(&agent.tools);
        let calls: Vec<ToolCall> = self.conversation.pending_calls().to_vec();
        let mut trigger: Option<String> = None;

        for call in &calls {
            let message = match &trigger {
                Some(tool) => {
                    debug!(tool = %call.name(), "skipping invocation after termination");
                    Message::tool_result(&call.id, format!("Skipped: run finished by {tool}"))
                }
                None => {
                    let outcome = executor.execute(call, &mut *self.state);
                    if outcome.succeeded() && agent.is_termination_tool(call.name()) {
                        trigger = Some(call.name().to_string());
                    }
                    outcome.message
                }
            };
            self.conversation.push(message)?;
        }

        match trigger {
            Some(tool) => {
                info!(tool = %tool, "run finished by termination tool");
                self.termination = Some(Termination::Tool(tool));
                self.phase = LoopState::Done;
            }
            None => self.phase = LoopState::AwaitingModel,
        }
        Ok(())
    }
}

/// Give every invocation in one reply a distinct, non-empty id.
fn normalize_call_ids(calls: &mut [ToolCall], iteration: usize) {
    let mut seen = HashSet::new();
    for (i, call) in calls.iter_mut().enumerate() {
        if call.id.is_empty() || !seen.insert(call.id.clone()) {
            call.id = format!("call_{iteration}_{i}");
            seen.insert(call.id.clone());
        }
    }
}

// ─────────────────────────────────────────────
// RunOutcome
// ─────────────────────────────────────────────

/// A finished run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunOutcome {
    pub conversation: Conversation,
    pub termination: Termination,
    seeded_len: usize,
}

impl RunOutcome {
    /// Final assistant text, if the run ended with a reply.
    ///
    /// `None` when a termination tool ended the run.
    pub fn final_reply(&self) -> Option<&str> {
        match self.termination {
            Termination::Reply => self.conversation.final_reply(),
            Termination::Tool(_) => None,
        }
    }

    /// Messages appended during this run.
    pub fn new_messages(&self) -> &[Message] {
        &self.conversation.messages()[self.seeded_len..]
    }
}
