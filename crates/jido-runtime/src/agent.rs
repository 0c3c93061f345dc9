//! The agent plug-in surface.
//!
//! An agent is the user-defined value a server serves: a state
//! mapping, the last result, a queue of pending instructions, and a
//! `cmd` operation. The server invokes `cmd` for every command or
//! directive signal and interprets what comes back.
//!
//! [`RunnerAgent`] is the builtin implementation: it queues incoming
//! instructions and runs them through the [`ChainRunner`]. Hosts with
//! bespoke dispatch implement [`Agent`] directly.

use crate::chain::ChainRunner;
use crate::workflow::WorkflowExecutor;
use async_trait::async_trait;
use jido_action::ExecError;
use jido_signal::{CmdOpts, Directive, Instruction};
use jido_types::{merge, AgentId, Payload};
use std::collections::VecDeque;
use std::sync::Arc;

/// The data every agent carries: state, last result, pending work.
///
/// `pending_instructions` is strictly an *output* of `cmd`: the
/// server drains it before returning to idle, so it never accumulates
/// across signals.
#[derive(Debug, Clone, Default)]
pub struct AgentCore {
    /// The agent's state mapping.
    pub state: Payload,

    /// Result of the last completed chain, if any.
    pub result: Option<Payload>,

    /// Instructions produced but not yet executed.
    pub pending_instructions: VecDeque<Instruction>,
}

impl AgentCore {
    /// Empty core.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Core with initial state.
    #[must_use]
    pub fn with_state(state: Payload) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    /// Moves every pending instruction out, leaving the queue empty.
    pub fn take_pending(&mut self) -> Vec<Instruction> {
        self.pending_instructions.drain(..).collect()
    }
}

/// What a `cmd` invocation carries.
#[derive(Debug, Clone)]
pub enum CmdInput {
    /// Run these instructions.
    Instructions(Vec<Instruction>),
    /// Apply this directive.
    Directive(Directive),
}

/// The operation surface the runtime requires from an agent.
///
/// # Contract
///
/// - `cmd` may mutate the core (state, result, pending queue) and
///   returns the *server* directives the runtime should interpret.
/// - Agent-level directives (queueing more work) are applied to the
///   core, not returned.
/// - `cmd` must not panic for ordinary failures; return an error.
#[async_trait]
pub trait Agent: Send {
    /// The agent's identifier.
    fn id(&self) -> &AgentId;

    /// Read access to the agent's data.
    fn core(&self) -> &AgentCore;

    /// Mutable access to the agent's data.
    fn core_mut(&mut self) -> &mut AgentCore;

    /// Executes a command or applies a directive.
    async fn cmd(
        &mut self,
        input: CmdInput,
        data: Payload,
        opts: CmdOpts,
    ) -> Result<Vec<Directive>, ExecError>;
}

/// Builtin agent: queue the instructions, run the chain.
///
/// Command `data` merges beneath each instruction's params
/// (instruction params win) so signal-level payload reaches every
/// step.
pub struct RunnerAgent {
    id: AgentId,
    core: AgentCore,
    chain: ChainRunner,
}

impl RunnerAgent {
    /// Creates a runner agent executing through `workflow`.
    #[must_use]
    pub fn new(id: AgentId, workflow: Arc<WorkflowExecutor>) -> Self {
        Self {
            id,
            core: AgentCore::new(),
            chain: ChainRunner::new(workflow),
        }
    }

    /// Seeds the initial agent state.
    #[must_use]
    pub fn with_state(mut self, state: Payload) -> Self {
        self.core.state = state;
        self
    }
}

impl std::fmt::Debug for RunnerAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunnerAgent")
            .field("id", &self.id)
            .field("state_keys", &self.core.state.len())
            .field("pending", &self.core.pending_instructions.len())
            .finish()
    }
}

#[async_trait]
impl Agent for RunnerAgent {
    fn id(&self) -> &AgentId {
        &self.id
    }

    fn core(&self) -> &AgentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AgentCore {
        &mut self.core
    }

    async fn cmd(
        &mut self,
        input: CmdInput,
        data: Payload,
        opts: CmdOpts,
    ) -> Result<Vec<Directive>, ExecError> {
        match input {
            CmdInput::Instructions(instructions) => {
                for mut instruction in instructions {
                    instruction.params = merge(&data, &instruction.params);
                    self.core.pending_instructions.push_back(instruction);
                }
                self.chain.run(&mut self.core, &opts).await
            }
            CmdInput::Directive(Directive::EnqueueInstructions { instructions }) => {
                self.core.pending_instructions.extend(instructions);
                Ok(Vec::new())
            }
            // Server directives pass through untouched; the server
            // interprets them.
            CmdInput::Directive(directive) => Ok(vec![directive]),
        }
    }
}
