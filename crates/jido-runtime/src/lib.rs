//! Per-agent serving runtime.
//!
//! One [`AgentServer`] serves one agent: it owns the agent value, a
//! FIFO of pending signals and the status machine, and it is the only
//! task that ever touches them. Producers hand signals to a bounded
//! mailbox; the executor drains them strictly one at a time.
//!
//! # Architecture
//!
//! ```text
//!                         ┌──────────────────────────────┐
//!                         │         AgentServer          │
//! Producers ──send()────► │  mailbox ◄── mpsc            │
//!                         │     │                        │
//! Owner ─────stop()─────► │     ▼                        │
//!                         │  process_signal()            │
//!                         │     ├── route by type        │
//!                         │     ├── command path ──► ChainRunner ──► WorkflowExecutor
//!                         │     └── directive path      │                │
//!                         │     │                        │         TaskGroup per
//!                         │     ▼                        │         attempt, aborted
//!                         │  emit() ──► subscribers      │         on deadline
//!                         └──────────────────────────────┘
//! ```
//!
//! # Execution Model
//!
//! - **Sequential per agent**: at most one signal executes at any
//!   instant; agent state needs no locks.
//! - **Supervised leaf work**: each workflow attempt runs in a fresh
//!   worker task with its own [`TaskGroup`](jido_action::TaskGroup);
//!   deadlines abort the worker and every grouped child.
//! - **Events as capability**: lifecycle edges emit
//!   `jido.agent.event.*` signals through the server's
//!   [`OutputEmitter`] set - in-memory, bus-backed or null, never
//!   global state.
//!
//! # Quick Start
//!
//! ```no_run
//! use jido_action::ActionRegistry;
//! use jido_runtime::{AgentServer, RunnerAgent, ServerConfig, WorkflowExecutor};
//! use jido_signal::{Instruction, Signal};
//! use jido_types::AgentId;
//! use std::sync::Arc;
//!
//! # async fn demo() {
//! let registry = Arc::new(ActionRegistry::with_builtins());
//! let workflow = Arc::new(WorkflowExecutor::new(registry));
//!
//! let agent = RunnerAgent::new(AgentId::named("worker"), Arc::clone(&workflow));
//! let (server, handle) =
//!     AgentServer::new(Box::new(agent), workflow, ServerConfig::default());
//!
//! tokio::spawn(server.run());
//!
//! let signal = Signal::command(&handle.id(), "run", vec![Instruction::new("noop")]);
//! handle.send(signal).await.unwrap();
//! # }
//! ```

mod agent;
mod bus;
mod chain;
mod config;
mod emitter;
mod error;
pub mod events;
mod server;
pub mod testing;
mod workflow;

pub use agent::{Agent, AgentCore, CmdInput, RunnerAgent};
pub use bus::{BusEmitter, SignalBus};
pub use chain::ChainRunner;
pub use config::{ServerConfig, SlowSubscriberPolicy};
pub use emitter::{ChannelEmitter, NullEmitter, OutputEmitter};
pub use error::RuntimeError;
pub use server::{AgentServer, ServerHandle, ServerState};
pub use workflow::{WorkflowExecutor, WorkflowHandle, CANCEL_GRACE_MS};

// Re-export the layers below for downstream convenience.
pub use jido_action::{
    Action, ActionMeta, ActionRegistry, CompensationSpec, ExecError, RunContext, TaskGroup,
    WorkflowOutcome,
};
pub use jido_signal::{CmdOpts, Directive, Instruction, RunOpts, Signal, SignalClass};
pub use jido_types::{AgentId, AgentStatus, ErrorCode, Payload, SignalId};
