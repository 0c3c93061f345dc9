//! Signal types for the jido agent runtime.
//!
//! Everything that crosses a server boundary is a [`Signal`]: an
//! immutable envelope carrying either a command (with an ordered list
//! of [`Instruction`]s), a control [`Directive`], or an outbound
//! event. The envelope's `type` string is hierarchical and routes the
//! signal:
//!
//! ```text
//! jido.agent.cmd.directive.<segment>   control directive
//! jido.agent.cmd.<segment>             command
//! jido.agent.event.<segment>[.<...>]   outbound event (never dispatched)
//! ```
//!
//! # Signal Flow
//!
//! ```text
//! ┌──────────┐   Signal    ┌─────────────┐   events    ┌─────────────┐
//! │ Producer │ ──────────► │ AgentServer │ ──────────► │ Subscribers │
//! │ (owner,  │             │  (executor) │             │  (emitters) │
//! │  peers)  │             └─────────────┘             └─────────────┘
//! └──────────┘
//! ```
//!
//! Producers enqueue; the server's executor is the sole consumer and
//! dispatches one signal at a time. Signals are immutable once
//! created - re-queueing moves the same envelope, it never mutates it.
//!
//! # Crate Structure
//!
//! - [`Signal`], [`SignalClass`] - envelope and routing
//! - [`Instruction`], [`RunOpts`], [`TelemetryMode`] - units of work
//! - [`Directive`] - control values interpreted by the runtime
//! - [`CmdOpts`], [`RunnerKind`] - recognized command options
//! - [`SignalError`] - decode/format errors (`SIGNAL_*` codes)

mod directive;
mod error;
mod instruction;
mod kind;
mod opts;
mod signal;

pub use directive::Directive;
pub use error::SignalError;
pub use instruction::{Instruction, RunOpts, TelemetryMode, MAX_BACKOFF_MS};
pub use kind::{SignalClass, CMD_PREFIX, DIRECTIVE_PREFIX, EVENT_PREFIX};
pub use opts::{CmdOpts, RunnerKind};
pub use signal::Signal;

// Re-export the shared vocabulary for convenience.
pub use jido_types::{AgentId, AgentStatus, Payload, SignalId};
