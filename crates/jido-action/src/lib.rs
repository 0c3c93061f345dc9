//! Pluggable actions for the jido agent runtime.
//!
//! An [`Action`] is the leaf unit of work: a named, registered
//! capability exposing `run` plus optional param validation and a
//! compensation hook. Signals never carry code - they carry action
//! names, resolved at execution time through an [`ActionRegistry`].
//!
//! # Capability Records
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                  ActionRegistry                      │
//! │                                                      │
//! │  "add"   ──► Arc<dyn Action>  { run, validate, .. }  │
//! │  "fetch" ──► Arc<dyn Action>  { run, on_error, .. }  │
//! │  "noop"  ──► Arc<dyn Action>  (builtin)              │
//! └──────────────────────────────────────────────────────┘
//!             ▲ resolve("add")
//!             │
//!      WorkflowExecutor (jido-runtime)
//! ```
//!
//! # Outcomes
//!
//! `run` returns a [`WorkflowOutcome`] - a single sum over
//! result/directive/error combinations so callers must handle every
//! shape exhaustively.
//!
//! # Concurrency
//!
//! Actions that spawn concurrent work do so through the
//! [`TaskGroup`] in their [`RunContext`]; the executor aborts the
//! whole group when the attempt's deadline expires, so no child task
//! outlives the attempt.

mod action;
mod builtin;
mod error;
mod group;
mod outcome;
mod params;
mod registry;

pub use action::{Action, ActionMeta, CompensationSpec, RunContext};
pub use builtin::{EchoAction, NoopAction};
pub use error::ExecError;
pub use group::TaskGroup;
pub use outcome::WorkflowOutcome;
pub use params::normalize;
pub use registry::ActionRegistry;

pub use async_trait::async_trait;
