//! Core types for the jido agent runtime.
//!
//! This crate is the bottom layer of the workspace: identifier types,
//! the agent lifecycle status machine, the `Payload` mapping alias and
//! the unified [`ErrorCode`] convention. Everything here is SemVer
//! stable and safe for plugins to depend on.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                      Plugin SDK Layer                      │
//! ├────────────────────────────────────────────────────────────┤
//! │  jido-types   : AgentId, SignalId, AgentStatus  ◄── HERE   │
//! │  jido-signal  : Signal, Instruction, Directive             │
//! │  jido-action  : Action trait, registry, outcomes           │
//! └────────────────────────────────────────────────────────────┘
//!                              ▲
//!                              │
//!                       jido-runtime
//!              (server, workflow executor, chain)
//! ```
//!
//! # Status Machine
//!
//! The agent lifecycle only advances through legal transitions:
//!
//! ```text
//! initializing ──► idle ⇄ running
//!                   │
//!                   ⇅
//!                 paused          any ──► stopped
//! ```
//!
//! See [`AgentStatus::can_transition`] for the full table.

mod error;
mod id;
mod payload;
mod status;

pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::{AgentId, SignalId, JIDO_NAMESPACE};
pub use payload::{merge, Payload};
pub use status::AgentStatus;
