//! Directives: structured control values interpreted by the runtime.
//!
//! A directive is returned by an agent's `cmd` or by an action's run
//! outcome, or carried in the `data` of a `jido.agent.cmd.directive.*`
//! signal. The runtime only interprets the kinds defined here; a
//! payload whose `directive` tag matches nothing fails validation.
//!
//! # Agent vs Server Directives
//!
//! | Kind | Applied by | Effect |
//! |------|-----------|--------|
//! | `enqueue_instructions` | agent | push instructions onto the agent queue |
//! | `transition` | server | move the server status machine |
//! | `spawn_child` | server | start a subordinate server |
//! | `stop_child` | server | stop a subordinate server |
//! | `register_output` | server | attach a bus-backed output sink |

use crate::error::SignalError;
use crate::instruction::Instruction;
use jido_types::{AgentStatus, Payload};
use serde::{Deserialize, Serialize};

/// A control value the runtime knows how to apply.
///
/// Serialized with an internal `directive` tag:
///
/// ```
/// use jido_signal::Directive;
/// use serde_json::json;
///
/// let d = Directive::from_value(&json!({
///     "directive": "transition",
///     "to": "paused"
/// })).unwrap();
/// assert!(matches!(d, Directive::Transition { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "directive", rename_all = "snake_case")]
pub enum Directive {
    /// Queue more instructions on the agent.
    EnqueueInstructions {
        /// Instructions appended to the agent's pending queue, in order.
        instructions: Vec<Instruction>,
    },

    /// Move the server to `to`. Illegal targets fail when applied.
    Transition {
        /// Target status.
        to: AgentStatus,
    },

    /// Start a subordinate server under this one.
    SpawnChild {
        /// Child name, unique within the parent.
        id: String,
        /// Initial agent state for the child.
        #[serde(default)]
        state: Payload,
    },

    /// Stop a subordinate server previously spawned.
    StopChild {
        /// Child name.
        id: String,
    },

    /// Attach an output sink publishing this server's events to the
    /// named bus stream.
    RegisterOutput {
        /// Bus stream name.
        stream: String,
    },
}

impl Directive {
    /// Decodes a directive from a raw JSON value.
    ///
    /// Unknown `directive` tags and malformed bodies are
    /// [`SignalError::InvalidDirective`].
    pub fn from_value(value: &serde_json::Value) -> Result<Self, SignalError> {
        serde_json::from_value(value.clone())
            .map_err(|e| SignalError::InvalidDirective(e.to_string()))
    }

    /// Returns `true` for directives applied in place to the agent.
    ///
    /// Everything else is a server directive, handed to the server's
    /// owner or applied by the server itself.
    #[must_use]
    pub fn is_agent_directive(&self) -> bool {
        matches!(self, Self::EnqueueInstructions { .. })
    }

    /// Short tag for logging.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::EnqueueInstructions { .. } => "enqueue_instructions",
            Self::Transition { .. } => "transition",
            Self::SpawnChild { .. } => "spawn_child",
            Self::StopChild { .. } => "stop_child",
            Self::RegisterOutput { .. } => "register_output",
        }
    }
}
