//! The signal envelope.

use crate::directive::Directive;
use crate::error::SignalError;
use crate::instruction::Instruction;
use crate::kind::{cmd_type, directive_type, event_type, SignalClass};
use crate::opts::CmdOpts;
use jido_types::{AgentId, Payload, SignalId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Immutable envelope carrying a command, a directive, or an event.
///
/// # Fields
///
/// | field | meaning |
/// |-------|---------|
/// | `id` | unique per signal: `<agentId>_<nanos>` |
/// | `type` | hierarchical routing string (see [`SignalClass`]) |
/// | `source` | producer URI, `jido://agent/<agentId>` |
/// | `subject` | optional correlation subject |
/// | `data` | structured payload (directive body, event payload) |
/// | `instructions` | ordered work list for command signals |
/// | `opts` | bounded command options |
///
/// Signals are never mutated after construction; re-queueing moves
/// the envelope as-is.
///
/// # Example
///
/// ```
/// use jido_signal::{Instruction, Signal, SignalClass};
/// use jido_types::AgentId;
///
/// let agent = AgentId::named("worker");
/// let signal = Signal::command(&agent, "run", vec![Instruction::new("add")]);
///
/// assert_eq!(signal.class(), SignalClass::Command);
/// assert_eq!(signal.source, agent.uri());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Unique signal id.
    pub id: SignalId,

    /// Hierarchical type string.
    #[serde(rename = "type")]
    pub ty: String,

    /// Producer URI.
    pub source: String,

    /// Optional correlation subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Structured payload.
    #[serde(default)]
    pub data: Value,

    /// Ordered instruction list (commands only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instructions: Vec<Instruction>,

    /// Command options.
    #[serde(default)]
    pub opts: CmdOpts,
}

impl Signal {
    /// Creates a command signal `jido.agent.cmd.<name>`.
    #[must_use]
    pub fn command(agent: &AgentId, name: &str, instructions: Vec<Instruction>) -> Self {
        Self {
            id: SignalId::generate(agent),
            ty: cmd_type(name),
            source: agent.uri(),
            subject: None,
            data: Value::Null,
            instructions,
            opts: CmdOpts::default(),
        }
    }

    /// Creates a directive signal `jido.agent.cmd.directive.<name>`,
    /// embedding the directive in `data`.
    ///
    /// Fails only if the directive cannot be serialized, which would
    /// indicate a malformed instruction inside it.
    pub fn directive(agent: &AgentId, directive: &Directive) -> Result<Self, SignalError> {
        let data = serde_json::to_value(directive)
            .map_err(|e| SignalError::InvalidDirective(e.to_string()))?;
        Ok(Self {
            id: SignalId::generate(agent),
            ty: directive_type(directive.tag()),
            source: agent.uri(),
            subject: None,
            data,
            instructions: Vec::new(),
            opts: CmdOpts::default(),
        })
    }

    /// Creates an outbound event signal `jido.agent.event.<suffix>`.
    #[must_use]
    pub fn event(agent: &AgentId, suffix: &str, payload: Value) -> Self {
        Self {
            id: SignalId::generate(agent),
            ty: event_type(suffix),
            source: agent.uri(),
            subject: None,
            data: payload,
            instructions: Vec::new(),
            opts: CmdOpts::default(),
        }
    }

    /// Wraps a pending instruction as a fresh `jido.agent.cmd.run`
    /// signal. Extracting the instructions back yields the original
    /// `(action, params)` pair.
    #[must_use]
    pub fn from_instruction(agent: &AgentId, instruction: Instruction) -> Self {
        Self::command(agent, "run", vec![instruction])
    }

    /// Sets the correlation subject.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Replaces the command options.
    #[must_use]
    pub fn with_opts(mut self, opts: CmdOpts) -> Self {
        self.opts = opts;
        self
    }

    /// Replaces the data payload.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// Routing class of this signal.
    #[must_use]
    pub fn class(&self) -> SignalClass {
        SignalClass::of(&self.ty)
    }

    /// Returns `true` for command signals (directives included).
    #[must_use]
    pub fn is_command(&self) -> bool {
        matches!(self.class(), SignalClass::Command | SignalClass::Directive)
    }

    /// Returns `true` for directive signals.
    #[must_use]
    pub fn is_directive(&self) -> bool {
        self.class() == SignalClass::Directive
    }

    /// Returns `true` for outbound event signals.
    #[must_use]
    pub fn is_event(&self) -> bool {
        self.class() == SignalClass::Event
    }

    /// Extracts the directive embedded in `data`.
    ///
    /// Fails with [`SignalError::InvalidDirective`] when `data` does
    /// not decode to a known directive.
    pub fn extract_directive(&self) -> Result<Directive, SignalError> {
        Directive::from_value(&self.data)
    }

    /// Extracts the command payload `(instructions, data, opts)`.
    ///
    /// Fails with [`SignalError::InvalidFormat`] when the signal has
    /// no instructions or its `data` is neither a mapping nor null.
    pub fn extract_command(&self) -> Result<(Vec<Instruction>, Payload, CmdOpts), SignalError> {
        if self.instructions.is_empty() {
            return Err(SignalError::InvalidFormat(
                "command signal carries no instructions".into(),
            ));
        }
        let data = match &self.data {
            Value::Null => Payload::new(),
            Value::Object(map) => map.clone(),
            other => {
                return Err(SignalError::InvalidFormat(format!(
                    "command data must be a mapping, got {other}"
                )))
            }
        };
        Ok((self.instructions.clone(), data, self.opts.clone()))
    }
}
