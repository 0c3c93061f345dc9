//! Signal type grammar and classification.
//!
//! ```text
//! type           = event_type | cmd_type | directive_type
//! event_type     = "jido.agent.event." SEGMENT { "." SEGMENT }
//! cmd_type       = "jido.agent.cmd." SEGMENT
//! directive_type = "jido.agent.cmd.directive." SEGMENT
//! ```
//!
//! Classification is longest-prefix-first: a directive type is also a
//! command type lexically, so `DIRECTIVE_PREFIX` is checked before
//! `CMD_PREFIX`.

use serde::{Deserialize, Serialize};

/// Prefix of outbound event signal types.
pub const EVENT_PREFIX: &str = "jido.agent.event.";

/// Prefix of command signal types.
pub const CMD_PREFIX: &str = "jido.agent.cmd.";

/// Prefix of directive signal types (a subtype of command).
pub const DIRECTIVE_PREFIX: &str = "jido.agent.cmd.directive.";

/// Routing class of a signal type string.
///
/// # Example
///
/// ```
/// use jido_signal::SignalClass;
///
/// assert_eq!(SignalClass::of("jido.agent.cmd.run"), SignalClass::Command);
/// assert_eq!(
///     SignalClass::of("jido.agent.cmd.directive.transition"),
///     SignalClass::Directive
/// );
/// assert_eq!(
///     SignalClass::of("jido.agent.event.queue.step.completed"),
///     SignalClass::Event
/// );
/// assert_eq!(SignalClass::of("smtp.mail.sent"), SignalClass::Unknown);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalClass {
    /// `jido.agent.cmd.directive.*` - structured control directive.
    Directive,
    /// `jido.agent.cmd.*` (and not a directive) - command.
    Command,
    /// `jido.agent.event.*` - outbound event, never dispatched.
    Event,
    /// Anything else. Dispatch ignores these.
    Unknown,
}

impl SignalClass {
    /// Classifies a raw type string.
    ///
    /// A bare prefix with no trailing segment (e.g. exactly
    /// `"jido.agent.cmd."`) is [`SignalClass::Unknown`].
    #[must_use]
    pub fn of(ty: &str) -> Self {
        if let Some(rest) = ty.strip_prefix(DIRECTIVE_PREFIX) {
            if segments_valid(rest) {
                return Self::Directive;
            }
        } else if let Some(rest) = ty.strip_prefix(CMD_PREFIX) {
            if segments_valid(rest) {
                return Self::Command;
            }
        } else if let Some(rest) = ty.strip_prefix(EVENT_PREFIX) {
            if segments_valid(rest) {
                return Self::Event;
            }
        }
        Self::Unknown
    }
}

/// Builds a command type from a segment: `jido.agent.cmd.<segment>`.
#[must_use]
pub(crate) fn cmd_type(segment: &str) -> String {
    format!("{CMD_PREFIX}{segment}")
}

/// Builds a directive type: `jido.agent.cmd.directive.<segment>`.
#[must_use]
pub(crate) fn directive_type(segment: &str) -> String {
    format!("{DIRECTIVE_PREFIX}{segment}")
}

/// Builds an event type: `jido.agent.event.<suffix>`.
///
/// The suffix may itself be dotted (`queue.step.completed`).
#[must_use]
pub(crate) fn event_type(suffix: &str) -> String {
    format!("{EVENT_PREFIX}{suffix}")
}

/// Every dot-separated segment must be non-empty.
fn segments_valid(rest: &str) -> bool {
    !rest.is_empty() && rest.split('.').all(|s| !s.is_empty())
}
