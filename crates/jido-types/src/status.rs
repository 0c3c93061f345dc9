//! Agent lifecycle status and its transition table.
//!
//! # Status Lifecycle
//!
//! ```text
//! initializing ──► idle ⇄ running
//!                   │
//!                   ⇅
//!                 paused          any ──► stopped
//! ```
//!
//! Transitions outside this graph are illegal and must be rejected by
//! the caller without changing the current status.

use serde::{Deserialize, Serialize};

/// Execution status of a served agent.
///
/// # State Categories
///
/// | Category | States | Signals Dispatch |
/// |----------|--------|------------------|
/// | Setup    | `initializing` | rejected (`invalid_state`) |
/// | Ready    | `idle` | yes (enters `running`) |
/// | Active   | `running` | yes |
/// | Held     | `paused` | re-queued |
/// | Terminal | `stopped` | rejected (`invalid_state`) |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    /// Setup phase before the server accepts signals.
    #[default]
    Initializing,

    /// Waiting for work; signals dispatch immediately.
    Idle,

    /// A signal is being executed right now.
    Running,

    /// Temporarily held; incoming signals are re-queued until resume.
    Paused,

    /// Terminal. The server will process nothing further.
    Stopped,
}

impl AgentStatus {
    /// Returns `true` if moving from `self` to `to` is a legal
    /// transition.
    ///
    /// Legal edges: `initializing→idle`, `idle→running`,
    /// `running→idle`, `idle⇄paused`, and `*→stopped`.
    ///
    /// # Example
    ///
    /// ```
    /// use jido_types::AgentStatus;
    ///
    /// assert!(AgentStatus::Idle.can_transition(AgentStatus::Running));
    /// assert!(AgentStatus::Paused.can_transition(AgentStatus::Idle));
    /// assert!(!AgentStatus::Running.can_transition(AgentStatus::Paused));
    /// assert!(AgentStatus::Running.can_transition(AgentStatus::Stopped));
    /// ```
    #[must_use]
    pub fn can_transition(self, to: AgentStatus) -> bool {
        use AgentStatus::*;
        matches!(
            (self, to),
            (_, Stopped)
                | (Initializing, Idle)
                | (Idle, Running)
                | (Running, Idle)
                | (Idle, Paused)
                | (Paused, Idle)
        )
    }

    /// Returns `true` if signals may dispatch in this status.
    ///
    /// `paused` is not dispatchable - signals are re-queued instead.
    #[must_use]
    pub fn is_dispatchable(self) -> bool {
        matches!(self, Self::Idle | Self::Running)
    }

    /// Returns `true` for the terminal status.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Stopped)
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initializing => write!(f, "initializing"),
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Paused => write!(f, "paused"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}
