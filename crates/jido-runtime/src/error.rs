//! Runtime layer errors.
//!
//! Errors surfaced by `process_signal` and the server loop. Signal
//! and execution errors from the lower layers pass through
//! transparently, keeping their own codes; the variants native to
//! this layer use the `RUNTIME_` prefix.

use jido_action::ExecError;
use jido_signal::SignalError;
use jido_types::{AgentStatus, ErrorCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error from signal dispatch or server management.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum RuntimeError {
    /// The signal cannot run in the current status
    /// (`initializing` or `stopped`), or a transition target is
    /// illegal.
    #[error("invalid state: {status}")]
    InvalidState {
        /// Status at the time of the rejection.
        status: AgentStatus,
    },

    /// The pending-signal queue is at capacity.
    ///
    /// Recoverable: retry after the executor drains.
    #[error("signal queue full (capacity {capacity})")]
    QueueFull {
        /// Configured queue bound.
        capacity: usize,
    },

    /// A child with this name is already running.
    #[error("child '{0}' already exists")]
    DuplicateChild(String),

    /// No child with this name is running.
    #[error("unknown child '{0}'")]
    UnknownChild(String),

    /// Envelope decode/format failure; keeps its `SIGNAL_*` code.
    #[error(transparent)]
    Signal(#[from] SignalError),

    /// Workflow execution failure; keeps its `EXEC_*` code.
    #[error(transparent)]
    Exec(#[from] ExecError),

    /// Caught unexpected fault inside the runtime itself.
    #[error("internal server error: {0}")]
    Internal(String),
}

impl ErrorCode for RuntimeError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidState { .. } => "RUNTIME_INVALID_STATE",
            Self::QueueFull { .. } => "RUNTIME_QUEUE_FULL",
            Self::DuplicateChild(_) => "RUNTIME_DUPLICATE_CHILD",
            Self::UnknownChild(_) => "RUNTIME_UNKNOWN_CHILD",
            Self::Signal(e) => e.code(),
            Self::Exec(e) => e.code(),
            Self::Internal(_) => "RUNTIME_INTERNAL",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::QueueFull { .. } => true,
            Self::Signal(e) => e.is_recoverable(),
            Self::Exec(e) => e.is_recoverable(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jido_types::assert_error_codes;

    fn native_variants() -> Vec<RuntimeError> {
        vec![
            RuntimeError::InvalidState {
                status: AgentStatus::Stopped,
            },
            RuntimeError::QueueFull { capacity: 8 },
            RuntimeError::DuplicateChild("w1".into()),
            RuntimeError::UnknownChild("w1".into()),
            RuntimeError::Internal("x".into()),
        ]
    }

    #[test]
    fn native_codes_valid() {
        assert_error_codes(&native_variants(), "RUNTIME_");
    }

    #[test]
    fn wrapped_errors_keep_their_codes() {
        let signal: RuntimeError = SignalError::InvalidFormat("no id".into()).into();
        assert_eq!(signal.code(), "SIGNAL_INVALID_FORMAT");

        let exec: RuntimeError = ExecError::Timeout { elapsed_ms: 5 }.into();
        assert_eq!(exec.code(), "EXEC_TIMEOUT");
        assert!(!exec.is_recoverable());

        let retryable: RuntimeError = ExecError::Execution("x".into()).into();
        assert!(retryable.is_recoverable());
    }

    #[test]
    fn queue_full_is_recoverable() {
        assert!(RuntimeError::QueueFull { capacity: 8 }.is_recoverable());
        assert!(!RuntimeError::Internal("x".into()).is_recoverable());
    }

    #[test]
    fn transparent_messages_pass_through() {
        let err: RuntimeError = SignalError::InvalidDirective("bad tag".into()).into();
        assert_eq!(err.to_string(), "invalid directive: bad tag");
    }
}
