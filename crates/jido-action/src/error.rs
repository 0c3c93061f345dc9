//! Execution layer errors.
//!
//! Every failure a workflow run can produce, with `EXEC_` codes.
//! Recoverability drives the executor's retry loop: only
//! [`ExecError::Execution`] is retryable. Deadline expiration is
//! terminal by contract - a timed-out attempt is never retried.
//!
//! | Variant | Code | Recoverable |
//! |---------|------|-------------|
//! | `InvalidAction` | `EXEC_INVALID_ACTION` | No |
//! | `Validation` | `EXEC_VALIDATION` | No |
//! | `Execution` | `EXEC_FAILED` | Yes |
//! | `Timeout` | `EXEC_TIMEOUT` | No |
//! | `Compensation` | `EXEC_COMPENSATION` | No |
//! | `Internal` | `EXEC_INTERNAL` | No |

use jido_types::ErrorCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Workflow execution error.
///
/// Each variant carries a human message; variants with structured
/// context carry a JSON `detail` as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum ExecError {
    /// The named action is not registered or not runnable.
    #[error("invalid action: {0}")]
    InvalidAction(String),

    /// Params, context or directive shape failed validation.
    #[error("validation error: {message}")]
    Validation {
        /// What failed.
        message: String,
        /// Structured context (offending keys, raw value, ...).
        #[serde(default)]
        detail: Value,
    },

    /// The action crashed or returned a non-conforming value.
    ///
    /// The only retryable error.
    #[error("execution error: {0}")]
    Execution(String),

    /// The attempt's hard deadline expired. Never retried.
    #[error("Workflow timed out after {elapsed_ms}ms")]
    Timeout {
        /// Deadline that expired, in milliseconds.
        elapsed_ms: u64,
    },

    /// A terminal error plus the outcome of running compensation.
    #[error("compensation ran for: {original} (compensated: {compensated})")]
    Compensation {
        /// The error that triggered compensation.
        original: Box<ExecError>,
        /// Whether compensation succeeded.
        compensated: bool,
        /// `compensation_result` on success, `compensation_error`
        /// otherwise.
        detail: Value,
    },

    /// Unexpected fault inside the runtime itself.
    #[error("internal server error: {0}")]
    Internal(String),
}

impl ExecError {
    /// Shorthand for a validation error without structured detail.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            detail: Value::Null,
        }
    }

    /// Validation error carrying structured detail.
    #[must_use]
    pub fn validation_with(message: impl Into<String>, detail: Value) -> Self {
        Self::Validation {
            message: message.into(),
            detail,
        }
    }

    /// Returns `true` for deadline expirations.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

impl ErrorCode for ExecError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidAction(_) => "EXEC_INVALID_ACTION",
            Self::Validation { .. } => "EXEC_VALIDATION",
            Self::Execution(_) => "EXEC_FAILED",
            Self::Timeout { .. } => "EXEC_TIMEOUT",
            Self::Compensation { .. } => "EXEC_COMPENSATION",
            Self::Internal(_) => "EXEC_INTERNAL",
        }
    }

    /// Only plain execution failures may be retried. Timeouts are
    /// deliberately terminal.
    fn is_recoverable(&self) -> bool {
        matches!(self, Self::Execution(_))
    }
}
