//! Workflow outcome sum type.
//!
//! Action runs historically produced several ad-hoc shapes (result,
//! result + directive, error, error + directive). Collapsing them
//! into one sum forces callers to handle every combination.

use crate::error::ExecError;
use jido_signal::Directive;
use jido_types::Payload;
use serde::{Deserialize, Serialize};

/// The result of running one action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowOutcome {
    /// Success with a result mapping.
    Ok {
        /// Result folded into agent state by the chain runner.
        result: Payload,
    },

    /// Success plus a directive for the runtime to interpret.
    OkWithDirective {
        /// Result folded into agent state by the chain runner.
        result: Payload,
        /// Directive accumulated by the chain runner.
        directive: Directive,
    },

    /// Failure.
    Err {
        /// What went wrong.
        error: ExecError,
    },

    /// Failure plus a directive. The chain runner stops on the error
    /// and drops the directive (logged, never applied).
    ErrWithDirective {
        /// What went wrong.
        error: ExecError,
        /// Dropped by the chain runner.
        directive: Directive,
    },
}

impl WorkflowOutcome {
    /// Success without a directive.
    #[must_use]
    pub fn ok(result: Payload) -> Self {
        Self::Ok { result }
    }

    /// Success with a directive.
    #[must_use]
    pub fn ok_with(result: Payload, directive: Directive) -> Self {
        Self::OkWithDirective { result, directive }
    }

    /// Failure without a directive.
    #[must_use]
    pub fn err(error: ExecError) -> Self {
        Self::Err { error }
    }

    /// Failure with a directive.
    #[must_use]
    pub fn err_with(error: ExecError, directive: Directive) -> Self {
        Self::ErrWithDirective { error, directive }
    }

    /// Returns `true` for the success variants.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. } | Self::OkWithDirective { .. })
    }

    /// Returns the result mapping on success.
    #[must_use]
    pub fn result(&self) -> Option<&Payload> {
        match self {
            Self::Ok { result } | Self::OkWithDirective { result, .. } => Some(result),
            _ => None,
        }
    }

    /// Returns the error on failure.
    #[must_use]
    pub fn error(&self) -> Option<&ExecError> {
        match self {
            Self::Err { error } | Self::ErrWithDirective { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Returns the attached directive, if any.
    #[must_use]
    pub fn directive(&self) -> Option<&Directive> {
        match self {
            Self::OkWithDirective { directive, .. }
            | Self::ErrWithDirective { directive, .. } => Some(directive),
            _ => None,
        }
    }

    /// Splits into `Result`, pairing each side with its optional
    /// directive.
    pub fn into_result(self) -> Result<(Payload, Option<Directive>), (ExecError, Option<Directive>)> {
        match self {
            Self::Ok { result } => Ok((result, None)),
            Self::OkWithDirective { result, directive } => Ok((result, Some(directive))),
            Self::Err { error } => Err((error, None)),
            Self::ErrWithDirective { error, directive } => Err((error, Some(directive))),
        }
    }
}

impl From<ExecError> for WorkflowOutcome {
    fn from(error: ExecError) -> Self {
        Self::Err { error }
    }
}
