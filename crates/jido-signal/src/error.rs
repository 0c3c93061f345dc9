//! Signal layer errors.
//!
//! Decode and format failures for envelopes, options and directives.
//! All variants carry the `SIGNAL_` code prefix and none are
//! recoverable: a malformed signal will not improve on retry.

use jido_types::ErrorCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Signal decode/format error.
///
/// | Variant | When |
/// |---------|------|
/// | `InvalidFormat` | envelope lacks required fields |
/// | `UnknownType` | type string outside the grammar |
/// | `InvalidDirective` | `data` does not decode to a known directive |
/// | `InvalidOpts` | options mapping carries unknown or malformed keys |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum SignalError {
    /// Envelope lacks required fields for its class.
    #[error("invalid signal format: {0}")]
    InvalidFormat(String),

    /// Type string matches no recognized prefix.
    ///
    /// Dispatch reports this as an *ignore*, never as a failure.
    #[error("unknown signal type: {0}")]
    UnknownType(String),

    /// Directive payload failed validation.
    #[error("invalid directive: {0}")]
    InvalidDirective(String),

    /// Options mapping failed validation.
    #[error("invalid options: {0}")]
    InvalidOpts(String),
}

impl ErrorCode for SignalError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidFormat(_) => "SIGNAL_INVALID_FORMAT",
            Self::UnknownType(_) => "SIGNAL_UNKNOWN_TYPE",
            Self::InvalidDirective(_) => "SIGNAL_INVALID_DIRECTIVE",
            Self::InvalidOpts(_) => "SIGNAL_INVALID_OPTS",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}
