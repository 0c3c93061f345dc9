//! Recognized command options.
//!
//! The options mapping on a command signal is bounded: the keys below
//! are the whole vocabulary, and unknown keys fail decoding.

use crate::error::SignalError;
use jido_types::Payload;
use serde::{Deserialize, Serialize};

/// Chain-runner selection override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunnerKind {
    /// Run every pending instruction in order (the default).
    Chain,
    /// Run only the head instruction; the rest stay queued.
    Single,
}

/// Options accepted on a command signal.
///
/// | key | effect |
/// |-----|--------|
/// | `apply_state` | fold step results into agent state (default `true`) |
/// | `strict_validation` | param validation rejects unknown keys |
/// | `runner` | chain-runner override (`chain` / `single`) |
/// | `context` | additional run context merged into every step |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CmdOpts {
    /// Fold each step's result into the agent state.
    pub apply_state: bool,

    /// Reject unknown param keys during validation.
    pub strict_validation: bool,

    /// Runner override; `None` means [`RunnerKind::Chain`].
    pub runner: Option<RunnerKind>,

    /// Extra context merged into each instruction's context
    /// (instruction context wins).
    pub context: Payload,
}

impl Default for CmdOpts {
    fn default() -> Self {
        Self {
            apply_state: true,
            strict_validation: false,
            runner: None,
            context: Payload::new(),
        }
    }
}

impl CmdOpts {
    /// Decodes options from a raw JSON value, rejecting unknown keys.
    ///
    /// `null` decodes to the defaults.
    pub fn from_value(value: serde_json::Value) -> Result<Self, SignalError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value).map_err(|e| SignalError::InvalidOpts(e.to_string()))
    }

    /// Effective runner, defaulting to [`RunnerKind::Chain`].
    #[must_use]
    pub fn runner(&self) -> RunnerKind {
        self.runner.unwrap_or(RunnerKind::Chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_applies_state_with_chain_runner() {
        let opts = CmdOpts::default();
        assert!(opts.apply_state);
        assert!(!opts.strict_validation);
        assert_eq!(opts.runner(), RunnerKind::Chain);
        assert!(opts.context.is_empty());
    }

    #[test]
    fn decode_known_keys() {
        let opts = CmdOpts::from_value(json!({
            "apply_state": false,
            "runner": "single",
            "context": {"tenant": "acme"}
        }))
        .unwrap();
        assert!(!opts.apply_state);
        assert_eq!(opts.runner(), RunnerKind::Single);
        assert_eq!(opts.context["tenant"], json!("acme"));
    }

    #[test]
    fn decode_null_is_default() {
        assert_eq!(CmdOpts::from_value(json!(null)).unwrap(), CmdOpts::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = CmdOpts::from_value(json!({"apply_sate": true})).unwrap_err();
        assert!(matches!(err, SignalError::InvalidOpts(_)));
    }

    #[test]
    fn non_mapping_is_rejected() {
        assert!(CmdOpts::from_value(json!([1, 2])).is_err());
        assert!(CmdOpts::from_value(json!("chain")).is_err());
    }
}
