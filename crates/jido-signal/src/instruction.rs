//! Instructions: the smallest schedulable unit of work.
//!
//! An instruction names an action (an opaque registry handle), the
//! params and context to run it with, and the execution options the
//! workflow executor honors (deadline, retry budget, backoff,
//! telemetry verbosity).

use jido_types::Payload;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ceiling for the exponential retry backoff, in milliseconds.
pub const MAX_BACKOFF_MS: u64 = 30_000;

/// Telemetry verbosity for a workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TelemetryMode {
    /// Start/complete/error events including params and context.
    #[default]
    Full,
    /// Start/complete/error events, action name and duration only.
    Minimal,
    /// No telemetry.
    Silent,
}

/// Execution options for a single workflow run.
///
/// | option | effect | default |
/// |--------|--------|---------|
/// | `timeout` | hard per-attempt deadline in ms (0 = none) | 5000 |
/// | `max_retries` | retries after the first attempt | 1 |
/// | `backoff` | initial retry delay in ms, doubles, capped 30000 | 250 |
/// | `telemetry` | `full` \| `minimal` \| `silent` | `full` |
///
/// Timeouts are never retried; only execution errors consume the
/// retry budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunOpts {
    /// Per-attempt deadline in milliseconds. `0` disables the deadline.
    #[serde(rename = "timeout")]
    pub timeout_ms: u64,

    /// Upper bound on retries after the first attempt.
    pub max_retries: u32,

    /// Initial retry delay in milliseconds.
    #[serde(rename = "backoff")]
    pub backoff_ms: u64,

    /// Telemetry verbosity.
    pub telemetry: TelemetryMode,

    /// Reject unknown params during validation.
    pub strict_validation: bool,
}

impl Default for RunOpts {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            max_retries: 1,
            backoff_ms: 250,
            telemetry: TelemetryMode::Full,
            strict_validation: false,
        }
    }
}

impl RunOpts {
    /// Returns the sleep before retry number `retry` (0-based):
    /// `min(backoff * 2^retry, 30000)` ms.
    ///
    /// # Example
    ///
    /// ```
    /// use jido_signal::RunOpts;
    /// use std::time::Duration;
    ///
    /// let opts = RunOpts { backoff_ms: 250, ..RunOpts::default() };
    /// assert_eq!(opts.backoff_delay(0), Duration::from_millis(250));
    /// assert_eq!(opts.backoff_delay(1), Duration::from_millis(500));
    /// assert_eq!(opts.backoff_delay(10), Duration::from_millis(30_000));
    /// ```
    #[must_use]
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        let ms = self
            .backoff_ms
            .saturating_mul(2u64.saturating_pow(retry))
            .min(MAX_BACKOFF_MS);
        Duration::from_millis(ms)
    }

    /// Returns the per-attempt deadline, or `None` when disabled.
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

/// A single `(action, params)` pair plus run context and options.
///
/// Instructions are queued on the agent, threaded through the chain
/// runner, and ultimately executed by the workflow executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// Registry handle of the action to run.
    pub action: String,

    /// Action params. Merged over agent state at chain time
    /// (params win).
    #[serde(default)]
    pub params: Payload,

    /// Run context handed to the action alongside params.
    #[serde(default)]
    pub context: Payload,

    /// Execution options for this instruction.
    #[serde(default)]
    pub opts: RunOpts,
}

impl Instruction {
    /// Creates an instruction with empty params, context and default
    /// options.
    #[must_use]
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            params: Payload::new(),
            context: Payload::new(),
            opts: RunOpts::default(),
        }
    }

    /// Replaces the params.
    #[must_use]
    pub fn with_params(mut self, params: Payload) -> Self {
        self.params = params;
        self
    }

    /// Replaces the context.
    #[must_use]
    pub fn with_context(mut self, context: Payload) -> Self {
        self.context = context;
        self
    }

    /// Replaces the execution options.
    #[must_use]
    pub fn with_opts(mut self, opts: RunOpts) -> Self {
        self.opts = opts;
        self
    }

    /// Inserts one param, building incrementally.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.params.insert(key.into(), value);
        self
    }
}
