//! The Action trait: the pluggable leaf of work.

use crate::error::ExecError;
use crate::group::TaskGroup;
use crate::outcome::WorkflowOutcome;
use async_trait::async_trait;
use jido_types::Payload;
use serde::{Deserialize, Serialize};

/// Compensation settings declared in an action's metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompensationSpec {
    /// Run `on_error` after a terminal failure.
    pub enabled: bool,
    /// Deadline for the compensation call in milliseconds. Falls back
    /// to the run's own timeout, then 5000 ms.
    pub timeout_ms: Option<u64>,
}

impl CompensationSpec {
    /// Compensation with the default deadline chain.
    #[must_use]
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            timeout_ms: None,
        }
    }

    /// Compensation with an explicit deadline.
    #[must_use]
    pub fn with_timeout(timeout_ms: u64) -> Self {
        Self {
            enabled: true,
            timeout_ms: Some(timeout_ms),
        }
    }
}

/// Static metadata an action exposes to the executor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionMeta {
    /// Human-readable description.
    pub description: Option<String>,
    /// Compensation behavior.
    pub compensation: CompensationSpec,
}

/// Per-run context handed to [`Action::run`].
///
/// `context` carries caller-provided values plus the injected
/// `"state"` key (the agent state at step start). `group` is the
/// attempt's cancellation scope: spawn concurrent work through it so
/// a timeout can reap everything.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    /// Context mapping, including the injected `"state"`.
    pub context: Payload,
    /// Cancellation scope of the current attempt.
    pub group: TaskGroup,
}

impl RunContext {
    /// Builds a context with a fresh task group.
    #[must_use]
    pub fn new(context: Payload) -> Self {
        Self {
            context,
            group: TaskGroup::new(),
        }
    }

    /// The agent state snapshot injected by the chain runner, if any.
    #[must_use]
    pub fn state(&self) -> Option<&serde_json::Value> {
        self.context.get("state")
    }
}

/// A pluggable unit of work, resolved from the registry by name.
///
/// # Contract
///
/// - `run` must be cancel-safe: the executor aborts the attempt task
///   on deadline, so cleanup must not rely on `run` resuming.
/// - Concurrent work belongs in `ctx.group`.
/// - `validate_params` runs once before the first attempt; with
///   `strict` set it should reject params it does not recognize.
/// - `on_error` is only invoked when `meta().compensation.enabled`.
///
/// # Example
///
/// ```
/// use jido_action::{async_trait, Action, RunContext, WorkflowOutcome};
/// use jido_types::Payload;
/// use serde_json::json;
///
/// struct Add;
///
/// #[async_trait]
/// impl Action for Add {
///     fn name(&self) -> &str {
///         "add"
///     }
///
///     async fn run(&self, params: Payload, _ctx: RunContext) -> WorkflowOutcome {
///         let x = params.get("x").and_then(|v| v.as_i64()).unwrap_or(0);
///         let mut result = Payload::new();
///         result.insert("x".into(), json!(x + 1));
///         WorkflowOutcome::ok(result)
///     }
/// }
/// ```
#[async_trait]
pub trait Action: Send + Sync {
    /// Registry name of this action.
    fn name(&self) -> &str;

    /// Static metadata. Defaults to no description, no compensation.
    fn meta(&self) -> ActionMeta {
        ActionMeta::default()
    }

    /// Validates params before the first attempt.
    ///
    /// `strict` requests rejection of unknown keys. The default
    /// accepts anything.
    fn validate_params(&self, _params: &Payload, _strict: bool) -> Result<(), ExecError> {
        Ok(())
    }

    /// Runs the action.
    async fn run(&self, params: Payload, ctx: RunContext) -> WorkflowOutcome;

    /// Compensation hook, called on terminal error when enabled in
    /// [`Self::meta`]. Returns the compensation result mapping.
    async fn on_error(
        &self,
        _params: Payload,
        error: ExecError,
        _ctx: RunContext,
    ) -> Result<Payload, ExecError> {
        Err(ExecError::Execution(format!(
            "no compensation handler for: {error}"
        )))
    }
}
