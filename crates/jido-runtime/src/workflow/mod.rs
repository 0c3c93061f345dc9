//! Workflow executor: one action, one deadline, supervised.
//!
//! Runs a single action through the pipeline
//!
//! ```text
//! normalize params ─► normalize context ─► resolve action
//!        ─► validate params ─► attempt loop ─► compensation
//! ```
//!
//! Every attempt is spawned into a fresh worker task with its own
//! [`TaskGroup`]; the caller waits for the result or the deadline.
//! On deadline the worker and all grouped children are aborted and
//! the run fails with a timeout, which is never retried. Plain
//! execution errors retry with doubling backoff while the budget
//! lasts; terminal errors run the action's compensation hook when its
//! metadata enables it.

mod handle;
mod telemetry;

pub use handle::{WorkflowHandle, CANCEL_GRACE_MS};

use jido_action::{
    normalize, Action, ActionRegistry, ExecError, RunContext, TaskGroup, WorkflowOutcome,
};
use jido_types::ErrorCode;
use jido_signal::RunOpts;
use jido_types::Payload;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::AbortHandle;
use tokio::time::Instant;
use tracing::debug;

/// Compensation budget when neither the action metadata nor the run
/// options provide one, in milliseconds.
const DEFAULT_COMPENSATION_TIMEOUT_MS: u64 = 5_000;

/// Executes single actions under deadline, retry and compensation.
///
/// Cheap to share: hold it in an `Arc` and clone the handle around.
///
/// # Example
///
/// ```
/// use jido_action::ActionRegistry;
/// use jido_runtime::WorkflowExecutor;
/// use jido_signal::RunOpts;
/// use serde_json::json;
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let registry = Arc::new(ActionRegistry::with_builtins());
/// let executor = WorkflowExecutor::new(registry);
///
/// let outcome = executor
///     .run("echo", json!({"msg": "hi"}), json!(null), &RunOpts::default())
///     .await;
/// assert!(outcome.is_ok());
/// # }
/// ```
#[derive(Debug)]
pub struct WorkflowExecutor {
    registry: Arc<ActionRegistry>,
}

impl WorkflowExecutor {
    /// Creates an executor over the given registry.
    #[must_use]
    pub fn new(registry: Arc<ActionRegistry>) -> Self {
        Self { registry }
    }

    /// The underlying action registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<ActionRegistry> {
        &self.registry
    }

    /// Runs one action to a terminal outcome.
    ///
    /// `params` and `context` accept a mapping or a list of
    /// `[key, value]` pairs; anything else fails validation before
    /// the first attempt. Total attempts are bounded by
    /// `opts.max_retries + 1`.
    pub async fn run(
        &self,
        name: &str,
        params: Value,
        context: Value,
        opts: &RunOpts,
    ) -> WorkflowOutcome {
        let params = match normalize(params) {
            Ok(params) => params,
            Err(e) => return e.into(),
        };
        let context = match normalize(context) {
            Ok(context) => context,
            Err(e) => return e.into(),
        };
        let action = match self.registry.resolve(name) {
            Ok(action) => action,
            Err(e) => return e.into(),
        };

        if let Err(e) = action.validate_params(&params, opts.strict_validation) {
            // Whatever the action raised, the caller sees a validation error.
            let error = match e {
                err @ ExecError::Validation { .. } => err,
                other => ExecError::validation(other.to_string()),
            };
            return error.into();
        }

        let mut retry = 0u32;
        loop {
            telemetry::start(opts.telemetry, name, &params, &context);
            let started = Instant::now();
            let outcome = self
                .attempt(Arc::clone(&action), params.clone(), context.clone(), opts)
                .await;
            let elapsed = started.elapsed();

            let error = outcome.error().cloned();
            match error {
                None => {
                    telemetry::complete(opts.telemetry, name, elapsed);
                    return outcome;
                }
                Some(error) => {
                    telemetry::error(opts.telemetry, name, elapsed, &error);

                    if error.is_recoverable() && retry < opts.max_retries {
                        let delay = opts.backoff_delay(retry);
                        debug!(
                            "workflow '{}' retry {}/{} after {:?}",
                            name,
                            retry + 1,
                            opts.max_retries,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        retry += 1;
                        continue;
                    }

                    return self.compensated(action, params, context, opts, error).await;
                }
            }
        }
    }

    /// One supervised attempt.
    async fn attempt(
        &self,
        action: Arc<dyn Action>,
        params: Payload,
        context: Payload,
        opts: &RunOpts,
    ) -> WorkflowOutcome {
        let group = TaskGroup::new();
        let ctx = RunContext {
            context,
            group: group.clone(),
        };

        let mut worker = tokio::spawn(async move { action.run(params, ctx).await });
        let guard = AttemptGuard {
            worker: worker.abort_handle(),
            group,
        };

        let joined = match opts.deadline() {
            Some(deadline) => match tokio::time::timeout(deadline, &mut worker).await {
                Ok(joined) => joined,
                Err(_) => {
                    drop(guard);
                    return WorkflowOutcome::err(ExecError::Timeout {
                        elapsed_ms: opts.timeout_ms,
                    });
                }
            },
            None => (&mut worker).await,
        };

        // Reaps stray children; a no-op for the finished worker.
        drop(guard);

        match joined {
            Ok(outcome) => outcome,
            Err(e) if e.is_panic() => WorkflowOutcome::err(ExecError::Execution(format!(
                "Caught panic: {}",
                panic_reason(e)
            ))),
            Err(_) => {
                WorkflowOutcome::err(ExecError::Execution("worker task cancelled".into()))
            }
        }
    }

    /// Runs the compensation hook for a terminal error, when enabled.
    async fn compensated(
        &self,
        action: Arc<dyn Action>,
        params: Payload,
        context: Payload,
        opts: &RunOpts,
        original: ExecError,
    ) -> WorkflowOutcome {
        let meta = action.meta();
        if !meta.compensation.enabled {
            return WorkflowOutcome::err(original);
        }

        let timeout_ms = meta
            .compensation
            .timeout_ms
            .or_else(|| (opts.timeout_ms > 0).then_some(opts.timeout_ms))
            .unwrap_or(DEFAULT_COMPENSATION_TIMEOUT_MS);

        debug!(
            "compensating '{}' within {}ms after: {}",
            action.name(),
            timeout_ms,
            original
        );

        let ctx = RunContext::new(context);
        let handler_error = original.clone();
        let mut worker =
            tokio::spawn(async move { action.on_error(params, handler_error, ctx).await });

        let (compensated, detail) =
            match tokio::time::timeout(Duration::from_millis(timeout_ms), &mut worker).await {
                Ok(Ok(Ok(result))) => (true, json!({ "compensation_result": result })),
                Ok(Ok(Err(comp_err))) => {
                    (false, json!({ "compensation_error": comp_err.to_string() }))
                }
                Ok(Err(join_err)) => (
                    false,
                    json!({
                        "compensation_error": format!("Caught panic: {}", panic_reason(join_err))
                    }),
                ),
                Err(_) => {
                    worker.abort();
                    (
                        false,
                        json!({
                            "compensation_error":
                                format!("Compensation timed out after {}ms", timeout_ms)
                        }),
                    )
                }
            };

        WorkflowOutcome::err(ExecError::Compensation {
            original: Box::new(original),
            compensated,
            detail,
        })
    }
}

/// Aborts the attempt's worker and child tasks on every exit path,
/// including cancellation of the executor itself mid-await.
struct AttemptGuard {
    worker: AbortHandle,
    group: TaskGroup,
}

impl Drop for AttemptGuard {
    fn drop(&mut self) {
        self.worker.abort();
        self.group.abort_all();
    }
}

fn panic_reason(err: tokio::task::JoinError) -> String {
    match err.try_into_panic() {
        Ok(payload) => {
            if let Some(s) = payload.downcast_ref::<&str>() {
                (*s).to_string()
            } else if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "opaque panic payload".to_string()
            }
        }
        Err(_) => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    struct Panicky;

    #[async_trait]
    impl Action for Panicky {
        fn name(&self) -> &str {
            "panicky"
        }

        async fn run(&self, _params: Payload, _ctx: RunContext) -> WorkflowOutcome {
            panic!("boom");
        }
    }

    struct Picky;

    #[async_trait]
    impl Action for Picky {
        fn name(&self) -> &str {
            "picky"
        }

        fn validate_params(&self, params: &Payload, _strict: bool) -> Result<(), ExecError> {
            if params.contains_key("x") {
                Ok(())
            } else {
                Err(ExecError::validation("missing 'x'"))
            }
        }

        async fn run(&self, _params: Payload, _ctx: RunContext) -> WorkflowOutcome {
            WorkflowOutcome::ok(Payload::new())
        }
    }

    fn executor_with(actions: Vec<Arc<dyn Action>>) -> WorkflowExecutor {
        let registry = Arc::new(ActionRegistry::with_builtins());
        for action in actions {
            registry.register(action);
        }
        WorkflowExecutor::new(registry)
    }

    #[tokio::test]
    async fn echo_runs_to_ok() {
        let executor = executor_with(vec![]);
        let outcome = executor
            .run("echo", json!({"k": "v"}), json!(null), &RunOpts::default())
            .await;
        assert_eq!(outcome.result().unwrap()["k"], json!("v"));
    }

    #[tokio::test]
    async fn unknown_action_is_invalid_action() {
        let executor = executor_with(vec![]);
        let outcome = executor
            .run("ghost", json!(null), json!(null), &RunOpts::default())
            .await;
        assert!(matches!(
            outcome.error(),
            Some(ExecError::InvalidAction(name)) if name == "ghost"
        ));
    }

    #[tokio::test]
    async fn bad_params_shape_fails_before_any_attempt() {
        let executor = executor_with(vec![]);
        let outcome = executor
            .run("echo", json!(42), json!(null), &RunOpts::default())
            .await;
        assert!(matches!(outcome.error(), Some(ExecError::Validation { .. })));
    }

    #[tokio::test]
    async fn pair_list_params_are_accepted() {
        let executor = executor_with(vec![]);
        let outcome = executor
            .run("echo", json!([["k", "v"]]), json!(null), &RunOpts::default())
            .await;
        assert_eq!(outcome.result().unwrap()["k"], json!("v"));
    }

    #[tokio::test]
    async fn failed_validation_is_validation_error() {
        let executor = executor_with(vec![Arc::new(Picky)]);
        let outcome = executor
            .run("picky", json!({}), json!(null), &RunOpts::default())
            .await;
        assert!(matches!(outcome.error(), Some(ExecError::Validation { .. })));

        let outcome = executor
            .run("picky", json!({"x": 1}), json!(null), &RunOpts::default())
            .await;
        assert!(outcome.is_ok());
    }

    #[tokio::test]
    async fn panic_becomes_execution_error() {
        let executor = executor_with(vec![Arc::new(Panicky)]);
        let opts = RunOpts {
            max_retries: 0,
            ..RunOpts::default()
        };
        let outcome = executor.run("panicky", json!(null), json!(null), &opts).await;
        match outcome.error() {
            Some(ExecError::Execution(msg)) => {
                assert!(msg.contains("Caught panic"), "{msg}");
                assert!(msg.contains("boom"), "{msg}");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
