//! Async workflow handles.
//!
//! `run_async` detaches a workflow run into its own worker and hands
//! back a [`WorkflowHandle`]. Awaiting the handle bounds the wait and
//! kills the worker on expiry; cancelling sends a graceful stop and
//! escalates to a hard abort after a grace period.

use super::WorkflowExecutor;
use jido_action::{ExecError, WorkflowOutcome};
use jido_signal::RunOpts;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

/// Grace period between a cooperative cancel and the hard abort, in
/// milliseconds.
pub const CANCEL_GRACE_MS: u64 = 100;

/// Handle to a detached workflow run.
///
/// Dropping the handle cancels the run: the worker observes the lost
/// cancel channel and stops instead of running detached forever.
#[derive(Debug)]
pub struct WorkflowHandle {
    id: Uuid,
    worker: JoinHandle<WorkflowOutcome>,
    cancel: Option<oneshot::Sender<()>>,
}

impl WorkflowExecutor {
    /// Starts a workflow in its own worker and returns the handle.
    ///
    /// The run proceeds with the executor's full pipeline (deadline,
    /// retry, compensation) exactly as [`WorkflowExecutor::run`].
    #[must_use]
    pub fn run_async(
        self: &Arc<Self>,
        name: &str,
        params: Value,
        context: Value,
        opts: RunOpts,
    ) -> WorkflowHandle {
        let executor = Arc::clone(self);
        let name = name.to_string();
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();

        let worker = tokio::spawn(async move {
            tokio::select! {
                outcome = executor.run(&name, params, context, &opts) => outcome,
                _ = cancel_rx => {
                    debug!("workflow '{}' cancelled", name);
                    WorkflowOutcome::err(ExecError::Execution("workflow cancelled".into()))
                }
            }
        });

        WorkflowHandle {
            id: Uuid::new_v4(),
            worker,
            cancel: Some(cancel_tx),
        }
    }
}

impl WorkflowHandle {
    /// Unique handle id.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns `true` once the worker has finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Waits for the outcome, at most `timeout_ms` (0 = no bound).
    ///
    /// On expiry the worker is forcibly terminated and the result is
    /// a timeout error.
    pub async fn await_with_timeout(mut self, timeout_ms: u64) -> WorkflowOutcome {
        let joined = if timeout_ms == 0 {
            (&mut self.worker).await
        } else {
            match tokio::time::timeout(Duration::from_millis(timeout_ms), &mut self.worker).await
            {
                Ok(joined) => joined,
                Err(_) => {
                    self.worker.abort();
                    return WorkflowOutcome::err(ExecError::Timeout {
                        elapsed_ms: timeout_ms,
                    });
                }
            }
        };

        match joined {
            Ok(outcome) => outcome,
            Err(e) if e.is_panic() => {
                WorkflowOutcome::err(ExecError::Execution("worker panicked".into()))
            }
            Err(_) => WorkflowOutcome::err(ExecError::Execution("worker task cancelled".into())),
        }
    }

    /// Cancels the run: graceful signal first, hard abort after
    /// [`CANCEL_GRACE_MS`]. Completes normally even if the worker
    /// already finished.
    pub async fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        if tokio::time::timeout(Duration::from_millis(CANCEL_GRACE_MS), &mut self.worker)
            .await
            .is_err()
        {
            self.worker.abort();
        }
    }
}
