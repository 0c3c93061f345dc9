//! Test support: collecting emitters and scripted actions.
//!
//! Shared by this crate's integration tests and by hosts testing
//! their own agents against the runtime.

use crate::emitter::OutputEmitter;
use async_trait::async_trait;
use jido_action::{Action, ActionMeta, CompensationSpec, ExecError, RunContext, WorkflowOutcome};
use jido_signal::{Signal, EVENT_PREFIX};
use jido_types::Payload;
use parking_lot::Mutex;
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Emitter that records every event for later assertions.
#[derive(Debug, Clone, Default)]
pub struct CollectingEmitter {
    events: Arc<Mutex<Vec<Signal>>>,
}

impl CollectingEmitter {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every collected event, in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<Signal> {
        self.events.lock().clone()
    }

    /// Event type suffixes (the part after `jido.agent.event.`), in
    /// emission order.
    #[must_use]
    pub fn suffixes(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .map(|s| {
                s.ty.strip_prefix(EVENT_PREFIX)
                    .unwrap_or(&s.ty)
                    .to_string()
            })
            .collect()
    }

    /// How many events carry the given suffix.
    #[must_use]
    pub fn count(&self, suffix: &str) -> usize {
        self.suffixes().iter().filter(|s| *s == suffix).count()
    }

    /// Discards everything collected so far.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl OutputEmitter for CollectingEmitter {
    fn emit(&self, signal: &Signal) -> bool {
        self.events.lock().push(signal.clone());
        true
    }

    fn clone_box(&self) -> Box<dyn OutputEmitter> {
        Box::new(self.clone())
    }
}

/// Returns `{x: params.x + 1}`.
pub struct AddAction;

#[async_trait]
impl Action for AddAction {
    fn name(&self) -> &str {
        "add"
    }

    async fn run(&self, params: Payload, _ctx: RunContext) -> WorkflowOutcome {
        let x = params
            .get("x")
            .and_then(serde_json::Value::as_i64)
            .unwrap_or(0);
        let mut result = Payload::new();
        result.insert("x".into(), json!(x + 1));
        WorkflowOutcome::ok(result)
    }
}

/// Sleeps for a fixed duration, then succeeds and raises its flag.
///
/// The flag stays low when the worker is aborted mid-sleep, which is
/// how tests prove a timed-out worker is dead.
pub struct SleepAction {
    millis: u64,
    completed: Arc<AtomicBool>,
}

impl SleepAction {
    /// Sleep for `millis` before completing.
    #[must_use]
    pub fn new(millis: u64) -> Self {
        Self {
            millis,
            completed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Shared completion flag.
    #[must_use]
    pub fn completed(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.completed)
    }
}

#[async_trait]
impl Action for SleepAction {
    fn name(&self) -> &str {
        "sleep"
    }

    async fn run(&self, _params: Payload, _ctx: RunContext) -> WorkflowOutcome {
        tokio::time::sleep(Duration::from_millis(self.millis)).await;
        self.completed.store(true, Ordering::SeqCst);
        WorkflowOutcome::ok(Payload::new())
    }
}

/// Fails the first `n` runs, then succeeds. Counts every start.
pub struct FlakyAction {
    remaining_failures: AtomicU32,
    starts: Arc<AtomicU32>,
}

impl FlakyAction {
    /// Fail `failures` times before the first success.
    #[must_use]
    pub fn new(failures: u32) -> Self {
        Self {
            remaining_failures: AtomicU32::new(failures),
            starts: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Shared run counter.
    #[must_use]
    pub fn starts(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.starts)
    }
}

#[async_trait]
impl Action for FlakyAction {
    fn name(&self) -> &str {
        "flaky"
    }

    async fn run(&self, _params: Payload, _ctx: RunContext) -> WorkflowOutcome {
        let attempt = self.starts.fetch_add(1, Ordering::SeqCst) + 1;

        let failed = self
            .remaining_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return WorkflowOutcome::err(ExecError::Execution(format!(
                "scripted failure on attempt {attempt}"
            )));
        }

        let mut result = Payload::new();
        result.insert("attempts".into(), json!(attempt));
        WorkflowOutcome::ok(result)
    }
}

/// Scripted primary/compensation behavior for compensation tests.
pub struct CompensatingAction {
    /// Sleep this long in `run` before failing (0 = fail at once).
    pub run_sleep_ms: u64,
    /// Sleep this long in `on_error` before resolving.
    pub comp_sleep_ms: u64,
    /// Whether compensation resolves to success.
    pub comp_succeeds: bool,
    /// Compensation deadline declared in metadata.
    pub comp_timeout_ms: Option<u64>,
}

impl CompensatingAction {
    /// Fails immediately; compensation sleeps then succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            run_sleep_ms: 0,
            comp_sleep_ms: 0,
            comp_succeeds: true,
            comp_timeout_ms: None,
        }
    }
}

impl Default for CompensatingAction {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Action for CompensatingAction {
    fn name(&self) -> &str {
        "compensating"
    }

    fn meta(&self) -> ActionMeta {
        ActionMeta {
            description: None,
            compensation: CompensationSpec {
                enabled: true,
                timeout_ms: self.comp_timeout_ms,
            },
        }
    }

    async fn run(&self, _params: Payload, _ctx: RunContext) -> WorkflowOutcome {
        if self.run_sleep_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.run_sleep_ms)).await;
        }
        WorkflowOutcome::err(ExecError::Execution("primary operation failed".into()))
    }

    async fn on_error(
        &self,
        _params: Payload,
        _error: ExecError,
        _ctx: RunContext,
    ) -> Result<Payload, ExecError> {
        if self.comp_sleep_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.comp_sleep_ms)).await;
        }
        if self.comp_succeeds {
            let mut result = Payload::new();
            result.insert("released".into(), json!(true));
            Ok(result)
        } else {
            Err(ExecError::Execution("compensation also failed".into()))
        }
    }
}
