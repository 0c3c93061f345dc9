//! Workflow executor scenarios: deadlines, retries, compensation and
//! task-group supervision.

use async_trait::async_trait;
use jido_runtime::testing::{CompensatingAction, FlakyAction, SleepAction};
use jido_runtime::{
    Action, ActionRegistry, ExecError, RunContext, RunOpts, WorkflowExecutor, WorkflowOutcome,
};
use jido_types::Payload;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

fn executor_with(actions: Vec<Arc<dyn Action>>) -> WorkflowExecutor {
    let registry = Arc::new(ActionRegistry::with_builtins());
    for action in actions {
        registry.register(action);
    }
    WorkflowExecutor::new(registry)
}

#[tokio::test]
async fn deadline_kills_the_worker_and_never_retries() {
    let sleep = SleepAction::new(300);
    let completed = sleep.completed();
    let executor = executor_with(vec![Arc::new(sleep)]);

    let opts = RunOpts {
        timeout_ms: 100,
        max_retries: 2,
        ..RunOpts::default()
    };

    let started = Instant::now();
    let outcome = executor.run("sleep", json!(null), json!(null), &opts).await;
    let elapsed = started.elapsed();

    assert!(matches!(
        outcome.error(),
        Some(ExecError::Timeout { elapsed_ms: 100 })
    ));
    // One attempt only: a retry would have pushed past 200ms.
    assert!(elapsed < Duration::from_millis(200), "took {elapsed:?}");

    // Give the aborted worker time to have finished, had it survived.
    tokio::time::sleep(Duration::from_millis(350)).await;
    assert!(!completed.load(Ordering::SeqCst), "worker outlived abort");
}

#[tokio::test]
async fn retries_with_backoff_until_success() {
    let flaky = FlakyAction::new(2);
    let starts = flaky.starts();
    let executor = executor_with(vec![Arc::new(flaky)]);

    let opts = RunOpts {
        max_retries: 2,
        backoff_ms: 10,
        ..RunOpts::default()
    };

    let started = Instant::now();
    let outcome = executor.run("flaky", json!(null), json!(null), &opts).await;
    let elapsed = started.elapsed();

    assert!(outcome.is_ok());
    assert_eq!(outcome.result().unwrap()["attempts"], json!(3));
    assert_eq!(starts.load(Ordering::SeqCst), 3);
    // Slept roughly 10ms then 20ms between attempts.
    assert!(elapsed >= Duration::from_millis(30), "took {elapsed:?}");
}

#[tokio::test]
async fn attempts_are_bounded_by_the_retry_budget() {
    let flaky = FlakyAction::new(10);
    let starts = flaky.starts();
    let executor = executor_with(vec![Arc::new(flaky)]);

    let opts = RunOpts {
        max_retries: 1,
        backoff_ms: 1,
        ..RunOpts::default()
    };

    let outcome = executor.run("flaky", json!(null), json!(null), &opts).await;
    assert!(matches!(outcome.error(), Some(ExecError::Execution(_))));
    assert_eq!(starts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn compensation_success_wraps_the_original_error() {
    let executor = executor_with(vec![Arc::new(CompensatingAction::new())]);

    let opts = RunOpts {
        max_retries: 0,
        ..RunOpts::default()
    };
    let outcome = executor
        .run("compensating", json!(null), json!(null), &opts)
        .await;

    match outcome.error() {
        Some(ExecError::Compensation {
            original,
            compensated,
            detail,
        }) => {
            assert!(compensated);
            assert!(matches!(**original, ExecError::Execution(_)));
            assert_eq!(detail["compensation_result"]["released"], json!(true));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn compensation_timeout_reports_the_budget() {
    let action = CompensatingAction {
        run_sleep_ms: 0,
        comp_sleep_ms: 300,
        comp_succeeds: true,
        comp_timeout_ms: Some(50),
    };
    let executor = executor_with(vec![Arc::new(action)]);

    let opts = RunOpts {
        max_retries: 0,
        ..RunOpts::default()
    };
    let outcome = executor
        .run("compensating", json!(null), json!(null), &opts)
        .await;

    match outcome.error() {
        Some(ExecError::Compensation {
            compensated,
            detail,
            ..
        }) => {
            assert!(!compensated);
            assert_eq!(
                detail["compensation_error"],
                json!("Compensation timed out after 50ms")
            );
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn failed_compensation_is_reported() {
    let action = CompensatingAction {
        run_sleep_ms: 0,
        comp_sleep_ms: 0,
        comp_succeeds: false,
        comp_timeout_ms: None,
    };
    let executor = executor_with(vec![Arc::new(action)]);

    let opts = RunOpts {
        max_retries: 0,
        ..RunOpts::default()
    };
    let outcome = executor
        .run("compensating", json!(null), json!(null), &opts)
        .await;

    match outcome.error() {
        Some(ExecError::Compensation {
            compensated,
            detail,
            ..
        }) => {
            assert!(!compensated);
            assert!(detail["compensation_error"]
                .as_str()
                .unwrap()
                .contains("compensation also failed"));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn timed_out_attempt_still_compensates() {
    let action = CompensatingAction {
        run_sleep_ms: 300,
        comp_sleep_ms: 0,
        comp_succeeds: true,
        comp_timeout_ms: Some(500),
    };
    let executor = executor_with(vec![Arc::new(action)]);

    let opts = RunOpts {
        timeout_ms: 50,
        max_retries: 2,
        ..RunOpts::default()
    };
    let outcome = executor
        .run("compensating", json!(null), json!(null), &opts)
        .await;

    match outcome.error() {
        Some(ExecError::Compensation {
            original,
            compensated,
            ..
        }) => {
            assert!(matches!(**original, ExecError::Timeout { elapsed_ms: 50 }));
            assert!(compensated);
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn deadline_reaps_grouped_child_tasks() {
    struct GroupSpawner {
        child_finished: Arc<AtomicBool>,
    }

    #[async_trait]
    impl Action for GroupSpawner {
        fn name(&self) -> &str {
            "group-spawner"
        }

        async fn run(&self, _params: Payload, ctx: RunContext) -> WorkflowOutcome {
            let flag = Arc::clone(&self.child_finished);
            let _child = ctx.group.spawn(async move {
                tokio::time::sleep(Duration::from_millis(200)).await;
                flag.store(true, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(300)).await;
            WorkflowOutcome::ok(Payload::new())
        }
    }

    let child_finished = Arc::new(AtomicBool::new(false));
    let executor = executor_with(vec![Arc::new(GroupSpawner {
        child_finished: Arc::clone(&child_finished),
    })]);

    let opts = RunOpts {
        timeout_ms: 50,
        max_retries: 0,
        ..RunOpts::default()
    };
    let outcome = executor
        .run("group-spawner", json!(null), json!(null), &opts)
        .await;
    assert!(matches!(outcome.error(), Some(ExecError::Timeout { .. })));

    // The child would have finished by now, had it survived.
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(
        !child_finished.load(Ordering::SeqCst),
        "grouped child outlived the attempt"
    );
}

#[tokio::test]
async fn zero_timeout_waits_for_slow_work() {
    let sleep = SleepAction::new(150);
    let completed = sleep.completed();
    let executor = executor_with(vec![Arc::new(sleep)]);

    let opts = RunOpts {
        timeout_ms: 0,
        ..RunOpts::default()
    };
    let outcome = executor.run("sleep", json!(null), json!(null), &opts).await;

    assert!(outcome.is_ok());
    assert!(completed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn async_handle_cancels_cooperatively() {
    let sleep = SleepAction::new(10_000);
    let completed = sleep.completed();
    let registry = Arc::new(ActionRegistry::new());
    registry.register(Arc::new(sleep));
    let executor = Arc::new(WorkflowExecutor::new(registry));

    let opts = RunOpts {
        timeout_ms: 0,
        ..RunOpts::default()
    };
    let handle = executor.run_async("sleep", json!(null), json!(null), opts);

    let started = Instant::now();
    handle.cancel().await;

    assert!(started.elapsed() < Duration::from_millis(500));
    assert!(!completed.load(Ordering::SeqCst));
}
