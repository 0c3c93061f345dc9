//! Chain runner: sequenced execution of pending instructions.
//!
//! Drains the agent's pending queue into a local list, runs each
//! instruction through the workflow executor with state threaded
//! through, accumulates directives, and applies them at the chain
//! boundary: agent directives in place, server directives returned in
//! order.
//!
//! ```text
//! pending: [i1, i2, i3]          (drained at start)
//!
//! step 1:  merged = state ∪ i1.params ──► run ──► result r1
//!          state' = state ∪ r1          directives += d1?
//! step 2:  merged = state' ∪ i2.params ─► run ──► ...
//! error:   stop; remaining steps discarded; error returned
//! ```

use crate::agent::AgentCore;
use crate::workflow::WorkflowExecutor;
use jido_action::ExecError;
use jido_signal::{CmdOpts, Directive, Instruction, RunnerKind};
use jido_types::merge;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Sequences an agent's pending instructions through the workflow
/// executor.
#[derive(Debug, Clone)]
pub struct ChainRunner {
    workflow: Arc<WorkflowExecutor>,
}

impl ChainRunner {
    /// Creates a chain runner executing through `workflow`.
    #[must_use]
    pub fn new(workflow: Arc<WorkflowExecutor>) -> Self {
        Self { workflow }
    }

    /// Runs the agent's pending instructions.
    ///
    /// Per step, params are the agent state overlaid with the
    /// instruction's params, and the context gets a `"state"`
    /// snapshot injected. Results fold into the state when
    /// `opts.apply_state` (the default); the last step's fold is the
    /// agent's `result` either way.
    ///
    /// The first failing step stops the chain: its error is returned,
    /// the remaining instructions are discarded, and the state stays
    /// as of the last successful step.
    ///
    /// Returns the accumulated *server* directives in order; agent
    /// directives (`enqueue_instructions`) land back on the agent's
    /// pending queue.
    pub async fn run(
        &self,
        core: &mut AgentCore,
        opts: &CmdOpts,
    ) -> Result<Vec<Directive>, ExecError> {
        let queued: Vec<Instruction> = match opts.runner() {
            RunnerKind::Chain => core.take_pending(),
            RunnerKind::Single => core.pending_instructions.pop_front().into_iter().collect(),
        };

        let mut accumulated: Vec<Directive> = Vec::new();

        for instruction in queued {
            let merged = merge(&core.state, &instruction.params);

            let mut context = merge(&opts.context, &instruction.context);
            context.insert("state".into(), Value::Object(core.state.clone()));

            let mut run_opts = instruction.opts.clone();
            run_opts.strict_validation = run_opts.strict_validation || opts.strict_validation;

            let outcome = self
                .workflow
                .run(
                    &instruction.action,
                    Value::Object(merged),
                    Value::Object(context),
                    &run_opts,
                )
                .await;

            match outcome.into_result() {
                Ok((result, directive)) => {
                    if let Some(directive) = directive {
                        accumulated.push(directive);
                    }
                    let new_state = merge(&core.state, &result);
                    if opts.apply_state {
                        core.state = new_state.clone();
                    }
                    core.result = Some(new_state);
                }
                Err((error, directive)) => {
                    if let Some(directive) = directive {
                        debug!(
                            "chain step '{}' failed; dropping directive '{}'",
                            instruction.action,
                            directive.tag()
                        );
                    }
                    return Err(error);
                }
            }
        }

        let mut server = Vec::new();
        for directive in accumulated {
            match directive {
                Directive::EnqueueInstructions { instructions } => {
                    core.pending_instructions.extend(instructions);
                }
                other => server.push(other),
            }
        }
        Ok(server)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use jido_action::{Action, ActionRegistry, RunContext, WorkflowOutcome};
    use jido_types::{AgentStatus, Payload};
    use serde_json::json;

    /// Increments `x` by one.
    struct Add;

    #[async_trait]
    impl Action for Add {
        fn name(&self) -> &str {
            "add"
        }

        async fn run(&self, params: Payload, _ctx: RunContext) -> WorkflowOutcome {
            let x = params.get("x").and_then(Value::as_i64).unwrap_or(0);
            let mut result = Payload::new();
            result.insert("x".into(), json!(x + 1));
            WorkflowOutcome::ok(result)
        }
    }

    /// Succeeds and asks the server to pause.
    struct Pauser;

    #[async_trait]
    impl Action for Pauser {
        fn name(&self) -> &str {
            "pauser"
        }

        async fn run(&self, _params: Payload, _ctx: RunContext) -> WorkflowOutcome {
            WorkflowOutcome::ok_with(
                Payload::new(),
                Directive::Transition {
                    to: AgentStatus::Paused,
                },
            )
        }
    }

    /// Always fails.
    struct Fail;

    #[async_trait]
    impl Action for Fail {
        fn name(&self) -> &str {
            "fail"
        }

        async fn run(&self, _params: Payload, _ctx: RunContext) -> WorkflowOutcome {
            WorkflowOutcome::err(ExecError::Execution("scripted failure".into()))
        }
    }

    fn chain() -> ChainRunner {
        let registry = Arc::new(ActionRegistry::with_builtins());
        registry.register(Arc::new(Add));
        registry.register(Arc::new(Pauser));
        registry.register(Arc::new(Fail));
        ChainRunner::new(Arc::new(WorkflowExecutor::new(registry)))
    }

    fn core_with_x(x: i64) -> AgentCore {
        let mut state = Payload::new();
        state.insert("x".into(), json!(x));
        AgentCore::with_state(state)
    }

    #[tokio::test]
    async fn state_threads_through_steps() {
        let chain = chain();
        let mut core = core_with_x(0);
        core.pending_instructions.push_back(Instruction::new("add"));
        core.pending_instructions.push_back(Instruction::new("add"));
        core.pending_instructions.push_back(Instruction::new("add"));

        let directives = chain.run(&mut core, &CmdOpts::default()).await.unwrap();
        assert!(directives.is_empty());
        assert_eq!(core.state["x"], json!(3));
        assert_eq!(core.result.as_ref().unwrap()["x"], json!(3));
    }

    #[tokio::test]
    async fn params_override_state() {
        let chain = chain();
        let mut core = core_with_x(0);
        core.pending_instructions
            .push_back(Instruction::new("add").param("x", json!(41)));

        chain.run(&mut core, &CmdOpts::default()).await.unwrap();
        assert_eq!(core.state["x"], json!(42));
    }

    #[tokio::test]
    async fn apply_state_false_touches_only_result() {
        let chain = chain();
        let mut core = core_with_x(10);
        core.pending_instructions.push_back(Instruction::new("add"));

        let opts = CmdOpts {
            apply_state: false,
            ..CmdOpts::default()
        };
        chain.run(&mut core, &opts).await.unwrap();

        assert_eq!(core.state["x"], json!(10));
        assert_eq!(core.result.as_ref().unwrap()["x"], json!(11));
    }

    #[tokio::test]
    async fn error_stops_chain_and_discards_rest() {
        let chain = chain();
        let mut core = core_with_x(0);
        core.pending_instructions.push_back(Instruction::new("add"));
        core.pending_instructions.push_back(
            Instruction::new("fail").with_opts(jido_signal::RunOpts {
                max_retries: 0,
                ..jido_signal::RunOpts::default()
            }),
        );
        core.pending_instructions.push_back(Instruction::new("add"));

        let err = chain.run(&mut core, &CmdOpts::default()).await.unwrap_err();
        assert!(matches!(err, ExecError::Execution(_)));
        // State as of the last successful step; the trailing add
        // never ran and is gone.
        assert_eq!(core.state["x"], json!(1));
        assert!(core.pending_instructions.is_empty());
    }

    #[tokio::test]
    async fn server_directives_returned_in_order() {
        let chain = chain();
        let mut core = AgentCore::new();
        core.pending_instructions.push_back(Instruction::new("pauser"));

        let directives = chain.run(&mut core, &CmdOpts::default()).await.unwrap();
        assert_eq!(
            directives,
            vec![Directive::Transition {
                to: AgentStatus::Paused
            }]
        );
    }

    #[tokio::test]
    async fn single_runner_takes_only_the_head() {
        let chain = chain();
        let mut core = core_with_x(0);
        core.pending_instructions.push_back(Instruction::new("add"));
        core.pending_instructions.push_back(Instruction::new("add"));

        let opts = CmdOpts {
            runner: Some(RunnerKind::Single),
            ..CmdOpts::default()
        };
        chain.run(&mut core, &opts).await.unwrap();

        assert_eq!(core.state["x"], json!(1));
        assert_eq!(core.pending_instructions.len(), 1);
    }

    #[tokio::test]
    async fn injected_state_visible_in_context() {
        struct SeesState;

        #[async_trait]
        impl Action for SeesState {
            fn name(&self) -> &str {
                "sees-state"
            }

            async fn run(&self, _params: Payload, ctx: RunContext) -> WorkflowOutcome {
                let x = ctx
                    .state()
                    .and_then(|s| s.get("x"))
                    .and_then(Value::as_i64)
                    .unwrap_or(-1);
                let mut result = Payload::new();
                result.insert("seen".into(), json!(x));
                WorkflowOutcome::ok(result)
            }
        }

        let registry = Arc::new(ActionRegistry::new());
        registry.register(Arc::new(SeesState));
        let chain = ChainRunner::new(Arc::new(WorkflowExecutor::new(registry)));

        let mut core = core_with_x(5);
        core.pending_instructions
            .push_back(Instruction::new("sees-state"));

        chain.run(&mut core, &CmdOpts::default()).await.unwrap();
        assert_eq!(core.state["seen"], json!(5));
    }
}
