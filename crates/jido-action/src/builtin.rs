//! Builtin actions.
//!
//! Small always-available actions used by examples, tests and as
//! placeholders in instruction chains.

use crate::action::{Action, ActionMeta, RunContext};
use crate::outcome::WorkflowOutcome;
use async_trait::async_trait;
use jido_types::Payload;

/// Does nothing, successfully. Result is empty.
pub struct NoopAction;

#[async_trait]
impl Action for NoopAction {
    fn name(&self) -> &str {
        "noop"
    }

    fn meta(&self) -> ActionMeta {
        ActionMeta {
            description: Some("does nothing".into()),
            ..ActionMeta::default()
        }
    }

    async fn run(&self, _params: Payload, _ctx: RunContext) -> WorkflowOutcome {
        WorkflowOutcome::ok(Payload::new())
    }
}

/// Returns its params as the result, unchanged.
pub struct EchoAction;

#[async_trait]
impl Action for EchoAction {
    fn name(&self) -> &str {
        "echo"
    }

    fn meta(&self) -> ActionMeta {
        ActionMeta {
            description: Some("returns params as result".into()),
            ..ActionMeta::default()
        }
    }

    async fn run(&self, params: Payload, _ctx: RunContext) -> WorkflowOutcome {
        WorkflowOutcome::ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn noop_returns_empty() {
        let out = NoopAction.run(Payload::new(), RunContext::default()).await;
        assert!(out.is_ok());
        assert!(out.result().unwrap().is_empty());
    }

    #[tokio::test]
    async fn echo_reflects_params() {
        let mut params = Payload::new();
        params.insert("msg".into(), json!("hello"));

        let out = EchoAction.run(params.clone(), RunContext::default()).await;
        assert_eq!(out.result(), Some(&params));
    }
}
