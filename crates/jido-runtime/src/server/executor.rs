//! Signal executor: queue draining, routing and the dispatch paths.
//!
//! # Drain Loop
//!
//! ```text
//! process_signal(S):
//!   enqueue S ──► emit queue.processing.started
//!   while queue non-empty:
//!     paused? ──► leave queue intact, return ok
//!     dispatch head:
//!       ok      ──► emit queue.step.completed, continue
//!       ignore  ──► emit queue.step.ignored, continue
//!       error   ──► emit queue.step.failed + queue.processing.failed,
//!                   return error (remaining signals preserved)
//!   emit queue.processing.completed
//! ```
//!
//! Dispatch is strictly sequential; no two signals ever overlap.

use crate::agent::CmdInput;
use crate::bus::BusEmitter;
use crate::error::RuntimeError;
use crate::events;
use crate::server::state::ServerState;
use jido_action::ExecError;
use jido_signal::{CmdOpts, Directive, Signal, SignalClass, SignalError};
use jido_types::{AgentStatus, ErrorCode, Payload};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Outcome of dispatching one dequeued signal.
enum StepOutcome {
    /// Dispatched; server directives to return to the caller.
    Completed(Vec<Directive>),
    /// Not dispatched, with the reason.
    Ignored(String),
}

impl ServerState {
    /// Enqueues `signal` and drains the queue.
    ///
    /// Returns the server directives produced by directive-path
    /// dispatches, in order. On a step failure the error is returned
    /// and the remaining queued signals are preserved.
    pub async fn process_signal(
        &mut self,
        signal: Signal,
    ) -> Result<Vec<Directive>, RuntimeError> {
        self.enqueue(signal)?;
        self.drain_queue().await
    }

    /// Drains the pending queue without enqueueing anything new.
    ///
    /// Used by `process_signal` and by owners resuming a paused
    /// server after a direct [`transition`](Self::transition).
    pub async fn drain_queue(&mut self) -> Result<Vec<Directive>, RuntimeError> {
        self.emit(
            events::QUEUE_STARTED,
            json!({ "queue_length": self.pending_signals.len() }),
        );

        let mut collected = Vec::new();

        loop {
            if self.status() == AgentStatus::Paused {
                debug!(
                    "agent {}: paused, {} signals held",
                    self.agent_id(),
                    self.pending_signals.len()
                );
                return Ok(collected);
            }

            let Some(signal) = self.pending_signals.pop_front() else {
                break;
            };

            match self.dispatch(&signal).await {
                Ok(StepOutcome::Completed(directives)) => {
                    collected.extend(directives);
                    self.emit(
                        events::STEP_COMPLETED,
                        json!({ "signal_id": signal.id.as_str(), "type": &signal.ty }),
                    );
                }
                Ok(StepOutcome::Ignored(reason)) => {
                    self.emit(
                        events::STEP_IGNORED,
                        json!({
                            "signal_id": signal.id.as_str(),
                            "type": &signal.ty,
                            "reason": reason
                        }),
                    );
                }
                Err(error) => {
                    self.emit(
                        events::STEP_FAILED,
                        json!({
                            "signal_id": signal.id.as_str(),
                            "type": &signal.ty,
                            "reason": error.to_string(),
                            "code": error.code()
                        }),
                    );
                    self.emit(
                        events::QUEUE_FAILED,
                        json!({ "remaining": self.pending_signals.len() }),
                    );
                    return Err(error);
                }
            }
        }

        self.emit(events::QUEUE_COMPLETED, json!({}));
        Ok(collected)
    }

    /// Routes one signal by type and status.
    async fn dispatch(&mut self, signal: &Signal) -> Result<StepOutcome, RuntimeError> {
        match signal.class() {
            SignalClass::Directive => {
                self.gate()?;
                self.run_directive(signal).await.map(StepOutcome::Completed)
            }
            SignalClass::Command => {
                self.gate()?;
                self.run_command(signal)
                    .await
                    .map(|()| StepOutcome::Completed(Vec::new()))
            }
            SignalClass::Event | SignalClass::Unknown => Ok(StepOutcome::Ignored(
                SignalError::UnknownType(signal.ty.clone()).to_string(),
            )),
        }
    }

    /// Rejects dispatch outside `idle`/`running`.
    fn gate(&self) -> Result<(), RuntimeError> {
        if self.status().is_dispatchable() {
            Ok(())
        } else {
            Err(RuntimeError::InvalidState {
                status: self.status(),
            })
        }
    }

    /// The command path.
    ///
    /// Extraction precedes the `running` transition so a malformed
    /// signal leaves the state untouched.
    async fn run_command(&mut self, signal: &Signal) -> Result<(), RuntimeError> {
        let (instructions, data, opts) = signal.extract_command()?;

        if self.status() == AgentStatus::Idle {
            self.transition(AgentStatus::Running)?;
        }

        let result = self
            .agent
            .cmd(CmdInput::Instructions(instructions), data, opts)
            .await;

        match result {
            Err(error) => {
                self.emit(
                    events::CMD_FAILED,
                    json!({
                        "signal_id": signal.id.as_str(),
                        "error": error.to_string(),
                        "code": error.code()
                    }),
                );
                self.transition(AgentStatus::Idle)?;
                Err(error.into())
            }
            Ok(directives) => {
                let agent_id = self.agent_id();
                let pending = self.agent.core_mut().take_pending();

                if pending.is_empty() {
                    self.emit(
                        events::CMD_SUCCESS,
                        json!({ "signal_id": signal.id.as_str() }),
                    );
                } else {
                    self.emit(
                        events::CMD_SUCCESS_PENDING,
                        json!({ "signal_id": signal.id.as_str(), "pending": pending.len() }),
                    );
                }

                // Restore idle before anything below can fail, so no
                // error path leaves the server running.
                self.transition(AgentStatus::Idle)?;

                for instruction in pending {
                    let followup = Signal::from_instruction(&agent_id, instruction);
                    self.enqueue(followup)?;
                }

                for directive in directives {
                    match directive {
                        Directive::EnqueueInstructions { instructions } => {
                            for instruction in instructions {
                                let followup = Signal::from_instruction(&agent_id, instruction);
                                self.enqueue(followup)?;
                            }
                        }
                        other => self.apply_server_directive(other)?,
                    }
                }
                Ok(())
            }
        }
    }

    /// The directive path.
    ///
    /// The signal's directive is applied here - agent directives via
    /// the agent's `cmd`, server directives by the server itself.
    /// Directives *produced* by the application (pending instructions
    /// wrapped as `enqueue_instructions`) are returned to the caller,
    /// never re-queued.
    async fn run_directive(&mut self, signal: &Signal) -> Result<Vec<Directive>, RuntimeError> {
        let directive = signal.extract_directive()?;

        if self.status() == AgentStatus::Idle {
            self.transition(AgentStatus::Running)?;
        }

        // Transition targets apply after the running dance unwinds.
        let mut deferred: Option<AgentStatus> = None;

        let applied: Result<Vec<Directive>, RuntimeError> = match directive {
            agent_directive @ Directive::EnqueueInstructions { .. } => self
                .agent
                .cmd(
                    CmdInput::Directive(agent_directive),
                    Payload::new(),
                    CmdOpts::default(),
                )
                .await
                .map_err(RuntimeError::from),
            Directive::Transition { to } => {
                deferred = Some(to);
                Ok(Vec::new())
            }
            Directive::SpawnChild { id, state } => {
                let parent = self.agent_id();
                self.children
                    .spawn(&parent, &id, state, &self.workflow, &self.config)
                    .map(|()| Vec::new())
            }
            Directive::StopChild { id } => self.children.stop(&id).map(|()| Vec::new()),
            Directive::RegisterOutput { stream } => {
                self.register_output(&stream).map(|()| Vec::new())
            }
        };

        match applied {
            Err(error) => {
                self.emit(
                    events::CMD_FAILED,
                    json!({
                        "signal_id": signal.id.as_str(),
                        "error": error.to_string(),
                        "code": error.code()
                    }),
                );
                self.transition(AgentStatus::Idle)?;
                Err(error)
            }
            Ok(mut directives) => {
                let pending = self.agent.core_mut().take_pending();
                if pending.is_empty() {
                    self.emit(
                        events::CMD_SUCCESS,
                        json!({ "signal_id": signal.id.as_str() }),
                    );
                } else {
                    self.emit(
                        events::CMD_SUCCESS_PENDING,
                        json!({ "signal_id": signal.id.as_str(), "pending": pending.len() }),
                    );
                    directives.push(Directive::EnqueueInstructions {
                        instructions: pending,
                    });
                }

                self.transition(AgentStatus::Idle)?;
                if let Some(to) = deferred {
                    if to != AgentStatus::Idle {
                        self.transition(to)?;
                    }
                }
                Ok(directives)
            }
        }
    }

    /// Applies a server directive produced by a command dispatch.
    fn apply_server_directive(&mut self, directive: Directive) -> Result<(), RuntimeError> {
        match directive {
            Directive::EnqueueInstructions { instructions } => {
                // Command dispatch converts these to signals before
                // reaching here; tolerate strays by re-queueing.
                self.agent
                    .core_mut()
                    .pending_instructions
                    .extend(instructions);
                Ok(())
            }
            Directive::Transition { to } => {
                if to == self.status() {
                    Ok(())
                } else {
                    self.transition(to)
                }
            }
            Directive::SpawnChild { id, state } => {
                let parent = self.agent_id();
                self.children
                    .spawn(&parent, &id, state, &self.workflow, &self.config)
            }
            Directive::StopChild { id } => self.children.stop(&id),
            Directive::RegisterOutput { stream } => self.register_output(&stream),
        }
    }

    /// Attaches a bus-backed output sink for `stream`.
    fn register_output(&mut self, stream: &str) -> Result<(), RuntimeError> {
        let Some(bus) = &self.bus else {
            return Err(ExecError::validation("no bus configured for register_output").into());
        };
        let emitter = BusEmitter::new(Arc::clone(bus), stream);
        self.subscribe(Box::new(emitter));
        debug!("agent {}: output registered to '{}'", self.agent_id(), stream);
        Ok(())
    }
}
