//! Server state: the agent value, status machine, queue and sinks.
//!
//! All mutation happens on the executor's task; external code only
//! reaches this through [`ServerState`]'s methods or the server
//! handle's mailbox.

use crate::agent::Agent;
use crate::bus::SignalBus;
use crate::config::{ServerConfig, SlowSubscriberPolicy};
use crate::emitter::OutputEmitter;
use crate::error::RuntimeError;
use crate::events;
use crate::server::children::ChildSet;
use crate::workflow::WorkflowExecutor;
use jido_signal::Signal;
use jido_types::{AgentId, AgentStatus};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, warn};

/// Everything one server owns.
///
/// | field | role |
/// |-------|------|
/// | `agent` | the embedded user-defined agent value |
/// | `status` | lifecycle position, mutated only via [`transition`](Self::transition) |
/// | `pending_signals` | FIFO the executor drains |
/// | subscribers | output sinks for `jido.agent.event.*` signals |
/// | children | subordinate servers spawned by directives |
pub struct ServerState {
    pub(crate) agent: Box<dyn Agent>,
    status: AgentStatus,
    pub(crate) pending_signals: VecDeque<Signal>,
    pub(crate) subscribers: Vec<Box<dyn OutputEmitter>>,
    pub(crate) children: ChildSet,
    pub(crate) bus: Option<Arc<SignalBus>>,
    pub(crate) workflow: Arc<WorkflowExecutor>,
    pub(crate) config: ServerConfig,
}

impl ServerState {
    pub(crate) fn new(
        agent: Box<dyn Agent>,
        workflow: Arc<WorkflowExecutor>,
        config: ServerConfig,
    ) -> Self {
        Self {
            agent,
            status: AgentStatus::Initializing,
            pending_signals: VecDeque::new(),
            subscribers: Vec::new(),
            children: ChildSet::new(),
            bus: None,
            workflow,
            config,
        }
    }

    /// The served agent's id.
    #[must_use]
    pub fn agent_id(&self) -> AgentId {
        *self.agent.id()
    }

    /// The served agent, read-only.
    #[must_use]
    pub fn agent(&self) -> &dyn Agent {
        self.agent.as_ref()
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> AgentStatus {
        self.status
    }

    /// The pending-signal queue, in dispatch order.
    #[must_use]
    pub fn pending_signals(&self) -> &VecDeque<Signal> {
        &self.pending_signals
    }

    /// Number of running child servers.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Number of attached output subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Adds an output subscriber.
    pub fn subscribe(&mut self, subscriber: Box<dyn OutputEmitter>) {
        self.subscribers.push(subscriber);
    }

    /// Attaches the bus used by `register_output` directives.
    pub fn set_bus(&mut self, bus: Arc<SignalBus>) {
        self.bus = Some(bus);
    }

    /// Moves the status machine, emitting a transition event.
    ///
    /// Illegal targets fail with `invalid_state` and leave the status
    /// untouched.
    pub fn transition(&mut self, to: AgentStatus) -> Result<(), RuntimeError> {
        if !self.status.can_transition(to) {
            warn!(
                "agent {}: illegal transition {} -> {}",
                self.agent_id(),
                self.status,
                to
            );
            return Err(RuntimeError::InvalidState {
                status: self.status,
            });
        }

        let from = self.status;
        self.status = to;
        debug!("agent {}: {} -> {}", self.agent_id(), from, to);
        self.emit(events::TRANSITION, json!({ "from": from, "to": to }));
        Ok(())
    }

    /// Appends a signal to the pending queue, bounded by
    /// `config.max_queue`.
    pub(crate) fn enqueue(&mut self, signal: Signal) -> Result<(), RuntimeError> {
        if self.pending_signals.len() >= self.config.max_queue {
            warn!(
                "agent {}: queue full, rejecting {}",
                self.agent_id(),
                signal.id
            );
            return Err(RuntimeError::QueueFull {
                capacity: self.config.max_queue,
            });
        }
        self.pending_signals.push_back(signal);
        Ok(())
    }

    /// Builds and fans out one event signal.
    ///
    /// Never blocks: a subscriber that cannot accept the event loses
    /// it (with a warning) or is disconnected, per the configured
    /// policy.
    pub(crate) fn emit(&mut self, suffix: &str, payload: Value) {
        let event = Signal::event(&self.agent_id(), suffix, payload);
        let policy = self.config.slow_subscriber;

        self.subscribers.retain(|subscriber| {
            if subscriber.emit(&event) {
                true
            } else {
                warn!("subscriber lost event '{}'", event.ty);
                matches!(policy, SlowSubscriberPolicy::Drop)
            }
        });
    }

    /// Stops children, discards the queue and enters `stopped`.
    pub(crate) fn shutdown(&mut self) {
        self.children.stop_all();
        let discarded = self.pending_signals.len();
        if discarded > 0 {
            warn!(
                "agent {}: discarding {} queued signals on shutdown",
                self.agent_id(),
                discarded
            );
            self.pending_signals.clear();
        }
        // Any status may stop.
        let _ = self.transition(AgentStatus::Stopped);
    }
}
