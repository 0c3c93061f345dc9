//! The per-agent server: mailbox loop and owner handle.
//!
//! # Lifecycle
//!
//! 1. Built with [`AgentServer::new`] (status `initializing`)
//! 2. Started with [`AgentServer::run`] - enters `idle` and consumes
//!    the mailbox until stopped
//! 3. [`ServerHandle::stop`] (or dropping every handle) ends the
//!    loop: children stop, queued signals are discarded, status
//!    becomes `stopped`
//!
//! Hosts that want synchronous control instead of the loop drive
//! [`ServerState::process_signal`] directly through
//! [`AgentServer::state_mut`].

mod children;
mod executor;
mod state;

pub use state::ServerState;

use crate::agent::Agent;
use crate::bus::SignalBus;
use crate::config::ServerConfig;
use crate::emitter::OutputEmitter;
use crate::error::RuntimeError;
use crate::events;
use crate::workflow::WorkflowExecutor;
use jido_signal::Signal;
use jido_types::{AgentId, AgentStatus};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// One long-lived serving process for one agent.
pub struct AgentServer {
    state: ServerState,
    mailbox: mpsc::Receiver<Signal>,
    stop_rx: mpsc::Receiver<()>,
}

/// Cloneable handle for producers and the owner.
#[derive(Debug, Clone)]
pub struct ServerHandle {
    id: AgentId,
    capacity: usize,
    signal_tx: mpsc::Sender<Signal>,
    stop_tx: mpsc::Sender<()>,
}

impl ServerHandle {
    /// The served agent's id.
    #[must_use]
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Sends a signal, waiting for mailbox room.
    pub async fn send(&self, signal: Signal) -> Result<(), RuntimeError> {
        self.signal_tx
            .send(signal)
            .await
            .map_err(|_| RuntimeError::Internal("server mailbox closed".into()))
    }

    /// Sends a signal without waiting.
    pub fn try_send(&self, signal: Signal) -> Result<(), RuntimeError> {
        use tokio::sync::mpsc::error::TrySendError;
        self.signal_tx.try_send(signal).map_err(|e| match e {
            TrySendError::Full(_) => RuntimeError::QueueFull {
                capacity: self.capacity,
            },
            TrySendError::Closed(_) => {
                RuntimeError::Internal("server mailbox closed".into())
            }
        })
    }

    /// Requests the server loop to stop. Idempotent.
    pub fn stop(&self) {
        let _ = self.stop_tx.try_send(());
    }
}

impl AgentServer {
    /// Builds a server for `agent` and returns it with its handle.
    #[must_use]
    pub fn new(
        agent: Box<dyn Agent>,
        workflow: Arc<WorkflowExecutor>,
        config: ServerConfig,
    ) -> (Self, ServerHandle) {
        let (signal_tx, mailbox) = mpsc::channel(config.mailbox_capacity);
        let (stop_tx, stop_rx) = mpsc::channel(1);
        let id = *agent.id();
        let capacity = config.mailbox_capacity;
        let state = ServerState::new(agent, workflow, config);

        (
            Self {
                state,
                mailbox,
                stop_rx,
            },
            ServerHandle {
                id,
                capacity,
                signal_tx,
                stop_tx,
            },
        )
    }

    /// Adds an output subscriber (builder form).
    #[must_use]
    pub fn with_subscriber(mut self, subscriber: Box<dyn OutputEmitter>) -> Self {
        self.state.subscribe(subscriber);
        self
    }

    /// Attaches a signal bus (builder form).
    #[must_use]
    pub fn with_bus(mut self, bus: Arc<SignalBus>) -> Self {
        self.state.set_bus(bus);
        self
    }

    /// Read access to the server state.
    #[must_use]
    pub fn state(&self) -> &ServerState {
        &self.state
    }

    /// Mutable access for hosts driving dispatch synchronously.
    #[must_use]
    pub fn state_mut(&mut self) -> &mut ServerState {
        &mut self.state
    }

    /// Serves until stopped: consumes the mailbox, one signal at a
    /// time, emitting lifecycle events along the way.
    pub async fn run(mut self) {
        let id = self.state.agent_id();
        info!("agent server {} started", id);

        if self.state.status() == AgentStatus::Initializing {
            // Cannot fail: initializing -> idle is always legal.
            let _ = self.state.transition(AgentStatus::Idle);
        }

        loop {
            tokio::select! {
                biased;

                _ = self.stop_rx.recv() => {
                    info!("agent server {} stop requested", id);
                    break;
                }

                maybe = self.mailbox.recv() => match maybe {
                    Some(signal) => match self.state.process_signal(signal).await {
                        Ok(directives) if !directives.is_empty() => {
                            match serde_json::to_value(&directives) {
                                Ok(value) => self.state.emit(events::DIRECTIVES_RETURNED, value),
                                Err(e) => warn!("agent server {}: directive encode failed: {}", id, e),
                            }
                        }
                        Ok(_) => {}
                        Err(e) => warn!("agent server {}: signal failed: {}", id, e),
                    },
                    None => {
                        info!("agent server {}: all handles dropped", id);
                        break;
                    }
                }
            }
        }

        self.state.shutdown();
        info!("agent server {} stopped", id);
    }
}
