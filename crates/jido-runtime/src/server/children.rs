//! Subordinate server supervision.
//!
//! `spawn_child` directives materialize here: each child is a full
//! [`AgentServer`](super::AgentServer) with a [`RunnerAgent`] sharing
//! the parent's workflow executor, running in its own task. Stopping
//! the parent stops every child.

use crate::agent::RunnerAgent;
use crate::config::ServerConfig;
use crate::error::RuntimeError;
use crate::server::{AgentServer, ServerHandle};
use crate::workflow::WorkflowExecutor;
use jido_types::{AgentId, Payload};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

struct ChildEntry {
    handle: ServerHandle,
    task: JoinHandle<()>,
}

/// Named set of running child servers.
#[derive(Default)]
pub(crate) struct ChildSet {
    children: HashMap<String, ChildEntry>,
}

impl std::fmt::Debug for ChildSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.children.keys().collect();
        names.sort();
        f.debug_struct("ChildSet").field("children", &names).finish()
    }
}

impl ChildSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Starts a child server under `parent`.
    ///
    /// The child's agent id derives from the parent id and the child
    /// name, so respawning the same name yields the same identity.
    pub(crate) fn spawn(
        &mut self,
        parent: &AgentId,
        id: &str,
        state: Payload,
        workflow: &Arc<WorkflowExecutor>,
        config: &ServerConfig,
    ) -> Result<(), RuntimeError> {
        if self.children.contains_key(id) {
            return Err(RuntimeError::DuplicateChild(id.to_string()));
        }

        let child_id = AgentId::named(&format!("{parent}/{id}"));
        let agent = RunnerAgent::new(child_id, Arc::clone(workflow)).with_state(state);
        let (server, handle) = AgentServer::new(Box::new(agent), Arc::clone(workflow), config.clone());
        let task = tokio::spawn(server.run());

        info!("spawned child '{}' ({})", id, child_id);
        self.children
            .insert(id.to_string(), ChildEntry { handle, task });
        Ok(())
    }

    /// Stops a child by name.
    pub(crate) fn stop(&mut self, id: &str) -> Result<(), RuntimeError> {
        let entry = self
            .children
            .remove(id)
            .ok_or_else(|| RuntimeError::UnknownChild(id.to_string()))?;
        entry.handle.stop();
        debug!("stopped child '{}'", id);
        Ok(())
    }

    /// Stops every child, forcibly if the stop request cannot land.
    pub(crate) fn stop_all(&mut self) {
        for (id, entry) in self.children.drain() {
            entry.handle.stop();
            entry.task.abort();
            debug!("stopped child '{}' on shutdown", id);
        }
    }

    /// Returns `true` if a child with this name is running.
    pub(crate) fn contains(&self, id: &str) -> bool {
        self.children.contains_key(id)
    }

    pub(crate) fn len(&self) -> usize {
        self.children.len()
    }
}
