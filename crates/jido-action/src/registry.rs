//! Action registry: names to capability records.
//!
//! Signals carry action names, not code. The registry is the single
//! point where a name becomes a runnable [`Action`], shared read-mostly
//! across the servers of a host.

use crate::action::Action;
use crate::builtin::{EchoAction, NoopAction};
use crate::error::ExecError;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Thread-safe mapping from action names to implementations.
///
/// # Example
///
/// ```
/// use jido_action::ActionRegistry;
///
/// let registry = ActionRegistry::with_builtins();
/// assert!(registry.contains("noop"));
/// assert!(registry.resolve("missing").is_err());
/// ```
#[derive(Default)]
pub struct ActionRegistry {
    actions: RwLock<HashMap<String, Arc<dyn Action>>>,
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("names", &self.names())
            .finish()
    }
}

impl ActionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry pre-loaded with the builtin actions
    /// (`noop`, `echo`).
    #[must_use]
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.register(Arc::new(NoopAction));
        registry.register(Arc::new(EchoAction));
        registry
    }

    /// Registers an action under its own name, replacing any previous
    /// registration.
    pub fn register(&self, action: Arc<dyn Action>) {
        let name = action.name().to_string();
        debug!("registering action '{}'", name);
        self.actions.write().insert(name, action);
    }

    /// Removes an action. Returns `true` if it was registered.
    pub fn unregister(&self, name: &str) -> bool {
        self.actions.write().remove(name).is_some()
    }

    /// Resolves a name to a runnable action.
    ///
    /// Unknown names are [`ExecError::InvalidAction`].
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Action>, ExecError> {
        self.actions
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| ExecError::InvalidAction(name.to_string()))
    }

    /// Returns `true` if the name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.actions.read().contains_key(name)
    }

    /// Sorted list of registered names.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.actions.read().keys().cloned().collect();
        names.sort();
        names
    }
}
