//! Task group: scoped container for an attempt's concurrent work.
//!
//! Every workflow attempt gets a fresh group. Child tasks an action
//! spawns through it share one cancellation scope - when the attempt
//! times out or is cancelled, [`TaskGroup::abort_all`] kills every
//! child so nothing outlives the attempt.

use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use tokio::task::{AbortHandle, JoinHandle};

/// Shared cancellation scope for spawned child tasks.
///
/// Cloning the group shares the scope; aborting through any clone
/// aborts every task spawned through any clone.
///
/// # Example
///
/// ```
/// use jido_action::TaskGroup;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let group = TaskGroup::new();
/// let handle = group.spawn(async { 21 * 2 });
/// assert_eq!(handle.await.unwrap(), 42);
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct TaskGroup {
    handles: Arc<Mutex<Vec<AbortHandle>>>,
}

impl TaskGroup {
    /// Creates an empty group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a task into the group.
    ///
    /// The returned [`JoinHandle`] can be awaited as usual; the task
    /// additionally becomes abortable via [`Self::abort_all`].
    pub fn spawn<F>(&self, fut: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let handle = tokio::spawn(fut);
        self.handles.lock().push(handle.abort_handle());
        handle
    }

    /// Forcibly aborts every task spawned into the group.
    ///
    /// Aborting an already-finished task is a no-op, so this is safe
    /// to call unconditionally on every attempt exit path.
    pub fn abort_all(&self) {
        let handles = std::mem::take(&mut *self.handles.lock());
        for handle in handles {
            handle.abort();
        }
    }

    /// Number of tasks spawned so far (finished tasks included until
    /// the next [`Self::abort_all`]).
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.lock().len()
    }

    /// Returns `true` if nothing was spawned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.lock().is_empty()
    }
}
