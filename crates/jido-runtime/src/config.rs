//! Server configuration.

/// What to do when a subscriber cannot keep up with emitted events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlowSubscriberPolicy {
    /// Drop the event for that subscriber, with a warning.
    #[default]
    Drop,
    /// Remove the subscriber from the server.
    Disconnect,
}

/// Tunables for one [`AgentServer`](crate::AgentServer).
///
/// # Example
///
/// ```
/// use jido_runtime::{ServerConfig, SlowSubscriberPolicy};
///
/// let config = ServerConfig::default()
///     .with_max_queue(256)
///     .with_slow_subscriber(SlowSubscriberPolicy::Disconnect);
/// assert_eq!(config.max_queue, 256);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bound on the pending-signal queue.
    pub max_queue: usize,

    /// Capacity of the producer-facing mailbox.
    pub mailbox_capacity: usize,

    /// Policy for subscribers that fail or fall behind.
    pub slow_subscriber: SlowSubscriberPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_queue: 1024,
            mailbox_capacity: 64,
            slow_subscriber: SlowSubscriberPolicy::Drop,
        }
    }
}

impl ServerConfig {
    /// Sets the pending-signal queue bound.
    #[must_use]
    pub fn with_max_queue(mut self, max_queue: usize) -> Self {
        self.max_queue = max_queue;
        self
    }

    /// Sets the mailbox capacity.
    #[must_use]
    pub fn with_mailbox_capacity(mut self, capacity: usize) -> Self {
        self.mailbox_capacity = capacity;
        self
    }

    /// Sets the slow-subscriber policy.
    #[must_use]
    pub fn with_slow_subscriber(mut self, policy: SlowSubscriberPolicy) -> Self {
        self.slow_subscriber = policy;
        self
    }
}
