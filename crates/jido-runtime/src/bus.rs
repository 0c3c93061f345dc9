//! In-memory signal bus.
//!
//! The bus is the fan-out point shared by servers on a host:
//! subscribers register a name and receive, in order, every signal
//! published to it. Delivery is best-effort - a saturated subscriber
//! loses the event with a warning, it never blocks a publisher.
//!
//! Persistence, acknowledgements and expected-version checks belong
//! to external bus adapters; the core only requires what this type
//! provides.

use crate::emitter::OutputEmitter;
use jido_signal::Signal;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Default per-subscriber buffer.
const SUBSCRIBER_BUFFER: usize = 256;

/// Named fan-out of signals to bounded subscriber channels.
///
/// # Example
///
/// ```
/// use jido_runtime::SignalBus;
/// use jido_signal::Signal;
/// use jido_types::AgentId;
/// use serde_json::json;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let bus = SignalBus::new();
/// let mut rx = bus.subscribe("audit");
///
/// let agent = AgentId::named("worker");
/// let event = Signal::event(&agent, "cmd.success", json!({}));
/// assert_eq!(bus.publish("audit", std::slice::from_ref(&event)), 1);
///
/// assert_eq!(rx.recv().await.unwrap().ty, event.ty);
/// # }
/// ```
pub struct SignalBus {
    subscribers: RwLock<HashMap<String, mpsc::Sender<Signal>>>,
    capacity: usize,
}

impl std::fmt::Debug for SignalBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalBus")
            .field("subscribers", &self.subscribers.read().len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl Default for SignalBus {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalBus {
    /// Creates a bus with the default subscriber buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(SUBSCRIBER_BUFFER)
    }

    /// Creates a bus with an explicit per-subscriber buffer.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    /// Registers a subscriber under `name`, replacing any previous
    /// registration, and returns its receiving end.
    pub fn subscribe(&self, name: &str) -> mpsc::Receiver<Signal> {
        let (tx, rx) = mpsc::channel(self.capacity);
        if self.subscribers.write().insert(name.to_string(), tx).is_some() {
            debug!("bus subscriber '{}' replaced", name);
        }
        rx
    }

    /// Removes a subscriber. Returns `true` if it existed.
    pub fn unsubscribe(&self, name: &str) -> bool {
        self.subscribers.write().remove(name).is_some()
    }

    /// Publishes signals to the named subscriber, in order.
    ///
    /// Returns the number of signals delivered. Signals that do not
    /// fit the subscriber's buffer are dropped with a warning; a
    /// missing subscriber delivers nothing.
    pub fn publish(&self, name: &str, signals: &[Signal]) -> usize {
        let subscribers = self.subscribers.read();
        let Some(tx) = subscribers.get(name) else {
            debug!("bus publish to unknown subscriber '{}'", name);
            return 0;
        };

        let mut delivered = 0;
        for signal in signals {
            if tx.try_send(signal.clone()).is_ok() {
                delivered += 1;
            } else {
                warn!("bus subscriber '{}' saturated, dropping {}", name, signal.ty);
            }
        }
        delivered
    }

    /// Publishes signals to every subscriber.
    ///
    /// Returns the total deliveries across subscribers.
    pub fn broadcast(&self, signals: &[Signal]) -> usize {
        let subscribers = self.subscribers.read();
        let mut delivered = 0;
        for (name, tx) in subscribers.iter() {
            for signal in signals {
                if tx.try_send(signal.clone()).is_ok() {
                    delivered += 1;
                } else {
                    warn!("bus subscriber '{}' saturated, dropping {}", name, signal.ty);
                }
            }
        }
        delivered
    }

    /// Number of registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }
}

/// [`OutputEmitter`] publishing a server's events to one bus stream.
#[derive(Clone)]
pub struct BusEmitter {
    bus: Arc<SignalBus>,
    stream: String,
}

impl BusEmitter {
    /// Binds an emitter to a bus stream.
    #[must_use]
    pub fn new(bus: Arc<SignalBus>, stream: impl Into<String>) -> Self {
        Self {
            bus,
            stream: stream.into(),
        }
    }

    /// The target stream name.
    #[must_use]
    pub fn stream(&self) -> &str {
        &self.stream
    }
}

impl std::fmt::Debug for BusEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusEmitter")
            .field("stream", &self.stream)
            .finish_non_exhaustive()
    }
}

impl OutputEmitter for BusEmitter {
    fn emit(&self, signal: &Signal) -> bool {
        self.bus.publish(&self.stream, std::slice::from_ref(signal)) == 1
    }

    fn clone_box(&self) -> Box<dyn OutputEmitter> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jido_types::AgentId;
    use serde_json::json;

    fn event(n: u64) -> Signal {
        Signal::event(&AgentId::named("bus-test"), "cmd.success", json!({ "n": n }))
    }

    #[tokio::test]
    async fn publish_reaches_named_subscriber_in_order() {
        let bus = SignalBus::new();
        let mut rx = bus.subscribe("a");

        assert_eq!(bus.publish("a", &[event(1), event(2)]), 2);
        assert_eq!(rx.recv().await.unwrap().data["n"], json!(1));
        assert_eq!(rx.recv().await.unwrap().data["n"], json!(2));
    }

    #[tokio::test]
    async fn publish_to_unknown_delivers_nothing() {
        let bus = SignalBus::new();
        assert_eq!(bus.publish("ghost", &[event(1)]), 0);
    }

    #[tokio::test]
    async fn saturated_subscriber_drops_not_blocks() {
        let bus = SignalBus::with_capacity(1);
        let _rx = bus.subscribe("slow");

        assert_eq!(bus.publish("slow", &[event(1), event(2), event(3)]), 1);
    }

    #[tokio::test]
    async fn broadcast_reaches_everyone() {
        let bus = SignalBus::new();
        let mut a = bus.subscribe("a");
        let mut b = bus.subscribe("b");

        assert_eq!(bus.broadcast(&[event(7)]), 2);
        assert_eq!(a.recv().await.unwrap().data["n"], json!(7));
        assert_eq!(b.recv().await.unwrap().data["n"], json!(7));
    }

    #[tokio::test]
    async fn unsubscribe_removes() {
        let bus = SignalBus::new();
        let _rx = bus.subscribe("a");
        assert_eq!(bus.subscriber_count(), 1);
        assert!(bus.unsubscribe("a"));
        assert!(!bus.unsubscribe("a"));
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn bus_emitter_reports_delivery() {
        let bus = Arc::new(SignalBus::new());
        let mut rx = bus.subscribe("audit");

        let emitter = BusEmitter::new(Arc::clone(&bus), "audit");
        assert!(emitter.emit(&event(1)));
        assert_eq!(rx.recv().await.unwrap().data["n"], json!(1));

        bus.unsubscribe("audit");
        assert!(!emitter.emit(&event(2)));
    }
}
