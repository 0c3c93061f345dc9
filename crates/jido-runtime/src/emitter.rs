//! Output emitters: the server's capability for delivering events.
//!
//! Emission must never block the executor. Implementations use
//! non-blocking sends and report failure through the return value;
//! the server applies its slow-subscriber policy on `false`.

use jido_signal::Signal;
use std::fmt::Debug;
use tokio::sync::mpsc;

/// Best-effort, ordered, non-blocking event sink.
///
/// One server fans out to a set of these. Implementations must not
/// block: a full buffer is a `false`, not a wait.
pub trait OutputEmitter: Send + Sync + Debug {
    /// Delivers one event signal. Returns `false` when the event
    /// could not be accepted (full buffer, closed sink).
    fn emit(&self, signal: &Signal) -> bool;

    /// Clones the emitter into a boxed trait object.
    fn clone_box(&self) -> Box<dyn OutputEmitter>;
}

impl Clone for Box<dyn OutputEmitter> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Swallows every event. For servers nobody observes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEmitter;

impl OutputEmitter for NullEmitter {
    fn emit(&self, _signal: &Signal) -> bool {
        true
    }

    fn clone_box(&self) -> Box<dyn OutputEmitter> {
        Box::new(*self)
    }
}

/// Delivers events into a bounded tokio channel.
///
/// The consumer side is handed out at construction; per-subscriber
/// ordering follows from the channel's FIFO.
#[derive(Debug, Clone)]
pub struct ChannelEmitter {
    tx: mpsc::Sender<Signal>,
}

impl ChannelEmitter {
    /// Creates an emitter and its receiving end.
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Signal>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

impl OutputEmitter for ChannelEmitter {
    fn emit(&self, signal: &Signal) -> bool {
        self.tx.try_send(signal.clone()).is_ok()
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
        Signal::event(&AgentId::named("test"), "cmd.success", json!({ "n": n }))
    }

    #[test]
    fn null_emitter_accepts_everything() {
        let emitter = NullEmitter;
        assert!(emitter.emit(&event(1)));
    }

    #[tokio::test]
    async fn channel_emitter_delivers_in_order() {
        let (emitter, mut rx) = ChannelEmitter::channel(4);
        assert!(emitter.emit(&event(1)));
        assert!(emitter.emit(&event(2)));

        assert_eq!(rx.recv().await.unwrap().data["n"], json!(1));
        assert_eq!(rx.recv().await.unwrap().data["n"], json!(2));
    }

    #[tokio::test]
    async fn full_channel_reports_false_without_blocking() {
        let (emitter, _rx) = ChannelEmitter::channel(1);
        assert!(emitter.emit(&event(1)));
        assert!(!emitter.emit(&event(2)));
    }

    #[tokio::test]
    async fn closed_channel_reports_false() {
        let (emitter, rx) = ChannelEmitter::channel(1);
        drop(rx);
        assert!(!emitter.emit(&event(1)));
    }

    #[test]
    fn boxed_clone_works() {
        let boxed: Box<dyn OutputEmitter> = Box::new(NullEmitter);
        let cloned = boxed.clone();
        assert!(cloned.emit(&event(1)));
    }
}
