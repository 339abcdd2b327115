// crates/server/src/jobs/hub.rs
//! Fan-out of job events to connected observers.

use benchview_core::JobEvent;
use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Identifies one connected observer for the lifetime of its subscription.
pub type ObserverId = Uuid;

/// The receiving side of a subscription: drain `rx` to consume events, then
/// pass `id` back to [`JobHub::unsubscribe`] when the transport goes away.
pub struct Subscription {
    pub id: ObserverId,
    pub rx: mpsc::UnboundedReceiver<JobEvent>,
}

/// Broadcast hub for [`JobEvent`]s.
///
/// Each observer gets its own unbounded channel, so delivery paths are
/// independent: a slow or disconnected observer never blocks `publish` or
/// delivery to anyone else. Events published in sequence arrive in that
/// sequence at every observer that receives both. The hub holds no durable
/// state; observers re-fetch history from the store after reconnecting.
pub struct JobHub {
    observers: DashMap<ObserverId, mpsc::UnboundedSender<JobEvent>>,
}

impl JobHub {
    pub fn new() -> Self {
        Self {
            observers: DashMap::new(),
        }
    }

    /// Register a new observer. It receives only events published after this
    /// call; there is no backlog replay.
    pub fn subscribe(&self) -> Subscription {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        self.observers.insert(id, tx);
        tracing::debug!(observer_id = %id, "observer subscribed");
        Subscription { id, rx }
    }

    /// Remove an observer. Idempotent: removing an unknown or already-removed
    /// id is a no-op, never an error.
    pub fn unsubscribe(&self, id: ObserverId) {
        if self.observers.remove(&id).is_some() {
            tracing::debug!(observer_id = %id, "observer unsubscribed");
        }
    }

    /// Deliver an event to every currently subscribed observer.
    ///
    /// Observers whose receiving end is gone are pruned here rather than
    /// retried; delivery to a dropped observer is abandoned, not queued.
    pub fn publish(&self, event: &JobEvent) {
        let mut closed = Vec::new();
        for entry in self.observers.iter() {
            if entry.value().send(event.clone()).is_err() {
                closed.push(*entry.key());
            }
        }
        for id in closed {
            self.observers.remove(&id);
            tracing::debug!(observer_id = %id, "pruned disconnected observer");
        }
    }

    /// Number of currently connected observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

impl Default for JobHub {
    fn default() -> Self {
        Self::new()
    }
}
