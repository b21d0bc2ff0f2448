//! Bounded, single-consumer event hook queue.
//!
//! Producers call [`EventHooks::emit`], which never blocks: when the queue is
//! full the event is rejected with [`HookError::QueueFull`]. One consumer task
//! (spawned by [`EventHooks::start`]) drains the queue in FIFO order and runs
//! every matching handler sequentially. [`EventHooks::stop`] cancels the
//! consumer after it has drained whatever was already queued.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use grantboard_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Subscribe with this event type to receive every event.
pub const WILDCARD: &str = "*";

/// Default queue capacity.
const DEFAULT_CAPACITY: usize = 256;

// ---------------------------------------------------------------------------
// HookEvent
// ---------------------------------------------------------------------------

/// A domain event delivered to hook handlers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookEvent {
    /// Dot-separated event name, e.g. `"dashboard.preferences.updated"`.
    pub event_type: String,

    /// Optional id of the user that triggered the event.
    pub actor_user_id: Option<DbId>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl HookEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            actor_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// Errors / ids
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HookError {
    #[error("Event queue is full")]
    QueueFull,

    #[error("Event hooks are stopped")]
    Stopped,

    #[error("Event hooks already started")]
    AlreadyStarted,
}

/// Handle returned by [`EventHooks::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

type Handler = Arc<dyn Fn(&HookEvent) + Send + Sync>;

struct Subscription {
    id: HookId,
    event_type: String,
    handler: Handler,
}

impl Subscription {
    fn matches(&self, event: &HookEvent) -> bool {
        self.event_type == WILDCARD || self.event_type == event.event_type
    }
}

// ---------------------------------------------------------------------------
// EventHooks
// ---------------------------------------------------------------------------

/// Handler registry plus the bounded queue feeding it.
///
/// Shared via `Arc<EventHooks>`. Events emitted before [`start`](Self::start)
/// wait in the queue until the consumer runs.
pub struct EventHooks {
    subscriptions: Arc<RwLock<Vec<Subscription>>>,
    sender: mpsc::Sender<HookEvent>,
    receiver: Mutex<Option<mpsc::Receiver<HookEvent>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    cancel: CancellationToken,
    next_id: AtomicU64,
}

impl EventHooks {
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        Self {
            subscriptions: Arc::new(RwLock::new(Vec::new())),
            sender,
            receiver: Mutex::new(Some(receiver)),
            worker: Mutex::new(None),
            cancel: CancellationToken::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register `handler` for `event_type` (or [`WILDCARD`]).
    pub async fn subscribe<F>(&self, event_type: impl Into<String>, handler: F) -> HookId
    where
        F: Fn(&HookEvent) + Send + Sync + 'static,
    {
        let id = HookId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscriptions.write().await.push(Subscription {
            id,
            event_type: event_type.into(),
            handler: Arc::new(handler),
        });
        id
    }

    /// Remove a handler. Returns `false` if `id` was not registered.
    pub async fn unsubscribe(&self, id: HookId) -> bool {
        let mut subs = self.subscriptions.write().await;
        let before = subs.len();
        subs.retain(|s| s.id != id);
        subs.len() != before
    }

    /// Queue an event without waiting.
    pub fn emit(&self, event: HookEvent) -> Result<(), HookError> {
        if self.cancel.is_cancelled() {
            return Err(HookError::Stopped);
        }
        self.sender.try_send(event).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => HookError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => HookError::Stopped,
        })
    }

    /// Spawn the consumer task. Must be called from within a tokio runtime.
    pub async fn start(&self) -> Result<(), HookError> {
        let mut receiver = self
            .receiver
            .lock()
            .await
            .take()
            .ok_or(HookError::AlreadyStarted)?;
        let subscriptions = Arc::clone(&self.subscriptions);
        let cancel = self.cancel.clone();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    next = receiver.recv() => match next {
                        Some(event) => dispatch(&subscriptions, event).await,
                        None => break,
                    },
                    () = cancel.cancelled() => {
                        receiver.close();
                        while let Some(event) = receiver.recv().await {
                            dispatch(&subscriptions, event).await;
                        }
                        break;
                    }
                }
            }
            tracing::debug!("Event hook consumer stopped");
        });

        *self.worker.lock().await = Some(handle);
        tracing::info!("Event hook consumer started");
        Ok(())
    }

    /// Stop accepting events, drain the queue, and wait for the consumer.
    pub async fn stop(&self) {
        self.cancel.cancel();
        if let Some(handle) = self.worker.lock().await.take() {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Event hook consumer task failed");
            }
        }
    }
}

impl Default for EventHooks {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Run every matching handler for `event`, in subscription order.
///
/// A panicking handler is logged and skipped; later handlers still run.
async fn dispatch(subscriptions: &RwLock<Vec<Subscription>>, event: HookEvent) {
    let handlers: Vec<Handler> = subscriptions
        .read()
        .await
        .iter()
        .filter(|s| s.matches(&event))
        .map(|s| Arc::clone(&s.handler))
        .collect();

    for handler in handlers {
        if catch_unwind(AssertUnwindSafe(|| handler(&event))).is_err() {
            tracing::error!(event_type = %event.event_type, "Event hook handler panicked");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use super::*;

    fn recorder() -> (Arc<StdMutex<Vec<String>>>, impl Fn(&HookEvent) + Send + Sync + 'static) {
        let seen = Arc::new(StdMutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |e: &HookEvent| {
            sink.lock().unwrap().push(e.event_type.clone())
        })
    }

    #[tokio::test]
    async fn events_are_delivered_in_fifo_order() {
        let hooks = EventHooks::default();
        let (seen, handler) = recorder();
        hooks.subscribe(WILDCARD, handler).await;
        hooks.start().await.unwrap();

        hooks.emit(HookEvent::new("a")).unwrap();
        hooks.emit(HookEvent::new("b")).unwrap();
        hooks.emit(HookEvent::new("c")).unwrap();
        hooks.stop().await;

        assert_eq!(*seen.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn handlers_only_see_their_event_type() {
        let hooks = EventHooks::default();
        let (seen, handler) = recorder();
        hooks.subscribe("dashboard.preferences.reset", handler).await;
        hooks.start().await.unwrap();

        hooks.emit(HookEvent::new("dashboard.preferences.updated")).unwrap();
        hooks.emit(HookEvent::new("dashboard.preferences.reset")).unwrap();
        hooks.stop().await;

        assert_eq!(*seen.lock().unwrap(), vec!["dashboard.preferences.reset"]);
    }

    #[tokio::test]
    async fn events_queued_before_start_are_delivered() {
        let hooks = EventHooks::default();
        let (seen, handler) = recorder();
        hooks.subscribe(WILDCARD, handler).await;

        hooks.emit(HookEvent::new("early")).unwrap();
        hooks.start().await.unwrap();
        hooks.stop().await;

        assert_eq!(*seen.lock().unwrap(), vec!["early"]);
    }

    #[tokio::test]
    async fn full_queue_rejects_emit() {
        let hooks = EventHooks::new(1);
        hooks.emit(HookEvent::new("one")).unwrap();
        assert_eq!(hooks.emit(HookEvent::new("two")), Err(HookError::QueueFull));
    }

    #[tokio::test]
    async fn emit_after_stop_is_rejected() {
        let hooks = EventHooks::default();
        hooks.start().await.unwrap();
        hooks.stop().await;
        assert_eq!(hooks.emit(HookEvent::new("late")), Err(HookError::Stopped));
    }

    #[tokio::test]
    async fn start_twice_fails() {
        let hooks = EventHooks::default();
        hooks.start().await.unwrap();
        assert_eq!(hooks.start().await, Err(HookError::AlreadyStarted));
        hooks.stop().await;
    }

    #[tokio::test]
    async fn unsubscribe_removes_handler() {
        let hooks = EventHooks::default();
        let (seen, handler) = recorder();
        let id = hooks.subscribe(WILDCARD, handler).await;
        assert!(hooks.unsubscribe(id).await);
        assert!(!hooks.unsubscribe(id).await);

        hooks.start().await.unwrap();
        hooks.emit(HookEvent::new("ignored")).unwrap();
        hooks.stop().await;

        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn panicking_handler_does_not_stop_others() {
        let hooks = EventHooks::default();
        hooks
            .subscribe(WILDCARD, |_: &HookEvent| panic!("handler failure"))
            .await;
        let (seen, handler) = recorder();
        hooks.subscribe(WILDCARD, handler).await;
        hooks.start().await.unwrap();

        hooks.emit(HookEvent::new("x")).unwrap();
        hooks.emit(HookEvent::new("y")).unwrap();
        hooks.stop().await;

        assert_eq!(*seen.lock().unwrap(), vec!["x", "y"]);
    }

    #[test]
    fn default_event_has_empty_optional_fields() {
        let event = HookEvent::new("bare.event");
        assert_eq!(event.event_type, "bare.event");
        assert!(event.actor_user_id.is_none());
        assert!(event.payload.is_object());
    }
}
