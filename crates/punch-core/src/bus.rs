//! In-process notification channel for store lifecycle events.
//!
//! UI fragments react to timer lifecycle changes without direct coupling to
//! the code that caused them. Dispatch is synchronous, in subscription
//! order, at-most-once per publish. The bus is owned by whoever owns the
//! store; there is no global channel.

use crate::types::TimerName;

/// A store lifecycle notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// The persistent store was opened and the snapshot bootstrapped.
    Init,
    /// A timer was created (or re-created over an existing name).
    TimerCreated { timer: TimerName },
    /// A timer started running.
    TimerStarted { timer: TimerName },
    /// A stop mark was recorded for a timer.
    TimerStopped { timer: TimerName },
}

/// Token returned by [`EventBus::subscribe`], accepted by
/// [`EventBus::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription(u64);

type Handler = Box<dyn FnMut(&StoreEvent)>;

/// Synchronous publish/subscribe channel for [`StoreEvent`]s.
#[derive(Default)]
pub struct EventBus {
    handlers: Vec<(Subscription, Handler)>,
    next_id: u64,
}

impl EventBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for every published event.
    ///
    /// Handlers see events in the order they subscribed.
    pub fn subscribe(&mut self, handler: impl FnMut(&StoreEvent) + 'static) -> Subscription {
        let id = Subscription(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Removes a handler. Returns false if the subscription was not found.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(id, _)| *id != subscription);
        self.handlers.len() != before
    }

    /// Publishes an event to every handler, synchronously.
    pub fn emit(&mut self, event: &StoreEvent) {
        for (_, handler) in &mut self.handlers {
            handler(event);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
