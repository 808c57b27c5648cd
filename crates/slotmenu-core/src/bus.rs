//! Event subscription: the [`Listener`] and [`EventSource`] contracts and
//! [`EventBus`], an in-process implementation.
//!
//! Dispatch is multiplexed: every live listener sees every event and is
//! expected to discard events that target surfaces it does not own.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::events::{ClickEvent, CloseEvent, DragEvent};

/// Receives host events. All handlers default to doing nothing.
pub trait Listener {
    fn on_click(&self, _event: &mut ClickEvent) {}
    fn on_drag(&self, _event: &mut DragEvent) {}
    fn on_close(&self, _event: &CloseEvent) {}
}

/// Handle returned by [`EventSource::subscribe`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Where listeners register. The source keeps each subscribed listener
/// alive until it is unsubscribed.
pub trait EventSource {
    fn subscribe(&self, listener: Rc<dyn Listener>) -> ListenerId;

    /// Remove a listener. Returns `false` if `id` was not subscribed.
    fn unsubscribe(&self, id: ListenerId) -> bool;
}

/// A synchronous, single-threaded event bus.
///
/// Handlers run against a snapshot of the listener list, so a handler may
/// subscribe, unsubscribe, or dispatch further events without invalidating
/// the iteration in progress.
#[derive(Default)]
pub struct EventBus {
    listeners: RefCell<Vec<(ListenerId, Rc<dyn Listener>)>>,
    next_id: Cell<u64>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a click to every listener.
    pub fn click(&self, event: &mut ClickEvent) {
        for listener in self.snapshot() {
            listener.on_click(event);
        }
    }

    /// Deliver a drag to every listener.
    pub fn drag(&self, event: &mut DragEvent) {
        for listener in self.snapshot() {
            listener.on_drag(event);
        }
    }

    /// Deliver a close to every listener.
    pub fn close(&self, event: &CloseEvent) {
        for listener in self.snapshot() {
            listener.on_close(event);
        }
    }

    /// Number of subscribed listeners.
    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }

    /// Whether `id` is currently subscribed.
    pub fn contains(&self, id: ListenerId) -> bool {
        self.listeners.borrow().iter().any(|(l, _)| *l == id)
    }

    fn snapshot(&self) -> Vec<Rc<dyn Listener>> {
        self.listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect()
    }
}

impl EventSource for EventBus {
    fn subscribe(&self, listener: Rc<dyn Listener>) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(l, _)| *l != id);
        listeners.len() != before
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{ActorId, ClickKind, SurfaceId};

    #[derive(Default)]
    struct Counter {
        clicks: Cell<usize>,
        closes: Cell<usize>,
    }

    impl Listener for Counter {
        fn on_click(&self, event: &mut ClickEvent) {
            self.clicks.set(self.clicks.get() + 1);
            event.cancel();
        }

        fn on_close(&self, _event: &CloseEvent) {
            self.closes.set(self.closes.get() + 1);
        }
    }

    fn click() -> ClickEvent {
        ClickEvent::new(SurfaceId(0), 0, 0, ClickKind::Left, ActorId(1))
    }

    #[test]
    fn subscribe_dispatch_unsubscribe() {
        let bus = EventBus::new();
        let counter = Rc::new(Counter::default());
        let id = bus.subscribe(counter.clone());
        assert_eq!(bus.len(), 1);
        assert!(bus.contains(id));

        let mut ev = click();
        bus.click(&mut ev);
        bus.close(&CloseEvent::new(SurfaceId(0), ActorId(1)));
        assert!(ev.is_cancelled());
        assert_eq!(counter.clicks.get(), 1);
        assert_eq!(counter.closes.get(), 1);

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert!(bus.is_empty());
        bus.click(&mut click());
        assert_eq!(counter.clicks.get(), 1);
    }

    #[test]
    fn drag_default_handler_is_noop() {
        let bus = EventBus::new();
        bus.subscribe(Rc::new(Counter::default()));
        let mut ev = DragEvent::new(SurfaceId(0), ActorId(1), vec![3]);
        bus.drag(&mut ev);
        assert!(!ev.is_cancelled());
    }

    struct SelfRemoving {
        bus: Rc<EventBus>,
        id: Cell<Option<ListenerId>>,
    }

    impl Listener for SelfRemoving {
        fn on_close(&self, _event: &CloseEvent) {
            if let Some(id) = self.id.take() {
                self.bus.unsubscribe(id);
            }
        }
    }

    #[test]
    fn handler_may_unsubscribe_during_dispatch() {
        let bus = Rc::new(EventBus::new());
        let l = Rc::new(SelfRemoving {
            bus: bus.clone(),
            id: Cell::new(None),
        });
        let id = bus.subscribe(l.clone());
        l.id.set(Some(id));
        bus.close(&CloseEvent::new(SurfaceId(0), ActorId(1)));
        assert!(bus.is_empty());
    }
}
