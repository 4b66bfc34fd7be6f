//! Change notification.
//!
//! Handlers receive the whole document value after each committed command,
//! never a diff. They get a shared borrow of the snapshot, not the editor, so
//! a handler cannot issue commands while one is being committed.

use std::fmt;

use crate::document::DocumentValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorEvent {
    Change,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type ChangeHandler = Box<dyn FnMut(&DocumentValue)>;

#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    handlers: Vec<(SubscriptionId, EditorEvent, ChangeHandler)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&mut self, event: EditorEvent, handler: ChangeHandler) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.handlers.push((id, event, handler));
        id
    }

    /// Returns false if the subscription was already gone
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sub, _, _)| *sub != id);
        self.handlers.len() != before
    }

    pub fn emit(&mut self, event: EditorEvent, value: &DocumentValue) {
        for (_, kind, handler) in self.handlers.iter_mut() {
            if *kind == event {
                handler(value);
            }
        }
    }

    pub fn listener_count(&self, event: EditorEvent) -> usize {
        self.handlers.iter().filter(|(_, kind, _)| *kind == event).count()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emit_reaches_every_subscriber() {
        let mut bus = EventBus::new();
        let calls = Rc::new(RefCell::new(0));

        for _ in 0..2 {
            let calls = calls.clone();
            bus.on(EditorEvent::Change, Box::new(move |_| *calls.borrow_mut() += 1));
        }
        bus.emit(EditorEvent::Change, &DocumentValue::new());

        assert_eq!(*calls.borrow(), 2);
    }

    #[test]
    fn test_off_unsubscribes() {
        let mut bus = EventBus::new();
        let calls = Rc::new(RefCell::new(0));
        let counter = calls.clone();
        let id = bus.on(EditorEvent::Change, Box::new(move |_| *counter.borrow_mut() += 1));

        assert!(bus.off(id));
        assert!(!bus.off(id));
        bus.emit(EditorEvent::Change, &DocumentValue::new());

        assert_eq!(*calls.borrow(), 0);
        assert_eq!(bus.listener_count(EditorEvent::Change), 0);
    }
}
