// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-element change and teardown notifications.
//!
//! Observers are registered on a single element with
//! [`Canvas::observe`](crate::Canvas::observe). They are called synchronously
//! and receive only an [`ElementEvent`], never the canvas, so a callback cannot
//! reach back into the tree that is notifying it.

use alloc::boxed::Box;
use smallvec::SmallVec;

use crate::types::{ElementId, ElementKey, EntityId};

/// Identity of the element a notification is about.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ElementEvent {
    /// Arena handle. Stale once `being_destroyed` returns.
    pub key: ElementKey,
    /// Tree-local identifier.
    pub id: ElementId,
    /// Runtime handle.
    pub entity: EntityId,
}

/// Receiver of element notifications. Both methods default to doing nothing.
pub trait ElementObserver {
    /// An observable attribute of the element changed.
    fn property_changed(&mut self, event: ElementEvent) {
        let _ = event;
    }

    /// The element is about to be torn down. Called exactly once, after which
    /// the observer is dropped along with the element.
    fn being_destroyed(&mut self, event: ElementEvent) {
        let _ = event;
    }
}

/// Handle returned by [`Canvas::observe`](crate::Canvas::observe).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ObserverId(pub(crate) u64);

#[derive(Default)]
pub(crate) struct Observers {
    // Most elements have zero or one observer.
    entries: SmallVec<[(ObserverId, Box<dyn ElementObserver>); 1]>,
}

impl core::fmt::Debug for Observers {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(id, _)| id))
            .finish()
    }
}

impl Observers {
    pub(crate) fn push(&mut self, id: ObserverId, observer: Box<dyn ElementObserver>) {
        self.entries.push((id, observer));
    }

    pub(crate) fn remove(&mut self, id: ObserverId) -> Option<Box<dyn ElementObserver>> {
        let pos = self.entries.iter().position(|(i, _)| *i == id)?;
        Some(self.entries.remove(pos).1)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn property_changed(&mut self, event: ElementEvent) {
        for (_, observer) in &mut self.entries {
            observer.property_changed(event);
        }
    }

    /// Consumes the list: observers do not outlive the element they watch.
    pub(crate) fn being_destroyed(self, event: ElementEvent) {
        for (_, mut observer) in self.entries {
            observer.being_destroyed(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    struct Log(Rc<RefCell<Vec<&'static str>>>);

    impl ElementObserver for Log {
        fn property_changed(&mut self, _: ElementEvent) {
            self.0.borrow_mut().push("changed");
        }
        fn being_destroyed(&mut self, _: ElementEvent) {
            self.0.borrow_mut().push("destroyed");
        }
    }

    struct Silent;
    impl ElementObserver for Silent {}

    fn event() -> ElementEvent {
        ElementEvent {
            key: ElementKey::new(0, 1),
            id: ElementId(1),
            entity: EntityId(1),
        }
    }

    #[test]
    fn removed_observer_is_not_called() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut observers = Observers::default();
        observers.push(ObserverId(1), Box::new(Log(log.clone())));
        observers.push(ObserverId(2), Box::new(Silent));
        assert!(observers.remove(ObserverId(1)).is_some());
        assert!(observers.remove(ObserverId(1)).is_none());
        observers.property_changed(event());
        assert!(log.borrow().is_empty());
        assert_eq!(observers.len(), 1);
    }

    #[test]
    fn destroy_reaches_every_observer() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut observers = Observers::default();
        observers.push(ObserverId(1), Box::new(Log(log.clone())));
        observers.push(ObserverId(2), Box::new(Log(log.clone())));
        observers.property_changed(event());
        observers.being_destroyed(event());
        assert_eq!(
            *log.borrow(),
            ["changed", "changed", "destroyed", "destroyed"]
        );
    }
}
