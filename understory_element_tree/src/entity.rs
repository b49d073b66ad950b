// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Entity id allocation for elements created by a canvas.

use crate::types::EntityId;

/// Source of fresh [`EntityId`]s for elements the canvas creates itself.
///
/// Hosts that already own an entity runtime implement this to hand out their
/// own ids. Implementations must never return the same id twice and must never
/// return `EntityId(0)`.
pub trait EntityAllocator {
    /// Return a new, unused entity id.
    fn allocate(&mut self) -> EntityId;
}

/// Default allocator: a counter that hands out consecutive ids.
#[derive(Clone, Debug)]
pub struct SequentialEntityIds {
    next: u64,
}

impl SequentialEntityIds {
    /// Start handing out ids at `first`. A `first` of zero is bumped to one.
    pub fn starting_at(first: u64) -> Self {
        Self { next: first.max(1) }
    }
}

impl Default for SequentialEntityIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl EntityAllocator for SequentialEntityIds {
    fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.checked_add(1).expect("entity id space exhausted");
        id
    }
}

impl<F: FnMut() -> EntityId> EntityAllocator for F {
    fn allocate(&mut self) -> EntityId {
        self()
    }
}
