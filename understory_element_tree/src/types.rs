// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the element tree: handles, identifiers, and read-only views.

use core::fmt;

/// Handle to an element slot in a [`Canvas`](crate::Canvas) (generational).
///
/// A key stays valid until its element is destroyed. Destroyed slots are reused
/// with a bumped generation, so an old key never aliases a newer element.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ElementKey(pub(crate) u32, pub(crate) u32);

impl ElementKey {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

/// Tree-local element identifier, unique within its canvas.
///
/// Assigned once at creation from a per-canvas counter starting at 1 and never
/// changed afterwards. Unlike [`ElementKey`], it is a plain number that can be
/// persisted alongside a canvas.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque handle of the runtime object hosting an element's components.
///
/// Entity ids are global to the host runtime and carry no relation to
/// [`ElementId`]. Zero is reserved and never handed out by the allocators in
/// this crate.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0)
    }
}

/// Coordinate space used when asking an element's bounds about a point or rect.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum CoordinateMode {
    /// Bounds as laid out in an editor viewport. Disabled elements still participate.
    #[default]
    Edit,
    /// Bounds at runtime (or preview). Disabled elements are skipped.
    InGame,
}

impl CoordinateMode {
    /// Maps the `is_in_game` flag used by hosts onto a mode.
    pub const fn from_in_game(is_in_game: bool) -> Self {
        if is_in_game { Self::InGame } else { Self::Edit }
    }

    /// Whether this is [`CoordinateMode::InGame`].
    pub const fn is_in_game(self) -> bool {
        matches!(self, Self::InGame)
    }
}

/// Read-only view of a live element, handed to predicates and visitors.
#[derive(Copy, Clone, Debug)]
pub struct ElementView<'a> {
    /// Arena handle of the element.
    pub key: ElementKey,
    /// Tree-local identifier.
    pub id: ElementId,
    /// Runtime handle.
    pub entity: EntityId,
    /// Display name.
    pub name: &'a str,
    /// The element's own enabled flag (ancestors not considered).
    pub enabled: bool,
    /// Parent element, or `None` for canvas roots and detached elements.
    pub parent: Option<ElementKey>,
    /// Children in paint order (back to front).
    pub children: &'a [ElementKey],
}
