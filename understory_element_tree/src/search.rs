// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Name, id, and predicate searches over children and descendants.
//!
//! Descendant searches walk the tree depth-first in pre-order: an element is
//! visited before its children, and each child's subtree is explored fully
//! before its next sibling. Traversal uses an explicit stack, so deep trees do
//! not grow the call stack.

use alloc::vec::Vec;

use crate::canvas::{Canvas, Node};
use crate::entity::EntityAllocator;
use crate::types::{ElementId, ElementKey, ElementView, EntityId};

/// Pre-order iterator over live elements.
///
/// Created by [`Canvas::descendants`] and [`Canvas::elements`].
#[derive(Clone, Debug)]
pub struct Descendants<'a> {
    nodes: &'a [Option<Node>],
    stack: Vec<ElementKey>,
}

impl<'a> Descendants<'a> {
    fn node(&self, key: ElementKey) -> &'a Node {
        let Some(node) = self.nodes[key.idx()].as_ref() else {
            unreachable!("child lists only hold live elements");
        };
        node
    }
}

impl<'a> Iterator for Descendants<'a> {
    type Item = ElementView<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.stack.pop()?;
        let node = self.node(key);
        // Reversed so the first child is popped first.
        self.stack.extend(node.children.iter().rev().copied());
        Some(node.view(key))
    }
}

impl<A: EntityAllocator> Canvas<A> {
    /// Iterate the descendants of `key` (not `key` itself) in depth-first pre-order.
    ///
    /// Empty for stale keys.
    pub fn descendants(&self, key: ElementKey) -> Descendants<'_> {
        self.walk(self.children_of(key))
    }

    /// Iterate every element attached to the canvas in depth-first pre-order,
    /// starting with the first root element. Detached subtrees are not visited.
    pub fn elements(&self) -> Descendants<'_> {
        self.walk(self.root_elements())
    }

    /// Pre-order walk over `key` and its descendants; `key` must be live.
    pub(crate) fn subtree(&self, key: ElementKey) -> impl Iterator<Item = ElementKey> + '_ {
        self.walk(core::slice::from_ref(&key)).map(|v| v.key)
    }

    fn walk(&self, start: &[ElementKey]) -> Descendants<'_> {
        Descendants {
            nodes: self.nodes_slice(),
            stack: start.iter().rev().copied().collect(),
        }
    }

    /// First direct child named exactly `name`, in child order.
    pub fn find_child_by_name(&self, key: ElementKey, name: &str) -> Option<ElementKey> {
        self.children_of(key)
            .iter()
            .copied()
            .find(|&c| self.node(c).name == name)
    }

    /// Entity of the first direct child named exactly `name`.
    pub fn find_child_entity_id_by_name(&self, key: ElementKey, name: &str) -> Option<EntityId> {
        self.find_child_by_name(key, name).map(|c| self.node(c).entity)
    }

    /// First direct child hosted by `entity`.
    pub fn find_child_by_entity_id(&self, key: ElementKey, entity: EntityId) -> Option<ElementKey> {
        self.children_of(key)
            .iter()
            .copied()
            .find(|&c| self.node(c).entity == entity)
    }

    /// First descendant named exactly `name`, in depth-first pre-order.
    pub fn find_descendant_by_name(&self, key: ElementKey, name: &str) -> Option<ElementKey> {
        self.descendants(key).find(|v| v.name == name).map(|v| v.key)
    }

    /// Entity of the first descendant named exactly `name`.
    pub fn find_descendant_entity_id_by_name(
        &self,
        key: ElementKey,
        name: &str,
    ) -> Option<EntityId> {
        self.descendants(key)
            .find(|v| v.name == name)
            .map(|v| v.entity)
    }

    /// Descendant with the tree-local identifier `id`.
    pub fn find_descendant_by_id(&self, key: ElementKey, id: ElementId) -> Option<ElementKey> {
        self.descendants(key).find(|v| v.id == id).map(|v| v.key)
    }

    /// Append every descendant of `key` accepted by `predicate` to `result`,
    /// in depth-first pre-order. `key` itself is not tested.
    ///
    /// The predicate sees a read-only view and should be free of side effects.
    pub fn find_descendant_elements(
        &self,
        key: ElementKey,
        predicate: impl Fn(ElementView<'_>) -> bool,
        result: &mut Vec<ElementKey>,
    ) {
        result.extend(self.descendants(key).filter(|v| predicate(*v)).map(|v| v.key));
    }

    /// Call `visitor` on `key` and then on each of its descendants, in
    /// depth-first pre-order.
    ///
    /// Unlike the other descendant queries this includes the receiver: the
    /// first call is always for `key` itself. Nothing is visited for a stale key.
    pub fn call_on_descendant_elements(
        &self,
        key: ElementKey,
        mut visitor: impl FnMut(ElementView<'_>),
    ) {
        let Some(view) = self.view(key) else {
            return;
        };
        visitor(view);
        self.descendants(key).for_each(visitor);
    }

    /// First attached element named exactly `name`, searching the whole canvas
    /// in pre-order.
    pub fn find_element_by_name(&self, name: &str) -> Option<ElementKey> {
        self.elements().find(|v| v.name == name).map(|v| v.key)
    }

    /// Attached element with the tree-local identifier `id`.
    pub fn find_element_by_id(&self, id: ElementId) -> Option<ElementKey> {
        self.elements().find(|v| v.id == id).map(|v| v.key)
    }
}
