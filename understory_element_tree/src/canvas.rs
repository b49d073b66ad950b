// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: element storage, structural mutation, and structural queries.

use alloc::{boxed::Box, string::String, vec::Vec};
use hashbrown::HashMap;
use tracing::{debug, trace, warn};

use crate::capability::{Capabilities, ElementBounds, Interactable};
use crate::entity::{EntityAllocator, SequentialEntityIds};
use crate::error::{TreeError, TreeResult};
use crate::notify::{ElementEvent, ElementObserver, ObserverId, Observers};
use crate::types::{ElementId, ElementKey, ElementView, EntityId};

/// A canvas: the context that owns a forest of UI elements.
///
/// Every element is owned by exactly one of: the canvas itself (a *root
/// element*), another element, or nobody (a *detached* element, after
/// [`Canvas::remove_from_parent`]). Children are kept in paint order, back to
/// front, so the last child is drawn on top.
///
/// Elements are addressed by [`ElementKey`]. Keys of destroyed elements go
/// stale: queries on them return `None`, `false`, or empty results, and
/// mutations fail with [`TreeError::StaleElement`].
///
/// The type parameter `A` supplies [`EntityId`]s for elements created with
/// [`Canvas::create_child_element`]. It defaults to [`SequentialEntityIds`].
///
/// ## Example
///
/// ```rust
/// use understory_element_tree::{Canvas, EntityId};
///
/// let mut canvas = Canvas::new(EntityId(1000));
/// let panel = canvas.create_child_element(None, "panel").unwrap();
/// let ok = canvas.create_child_element(Some(panel), "ok").unwrap();
/// let cancel = canvas.create_child_element(Some(panel), "cancel").unwrap();
///
/// assert_eq!(canvas.child_elements(panel), vec![ok, cancel]);
///
/// // Move "cancel" in front of "ok".
/// canvas.reparent(cancel, Some(panel), Some(ok)).unwrap();
/// assert_eq!(canvas.index_of_child(panel, cancel), Some(0));
///
/// // An element cannot become its own descendant.
/// assert!(canvas.reparent(panel, Some(ok), None).is_err());
/// ```
pub struct Canvas<A: EntityAllocator = SequentialEntityIds> {
    entity: EntityId,
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    roots: Vec<ElementKey>,
    by_entity: HashMap<EntityId, ElementKey>,
    next_element_id: u32,
    next_observer_id: u64,
    allocator: A,
    pub(crate) capabilities: Capabilities,
}

impl<A: EntityAllocator> core::fmt::Debug for Canvas<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Canvas")
            .field("entity", &self.entity)
            .field("elements_total", &self.nodes.len())
            .field("elements_alive", &self.len())
            .field("roots", &self.roots.len())
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Owner {
    Canvas,
    Element(ElementKey),
    Detached,
}

impl Owner {
    fn from_parent(parent: Option<ElementKey>) -> Self {
        parent.map_or(Self::Canvas, Self::Element)
    }
}

#[derive(Debug)]
pub(crate) struct Node {
    generation: u32,
    pub(crate) id: ElementId,
    pub(crate) entity: EntityId,
    pub(crate) name: String,
    pub(crate) owner: Owner,
    pub(crate) children: Vec<ElementKey>,
    pub(crate) enabled: bool,
    observers: Observers,
}

impl Node {
    fn new(generation: u32, id: ElementId, entity: EntityId, name: String) -> Self {
        Self {
            generation,
            id,
            entity,
            name,
            owner: Owner::Detached,
            children: Vec::new(),
            enabled: true,
            observers: Observers::default(),
        }
    }

    fn parent(&self) -> Option<ElementKey> {
        match self.owner {
            Owner::Element(p) => Some(p),
            Owner::Canvas | Owner::Detached => None,
        }
    }

    fn event(&self, key: ElementKey) -> ElementEvent {
        ElementEvent {
            key,
            id: self.id,
            entity: self.entity,
        }
    }

    pub(crate) fn view(&self, key: ElementKey) -> ElementView<'_> {
        ElementView {
            key,
            id: self.id,
            entity: self.entity,
            name: &self.name,
            enabled: self.enabled,
            parent: self.parent(),
            children: &self.children,
        }
    }
}

impl Canvas {
    /// Create an empty canvas hosted by `entity`, using sequential entity ids
    /// (starting at 1) for the elements it creates.
    pub fn new(entity: EntityId) -> Self {
        Self::with_allocator(entity, SequentialEntityIds::default())
    }
}

impl<A: EntityAllocator> Canvas<A> {
    /// Create an empty canvas hosted by `entity` that draws element entity ids
    /// from `allocator`.
    pub fn with_allocator(entity: EntityId, allocator: A) -> Self {
        Self {
            entity,
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            roots: Vec::new(),
            by_entity: HashMap::new(),
            next_element_id: 1,
            next_observer_id: 1,
            allocator,
            capabilities: Capabilities::new(),
        }
    }

    /// The entity hosting this canvas.
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// Number of live elements, attached or detached.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }

    /// Whether the canvas holds no live elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Elements owned directly by the canvas, in paint order.
    pub fn root_elements(&self) -> &[ElementKey] {
        &self.roots
    }

    // --- structural mutation ---

    /// Create a new element named `name` as the last child of `parent`, or as
    /// the last root element when `parent` is `None`.
    ///
    /// The element gets a fresh [`ElementId`] and an [`EntityId`] from the
    /// canvas' allocator. Allocated ids that are already taken, by the canvas
    /// itself or by an element created with
    /// [`Canvas::create_element_for_entity`], are skipped. The element starts
    /// enabled, with no capabilities and no observers; activating its
    /// components is up to the host.
    pub fn create_child_element(
        &mut self,
        parent: Option<ElementKey>,
        name: impl Into<String>,
    ) -> TreeResult<ElementKey> {
        if let Some(p) = parent {
            self.ensure_alive(p)?;
        }
        let entity = self.fresh_entity();
        self.insert_element(parent, entity, name.into())
    }

    /// Like [`Canvas::create_child_element`], for an entity supplied by the host.
    ///
    /// An entity hosts at most one element: a second element for the same
    /// entity, or an element for the canvas' own entity, is rejected with
    /// [`TreeError::DuplicateEntity`].
    pub fn create_element_for_entity(
        &mut self,
        parent: Option<ElementKey>,
        entity: EntityId,
        name: impl Into<String>,
    ) -> TreeResult<ElementKey> {
        if let Some(p) = parent {
            self.ensure_alive(p)?;
        }
        self.insert_element(parent, entity, name.into())
    }

    /// Destroy `key` and its whole subtree.
    ///
    /// The element is detached from its owner first. Then every element of the
    /// subtree, in pre-order, notifies its observers through
    /// [`ElementObserver::being_destroyed`]; only after all notifications have
    /// run are the slots, capabilities, and entity mappings released. All keys
    /// into the subtree are stale afterwards.
    pub fn destroy_element(&mut self, key: ElementKey) -> TreeResult<()> {
        self.ensure_alive(key)?;
        self.unlink(key);

        let doomed: Vec<ElementKey> = self.subtree(key).collect();
        for &k in &doomed {
            let node = self.node_mut(k);
            let event = node.event(k);
            let observers = core::mem::take(&mut node.observers);
            trace!(element = %event.id, entity = %event.entity, "element being destroyed");
            observers.being_destroyed(event);
        }
        for &k in &doomed {
            let Some(node) = self.nodes[k.idx()].take() else {
                unreachable!("subtree only yields live elements");
            };
            self.by_entity.remove(&node.entity);
            self.capabilities.remove_all(k);
            self.free_list.push(k.idx());
        }
        debug!(?key, count = doomed.len(), "destroyed element subtree");
        Ok(())
    }

    /// Move `key` under `new_parent` (the canvas when `None`), immediately
    /// before `insert_before`, or at the end when `insert_before` is `None`.
    ///
    /// Everything is validated before anything changes:
    /// - `new_parent` must not be `key` or one of its descendants
    ///   ([`TreeError::CycleRejected`]);
    /// - `insert_before` must be a current child of `new_parent` other than
    ///   `key` ([`TreeError::NotAChild`]).
    ///
    /// Reparenting never destroys anything and fires no notifications.
    pub fn reparent(
        &mut self,
        key: ElementKey,
        new_parent: Option<ElementKey>,
        insert_before: Option<ElementKey>,
    ) -> TreeResult<()> {
        self.ensure_alive(key)?;
        if let Some(p) = new_parent {
            self.ensure_alive(p)?;
            self.ensure_no_cycle(key, p)?;
        }
        if let Some(anchor) = insert_before {
            self.ensure_alive(anchor)?;
            if anchor == key || self.node(anchor).owner != Owner::from_parent(new_parent) {
                warn!(?anchor, ?new_parent, "reparent rejected: anchor is not a child");
                return Err(TreeError::NotAChild {
                    parent: new_parent,
                    child: anchor,
                });
            }
        }

        self.unlink(key);
        let index = insert_before
            .and_then(|anchor| self.siblings(new_parent).iter().position(|&c| c == anchor));
        self.link(key, new_parent, index);
        debug!(?key, ?new_parent, ?index, "reparented element");
        Ok(())
    }

    /// [`Canvas::reparent`] addressed by entity ids.
    ///
    /// `None` means the canvas for `new_parent` and the end of the child list
    /// for `insert_before`. Unknown entities fail with [`TreeError::UnknownEntity`].
    pub fn reparent_by_entity_id(
        &mut self,
        key: ElementKey,
        new_parent: Option<EntityId>,
        insert_before: Option<EntityId>,
    ) -> TreeResult<()> {
        let new_parent = new_parent.map(|e| self.resolve_entity(e)).transpose()?;
        let insert_before = insert_before.map(|e| self.resolve_entity(e)).transpose()?;
        self.reparent(key, new_parent, insert_before)
    }

    /// Attach a detached element as a child of `new_parent` (the canvas when
    /// `None`) at `index`, or at the end when `index` is `None` or past the end.
    ///
    /// Fails with [`TreeError::AlreadyAttached`] if `key` still has an owner;
    /// use [`Canvas::reparent`] to move attached elements.
    pub fn add_to_parent_at_index(
        &mut self,
        key: ElementKey,
        new_parent: Option<ElementKey>,
        index: Option<usize>,
    ) -> TreeResult<()> {
        self.ensure_alive(key)?;
        if self.node(key).owner != Owner::Detached {
            warn!(?key, "add_to_parent_at_index rejected: already attached");
            return Err(TreeError::AlreadyAttached(key));
        }
        if let Some(p) = new_parent {
            self.ensure_alive(p)?;
            self.ensure_no_cycle(key, p)?;
        }
        self.link(key, new_parent, index);
        debug!(?key, ?new_parent, ?index, "attached element");
        Ok(())
    }

    /// Detach `key` from its owner without destroying it.
    ///
    /// The subtree stays alive but belongs to nobody: it no longer shows up in
    /// canvas-wide searches and has no canvas until it is attached again with
    /// [`Canvas::add_to_parent_at_index`] or [`Canvas::reparent`], or destroyed.
    pub fn remove_from_parent(&mut self, key: ElementKey) -> TreeResult<()> {
        self.ensure_alive(key)?;
        self.unlink(key);
        debug!(?key, "detached element");
        Ok(())
    }

    /// Rename an element. Fires `property_changed` if the name differs.
    pub fn set_name(&mut self, key: ElementKey, name: impl Into<String>) -> TreeResult<()> {
        let name = name.into();
        let node = self.live_node_mut(key)?;
        if node.name != name {
            node.name = name;
            let event = node.event(key);
            node.observers.property_changed(event);
        }
        Ok(())
    }

    /// Enable or disable an element. Fires `property_changed` if the flag changes.
    ///
    /// Disabled elements (and, by convention, their subtrees) are skipped by
    /// in-game hit testing; see [`Canvas::is_enabled_in_hierarchy`].
    pub fn set_is_enabled(&mut self, key: ElementKey, enabled: bool) -> TreeResult<()> {
        let node = self.live_node_mut(key)?;
        if node.enabled != enabled {
            node.enabled = enabled;
            let event = node.event(key);
            node.observers.property_changed(event);
        }
        Ok(())
    }

    /// Fire `property_changed` on the observers of `key`.
    ///
    /// For components that own observable attributes the tree does not know about.
    pub fn notify_property_changed(&mut self, key: ElementKey) -> TreeResult<()> {
        let node = self.live_node_mut(key)?;
        trace!(element = %node.id, observers = node.observers.len(), "property changed");
        let event = node.event(key);
        node.observers.property_changed(event);
        Ok(())
    }

    /// Register an observer on `key`. Observers are dropped when the element is destroyed.
    pub fn observe(
        &mut self,
        key: ElementKey,
        observer: Box<dyn ElementObserver>,
    ) -> TreeResult<ObserverId> {
        let id = ObserverId(self.next_observer_id);
        let node = self.live_node_mut(key)?;
        node.observers.push(id, observer);
        self.next_observer_id += 1;
        Ok(id)
    }

    /// Remove an observer from `key`, handing it back.
    pub fn unobserve(
        &mut self,
        key: ElementKey,
        observer: ObserverId,
    ) -> Option<Box<dyn ElementObserver>> {
        self.node_opt_mut(key)?.observers.remove(observer)
    }

    /// Attach or replace the bounds used by the geometric queries.
    pub fn set_bounds(
        &mut self,
        key: ElementKey,
        bounds: impl ElementBounds + 'static,
    ) -> TreeResult<()> {
        self.ensure_alive(key)?;
        self.capabilities.set_bounds(key, Box::new(bounds));
        Ok(())
    }

    /// Remove the bounds of `key`; it stops matching geometric queries.
    pub fn clear_bounds(&mut self, key: ElementKey) -> Option<Box<dyn ElementBounds>> {
        self.capabilities.clear_bounds(key)
    }

    /// Register the interactable of `key`. An element has at most one; a
    /// second registration fails with [`TreeError::DuplicateHandler`].
    pub fn register_interactable(
        &mut self,
        key: ElementKey,
        interactable: impl Interactable + 'static,
    ) -> TreeResult<()> {
        self.ensure_alive(key)?;
        self.capabilities
            .register_interactable(key, Box::new(interactable))
    }

    /// Remove the interactable of `key`, handing it back.
    pub fn unregister_interactable(&mut self, key: ElementKey) -> Option<Box<dyn Interactable>> {
        self.capabilities.unregister_interactable(key)
    }

    /// Read access to the capability registry.
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    // --- structural queries ---

    /// Returns true if `key` refers to a live element of this canvas.
    ///
    /// A key is live if its slot is occupied and the generation matches.
    pub fn is_alive(&self, key: ElementKey) -> bool {
        self.node_opt(key).is_some()
    }

    /// Read-only view of a live element.
    pub fn view(&self, key: ElementKey) -> Option<ElementView<'_>> {
        self.node_opt(key).map(|n| n.view(key))
    }

    /// Tree-local identifier of a live element.
    pub fn element_id(&self, key: ElementKey) -> Option<ElementId> {
        self.node_opt(key).map(|n| n.id)
    }

    /// Runtime handle of a live element.
    pub fn entity_id(&self, key: ElementKey) -> Option<EntityId> {
        self.node_opt(key).map(|n| n.entity)
    }

    /// The live element hosted by `entity`, attached or not.
    pub fn element_by_entity_id(&self, entity: EntityId) -> Option<ElementKey> {
        self.by_entity.get(&entity).copied()
    }

    /// Name of a live element.
    pub fn name(&self, key: ElementKey) -> Option<&str> {
        self.node_opt(key).map(|n| n.name.as_str())
    }

    /// The element's own enabled flag; `false` for stale keys.
    pub fn is_enabled(&self, key: ElementKey) -> bool {
        self.node_opt(key).is_some_and(|n| n.enabled)
    }

    /// Whether the element and all of its ancestors are enabled.
    pub fn is_enabled_in_hierarchy(&self, key: ElementKey) -> bool {
        let mut current = Some(key);
        while let Some(k) = current {
            let Some(node) = self.node_opt(k) else {
                return false;
            };
            if !node.enabled {
                return false;
            }
            current = node.parent();
        }
        true
    }

    /// Parent element, or `None` for root elements, detached elements, and stale keys.
    pub fn parent_of(&self, key: ElementKey) -> Option<ElementKey> {
        self.node_opt(key).and_then(Node::parent)
    }

    /// Entity of the parent element, if any.
    pub fn parent_entity_id(&self, key: ElementKey) -> Option<EntityId> {
        self.parent_of(key).map(|p| self.node(p).entity)
    }

    /// The canvas entity if `key` is attached to this canvas (through any
    /// number of ancestors), `None` if it or an ancestor is detached.
    pub fn canvas_entity_id(&self, key: ElementKey) -> Option<EntityId> {
        let mut current = self.node_opt(key)?;
        loop {
            match current.owner {
                Owner::Canvas => return Some(self.entity),
                Owner::Detached => return None,
                Owner::Element(p) => current = self.node(p),
            }
        }
    }

    /// Number of direct children; zero for stale keys.
    pub fn num_child_elements(&self, key: ElementKey) -> usize {
        self.children_of(key).len()
    }

    /// Child at `index`, or `None` if `index` is not in `0..num_child_elements`.
    pub fn child_element(&self, key: ElementKey, index: usize) -> Option<ElementKey> {
        self.children_of(key).get(index).copied()
    }

    /// Position of `key` among the root elements, if it is one.
    pub fn index_of_root_element(&self, key: ElementKey) -> Option<usize> {
        self.roots.iter().position(|&c| c == key)
    }

    /// Entity of the child at `index`, or `None` if `index` is out of range.
    pub fn child_entity_id(&self, key: ElementKey, index: usize) -> Option<EntityId> {
        self.child_element(key, index).map(|c| self.node(c).entity)
    }

    /// Position of `child` among the children of `parent`, if it is a direct child.
    pub fn index_of_child(&self, parent: ElementKey, child: ElementKey) -> Option<usize> {
        self.children_of(parent).iter().position(|&c| c == child)
    }

    /// Position of the child hosted by `entity`, if it is a direct child of `parent`.
    pub fn index_of_child_by_entity_id(
        &self,
        parent: ElementKey,
        entity: EntityId,
    ) -> Option<usize> {
        self.index_of_child(parent, self.element_by_entity_id(entity)?)
    }

    /// Borrowed view of the children of `key`; empty for stale keys.
    pub fn children_of(&self, key: ElementKey) -> &[ElementKey] {
        match self.node_opt(key) {
            Some(n) => &n.children,
            None => &[],
        }
    }

    /// Snapshot of the children of `key`. Later mutations do not affect it.
    pub fn child_elements(&self, key: ElementKey) -> Vec<ElementKey> {
        self.children_of(key).to_vec()
    }

    /// Snapshot of the children's entity ids, in child order.
    pub fn child_entity_ids(&self, key: ElementKey) -> Vec<EntityId> {
        self.children_of(key)
            .iter()
            .map(|&c| self.node(c).entity)
            .collect()
    }

    /// Whether the element hosted by `ancestor` is a strict ancestor of `key`.
    pub fn is_ancestor(&self, key: ElementKey, ancestor: EntityId) -> bool {
        self.element_by_entity_id(ancestor)
            .is_some_and(|a| self.is_ancestor_key(key, a))
    }

    // --- internals ---

    /// Children of `parent`, or the root elements when `parent` is `None`.
    pub(crate) fn siblings(&self, parent: Option<ElementKey>) -> &[ElementKey] {
        match parent {
            None => &self.roots,
            Some(p) => self.children_of(p),
        }
    }

    pub(crate) fn nodes_slice(&self) -> &[Option<Node>] {
        &self.nodes
    }

    pub(crate) fn node_opt(&self, key: ElementKey) -> Option<&Node> {
        self.nodes
            .get(key.idx())?
            .as_ref()
            .filter(|n| n.generation == key.generation())
    }

    fn live_node_mut(&mut self, key: ElementKey) -> TreeResult<&mut Node> {
        self.ensure_alive(key)?;
        Ok(self.node_mut(key))
    }

    fn node_opt_mut(&mut self, key: ElementKey) -> Option<&mut Node> {
        self.nodes
            .get_mut(key.idx())?
            .as_mut()
            .filter(|n| n.generation == key.generation())
    }

    /// Access a node known to be live; panics if `key` is stale.
    pub(crate) fn node(&self, key: ElementKey) -> &Node {
        self.nodes[key.idx()].as_ref().expect("dangling ElementKey")
    }

    fn node_mut(&mut self, key: ElementKey) -> &mut Node {
        self.nodes[key.idx()].as_mut().expect("dangling ElementKey")
    }

    fn ensure_alive(&self, key: ElementKey) -> TreeResult<()> {
        if self.is_alive(key) {
            Ok(())
        } else {
            warn!(?key, "rejected mutation: stale element");
            Err(TreeError::StaleElement(key))
        }
    }

    fn resolve_entity(&self, entity: EntityId) -> TreeResult<ElementKey> {
        self.element_by_entity_id(entity).ok_or_else(|| {
            warn!(%entity, "rejected mutation: unknown entity");
            TreeError::UnknownEntity(entity)
        })
    }

    /// Next allocator id that names neither the canvas nor a live element.
    fn fresh_entity(&mut self) -> EntityId {
        loop {
            let entity = self.allocator.allocate();
            if entity != self.entity && !self.by_entity.contains_key(&entity) {
                return entity;
            }
            trace!(%entity, "skipping entity id already in use");
        }
    }

    /// Walks the owner chain upward from the parent of `key`.
    fn is_ancestor_key(&self, key: ElementKey, ancestor: ElementKey) -> bool {
        let mut current = self.parent_of(key);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.node(p).parent();
        }
        false
    }

    fn ensure_no_cycle(&self, key: ElementKey, new_parent: ElementKey) -> TreeResult<()> {
        if new_parent == key || self.is_ancestor_key(new_parent, key) {
            warn!(?key, ?new_parent, "rejected move: would create a cycle");
            return Err(TreeError::CycleRejected {
                element: key,
                new_parent,
            });
        }
        Ok(())
    }

    fn insert_element(
        &mut self,
        parent: Option<ElementKey>,
        entity: EntityId,
        name: String,
    ) -> TreeResult<ElementKey> {
        if entity == self.entity || self.by_entity.contains_key(&entity) {
            warn!(%entity, "rejected element: entity already in use");
            return Err(TreeError::DuplicateEntity(entity));
        }
        let id = ElementId(self.next_element_id);
        self.next_element_id = self
            .next_element_id
            .checked_add(1)
            .expect("element id space exhausted");

        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, id, entity, name));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, id, entity, name)));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ElementKey uses 32-bit indices by design."
        )]
        let key = ElementKey::new(idx as u32, generation);
        self.by_entity.insert(entity, key);
        self.link(key, parent, None);
        debug!(%id, %entity, ?parent, "created element");
        Ok(key)
    }

    /// Insert a currently detached `key` into the child list of `parent`.
    fn link(&mut self, key: ElementKey, parent: Option<ElementKey>, index: Option<usize>) {
        let siblings = match parent {
            None => &mut self.roots,
            Some(p) => &mut self.node_mut(p).children,
        };
        match index {
            Some(i) if i < siblings.len() => siblings.insert(i, key),
            _ => siblings.push(key),
        }
        self.node_mut(key).owner = Owner::from_parent(parent);
    }

    /// Remove `key` from its owner's child list; no-op when already detached.
    fn unlink(&mut self, key: ElementKey) {
        let owner = self.node(key).owner;
        let siblings = match owner {
            Owner::Detached => return,
            Owner::Canvas => &mut self.roots,
            Owner::Element(p) => &mut self.node_mut(p).children,
        };
        siblings.retain(|&c| c != key);
        self.node_mut(key).owner = Owner::Detached;
    }
}
