// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Element Tree: an owning hierarchy of UI elements.
//!
//! Understory Element Tree is the structural layer of a retained-mode UI: it
//! records which element owns which, in what order, and answers questions
//! about that shape.
//!
//! - Elements live in a [`Canvas`] and are addressed by generational [`ElementKey`]s.
//! - Each element owns an ordered list of children (paint order, back to front),
//!   can be reparented, detached, and destroyed recursively.
//! - Searches by name, [`ElementId`], [`EntityId`], or predicate walk the tree
//!   depth-first in pre-order.
//! - Hit testing asks per-element [`ElementBounds`] and [`Interactable`]
//!   capabilities, supplied by layout and input code.
//! - Observers ([`ElementObserver`]) hear about property changes and teardown.
//!
//! ## Identity
//!
//! Every element carries three handles with different scopes:
//! - [`ElementKey`]: arena slot + generation. Cheap to copy, goes stale on destroy.
//! - [`ElementId`]: tree-local number, unique within a canvas, never reused.
//! - [`EntityId`]: handle of the host runtime's object for the element. A canvas
//!   maps each entity to at most one element.
//!
//! ## Not a layout or rendering engine
//!
//! This crate does not measure, arrange, or paint anything. Bounds are whatever
//! the host's layout system attaches with [`Canvas::set_bounds`], in either
//! editor or in-game coordinates ([`CoordinateMode`]). Activation, update ticks,
//! and serialization belong to the host runtime as well.
//!
//! ## API overview
//!
//! - Mutation: [`Canvas::create_child_element`], [`Canvas::destroy_element`],
//!   [`Canvas::reparent`], [`Canvas::reparent_by_entity_id`],
//!   [`Canvas::add_to_parent_at_index`], [`Canvas::remove_from_parent`].
//! - Structure: [`Canvas::children_of`], [`Canvas::child_elements`],
//!   [`Canvas::index_of_child`], [`Canvas::parent_of`], [`Canvas::is_ancestor`].
//! - Search: [`Canvas::find_child_by_name`], [`Canvas::find_descendant_by_name`],
//!   [`Canvas::find_descendant_by_id`], [`Canvas::find_descendant_elements`],
//!   [`Canvas::call_on_descendant_elements`], [`Canvas::descendants`].
//! - Geometry: [`Canvas::find_frontmost_child_containing_point`],
//!   [`Canvas::find_all_children_intersecting_rect`],
//!   [`Canvas::find_interactable_to_handle_event`],
//!   [`Canvas::find_parent_interactable_supporting_drag`].
//!
//! Mutations return [`TreeResult`]; a rejected mutation leaves the tree unchanged.
//! Queries return `Option`s and empty lists instead of failing.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use understory_element_tree::{Canvas, CoordinateMode, EntityId};
//!
//! let mut canvas = Canvas::new(EntityId(1));
//! let window = canvas.create_child_element(None, "window").unwrap();
//! let back = canvas.create_child_element(Some(window), "back").unwrap();
//! let front = canvas.create_child_element(Some(window), "front").unwrap();
//! canvas.set_bounds(back, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
//! canvas.set_bounds(front, Rect::new(50.0, 50.0, 150.0, 150.0)).unwrap();
//!
//! let hit = canvas.find_frontmost_child_containing_point(
//!     Some(window),
//!     Point::new(75.0, 75.0),
//!     CoordinateMode::InGame,
//! );
//! assert_eq!(hit, Some(front));
//! assert_eq!(canvas.find_descendant_by_name(window, "back"), Some(back));
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`, `thiserror`, and `tracing`.
//! - `libm`: `no_std` float math for `kurbo`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod canvas;
mod capability;
mod entity;
mod error;
mod hit;
mod notify;
mod search;
mod types;

pub use canvas::Canvas;
pub use capability::{Capabilities, ElementBounds, Interactable, ModeBounds, TransformedBounds};
pub use entity::{EntityAllocator, SequentialEntityIds};
pub use error::{TreeError, TreeResult};
pub use notify::{ElementEvent, ElementObserver, ObserverId};
pub use search::Descendants;
pub use types::{CoordinateMode, ElementId, ElementKey, ElementView, EntityId};
