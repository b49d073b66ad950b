// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-element capabilities supplied by collaborators.
//!
//! The tree itself computes no geometry and handles no input. Layout code
//! attaches an [`ElementBounds`] to an element, input code attaches an
//! [`Interactable`], and the geometric queries on [`Canvas`](crate::Canvas)
//! consult them through the [`Capabilities`] registry.

use alloc::boxed::Box;
use hashbrown::HashMap;
use kurbo::{Affine, Point, Rect};

use crate::error::{TreeError, TreeResult};
use crate::types::{CoordinateMode, ElementKey};

/// Bounds of an element in canvas space.
///
/// Edges are inclusive for both queries: a point on the border is contained and
/// rectangles sharing an edge intersect.
pub trait ElementBounds {
    /// Whether `point` lies within the element in the given coordinate mode.
    fn contains_point(&self, point: Point, mode: CoordinateMode) -> bool;

    /// Whether the element overlaps `rect` in the given coordinate mode.
    fn intersects_rect(&self, rect: Rect, mode: CoordinateMode) -> bool;
}

/// Input capability of an element.
pub trait Interactable {
    /// Whether the interactable currently accepts events.
    fn is_handling_events(&self) -> bool {
        true
    }

    /// Whether a drag starting at `point` on a descendant may be handed to this element.
    fn supports_drag_hand_off(&self, point: Point) -> bool {
        let _ = point;
        false
    }
}

/// Axis-aligned bounds shared by both coordinate modes.
impl ElementBounds for Rect {
    fn contains_point(&self, point: Point, _mode: CoordinateMode) -> bool {
        rect_contains_inclusive(*self, point)
    }

    fn intersects_rect(&self, rect: Rect, _mode: CoordinateMode) -> bool {
        rects_overlap_inclusive(*self, rect)
    }
}

/// Separate axis-aligned bounds for edit and in-game layouts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModeBounds {
    /// Bounds used in [`CoordinateMode::Edit`].
    pub edit: Rect,
    /// Bounds used in [`CoordinateMode::InGame`].
    pub in_game: Rect,
}

impl ModeBounds {
    fn select(&self, mode: CoordinateMode) -> Rect {
        match mode {
            CoordinateMode::Edit => self.edit,
            CoordinateMode::InGame => self.in_game,
        }
    }
}

impl ElementBounds for ModeBounds {
    fn contains_point(&self, point: Point, mode: CoordinateMode) -> bool {
        rect_contains_inclusive(self.select(mode), point)
    }

    fn intersects_rect(&self, rect: Rect, mode: CoordinateMode) -> bool {
        rects_overlap_inclusive(self.select(mode), rect)
    }
}

/// Local bounds placed in canvas space by an affine transform.
///
/// Point tests are exact (the point is mapped back into local space). Rect
/// tests use a conservative axis-aligned box around the transformed bounds,
/// so they may report overlap for rotated elements that only come close.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformedBounds {
    /// Untransformed bounds.
    pub local: Rect,
    /// Local-to-canvas transform.
    pub transform: Affine,
}

impl TransformedBounds {
    /// Conservative canvas-space AABB of the transformed bounds.
    pub fn canvas_aabb(&self) -> Rect {
        transform_rect_bbox(self.transform, self.local)
    }
}

impl ElementBounds for TransformedBounds {
    fn contains_point(&self, point: Point, _mode: CoordinateMode) -> bool {
        if self.transform.determinant() == 0.0 {
            return false;
        }
        rect_contains_inclusive(self.local, self.transform.inverse() * point)
    }

    fn intersects_rect(&self, rect: Rect, _mode: CoordinateMode) -> bool {
        rects_overlap_inclusive(self.canvas_aabb(), rect)
    }
}

/// Transform an axis-aligned `Rect` by an `Affine` and return a conservative
/// axis-aligned bounding box.
fn transform_rect_bbox(affine: Affine, rect: Rect) -> Rect {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    let min_x = (a * rect.x0).min(a * rect.x1) + (c * rect.y0).min(c * rect.y1);
    let max_x = (a * rect.x0).max(a * rect.x1) + (c * rect.y0).max(c * rect.y1);
    let min_y = (b * rect.x0).min(b * rect.x1) + (d * rect.y0).min(d * rect.y1);
    let max_y = (b * rect.x0).max(b * rect.x1) + (d * rect.y0).max(d * rect.y1);
    Rect::new(min_x + e, min_y + f, max_x + e, max_y + f)
}

// kurbo's `Rect::contains` excludes the far edges.
fn rect_contains_inclusive(r: Rect, p: Point) -> bool {
    let r = r.abs();
    r.x0 <= p.x && p.x <= r.x1 && r.y0 <= p.y && p.y <= r.y1
}

fn rects_overlap_inclusive(a: Rect, b: Rect) -> bool {
    let (a, b) = (a.abs(), b.abs());
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

/// Capability table keyed by element.
///
/// Bounds are owned by layout and may be replaced at any time. Interactables
/// follow a single-handler policy: an element has at most one, and a second
/// registration is rejected rather than overwriting the first.
#[derive(Default)]
pub struct Capabilities {
    bounds: HashMap<ElementKey, Box<dyn ElementBounds>>,
    interactables: HashMap<ElementKey, Box<dyn Interactable>>,
}

impl core::fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Capabilities")
            .field("bounds", &self.bounds.len())
            .field("interactables", &self.interactables.len())
            .finish()
    }
}

impl Capabilities {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach or replace the bounds of `key`.
    pub fn set_bounds(&mut self, key: ElementKey, bounds: Box<dyn ElementBounds>) {
        self.bounds.insert(key, bounds);
    }

    /// Detach the bounds of `key`, returning them if present.
    pub fn clear_bounds(&mut self, key: ElementKey) -> Option<Box<dyn ElementBounds>> {
        self.bounds.remove(&key)
    }

    /// Bounds of `key`, if any.
    pub fn bounds(&self, key: ElementKey) -> Option<&dyn ElementBounds> {
        self.bounds.get(&key).map(|b| &**b)
    }

    /// Register the interactable of `key`.
    ///
    /// Fails with [`TreeError::DuplicateHandler`] if one is already registered.
    pub fn register_interactable(
        &mut self,
        key: ElementKey,
        interactable: Box<dyn Interactable>,
    ) -> TreeResult<()> {
        if self.interactables.contains_key(&key) {
            return Err(TreeError::DuplicateHandler(key));
        }
        self.interactables.insert(key, interactable);
        Ok(())
    }

    /// Remove the interactable of `key`, returning it if present.
    pub fn unregister_interactable(&mut self, key: ElementKey) -> Option<Box<dyn Interactable>> {
        self.interactables.remove(&key)
    }

    /// Interactable of `key`, if any.
    pub fn interactable(&self, key: ElementKey) -> Option<&dyn Interactable> {
        self.interactables.get(&key).map(|i| &**i)
    }

    pub(crate) fn contains_point(
        &self,
        key: ElementKey,
        point: Point,
        mode: CoordinateMode,
    ) -> bool {
        self.bounds(key).is_some_and(|b| b.contains_point(point, mode))
    }

    pub(crate) fn intersects_rect(
        &self,
        key: ElementKey,
        rect: Rect,
        mode: CoordinateMode,
    ) -> bool {
        self.bounds(key).is_some_and(|b| b.intersects_rect(rect, mode))
    }

    pub(crate) fn remove_all(&mut self, key: ElementKey) {
        self.bounds.remove(&key);
        self.interactables.remove(&key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::FRAC_PI_4;
    use kurbo::Vec2;

    struct Button;
    impl Interactable for Button {}

    #[test]
    fn rect_edges_are_inclusive() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains_point(Point::new(10.0, 10.0), CoordinateMode::Edit));
        assert!(!r.contains_point(Point::new(10.1, 5.0), CoordinateMode::Edit));
        assert!(ElementBounds::intersects_rect(
            &r,
            Rect::new(10.0, 0.0, 20.0, 10.0),
            CoordinateMode::Edit
        ));
        assert!(!ElementBounds::intersects_rect(
            &r,
            Rect::new(11.0, 0.0, 20.0, 10.0),
            CoordinateMode::Edit
        ));
    }

    #[test]
    fn mode_bounds_pick_layout() {
        let b = ModeBounds {
            edit: Rect::new(0.0, 0.0, 10.0, 10.0),
            in_game: Rect::new(100.0, 100.0, 110.0, 110.0),
        };
        let p = Point::new(5.0, 5.0);
        assert!(b.contains_point(p, CoordinateMode::Edit));
        assert!(!b.contains_point(p, CoordinateMode::InGame));
    }

    #[test]
    fn transformed_point_test_is_exact() {
        let b = TransformedBounds {
            local: Rect::new(-10.0, -10.0, 10.0, 10.0),
            transform: Affine::rotate(FRAC_PI_4),
        };
        // Inside the AABB of the rotated square but outside the square itself.
        let corner = Point::new(10.0, 10.0);
        assert!(b.canvas_aabb().contains(corner));
        assert!(!b.contains_point(corner, CoordinateMode::InGame));
        assert!(b.contains_point(Point::new(0.0, 0.0), CoordinateMode::InGame));
    }

    #[test]
    fn translated_rect_intersects() {
        let b = TransformedBounds {
            local: Rect::new(0.0, 0.0, 10.0, 10.0),
            transform: Affine::translate(Vec2::new(50.0, 0.0)),
        };
        assert_eq!(b.canvas_aabb(), Rect::new(50.0, 0.0, 60.0, 10.0));
        assert!(!b.intersects_rect(Rect::new(0.0, 0.0, 10.0, 10.0), CoordinateMode::Edit));
    }

    #[test]
    fn second_interactable_is_rejected() {
        let key = ElementKey::new(0, 1);
        let mut caps = Capabilities::new();
        assert!(caps.register_interactable(key, Box::new(Button)).is_ok());
        assert_eq!(
            caps.register_interactable(key, Box::new(Button)).err(),
            Some(TreeError::DuplicateHandler(key))
        );
        assert!(caps.unregister_interactable(key).is_some());
        assert!(caps.register_interactable(key, Box::new(Button)).is_ok());
    }
}
