// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometric queries: point and rectangle hit testing over element bounds.
//!
//! Geometry comes from the [`ElementBounds`](crate::ElementBounds) capability;
//! elements without bounds never match. Children are painted back to front, so
//! "front-most" means "latest in child order". In
//! [`CoordinateMode::InGame`] disabled elements and their subtrees are skipped,
//! including when the query starts below a disabled ancestor; in
//! [`CoordinateMode::Edit`] everything participates.

use alloc::{vec, vec::Vec};
use kurbo::{Point, Rect};

use crate::canvas::Canvas;
use crate::entity::EntityAllocator;
use crate::types::{CoordinateMode, ElementKey, EntityId};

impl<A: EntityAllocator> Canvas<A> {
    /// Front-most direct child of `parent` (a root element when `parent` is
    /// `None`) whose bounds contain `point`.
    ///
    /// Children are tested from last to first and the first hit wins, so of
    /// two overlapping children the one painted later is returned.
    pub fn find_frontmost_child_containing_point(
        &self,
        parent: Option<ElementKey>,
        point: Point,
        mode: CoordinateMode,
    ) -> Option<ElementKey> {
        self.live_siblings(parent, mode)
            .iter()
            .rev()
            .copied()
            .filter(|&c| self.participates(c, mode))
            .find(|&c| self.capabilities.contains_point(c, point, mode))
    }

    /// Deepest, front-most element under `parent` (exclusive) whose bounds
    /// contain `point`.
    ///
    /// Each child's subtree is searched before the child itself, and later
    /// children before earlier ones, so a nested element wins over the
    /// container it sits in.
    pub fn find_frontmost_descendant_containing_point(
        &self,
        parent: Option<ElementKey>,
        point: Point,
        mode: CoordinateMode,
    ) -> Option<ElementKey> {
        self.front_to_back(parent, mode)
            .find(|&k| self.capabilities.contains_point(k, point, mode))
    }

    /// Direct children of `parent` (root elements when `None`) whose bounds
    /// intersect the rectangle spanned by `bound0` and `bound1`, in child order.
    ///
    /// The corners may be given in any order. Edges are inclusive.
    pub fn find_all_children_intersecting_rect(
        &self,
        parent: Option<ElementKey>,
        bound0: Point,
        bound1: Point,
        mode: CoordinateMode,
    ) -> Vec<ElementKey> {
        let rect = Rect::from_points(bound0, bound1);
        self.live_siblings(parent, mode)
            .iter()
            .copied()
            .filter(|&c| self.participates(c, mode))
            .filter(|&c| self.capabilities.intersects_rect(c, rect, mode))
            .collect()
    }

    /// Entity of the element that should handle a pointer event at `point`.
    ///
    /// Searches the subtree under `parent` (the whole canvas when `None`) in
    /// front-to-back order: descendants before their ancestors, later siblings
    /// before earlier ones, disabled subtrees skipped. The first element whose
    /// [`Interactable`](crate::Interactable) is handling events and whose
    /// in-game bounds contain `point` wins.
    pub fn find_interactable_to_handle_event(
        &self,
        parent: Option<ElementKey>,
        point: Point,
    ) -> Option<EntityId> {
        let mode = CoordinateMode::InGame;
        self.front_to_back(parent, mode)
            .find(|&k| {
                self.capabilities
                    .interactable(k)
                    .is_some_and(|i| i.is_handling_events())
                    && self.capabilities.contains_point(k, point, mode)
            })
            .map(|k| self.node(k).entity)
    }

    /// Entity of the nearest strict ancestor of `key` that can take over a drag
    /// starting at `point`.
    ///
    /// An ancestor qualifies if its interactable is handling events and
    /// reports [`supports_drag_hand_off`](crate::Interactable::supports_drag_hand_off).
    /// A disabled ancestor ends the walk: neither it nor anything above it
    /// takes the drag.
    pub fn find_parent_interactable_supporting_drag(
        &self,
        key: ElementKey,
        point: Point,
    ) -> Option<EntityId> {
        let mut current = self.parent_of(key);
        while let Some(p) = current {
            if !self.is_enabled(p) {
                return None;
            }
            if self
                .capabilities
                .interactable(p)
                .is_some_and(|i| i.is_handling_events() && i.supports_drag_hand_off(point))
            {
                return Some(self.node(p).entity);
            }
            current = self.parent_of(p);
        }
        None
    }

    fn participates(&self, key: ElementKey, mode: CoordinateMode) -> bool {
        !mode.is_in_game() || self.is_enabled(key)
    }

    /// Children of `parent`, or nothing when `parent` sits in a disabled
    /// subtree and `mode` is in-game.
    fn live_siblings(&self, parent: Option<ElementKey>, mode: CoordinateMode) -> &[ElementKey] {
        match parent {
            Some(p) if mode.is_in_game() && !self.is_enabled_in_hierarchy(p) => &[],
            _ => self.siblings(parent),
        }
    }

    /// Post-order walk with children reversed: the reverse of paint order.
    fn front_to_back(
        &self,
        parent: Option<ElementKey>,
        mode: CoordinateMode,
    ) -> impl Iterator<Item = ElementKey> + '_ {
        // (element, children already pushed)
        let mut stack: Vec<(ElementKey, bool)> = vec![];
        stack.extend(self.live_siblings(parent, mode).iter().map(|&c| (c, false)));
        core::iter::from_fn(move || {
            while let Some((key, expanded)) = stack.pop() {
                if expanded {
                    return Some(key);
                }
                if !self.participates(key, mode) {
                    continue;
                }
                stack.push((key, true));
                // Pushed in paint order so the front-most child is popped first.
                stack.extend(self.children_of(key).iter().map(|&c| (c, false)));
            }
            None
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{Interactable, ModeBounds};

    struct Button {
        handling: bool,
        drag: bool,
    }

    impl Interactable for Button {
        fn is_handling_events(&self) -> bool {
            self.handling
        }
        fn supports_drag_hand_off(&self, _point: Point) -> bool {
            self.drag
        }
    }

    fn button() -> Button {
        Button {
            handling: true,
            drag: false,
        }
    }

    /// A root panel (0..200) with two overlapping children A (0..100) and
    /// B (50..150), and C (60..70) nested inside A.
    fn sample() -> (Canvas, [ElementKey; 4]) {
        let mut canvas = Canvas::new(EntityId(1));
        let root = canvas.create_child_element(None, "root").unwrap();
        let a = canvas.create_child_element(Some(root), "a").unwrap();
        let b = canvas.create_child_element(Some(root), "b").unwrap();
        let c = canvas.create_child_element(Some(a), "c").unwrap();
        canvas.set_bounds(root, Rect::new(0.0, 0.0, 200.0, 200.0)).unwrap();
        canvas.set_bounds(a, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
        canvas.set_bounds(b, Rect::new(50.0, 50.0, 150.0, 150.0)).unwrap();
        canvas.set_bounds(c, Rect::new(60.0, 60.0, 70.0, 70.0)).unwrap();
        (canvas, [root, a, b, c])
    }

    #[test]
    fn later_child_wins_overlap() {
        let (canvas, [root, a, b, _c]) = sample();
        let mode = CoordinateMode::Edit;
        assert_eq!(
            canvas.find_frontmost_child_containing_point(Some(root), Point::new(75.0, 75.0), mode),
            Some(b),
            "topmost (last painted) child wins"
        );
        assert_eq!(
            canvas.find_frontmost_child_containing_point(Some(root), Point::new(10.0, 10.0), mode),
            Some(a)
        );
        assert_eq!(
            canvas.find_frontmost_child_containing_point(Some(root), Point::new(190.0, 10.0), mode),
            None
        );
        assert_eq!(
            canvas.find_frontmost_child_containing_point(None, Point::new(190.0, 10.0), mode),
            Some(root)
        );
    }

    #[test]
    fn in_game_skips_disabled_children() {
        let (mut canvas, [root, a, b, _c]) = sample();
        canvas.set_is_enabled(b, false).unwrap();
        let p = Point::new(75.0, 75.0);
        assert_eq!(
            canvas.find_frontmost_child_containing_point(Some(root), p, CoordinateMode::InGame),
            Some(a)
        );
        assert_eq!(
            canvas.find_frontmost_child_containing_point(Some(root), p, CoordinateMode::Edit),
            Some(b),
            "edit mode ignores the enabled flag"
        );
    }

    #[test]
    fn mode_selects_bounds() {
        let mut canvas = Canvas::new(EntityId(1));
        let root = canvas.create_child_element(None, "root").unwrap();
        let a = canvas.create_child_element(Some(root), "a").unwrap();
        canvas
            .set_bounds(
                a,
                ModeBounds {
                    edit: Rect::new(0.0, 0.0, 10.0, 10.0),
                    in_game: Rect::new(20.0, 20.0, 30.0, 30.0),
                },
            )
            .unwrap();
        let p = Point::new(25.0, 25.0);
        assert_eq!(
            canvas.find_frontmost_child_containing_point(Some(root), p, CoordinateMode::InGame),
            Some(a)
        );
        assert_eq!(
            canvas.find_frontmost_child_containing_point(Some(root), p, CoordinateMode::Edit),
            None
        );
    }

    #[test]
    fn nested_element_wins_in_descendant_search() {
        let (canvas, [root, a, b, c]) = sample();
        let mode = CoordinateMode::Edit;
        // C is inside A, but B is painted over A and C.
        assert_eq!(
            canvas.find_frontmost_descendant_containing_point(None, Point::new(65.0, 65.0), mode),
            Some(b)
        );
        let p = Point::new(65.0, 65.0);
        assert_eq!(
            canvas.find_frontmost_descendant_containing_point(Some(a), p, mode),
            Some(c)
        );
        assert_eq!(
            canvas.find_frontmost_descendant_containing_point(None, Point::new(10.0, 10.0), mode),
            Some(a)
        );
        assert_eq!(
            canvas.find_frontmost_descendant_containing_point(None, Point::new(180.0, 180.0), mode),
            Some(root)
        );
    }

    #[test]
    fn rect_queries() {
        let (canvas, [root, a, b, _c]) = sample();
        let mode = CoordinateMode::Edit;
        let outside = canvas.find_all_children_intersecting_rect(
            Some(root),
            Point::new(300.0, 300.0),
            Point::new(400.0, 400.0),
            mode,
        );
        assert!(outside.is_empty());

        // Corners given in reverse order still span the same rect.
        let exact = canvas.find_all_children_intersecting_rect(
            Some(root),
            Point::new(40.0, 40.0),
            Point::new(0.0, 0.0),
            mode,
        );
        assert_eq!(exact, vec![a]);

        let both = canvas.find_all_children_intersecting_rect(
            Some(root),
            Point::new(60.0, 60.0),
            Point::new(90.0, 90.0),
            mode,
        );
        assert_eq!(both, vec![a, b], "child order is preserved");
    }

    #[test]
    fn rect_equal_to_child_bounds_returns_that_child() {
        let mut canvas = Canvas::new(EntityId(1));
        let root = canvas.create_child_element(None, "root").unwrap();
        let a = canvas.create_child_element(Some(root), "a").unwrap();
        let b = canvas.create_child_element(Some(root), "b").unwrap();
        canvas.set_bounds(a, Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();
        canvas.set_bounds(b, Rect::new(20.0, 0.0, 30.0, 10.0)).unwrap();
        let hits = canvas.find_all_children_intersecting_rect(
            Some(root),
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            CoordinateMode::InGame,
        );
        assert_eq!(hits, vec![a]);
    }

    #[test]
    fn interactable_prefers_front_and_depth() {
        let (mut canvas, [root, a, b, c]) = sample();
        canvas.register_interactable(root, button()).unwrap();
        canvas.register_interactable(c, button()).unwrap();

        let entity = |k| canvas.entity_id(k);
        // B covers C but has no interactable; C is the front-most interactable.
        assert_eq!(
            canvas.find_interactable_to_handle_event(None, Point::new(65.0, 65.0)),
            entity(c)
        );
        // Outside C, the root panel handles it.
        assert_eq!(
            canvas.find_interactable_to_handle_event(None, Point::new(10.0, 10.0)),
            entity(root)
        );
        assert_eq!(
            canvas.find_interactable_to_handle_event(None, Point::new(500.0, 500.0)),
            None
        );

        canvas.register_interactable(b, button()).unwrap();
        assert_eq!(
            canvas.find_interactable_to_handle_event(None, Point::new(65.0, 65.0)),
            canvas.entity_id(b)
        );

        // Disabled subtrees are skipped in game, so only the root remains.
        canvas.set_is_enabled(b, false).unwrap();
        canvas.set_is_enabled(a, false).unwrap();
        assert_eq!(
            canvas.find_interactable_to_handle_event(None, Point::new(65.0, 65.0)),
            canvas.entity_id(root)
        );
    }

    #[test]
    fn interactable_not_handling_events_is_ignored() {
        let (mut canvas, [root, _a, _b, c]) = sample();
        canvas
            .register_interactable(
                c,
                Button {
                    handling: false,
                    drag: false,
                },
            )
            .unwrap();
        canvas.register_interactable(root, button()).unwrap();
        assert_eq!(
            canvas.find_interactable_to_handle_event(None, Point::new(65.0, 65.0)),
            canvas.entity_id(root)
        );
    }

    #[test]
    fn drag_hand_off_walks_ancestors() {
        let (mut canvas, [root, a, _b, c]) = sample();
        let p = Point::new(65.0, 65.0);
        assert_eq!(canvas.find_parent_interactable_supporting_drag(c, p), None);

        canvas
            .register_interactable(
                root,
                Button {
                    handling: true,
                    drag: true,
                },
            )
            .unwrap();
        assert_eq!(
            canvas.find_parent_interactable_supporting_drag(c, p),
            canvas.entity_id(root)
        );

        canvas
            .register_interactable(
                a,
                Button {
                    handling: true,
                    drag: true,
                },
            )
            .unwrap();
        assert_eq!(
            canvas.find_parent_interactable_supporting_drag(c, p),
            canvas.entity_id(a),
            "nearest ancestor wins"
        );
        assert_eq!(
            canvas.find_parent_interactable_supporting_drag(a, p),
            canvas.entity_id(root),
            "the element itself is not considered"
        );
    }

    #[test]
    fn queries_under_disabled_ancestor_find_nothing_in_game() {
        let (mut canvas, [root, a, _b, c]) = sample();
        canvas.register_interactable(c, button()).unwrap();
        canvas.set_is_enabled(root, false).unwrap();
        let p = Point::new(65.0, 65.0);
        assert_eq!(canvas.find_interactable_to_handle_event(None, p), None);
        assert_eq!(
            canvas.find_interactable_to_handle_event(Some(root), p),
            None,
            "starting inside a disabled subtree does not bypass it"
        );
        assert_eq!(canvas.find_interactable_to_handle_event(Some(a), p), None);
        assert_eq!(
            canvas.find_frontmost_descendant_containing_point(Some(a), p, CoordinateMode::InGame),
            None
        );
        assert_eq!(
            canvas.find_frontmost_child_containing_point(Some(a), p, CoordinateMode::InGame),
            None
        );
        assert!(
            canvas
                .find_all_children_intersecting_rect(Some(root), p, p, CoordinateMode::InGame)
                .is_empty()
        );
        assert_eq!(
            canvas.find_frontmost_child_containing_point(Some(a), p, CoordinateMode::Edit),
            Some(c),
            "edit mode ignores the enabled flag"
        );

        canvas.set_is_enabled(root, true).unwrap();
        assert_eq!(
            canvas.find_interactable_to_handle_event(Some(root), p),
            canvas.entity_id(c)
        );
    }

    #[test]
    fn disabled_ancestor_does_not_take_drag() {
        let (mut canvas, [root, a, _b, c]) = sample();
        let p = Point::new(65.0, 65.0);
        canvas
            .register_interactable(
                root,
                Button {
                    handling: true,
                    drag: true,
                },
            )
            .unwrap();
        canvas.set_is_enabled(root, false).unwrap();
        assert_eq!(canvas.find_parent_interactable_supporting_drag(c, p), None);

        // A disabled element between the child and the scroll view blocks it too.
        canvas.set_is_enabled(root, true).unwrap();
        canvas.set_is_enabled(a, false).unwrap();
        assert_eq!(canvas.find_parent_interactable_supporting_drag(c, p), None);
        assert_eq!(
            canvas.find_parent_interactable_supporting_drag(a, p),
            canvas.entity_id(root),
            "only ancestors are checked for being enabled"
        );
    }

    #[test]
    fn destroyed_elements_lose_capabilities() {
        let (mut canvas, [root, a, _b, c]) = sample();
        canvas.register_interactable(c, button()).unwrap();
        canvas.destroy_element(a).unwrap();
        assert!(canvas.capabilities().interactable(c).is_none());
        assert!(canvas.capabilities().bounds(c).is_none());
        assert_eq!(
            canvas.find_frontmost_child_containing_point(
                Some(root),
                Point::new(10.0, 10.0),
                CoordinateMode::Edit
            ),
            None
        );
    }
}
