// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element tree basics.
//!
//! Build a small canvas, move elements around, search it, and hit-test it.
//! Structural changes are logged through `tracing`; set `RUST_LOG=debug` to see them.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_examples --example element_tree_basics`

use kurbo::{Point, Rect};
use tracing_subscriber::EnvFilter;
use understory_element_tree::{
    Canvas, CoordinateMode, ElementEvent, ElementObserver, EntityId, Interactable,
};

/// Prints teardown notifications.
struct Announce;

impl ElementObserver for Announce {
    fn being_destroyed(&mut self, event: ElementEvent) {
        println!("element {} (entity {}) is going away", event.id, event.entity);
    }
}

/// A button that accepts clicks.
struct Button;

impl Interactable for Button {}

/// A scroll view that takes over drags started on its content.
struct ScrollView;

impl Interactable for ScrollView {
    fn supports_drag_hand_off(&self, _point: Point) -> bool {
        true
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut canvas = Canvas::new(EntityId(1));
    let scroll = canvas.create_child_element(None, "scroll").unwrap();
    let list = canvas.create_child_element(Some(scroll), "list").unwrap();
    let ok = canvas.create_child_element(Some(list), "ok").unwrap();
    let cancel = canvas.create_child_element(Some(list), "cancel").unwrap();

    canvas.set_bounds(scroll, Rect::new(0.0, 0.0, 300.0, 200.0)).unwrap();
    canvas.set_bounds(list, Rect::new(0.0, 0.0, 300.0, 400.0)).unwrap();
    canvas.set_bounds(ok, Rect::new(10.0, 10.0, 90.0, 40.0)).unwrap();
    canvas.set_bounds(cancel, Rect::new(100.0, 10.0, 180.0, 40.0)).unwrap();
    canvas.register_interactable(scroll, ScrollView).unwrap();
    canvas.register_interactable(ok, Button).unwrap();
    canvas.register_interactable(cancel, Button).unwrap();

    // Depth-first search reaches grandchildren.
    assert_eq!(canvas.find_descendant_by_name(scroll, "cancel"), Some(cancel));

    // A click on "ok" goes to the button, a drag on it is handed to the scroll view.
    let click = Point::new(20.0, 20.0);
    let handler = canvas.find_interactable_to_handle_event(None, click);
    println!("click handled by {handler:?}");
    assert_eq!(handler, canvas.entity_id(ok));
    let drag = canvas.find_parent_interactable_supporting_drag(ok, click);
    assert_eq!(drag, canvas.entity_id(scroll));

    // Put "cancel" first; it is now behind "ok" in paint order.
    canvas.reparent(cancel, Some(list), Some(ok)).unwrap();
    println!(
        "list order: {:?}",
        canvas
            .child_elements(list)
            .into_iter()
            .filter_map(|k| canvas.name(k))
            .collect::<Vec<_>>()
    );

    // Moving the list into one of its own buttons is refused.
    let err = canvas.reparent(list, Some(ok), None).unwrap_err();
    println!("rejected: {err}");

    let everything = canvas.find_all_children_intersecting_rect(
        Some(list),
        Point::new(0.0, 0.0),
        Point::new(300.0, 50.0),
        CoordinateMode::InGame,
    );
    assert_eq!(everything.len(), 2);

    canvas.observe(list, Box::new(Announce)).unwrap();
    canvas.observe(ok, Box::new(Announce)).unwrap();
    canvas.destroy_element(list).unwrap();
    println!("{canvas:?}");
}
