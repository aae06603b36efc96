// Host-side tests for pointer drag tracking.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod input {
    include!("../src/input.rs");
}

use input::*;

#[test]
fn click_without_movement_is_handled() {
    let mut d = DragTracker::default();
    d.press(100.0, 100.0);
    assert_eq!(d.move_to(101.0, 100.0), Some((1.0, 0.0)));
    d.release();
    assert!(d.take_click());
}

#[test]
fn drag_reports_deltas_and_swallows_the_click() {
    let mut d = DragTracker::default();
    d.press(10.0, 10.0);
    assert_eq!(d.move_to(30.0, 10.0), Some((20.0, 0.0)));
    assert_eq!(d.move_to(30.0, 5.0), Some((0.0, -5.0)));
    d.release();
    assert_eq!(d.move_to(40.0, 5.0), None);
    assert!(!d.take_click());
    // suppression only applies to the click right after the drag
    assert!(d.take_click());
}

#[test]
fn movement_without_press_is_ignored() {
    let mut d = DragTracker::default();
    assert_eq!(d.move_to(50.0, 50.0), None);
    d.release();
    assert!(d.take_click());
}

#[test]
fn back_and_forth_travel_accumulates() {
    let mut d = DragTracker::default();
    d.press(0.0, 0.0);
    d.move_to(4.0, 0.0);
    d.move_to(0.0, 0.0);
    d.release();
    // net displacement is zero but the pointer travelled 8px
    assert!(!d.take_click());
}

#[test]
fn new_press_clears_pending_suppression() {
    let mut d = DragTracker::default();
    d.press(0.0, 0.0);
    d.move_to(50.0, 0.0);
    d.release();
    d.press(0.0, 0.0);
    d.release();
    assert!(d.take_click());
}
