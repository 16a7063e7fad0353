//! End-to-end tests for each recognizer, driven through the module facade.

mod common;

use common::{Harness, INNER, OUTER, ROOT};
use horizon_gesture::{GestureData, GestureState, Point, PointerAction};
use serde_json::json;

use GestureState::{Active, Began, End, Failed, Undetermined};

// =========================================================================
// Fling
// =========================================================================

#[test]
fn test_fling_times_out_once() {
    let mut harness = Harness::new();
    harness.create("FlingGestureHandler", 1, OUTER, json!({}));

    harness.at(0).touch(PointerAction::Down, 10.0, 10.0);
    harness.at(799).tick();
    assert_eq!(harness.state(1), Began);

    harness.at(800).tick();
    harness.at(900).tick();
    harness.at(950).touch(PointerAction::Up, 250.0, 10.0);

    assert_eq!(harness.reported(1), vec![Began, Failed]);
    assert_eq!(harness.module.next_deadline(), None);
}

#[test]
fn test_fling_deadline_checked_on_next_event() {
    let mut harness = Harness::new();
    harness.create("FlingGestureHandler", 1, OUTER, json!({}));

    harness.at(0).touch(PointerAction::Down, 10.0, 10.0);
    // No tick: the late pointer up still finds the deadline passed.
    harness.at(900).touch(PointerAction::Up, 250.0, 10.0);

    assert_eq!(harness.reported(1), vec![Began, Failed]);
}

#[test]
fn test_fling_right() {
    let mut harness = Harness::new();
    harness.create("FlingGestureHandler", 1, ROOT, json!({ "direction": 1 }));

    harness.at(0).touch(PointerAction::Down, 0.0, 0.0);
    harness.at(100).touch(PointerAction::Up, 200.0, 0.0);

    assert_eq!(
        harness.changes(1),
        vec![(Began, Undetermined), (Active, Began), (End, Active)]
    );
}

#[test]
fn test_fling_wrong_direction_fails() {
    let mut harness = Harness::new();
    harness.create("FlingGestureHandler", 1, ROOT, json!({ "direction": 1 }));

    harness.at(0).touch(PointerAction::Down, 300.0, 0.0);
    harness.at(100).touch(PointerAction::Up, 100.0, 0.0);

    assert_eq!(harness.reported(1), vec![Began, Failed]);
}

// =========================================================================
// Pan
// =========================================================================

#[test]
fn test_pan_activates_at_touch_slop() {
    let mut harness = Harness::new();
    harness.create("PanGestureHandler", 1, INNER, json!({}));

    harness.at(0).touch(PointerAction::Down, 150.0, 150.0);
    harness.at(16).touch(PointerAction::Move, 157.9, 150.0);
    assert_eq!(harness.state(1), Began);
    harness.at(32).touch(PointerAction::Move, 155.0, 154.0);
    assert_eq!(harness.state(1), Began);

    harness.at(48).touch(PointerAction::Move, 158.0, 150.0);
    assert_eq!(harness.state(1), Active);

    // Translation is measured from the point of activation.
    harness.at(64).touch(PointerAction::Move, 170.0, 150.0);
    match harness.updates(1).last() {
        Some(GestureData::Pan { translation, .. }) => {
            assert_eq!(*translation, Point::new(12.0, 0.0));
        }
        other => panic!("unexpected update {other:?}"),
    }

    harness.at(80).touch(PointerAction::Up, 170.0, 150.0);
    assert_eq!(harness.reported(1), vec![Began, Active, End]);
}

#[test]
fn test_pan_fail_offset() {
    let mut harness = Harness::new();
    harness.create(
        "PanGestureHandler",
        1,
        INNER,
        json!({ "activeOffsetXEnd": 20, "failOffsetYEnd": 10 }),
    );

    harness.at(0).touch(PointerAction::Down, 150.0, 150.0);
    harness.at(16).touch(PointerAction::Move, 150.0, 165.0);

    assert_eq!(harness.reported(1), vec![Began, Failed]);
}

// =========================================================================
// Hit slop
// =========================================================================

#[test]
fn test_hit_slop_extends_bounds() {
    let mut harness = Harness::new();
    if let Some(node) = harness.tree.get_mut(INNER) {
        node.clips_children = false;
    }
    harness.create("TapGestureHandler", 1, INNER, json!({ "hitSlop": 10 }));

    // Local (105, 105): inside the slop.
    harness.at(0).touch(PointerAction::Down, 205.0, 205.0);
    harness.at(50).touch(PointerAction::Up, 205.0, 205.0);
    assert_eq!(harness.reported(1), vec![Began, Active, End]);

    // Local (115, 50): outside it.
    harness.at(1000).touch(PointerAction::Down, 215.0, 150.0);
    harness.at(1050).touch(PointerAction::Up, 215.0, 150.0);
    assert_eq!(harness.reported(1), vec![Began, Active, End]);
    assert_eq!(harness.state(1), Undetermined);
}

// =========================================================================
// Tap
// =========================================================================

#[test]
fn test_double_tap() {
    let mut harness = Harness::new();
    harness.create("TapGestureHandler", 1, INNER, json!({ "numberOfTaps": 2 }));

    harness.at(0).touch(PointerAction::Down, 150.0, 150.0);
    harness.at(50).touch(PointerAction::Up, 150.0, 150.0);
    assert_eq!(harness.state(1), Began);

    harness.at(150).touch(PointerAction::Down, 152.0, 150.0);
    harness.at(200).touch(PointerAction::Up, 152.0, 150.0);

    assert_eq!(harness.reported(1), vec![Began, Active, End]);
}

#[test]
fn test_double_tap_too_slow_fails() {
    let mut harness = Harness::new();
    harness.create("TapGestureHandler", 1, INNER, json!({ "numberOfTaps": 2 }));

    harness.at(0).touch(PointerAction::Down, 150.0, 150.0);
    harness.at(50).touch(PointerAction::Up, 150.0, 150.0);
    harness.at(260).tick();

    assert_eq!(harness.reported(1), vec![Began, Failed]);
}

#[test]
fn test_long_hold_is_not_a_tap() {
    let mut harness = Harness::new();
    harness.create("TapGestureHandler", 1, INNER, json!({}));

    harness.at(0).touch(PointerAction::Down, 150.0, 150.0);
    harness.at(600).touch(PointerAction::Up, 150.0, 150.0);

    assert_eq!(harness.reported(1), vec![Began, Failed]);
}

// =========================================================================
// Long press
// =========================================================================

#[test]
fn test_long_press() {
    let mut harness = Harness::new();
    harness.create("LongPressGestureHandler", 1, INNER, json!({}));

    harness.at(0).touch(PointerAction::Down, 150.0, 150.0);
    harness.at(499).tick();
    assert_eq!(harness.state(1), Began);

    harness.at(500).tick();
    assert_eq!(harness.state(1), Active);

    harness.at(650).touch(PointerAction::Up, 150.0, 150.0);
    assert_eq!(harness.reported(1), vec![Began, Active, End]);
}

#[test]
fn test_long_press_released_early_fails() {
    let mut harness = Harness::new();
    harness.create("LongPressGestureHandler", 1, INNER, json!({ "minDurationMs": 300 }));

    harness.at(0).touch(PointerAction::Down, 150.0, 150.0);
    harness.at(200).touch(PointerAction::Up, 150.0, 150.0);

    assert_eq!(harness.reported(1), vec![Began, Failed]);
}

// =========================================================================
// Pinch and rotation
// =========================================================================

#[test]
fn test_pinch() {
    let mut harness = Harness::new();
    harness.create("PinchGestureHandler", 1, OUTER, json!({}));

    harness.at(0).touch(PointerAction::Down, 100.0, 150.0);
    harness
        .at(10)
        .multi(PointerAction::PointerDown, 1, &[(100.0, 150.0), (200.0, 150.0)]);
    assert_eq!(harness.state(1), Began);

    harness
        .at(20)
        .multi(PointerAction::Move, 0, &[(80.0, 150.0), (220.0, 150.0)]);
    assert_eq!(harness.state(1), Active);

    harness
        .at(30)
        .multi(PointerAction::Move, 0, &[(60.0, 150.0), (240.0, 150.0)]);
    match harness.updates(1).last() {
        Some(GestureData::Pinch { scale, focal, .. }) => {
            assert!((scale - 180.0 / 140.0).abs() < 1e-3);
            assert_eq!(*focal, Point::new(150.0, 150.0));
        }
        other => panic!("unexpected update {other:?}"),
    }

    harness
        .at(40)
        .multi(PointerAction::PointerUp, 1, &[(60.0, 150.0), (240.0, 150.0)]);
    assert_eq!(harness.reported(1), vec![Began, Active, End]);
}

#[test]
fn test_rotation() {
    let mut harness = Harness::new();
    harness.create("RotationGestureHandler", 1, OUTER, json!({}));

    harness.at(0).touch(PointerAction::Down, 100.0, 100.0);
    harness
        .at(10)
        .multi(PointerAction::PointerDown, 1, &[(100.0, 100.0), (200.0, 100.0)]);
    harness
        .at(20)
        .multi(PointerAction::Move, 0, &[(100.0, 100.0), (200.0, 110.0)]);
    assert_eq!(harness.state(1), Active);

    harness
        .at(30)
        .multi(PointerAction::PointerUp, 1, &[(100.0, 100.0), (200.0, 110.0)]);
    assert_eq!(harness.reported(1), vec![Began, Active, End]);
}

#[test]
fn test_pinch_and_rotation_together() {
    let mut harness = Harness::new();
    harness.create("PinchGestureHandler", 1, OUTER, json!({ "simultaneousHandlers": [2] }));
    harness.create("RotationGestureHandler", 2, OUTER, json!({}));

    harness.at(0).touch(PointerAction::Down, 100.0, 100.0);
    harness
        .at(10)
        .multi(PointerAction::PointerDown, 1, &[(100.0, 100.0), (200.0, 100.0)]);
    harness
        .at(20)
        .multi(PointerAction::Move, 0, &[(90.0, 100.0), (210.0, 115.0)]);

    assert_eq!(harness.state(1), Active);
    assert_eq!(harness.state(2), Active);
}
