//! Assertion utilities for adapter tests
//!
//! Sizes flow through floating point arithmetic, so these helpers compare
//! with an explicit tolerance and report which dimension diverged.

use cranpose_adapter::Component;
use cranpose_ui_graphics::Size;

/// Assert that a value is within an expected range.
pub fn assert_approx_eq(actual: f32, expected: f32, tolerance: f32, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{}: expected {} (±{}), got {} (diff: {})",
        msg,
        expected,
        tolerance,
        actual,
        diff
    );
}

/// Assert that a size is approximately equal to another.
pub fn assert_size_approx_eq(actual: Size, expected: Size, tolerance: f32, msg: &str) {
    assert_approx_eq(
        actual.width,
        expected.width,
        tolerance,
        &format!("{} - width", msg),
    );
    assert_approx_eq(
        actual.height,
        expected.height,
        tolerance,
        &format!("{} - height", msg),
    );
}

/// Assert that every item's index matches its position in the component.
pub fn assert_item_indices<P>(component: &Component<P>, msg: &str) {
    for (position, item) in component.items().iter().enumerate() {
        assert_eq!(
            item.index(),
            position,
            "{}: item at position {} carries index {}",
            msg,
            position,
            item.index()
        );
    }
}
