//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;
pub mod mock_helpers;

use tracevis_rs::{Color, LineResult};

/// Assert two floats are approximately equal
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64) {
    assert!(
        (a - b).abs() < epsilon,
        "Expected {} to be approximately equal to {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}

/// Assert a published line is sorted, non-overlapping and inside `pixels` columns
pub fn assert_well_formed(result: &LineResult, pixels: u32) {
    assert!(
        result.is_well_formed(),
        "Line {} has malformed spans: {:?}",
        result.line,
        result.spans()
    );
    if let Some(last) = result.spans().last() {
        assert!(
            last.end <= pixels,
            "Line {} span {} runs past {} columns",
            result.line,
            last,
            pixels
        );
    }
}

/// Color used for call path `id` by the test classifiers
pub fn test_color(id: u32) -> Color {
    Color::rgb((id * 40) as u8, (id * 80) as u8, 200)
}
