//! Row height policy
//!
//! Maps a line and its successor to an integer pixel height. The rounded
//! difference gets a one pixel correction: rows taller than the separator
//! threshold give a pixel to the white separator line, shorter rows borrow
//! one. Adjacent rows can therefore disagree by a pixel; painted output
//! depends on this exact behavior, so it is kept as is.

use crate::config::MIN_HEIGHT_FOR_SEPARATOR_LINES;

/// Height of `line1` given the vertical scale, using the default separator threshold
pub fn rendering_height(scale_y: f64, line1: u32, line2: u32) -> i32 {
    rendering_height_with_threshold(scale_y, line1, line2, MIN_HEIGHT_FOR_SEPARATOR_LINES)
}

/// Height of `line1` given the vertical scale and separator threshold
pub fn rendering_height_with_threshold(
    scale_y: f64,
    line1: u32,
    line2: u32,
    threshold: f64,
) -> i32 {
    let h1 = (scale_y * line1 as f64).round() as i64;
    let h2 = (scale_y * line2 as f64).round() as i64;
    let height = (h2 - h1) as i32;

    if scale_y > threshold {
        height - 1
    } else {
        height + 1
    }
}
