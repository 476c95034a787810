//! Utility functions for colors and geometry.
//!
//! This module provides:
//! - Name-to-color mapping used by the configuration file
//! - Clamping and translation helpers shared by shape mutations

use crate::draw::{Color, color::*};

// ============================================================================
// Geometry
// ============================================================================

/// Clamps a width, height or radius to `min`.
///
/// Non-finite input collapses to `min` so a bad gesture can never produce a
/// degenerate shape.
pub fn clamp_extent(value: f64, min: f64) -> f64 {
    if value.is_finite() { value.max(min) } else { min }
}

/// Moves both endpoints of a segment by the same offset.
pub fn translate_points(points: [f64; 4], dx: f64, dy: f64) -> [f64; 4] {
    [points[0] + dx, points[1] + dy, points[2] + dx, points[3] + dy]
}

/// Euclidean length of a segment given as `[x1, y1, x2, y2]`.
pub fn segment_length(points: [f64; 4]) -> f64 {
    let dx = points[2] - points[0];
    let dy = points[3] - points[1];
    (dx * dx + dy * dy).sqrt()
}

// ============================================================================
// Color Mapping
// ============================================================================

/// Maps color name strings to Color values.
///
/// Used by the configuration system to parse color names from the config file.
///
/// # Supported Names (case-insensitive)
/// - "red", "green", "blue", "yellow", "orange", "pink", "white", "black",
///   "transparent"
///
/// # Returns
/// - `Some(Color)` if the name matches a predefined color
/// - `None` if the name is not recognized
pub fn name_to_color(name: &str) -> Option<Color> {
    match name.to_lowercase().as_str() {
        "red" => Some(RED),
        "green" => Some(GREEN),
        "blue" => Some(BLUE),
        "yellow" => Some(YELLOW),
        "orange" => Some(ORANGE),
        "pink" => Some(PINK),
        "white" => Some(WHITE),
        "black" => Some(BLACK),
        "transparent" | "none" => Some(TRANSPARENT),
        _ => None,
    }
}

/// Parses `#rrggbb` or `#rrggbbaa` hex notation.
pub fn hex_to_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    if !digits.is_ascii() || !(digits.len() == 6 || digits.len() == 8) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();

    let mut color = Color::from_rgb8(channel(0)?, channel(2)?, channel(4)?);
    if digits.len() == 8 {
        color.a = channel(6)? as f64 / 255.0;
    }
    Some(color)
}
