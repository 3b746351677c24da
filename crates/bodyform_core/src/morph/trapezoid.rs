//! Trapezoid lookup surface
//!
//! Hand-authored approximation of how far the trapezius shape key should be
//! pushed for a given shoulder width, shoulder height and neck width. It is
//! a table, not a formula: inputs are banded by shoulder height (exactly 0,
//! ~0.5, ~1.0), then by neck width (<= 0.5, <= 0.75, <= 1.0), then by
//! shoulder width (<= 0.25, <= 0.5, <= 0.75, <= 1.0).

use tracing::trace;

/// Tolerance for the 0.5 and 1.0 shoulder-height bands.
const HEIGHT_TOLERANCE: f32 = 0.01;

const NECK_WIDTH_BOUNDS: [f32; 3] = [0.5, 0.75, 1.0];
const SHOULDER_WIDTH_BOUNDS: [f32; 4] = [0.25, 0.5, 0.75, 1.0];

/// `SURFACE[height band][neck band][shoulder band]`
const SURFACE: [[[f32; 4]; 3]; 3] = [
    // shoulderHeight == 0.0
    [
        [0.75, 0.625, 0.5, 0.375],
        [1.0, 0.875, 0.75, 0.625],
        [1.0, 1.0, 0.875, 0.75],
    ],
    // shoulderHeight ~ 0.5
    [
        [0.75, 0.625, 0.5, 0.5],
        [0.875, 0.75, 0.625, 0.5],
        [1.0, 0.875, 0.75, 0.625],
    ],
    // shoulderHeight ~ 1.0
    [
        [0.625, 0.5, 0.25, 0.125],
        [0.75, 0.625, 0.5, 0.375],
        [0.875, 0.75, 0.625, 0.5],
    ],
];

fn height_band(shoulder_height: f32) -> Option<usize> {
    if shoulder_height == 0.0 {
        Some(0)
    } else if (shoulder_height - 0.5).abs() <= HEIGHT_TOLERANCE {
        Some(1)
    } else if (shoulder_height - 1.0).abs() <= HEIGHT_TOLERANCE {
        Some(2)
    } else {
        None
    }
}

fn upper_band(bounds: &[f32], value: f32) -> Option<usize> {
    bounds.iter().position(|&upper| value <= upper)
}

/// Surface value, or `None` when the inputs fall outside every band.
pub fn trapezoid_lookup(shoulder_width: f32, shoulder_height: f32, neck_width: f32) -> Option<f32> {
    let height = height_band(shoulder_height)?;
    let neck = upper_band(&NECK_WIDTH_BOUNDS, neck_width)?;
    let shoulder = upper_band(&SHOULDER_WIDTH_BOUNDS, shoulder_width)?;
    Some(SURFACE[height][neck][shoulder])
}

/// Trapezoid weight; out-of-band inputs read as 0.
pub fn trapezoid(shoulder_width: f32, shoulder_height: f32, neck_width: f32) -> f32 {
    trapezoid_lookup(shoulder_width, shoulder_height, neck_width).unwrap_or_else(|| {
        trace!(shoulder_width, shoulder_height, neck_width, "trapezoid inputs out of band");
        0.0
    })
}
