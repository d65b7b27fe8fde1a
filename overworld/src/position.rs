//! World positions and chunk-grid arithmetic.

use serde::{Deserialize, Serialize};

/// A position in world units (one unit per tile).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPosition {
    pub x: f32,
    pub y: f32,
}

impl WorldPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Floor each axis to the nearest lower multiple of the chunk size.
    ///
    /// The result is the origin of the chunk cell containing this position, so
    /// every position inside one cell maps to the same anchor.
    pub fn floor_to_chunk(&self, chunk_width: i32, chunk_height: i32) -> (i32, i32) {
        (
            floor_to_multiple(self.x, chunk_width),
            floor_to_multiple(self.y, chunk_height),
        )
    }

    /// The tile this position falls on, rounding each axis.
    pub fn tile(&self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }
}

/// Floor `value` to the nearest multiple of `multiple` at or below it.
///
/// Results outside `i32` clamp to `i32::MIN`/`i32::MAX`; NaN maps to 0.
pub fn floor_to_multiple(value: f32, multiple: i32) -> i32 {
    let m = multiple as f32;
    ((value / m).floor() * m) as i32
}
