//! Chunk streaming - keep the 3×3 neighborhood around a focus resident.
//!
//! A streaming pass works in four steps:
//! 1. **Anchor**: floor the focus to the chunk grid
//! 2. **Want**: enumerate the nine keys around the anchor
//! 3. **Diff**: keep resident wanted chunks, destroy resident unwanted ones
//! 4. **Load**: resolve the rest through the chunk store and build one renderer
//!    per frame

mod pass;
mod registry;

pub use pass::*;
pub use registry::*;

use overworld::{ChunkKey, WorldPosition};
use serde::{Deserialize, Serialize};

/// Keys of the 3×3 chunk neighborhood around `focus`.
///
/// Ordered by x offset, then y offset, each from -1 to 1. Chunks load in this
/// order. At the edge of the `i32` grid neighbors clamp onto the edge cell, so
/// fewer than nine distinct keys come back.
pub fn wanted_chunk_keys(focus: WorldPosition, chunk_width: i32, chunk_height: i32) -> Vec<ChunkKey> {
    let (anchor_x, anchor_y) = focus.floor_to_chunk(chunk_width, chunk_height);
    let mut keys = Vec::with_capacity(9);
    for i in -1..=1 {
        for j in -1..=1 {
            let key = ChunkKey::from_origin(
                anchor_x.saturating_add(i * chunk_width),
                anchor_y.saturating_add(j * chunk_height),
            );
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
    }
    keys
}

/// How a streaming pass should behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreamingRequest {
    /// Tear down the previous scene, load the new one, and place its characters.
    pub change_scene: bool,
    /// Drive the progress panel and lock player control for the pass.
    pub show_progress: bool,
}

impl StreamingRequest {
    /// Entering a scene (or re-entering it) from a menu or warp.
    pub fn scene_entry(change_scene: bool) -> Self {
        Self {
            change_scene,
            show_progress: true,
        }
    }

    /// Quiet refresh while the player walks.
    pub fn background() -> Self {
        Self::default()
    }
}
