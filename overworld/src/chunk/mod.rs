//! Chunk definitions - immutable descriptions of one cell of the world grid.

mod store;

pub use store::*;

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Coordinate-derived name of a chunk, e.g. `"-32,64"`.
///
/// The coordinates are the world-space origin of the cell, so they are always
/// multiples of the chunk size.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChunkKey(String);

impl ChunkKey {
    /// Key for the chunk whose origin is `(x, y)`.
    pub fn from_origin(x: i32, y: i32) -> Self {
        Self(format!("{},{}", x, y))
    }

    /// A key that is not a grid coordinate (e.g. the player's own renderer).
    pub fn named(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the origin back out of a coordinate key.
    pub fn origin(&self) -> Option<(i32, i32)> {
        let (x, y) = self.0.split_once(',')?;
        Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
    }
}

impl Borrow<str> for ChunkKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChunkKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Render layer of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileLayer {
    #[default]
    Ground,
    Main,
    /// Tiles that make up a character sprite. Never part of terrain queries.
    CharacterBody,
    Overhead,
}

/// One placed tile inside a chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileInstance {
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub elevation: i32,
    #[serde(default)]
    pub layer: TileLayer,
    /// Name of the tile template this instance was placed from.
    pub template: String,
}

impl TileInstance {
    pub fn new(x: i32, y: i32, template: impl Into<String>) -> Self {
        Self {
            x,
            y,
            elevation: 0,
            layer: TileLayer::Ground,
            template: template.into(),
        }
    }

    pub fn with_elevation(mut self, elevation: i32) -> Self {
        self.elevation = elevation;
        self
    }

    pub fn with_layer(mut self, layer: TileLayer) -> Self {
        self.layer = layer;
        self
    }
}

/// A named cell of world geography and the tiles placed in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub name: ChunkKey,
    #[serde(default)]
    pub tiles: Vec<TileInstance>,
}

impl Chunk {
    pub fn new(name: ChunkKey) -> Self {
        Self {
            name,
            tiles: Vec::new(),
        }
    }

    pub fn with_tile(mut self, tile: TileInstance) -> Self {
        self.tiles.push(tile);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_format() {
        assert_eq!(ChunkKey::from_origin(-32, 64).as_str(), "-32,64");
        assert_eq!(ChunkKey::from_origin(0, 0).to_string(), "0,0");
    }

    #[test]
    fn test_key_origin() {
        assert_eq!(ChunkKey::from_origin(-32, 64).origin(), Some((-32, 64)));
        assert_eq!(ChunkKey::named("Player").origin(), None);
    }

    #[test]
    fn test_chunk_json_defaults() {
        let chunk: Chunk = serde_json::from_str(
            r#"{ "name": "0,32", "tiles": [ { "x": 1, "y": 33, "template": "sand" } ] }"#,
        )
        .unwrap();

        assert_eq!(chunk.name, ChunkKey::from_origin(0, 32));
        assert_eq!(chunk.tiles[0].layer, TileLayer::Ground);
        assert_eq!(chunk.tiles[0].elevation, 0);
    }
}
