//! Active chunk renderers, keyed by chunk name.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use overworld::{Chunk, ChunkKey, TileInstance, TileLayer};
use tracing::debug;

/// Key of the renderer that hosts the player.
pub const PLAYER_RENDERER: &str = "Player";

/// The live, in-world representation of a chunk.
#[derive(Debug, Clone)]
pub struct ChunkRenderer {
    key: ChunkKey,
    chunk: Arc<Chunk>,
    /// Tile position -> indices into `chunk.tiles`.
    tiles_by_position: HashMap<(i32, i32), Vec<usize>>,
    hosts_player: bool,
    visible: bool,
}

impl ChunkRenderer {
    pub fn new(key: ChunkKey, chunk: Arc<Chunk>) -> Self {
        let mut tiles_by_position: HashMap<(i32, i32), Vec<usize>> = HashMap::new();
        for (index, tile) in chunk.tiles.iter().enumerate() {
            tiles_by_position.entry((tile.x, tile.y)).or_default().push(index);
        }
        Self {
            key,
            chunk,
            tiles_by_position,
            hosts_player: false,
            visible: true,
        }
    }

    /// The renderer carrying the player sprite. Streaming never destroys it.
    pub fn for_player() -> Self {
        let key = ChunkKey::named(PLAYER_RENDERER);
        let mut renderer = Self::new(key.clone(), Arc::new(Chunk::new(key)));
        renderer.hosts_player = true;
        renderer
    }

    pub fn key(&self) -> &ChunkKey {
        &self.key
    }

    pub fn chunk(&self) -> &Chunk {
        &self.chunk
    }

    pub fn hosts_player(&self) -> bool {
        self.hosts_player
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visibility(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Tiles placed at `(x, y)` in this chunk.
    pub fn tile_instances_at(&self, x: i32, y: i32) -> impl Iterator<Item = &TileInstance> {
        self.tiles_by_position
            .get(&(x, y))
            .into_iter()
            .flatten()
            .filter_map(|index| self.chunk.tiles.get(*index))
    }
}

/// Every active renderer.
#[derive(Debug, Clone, Default)]
pub struct ChunkRegistry {
    renderers: BTreeMap<ChunkKey, ChunkRenderer>,
}

impl ChunkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a renderer, returning any renderer it replaced.
    pub fn register(&mut self, renderer: ChunkRenderer) -> Option<ChunkRenderer> {
        self.renderers.insert(renderer.key.clone(), renderer)
    }

    pub fn get(&self, key: &str) -> Option<&ChunkRenderer> {
        self.renderers.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.renderers.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    pub fn player_renderer_mut(&mut self) -> Option<&mut ChunkRenderer> {
        self.renderers.values_mut().find(|r| r.hosts_player)
    }

    /// Keys of resident chunk renderers, excluding the player's.
    pub fn chunk_keys(&self) -> Vec<ChunkKey> {
        self.renderers
            .values()
            .filter(|r| !r.hosts_player)
            .map(|r| r.key.clone())
            .collect()
    }

    /// Destroy every renderer except the player's. Returns the destroyed keys.
    pub fn destroy_all_except_player(&mut self) -> Vec<ChunkKey> {
        let doomed = self.chunk_keys();
        for key in &doomed {
            self.renderers.remove(key);
        }
        debug!(count = doomed.len(), "chunk_renderers_cleared");
        doomed
    }

    /// Diff against the wanted keys.
    ///
    /// Resident renderers not in `wanted` are destroyed (the player's is kept),
    /// and resident keys are removed from `wanted`, leaving only the chunks
    /// still to load. Returns the destroyed keys.
    pub fn retain_wanted(&mut self, wanted: &mut Vec<ChunkKey>) -> Vec<ChunkKey> {
        let wanted_set: HashSet<&ChunkKey> = wanted.iter().collect();
        let doomed: Vec<ChunkKey> = self
            .renderers
            .values()
            .filter(|r| !r.hosts_player && !wanted_set.contains(&r.key))
            .map(|r| r.key.clone())
            .collect();

        for key in &doomed {
            self.renderers.remove(key);
        }
        wanted.retain(|key| !self.renderers.contains_key(key));
        doomed
    }

    /// Tiles at a position across every active renderer.
    pub fn tile_instances_at(&self, x: i32, y: i32) -> Vec<&TileInstance> {
        self.renderers
            .values()
            .flat_map(|r| r.tile_instances_at(x, y))
            .collect()
    }

    /// Terrain tiles at a position and elevation. Character body tiles are
    /// excluded.
    pub fn tile_instances_at_elevation(&self, x: i32, y: i32, elevation: i32) -> Vec<&TileInstance> {
        self.tile_instances_at(x, y)
            .into_iter()
            .filter(|t| t.layer != TileLayer::CharacterBody && t.elevation == elevation)
            .collect()
    }
}
