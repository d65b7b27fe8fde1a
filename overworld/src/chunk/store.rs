//! Chunk stores - resolve `(scene, key)` to chunk data.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use super::{Chunk, ChunkKey};
use crate::config::WorldConfig;
use crate::error::DataError;

/// Read-only lookup of chunk data.
///
/// A missing chunk is not an error: the grid extends past authored content, so
/// `None` just means "nothing here".
pub trait ChunkStore: Send + Sync {
    fn get_chunk(&self, scene: &str, key: &ChunkKey) -> Option<Arc<Chunk>>;
}

/// Chunks held in memory, keyed by scene and chunk name.
#[derive(Debug, Clone, Default)]
pub struct MemoryChunkStore {
    chunks: HashMap<String, HashMap<ChunkKey, Arc<Chunk>>>,
}

impl MemoryChunkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a chunk to a scene, replacing any chunk with the same name.
    pub fn insert(&mut self, scene: impl Into<String>, chunk: Chunk) {
        self.chunks
            .entry(scene.into())
            .or_default()
            .insert(chunk.name.clone(), Arc::new(chunk));
    }

    /// Number of chunks stored for a scene.
    pub fn chunk_count(&self, scene: &str) -> usize {
        self.chunks.get(scene).map(HashMap::len).unwrap_or(0)
    }
}

impl ChunkStore for MemoryChunkStore {
    fn get_chunk(&self, scene: &str, key: &ChunkKey) -> Option<Arc<Chunk>> {
        self.chunks.get(scene)?.get(key).cloned()
    }
}

/// Chunks stored as JSON files at `{root}/{scene}/{name}/{name}.json`.
#[derive(Debug, Clone)]
pub struct DirectoryChunkStore {
    root: PathBuf,
}

impl DirectoryChunkStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store rooted at the configured chunks directory.
    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(config.chunks_path())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of a chunk file.
    pub fn chunk_path(&self, scene: &str, key: &ChunkKey) -> PathBuf {
        self.root
            .join(scene)
            .join(key.as_str())
            .join(format!("{}.json", key))
    }

    fn read_chunk(&self, path: &Path) -> Result<Chunk, DataError> {
        let text = fs::read_to_string(path).map_err(|source| DataError::io(path, source))?;
        serde_json::from_str(&text).map_err(|source| DataError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl ChunkStore for DirectoryChunkStore {
    fn get_chunk(&self, scene: &str, key: &ChunkKey) -> Option<Arc<Chunk>> {
        let path = self.chunk_path(scene, key);
        match self.read_chunk(&path) {
            Ok(chunk) => Some(Arc::new(chunk)),
            Err(error) if error.is_not_found() => {
                debug!(scene, chunk = %key, "chunk_absent");
                None
            }
            Err(error) => {
                warn!(scene, chunk = %key, error = %error, "chunk_unreadable");
                None
            }
        }
    }
}
