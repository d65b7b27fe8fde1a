//! Runtime configuration loaded from TOML.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Layout of world data on disk and the chunk grid dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width of one chunk in tiles.
    pub chunk_width: i32,
    /// Height of one chunk in tiles.
    pub chunk_height: i32,

    /// Root of the external data directory.
    pub data_root: PathBuf,
    /// Chunk files, relative to `data_root`.
    pub chunks_dir: PathBuf,
    /// Per-scene character trees, relative to `data_root`.
    pub characters_dir: PathBuf,
    /// Scratch chunk-layer directory, relative to `data_root`. Emptied on startup.
    pub temp_chunk_layer_dir: PathBuf,
    /// Extension (without the dot) of character data files.
    pub character_extension: String,

    /// Scene the controller starts in.
    pub initial_scene: String,
    /// Scene loaded when a new game starts.
    pub intro_scene: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_width: 32,
            chunk_height: 32,
            data_root: PathBuf::from("data"),
            chunks_dir: PathBuf::from("Chunks"),
            characters_dir: PathBuf::from("Characters"),
            temp_chunk_layer_dir: PathBuf::from("ChunksTemp"),
            character_extension: "json".to_string(),
            initial_scene: "Title".to_string(),
            intro_scene: "Intro".to_string(),
        }
    }
}

impl WorldConfig {
    /// Parse a config from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Use a different data root, keeping everything else.
    pub fn with_data_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.data_root = root.into();
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_width <= 0 || self.chunk_height <= 0 {
            return Err(ConfigError::InvalidChunkSize {
                width: self.chunk_width,
                height: self.chunk_height,
            });
        }
        Ok(())
    }

    pub fn chunks_path(&self) -> PathBuf {
        self.data_root.join(&self.chunks_dir)
    }

    pub fn characters_path(&self) -> PathBuf {
        self.data_root.join(&self.characters_dir)
    }

    pub fn temp_chunk_layer_path(&self) -> PathBuf {
        self.data_root.join(&self.temp_chunk_layer_dir)
    }
}
