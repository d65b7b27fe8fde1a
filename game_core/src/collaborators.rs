//! External services the core calls into: scene loading and character data.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use overworld::directory::collect_files_with_extension;
use overworld::{Character, DataError, WorldConfig};
use tracing::warn;

/// Loads scene assets. Treated as completing synchronously.
pub trait SceneLoader {
    fn load_scene(&mut self, name: &str);
}

/// Scene loader that only remembers what was requested.
#[derive(Debug, Clone, Default)]
pub struct RecordingSceneLoader {
    loaded: Rc<RefCell<Vec<String>>>,
}

impl RecordingSceneLoader {
    pub fn loaded(&self) -> Vec<String> {
        self.loaded.borrow().clone()
    }
}

impl SceneLoader for RecordingSceneLoader {
    fn load_scene(&mut self, name: &str) {
        self.loaded.borrow_mut().push(name.to_string());
    }
}

/// Source of character data for a scene.
pub trait CharacterDirectory {
    /// Character files that may have instances in `scene`.
    fn character_files(&self, scene: &str) -> Vec<PathBuf>;

    fn open(&self, path: &Path) -> Result<Character, DataError> {
        Character::load_from_path(path)
    }
}

/// Character files under `{characters_dir}/{scene}`, found recursively by
/// extension.
#[derive(Debug, Clone)]
pub struct FsCharacterDirectory {
    root: PathBuf,
    extension: String,
}

impl FsCharacterDirectory {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(config.characters_path(), config.character_extension.clone())
    }
}

impl CharacterDirectory for FsCharacterDirectory {
    fn character_files(&self, scene: &str) -> Vec<PathBuf> {
        let dir = self.root.join(scene);
        collect_files_with_extension(&dir, &self.extension).unwrap_or_else(|error| {
            warn!(scene, error = %error, "character_scan_failed");
            Vec::new()
        })
    }
}

/// Characters held in memory, addressed by synthetic paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryCharacterDirectory {
    scenes: BTreeMap<String, BTreeMap<PathBuf, Character>>,
}

impl MemoryCharacterDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, scene: impl Into<String>, character: Character) {
        let scene = scene.into();
        let path = PathBuf::from(&scene).join(format!("{}.json", character.name));
        self.scenes.entry(scene).or_default().insert(path, character);
    }
}

impl CharacterDirectory for MemoryCharacterDirectory {
    fn character_files(&self, scene: &str) -> Vec<PathBuf> {
        self.scenes
            .get(scene)
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn open(&self, path: &Path) -> Result<Character, DataError> {
        self.scenes
            .values()
            .find_map(|files| files.get(path))
            .cloned()
            .ok_or_else(|| DataError::Io {
                path: path.to_path_buf(),
                source: std::io::ErrorKind::NotFound.into(),
            })
    }
}
