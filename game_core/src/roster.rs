//! Characters placed in the current scene.

use std::collections::BTreeMap;
use std::sync::Arc;

use overworld::{Character, CharacterInstance};

#[derive(Debug, Clone, Default)]
pub struct CharacterRoster {
    characters: BTreeMap<String, Arc<Character>>,
    instances: Vec<CharacterInstance>,
}

impl CharacterRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place every instance of `character` that belongs in `scene`.
    ///
    /// Returns how many instances were placed. A character with nothing in the
    /// scene is not kept.
    pub fn attempt_load(&mut self, character: Character, scene: &str) -> usize {
        let placed = character.attempt_load(scene);
        if placed.is_empty() {
            return 0;
        }
        let count = placed.len();
        self.instances
            .retain(|instance| instance.character != character.name);
        self.instances.extend(placed);
        self.characters
            .insert(character.name.clone(), Arc::new(character));
        count
    }

    pub fn character(&self, name: &str) -> Option<&Arc<Character>> {
        self.characters.get(name)
    }

    /// First placed instance of the named character.
    pub fn find_instance(&self, name: &str) -> Option<&CharacterInstance> {
        self.instances.iter().find(|instance| instance.character == name)
    }

    pub fn instances(&self) -> &[CharacterInstance] {
        &self.instances
    }

    pub fn character_count(&self) -> usize {
        self.characters.len()
    }

    pub fn clear(&mut self) {
        self.characters.clear();
        self.instances.clear();
    }
}
