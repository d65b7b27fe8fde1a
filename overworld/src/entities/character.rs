//! Character definitions and their placed instances.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::{EntityId, Interaction, InteractionId};
use crate::error::DataError;
use crate::position::WorldPosition;

/// A character definition: who they are and what talking to them does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,

    /// Interaction table, looked up by [`InteractionId`].
    #[serde(default)]
    pub interactions: Vec<Interaction>,

    /// Every placement of this character, across all scenes.
    #[serde(default)]
    pub instances: Vec<CharacterInstance>,
}

/// One placement of a character in a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterInstance {
    #[serde(default)]
    pub id: EntityId,
    /// Name of the owning [`Character`]. Filled in on load.
    #[serde(default)]
    pub character: String,
    pub scene: String,
    pub position: WorldPosition,
    #[serde(default)]
    pub elevation: i32,
    /// Interaction that starts when the player talks to this instance.
    #[serde(default)]
    pub initial_interaction: Option<InteractionId>,
}

impl CharacterInstance {
    pub fn new(scene: impl Into<String>, position: WorldPosition) -> Self {
        Self {
            id: EntityId::new(),
            character: String::new(),
            scene: scene.into(),
            position,
            elevation: 0,
            initial_interaction: None,
        }
    }
}

impl Character {
    /// Create a new character with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            interactions: Vec::new(),
            instances: Vec::new(),
        }
    }

    pub fn with_interaction(mut self, interaction: Interaction) -> Self {
        self.interactions.push(interaction);
        self
    }

    pub fn with_instance(mut self, mut instance: CharacterInstance) -> Self {
        instance.character = self.name.clone();
        self.instances.push(instance);
        self
    }

    /// Read a character from a JSON data file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| DataError::io(path, source))?;
        let mut character: Character =
            serde_json::from_str(&text).map_err(|source| DataError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        for instance in &mut character.instances {
            instance.character = character.name.clone();
        }
        Ok(character)
    }

    /// Look up an interaction by ID.
    pub fn interaction(&self, id: InteractionId) -> Option<&Interaction> {
        self.interactions.iter().find(|i| i.id == id)
    }

    /// The instances that belong in `scene`, ready to be placed.
    ///
    /// Empty when the character doesn't appear there.
    pub fn attempt_load(&self, scene: &str) -> Vec<CharacterInstance> {
        self.instances
            .iter()
            .filter(|instance| instance.scene == scene)
            .cloned()
            .collect()
    }
}
