//! Entity definitions: characters, their placed instances, and interactions.

mod character;
mod interaction;

pub use character::*;
pub use interaction::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of one placed character instance. Generated fresh when an
/// instance file omits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
