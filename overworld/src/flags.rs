//! Story flags - global variables that scripted content reads and writes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::entities::InteractionId;

/// Flag value types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FlagValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

/// String-keyed flag store shared by activities and interaction links.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoryFlags {
    values: HashMap<String, FlagValue>,
}

impl StoryFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: FlagValue) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&FlagValue> {
        self.values.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<FlagValue> {
        self.values.remove(key)
    }

    /// True only for a flag explicitly set to `Bool(true)`.
    pub fn is_set(&self, key: &str) -> bool {
        matches!(self.values.get(key), Some(FlagValue::Bool(true)))
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        match self.values.get(key) {
            Some(FlagValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    /// Remember which option the player picked for a choice interaction.
    pub fn record_choice(&mut self, owner: &str, interaction: InteractionId, index: usize) {
        self.set(choice_key(owner, interaction), FlagValue::Int(index as i64));
    }

    /// The option picked for a choice interaction, if any.
    pub fn choice(&self, owner: &str, interaction: InteractionId) -> Option<usize> {
        self.int(&choice_key(owner, interaction))
            .and_then(|v| usize::try_from(v).ok())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn choice_key(owner: &str, interaction: InteractionId) -> String {
    format!("choice:{}:{}", owner, interaction)
}
