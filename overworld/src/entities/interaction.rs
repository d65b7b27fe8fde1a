//! Interactions - nodes of a branching dialog/cutscene graph.

use serde::{Deserialize, Serialize};

use crate::flags::StoryFlags;

/// Identifier of an interaction within its character's table.
///
/// Data files use `-1` for "no interaction"; [`InteractionId::NONE`] is that
/// sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InteractionId(pub i32);

impl InteractionId {
    /// Terminates a chain.
    pub const NONE: InteractionId = InteractionId(-1);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

impl std::fmt::Display for InteractionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What running an interaction does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    /// Lines of dialog shown one at a time.
    Dialog { lines: Vec<String> },
    /// Hold for a fixed time, e.g. a beat in a cutscene.
    Pause { seconds: f32 },
}

/// One selectable answer of a choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub label: String,
    pub next: InteractionId,
}

/// Where the chain goes after an interaction finishes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionLink {
    #[default]
    End,
    Goto(InteractionId),
    /// Follows whichever option the player picked.
    Choice(Vec<ChoiceOption>),
}

/// A single interaction node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: InteractionId,
    pub kind: InteractionKind,
    #[serde(default)]
    pub next: InteractionLink,
    /// Whether the player can move while this interaction runs.
    #[serde(default)]
    pub allows_control: bool,
}

impl Interaction {
    pub fn dialog(id: i32, lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            id: InteractionId(id),
            kind: InteractionKind::Dialog {
                lines: lines.into_iter().map(Into::into).collect(),
            },
            next: InteractionLink::End,
            allows_control: false,
        }
    }

    pub fn pause(id: i32, seconds: f32) -> Self {
        Self {
            id: InteractionId(id),
            kind: InteractionKind::Pause { seconds },
            next: InteractionLink::End,
            allows_control: false,
        }
    }

    pub fn then(mut self, next: i32) -> Self {
        self.next = InteractionLink::Goto(InteractionId(next));
        self
    }

    pub fn with_choices(mut self, options: impl IntoIterator<Item = (&'static str, i32)>) -> Self {
        self.next = InteractionLink::Choice(
            options
                .into_iter()
                .map(|(label, next)| ChoiceOption {
                    label: label.to_string(),
                    next: InteractionId(next),
                })
                .collect(),
        );
        self
    }

    pub fn with_allows_control(mut self, allows: bool) -> Self {
        self.allows_control = allows;
        self
    }

    /// Labels of the choice options, empty unless the link is a choice.
    pub fn choice_labels(&self) -> Vec<String> {
        match &self.next {
            InteractionLink::Choice(options) => options.iter().map(|o| o.label.clone()).collect(),
            _ => Vec::new(),
        }
    }

    /// Identifier of the interaction that follows this one, or
    /// [`InteractionId::NONE`] when the chain ends here.
    ///
    /// A choice resolves to the option recorded in `flags` for this
    /// interaction of `owner`; no recorded pick, or a pick out of range, ends
    /// the chain.
    pub fn next_interaction_id(&self, owner: &str, flags: &StoryFlags) -> InteractionId {
        match &self.next {
            InteractionLink::End => InteractionId::NONE,
            InteractionLink::Goto(id) => *id,
            InteractionLink::Choice(options) => flags
                .choice(owner, self.id)
                .and_then(|index| options.get(index))
                .map(|option| option.next)
                .unwrap_or(InteractionId::NONE),
        }
    }
}
