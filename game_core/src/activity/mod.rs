//! Activities - schedulable units of scripted behavior.
//!
//! An activity is started once when it reaches the head of the queue, then
//! updated every frame until it reports [`ActivityStatus::Complete`].

mod dialog;
mod scheduler;
mod wait;

pub use dialog::*;
pub use scheduler::*;
pub use wait::*;

use std::time::Duration;

use overworld::StoryFlags;

use crate::ui::UiPanels;

/// What the host read from input this frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    /// Time since the previous frame.
    pub delta: Duration,
    /// The confirm/advance button was pressed.
    pub confirm: bool,
    /// A dialog option was picked.
    pub choice: Option<usize>,
}

impl FrameInput {
    pub fn idle(delta: Duration) -> Self {
        Self {
            delta,
            ..Default::default()
        }
    }

    pub fn confirm() -> Self {
        Self {
            confirm: true,
            ..Default::default()
        }
    }

    pub fn choose(index: usize) -> Self {
        Self {
            choice: Some(index),
            ..Default::default()
        }
    }
}

/// Result of one activity update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityStatus {
    Running,
    Complete,
}

/// A unit of scripted behavior.
pub trait Activity {
    /// Short name used in logs.
    fn label(&self) -> &str;

    /// Whether the player may move while this is the current activity.
    fn allows_control(&self) -> bool;

    /// Return to the pre-start state. Called on every enqueue.
    fn reset(&mut self) {}

    fn start(&mut self, ctx: &mut ActivityContext<'_>);

    fn update(&mut self, ctx: &mut ActivityContext<'_>) -> ActivityStatus;
}

/// What an activity can touch while it runs.
pub struct ActivityContext<'a> {
    pub input: &'a FrameInput,
    pub ui: &'a mut UiPanels,
    pub flags: &'a mut StoryFlags,
    entries: &'a mut EntryQueue,
}

impl<'a> ActivityContext<'a> {
    pub(crate) fn new(
        input: &'a FrameInput,
        ui: &'a mut UiPanels,
        flags: &'a mut StoryFlags,
        entries: &'a mut EntryQueue,
    ) -> Self {
        Self {
            input,
            ui,
            flags,
            entries,
        }
    }

    /// Queue a follow-up activity. It joins the live queue at the next commit.
    pub fn enqueue(&mut self, activity: Box<dyn Activity>) {
        self.entries.push(activity);
    }
}
