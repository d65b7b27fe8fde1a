//! Interaction chains - continue a dialog/cutscene once the queue drains.

use std::sync::Arc;
use std::time::Duration;

use overworld::{Character, CharacterInstance, Interaction, InteractionId, InteractionKind, StoryFlags};
use tracing::{debug, warn};

use crate::activity::{Activity, ActivityScheduler, DialogActivity, WaitActivity};

/// Build the activity that plays `interaction` for `interactor`.
pub fn activity_for(
    interactor: &Character,
    instance: &CharacterInstance,
    interaction: &Interaction,
) -> Box<dyn Activity> {
    match &interaction.kind {
        InteractionKind::Dialog { lines } => Box::new(
            DialogActivity::new(interactor.name.clone(), interaction.id, lines.clone())
                .with_choices(interaction.choice_labels())
                .with_allows_control(interaction.allows_control),
        ),
        InteractionKind::Pause { seconds } => Box::new(
            WaitActivity::new(
                format!("pause:{}:{}:{}", interactor.name, instance.id, interaction.id),
                pause_duration(*seconds),
            )
            .with_allows_control(interaction.allows_control),
        ),
    }
}

/// Authored pause length. Negative or NaN is no pause; anything too long for a
/// `Duration` waits forever.
fn pause_duration(seconds: f32) -> Duration {
    Duration::try_from_secs_f32(seconds.max(0.0)).unwrap_or(Duration::MAX)
}

/// The interaction currently being played.
#[derive(Debug, Clone)]
pub struct InteractionContext {
    pub interactor: Arc<Character>,
    pub instance: CharacterInstance,
    pub interaction: InteractionId,
}

/// Outcome of [`InteractionChain::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainStep {
    /// Nothing to do: activities still queued or no interaction active.
    Idle,
    /// The chain continued into this interaction.
    Continued(InteractionId),
    /// The chain ended and the context was cleared.
    Finished,
}

#[derive(Debug, Clone, Default)]
pub struct InteractionChain {
    current: Option<InteractionContext>,
}

impl InteractionChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `interaction` the active context without queueing anything.
    pub fn process(
        &mut self,
        interactor: Arc<Character>,
        instance: CharacterInstance,
        interaction: InteractionId,
    ) {
        self.current = Some(InteractionContext {
            interactor,
            instance,
            interaction,
        });
    }

    /// Activate `interaction` and queue its activity.
    ///
    /// Returns false if the interactor has no such interaction.
    pub fn begin(
        &mut self,
        interactor: Arc<Character>,
        instance: CharacterInstance,
        interaction: InteractionId,
        scheduler: &mut ActivityScheduler,
    ) -> bool {
        let Some(node) = interactor.interaction(interaction) else {
            warn!(character = %interactor.name, interaction = %interaction, "interaction_missing");
            return false;
        };
        scheduler.enqueue(activity_for(&interactor, &instance, node));
        self.process(interactor, instance, interaction);
        true
    }

    pub fn current(&self) -> Option<&InteractionContext> {
        self.current.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Continue the chain if the scheduler has drained.
    ///
    /// A branch that itself queues nested activities may need several frames
    /// before the queue is empty again; that is expected.
    pub fn resolve(&mut self, scheduler: &mut ActivityScheduler, flags: &StoryFlags) -> ChainStep {
        if scheduler.has_activity() || scheduler.pending_len() > 0 {
            return ChainStep::Idle;
        }
        let Some(context) = self.current.as_mut() else {
            return ChainStep::Idle;
        };

        let interactor = Arc::clone(&context.interactor);
        let next_id = match interactor.interaction(context.interaction) {
            Some(current) => current.next_interaction_id(&interactor.name, flags),
            None => {
                warn!(character = %interactor.name, interaction = %context.interaction, "interaction_missing");
                InteractionId::NONE
            }
        };

        if next_id.is_none() {
            debug!(character = %interactor.name, "interaction_chain_finished");
            self.current = None;
            return ChainStep::Finished;
        }

        let Some(next) = interactor.interaction(next_id) else {
            warn!(character = %interactor.name, interaction = %next_id, "interaction_missing");
            self.current = None;
            return ChainStep::Finished;
        };

        scheduler.enqueue(activity_for(&interactor, &context.instance, next));
        context.interaction = next_id;
        debug!(character = %interactor.name, interaction = %next_id, "interaction_chain_continued");
        ChainStep::Continued(next_id)
    }
}
