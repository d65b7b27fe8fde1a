//! The activity scheduler - a FIFO of activities with buffered entry.
//!
//! Enqueued activities land in an entry buffer and only join the live queue at
//! [`ActivityScheduler::commit`]. An activity that enqueues more work during
//! its own update therefore never changes the queue being ticked.

use std::collections::VecDeque;

use overworld::StoryFlags;
use tracing::debug;

use super::{Activity, ActivityContext, ActivityStatus, FrameInput};
use crate::ui::UiPanels;

/// An activity plus the lifecycle bits the scheduler tracks for it.
pub(crate) struct Scheduled {
    activity: Box<dyn Activity>,
    started: bool,
    complete: bool,
}

/// Activities enqueued since the last commit.
#[derive(Default)]
pub(crate) struct EntryQueue(Vec<Scheduled>);

impl EntryQueue {
    pub(crate) fn push(&mut self, mut activity: Box<dyn Activity>) {
        activity.reset();
        debug!(activity = activity.label(), "activity_enqueued");
        self.0.push(Scheduled {
            activity,
            started: false,
            complete: false,
        });
    }
}

/// Lifecycle flags of the current activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityState {
    pub started: bool,
    pub complete: bool,
}

#[derive(Default)]
pub struct ActivityScheduler {
    entries: EntryQueue,
    live: VecDeque<Scheduled>,
    control_disabled_override: bool,
}

impl ActivityScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset `activity` and buffer it until the next commit.
    pub fn enqueue(&mut self, activity: Box<dyn Activity>) {
        self.entries.push(activity);
    }

    /// Head of the live queue.
    pub fn current_activity(&self) -> Option<&dyn Activity> {
        self.live.front().map(|s| s.activity.as_ref())
    }

    /// The activity after the current one.
    pub fn next_activity(&self) -> Option<&dyn Activity> {
        self.live.get(1).map(|s| s.activity.as_ref())
    }

    pub fn current_state(&self) -> Option<ActivityState> {
        self.live.front().map(|s| ActivityState {
            started: s.started,
            complete: s.complete,
        })
    }

    /// Whether the live queue holds anything.
    pub fn has_activity(&self) -> bool {
        !self.live.is_empty()
    }

    pub fn live_len(&self) -> usize {
        self.live.len()
    }

    /// Activities waiting for the next commit.
    pub fn pending_len(&self) -> usize {
        self.entries.0.len()
    }

    /// Start the current activity if needed, then update it.
    pub fn tick(&mut self, input: &FrameInput, ui: &mut UiPanels, flags: &mut StoryFlags) {
        let Some(head) = self.live.front_mut() else {
            return;
        };
        let mut ctx = ActivityContext::new(input, ui, flags, &mut self.entries);

        if !head.started {
            head.started = true;
            debug!(activity = head.activity.label(), "activity_started");
            head.activity.start(&mut ctx);
        }

        if head.activity.update(&mut ctx) == ActivityStatus::Complete {
            head.complete = true;
        }
    }

    /// Merge buffered entries into the live queue and retire a completed head.
    ///
    /// Returns the retired activity, if any.
    pub fn commit(&mut self) -> Option<Box<dyn Activity>> {
        self.live.extend(self.entries.0.drain(..));

        if self.live.front().is_some_and(|s| s.complete) {
            let retired = self.live.pop_front()?;
            debug!(activity = retired.activity.label(), "activity_retired");
            return Some(retired.activity);
        }
        None
    }

    /// Latch that suppresses player control regardless of the queue.
    pub fn set_control_disabled(&mut self, disabled: bool) {
        self.control_disabled_override = disabled;
    }

    pub fn is_control_disabled_override(&self) -> bool {
        self.control_disabled_override
    }

    /// Whether player input should be accepted.
    ///
    /// False while the override latch is set. Otherwise the current activity
    /// decides, and an idle queue allows control.
    pub fn control_enabled(&self) -> bool {
        if self.control_disabled_override {
            return false;
        }
        self.current_activity()
            .map(|activity| activity.allows_control())
            .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    /// Completes after a fixed number of updates and logs its lifecycle.
    struct Scripted {
        name: String,
        updates_needed: u32,
        updates: u32,
        allows_control: bool,
        spawn: Option<Box<dyn Activity>>,
        log: Log,
    }

    impl Scripted {
        fn new(name: &str, updates_needed: u32, log: &Log) -> Self {
            Self {
                name: name.to_string(),
                updates_needed,
                updates: 0,
                allows_control: false,
                spawn: None,
                log: log.clone(),
            }
        }

        fn allowing_control(mut self) -> Self {
            self.allows_control = true;
            self
        }

        fn spawning(mut self, activity: Scripted) -> Self {
            self.spawn = Some(Box::new(activity));
            self
        }
    }

    impl Activity for Scripted {
        fn label(&self) -> &str {
            &self.name
        }

        fn allows_control(&self) -> bool {
            self.allows_control
        }

        fn reset(&mut self) {
            self.updates = 0;
            self.log.borrow_mut().push(format!("reset {}", self.name));
        }

        fn start(&mut self, ctx: &mut ActivityContext<'_>) {
            self.log.borrow_mut().push(format!("start {}", self.name));
            if let Some(child) = self.spawn.take() {
                ctx.enqueue(child);
            }
        }

        fn update(&mut self, _ctx: &mut ActivityContext<'_>) -> ActivityStatus {
            self.updates += 1;
            self.log.borrow_mut().push(format!("update {}", self.name));
            if self.updates >= self.updates_needed {
                ActivityStatus::Complete
            } else {
                ActivityStatus::Running
            }
        }
    }

    fn frame(scheduler: &mut ActivityScheduler, ui: &mut UiPanels, flags: &mut StoryFlags) {
        scheduler.tick(&FrameInput::default(), ui, flags);
        scheduler.commit();
    }

    #[test]
    fn test_enqueue_is_invisible_until_commit() {
        let log = Log::default();
        let mut scheduler = ActivityScheduler::new();

        scheduler.enqueue(Box::new(Scripted::new("a", 1, &log)));
        scheduler.enqueue(Box::new(Scripted::new("b", 1, &log)));

        assert!(scheduler.current_activity().is_none());
        assert!(!scheduler.has_activity());
        assert_eq!(scheduler.pending_len(), 2);

        scheduler.commit();

        assert_eq!(scheduler.current_activity().unwrap().label(), "a");
        assert_eq!(scheduler.next_activity().unwrap().label(), "b");
        assert_eq!(scheduler.pending_len(), 0);
    }

    #[test]
    fn test_enqueue_resets() {
        let log = Log::default();
        let mut scheduler = ActivityScheduler::new();
        scheduler.enqueue(Box::new(Scripted::new("a", 1, &log)));
        assert_eq!(*log.borrow(), vec!["reset a"]);
    }

    #[test]
    fn test_fifo_lifecycle() {
        let log = Log::default();
        let mut ui = UiPanels::headless();
        let mut flags = StoryFlags::new();
        let mut scheduler = ActivityScheduler::new();

        scheduler.enqueue(Box::new(Scripted::new("a", 2, &log)));
        scheduler.enqueue(Box::new(Scripted::new("b", 1, &log)));
        scheduler.commit();
        log.borrow_mut().clear();

        frame(&mut scheduler, &mut ui, &mut flags);
        assert_eq!(scheduler.current_activity().unwrap().label(), "a");
        assert_eq!(
            scheduler.current_state(),
            Some(ActivityState {
                started: true,
                complete: false
            })
        );

        frame(&mut scheduler, &mut ui, &mut flags);
        assert_eq!(scheduler.current_activity().unwrap().label(), "b");

        frame(&mut scheduler, &mut ui, &mut flags);
        assert!(!scheduler.has_activity());

        assert_eq!(
            *log.borrow(),
            vec!["start a", "update a", "update a", "start b", "update b"]
        );
    }

    #[test]
    fn test_completed_head_replaced_in_order() {
        let log = Log::default();
        let mut ui = UiPanels::headless();
        let mut flags = StoryFlags::new();
        let mut scheduler = ActivityScheduler::new();

        scheduler.enqueue(Box::new(Scripted::new("a", 1, &log)));
        scheduler.commit();
        scheduler.tick(&FrameInput::default(), &mut ui, &mut flags);

        scheduler.enqueue(Box::new(Scripted::new("b", 1, &log)));
        scheduler.enqueue(Box::new(Scripted::new("c", 1, &log)));
        let retired = scheduler.commit().unwrap();

        assert_eq!(retired.label(), "a");
        assert_eq!(scheduler.current_activity().unwrap().label(), "b");
        assert_eq!(scheduler.next_activity().unwrap().label(), "c");
    }

    #[test]
    fn test_enqueue_during_update_waits_for_commit() {
        let log = Log::default();
        let mut ui = UiPanels::headless();
        let mut flags = StoryFlags::new();
        let mut scheduler = ActivityScheduler::new();

        let parent = Scripted::new("parent", 3, &log).spawning(Scripted::new("child", 1, &log));
        scheduler.enqueue(Box::new(parent));
        scheduler.commit();

        scheduler.tick(&FrameInput::default(), &mut ui, &mut flags);
        assert_eq!(scheduler.live_len(), 1);
        assert_eq!(scheduler.pending_len(), 1);

        scheduler.commit();
        assert_eq!(scheduler.live_len(), 2);
        assert_eq!(scheduler.current_activity().unwrap().label(), "parent");
        assert_eq!(scheduler.next_activity().unwrap().label(), "child");
    }

    #[test]
    fn test_control_enabled() {
        let log = Log::default();
        let mut scheduler = ActivityScheduler::new();
        assert!(scheduler.control_enabled());

        scheduler.enqueue(Box::new(Scripted::new("cutscene", 1, &log)));
        scheduler.commit();
        assert!(!scheduler.control_enabled());

        let mut walking = ActivityScheduler::new();
        walking.enqueue(Box::new(Scripted::new("walk", 1, &log).allowing_control()));
        walking.commit();
        assert!(walking.control_enabled());

        walking.set_control_disabled(true);
        assert!(!walking.control_enabled());
        walking.set_control_disabled(false);
        assert!(walking.control_enabled());
    }

    #[test]
    fn test_override_applies_when_idle() {
        let mut scheduler = ActivityScheduler::new();
        scheduler.set_control_disabled(true);
        assert!(!scheduler.control_enabled());
        assert!(scheduler.is_control_disabled_override());
    }
}
