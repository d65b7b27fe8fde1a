//! Wait activity - holds the queue for a fixed duration.

use std::time::Duration;

use super::{Activity, ActivityContext, ActivityStatus};

#[derive(Debug, Clone)]
pub struct WaitActivity {
    label: String,
    duration: Duration,
    elapsed: Duration,
    allows_control: bool,
}

impl WaitActivity {
    pub fn new(label: impl Into<String>, duration: Duration) -> Self {
        Self {
            label: label.into(),
            duration,
            elapsed: Duration::ZERO,
            allows_control: false,
        }
    }

    pub fn with_allows_control(mut self, allows: bool) -> Self {
        self.allows_control = allows;
        self
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

impl Activity for WaitActivity {
    fn label(&self) -> &str {
        &self.label
    }

    fn allows_control(&self) -> bool {
        self.allows_control
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    fn start(&mut self, _ctx: &mut ActivityContext<'_>) {}

    fn update(&mut self, ctx: &mut ActivityContext<'_>) -> ActivityStatus {
        self.elapsed = self.elapsed.saturating_add(ctx.input.delta);
        if self.elapsed >= self.duration {
            ActivityStatus::Complete
        } else {
            ActivityStatus::Running
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{ActivityScheduler, FrameInput};
    use crate::ui::UiPanels;
    use overworld::StoryFlags;

    #[test]
    fn test_wait_completes_after_duration() {
        let mut ui = UiPanels::headless();
        let mut flags = StoryFlags::new();
        let mut scheduler = ActivityScheduler::new();
        let step = FrameInput::idle(Duration::from_millis(100));

        scheduler.enqueue(Box::new(WaitActivity::new("beat", Duration::from_millis(250))));
        scheduler.commit();

        scheduler.tick(&step, &mut ui, &mut flags);
        scheduler.tick(&step, &mut ui, &mut flags);
        assert!(!scheduler.current_state().unwrap().complete);

        scheduler.tick(&step, &mut ui, &mut flags);
        assert!(scheduler.current_state().unwrap().complete);
    }

    #[test]
    fn test_reset_clears_elapsed() {
        let mut wait = WaitActivity::new("beat", Duration::from_secs(1));
        wait.elapsed = Duration::from_millis(600);
        wait.reset();
        assert_eq!(wait.elapsed(), Duration::ZERO);
    }
}
