//! UI panel capabilities consumed by the core.
//!
//! Widgets themselves live in the host. The core only shows, hides, and feeds
//! text/progress into them through these traits.

use std::cell::RefCell;
use std::rc::Rc;

/// A panel that can be shown or hidden.
pub trait Panel {
    fn set_visible(&mut self, visible: bool);
    fn is_visible(&self) -> bool;

    fn show(&mut self) {
        self.set_visible(true);
    }

    fn hide(&mut self) {
        self.set_visible(false);
    }

    fn toggle(&mut self) {
        let visible = self.is_visible();
        self.set_visible(!visible);
    }
}

/// The loading progress bar.
pub trait ProgressPanel: Panel {
    fn set_title(&mut self, title: &str);
    fn set_info(&mut self, info: &str);
    /// Fraction complete, `0.0..=1.0`.
    fn set_progress(&mut self, progress: f32);
    fn progress(&self) -> f32;
}

/// The dialog box.
pub trait DialogPanel: Panel {
    fn set_speaker(&mut self, speaker: &str);
    fn set_text(&mut self, text: &str);
    /// Options to offer; empty hides the choice list.
    fn set_choices(&mut self, choices: &[String]);
}

/// Every panel the core talks to, one per kind.
pub struct UiPanels {
    pub title: Box<dyn Panel>,
    pub dialog: Box<dyn DialogPanel>,
    pub game: Box<dyn Panel>,
    pub progress: Box<dyn ProgressPanel>,
}

impl UiPanels {
    /// Panels that only record state. Useful for servers, tools, and tests.
    pub fn headless() -> Self {
        HeadlessUi::default().panels()
    }

    /// Hide the title, dialog, game, and progress panels.
    pub fn disable_all(&mut self) {
        self.title.hide();
        self.dialog.hide();
        self.game.hide();
        self.progress.hide();
    }
}

/// Visibility-only panel backed by shared state.
#[derive(Debug, Clone, Default)]
pub struct HeadlessPanel {
    visible: Rc<RefCell<bool>>,
}

impl Panel for HeadlessPanel {
    fn set_visible(&mut self, visible: bool) {
        *self.visible.borrow_mut() = visible;
    }

    fn is_visible(&self) -> bool {
        *self.visible.borrow()
    }
}

/// Snapshot of a [`HeadlessProgress`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressState {
    pub visible: bool,
    pub title: String,
    pub info: String,
    pub progress: f32,
    /// Every value passed to `set_progress`, in order.
    pub history: Vec<f32>,
    /// Number of times the panel went from hidden to visible.
    pub times_shown: usize,
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessProgress {
    state: Rc<RefCell<ProgressState>>,
}

impl HeadlessProgress {
    pub fn snapshot(&self) -> ProgressState {
        self.state.borrow().clone()
    }
}

impl Panel for HeadlessProgress {
    fn set_visible(&mut self, visible: bool) {
        let mut state = self.state.borrow_mut();
        if visible && !state.visible {
            state.times_shown += 1;
        }
        state.visible = visible;
    }

    fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }
}

impl ProgressPanel for HeadlessProgress {
    fn set_title(&mut self, title: &str) {
        self.state.borrow_mut().title = title.to_string();
    }

    fn set_info(&mut self, info: &str) {
        self.state.borrow_mut().info = info.to_string();
    }

    fn set_progress(&mut self, progress: f32) {
        let mut state = self.state.borrow_mut();
        state.progress = progress;
        state.history.push(progress);
    }

    fn progress(&self) -> f32 {
        self.state.borrow().progress
    }
}

/// Snapshot of a [`HeadlessDialog`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogState {
    pub visible: bool,
    pub speaker: String,
    pub text: String,
    pub choices: Vec<String>,
    /// Every line shown, in order.
    pub transcript: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessDialog {
    state: Rc<RefCell<DialogState>>,
}

impl HeadlessDialog {
    pub fn snapshot(&self) -> DialogState {
        self.state.borrow().clone()
    }
}

impl Panel for HeadlessDialog {
    fn set_visible(&mut self, visible: bool) {
        self.state.borrow_mut().visible = visible;
    }

    fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }
}

impl DialogPanel for HeadlessDialog {
    fn set_speaker(&mut self, speaker: &str) {
        self.state.borrow_mut().speaker = speaker.to_string();
    }

    fn set_text(&mut self, text: &str) {
        let mut state = self.state.borrow_mut();
        state.text = text.to_string();
        if !text.is_empty() {
            state.transcript.push(text.to_string());
        }
    }

    fn set_choices(&mut self, choices: &[String]) {
        self.state.borrow_mut().choices = choices.to_vec();
    }
}

/// Handles onto a headless panel set. Clones share state with the panels
/// handed to the controller, so the host can inspect them afterwards.
#[derive(Debug, Clone, Default)]
pub struct HeadlessUi {
    pub title: HeadlessPanel,
    pub dialog: HeadlessDialog,
    pub game: HeadlessPanel,
    pub progress: HeadlessProgress,
}

impl HeadlessUi {
    pub fn panels(&self) -> UiPanels {
        UiPanels {
            title: Box::new(self.title.clone()),
            dialog: Box::new(self.dialog.clone()),
            game: Box::new(self.game.clone()),
            progress: Box::new(self.progress.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_toggle() {
        let mut panel = HeadlessPanel::default();
        assert!(!panel.is_visible());
        panel.toggle();
        assert!(panel.is_visible());
        panel.toggle();
        assert!(!panel.is_visible());
    }

    #[test]
    fn test_handles_share_state() {
        let ui = HeadlessUi::default();
        let mut panels = ui.panels();

        panels.progress.show();
        panels.progress.set_progress(0.5);
        panels.dialog.set_text("Hello");

        let progress = ui.progress.snapshot();
        assert!(progress.visible);
        assert_eq!(progress.history, vec![0.5]);
        assert_eq!(ui.dialog.snapshot().transcript, vec!["Hello".to_string()]);
    }

    #[test]
    fn test_disable_all() {
        let ui = HeadlessUi::default();
        let mut panels = ui.panels();
        panels.title.show();
        panels.game.show();
        panels.dialog.show();

        panels.disable_all();

        assert!(!ui.title.is_visible());
        assert!(!ui.game.is_visible());
        assert!(!ui.dialog.is_visible());
        assert!(!ui.progress.is_visible());
    }
}
