//! Dialog activity - steps through lines on the dialog panel.

use overworld::InteractionId;

use super::{Activity, ActivityContext, ActivityStatus};

/// Shows lines one at a time, advancing on confirm. If the interaction ends in
/// a choice, waits for the player to pick and records the pick in the story
/// flags under the speaker and interaction.
#[derive(Debug, Clone)]
pub struct DialogActivity {
    label: String,
    speaker: String,
    interaction: InteractionId,
    lines: Vec<String>,
    choices: Vec<String>,
    line: usize,
    allows_control: bool,
}

impl DialogActivity {
    pub fn new(speaker: impl Into<String>, interaction: InteractionId, lines: Vec<String>) -> Self {
        let speaker = speaker.into();
        Self {
            label: format!("dialog:{}:{}", speaker, interaction),
            speaker,
            interaction,
            lines,
            choices: Vec::new(),
            line: 0,
            allows_control: false,
        }
    }

    pub fn with_choices(mut self, choices: Vec<String>) -> Self {
        self.choices = choices;
        self
    }

    pub fn with_allows_control(mut self, allows: bool) -> Self {
        self.allows_control = allows;
        self
    }

    fn finish(&mut self, ctx: &mut ActivityContext<'_>) -> ActivityStatus {
        ctx.ui.dialog.set_choices(&[]);
        ctx.ui.dialog.set_text("");
        ctx.ui.dialog.hide();
        ActivityStatus::Complete
    }
}

impl Activity for DialogActivity {
    fn label(&self) -> &str {
        &self.label
    }

    fn allows_control(&self) -> bool {
        self.allows_control
    }

    fn reset(&mut self) {
        self.line = 0;
    }

    fn start(&mut self, ctx: &mut ActivityContext<'_>) {
        self.line = 0;
        let dialog = &mut ctx.ui.dialog;
        dialog.show();
        dialog.set_speaker(&self.speaker);
        dialog.set_choices(&[]);
        match self.lines.first() {
            Some(text) => dialog.set_text(text),
            None => {
                dialog.set_text("");
                dialog.set_choices(&self.choices);
            }
        }
    }

    fn update(&mut self, ctx: &mut ActivityContext<'_>) -> ActivityStatus {
        if self.line < self.lines.len() {
            if !ctx.input.confirm {
                return ActivityStatus::Running;
            }
            self.line += 1;
            if let Some(text) = self.lines.get(self.line) {
                ctx.ui.dialog.set_text(text);
                return ActivityStatus::Running;
            }
            if self.choices.is_empty() {
                return self.finish(ctx);
            }
            ctx.ui.dialog.set_choices(&self.choices);
            return ActivityStatus::Running;
        }

        if self.choices.is_empty() {
            return self.finish(ctx);
        }

        match ctx.input.choice {
            Some(index) if index < self.choices.len() => {
                ctx.flags.record_choice(&self.speaker, self.interaction, index);
                self.finish(ctx)
            }
            _ => ActivityStatus::Running,
        }
    }
}
