use tracing::warn;

use crate::panel::PanelView;
use crate::render::Renderer;

/// Editable copy of a category's fields shown in the note-editor modal and
/// committed back on save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub body: String,
    pub kind: String,
}

/// UI-shell collaborator. Panel and modal containers, audio playback and
/// user-facing alerts live outside the core; these calls are infallible by
/// policy, so an implementation that cannot display something just drops it.
pub trait UiShell {
    fn show_panel(&mut self, view: &PanelView);
    fn hide_panel(&mut self);
    fn show_timer(&mut self, text: &str);
    fn hide_timer(&mut self);
    fn play_alert(&mut self);
    fn message(&mut self, text: &str);
    fn show_editor(&mut self, draft: &NoteDraft);
    fn hide_editor(&mut self);
}

/// Terminal-backed shell used by the CLI session.
#[derive(Debug)]
pub struct TerminalShell {
    renderer: Renderer,
}

impl TerminalShell {
    pub fn new(renderer: Renderer) -> Self {
        Self { renderer }
    }
}

impl UiShell for TerminalShell {
    fn show_panel(&mut self, view: &PanelView) {
        if let Err(err) = self.renderer.print_panel(view) {
            warn!(error = %err, "failed to render panel");
        }
    }

    fn hide_panel(&mut self) {
        println!("(panel hidden)");
    }

    fn show_timer(&mut self, text: &str) {
        if let Err(err) = self.renderer.print_timer(text) {
            warn!(error = %err, "failed to render timer");
        }
    }

    fn hide_timer(&mut self) {
        println!("(timer hidden)");
    }

    fn play_alert(&mut self) {
        // Terminal bell stands in for the alarm sound.
        print!("\x07");
    }

    fn message(&mut self, text: &str) {
        println!("{text}");
    }

    fn show_editor(&mut self, draft: &NoteDraft) {
        println!(
            "editing: title={} kind={} note={}",
            draft.title, draft.kind, draft.body
        );
    }

    fn hide_editor(&mut self) {}
}
