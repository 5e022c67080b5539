#![allow(dead_code)]

use orrery_core::panel::PanelView;
use orrery_core::ui::{NoteDraft, UiShell};

/// Shell double that records every call so tests can assert on what the
/// core asked the UI to display.
#[derive(Debug, Default)]
pub struct RecordingShell {
    pub panels: Vec<PanelView>,
    pub panel_visible: bool,
    pub timer_texts: Vec<String>,
    pub timer_visible: bool,
    pub alerts: usize,
    pub messages: Vec<String>,
    pub editor_drafts: Vec<NoteDraft>,
    pub editor_visible: bool,
}

impl RecordingShell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_panel(&self) -> Option<&PanelView> {
        self.panels.last()
    }
}

impl UiShell for RecordingShell {
    fn show_panel(&mut self, view: &PanelView) {
        self.panels.push(view.clone());
        self.panel_visible = true;
    }

    fn hide_panel(&mut self) {
        self.panel_visible = false;
    }

    fn show_timer(&mut self, text: &str) {
        self.timer_texts.push(text.to_string());
        self.timer_visible = true;
    }

    fn hide_timer(&mut self) {
        self.timer_visible = false;
    }

    fn play_alert(&mut self) {
        self.alerts += 1;
    }

    fn message(&mut self, text: &str) {
        self.messages.push(text.to_string());
    }

    fn show_editor(&mut self, draft: &NoteDraft) {
        self.editor_drafts.push(draft.clone());
        self.editor_visible = true;
    }

    fn hide_editor(&mut self) {
        self.editor_visible = false;
    }
}
