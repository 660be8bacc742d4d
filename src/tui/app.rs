// TUI application state
//
// Holds the augmented document, its copy controls, the clipboard stack,
// and the UI state (focus, scroll, quit flag). Input routing lives in
// tui::mod; rendering lives in tui::ui.

use crate::augment::{CopyButton, BUTTON_CLASS};
use crate::clipboard::ClipboardStack;
use crate::dom::{Document, NodeId};
use crate::events::{activation_for_key, Activation, Handled};
use crate::logging::LogBuffer;
use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use std::time::Instant;

/// Main application state for the TUI
pub struct App {
    /// The augmented document being displayed
    pub doc: Document,

    /// Copy controls, in document order
    pub buttons: Vec<CopyButton>,

    /// Clipboard tier stack used by activations
    pub clipboard: ClipboardStack,

    /// Index into `buttons` of the focused control
    pub focused: usize,

    /// Index of the first visible top-level block
    pub scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Page title for the title bar
    pub title: String,

    /// When the app started (for uptime display)
    pub start_time: Instant,

    /// Log buffer for the system logs panel
    pub log_buffer: LogBuffer,

    /// Screen areas of the rendered controls, recorded each frame for
    /// mouse hit testing: (area, index into `buttons`)
    pub button_areas: Vec<(Rect, usize)>,
}

impl App {
    pub fn new(
        doc: Document,
        buttons: Vec<CopyButton>,
        clipboard: ClipboardStack,
        log_buffer: LogBuffer,
        title: String,
    ) -> Self {
        Self {
            doc,
            buttons,
            clipboard,
            focused: 0,
            scroll: 0,
            should_quit: false,
            title,
            start_time: Instant::now(),
            log_buffer,
            button_areas: Vec::new(),
        }
    }

    // ── Focus ───────────────────────────────────────────────────────────

    /// Move focus to the next control (Tab behavior, wraps)
    pub fn focus_next(&mut self) {
        if !self.buttons.is_empty() {
            self.focused = (self.focused + 1) % self.buttons.len();
        }
    }

    /// Move focus to the previous control (Shift+Tab behavior, wraps)
    pub fn focus_prev(&mut self) {
        if !self.buttons.is_empty() {
            self.focused = self
                .focused
                .checked_sub(1)
                .unwrap_or(self.buttons.len() - 1);
        }
    }

    // ── Activation ──────────────────────────────────────────────────────

    /// Offer a key event to the focused control. Enter/Space activate and
    /// are consumed - a consumed Space never reaches scroll handling.
    pub fn handle_control_key(&mut self, key: &KeyEvent, now: Instant) -> Handled {
        if self.buttons.is_empty() {
            return Handled::No;
        }
        match activation_for_key(key) {
            Some(activation) => {
                self.activate_focused(activation, now);
                Handled::Yes
            }
            None => Handled::No,
        }
    }

    /// Activate the focused control (pointer or keyboard - same outcome).
    pub fn activate_focused(&mut self, activation: Activation, now: Instant) {
        let Some(button) = self.buttons.get_mut(self.focused) else {
            return;
        };
        tracing::debug!("control {} activated via {:?}", self.focused, activation);
        // Outcome flash is applied inside; failures are logged with their
        // cause, the UI only ever sees the collapsed "Error" label.
        if button
            .activate(&mut self.doc, &mut self.clipboard, now)
            .is_ok()
        {
            tracing::info!("copied code block to clipboard");
        }
    }

    /// Pointer activation: focus and activate the control under (col, row),
    /// if any. Returns true when a control was hit.
    pub fn click_at(&mut self, col: u16, row: u16, now: Instant) -> bool {
        let hit = self
            .button_areas
            .iter()
            .find(|(area, _)| {
                col >= area.x
                    && col < area.x + area.width
                    && row >= area.y
                    && row < area.y + area.height
            })
            .map(|&(_, idx)| idx);

        if let Some(idx) = hit {
            self.focused = idx;
            self.activate_focused(Activation::Pointer, now);
            true
        } else {
            false
        }
    }

    // ── Ticking ─────────────────────────────────────────────────────────

    /// Advance flash timers; reverts any control whose deadline passed.
    pub fn tick(&mut self, now: Instant) {
        for button in &mut self.buttons {
            button.tick(&mut self.doc, now);
        }
    }

    // ── Scrolling ───────────────────────────────────────────────────────

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        let max = self.doc.children(self.doc.root()).len().saturating_sub(1);
        if self.scroll < max {
            self.scroll += 1;
        }
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    // ── Lookups for rendering ───────────────────────────────────────────

    /// The control index serving a given preformatted container, if any.
    pub fn button_index_for(&self, pre: NodeId) -> Option<usize> {
        let control = self.doc.descendant_with_class(pre, BUTTON_CLASS)?;
        self.buttons.iter().position(|b| b.node() == control)
    }

    /// Name of the clipboard tier that would currently handle a copy.
    pub fn active_tier_name(&mut self) -> &'static str {
        self.clipboard.active_tier().unwrap_or("none")
    }

    /// Get uptime as a formatted string
    pub fn uptime(&self) -> String {
        let elapsed = self.start_time.elapsed();
        let seconds = elapsed.as_secs();
        let hours = seconds / 3600;
        let minutes = (seconds % 3600) / 60;
        let secs = seconds % 60;

        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::augment::{augment, AugmentOptions};
    use crate::clipboard::test_support::FakeClipboard;
    use crate::page;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn sample_app() -> App {
        let mut doc = page::sample();
        let buttons = augment(&mut doc, &AugmentOptions::default());
        let clipboard = ClipboardStack::with_tiers(vec![Box::new(FakeClipboard::working())]);
        App::new(
            doc,
            buttons,
            clipboard,
            LogBuffer::new(),
            "sample".to_string(),
        )
    }

    #[test]
    fn focus_wraps_in_both_directions() {
        let mut app = sample_app();
        let count = app.buttons.len();
        assert!(count >= 2);

        app.focused = count - 1;
        app.focus_next();
        assert_eq!(app.focused, 0);
        app.focus_prev();
        assert_eq!(app.focused, count - 1);
    }

    #[test]
    fn space_is_consumed_by_the_focused_control() {
        let mut app = sample_app();
        let key = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
        let handled = app.handle_control_key(&key, Instant::now());
        assert!(handled.was_handled());
        // The activation flashed the focused control.
        assert!(app.buttons[app.focused].is_flashing());
    }

    #[test]
    fn navigation_keys_are_not_consumed_by_controls() {
        let mut app = sample_app();
        let key = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
        assert!(!app.handle_control_key(&key, Instant::now()).was_handled());
    }

    #[test]
    fn click_outside_any_control_does_nothing() {
        let mut app = sample_app();
        assert!(!app.click_at(5, 5, Instant::now()));
        assert!(!app.buttons.iter().any(|b| b.is_flashing()));
    }

    #[test]
    fn click_on_a_recorded_area_activates_that_control() {
        let mut app = sample_app();
        app.button_areas = vec![(Rect::new(10, 2, 8, 1), 1)];
        assert!(app.click_at(12, 2, Instant::now()));
        assert_eq!(app.focused, 1);
        assert!(app.buttons[1].is_flashing());
    }
}
