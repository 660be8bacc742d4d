//! The per-control state machine.
//!
//! A `CopyButton` pairs one control element with the code element it
//! serves. It is either idle (showing its static label) or flashing
//! (showing a transient outcome label). Flash reverts are deadline-based:
//! the host calls `tick` with the current time and the control reverts
//! once the deadline passes. Scheduling a new flash replaces any
//! outstanding deadline, so a revert can never fire from a superseded
//! activation.

use super::FLASH_CLASS;
use crate::clipboard::{ClipboardWriter, CopyError};
use crate::dom::{Document, NodeId};
use std::time::{Duration, Instant};

pub struct CopyButton {
    button: NodeId,
    code: NodeId,
    idle_label: String,
    copied_label: String,
    error_label: String,
    flash_duration: Duration,
    flash_until: Option<Instant>,
}

impl CopyButton {
    pub(super) fn new(
        button: NodeId,
        code: NodeId,
        idle_label: String,
        copied_label: String,
        error_label: String,
        flash_duration: Duration,
    ) -> Self {
        Self {
            button,
            code,
            idle_label,
            copied_label,
            error_label,
            flash_duration,
            flash_until: None,
        }
    }

    /// The control element in the document.
    pub fn node(&self) -> NodeId {
        self.button
    }

    /// The paired code element.
    pub fn code_node(&self) -> NodeId {
        self.code
    }

    /// Note: exercised by tests; the UI reads the flash state off the
    /// control's class instead
    #[allow(dead_code)]
    pub fn is_flashing(&self) -> bool {
        self.flash_until.is_some()
    }

    /// Run the activation contract: read the visible text of the paired
    /// code element, attempt the clipboard write, flash the outcome.
    ///
    /// The returned error carries the cause for logs and tests; the
    /// user-visible outcome is already applied to the document either way.
    pub fn activate(
        &mut self,
        doc: &mut Document,
        clipboard: &mut dyn ClipboardWriter,
        now: Instant,
    ) -> Result<(), CopyError> {
        let text = doc.visible_text(self.code);
        let result = clipboard.write_text(doc, &text);
        match &result {
            Ok(()) => self.flash(doc, self.copied_label.clone(), now),
            Err(err) => {
                tracing::warn!("copy failed: {err}");
                self.flash(doc, self.error_label.clone(), now);
            }
        }
        result
    }

    fn flash(&mut self, doc: &mut Document, label: String, now: Instant) {
        doc.set_text(self.button, &label);
        doc.add_class(self.button, FLASH_CLASS);
        // Replaces any outstanding deadline from a previous activation.
        self.flash_until = Some(now + self.flash_duration);
    }

    /// Revert the flash once its deadline has passed. Safe to call on
    /// every host tick; does nothing while idle or mid-flash.
    pub fn tick(&mut self, doc: &mut Document, now: Instant) {
        if let Some(deadline) = self.flash_until {
            if now >= deadline {
                doc.set_text(self.button, &self.idle_label);
                doc.remove_class(self.button, FLASH_CLASS);
                self.flash_until = None;
            }
        }
    }
}
