//! Tier 1: the host system clipboard via `arboard`.
//!
//! The clipboard handle is created fresh for every call so the process
//! never holds platform clipboard resources between copies. Availability
//! is whatever `arboard::Clipboard::new()` says right now - on headless
//! Linux or a display-less CI runner it fails and the stack moves on to
//! the legacy tier.

use super::{ClipboardWriter, CopyError};
use crate::dom::Document;

pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardWriter for SystemClipboard {
    fn name(&self) -> &'static str {
        "system"
    }

    fn is_available(&mut self) -> bool {
        arboard::Clipboard::new().is_ok()
    }

    fn write_text(&mut self, _doc: &mut Document, text: &str) -> Result<(), CopyError> {
        let mut clipboard = arboard::Clipboard::new().map_err(classify)?;
        clipboard.set_text(text.to_owned()).map_err(classify)
    }
}

/// Map arboard's error surface onto the copy-error classification.
fn classify(err: arboard::Error) -> CopyError {
    match err {
        arboard::Error::ClipboardNotSupported => CopyError::NoClipboardSupport,
        arboard::Error::ClipboardOccupied => CopyError::PermissionDenied(err.to_string()),
        other => CopyError::CommandFailed(other.to_string()),
    }
}
