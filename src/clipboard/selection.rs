//! Tier 2: legacy selection-copy fallback.
//!
//! Mirrors the classic textarea trick: stage the text in an off-screen,
//! non-interactive element, select its full contents, run the synchronous
//! copy command, and remove the staging element no matter what happened.
//! The command itself is injectable so tests never touch a real terminal;
//! the production command emits an OSC 52 escape sequence, which works
//! through any terminal emulator that supports it (including over SSH).

use super::{ClipboardWriter, CopyError};
use crate::dom::{Document, Position};
use base64::Engine;
use std::io::{self, IsTerminal, Write};

/// The synchronous "copy the current selection" command.
///
/// Returns `Ok(true)` when the copy went through, `Ok(false)` when the
/// command ran but reported failure, and `Err` when it blew up outright.
pub trait SelectionCommand {
    fn is_supported(&self) -> bool {
        true
    }

    fn copy_selection(&mut self, doc: &Document) -> io::Result<bool>;
}

/// Production command: OSC 52 escape sequence through stdout.
///
/// Sequence: `ESC ] 52 ; c ; <base64 payload> BEL`. The terminal emulator
/// forwards the payload to the system clipboard.
pub struct Osc52Command;

impl Osc52Command {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Osc52Command {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionCommand for Osc52Command {
    fn is_supported(&self) -> bool {
        // The escape only reaches a terminal if stdout is one.
        io::stdout().is_terminal()
    }

    fn copy_selection(&mut self, doc: &Document) -> io::Result<bool> {
        let Some(text) = doc.selected_text() else {
            return Ok(false);
        };
        let encoded = base64::engine::general_purpose::STANDARD.encode(text);
        let mut stdout = io::stdout();
        write!(stdout, "\x1b]52;c;{}\x07", encoded)?;
        stdout.flush()?;
        Ok(true)
    }
}

/// Class marking the temporary staging element while it is in the tree.
const STAGING_CLASS: &str = "clipboard-staging";

pub struct SelectionCopy<C: SelectionCommand> {
    command: C,
}

impl<C: SelectionCommand> SelectionCopy<C> {
    pub fn new(command: C) -> Self {
        Self { command }
    }
}

impl<C: SelectionCommand> ClipboardWriter for SelectionCopy<C> {
    fn name(&self) -> &'static str {
        "selection-copy"
    }

    fn is_available(&mut self) -> bool {
        self.command.is_supported()
    }

    fn write_text(&mut self, doc: &mut Document, text: &str) -> Result<(), CopyError> {
        // Off-screen, non-interactive staging element holding the text.
        let staging = doc.create_element("textarea");
        doc.add_class(staging, STAGING_CLASS);
        doc.set_attr(staging, "tabindex", "-1");
        doc.set_attr(staging, "aria-hidden", "true");
        doc.set_position(staging, Position::Fixed);
        doc.set_left_px(staging, -9999);
        let content = doc.create_text(text);
        doc.append_child(staging, content);

        let root = doc.root();
        doc.append_child(root, staging);
        doc.select_contents(staging);

        let result = self.command.copy_selection(doc);

        // Cleanup happens on every exit path, error path included.
        doc.clear_selection();
        doc.remove_child(root, staging);

        match result {
            Ok(true) => Ok(()),
            Ok(false) => Err(CopyError::CommandFailed(
                "copy command reported failure".to_string(),
            )),
            Err(err) => Err(CopyError::CommandFailed(err.to_string())),
        }
    }
}
