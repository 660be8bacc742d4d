// Clipboard write protocol - two tiers, first applicable tier wins
//
// Tier 1 is the host system clipboard (arboard). Tier 2 is the legacy
// selection-copy path: stage the text in an off-screen document element,
// select it, and run a synchronous copy command. The fallback triggers on
// tier-1 *unavailability*, never as a retry after a tier-1 failure.
//
// Every cause collapses to the same "Error" flash at the UI layer; the
// CopyError classification exists for logs and tests.

mod selection;
mod system;

pub use selection::{Osc52Command, SelectionCommand, SelectionCopy};
pub use system::SystemClipboard;

use crate::config::ClipboardTier;
use crate::dom::Document;
use thiserror::Error;

/// Why a copy attempt failed. Collapsed to a single user-visible outcome.
#[derive(Debug, Error)]
pub enum CopyError {
    /// No clipboard mechanism is available in this environment.
    #[error("no clipboard mechanism available")]
    NoClipboardSupport,

    /// The platform refused access to the clipboard.
    #[error("clipboard access denied: {0}")]
    PermissionDenied(String),

    /// A clipboard mechanism was available but the write failed.
    #[error("copy command failed: {0}")]
    CommandFailed(String),
}

/// An injectable clipboard capability.
///
/// `is_available` is the capability check, evaluated at call time (a
/// clipboard can come and go - a display server restart, a detached
/// terminal). `write_text` takes the document because the legacy tier
/// stages its text in an off-screen element.
pub trait ClipboardWriter {
    /// Human-readable tier name for logs and the status bar.
    fn name(&self) -> &'static str;

    /// Whether this tier can be used right now.
    fn is_available(&mut self) -> bool;

    /// Place `text` on the clipboard.
    fn write_text(&mut self, doc: &mut Document, text: &str) -> Result<(), CopyError>;
}

/// Ordered tiers. The first tier reporting availability handles the write;
/// its outcome is final.
pub struct ClipboardStack {
    tiers: Vec<Box<dyn ClipboardWriter>>,
}

impl ClipboardStack {
    /// Build the tier stack for the configured preference.
    pub fn detect(tier: ClipboardTier) -> Self {
        let tiers: Vec<Box<dyn ClipboardWriter>> = match tier {
            ClipboardTier::Auto => vec![
                Box::new(SystemClipboard::new()),
                Box::new(SelectionCopy::new(Osc52Command::new())),
            ],
            ClipboardTier::System => vec![Box::new(SystemClipboard::new())],
            ClipboardTier::Osc52 => vec![Box::new(SelectionCopy::new(Osc52Command::new()))],
        };
        Self { tiers }
    }

    /// Build a stack from explicit tiers. Tests inject fakes here.
    pub fn with_tiers(tiers: Vec<Box<dyn ClipboardWriter>>) -> Self {
        Self { tiers }
    }

    /// Name of the first currently-available tier, if any.
    pub fn active_tier(&mut self) -> Option<&'static str> {
        for t in self.tiers.iter_mut() {
            if t.is_available() {
                return Some(t.name());
            }
        }
        None
    }
}

impl ClipboardWriter for ClipboardStack {
    fn name(&self) -> &'static str {
        "tiered"
    }

    fn is_available(&mut self) -> bool {
        self.tiers.iter_mut().any(|t| t.is_available())
    }

    fn write_text(&mut self, doc: &mut Document, text: &str) -> Result<(), CopyError> {
        for tier in &mut self.tiers {
            if tier.is_available() {
                tracing::debug!("copying {} byte(s) via {}", text.len(), tier.name());
                return tier.write_text(doc, text);
            }
        }
        Err(CopyError::NoClipboardSupport)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Fake clipboard writers shared by unit tests across modules.

    use super::*;

    /// Scripted writer: fixed availability and a fixed outcome.
    pub struct FakeClipboard {
        pub available: bool,
        pub fail_with: Option<fn() -> CopyError>,
        pub writes: Vec<String>,
    }

    impl FakeClipboard {
        pub fn working() -> Self {
            Self {
                available: true,
                fail_with: None,
                writes: Vec::new(),
            }
        }

        pub fn unavailable() -> Self {
            Self {
                available: false,
                fail_with: None,
                writes: Vec::new(),
            }
        }

        pub fn failing(err: fn() -> CopyError) -> Self {
            Self {
                available: true,
                fail_with: Some(err),
                writes: Vec::new(),
            }
        }
    }

    impl ClipboardWriter for FakeClipboard {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn is_available(&mut self) -> bool {
            self.available
        }

        fn write_text(&mut self, _doc: &mut Document, text: &str) -> Result<(), CopyError> {
            if let Some(err) = self.fail_with {
                return Err(err());
            }
            self.writes.push(text.to_string());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::FakeClipboard;
    use super::*;

    #[test]
    fn first_available_tier_wins() {
        let mut doc = Document::new();
        let mut stack = ClipboardStack::with_tiers(vec![
            Box::new(FakeClipboard::unavailable()),
            Box::new(FakeClipboard::working()),
        ]);
        assert!(stack.write_text(&mut doc, "hello").is_ok());
    }

    #[test]
    fn tier_failure_is_final_not_a_fallthrough() {
        let mut doc = Document::new();
        // Tier 1 is available but fails; tier 2 would succeed. Fallback
        // triggers on unavailability only, never as a retry.
        let mut stack = ClipboardStack::with_tiers(vec![
            Box::new(FakeClipboard::failing(|| {
                CopyError::PermissionDenied("denied".into())
            })),
            Box::new(FakeClipboard::working()),
        ]);
        let err = stack.write_text(&mut doc, "hello").unwrap_err();
        assert!(matches!(err, CopyError::PermissionDenied(_)));
    }

    #[test]
    fn no_tiers_available_is_no_support() {
        let mut doc = Document::new();
        let mut stack = ClipboardStack::with_tiers(vec![
            Box::new(FakeClipboard::unavailable()),
            Box::new(FakeClipboard::unavailable()),
        ]);
        let err = stack.write_text(&mut doc, "hello").unwrap_err();
        assert!(matches!(err, CopyError::NoClipboardSupport));
        assert!(!stack.is_available());
        assert!(stack.active_tier().is_none());
    }
}
