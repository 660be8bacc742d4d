// Code-block augmenter
//
// Scans a document for preformatted containers and attaches one copy
// control to each qualifying block. Called once by the host after the
// document is built; blocks added later are not picked up (no mutation
// watching). Re-running is idempotent - a container already carrying a
// control is skipped.

mod button;

#[cfg(test)]
mod tests;

pub use button::CopyButton;

use crate::config::Config;
use crate::dom::{Document, Position};
use std::time::Duration;

/// Class every copy control carries, for external styling.
pub const BUTTON_CLASS: &str = "copy-code-btn";

/// Class present on a control while it is flashing an outcome.
pub const FLASH_CLASS: &str = "copied";

/// Accessible label announced for every control.
const ARIA_LABEL: &str = "Copy code to clipboard";

/// Knobs for augmentation: control labels and flash duration.
#[derive(Debug, Clone)]
pub struct AugmentOptions {
    pub idle_label: String,
    pub copied_label: String,
    pub error_label: String,
    pub flash_duration: Duration,
}

impl Default for AugmentOptions {
    fn default() -> Self {
        Self {
            idle_label: "Copy".to_string(),
            copied_label: "Copied!".to_string(),
            error_label: "Error".to_string(),
            flash_duration: Duration::from_millis(2000),
        }
    }
}

impl AugmentOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            idle_label: config.labels.copy.clone(),
            copied_label: config.labels.copied.clone(),
            error_label: config.labels.error.clone(),
            flash_duration: Duration::from_millis(config.flash_ms),
        }
    }
}

/// Attach one copy control to every eligible preformatted container.
///
/// Eligible means: not already augmented, and wrapping a nested
/// code-content element. A container holding only plain text is skipped.
/// Containers still in default static layout are forced into a positioned
/// context so the control can overlay them without affecting flow.
///
/// Returns the attached controls in document order.
pub fn augment(doc: &mut Document, opts: &AugmentOptions) -> Vec<CopyButton> {
    let mut buttons = Vec::new();

    for pre in doc.elements_by_tag("pre") {
        // Idempotence guard: one control per container, ever.
        if doc.descendant_with_class(pre, BUTTON_CLASS).is_some() {
            tracing::debug!("skipping already-augmented container");
            continue;
        }

        // Only containers actually wrapping code content qualify.
        let Some(code) = doc.descendant_by_tag(pre, "code") else {
            tracing::debug!("skipping container without code content");
            continue;
        };

        // Layout precondition: the overlaid control needs a positioned
        // ancestor that doesn't disturb surrounding flow.
        if doc.computed_position(pre) == Position::Static {
            doc.set_position(pre, Position::Relative);
        }

        let button = doc.create_element("button");
        doc.set_attr(button, "type", "button");
        doc.set_attr(button, "aria-label", ARIA_LABEL);
        doc.add_class(button, BUTTON_CLASS);
        doc.set_text(button, &opts.idle_label);
        doc.append_child(pre, button);

        buttons.push(CopyButton::new(
            button,
            code,
            opts.idle_label.clone(),
            opts.copied_label.clone(),
            opts.error_label.clone(),
            opts.flash_duration,
        ));
    }

    tracing::info!("attached {} copy control(s)", buttons.len());
    buttons
}
