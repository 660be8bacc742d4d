//! Augmentation and activation flow tests.
//!
//! These exercise the full contract on hand-built documents with fake
//! clipboard tiers: discovery rules, the activation outcomes, flash
//! timing, and the fallback cleanup invariant.

use super::*;
use crate::clipboard::test_support::FakeClipboard;
use crate::clipboard::{ClipboardStack, CopyError, SelectionCommand, SelectionCopy};
use crate::dom::{Document, NodeId};
use crate::events::{activation_for_key, Activation};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::io;
use std::time::{Duration, Instant};

/// Build `<pre><code>{text}</code></pre>` under the root.
fn add_code_block(doc: &mut Document, text: &str) -> (NodeId, NodeId) {
    let pre = doc.create_element("pre");
    let code = doc.create_element("code");
    let content = doc.create_text(text);
    doc.append_child(code, content);
    doc.append_child(pre, code);
    let root = doc.root();
    doc.append_child(root, pre);
    (pre, code)
}

/// Build `<pre>plain text</pre>` (no code element) under the root.
fn add_bare_pre(doc: &mut Document, text: &str) -> NodeId {
    let pre = doc.create_element("pre");
    let content = doc.create_text(text);
    doc.append_child(pre, content);
    let root = doc.root();
    doc.append_child(root, pre);
    pre
}

fn working_clipboard() -> ClipboardStack {
    ClipboardStack::with_tiers(vec![Box::new(FakeClipboard::working())])
}

fn dead_clipboard() -> ClipboardStack {
    ClipboardStack::with_tiers(vec![Box::new(FakeClipboard::unavailable())])
}

// ── Discovery ───────────────────────────────────────────────────────────

#[test]
fn one_control_per_eligible_container() {
    let mut doc = Document::new();
    add_code_block(&mut doc, "a");
    add_code_block(&mut doc, "b");
    add_bare_pre(&mut doc, "not code");

    let buttons = augment(&mut doc, &AugmentOptions::default());
    assert_eq!(buttons.len(), 2);

    let controls: Vec<_> = doc
        .elements_by_tag("button")
        .into_iter()
        .filter(|&b| doc.has_class(b, BUTTON_CLASS))
        .collect();
    assert_eq!(controls.len(), 2);
}

#[test]
fn rerunning_augmentation_is_idempotent() {
    let mut doc = Document::new();
    add_code_block(&mut doc, "a");

    let first = augment(&mut doc, &AugmentOptions::default());
    let second = augment(&mut doc, &AugmentOptions::default());

    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
    assert_eq!(doc.elements_by_tag("button").len(), 1);
}

#[test]
fn container_without_code_is_never_augmented() {
    let mut doc = Document::new();
    let pre = add_bare_pre(&mut doc, "plain");
    let buttons = augment(&mut doc, &AugmentOptions::default());
    assert!(buttons.is_empty());
    assert!(doc.descendant_with_class(pre, BUTTON_CLASS).is_none());
}

#[test]
fn static_container_is_forced_into_positioned_layout() {
    let mut doc = Document::new();
    let (pre, _) = add_code_block(&mut doc, "a");
    assert_eq!(doc.computed_position(pre), crate::dom::Position::Static);

    augment(&mut doc, &AugmentOptions::default());
    assert_eq!(doc.computed_position(pre), crate::dom::Position::Relative);
}

#[test]
fn positioned_container_keeps_its_layout() {
    let mut doc = Document::new();
    let (pre, _) = add_code_block(&mut doc, "a");
    doc.set_position(pre, crate::dom::Position::Fixed);

    augment(&mut doc, &AugmentOptions::default());
    assert_eq!(doc.computed_position(pre), crate::dom::Position::Fixed);
}

#[test]
fn control_is_last_child_with_label_and_accessibility_attrs() {
    let mut doc = Document::new();
    let (pre, _) = add_code_block(&mut doc, "a");

    let buttons = augment(&mut doc, &AugmentOptions::default());
    let control = buttons[0].node();

    assert_eq!(doc.children(pre).last(), Some(&control));
    assert_eq!(doc.tag(control), Some("button"));
    assert_eq!(doc.attr(control, "type"), Some("button"));
    assert_eq!(
        doc.attr(control, "aria-label"),
        Some("Copy code to clipboard")
    );
    assert!(doc.has_class(control, BUTTON_CLASS));
    assert_eq!(doc.visible_text(control), "Copy");
}

// ── Activation ──────────────────────────────────────────────────────────

#[test]
fn activation_copies_exactly_the_visible_text() {
    let mut doc = Document::new();
    let (_, code) = add_code_block(&mut doc, "let x = ");
    // Emphasized markup inside the code element must not leak into the copy.
    let em = doc.create_element("em");
    let word = doc.create_text("value");
    doc.append_child(em, word);
    doc.append_child(code, em);
    let tail = doc.create_text(";");
    doc.append_child(code, tail);

    let mut buttons = augment(&mut doc, &AugmentOptions::default());
    let mut fake = FakeClipboard::working();
    buttons[0]
        .activate(&mut doc, &mut fake, Instant::now())
        .unwrap();

    assert_eq!(fake.writes, vec!["let x = value;".to_string()]);
}

#[test]
fn success_flashes_copied_then_reverts_after_the_full_duration() {
    let mut doc = Document::new();
    add_code_block(&mut doc, "a");
    let mut buttons = augment(&mut doc, &AugmentOptions::default());
    let mut clipboard = working_clipboard();

    let t0 = Instant::now();
    buttons[0].activate(&mut doc, &mut clipboard, t0).unwrap();

    let control = buttons[0].node();
    assert_eq!(doc.visible_text(control), "Copied!");
    assert!(doc.has_class(control, FLASH_CLASS));

    // Never reverts early.
    buttons[0].tick(&mut doc, t0 + Duration::from_millis(1999));
    assert_eq!(doc.visible_text(control), "Copied!");
    assert!(buttons[0].is_flashing());

    buttons[0].tick(&mut doc, t0 + Duration::from_millis(2000));
    assert_eq!(doc.visible_text(control), "Copy");
    assert!(!doc.has_class(control, FLASH_CLASS));
    assert!(!buttons[0].is_flashing());
}

#[test]
fn failure_flashes_error_and_reverts_on_the_same_schedule() {
    let mut doc = Document::new();
    add_code_block(&mut doc, "a");
    let mut buttons = augment(&mut doc, &AugmentOptions::default());
    let mut clipboard = dead_clipboard();

    let t0 = Instant::now();
    let err = buttons[0]
        .activate(&mut doc, &mut clipboard, t0)
        .unwrap_err();
    assert!(matches!(err, CopyError::NoClipboardSupport));

    let control = buttons[0].node();
    assert_eq!(doc.visible_text(control), "Error");
    assert!(doc.has_class(control, FLASH_CLASS));

    buttons[0].tick(&mut doc, t0 + Duration::from_millis(2000));
    assert_eq!(doc.visible_text(control), "Copy");
    assert!(!doc.has_class(control, FLASH_CLASS));
}

#[test]
fn reactivation_replaces_the_outstanding_revert_deadline() {
    let mut doc = Document::new();
    add_code_block(&mut doc, "a");
    let mut buttons = augment(&mut doc, &AugmentOptions::default());
    let mut clipboard = working_clipboard();

    let t0 = Instant::now();
    buttons[0].activate(&mut doc, &mut clipboard, t0).unwrap();
    // Second activation mid-flash: its deadline supersedes the first.
    buttons[0]
        .activate(&mut doc, &mut clipboard, t0 + Duration::from_millis(1500))
        .unwrap();

    let control = buttons[0].node();

    // The first activation's deadline passing must not revert the newer flash.
    buttons[0].tick(&mut doc, t0 + Duration::from_millis(2100));
    assert_eq!(doc.visible_text(control), "Copied!");
    assert!(buttons[0].is_flashing());

    buttons[0].tick(&mut doc, t0 + Duration::from_millis(3500));
    assert_eq!(doc.visible_text(control), "Copy");
}

#[test]
fn keyboard_activation_matches_pointer_activation() {
    for code in [KeyCode::Enter, KeyCode::Char(' ')] {
        let key = KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(activation_for_key(&key), Some(Activation::Keyboard));

        let mut doc = Document::new();
        add_code_block(&mut doc, "same outcome");
        let mut buttons = augment(&mut doc, &AugmentOptions::default());
        let mut fake = FakeClipboard::working();
        buttons[0]
            .activate(&mut doc, &mut fake, Instant::now())
            .unwrap();
        assert_eq!(fake.writes, vec!["same outcome".to_string()]);
        assert_eq!(doc.visible_text(buttons[0].node()), "Copied!");
    }
}

#[test]
fn custom_labels_and_duration_come_from_options() {
    let mut doc = Document::new();
    add_code_block(&mut doc, "a");
    let opts = AugmentOptions {
        idle_label: "Yank".to_string(),
        copied_label: "Yanked".to_string(),
        error_label: "Nope".to_string(),
        flash_duration: Duration::from_millis(500),
    };
    let mut buttons = augment(&mut doc, &opts);
    let control = buttons[0].node();
    assert_eq!(doc.visible_text(control), "Yank");

    let t0 = Instant::now();
    let mut clipboard = working_clipboard();
    buttons[0].activate(&mut doc, &mut clipboard, t0).unwrap();
    assert_eq!(doc.visible_text(control), "Yanked");

    buttons[0].tick(&mut doc, t0 + Duration::from_millis(500));
    assert_eq!(doc.visible_text(control), "Yank");
}

// ── Fallback path, end to end ───────────────────────────────────────────

/// Command that always reports failure, for exercising cleanup.
struct RefusingCommand;

impl SelectionCommand for RefusingCommand {
    fn copy_selection(&mut self, _doc: &Document) -> io::Result<bool> {
        Ok(false)
    }
}

#[test]
fn failed_fallback_leaves_no_staging_element_behind() {
    let mut doc = Document::new();
    add_code_block(&mut doc, "payload");
    let mut buttons = augment(&mut doc, &AugmentOptions::default());

    // Tier 1 unavailable, tier 2 runs and fails.
    let mut clipboard = ClipboardStack::with_tiers(vec![
        Box::new(FakeClipboard::unavailable()),
        Box::new(SelectionCopy::new(RefusingCommand)),
    ]);

    let err = buttons[0]
        .activate(&mut doc, &mut clipboard, Instant::now())
        .unwrap_err();
    assert!(matches!(err, CopyError::CommandFailed(_)));

    // The document holds only the original block and its control.
    assert!(doc.elements_by_tag("textarea").is_empty());
    assert_eq!(doc.visible_text(buttons[0].node()), "Error");
}
