// Activation events - how a copy control gets triggered
//
// A control activates on pointer press or on keyboard Enter/Space while
// focused. Space is consumed by the control so it never scrolls the page;
// the `Handled` result tells the caller whether to stop routing the key.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

/// Result of offering an input event to a control.
///
/// `Yes` means the control consumed the event and it must not bubble up
/// (in particular, a consumed Space must not reach scroll handling).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    Yes,
    No,
}

impl Handled {
    pub fn was_handled(self) -> bool {
        self == Self::Yes
    }
}

/// How a control was activated. Pointer and keyboard activation produce
/// identical outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Pointer,
    Keyboard,
}

/// Map a key event to an activation for a focused control.
///
/// Only Enter and Space activate, and only on a press (terminals that send
/// Repeat/Release events must not re-trigger the copy).
pub fn activation_for_key(key: &KeyEvent) -> Option<Activation> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => Some(Activation::Keyboard),
        _ => None,
    }
}
