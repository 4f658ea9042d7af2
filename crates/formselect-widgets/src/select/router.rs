//! Raw input to intent translation.
//!
//! | state  | input                               | intent            |
//! |--------|-------------------------------------|-------------------|
//! | any    | pointer down on control             | toggle            |
//! | open   | pointer down on option `i`          | commit `i`        |
//! | open   | pointer down outside                | cancel            |
//! | open   | pointer over option `i`             | highlight `i`     |
//! | closed | Enter, Space, ArrowDown, ArrowUp    | open              |
//! | open   | ArrowDown / ArrowUp                 | move highlight    |
//! | open   | Home / End                          | first / last      |
//! | open   | Enter / Space                       | commit highlight  |
//! | open   | Escape                              | cancel            |
//! | open   | printable text                      | typeahead         |
//! | any    | focus in                            | focus             |
//! | any    | focus out, no pointer press pending | blur              |
//! | any    | pointer up after a held-back blur   | blur              |

use super::option::Direction;
use formselect_core::{Event, Key, MouseButton, PointerTarget};

/// What the user asked for, independent of the input device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Open the menu
    Open,
    /// Open if closed, close without commit if open
    Toggle,
    /// Move the highlight one enabled option
    Move(Direction),
    /// Highlight the first enabled option
    First,
    /// Highlight the last enabled option
    Last,
    /// Highlight a specific option
    Highlight(usize),
    /// Jump the highlight by typed prefix
    Typeahead(String),
    /// Select the highlighted option and close
    Commit,
    /// Select a specific option and close
    CommitIndex(usize),
    /// Close without selecting
    Cancel,
    /// The control gained focus
    Focus,
    /// The control lost focus
    Blur,
}

/// Maps [`Event`]s to [`Intent`]s.
///
/// Tracks whether a pointer press is in flight so that the focus loss a
/// press on the popup causes does not close the menu under the pointer.
/// A blur held back that way is emitted on release unless focus came back
/// first. Any focus change ends the press, so a lost release never
/// suppresses more than one blur.
#[derive(Debug, Clone, Default)]
pub struct InteractionRouter {
    pointer_down: bool,
    blur_pending: bool,
}

impl InteractionRouter {
    /// Create a router with no pointer press pending.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pointer_down: false,
            blur_pending: false,
        }
    }

    /// Whether a pointer press has not yet been released.
    #[must_use]
    pub const fn pointer_in_flight(&self) -> bool {
        self.pointer_down
    }

    /// Whether a focus loss is waiting for the pointer release.
    #[must_use]
    pub const fn blur_pending(&self) -> bool {
        self.blur_pending
    }

    /// Forget any pending pointer press and held-back blur.
    pub fn reset(&mut self) {
        self.pointer_down = false;
        self.blur_pending = false;
    }

    /// Translate one event given whether the menu is open.
    pub fn route(&mut self, event: &Event, open: bool) -> Option<Intent> {
        let intent = match event {
            Event::PointerDown {
                target,
                button: MouseButton::Left,
            } => {
                self.pointer_down = true;
                self.blur_pending = false;
                match (target, open) {
                    (PointerTarget::Control, _) => Some(Intent::Toggle),
                    (PointerTarget::Option(index), true) => Some(Intent::CommitIndex(*index)),
                    (PointerTarget::Outside, true) => {
                        self.pointer_down = false;
                        Some(Intent::Cancel)
                    }
                    _ => {
                        self.pointer_down = false;
                        None
                    }
                }
            }
            Event::PointerDown { .. } => None,
            Event::PointerUp { .. } => {
                self.pointer_down = false;
                std::mem::take(&mut self.blur_pending).then_some(Intent::Blur)
            }
            Event::PointerMove {
                target: PointerTarget::Option(index),
            } if open => Some(Intent::Highlight(*index)),
            Event::PointerMove { .. } => None,
            Event::KeyDown { key } => Self::route_key(*key, open),
            Event::TextInput { text } if open => Some(Intent::Typeahead(text.clone())),
            Event::TextInput { .. } => None,
            Event::FocusIn => {
                self.reset();
                Some(Intent::Focus)
            }
            Event::FocusOut if self.pointer_down => {
                self.pointer_down = false;
                self.blur_pending = true;
                None
            }
            Event::FocusOut => {
                self.blur_pending = false;
                Some(Intent::Blur)
            }
        };
        tracing::trace!(?event, ?intent, open, "routed");
        intent
    }

    fn route_key(key: Key, open: bool) -> Option<Intent> {
        if !open {
            return matches!(key, Key::Enter | Key::Space | Key::Down | Key::Up)
                .then_some(Intent::Open);
        }
        match key {
            Key::Down => Some(Intent::Move(Direction::Forward)),
            Key::Up => Some(Intent::Move(Direction::Backward)),
            Key::Home | Key::PageUp => Some(Intent::First),
            Key::End | Key::PageDown => Some(Intent::Last),
            Key::Enter | Key::Space => Some(Intent::Commit),
            Key::Escape => Some(Intent::Cancel),
            Key::Tab | Key::Backspace | Key::Left | Key::Right => None,
        }
    }
}
