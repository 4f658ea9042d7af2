//! Input events for the select control.
//!
//! Hit-testing belongs to the view, so pointer events arrive already
//! resolved to a [`PointerTarget`].

use serde::{Deserialize, Serialize};

/// Input event types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    /// Pointer button pressed
    PointerDown {
        /// What the pointer landed on
        target: PointerTarget,
        /// Button pressed
        #[serde(default)]
        button: MouseButton,
    },
    /// Pointer button released
    PointerUp {
        /// What the pointer was over on release
        target: PointerTarget,
        /// Button released
        #[serde(default)]
        button: MouseButton,
    },
    /// Pointer moved over a target
    PointerMove {
        /// What the pointer is over
        target: PointerTarget,
    },
    /// Key pressed
    KeyDown {
        /// Key pressed
        key: Key,
    },
    /// Printable text typed
    TextInput {
        /// Input text
        text: String,
    },
    /// Control gained focus
    FocusIn,
    /// Control (including its popup) lost focus
    FocusOut,
}

/// Where a pointer event landed, as resolved by the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerTarget {
    /// The control surface (anchor) itself
    Control,
    /// A rendered option row in the open popup
    Option(usize),
    /// Anywhere outside both the control and the popup
    Outside,
}

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    /// Left mouse button (primary touch and pen contacts map here too)
    #[default]
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button (wheel click)
    Middle,
}

/// Keyboard key identifiers the control reacts to.
///
/// Printable characters arrive as [`Event::TextInput`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    /// Enter/Return key
    Enter,
    /// Escape key
    Escape,
    /// Space bar
    Space,
    /// Tab key
    Tab,
    /// Backspace key
    Backspace,
    /// Home key
    Home,
    /// End key
    End,
    /// Page Up key
    PageUp,
    /// Page Down key
    PageDown,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

impl Event {
    /// Shorthand for a primary-button press.
    #[must_use]
    pub const fn click(target: PointerTarget) -> Self {
        Self::PointerDown {
            target,
            button: MouseButton::Left,
        }
    }

    /// Shorthand for a primary-button release.
    #[must_use]
    pub const fn release(target: PointerTarget) -> Self {
        Self::PointerUp {
            target,
            button: MouseButton::Left,
        }
    }

    /// Shorthand for a key press.
    #[must_use]
    pub const fn key(key: Key) -> Self {
        Self::KeyDown { key }
    }

    /// Shorthand for typed text.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::TextInput { text: text.into() }
    }
}
