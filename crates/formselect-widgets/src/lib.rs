//! Dropdown select control for formselect.
//!
//! The control is split into small reducer-style components composed by
//! [`SelectCore`]:
//! - [`OptionRegistry`]: the ordered option set
//! - [`SelectionModel`]: what is chosen, with ordered change notifications
//! - [`MenuController`]: popup open/closed state, highlight and focus
//! - [`Typeahead`]: prefix jump within the open popup
//! - [`InteractionRouter`]: raw input to [`Intent`]s
//! - [`PopupList`]: the seam to whatever draws the popup

pub mod select;

pub use select::{
    Direction, FocusTarget, Intent, InteractionRouter, MenuController, MenuOutcome, MenuState,
    OptionRegistry, PopupCall, PopupList, RecordingPopup, SelectCore, SelectMessage, SelectOption,
    SelectionModel, SelectionState, Typeahead,
};
