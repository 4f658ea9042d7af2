//! Boundary to the popup list primitive.
//!
//! The core drives the primitive through [`PopupList`]; the primitive reports
//! activation and hover back through [`SelectCore::on_activate`] and
//! [`SelectCore::on_highlight_change`].
//!
//! [`SelectCore::on_activate`]: super::SelectCore::on_activate
//! [`SelectCore::on_highlight_change`]: super::SelectCore::on_highlight_change

use super::option::SelectOption;
use formselect_core::WidgetId;
use serde::{Deserialize, Serialize};

/// A list renderer the core can show, anchor and dismiss.
pub trait PopupList {
    /// Show `options` with `highlighted` emphasized.
    fn render(&mut self, options: &[SelectOption], highlighted: Option<usize>);

    /// Attach the popup to the control.
    fn anchor_to(&mut self, control: WidgetId);

    /// Hide and detach the popup.
    fn dismiss(&mut self);
}

/// One call received by a [`RecordingPopup`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PopupCall {
    /// `render` with the option values shown and the highlight
    Render {
        /// Values of the rendered options, in order
        options: Vec<String>,
        /// Highlighted index
        highlighted: Option<usize>,
    },
    /// `anchor_to`
    AnchorTo(WidgetId),
    /// `dismiss`
    Dismiss,
}

/// Popup that records calls instead of drawing. Used by tests and replay.
#[derive(Debug, Clone, Default)]
pub struct RecordingPopup {
    calls: Vec<PopupCall>,
}

impl RecordingPopup {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls received so far.
    #[must_use]
    pub fn calls(&self) -> &[PopupCall] {
        &self.calls
    }

    /// Number of calls received.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.len()
    }

    /// Drain the recorded calls.
    pub fn take_calls(&mut self) -> Vec<PopupCall> {
        std::mem::take(&mut self.calls)
    }
}

impl PopupList for RecordingPopup {
    fn render(&mut self, options: &[SelectOption], highlighted: Option<usize>) {
        self.calls.push(PopupCall::Render {
            options: options.iter().map(|o| o.value.clone()).collect(),
            highlighted,
        });
    }

    fn anchor_to(&mut self, control: WidgetId) {
        self.calls.push(PopupCall::AnchorTo(control));
    }

    fn dismiss(&mut self) {
        self.calls.push(PopupCall::Dismiss);
    }
}
