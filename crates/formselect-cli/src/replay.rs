//! Scripted replay of input against a [`SelectCore`].
//!
//! A script is a YAML list of steps:
//!
//! ```yaml
//! - event: focus_in
//! - event: { key_down: { key: down } }
//! - event: { text_input: { text: u } }
//! - advance_ms: 100
//! - set_value: us
//! - set_required: true
//! - select: 2
//! - open
//! - close
//! - flush
//! ```

use anyhow::Context;
use formselect_core::{Event, ManualClock, ValidityState, WidgetId};
use formselect_widgets::{FocusTarget, PopupCall, RecordingPopup, SelectCore, SelectMessage};
use formselect_yaml::SelectManifest;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Control id used for replayed controls.
const REPLAY_WIDGET_ID: WidgetId = WidgetId(1);

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Route a raw input event
    Event(Event),
    /// Advance the replay clock
    AdvanceMs(u64),
    /// Externally assign the form value
    SetValue(String),
    /// Change the required flag
    SetRequired(bool),
    /// Programmatically select an index
    Select(usize),
    /// Programmatically open
    Open,
    /// Programmatically close
    Close,
    /// Run a render pass against the recording popup
    Flush,
}

/// Parse a replay script.
///
/// # Errors
///
/// Returns an error if the YAML is not a list of steps.
pub fn parse_script(yaml: &str) -> anyhow::Result<Vec<Step>> {
    // Enum variants are written as single-key maps at every level.
    let deserializer = serde_yaml_ng::Deserializer::from_str(yaml);
    serde_yaml_ng::with::singleton_map_recursive::deserialize(deserializer)
        .context("failed to parse replay script")
}

/// Final state after a replay.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    /// Selected value or `""`
    pub value: String,
    /// Selected index
    pub selected_index: Option<usize>,
    /// Display text of the selection or `""`
    pub selected_text: String,
    /// Whether the popup is open
    pub open: bool,
    /// Highlighted index while open
    pub highlighted_index: Option<usize>,
    /// Logical focus
    pub focus: FocusTarget,
    /// Validity
    pub validity: ValidityState,
    /// Whether the error is shown
    pub show_error: bool,
    /// Current validation message
    pub validation_message: String,
    /// Submission pair
    pub form_data: Option<(String, String)>,
    /// Every message emitted, in order
    pub messages: Vec<SelectMessage>,
    /// Every popup call made by flush steps
    pub popup_calls: Vec<PopupCall>,
    /// Recovered conditions
    pub diagnostics: Vec<String>,
    /// Render passes run
    pub render_passes: u64,
}

/// Run `steps` against a control built from `manifest`.
#[must_use]
pub fn replay(manifest: &SelectManifest, steps: &[Step]) -> ReplayReport {
    let clock = ManualClock::new();
    let mut core = SelectCore::from_manifest(REPLAY_WIDGET_ID, manifest).with_clock(clock.clone());
    let mut popup = RecordingPopup::new();
    let mut messages = Vec::new();
    let mut render_passes = 0;

    for (index, step) in steps.iter().enumerate() {
        tracing::debug!(index, ?step, "replay step");
        match step {
            Step::Event(event) => messages.extend(core.handle_event(event)),
            Step::AdvanceMs(ms) => clock.advance(*ms),
            Step::SetValue(value) => messages.extend(core.set_value(value)),
            Step::SetRequired(required) => messages.extend(core.set_required(*required)),
            Step::Select(option) => messages.extend(core.select(*option)),
            Step::Open => messages.extend(core.open()),
            Step::Close => messages.extend(core.close()),
            Step::Flush => {
                if core.flush(&mut popup).is_some() {
                    render_passes += 1;
                }
            }
        }
    }
    tracing::info!(steps = steps.len(), messages = messages.len(), "replay finished");

    ReplayReport {
        value: core.value().to_string(),
        selected_index: core.selected_index(),
        selected_text: core.selected_text().to_string(),
        open: core.is_open(),
        highlighted_index: core.highlighted_index(),
        focus: core.focus(),
        validity: core.validity().clone(),
        show_error: core.show_error(),
        validation_message: core.validation_message().to_string(),
        form_data: core.form_data(),
        messages,
        popup_calls: popup.take_calls(),
        diagnostics: core
            .take_diagnostics()
            .iter()
            .map(ToString::to_string)
            .collect(),
        render_passes,
    }
}

impl fmt::Display for ReplayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "value:       {:?}", self.value)?;
        writeln!(f, "index:       {}", display_index(self.selected_index))?;
        writeln!(f, "text:        {:?}", self.selected_text)?;
        writeln!(f, "open:        {}", self.open)?;
        writeln!(f, "highlight:   {}", display_index(self.highlighted_index))?;
        writeln!(f, "focus:       {:?}", self.focus)?;
        if self.validity.valid {
            writeln!(f, "validity:    valid")?;
        } else {
            writeln!(
                f,
                "validity:    {:?} ({})",
                self.validity.reason, self.validation_message
            )?;
        }
        writeln!(f, "show error:  {}", self.show_error)?;
        match &self.form_data {
            Some((name, value)) => writeln!(f, "form data:   {name}={value}")?,
            None => writeln!(f, "form data:   -")?,
        }
        writeln!(f, "renders:     {}", self.render_passes)?;

        writeln!(f, "messages:")?;
        for message in &self.messages {
            writeln!(f, "  {message:?}")?;
        }
        if !self.popup_calls.is_empty() {
            writeln!(f, "popup:")?;
            for call in &self.popup_calls {
                writeln!(f, "  {call:?}")?;
            }
        }
        if !self.diagnostics.is_empty() {
            writeln!(f, "diagnostics:")?;
            for diagnostic in &self.diagnostics {
                writeln!(f, "  {diagnostic}")?;
            }
        }
        Ok(())
    }
}

fn display_index(index: Option<usize>) -> String {
    index.map_or_else(|| "-".to_string(), |i| i.to_string())
}
