//! Dropdown select control.
//!
//! [`SelectCore`] is the composition root. Input flows one way:
//!
//! ```text
//! Event -> InteractionRouter -> Intent -> MenuController -> MenuOutcome
//!                                                 |
//!                          SelectionModel <-------+  (commit)
//!                                 |
//!                          ValidationEngine -> RenderScheduler -> PopupList
//! ```
//!
//! Every transition runs synchronously inside the call that triggered it.
//! The popup is reconciled later, once per task, by [`SelectCore::flush`].

mod menu;
mod option;
mod popup;
mod router;
mod selection;
mod typeahead;

pub use menu::{FocusTarget, MenuController, MenuOutcome, MenuState};
pub use option::{Direction, OptionRegistry, SelectOption};
pub use popup::{PopupCall, PopupList, RecordingPopup};
pub use router::{Intent, InteractionRouter};
pub use selection::{SelectionModel, SelectionState};
pub use typeahead::Typeahead;

use formselect_core::{
    Change, Clock, Diagnostic, Event, MenuError, RenderPass, RenderScheduler, SelectionError,
    SubscriptionId, SystemClock, ValidationEngine, Validator, ValidityReason, ValidityState,
    WidgetId, DEFAULT_VALUE_MISSING_MESSAGE,
};
use formselect_yaml::{SelectConfig, SelectManifest};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outbound notification from a [`SelectCore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectMessage {
    /// The popup opened
    Opened,
    /// The popup closed
    Closed,
    /// The selection changed
    Selected {
        /// New selected index
        index: Option<usize>,
        /// New selected value
        value: Option<String>,
    },
    /// The user-visible error turned on
    Invalid {
        /// Failure reason
        reason: ValidityReason,
        /// Message to display
        message: String,
    },
}

impl From<&SelectionState> for SelectMessage {
    fn from(state: &SelectionState) -> Self {
        Self::Selected {
            index: state.selected_index,
            value: state.selected_value.clone(),
        }
    }
}

/// Dropdown select control core.
///
/// Owns one instance of each component; nothing is shared between controls.
pub struct SelectCore {
    id: WidgetId,
    registry: OptionRegistry,
    selection: SelectionModel,
    menu: MenuController,
    router: InteractionRouter,
    validation: ValidationEngine,
    scheduler: RenderScheduler,
    clock: Box<dyn Clock>,
    name: Option<String>,
    disabled: bool,
    default_value: Option<String>,
    touched: bool,
    show_error: bool,
    validate_on_initial_render: bool,
    validation_message: Option<String>,
    anchored: bool,
    diagnostics: Vec<Diagnostic>,
}

impl fmt::Debug for SelectCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectCore")
            .field("id", &self.id)
            .field("options", &self.registry.len())
            .field("selection", self.selection.state())
            .field("menu", &self.menu.state())
            .field("validity", self.validation.validity())
            .field("disabled", &self.disabled)
            .field("show_error", &self.show_error)
            .finish_non_exhaustive()
    }
}

impl SelectCore {
    /// Create an empty, closed control reading the system clock.
    #[must_use]
    pub fn new(id: WidgetId) -> Self {
        Self {
            id,
            registry: OptionRegistry::default(),
            selection: SelectionModel::new(),
            menu: MenuController::default(),
            router: InteractionRouter::new(),
            validation: ValidationEngine::new(),
            scheduler: RenderScheduler::new(),
            clock: Box::new(SystemClock::new()),
            name: None,
            disabled: false,
            default_value: None,
            touched: false,
            show_error: false,
            validate_on_initial_render: false,
            validation_message: None,
            anchored: false,
            diagnostics: Vec::new(),
        }
    }

    /// Replace the clock used for typeahead timing.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Apply behavioral configuration.
    #[must_use]
    pub fn with_config(mut self, config: &SelectConfig) -> Self {
        self.registry.set_policy(config.navigation);
        self.menu.set_typeahead_timeout_ms(config.typeahead_timeout_ms);
        self.name.clone_from(&config.name);
        self.validate_on_initial_render = config.validate_on_initial_render;
        self.validation_message.clone_from(&config.validation_message);
        self.validation.set_required(config.required);
        self.disabled = config.disabled;
        self.validation.set_barred(config.disabled);
        self.update_error_display(&mut Vec::new());
        self
    }

    /// Build a control from a manifest.
    ///
    /// The manifest's `selected` value becomes both the initial selection and
    /// the value restored by [`reset`](Self::reset).
    #[must_use]
    pub fn from_manifest(id: WidgetId, manifest: &SelectManifest) -> Self {
        let mut core = Self::new(id).with_config(&manifest.config);
        core.set_options(manifest.options.iter().map(SelectOption::from));
        if let Some(selected) = &manifest.selected {
            core.select_by_value(selected);
        }
        core.default_value.clone_from(&manifest.selected);
        core
    }

    /// Control identity used when anchoring the popup.
    #[must_use]
    pub const fn id(&self) -> WidgetId {
        self.id
    }

    // =========================================================================
    // Options
    // =========================================================================

    /// Replace the full option set.
    ///
    /// The selection survives only if its value still names an enabled
    /// option. An open menu re-highlights, or is forced closed when nothing
    /// enabled remains.
    pub fn set_options(
        &mut self,
        options: impl IntoIterator<Item = SelectOption>,
    ) -> Vec<SelectMessage> {
        let mut messages = Vec::new();
        self.registry.set_options(options);
        self.scheduler.invalidate();

        if let Some(change) = self.selection.rebuild(&self.registry) {
            self.on_selection_change(&change, &mut messages);
        }
        let selected = self.selection.selected_index();
        if self.menu.sync(&self.registry, selected) == MenuOutcome::ForcedClosed {
            self.record(MenuError::NoEnabledOptions.into());
            messages.push(SelectMessage::Closed);
        }
        messages
    }

    /// All options in order.
    #[must_use]
    pub fn options(&self) -> &[SelectOption] {
        self.registry.options()
    }

    /// The option registry.
    #[must_use]
    pub const fn registry(&self) -> &OptionRegistry {
        &self.registry
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Select the option at `index`. Invalid requests are recorded as
    /// diagnostics and change nothing.
    pub fn select(&mut self, index: usize) -> Vec<SelectMessage> {
        let result = self.selection.select(&self.registry, index);
        self.apply_selection(result)
    }

    /// Select the first option carrying `value`.
    pub fn select_by_value(&mut self, value: &str) -> Vec<SelectMessage> {
        let result = self.selection.select_by_value(&self.registry, value);
        self.apply_selection(result)
    }

    /// Clear the selection.
    pub fn clear(&mut self) -> Vec<SelectMessage> {
        let change = self.selection.clear();
        self.apply_selection(Ok(change))
    }

    /// Externally assign the form value.
    ///
    /// A value with no matching option clears the selection. A value naming
    /// a disabled option is rejected.
    pub fn set_value(&mut self, value: &str) -> Vec<SelectMessage> {
        match self.selection.select_by_value(&self.registry, value) {
            Err(SelectionError::NoMatchingValue { .. }) => self.clear(),
            result => self.apply_selection(result),
        }
    }

    /// Selected value, or `""`.
    #[must_use]
    pub fn value(&self) -> &str {
        self.selection.selected_value().unwrap_or("")
    }

    /// Display text of the selected option, or `""`.
    #[must_use]
    pub fn selected_text(&self) -> &str {
        self.selection
            .selected_index()
            .and_then(|i| self.registry.get_by_index(i))
            .map_or("", |option| option.text.as_str())
    }

    /// Selected index.
    #[must_use]
    pub const fn selected_index(&self) -> Option<usize> {
        self.selection.selected_index()
    }

    /// Full selection state.
    #[must_use]
    pub const fn selection(&self) -> &SelectionState {
        self.selection.state()
    }

    /// Subscribe to every selection change, in order.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Change<SelectionState>) + Send + 'static,
    {
        self.selection.subscribe(callback)
    }

    /// Remove a selection subscriber.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.selection.unsubscribe(id)
    }

    // =========================================================================
    // Menu
    // =========================================================================

    /// Route one raw input event. A disabled control ignores all input.
    pub fn handle_event(&mut self, event: &Event) -> Vec<SelectMessage> {
        if self.disabled {
            return Vec::new();
        }
        match self.router.route(event, self.menu.is_open()) {
            Some(intent) => self.dispatch(&intent),
            None => Vec::new(),
        }
    }

    /// Programmatically open the popup.
    pub fn open(&mut self) -> Vec<SelectMessage> {
        if self.disabled {
            return Vec::new();
        }
        self.dispatch(&Intent::Open)
    }

    /// Programmatically close the popup without committing.
    pub fn close(&mut self) -> Vec<SelectMessage> {
        self.dispatch(&Intent::Cancel)
    }

    /// The popup activated option `index`.
    pub fn on_activate(&mut self, index: usize) -> Vec<SelectMessage> {
        if self.disabled {
            return Vec::new();
        }
        self.dispatch(&Intent::CommitIndex(index))
    }

    /// The popup moved its highlight to `index`.
    pub fn on_highlight_change(&mut self, index: usize) -> Vec<SelectMessage> {
        if self.disabled {
            return Vec::new();
        }
        self.dispatch(&Intent::Highlight(index))
    }

    /// Popup state.
    #[must_use]
    pub const fn menu_state(&self) -> MenuState {
        self.menu.state()
    }

    /// Whether the popup is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.menu.is_open()
    }

    /// Highlighted option while open.
    #[must_use]
    pub const fn highlighted_index(&self) -> Option<usize> {
        self.menu.highlighted_index()
    }

    /// Logical focus.
    #[must_use]
    pub const fn focus(&self) -> FocusTarget {
        self.menu.focus()
    }

    // =========================================================================
    // Validity
    // =========================================================================

    /// Current validity.
    #[must_use]
    pub const fn validity(&self) -> &ValidityState {
        self.validation.validity()
    }

    /// Whether a selection is required.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.validation.is_required()
    }

    /// Change the required flag.
    pub fn set_required(&mut self, required: bool) -> Vec<SelectMessage> {
        self.validation.set_required(required);
        self.after_validity_input()
    }

    /// Install a custom validator.
    pub fn set_validator<V: Validator + 'static>(&mut self, validator: V) -> Vec<SelectMessage> {
        self.validation.set_validator(validator);
        self.after_validity_input()
    }

    /// Remove the custom validator.
    pub fn clear_validator(&mut self) -> Vec<SelectMessage> {
        self.validation.clear_validator();
        self.after_validity_input()
    }

    /// Set an explicit custom error. An empty message clears it.
    pub fn set_custom_validity(&mut self, message: &str) -> Vec<SelectMessage> {
        self.validation.set_custom_validity(message);
        self.after_validity_input()
    }

    /// Whether the control is valid. Leaves the error display alone.
    #[must_use]
    pub const fn check_validity(&self) -> bool {
        self.validation.validity().is_valid()
    }

    /// Whether the control is valid, showing the error if it is not.
    pub fn report_validity(&mut self) -> bool {
        let valid = self.check_validity();
        self.set_show_error(!valid);
        valid
    }

    /// Whether the user-visible error is shown.
    #[must_use]
    pub const fn show_error(&self) -> bool {
        self.show_error
    }

    /// Message describing the current failure, or `""` when valid.
    #[must_use]
    pub fn validation_message(&self) -> &str {
        let validity = self.validation.validity();
        match validity.reason {
            ValidityReason::None => "",
            ValidityReason::CustomError => validity.custom_message.as_deref().unwrap_or(""),
            ValidityReason::ValueMissing => self
                .validation_message
                .as_deref()
                .unwrap_or(DEFAULT_VALUE_MISSING_MESSAGE),
        }
    }

    // =========================================================================
    // Form association
    // =========================================================================

    /// Form field name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set or clear the form field name.
    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    /// Whether the control is disabled.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Enable or disable the whole control.
    ///
    /// Disabling closes an open popup without committing and bars the
    /// control from validation.
    pub fn set_disabled(&mut self, disabled: bool) -> Vec<SelectMessage> {
        let mut messages = Vec::new();
        if self.disabled == disabled {
            return messages;
        }
        self.disabled = disabled;
        if disabled {
            self.router.reset();
            if self.menu.close() == MenuOutcome::Closed {
                messages.push(SelectMessage::Closed);
            }
        }
        self.validation.set_barred(disabled);
        self.scheduler.invalidate();
        self.update_error_display(&mut messages);
        tracing::debug!(disabled, "disabled changed");
        messages
    }

    /// Name/value pair for form submission.
    ///
    /// `None` for a disabled or unnamed control. No selection submits `""`.
    #[must_use]
    pub fn form_data(&self) -> Option<(String, String)> {
        if self.disabled {
            return None;
        }
        let name = self.name.as_ref()?;
        Some((name.clone(), self.value().to_string()))
    }

    /// Value restored by [`reset`](Self::reset).
    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// Change the value restored by [`reset`](Self::reset).
    pub fn set_default_value(&mut self, value: Option<String>) {
        self.default_value = value;
    }

    /// Form reset: close, restore the default selection, forget interaction.
    ///
    /// A default that no longer names an option leaves nothing selected.
    pub fn reset(&mut self) -> Vec<SelectMessage> {
        let mut messages = Vec::new();
        if self.menu.close() == MenuOutcome::Closed {
            messages.push(SelectMessage::Closed);
        }
        self.router.reset();
        self.touched = false;
        self.show_error = false;

        let result = match self.default_value.clone() {
            Some(value) => match self.selection.select_by_value(&self.registry, &value) {
                Err(SelectionError::NoMatchingValue { .. }) => Ok(self.selection.clear()),
                result => result,
            },
            None => Ok(self.selection.clear()),
        };
        messages.extend(self.apply_selection(result));
        self.update_error_display(&mut messages);
        self.scheduler.invalidate();
        messages
    }

    // =========================================================================
    // Rendering and diagnostics
    // =========================================================================

    /// Whether a render pass is due.
    #[must_use]
    pub const fn needs_render(&self) -> bool {
        self.scheduler.is_dirty()
    }

    /// Reconcile the popup with the latest state.
    ///
    /// Runs at most one pass however many mutations preceded it, and reflects
    /// only the state at the time of the call.
    pub fn flush(&mut self, popup: &mut dyn PopupList) -> Option<RenderPass> {
        let pass = self.scheduler.begin_pass()?;
        if self.menu.is_open() {
            if !self.anchored {
                popup.anchor_to(self.id);
                self.anchored = true;
            }
            popup.render(self.registry.options(), self.menu.highlighted_index());
        } else if self.anchored {
            popup.dismiss();
            self.anchored = false;
        }
        tracing::debug!(
            generation = pass.generation,
            coalesced = pass.coalesced,
            open = self.menu.is_open(),
            "render pass"
        );
        Some(pass)
    }

    /// Recovered conditions recorded since the last drain.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Drain recorded diagnostics.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn dispatch(&mut self, intent: &Intent) -> Vec<SelectMessage> {
        let mut messages = Vec::new();
        let now_ms = self.clock.now_ms();
        let selected = self.selection.selected_index();

        match self.menu.reduce(intent, &self.registry, selected, now_ms) {
            Ok(outcome) => self.apply_outcome(outcome, &mut messages),
            Err(diagnostic) => self.record(diagnostic),
        }
        if *intent == Intent::Blur {
            self.touched = true;
            self.update_error_display(&mut messages);
        }
        messages
    }

    fn apply_outcome(&mut self, outcome: MenuOutcome, messages: &mut Vec<SelectMessage>) {
        match outcome {
            MenuOutcome::Unchanged => return,
            MenuOutcome::Opened => messages.push(SelectMessage::Opened),
            MenuOutcome::Highlighted(_) => {}
            MenuOutcome::Committed(index) => {
                match self.selection.select(&self.registry, index) {
                    Ok(Some(change)) => self.on_selection_change(&change, messages),
                    Ok(None) => {}
                    Err(err) => self.record(err.into()),
                }
                self.touched = true;
                self.update_error_display(messages);
                self.menu.close();
                messages.push(SelectMessage::Closed);
            }
            MenuOutcome::Closed | MenuOutcome::ForcedClosed => {
                messages.push(SelectMessage::Closed);
            }
        }
        self.scheduler.invalidate();
    }

    fn apply_selection(
        &mut self,
        result: Result<Option<Change<SelectionState>>, SelectionError>,
    ) -> Vec<SelectMessage> {
        let mut messages = Vec::new();
        match result {
            Ok(Some(change)) => self.on_selection_change(&change, &mut messages),
            Ok(None) => {}
            Err(err) => self.record(err.into()),
        }
        messages
    }

    fn on_selection_change(
        &mut self,
        change: &Change<SelectionState>,
        messages: &mut Vec<SelectMessage>,
    ) {
        messages.push(SelectMessage::from(&change.new));
        self.validation
            .on_value_change(change.new.selected_value.as_deref());
        self.update_error_display(messages);
        self.scheduler.invalidate();
    }

    fn after_validity_input(&mut self) -> Vec<SelectMessage> {
        let mut messages = Vec::new();
        self.update_error_display(&mut messages);
        messages
    }

    /// Refresh the error flag once the control is touched or configured to
    /// validate from the start. Emits `Invalid` when the flag turns on.
    fn update_error_display(&mut self, messages: &mut Vec<SelectMessage>) {
        if !(self.touched || self.validate_on_initial_render) {
            return;
        }
        let show = !self.check_validity();
        if show && !self.show_error {
            let validity = self.validation.validity();
            messages.push(SelectMessage::Invalid {
                reason: validity.reason,
                message: self.validation_message().to_string(),
            });
        }
        self.set_show_error(show);
    }

    fn set_show_error(&mut self, show: bool) {
        if self.show_error != show {
            self.show_error = show;
            self.scheduler.invalidate();
        }
    }

    fn record(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(%diagnostic, "recovered");
        self.diagnostics.push(diagnostic);
    }
}
