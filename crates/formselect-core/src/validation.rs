//! Validity computation for form-associated controls.
//!
//! This module provides:
//! - The [`Validator`] trait and the [`Custom`] function validator
//! - [`ValidityState`], the derived validity snapshot the form layer reads
//! - [`ValidationEngine`], which recomputes validity whenever the value,
//!   the required flag, or a validator changes
//!
//! Validity is never set directly. Callers change an input and the engine
//! recomputes; the rule order is: custom validator, explicit custom
//! validity, value missing, valid.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default message shown for a required control with no selection.
pub const DEFAULT_VALUE_MISSING_MESSAGE: &str = "Please select an item in the list.";

/// Validation result for a single value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Validation passed.
    Valid,
    /// Validation failed with an error message.
    Invalid(String),
}

impl ValidationResult {
    /// Check if validation passed.
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Check if validation failed.
    pub const fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    /// Get the error message if invalid.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Invalid(msg) => Some(msg),
            Self::Valid => None,
        }
    }
}

/// A validator that can validate a submitted value.
///
/// The value is the form value: the selected option's value, or the empty
/// string when nothing is selected.
pub trait Validator: Send {
    /// Validate the given value.
    fn validate(&self, value: &str) -> ValidationResult;

    /// Get the name of this validator.
    fn name(&self) -> &str;
}

/// Custom function validator.
pub struct Custom<F>
where
    F: Fn(&str) -> Option<String> + Send,
{
    validator: F,
    name: String,
}

impl<F> Custom<F>
where
    F: Fn(&str) -> Option<String> + Send,
{
    /// Create a custom validator.
    ///
    /// The function returns `Some(message)` to reject a value.
    pub fn new(name: &str, validator: F) -> Self {
        Self {
            validator,
            name: name.to_string(),
        }
    }
}

impl<F> Validator for Custom<F>
where
    F: Fn(&str) -> Option<String> + Send,
{
    fn validate(&self, value: &str) -> ValidationResult {
        match (self.validator)(value) {
            Some(message) => ValidationResult::Invalid(message),
            None => ValidationResult::Valid,
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<F> fmt::Debug for Custom<F>
where
    F: Fn(&str) -> Option<String> + Send,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Custom").field("name", &self.name).finish()
    }
}

/// Why a control is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidityReason {
    /// No failure.
    #[default]
    None,
    /// Required but nothing selected.
    ValueMissing,
    /// A custom validator or custom validity message rejected the value.
    CustomError,
}

/// Derived validity snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityState {
    /// Whether the control passes all constraints.
    pub valid: bool,
    /// Failure reason.
    pub reason: ValidityReason,
    /// Message from the custom validator or custom validity.
    pub custom_message: Option<String>,
}

impl Default for ValidityState {
    fn default() -> Self {
        Self::valid()
    }
}

impl ValidityState {
    /// A passing state.
    #[must_use]
    pub const fn valid() -> Self {
        Self {
            valid: true,
            reason: ValidityReason::None,
            custom_message: None,
        }
    }

    /// A required control with no selection.
    #[must_use]
    pub const fn value_missing() -> Self {
        Self {
            valid: false,
            reason: ValidityReason::ValueMissing,
            custom_message: None,
        }
    }

    /// A custom rejection.
    #[must_use]
    pub fn custom_error(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: ValidityReason::CustomError,
            custom_message: Some(message.into()),
        }
    }

    /// Check if valid.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Check if the failure is a missing value.
    #[must_use]
    pub fn is_value_missing(&self) -> bool {
        self.reason == ValidityReason::ValueMissing
    }
}

/// Apply the validity rules to a selected value.
///
/// A validator message wins even when a value is present; an empty message
/// counts as a pass.
pub fn revalidate(
    selected_value: Option<&str>,
    required: bool,
    validator: Option<&dyn Validator>,
) -> ValidityState {
    if let Some(validator) = validator {
        if let ValidationResult::Invalid(message) = validator.validate(selected_value.unwrap_or(""))
        {
            if !message.is_empty() {
                return ValidityState::custom_error(message);
            }
        }
    }

    if required && selected_value.is_none() {
        ValidityState::value_missing()
    } else {
        ValidityState::valid()
    }
}

/// Stateful validity tracker for one control.
#[derive(Default)]
pub struct ValidationEngine {
    required: bool,
    validator: Option<Box<dyn Validator>>,
    custom_validity: Option<String>,
    barred: bool,
    value: Option<String>,
    current: ValidityState,
}

impl fmt::Debug for ValidationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationEngine")
            .field("required", &self.required)
            .field("validator", &self.validator.as_ref().map(|v| v.name()))
            .field("custom_validity", &self.custom_validity)
            .field("barred", &self.barred)
            .field("current", &self.current)
            .finish()
    }
}

impl ValidationEngine {
    /// Create an engine with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current validity.
    pub const fn validity(&self) -> &ValidityState {
        &self.current
    }

    /// Whether a value is required.
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Explicit custom validity message, if any.
    pub fn custom_validity(&self) -> Option<&str> {
        self.custom_validity.as_deref()
    }

    /// Record a new selected value and recompute.
    pub fn on_value_change(&mut self, value: Option<&str>) -> &ValidityState {
        self.value = value.map(str::to_string);
        self.recompute()
    }

    /// Change the required flag and recompute.
    pub fn set_required(&mut self, required: bool) -> &ValidityState {
        self.required = required;
        self.recompute()
    }

    /// Install a custom validator and recompute.
    pub fn set_validator<V: Validator + 'static>(&mut self, validator: V) -> &ValidityState {
        self.validator = Some(Box::new(validator));
        self.recompute()
    }

    /// Remove the custom validator and recompute.
    pub fn clear_validator(&mut self) -> &ValidityState {
        self.validator = None;
        self.recompute()
    }

    /// Set an explicit custom error. An empty message clears it.
    pub fn set_custom_validity(&mut self, message: &str) -> &ValidityState {
        self.custom_validity = if message.is_empty() {
            None
        } else {
            Some(message.to_string())
        };
        self.recompute()
    }

    /// Bar the control from constraint validation (disabled controls).
    pub fn set_barred(&mut self, barred: bool) -> &ValidityState {
        self.barred = barred;
        self.recompute()
    }

    fn recompute(&mut self) -> &ValidityState {
        self.current = if self.barred {
            ValidityState::valid()
        } else {
            let state = revalidate(
                self.value.as_deref(),
                self.required,
                self.validator.as_deref(),
            );
            match (&state.reason, &self.custom_validity) {
                (ValidityReason::CustomError, _) | (_, None) => state,
                (_, Some(message)) => ValidityState::custom_error(message.clone()),
            }
        };
        tracing::debug!(
            valid = self.current.valid,
            reason = ?self.current.reason,
            "revalidated"
        );
        &self.current
    }
}
