//! Single source of truth for the chosen option.

use super::option::OptionRegistry;
use formselect_core::{Change, ChangeStream, SelectionError, SubscriptionId};
use serde::{Deserialize, Serialize};

/// What is currently chosen.
///
/// `selected_value` is always derived from `selected_index`; the only way to
/// build a non-empty state is [`SelectionState::at`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    /// Index of the selected option
    pub selected_index: Option<usize>,
    /// Value of the selected option
    pub selected_value: Option<String>,
}

impl SelectionState {
    /// State for the option at `index` carrying `value`.
    #[must_use]
    pub fn at(index: usize, value: impl Into<String>) -> Self {
        Self {
            selected_index: Some(index),
            selected_value: Some(value.into()),
        }
    }

    /// Check if nothing is selected.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.selected_index.is_none()
    }
}

/// Owns [`SelectionState`] and publishes every change.
///
/// Requests that do not resolve to an enabled option are rejected with a
/// [`SelectionError`] and leave the state untouched. Re-selecting the
/// current option is a no-op and emits nothing.
#[derive(Debug, Default)]
pub struct SelectionModel {
    state: SelectionState,
    changes: ChangeStream<SelectionState>,
}

impl SelectionModel {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Selected index.
    #[must_use]
    pub const fn selected_index(&self) -> Option<usize> {
        self.state.selected_index
    }

    /// Selected value.
    #[must_use]
    pub fn selected_value(&self) -> Option<&str> {
        self.state.selected_value.as_deref()
    }

    /// Subscribe to selection changes.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Change<SelectionState>) + Send + 'static,
    {
        self.changes.subscribe(callback)
    }

    /// Remove a subscriber.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.changes.unsubscribe(id)
    }

    /// Select the option at `index`.
    ///
    /// Returns the emitted change, or `None` if `index` was already selected.
    pub fn select(
        &mut self,
        registry: &OptionRegistry,
        index: usize,
    ) -> Result<Option<Change<SelectionState>>, SelectionError> {
        let option = registry
            .get_by_index(index)
            .ok_or(SelectionError::IndexOutOfRange {
                index,
                len: registry.len(),
            })?;
        if option.disabled {
            return Err(SelectionError::OptionDisabled { index });
        }
        Ok(self.transition(SelectionState::at(index, option.value.clone())))
    }

    /// Select the first option carrying `value`.
    pub fn select_by_value(
        &mut self,
        registry: &OptionRegistry,
        value: &str,
    ) -> Result<Option<Change<SelectionState>>, SelectionError> {
        let (index, _) =
            registry
                .get_by_value(value)
                .ok_or_else(|| SelectionError::NoMatchingValue {
                    value: value.to_string(),
                })?;
        self.select(registry, index)
    }

    /// Clear the selection. Emits only if something was selected.
    pub fn clear(&mut self) -> Option<Change<SelectionState>> {
        self.transition(SelectionState::default())
    }

    /// Re-resolve the selection after the registry was replaced.
    ///
    /// The selection survives by value: if the previous value names an
    /// enabled option in the new set, that option is selected (possibly at a
    /// new index); otherwise the selection is cleared.
    pub fn rebuild(&mut self, registry: &OptionRegistry) -> Option<Change<SelectionState>> {
        let next = self
            .state
            .selected_value
            .as_deref()
            .and_then(|value| registry.get_by_value(value))
            .filter(|(_, option)| option.is_enabled())
            .map(|(index, option)| SelectionState::at(index, option.value.clone()))
            .unwrap_or_default();
        self.transition(next)
    }

    fn transition(&mut self, next: SelectionState) -> Option<Change<SelectionState>> {
        if next == self.state {
            return None;
        }
        let old = std::mem::replace(&mut self.state, next.clone());
        tracing::debug!(
            old_index = ?old.selected_index,
            new_index = ?next.selected_index,
            value = ?next.selected_value,
            "selection changed"
        );
        Some(self.changes.emit(old, next))
    }
}

#[cfg(test)]
mod tests {
    use super::super::option::SelectOption;
    use super::*;
    use formselect_yaml::NavigationPolicy;
    use proptest::prelude::*;
    use std::sync::{Arc, Mutex};

    fn abc() -> OptionRegistry {
        let mut r = OptionRegistry::new(NavigationPolicy::Wrap);
        r.set_options([
            SelectOption::simple("a"),
            SelectOption::simple("b").disabled(true),
            SelectOption::simple("c"),
        ]);
        r
    }

    // =========================================================================
    // select Tests
    // =========================================================================

    #[test]
    fn test_select_enabled() {
        let r = abc();
        let mut model = SelectionModel::new();
        let change = model.select(&r, 2).unwrap().unwrap();
        assert_eq!(change.old, SelectionState::default());
        assert_eq!(change.new, SelectionState::at(2, "c"));
        assert_eq!(model.selected_value(), Some("c"));
        assert_eq!(model.selected_index(), Some(2));
    }

    #[test]
    fn test_select_disabled_rejected() {
        let r = abc();
        let mut model = SelectionModel::new();
        model.select(&r, 2).unwrap();
        let err = model.select(&r, 1).unwrap_err();
        assert_eq!(err, SelectionError::OptionDisabled { index: 1 });
        assert_eq!(model.selected_value(), Some("c"));
    }

    #[test]
    fn test_select_out_of_range_rejected() {
        let r = abc();
        let mut model = SelectionModel::new();
        let err = model.select(&r, 9).unwrap_err();
        assert_eq!(err, SelectionError::IndexOutOfRange { index: 9, len: 3 });
        assert!(model.state().is_empty());
    }

    #[test]
    fn test_reselect_is_noop() {
        let r = abc();
        let mut model = SelectionModel::new();
        assert!(model.select(&r, 0).unwrap().is_some());
        assert!(model.select(&r, 0).unwrap().is_none());
    }

    #[test]
    fn test_select_by_value() {
        let r = abc();
        let mut model = SelectionModel::new();
        model.select_by_value(&r, "c").unwrap();
        assert_eq!(model.selected_index(), Some(2));

        let err = model.select_by_value(&r, "zz").unwrap_err();
        assert_eq!(
            err,
            SelectionError::NoMatchingValue {
                value: "zz".to_string()
            }
        );
        assert_eq!(model.selected_index(), Some(2));

        assert!(model.select_by_value(&r, "b").is_err());
    }

    #[test]
    fn test_clear() {
        let r = abc();
        let mut model = SelectionModel::new();
        assert!(model.clear().is_none());
        model.select(&r, 0).unwrap();
        let change = model.clear().unwrap();
        assert_eq!(change.old, SelectionState::at(0, "a"));
        assert!(change.new.is_empty());
    }

    // =========================================================================
    // rebuild Tests
    // =========================================================================

    #[test]
    fn test_rebuild_same_list_preserves() {
        let r = abc();
        let mut model = SelectionModel::new();
        model.select_by_value(&r, "c").unwrap();
        assert!(model.rebuild(&abc()).is_none());
        assert_eq!(model.selected_value(), Some("c"));
    }

    #[test]
    fn test_rebuild_moves_index_by_value() {
        let mut model = SelectionModel::new();
        model.select(&abc(), 2).unwrap();

        let mut r = OptionRegistry::default();
        r.set_options([SelectOption::simple("c"), SelectOption::simple("a")]);
        let change = model.rebuild(&r).unwrap();
        assert_eq!(change.new, SelectionState::at(0, "c"));
    }

    #[test]
    fn test_rebuild_missing_value_clears() {
        let mut model = SelectionModel::new();
        model.select(&abc(), 0).unwrap();

        let mut r = OptionRegistry::default();
        r.set_options([SelectOption::simple("x")]);
        let change = model.rebuild(&r).unwrap();
        assert!(change.new.is_empty());
    }

    #[test]
    fn test_rebuild_value_now_disabled_clears() {
        let mut model = SelectionModel::new();
        model.select(&abc(), 0).unwrap();

        let mut r = OptionRegistry::default();
        r.set_options([SelectOption::simple("a").disabled(true)]);
        assert!(model.rebuild(&r).is_some());
        assert!(model.state().is_empty());
    }

    // =========================================================================
    // Notification Tests
    // =========================================================================

    #[test]
    fn test_subscribers_see_every_change_in_order() {
        let r = abc();
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let mut model = SelectionModel::new();
        model.subscribe(move |c| {
            sink.lock()
                .unwrap()
                .push((c.sequence, c.old.selected_index, c.new.selected_index));
        });

        model.select(&r, 0).unwrap();
        model.select(&r, 0).unwrap();
        let _ = model.select(&r, 1);
        model.select(&r, 2).unwrap();
        model.clear();

        assert_eq!(
            *log.lock().unwrap(),
            vec![(1, None, Some(0)), (2, Some(0), Some(2)), (3, Some(2), None)]
        );
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let r = abc();
        let count = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&count);
        let mut model = SelectionModel::new();
        let id = model.subscribe(move |_| *sink.lock().unwrap() += 1);
        model.select(&r, 0).unwrap();
        assert!(model.unsubscribe(id));
        model.select(&r, 2).unwrap();
        assert_eq!(*count.lock().unwrap(), 1);
    }

    proptest! {
        #[test]
        fn prop_invalid_select_never_changes_state(
            flags in proptest::collection::vec(any::<bool>(), 1..10),
            first in 0usize..12,
            second in 0usize..12,
        ) {
            let mut r = OptionRegistry::default();
            r.set_options(flags.iter().enumerate().map(|(i, d)| {
                SelectOption::simple(format!("v{i}")).disabled(*d)
            }));
            let mut model = SelectionModel::new();
            let _ = model.select(&r, first);
            let before = model.state().clone();

            if !r.is_enabled(second) {
                prop_assert!(model.select(&r, second).is_err());
                prop_assert_eq!(model.state(), &before);
            }
        }

        #[test]
        fn prop_first_enabled_always_selectable(
            flags in proptest::collection::vec(any::<bool>(), 1..10),
        ) {
            let mut r = OptionRegistry::default();
            r.set_options(flags.iter().enumerate().map(|(i, d)| {
                SelectOption::simple(format!("v{i}")).disabled(*d)
            }));
            if let Some(first) = r.first_enabled_index() {
                let mut model = SelectionModel::new();
                prop_assert!(model.select(&r, first).is_ok());
                prop_assert_eq!(model.selected_value(), Some(r.options()[first].value.as_str()));
            }
        }

        #[test]
        fn prop_rebuild_same_list_roundtrip(
            len in 1usize..8,
            pick in 0usize..8,
        ) {
            let build = || {
                let mut r = OptionRegistry::default();
                r.set_options((0..len).map(|i| SelectOption::simple(format!("v{i}"))));
                r
            };
            let r = build();
            let value = format!("v{}", pick % len);
            let mut model = SelectionModel::new();
            model.select_by_value(&r, &value).unwrap();
            model.rebuild(&build());
            prop_assert_eq!(model.selected_value(), Some(value.as_str()));
        }
    }
}
