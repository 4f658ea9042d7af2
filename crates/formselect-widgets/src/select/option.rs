//! Ordered option set with enabled-aware navigation.

use formselect_yaml::{NavigationPolicy, OptionConfig};
use serde::{Deserialize, Serialize};

/// A selectable option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Value submitted with the form
    pub value: String,
    /// Display text
    pub text: String,
    /// Whether this option is disabled
    pub disabled: bool,
}

impl SelectOption {
    /// Create a new option.
    #[must_use]
    pub fn new(value: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            text: text.into(),
            disabled: false,
        }
    }

    /// Create an option where value equals text.
    #[must_use]
    pub fn simple(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            value: text.clone(),
            text,
            disabled: false,
        }
    }

    /// Set disabled state.
    #[must_use]
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Whether the option can be highlighted or selected.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        !self.disabled
    }
}

impl From<&OptionConfig> for SelectOption {
    fn from(config: &OptionConfig) -> Self {
        Self::new(config.value.clone(), config.display_text()).disabled(config.disabled)
    }
}

/// Navigation direction through the option list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Toward higher indices
    Forward,
    /// Toward lower indices
    Backward,
}

/// The ordered option set.
///
/// Identity is positional: an option's index is its position in the most
/// recent [`set_options`](Self::set_options) call. The set is only ever
/// replaced whole, so readers never observe a partial update.
#[derive(Debug, Clone, Default)]
pub struct OptionRegistry {
    options: Vec<SelectOption>,
    policy: NavigationPolicy,
}

impl OptionRegistry {
    /// Create an empty registry with the given navigation policy.
    #[must_use]
    pub fn new(policy: NavigationPolicy) -> Self {
        Self {
            options: Vec::new(),
            policy,
        }
    }

    /// Replace the full option set.
    pub fn set_options(&mut self, options: impl IntoIterator<Item = SelectOption>) {
        self.options = options.into_iter().collect();
        tracing::debug!(len = self.options.len(), "option set replaced");
    }

    /// All options in order.
    #[must_use]
    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    /// Get option count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Check if empty (no options).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Navigation policy at list ends.
    #[must_use]
    pub const fn policy(&self) -> NavigationPolicy {
        self.policy
    }

    /// Change the navigation policy.
    pub fn set_policy(&mut self, policy: NavigationPolicy) {
        self.policy = policy;
    }

    /// Option at `index`.
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&SelectOption> {
        self.options.get(index)
    }

    /// First option carrying `value`, with its index.
    #[must_use]
    pub fn get_by_value(&self, value: &str) -> Option<(usize, &SelectOption)> {
        self.options
            .iter()
            .enumerate()
            .find(|(_, option)| option.value == value)
    }

    /// Whether `index` refers to an enabled option.
    #[must_use]
    pub fn is_enabled(&self, index: usize) -> bool {
        self.options.get(index).is_some_and(SelectOption::is_enabled)
    }

    /// Whether any option can be selected.
    #[must_use]
    pub fn has_enabled(&self) -> bool {
        self.options.iter().any(SelectOption::is_enabled)
    }

    /// Index of the first enabled option.
    #[must_use]
    pub fn first_enabled_index(&self) -> Option<usize> {
        self.options.iter().position(SelectOption::is_enabled)
    }

    /// Index of the last enabled option.
    #[must_use]
    pub fn last_enabled_index(&self) -> Option<usize> {
        self.options.iter().rposition(SelectOption::is_enabled)
    }

    /// Next enabled option from `from` in `direction`.
    ///
    /// With no starting point, forward lands on the first enabled option and
    /// backward on the last. Returns `None` only when no option is enabled.
    #[must_use]
    pub fn next_enabled_index(&self, from: Option<usize>, direction: Direction) -> Option<usize> {
        let Some(from) = from.filter(|&i| i < self.options.len()) else {
            return match direction {
                Direction::Forward => self.first_enabled_index(),
                Direction::Backward => self.last_enabled_index(),
            };
        };

        match self.policy {
            NavigationPolicy::Wrap => self.next_wrapping(from, direction),
            NavigationPolicy::Clamp => self.next_clamped(from, direction),
        }
    }

    fn next_wrapping(&self, from: usize, direction: Direction) -> Option<usize> {
        let len = self.options.len();
        (1..=len)
            .map(|step| match direction {
                Direction::Forward => (from + step) % len,
                Direction::Backward => (from + len - step % len) % len,
            })
            .find(|&i| self.options[i].is_enabled())
    }

    fn next_clamped(&self, from: usize, direction: Direction) -> Option<usize> {
        let found = match direction {
            Direction::Forward => (from + 1..self.options.len()).find(|&i| self.is_enabled(i)),
            Direction::Backward => (0..from).rev().find(|&i| self.is_enabled(i)),
        };
        found.or_else(|| {
            if self.is_enabled(from) {
                Some(from)
            } else {
                match direction {
                    Direction::Forward => self.last_enabled_index(),
                    Direction::Backward => self.first_enabled_index(),
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn registry(entries: &[(&str, bool)], policy: NavigationPolicy) -> OptionRegistry {
        let mut registry = OptionRegistry::new(policy);
        registry.set_options(
            entries
                .iter()
                .map(|(v, disabled)| SelectOption::simple(*v).disabled(*disabled)),
        );
        registry
    }

    // =========================================================================
    // SelectOption Tests
    // =========================================================================

    #[test]
    fn test_select_option_new() {
        let opt = SelectOption::new("val", "Label");
        assert_eq!(opt.value, "val");
        assert_eq!(opt.text, "Label");
        assert!(!opt.disabled);
        assert!(opt.is_enabled());
    }

    #[test]
    fn test_select_option_simple() {
        let opt = SelectOption::simple("Same");
        assert_eq!(opt.value, "Same");
        assert_eq!(opt.text, "Same");
    }

    #[test]
    fn test_select_option_disabled() {
        let opt = SelectOption::new("v", "L").disabled(true);
        assert!(opt.disabled);
        assert!(!opt.is_enabled());
    }

    #[test]
    fn test_select_option_from_config() {
        let config = OptionConfig {
            value: "us".to_string(),
            text: Some("United States".to_string()),
            disabled: true,
        };
        let opt = SelectOption::from(&config);
        assert_eq!(opt.value, "us");
        assert_eq!(opt.text, "United States");
        assert!(opt.disabled);
    }

    // =========================================================================
    // Lookup Tests
    // =========================================================================

    #[test]
    fn test_registry_empty() {
        let r = OptionRegistry::default();
        assert!(r.is_empty());
        assert_eq!(r.len(), 0);
        assert!(!r.has_enabled());
        assert_eq!(r.first_enabled_index(), None);
        assert_eq!(r.next_enabled_index(None, Direction::Forward), None);
        assert_eq!(r.next_enabled_index(Some(0), Direction::Backward), None);
    }

    #[test]
    fn test_registry_get_by_index() {
        let r = registry(&[("a", false), ("b", true)], NavigationPolicy::Wrap);
        assert_eq!(r.get_by_index(1).unwrap().value, "b");
        assert!(r.get_by_index(2).is_none());
    }

    #[test]
    fn test_registry_get_by_value_first_match_wins() {
        let mut r = OptionRegistry::default();
        r.set_options([
            SelectOption::new("x", "First"),
            SelectOption::new("x", "Second"),
        ]);
        let (index, option) = r.get_by_value("x").unwrap();
        assert_eq!(index, 0);
        assert_eq!(option.text, "First");
        assert!(r.get_by_value("missing").is_none());
    }

    #[test]
    fn test_registry_set_options_replaces() {
        let mut r = registry(&[("a", false), ("b", false)], NavigationPolicy::Wrap);
        r.set_options([SelectOption::simple("z")]);
        assert_eq!(r.len(), 1);
        assert!(r.get_by_value("a").is_none());
    }

    #[test]
    fn test_registry_enabled_bounds() {
        let r = registry(
            &[("a", true), ("b", false), ("c", false), ("d", true)],
            NavigationPolicy::Wrap,
        );
        assert_eq!(r.first_enabled_index(), Some(1));
        assert_eq!(r.last_enabled_index(), Some(2));
        assert!(r.is_enabled(1));
        assert!(!r.is_enabled(0));
        assert!(!r.is_enabled(99));
    }

    #[test]
    fn test_registry_all_disabled() {
        let r = registry(&[("a", true), ("b", true)], NavigationPolicy::Wrap);
        assert!(!r.has_enabled());
        assert_eq!(r.first_enabled_index(), None);
        assert_eq!(r.next_enabled_index(Some(0), Direction::Forward), None);
    }

    // =========================================================================
    // Navigation Tests
    // =========================================================================

    #[test]
    fn test_next_enabled_from_none() {
        let r = registry(&[("a", true), ("b", false), ("c", false)], NavigationPolicy::Wrap);
        assert_eq!(r.next_enabled_index(None, Direction::Forward), Some(1));
        assert_eq!(r.next_enabled_index(None, Direction::Backward), Some(2));
    }

    #[test]
    fn test_next_enabled_skips_disabled() {
        let r = registry(&[("a", false), ("b", true), ("c", false)], NavigationPolicy::Wrap);
        assert_eq!(r.next_enabled_index(Some(0), Direction::Forward), Some(2));
        assert_eq!(r.next_enabled_index(Some(2), Direction::Backward), Some(0));
    }

    #[test]
    fn test_next_enabled_wraps() {
        let r = registry(&[("a", false), ("b", false), ("c", false)], NavigationPolicy::Wrap);
        assert_eq!(r.next_enabled_index(Some(2), Direction::Forward), Some(0));
        assert_eq!(r.next_enabled_index(Some(0), Direction::Backward), Some(2));
    }

    #[test]
    fn test_next_enabled_wraps_past_disabled_edges() {
        let r = registry(&[("a", true), ("b", false), ("c", true)], NavigationPolicy::Wrap);
        assert_eq!(r.next_enabled_index(Some(1), Direction::Forward), Some(1));
        assert_eq!(r.next_enabled_index(Some(1), Direction::Backward), Some(1));
    }

    #[test]
    fn test_next_enabled_clamps() {
        let r = registry(&[("a", false), ("b", false), ("c", false)], NavigationPolicy::Clamp);
        assert_eq!(r.next_enabled_index(Some(2), Direction::Forward), Some(2));
        assert_eq!(r.next_enabled_index(Some(0), Direction::Backward), Some(0));
        assert_eq!(r.next_enabled_index(Some(0), Direction::Forward), Some(1));
    }

    #[test]
    fn test_next_enabled_clamps_from_disabled_start() {
        let r = registry(&[("a", false), ("b", false), ("c", true)], NavigationPolicy::Clamp);
        assert_eq!(r.next_enabled_index(Some(2), Direction::Forward), Some(1));
    }

    #[test]
    fn test_next_enabled_out_of_range_start() {
        let r = registry(&[("a", false), ("b", false)], NavigationPolicy::Wrap);
        assert_eq!(r.next_enabled_index(Some(10), Direction::Forward), Some(0));
    }

    #[test]
    fn test_policy_switch() {
        let mut r = registry(&[("a", false), ("b", false)], NavigationPolicy::Wrap);
        assert_eq!(r.next_enabled_index(Some(1), Direction::Forward), Some(0));
        r.set_policy(NavigationPolicy::Clamp);
        assert_eq!(r.policy(), NavigationPolicy::Clamp);
        assert_eq!(r.next_enabled_index(Some(1), Direction::Forward), Some(1));
    }

    proptest! {
        #[test]
        fn prop_next_enabled_always_lands_on_enabled(
            flags in proptest::collection::vec(any::<bool>(), 0..12),
            from in proptest::option::of(0usize..14),
            forward in any::<bool>(),
            wrap in any::<bool>(),
        ) {
            let policy = if wrap { NavigationPolicy::Wrap } else { NavigationPolicy::Clamp };
            let mut r = OptionRegistry::new(policy);
            r.set_options(flags.iter().enumerate().map(|(i, d)| {
                SelectOption::simple(i.to_string()).disabled(*d)
            }));
            let direction = if forward { Direction::Forward } else { Direction::Backward };

            match r.next_enabled_index(from, direction) {
                Some(i) => prop_assert!(r.is_enabled(i)),
                None => prop_assert!(!r.has_enabled()),
            }
        }
    }
}
