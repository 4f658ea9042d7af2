//! Open/closed state machine for the popup list.

use super::option::{Direction, OptionRegistry};
use super::router::Intent;
use super::typeahead::Typeahead;
use formselect_core::{Diagnostic, MenuError, SelectionError};
use serde::{Deserialize, Serialize};

/// Popup state. `highlighted_index` is `None` whenever the menu is closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuState {
    /// Whether the popup is open
    pub open: bool,
    /// Option emphasized for keyboard activation
    pub highlighted_index: Option<usize>,
}

/// Where keyboard focus logically sits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusTarget {
    /// Focus is outside the control
    #[default]
    None,
    /// The closed control itself
    Control,
    /// The open popup list
    List,
}

/// Result of reducing one intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    /// Nothing observable changed
    Unchanged,
    /// Closed to Open
    Opened,
    /// Highlight moved while open
    Highlighted(usize),
    /// This option was chosen. The menu is still open: the caller applies
    /// the selection, then closes it with [`MenuController::close`]
    Committed(usize),
    /// Closed without choosing
    Closed,
    /// Closed because no enabled option remained
    ForcedClosed,
}

/// Owns [`MenuState`], logical focus and the typeahead buffer.
///
/// The controller never touches the selection. A commit is reported as
/// [`MenuOutcome::Committed`] with the menu still open, and the composition
/// root applies it before closing.
#[derive(Debug, Clone)]
pub struct MenuController {
    state: MenuState,
    focus: FocusTarget,
    typeahead: Typeahead,
}

impl Default for MenuController {
    fn default() -> Self {
        Self::new(formselect_yaml::DEFAULT_TYPEAHEAD_TIMEOUT_MS)
    }
}

impl MenuController {
    /// Create a closed menu with the given typeahead window.
    #[must_use]
    pub const fn new(typeahead_timeout_ms: u64) -> Self {
        Self {
            state: MenuState {
                open: false,
                highlighted_index: None,
            },
            focus: FocusTarget::None,
            typeahead: Typeahead::new(typeahead_timeout_ms),
        }
    }

    /// Current popup state.
    #[must_use]
    pub const fn state(&self) -> MenuState {
        self.state
    }

    /// Whether the popup is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.state.open
    }

    /// Highlighted option while open.
    #[must_use]
    pub const fn highlighted_index(&self) -> Option<usize> {
        self.state.highlighted_index
    }

    /// Logical focus.
    #[must_use]
    pub const fn focus(&self) -> FocusTarget {
        self.focus
    }

    /// Typeahead buffer.
    #[must_use]
    pub const fn typeahead(&self) -> &Typeahead {
        &self.typeahead
    }

    /// Change the typeahead window.
    pub fn set_typeahead_timeout_ms(&mut self, timeout_ms: u64) {
        self.typeahead.set_timeout_ms(timeout_ms);
    }

    /// Open the popup, highlighting `selected` or the first enabled option.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::NoEnabledOptions`] and stays closed when nothing
    /// could be highlighted.
    pub fn open(
        &mut self,
        registry: &OptionRegistry,
        selected: Option<usize>,
    ) -> Result<MenuOutcome, MenuError> {
        if self.state.open {
            return Ok(MenuOutcome::Unchanged);
        }
        let highlight =
            Self::initial_highlight(registry, selected).ok_or(MenuError::NoEnabledOptions)?;
        self.state = MenuState {
            open: true,
            highlighted_index: Some(highlight),
        };
        self.focus = FocusTarget::List;
        self.typeahead.reset();
        tracing::debug!(highlight, "menu opened");
        Ok(MenuOutcome::Opened)
    }

    /// Close without committing; focus returns to the control.
    pub fn close(&mut self) -> MenuOutcome {
        if self.close_to(FocusTarget::Control) {
            MenuOutcome::Closed
        } else {
            MenuOutcome::Unchanged
        }
    }

    /// Move the highlight one enabled option in `direction`.
    pub fn move_highlight(&mut self, registry: &OptionRegistry, direction: Direction) -> MenuOutcome {
        if !self.state.open {
            return MenuOutcome::Unchanged;
        }
        self.typeahead.reset();
        let next = registry.next_enabled_index(self.state.highlighted_index, direction);
        self.set_highlight(next)
    }

    /// Highlight the first enabled option.
    pub fn highlight_first(&mut self, registry: &OptionRegistry) -> MenuOutcome {
        if !self.state.open {
            return MenuOutcome::Unchanged;
        }
        self.typeahead.reset();
        self.set_highlight(registry.first_enabled_index())
    }

    /// Highlight the last enabled option.
    pub fn highlight_last(&mut self, registry: &OptionRegistry) -> MenuOutcome {
        if !self.state.open {
            return MenuOutcome::Unchanged;
        }
        self.typeahead.reset();
        self.set_highlight(registry.last_enabled_index())
    }

    /// Highlight `index` if it names an enabled option.
    pub fn highlight(&mut self, registry: &OptionRegistry, index: usize) -> MenuOutcome {
        if !self.state.open || !registry.is_enabled(index) {
            return MenuOutcome::Unchanged;
        }
        self.set_highlight(Some(index))
    }

    /// Feed typed text at `now_ms`. No match leaves the highlight alone.
    pub fn typeahead_input(
        &mut self,
        registry: &OptionRegistry,
        text: &str,
        now_ms: u64,
    ) -> MenuOutcome {
        if !self.state.open {
            return MenuOutcome::Unchanged;
        }
        let current = self.state.highlighted_index;
        match self.typeahead.handle(text, now_ms, registry, current) {
            Some(found) => self.set_highlight(Some(found)),
            None => MenuOutcome::Unchanged,
        }
    }

    /// Commit the highlighted option.
    ///
    /// With nothing highlighted the menu just closes.
    pub fn commit(&mut self) -> MenuOutcome {
        if !self.state.open {
            return MenuOutcome::Unchanged;
        }
        match self.state.highlighted_index {
            Some(index) => MenuOutcome::Committed(index),
            None => self.close(),
        }
    }

    /// Commit a specific option.
    ///
    /// # Errors
    ///
    /// An index that does not name an enabled option is rejected and the
    /// menu stays open.
    pub fn commit_index(
        &mut self,
        registry: &OptionRegistry,
        index: usize,
    ) -> Result<MenuOutcome, SelectionError> {
        if !self.state.open {
            return Ok(MenuOutcome::Unchanged);
        }
        let option = registry
            .get_by_index(index)
            .ok_or(SelectionError::IndexOutOfRange {
                index,
                len: registry.len(),
            })?;
        if !option.is_enabled() {
            return Err(SelectionError::OptionDisabled { index });
        }
        Ok(MenuOutcome::Committed(index))
    }

    /// Reconcile with a rebuilt registry.
    ///
    /// An open menu with no enabled option left is forced closed. Otherwise
    /// the highlight is re-initialized as if the menu had just opened.
    pub fn sync(&mut self, registry: &OptionRegistry, selected: Option<usize>) -> MenuOutcome {
        if !self.state.open {
            return MenuOutcome::Unchanged;
        }
        self.typeahead.reset();
        match Self::initial_highlight(registry, selected) {
            Some(highlight) => self.set_highlight(Some(highlight)),
            None => {
                self.close_to(FocusTarget::Control);
                tracing::debug!("menu force closed");
                MenuOutcome::ForcedClosed
            }
        }
    }

    /// Reduce one routed intent.
    ///
    /// # Errors
    ///
    /// Returns a [`Diagnostic`] for an open request with nothing to show or a
    /// commit of an option that cannot be selected. State is unchanged.
    pub fn reduce(
        &mut self,
        intent: &Intent,
        registry: &OptionRegistry,
        selected: Option<usize>,
        now_ms: u64,
    ) -> Result<MenuOutcome, Diagnostic> {
        let outcome = match intent {
            Intent::Open => self.open(registry, selected)?,
            Intent::Toggle if self.state.open => self.close(),
            Intent::Toggle => self.open(registry, selected)?,
            Intent::Move(direction) => self.move_highlight(registry, *direction),
            Intent::First => self.highlight_first(registry),
            Intent::Last => self.highlight_last(registry),
            Intent::Highlight(index) => self.highlight(registry, *index),
            Intent::Typeahead(text) => self.typeahead_input(registry, text, now_ms),
            Intent::Commit => self.commit(),
            Intent::CommitIndex(index) => self.commit_index(registry, *index)?,
            Intent::Cancel => self.close(),
            Intent::Focus => {
                if self.focus == FocusTarget::None {
                    self.focus = FocusTarget::Control;
                }
                MenuOutcome::Unchanged
            }
            Intent::Blur => {
                let closed = self.close_to(FocusTarget::None);
                self.focus = FocusTarget::None;
                if closed {
                    MenuOutcome::Closed
                } else {
                    MenuOutcome::Unchanged
                }
            }
        };
        Ok(outcome)
    }

    fn initial_highlight(registry: &OptionRegistry, selected: Option<usize>) -> Option<usize> {
        selected
            .filter(|&i| registry.is_enabled(i))
            .or_else(|| registry.first_enabled_index())
    }

    fn set_highlight(&mut self, next: Option<usize>) -> MenuOutcome {
        match next {
            Some(index) if self.state.highlighted_index != Some(index) => {
                self.state.highlighted_index = Some(index);
                tracing::debug!(index, "highlight moved");
                MenuOutcome::Highlighted(index)
            }
            _ => MenuOutcome::Unchanged,
        }
    }

    /// Returns whether the menu was open.
    fn close_to(&mut self, focus: FocusTarget) -> bool {
        if !self.state.open {
            return false;
        }
        self.state = MenuState::default();
        self.focus = focus;
        self.typeahead.reset();
        tracing::debug!(?focus, "menu closed");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::super::option::SelectOption;
    use super::*;
    use formselect_yaml::NavigationPolicy;

    fn registry(disabled: &[bool]) -> OptionRegistry {
        let mut r = OptionRegistry::new(NavigationPolicy::Wrap);
        r.set_options(
            disabled
                .iter()
                .enumerate()
                .map(|(i, d)| SelectOption::simple(format!("o{i}")).disabled(*d)),
        );
        r
    }

    fn opened(r: &OptionRegistry, selected: Option<usize>) -> MenuController {
        let mut menu = MenuController::default();
        menu.open(r, selected).unwrap();
        menu
    }

    // =========================================================================
    // Open Tests
    // =========================================================================

    #[test]
    fn test_open_highlights_selected() {
        let r = registry(&[false, false, false]);
        let menu = opened(&r, Some(2));
        assert!(menu.is_open());
        assert_eq!(menu.highlighted_index(), Some(2));
        assert_eq!(menu.focus(), FocusTarget::List);
    }

    #[test]
    fn test_open_without_selection_highlights_first_enabled() {
        let r = registry(&[true, false, false]);
        let menu = opened(&r, None);
        assert_eq!(menu.highlighted_index(), Some(1));
    }

    #[test]
    fn test_open_with_disabled_selection_falls_back() {
        let r = registry(&[false, true]);
        let menu = opened(&r, Some(1));
        assert_eq!(menu.highlighted_index(), Some(0));
    }

    #[test]
    fn test_open_no_enabled_options_refused() {
        let r = registry(&[true, true]);
        let mut menu = MenuController::default();
        assert_eq!(menu.open(&r, None), Err(MenuError::NoEnabledOptions));
        assert!(!menu.is_open());
        assert_eq!(menu.open(&OptionRegistry::default(), None), Err(MenuError::NoEnabledOptions));
    }

    #[test]
    fn test_open_twice_unchanged() {
        let r = registry(&[false]);
        let mut menu = opened(&r, None);
        assert_eq!(menu.open(&r, None), Ok(MenuOutcome::Unchanged));
    }

    // =========================================================================
    // Close Tests
    // =========================================================================

    #[test]
    fn test_close_clears_highlight_and_returns_focus() {
        let r = registry(&[false, false]);
        let mut menu = opened(&r, Some(1));
        assert_eq!(menu.close(), MenuOutcome::Closed);
        assert_eq!(menu.state(), MenuState::default());
        assert_eq!(menu.focus(), FocusTarget::Control);
        assert_eq!(menu.close(), MenuOutcome::Unchanged);
    }

    #[test]
    fn test_commit_reports_highlight() {
        let r = registry(&[false, false]);
        let mut menu = opened(&r, None);
        menu.move_highlight(&r, Direction::Forward);
        assert_eq!(menu.commit(), MenuOutcome::Committed(1));
        assert!(menu.is_open());
        assert_eq!(menu.close(), MenuOutcome::Closed);
        assert_eq!(menu.commit(), MenuOutcome::Unchanged);
    }

    #[test]
    fn test_commit_index_disabled_stays_open() {
        let r = registry(&[false, true]);
        let mut menu = opened(&r, None);
        assert_eq!(
            menu.commit_index(&r, 1),
            Err(SelectionError::OptionDisabled { index: 1 })
        );
        assert!(menu.is_open());
        assert_eq!(
            menu.commit_index(&r, 5),
            Err(SelectionError::IndexOutOfRange { index: 5, len: 2 })
        );
        assert_eq!(menu.commit_index(&r, 0), Ok(MenuOutcome::Committed(0)));
        assert!(menu.is_open());
    }

    #[test]
    fn test_commit_without_highlight_closes() {
        let r = registry(&[false]);
        let mut menu = opened(&r, None);
        menu.state.highlighted_index = None;
        assert_eq!(menu.commit(), MenuOutcome::Closed);
        assert!(!menu.is_open());
    }

    // =========================================================================
    // Highlight Tests
    // =========================================================================

    #[test]
    fn test_move_highlight_wraps_and_skips_disabled() {
        let r = registry(&[false, true, false]);
        let mut menu = opened(&r, None);
        assert_eq!(menu.move_highlight(&r, Direction::Forward), MenuOutcome::Highlighted(2));
        assert_eq!(menu.move_highlight(&r, Direction::Forward), MenuOutcome::Highlighted(0));
        assert_eq!(menu.move_highlight(&r, Direction::Backward), MenuOutcome::Highlighted(2));
    }

    #[test]
    fn test_move_single_option_unchanged() {
        let r = registry(&[false]);
        let mut menu = opened(&r, None);
        assert_eq!(menu.move_highlight(&r, Direction::Forward), MenuOutcome::Unchanged);
    }

    #[test]
    fn test_home_end() {
        let r = registry(&[true, false, false, true]);
        let mut menu = opened(&r, None);
        assert_eq!(menu.highlight_last(&r), MenuOutcome::Highlighted(2));
        assert_eq!(menu.highlight_first(&r), MenuOutcome::Highlighted(1));
    }

    #[test]
    fn test_hover_ignores_disabled() {
        let r = registry(&[false, true, false]);
        let mut menu = opened(&r, None);
        assert_eq!(menu.highlight(&r, 1), MenuOutcome::Unchanged);
        assert_eq!(menu.highlight(&r, 2), MenuOutcome::Highlighted(2));
    }

    #[test]
    fn test_closed_menu_ignores_navigation() {
        let r = registry(&[false, false]);
        let mut menu = MenuController::default();
        assert_eq!(menu.move_highlight(&r, Direction::Forward), MenuOutcome::Unchanged);
        assert_eq!(menu.highlight(&r, 1), MenuOutcome::Unchanged);
        assert_eq!(menu.typeahead_input(&r, "o", 0), MenuOutcome::Unchanged);
        assert_eq!(menu.highlighted_index(), None);
    }

    #[test]
    fn test_navigation_resets_typeahead() {
        let mut r = OptionRegistry::default();
        r.set_options(["Apple", "Apricot", "Banana"].map(SelectOption::simple));
        let mut menu = opened(&r, None);
        menu.typeahead_input(&r, "ap", 0);
        assert_eq!(menu.typeahead().buffer(), "ap");
        menu.move_highlight(&r, Direction::Forward);
        assert_eq!(menu.typeahead().buffer(), "");
    }

    #[test]
    fn test_typeahead_no_match_keeps_highlight() {
        let mut r = OptionRegistry::default();
        r.set_options(["Apple", "Apricot", "Banana"].map(SelectOption::simple));
        let mut menu = opened(&r, None);
        assert_eq!(menu.typeahead_input(&r, "z", 0), MenuOutcome::Unchanged);
        assert_eq!(menu.highlighted_index(), Some(0));
    }

    // =========================================================================
    // sync Tests
    // =========================================================================

    #[test]
    fn test_sync_forces_closed_when_empty() {
        let r = registry(&[false, false]);
        let mut menu = opened(&r, Some(1));
        assert_eq!(menu.sync(&OptionRegistry::default(), None), MenuOutcome::ForcedClosed);
        assert_eq!(menu.state(), MenuState::default());
        assert_eq!(menu.focus(), FocusTarget::Control);
    }

    #[test]
    fn test_sync_reinitializes_highlight() {
        let r = registry(&[false, false, false]);
        let mut menu = opened(&r, None);
        menu.highlight_last(&r);
        let smaller = registry(&[false]);
        assert_eq!(menu.sync(&smaller, None), MenuOutcome::Highlighted(0));
    }

    #[test]
    fn test_sync_closed_is_noop() {
        let mut menu = MenuController::default();
        assert_eq!(menu.sync(&OptionRegistry::default(), None), MenuOutcome::Unchanged);
    }

    // =========================================================================
    // reduce Tests
    // =========================================================================

    #[test]
    fn test_reduce_toggle() {
        let r = registry(&[false]);
        let mut menu = MenuController::default();
        assert_eq!(menu.reduce(&Intent::Toggle, &r, None, 0), Ok(MenuOutcome::Opened));
        assert_eq!(menu.reduce(&Intent::Toggle, &r, None, 0), Ok(MenuOutcome::Closed));
    }

    #[test]
    fn test_reduce_open_empty_is_diagnostic() {
        let mut menu = MenuController::default();
        let err = menu
            .reduce(&Intent::Open, &OptionRegistry::default(), None, 0)
            .unwrap_err();
        assert_eq!(err, Diagnostic::EmptyOptionSet(MenuError::NoEnabledOptions));
    }

    #[test]
    fn test_reduce_focus_and_blur() {
        let r = registry(&[false]);
        let mut menu = MenuController::default();
        menu.reduce(&Intent::Focus, &r, None, 0).unwrap();
        assert_eq!(menu.focus(), FocusTarget::Control);
        menu.reduce(&Intent::Open, &r, None, 0).unwrap();
        assert_eq!(menu.reduce(&Intent::Blur, &r, None, 0), Ok(MenuOutcome::Closed));
        assert_eq!(menu.focus(), FocusTarget::None);
        assert_eq!(menu.reduce(&Intent::Blur, &r, None, 0), Ok(MenuOutcome::Unchanged));
    }

    #[test]
    fn test_reduce_commit_index_disabled_is_diagnostic() {
        let r = registry(&[false, true]);
        let mut menu = opened(&r, None);
        let err = menu.reduce(&Intent::CommitIndex(1), &r, None, 0).unwrap_err();
        assert!(matches!(err, Diagnostic::InvalidSelection(_)));
        assert!(menu.is_open());
    }
}
