//! Jump-to-option by typed prefix.

use super::option::OptionRegistry;

/// Accumulates typed characters into a case-insensitive prefix.
///
/// The buffer resets once `timeout_ms` elapses between two inputs.
#[derive(Debug, Clone)]
pub struct Typeahead {
    buffer: String,
    last_input_ms: Option<u64>,
    timeout_ms: u64,
}

impl Typeahead {
    /// Create an empty buffer with the given inactivity window.
    #[must_use]
    pub const fn new(timeout_ms: u64) -> Self {
        Self {
            buffer: String::new(),
            last_input_ms: None,
            timeout_ms,
        }
    }

    /// Current lowercased prefix.
    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Inactivity window in milliseconds.
    #[must_use]
    pub const fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Change the inactivity window.
    pub fn set_timeout_ms(&mut self, timeout_ms: u64) {
        self.timeout_ms = timeout_ms;
    }

    /// Drop the accumulated prefix.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.last_input_ms = None;
    }

    /// Append typed text at `now_ms`, expiring a stale prefix first.
    ///
    /// Returns false when the text held nothing printable.
    pub fn push(&mut self, text: &str, now_ms: u64) -> bool {
        let printable: String = text.chars().filter(|c| !c.is_control()).collect();
        if printable.is_empty() {
            return false;
        }
        if self
            .last_input_ms
            .is_some_and(|last| now_ms.saturating_sub(last) >= self.timeout_ms)
        {
            self.buffer.clear();
        }
        self.buffer.extend(printable.chars().flat_map(char::to_lowercase));
        self.last_input_ms = Some(now_ms);
        true
    }

    /// Find the option the current prefix points at, relative to `current`.
    ///
    /// A buffer of one repeated character cycles through the options that
    /// start with it, beginning after `current`. A longer prefix searches
    /// from `current` inclusively so that extending a match keeps it.
    #[must_use]
    pub fn find(&self, registry: &OptionRegistry, current: Option<usize>) -> Option<usize> {
        let mut chars = self.buffer.chars();
        let first = chars.next()?;
        let len = registry.len();
        if len == 0 {
            return None;
        }

        let (needle, start) = if chars.all(|c| c == first) {
            (first.to_string(), current.map_or(0, |i| i + 1))
        } else {
            (self.buffer.clone(), current.unwrap_or(0))
        };

        (0..len)
            .map(|step| (start + step) % len)
            .find(|&i| {
                registry.get_by_index(i).is_some_and(|option| {
                    option.is_enabled() && option.text.to_lowercase().starts_with(&needle)
                })
            })
    }

    /// Push `text` and resolve the new highlight target.
    pub fn handle(
        &mut self,
        text: &str,
        now_ms: u64,
        registry: &OptionRegistry,
        current: Option<usize>,
    ) -> Option<usize> {
        if !self.push(text, now_ms) {
            return None;
        }
        let found = self.find(registry, current);
        tracing::debug!(prefix = %self.buffer, found = ?found, "typeahead");
        found
    }
}
