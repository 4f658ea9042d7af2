//! Recoverable conditions raised by the select components.
//!
//! None of these are fatal: the composition root logs them, records them
//! as diagnostics, and leaves state unchanged.

use thiserror::Error;

/// A selection request that does not resolve to an enabled option.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// Index past the end of the option set
    #[error("option index {index} out of range for {len} options")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of options
        len: usize,
    },
    /// Index refers to a disabled option
    #[error("option {index} is disabled")]
    OptionDisabled {
        /// Requested index
        index: usize,
    },
    /// No option carries the requested value
    #[error("no option with value '{value}'")]
    NoMatchingValue {
        /// Requested value
        value: String,
    },
}

/// Menu conditions that force the popup closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MenuError {
    /// The option set has no enabled option to highlight
    #[error("no enabled options to show")]
    NoEnabledOptions,
}

/// A recovered condition, as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    /// Rejected selection request
    #[error("invalid selection request: {0}")]
    InvalidSelection(#[from] SelectionError),
    /// Menu could not stay or become open
    #[error("empty option set: {0}")]
    EmptyOptionSet(#[from] MenuError),
}
