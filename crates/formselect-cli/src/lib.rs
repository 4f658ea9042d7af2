//! Library half of the `formselect` binary.

pub mod logging;
pub mod replay;
