//! Identity of the control a popup anchors to.

use serde::{Deserialize, Serialize};

/// Unique identifier for a control instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct WidgetId(pub u64);

impl WidgetId {
    /// Create a new widget ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_id() {
        let id = WidgetId::new(42);
        assert_eq!(id.0, 42);
        assert_eq!(id, WidgetId(42));
        assert_eq!(WidgetId::default(), WidgetId(0));
    }
}
