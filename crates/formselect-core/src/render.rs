//! Batched render scheduling.
//!
//! State mutations call [`RenderScheduler::invalidate`]; the host drives one
//! pass per task with [`RenderScheduler::begin_pass`]. Any number of
//! invalidations between two passes coalesce into a single pass, and a pass
//! always reflects the state at the time it runs rather than the
//! intermediate states that caused it.

/// A render pass granted by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderPass {
    /// 1-based pass counter
    pub generation: u64,
    /// Invalidations folded into this pass
    pub coalesced: usize,
}

/// Dirty-flag scheduler for the view reconciliation pass.
#[derive(Debug, Clone, Default)]
pub struct RenderScheduler {
    pending: usize,
    generation: u64,
}

impl RenderScheduler {
    /// Create a clean scheduler.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: 0,
            generation: 0,
        }
    }

    /// Mark the view stale.
    pub fn invalidate(&mut self) {
        self.pending += 1;
    }

    /// Check whether a pass is due.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.pending > 0
    }

    /// Invalidations waiting for the next pass.
    #[must_use]
    pub const fn pending(&self) -> usize {
        self.pending
    }

    /// Passes run so far.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a pass if one is due, clearing the dirty state.
    pub fn begin_pass(&mut self) -> Option<RenderPass> {
        if self.pending == 0 {
            return None;
        }
        self.generation += 1;
        let pass = RenderPass {
            generation: self.generation,
            coalesced: self.pending,
        };
        self.pending = 0;
        Some(pass)
    }
}
