//! Ordered change notifications.
//!
//! A [`ChangeStream`] delivers every committed mutation to its subscribers
//! synchronously, in the order the mutations were applied. Each change
//! carries the old and new state plus a sequence number that increases by
//! exactly one per emitted change, so a listener can detect a gap.
//!
//! # Examples
//!
//! ```
//! use formselect_core::ChangeStream;
//! use std::sync::{Arc, Mutex};
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//!
//! let mut stream = ChangeStream::new();
//! stream.subscribe(move |change| sink.lock().unwrap().push((change.old, change.new)));
//! stream.emit(0, 1);
//! stream.emit(1, 2);
//!
//! assert_eq!(*seen.lock().unwrap(), vec![(0, 1), (1, 2)]);
//! ```

use std::fmt;

/// One committed mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change<T> {
    /// State before the mutation
    pub old: T,
    /// State after the mutation
    pub new: T,
    /// 1-based position of this change in the stream
    pub sequence: u64,
}

/// Handle returned by [`ChangeStream::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Type alias for change subscribers.
type Subscriber<T> = Box<dyn FnMut(&Change<T>) + Send>;

/// Synchronous, ordered fan-out of state changes.
pub struct ChangeStream<T> {
    subscribers: Vec<(SubscriptionId, Subscriber<T>)>,
    next_id: u64,
    sequence: u64,
}

impl<T> Default for ChangeStream<T> {
    fn default() -> Self {
        Self {
            subscribers: Vec::new(),
            next_id: 0,
            sequence: 0,
        }
    }
}

impl<T> fmt::Debug for ChangeStream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeStream")
            .field("subscribers", &self.subscribers.len())
            .field("sequence", &self.sequence)
            .finish()
    }
}

impl<T> ChangeStream<T> {
    /// Create an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to changes.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Change<T>) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscriber. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Number of changes emitted so far.
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Emit a change to every subscriber, in subscription order.
    pub fn emit(&mut self, old: T, new: T) -> Change<T> {
        self.sequence += 1;
        let change = Change {
            old,
            new,
            sequence: self.sequence,
        };
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&change);
        }
        change
    }
}
