/*******************************************************************************
 * Copyright (c) 2024 Cénotélie Opérations SAS (cenotelie.fr)
 ******************************************************************************/

//! Bounded blocking queue with poison-pill shutdown.
//! The queue implemented in this module is a fixed-capacity FIFO buffer guarded by a
//! single monitor, with producers and consumers blocking on role-scoped condition
//! variables and a janitor injecting one pill per remaining consumer once the last
//! producer has retired.

use std::sync::Arc;

mod buffer;
mod consumers;
mod monitor;
mod producers;
mod registry;
mod shutdown;

pub use consumers::Consumer;
pub use monitor::PillQueue;
pub use producers::Producer;

/// The identity of a producer within a queue.
/// Identities are indices in `0..producer_count`, attributed once at construction;
/// membership only shrinks, a retired identity is never re-admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ProducerId(usize);

impl From<usize> for ProducerId {
    #[inline]
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl ProducerId {
    /// Gets the value of the identity that can be used as an index within the registry
    #[must_use]
    #[inline]
    pub fn as_index(self) -> usize {
        self.0
    }
}

/// The identity of a consumer within a queue, an index in `0..consumer_count`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ConsumerId(usize);

impl From<usize> for ConsumerId {
    #[inline]
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl ConsumerId {
    /// Gets the value of the identity that can be used as an index within the registry
    #[must_use]
    #[inline]
    pub fn as_index(self) -> usize {
        self.0
    }
}

/// Creates a bounded blocking queue and its full initial membership.
/// The sets of producers and consumers are fixed at construction: handles are
/// attributed exactly once and only ever leave their set, producers through
/// [`Producer::terminate`] and consumers by consuming a pill.
///
/// # Panics
///
/// Panics when `capacity` is zero or either role set would be empty.
#[must_use]
pub fn pill_queue<T>(capacity: usize, producers: usize, consumers: usize) -> (Vec<Producer<T>>, Vec<Consumer<T>>) {
    let queue = Arc::new(PillQueue::new(capacity, producers, consumers));
    let producers = (0..producers)
        .map(|id| Producer::new(queue.clone(), ProducerId::from(id)))
        .collect();
    let consumers = (0..consumers)
        .map(|id| Consumer::new(queue.clone(), ConsumerId::from(id)))
        .collect();
    (producers, consumers)
}

#[cfg(test)]
mod tests_init {
    use super::pill_queue;

    #[test]
    fn handle_count_matches_membership() {
        let (producers, consumers) = pill_queue::<usize>(4, 2, 3);
        assert_eq!(producers.len(), 2);
        assert_eq!(consumers.len(), 3);
        let queue = producers[0].queue();
        assert_eq!(queue.capacity(), 4);
        assert_eq!(queue.producers_remaining(), 2);
        assert_eq!(queue.consumers_remaining(), 3);
        assert!(queue.is_empty());
    }

    #[test]
    #[should_panic(expected = "capacity must be at least 1")]
    fn panic_on_zero_capacity() {
        let _ = pill_queue::<usize>(0, 1, 1);
    }

    #[test]
    #[should_panic(expected = "there must be at least one producer")]
    fn panic_on_no_producer() {
        let _ = pill_queue::<usize>(1, 0, 1);
    }

    #[test]
    #[should_panic(expected = "there must be at least one consumer")]
    fn panic_on_no_consumer() {
        let _ = pill_queue::<usize>(1, 1, 0);
    }
}
