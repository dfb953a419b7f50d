/*******************************************************************************
 * Copyright (c) 2024 Cénotélie Opérations SAS (cenotelie.fr)
 ******************************************************************************/

//! The blocking monitor for the queue
//!
//! All operations execute as mutually exclusive critical sections over a single
//! shared-state unit (buffer plus registry); only suspension inside a blocked
//! `put` or `recv` releases exclusivity. There are exactly two suspension
//! points: a producer waits while the buffer is full, a consumer waits while it
//! is empty. A woken thread re-validates its precondition before proceeding, so
//! spurious wake-ups are harmless and no space or item is ever reserved for a
//! particular waiter.
//!
//! Notification is targeted at the opposite role: an enqueue can only create
//! work for consumers and a dequeue can only create space for producers, so
//! waking same-role waiters would be a wasted signal. One waiter is woken per
//! state change, and only when the wait set of the opposite role is non-empty.

use crossbeam_utils::CachePadded;
use parking_lot::{Condvar, Mutex, MutexGuard};

use super::buffer::{Buffer, Slot};
use super::registry::Registry;
use super::{ConsumerId, ProducerId};
use crate::errors::MisuseError;

/// The shared mutable state of a queue: the buffer and the membership sets.
/// Cross-set atomicity (for the shutdown trigger) requires that they live
/// under the same lock.
#[derive(Debug)]
pub(crate) struct State<T> {
    /// The bounded FIFO buffer
    pub buffer: Buffer<T>,
    /// The producer/consumer membership and wait sets
    pub registry: Registry,
    /// Whether the janitor is waiting for space during pill injection.
    /// The janitor runs on the last retired producer's thread and is no longer
    /// a member of any role set, so its wait is tracked apart from the wait
    /// sets of the registry.
    pub janitor_waiting: bool,
}

/// The identity under which a thread waits for space in the buffer
#[derive(Debug, Clone, Copy)]
pub(crate) enum Waiter {
    /// An active producer blocked inside `put`
    Producer(ProducerId),
    /// The shutdown janitor blocked while injecting pills
    Janitor,
}

/// A bounded blocking MPMC queue with coordinated poison-pill shutdown
///
/// This is the token-level contract: operations take the caller's identity and
/// reject precondition violations with a [`MisuseError`]. The safe
/// [`Producer`](super::Producer) and [`Consumer`](super::Consumer) handles
/// uphold the preconditions by construction; see
/// [`pill_queue`](super::pill_queue) for obtaining them.
#[derive(Debug)]
pub struct PillQueue<T> {
    /// The shared state, under the one monitor lock
    pub(crate) state: CachePadded<Mutex<State<T>>>,
    /// Signaled when space may be available; awaited by producers and the janitor
    pub(crate) not_full: CachePadded<Condvar>,
    /// Signaled when an item may be available; awaited by consumers
    pub(crate) not_empty: CachePadded<Condvar>,
}

impl<T> PillQueue<T> {
    /// Creates a queue with full initial membership for both roles
    ///
    /// # Panics
    ///
    /// Panics when `capacity` is zero or either role set would be empty.
    #[must_use]
    pub fn new(capacity: usize, producer_count: usize, consumer_count: usize) -> Self {
        assert!(capacity >= 1, "capacity must be at least 1");
        assert!(producer_count >= 1, "there must be at least one producer");
        assert!(consumer_count >= 1, "there must be at least one consumer");
        Self {
            state: CachePadded::new(Mutex::new(State {
                buffer: Buffer::new(capacity),
                registry: Registry::new(producer_count, consumer_count),
                janitor_waiting: false,
            })),
            not_full: CachePadded::new(Condvar::new()),
            not_empty: CachePadded::new(Condvar::new()),
        }
    }

    /// Enqueues an item, blocking while the buffer is full
    ///
    /// # Errors
    ///
    /// Returns `MisuseError::NotAProducer` when the identity is not an active
    /// producer, and `MisuseError::AlreadyBlocked` when the identity is
    /// currently suspended inside another `put`: a member of the wait set is
    /// not concurrently executing any other queue operation.
    pub fn put(&self, id: ProducerId, item: T) -> Result<(), MisuseError> {
        let mut state = self.state.lock();
        if !state.registry.is_active_producer(id) {
            return Err(MisuseError::NotAProducer);
        }
        if state.registry.is_producer_blocked(id) {
            return Err(MisuseError::AlreadyBlocked);
        }
        self.enqueue_blocking(&mut state, Waiter::Producer(id), Slot::Item(item));
        Ok(())
    }

    /// Dequeues the head item, blocking while the buffer is empty
    ///
    /// `Ok(Some(item))` delivers an ordinary item. `Ok(None)` means the
    /// consumer dequeued a pill: it has been removed from the consumer set and
    /// must not call `recv` again.
    ///
    /// # Errors
    ///
    /// Returns `MisuseError::NotAConsumer` when the identity is not an active
    /// consumer, and `MisuseError::AlreadyBlocked` when the identity is
    /// currently suspended inside another `recv`.
    pub fn recv(&self, id: ConsumerId) -> Result<Option<T>, MisuseError> {
        let mut state = self.state.lock();
        if !state.registry.is_active_consumer(id) {
            return Err(MisuseError::NotAConsumer);
        }
        if state.registry.is_consumer_blocked(id) {
            return Err(MisuseError::AlreadyBlocked);
        }
        while state.buffer.is_empty() {
            state.registry.mark_consumer_blocked(id);
            self.not_empty.wait(&mut state);
            state.registry.mark_consumer_unblocked(id);
        }
        let slot = state.buffer.dequeue();
        if state.registry.blocked_producers() > 0 || state.janitor_waiting {
            self.not_full.notify_one();
        }
        match slot {
            Slot::Item(item) => Ok(Some(item)),
            Slot::Pill => {
                state.registry.retire_consumer(id);
                if state.registry.consumers_remaining() == 0 {
                    // terminal state: both sets empty, buffer drained
                    debug_assert_eq!(state.registry.producers_remaining(), 0);
                    debug_assert!(state.buffer.is_empty());
                }
                Ok(None)
            }
        }
    }

    /// Removes a producer from the producer set; this is its terminal transition
    ///
    /// When this retires the last producer, the calling thread becomes the
    /// janitor and injects one pill per remaining consumer before returning.
    ///
    /// # Errors
    ///
    /// Returns `MisuseError::NotAProducer` when the identity is not an active
    /// producer, and `MisuseError::TerminateWhileBlocked` when the producer is
    /// currently blocked inside `put` (it must be released first).
    pub fn terminate(&self, id: ProducerId) -> Result<(), MisuseError> {
        let mut state = self.state.lock();
        if !state.registry.is_active_producer(id) {
            return Err(MisuseError::NotAProducer);
        }
        if state.registry.is_producer_blocked(id) {
            return Err(MisuseError::TerminateWhileBlocked);
        }
        state.registry.retire_producer(id);
        if state.registry.producers_remaining() == 0 {
            // the consumer count snapshot and the retirement are one atomic step
            let survivors = state.registry.consumers_remaining();
            self.inject_pills(&mut state, survivors);
        }
        Ok(())
    }

    /// Appends a slot at the tail, waiting for space while the buffer is full,
    /// then wakes one blocked consumer if there is any
    pub(crate) fn enqueue_blocking(&self, state: &mut MutexGuard<'_, State<T>>, waiter: Waiter, slot: Slot<T>) {
        while state.buffer.is_full() {
            match waiter {
                Waiter::Producer(id) => state.registry.mark_producer_blocked(id),
                Waiter::Janitor => state.janitor_waiting = true,
            }
            self.not_full.wait(state);
            match waiter {
                Waiter::Producer(id) => state.registry.mark_producer_unblocked(id),
                Waiter::Janitor => state.janitor_waiting = false,
            }
        }
        state.buffer.enqueue(slot);
        if state.registry.blocked_consumers() > 0 {
            self.not_empty.notify_one();
        }
    }

    /// Gets the fixed capacity of the buffer
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.state.lock().buffer.capacity()
    }

    /// Gets the number of buffered slots, pills included
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().buffer.len()
    }

    /// Gets whether the buffer holds no slot
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.lock().buffer.is_empty()
    }

    /// Gets whether the buffer is at capacity
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.state.lock().buffer.is_full()
    }

    /// Gets the number of pills currently buffered
    #[must_use]
    pub fn pending_pills(&self) -> usize {
        self.state.lock().buffer.pills()
    }

    /// Gets the number of producers not yet retired
    #[must_use]
    pub fn producers_remaining(&self) -> usize {
        self.state.lock().registry.producers_remaining()
    }

    /// Gets the number of consumers not yet retired
    #[must_use]
    pub fn consumers_remaining(&self) -> usize {
        self.state.lock().registry.consumers_remaining()
    }

    /// Gets whether an identity is still a member of the producer set
    #[must_use]
    pub fn is_active_producer(&self, id: ProducerId) -> bool {
        self.state.lock().registry.is_active_producer(id)
    }

    /// Gets whether an identity is still a member of the consumer set
    #[must_use]
    pub fn is_active_consumer(&self, id: ConsumerId) -> bool {
        self.state.lock().registry.is_active_consumer(id)
    }

    /// Gets whether a producer is currently blocked inside `put`
    #[must_use]
    pub fn is_producer_blocked(&self, id: ProducerId) -> bool {
        self.state.lock().registry.is_producer_blocked(id)
    }

    /// Gets whether a consumer is currently blocked inside `recv`
    #[must_use]
    pub fn is_consumer_blocked(&self, id: ConsumerId) -> bool {
        self.state.lock().registry.is_consumer_blocked(id)
    }

    /// Gets whether the queue reached its terminal state: both role sets empty
    /// and the buffer drained
    #[must_use]
    pub fn is_quiescent(&self) -> bool {
        let state = self.state.lock();
        state.registry.producers_remaining() == 0
            && state.registry.consumers_remaining() == 0
            && state.buffer.is_empty()
    }
}

#[cfg(test)]
mod tests_monitor {
    use super::PillQueue;
    use crate::errors::MisuseError;
    use crate::queue::{ConsumerId, ProducerId};

    #[test]
    fn immediate_put_and_recv() {
        let queue = PillQueue::<usize>::new(2, 1, 1);
        let producer = ProducerId::from(0);
        let consumer = ConsumerId::from(0);

        queue.put(producer, 1).unwrap();
        queue.put(producer, 2).unwrap();
        assert!(queue.is_full());
        assert_eq!(queue.recv(consumer).unwrap(), Some(1));
        assert_eq!(queue.recv(consumer).unwrap(), Some(2));
        assert!(queue.is_empty());
    }

    #[test]
    fn rejects_unknown_identities() {
        let queue = PillQueue::<usize>::new(1, 1, 1);
        assert_eq!(queue.put(ProducerId::from(4), 1), Err(MisuseError::NotAProducer));
        assert_eq!(queue.recv(ConsumerId::from(4)), Err(MisuseError::NotAConsumer));
        assert_eq!(queue.terminate(ProducerId::from(4)), Err(MisuseError::NotAProducer));
    }

    #[test]
    fn rejects_operations_after_terminate() {
        let queue = PillQueue::<usize>::new(4, 2, 1);
        let producer = ProducerId::from(0);
        queue.terminate(producer).unwrap();
        assert_eq!(queue.put(producer, 1), Err(MisuseError::NotAProducer));
        assert_eq!(queue.terminate(producer), Err(MisuseError::NotAProducer));
        assert_eq!(queue.producers_remaining(), 1);
    }

    #[test]
    fn rejects_recv_after_retirement() {
        let queue = PillQueue::<usize>::new(4, 1, 1);
        let producer = ProducerId::from(0);
        let consumer = ConsumerId::from(0);

        queue.put(producer, 7).unwrap();
        queue.terminate(producer).unwrap();
        assert_eq!(queue.recv(consumer).unwrap(), Some(7));
        // the pill retires the consumer exactly once
        assert_eq!(queue.recv(consumer).unwrap(), None);
        assert_eq!(queue.recv(consumer), Err(MisuseError::NotAConsumer));
        assert!(queue.is_quiescent());
    }

    #[test]
    fn capacity_one_holds_a_single_slot() {
        let queue = PillQueue::<usize>::new(1, 1, 1);
        let producer = ProducerId::from(0);
        let consumer = ConsumerId::from(0);
        queue.put(producer, 42).unwrap();
        assert!(queue.is_full());
        assert_eq!(queue.recv(consumer).unwrap(), Some(42));
        assert!(queue.is_empty());
    }

    #[test]
    #[should_panic(expected = "capacity must be at least 1")]
    fn panic_on_zero_capacity() {
        let _ = PillQueue::<usize>::new(0, 1, 1);
    }
}
