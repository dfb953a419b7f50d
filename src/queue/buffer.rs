/*******************************************************************************
 * Copyright (c) 2024 Cénotélie Opérations SAS (cenotelie.fr)
 ******************************************************************************/

//! The bounded FIFO buffer for the queue
//!
//! This is a pure data structure: blocking is layered on top by the monitor,
//! which is also responsible for upholding the enqueue/dequeue preconditions.

use std::collections::VecDeque;

/// A slot in the buffer: either an application item, or the poison pill.
/// The pill is crate-private so application code can never construct one and
/// push it through `put`; pills only enter the buffer through the shutdown
/// coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot<T> {
    /// An ordinary item handed over by a producer
    Item(T),
    /// The reserved shutdown sentinel
    Pill,
}

/// A fixed-capacity FIFO buffer of slots
///
/// Invariants: `len() <= capacity()` at all times, and items leave in the
/// order they entered.
#[derive(Debug)]
pub(crate) struct Buffer<T> {
    /// The buffered slots, head at the front
    slots: VecDeque<Slot<T>>,
    /// The fixed capacity, at least 1
    capacity: usize,
    /// The number of pills currently buffered
    pills: usize,
}

impl<T> Buffer<T> {
    /// Creates an empty buffer with the given capacity
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity >= 1);
        Self {
            slots: VecDeque::with_capacity(capacity),
            capacity,
            pills: 0,
        }
    }

    /// Gets the fixed capacity of the buffer
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Gets the number of buffered slots, pills included
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Gets whether the buffer holds no slot
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Gets whether the buffer is at capacity
    #[inline]
    pub fn is_full(&self) -> bool {
        self.slots.len() == self.capacity
    }

    /// Gets the number of pills currently buffered
    #[inline]
    pub fn pills(&self) -> usize {
        self.pills
    }

    /// Appends a slot at the tail
    /// The caller must have established that the buffer is not full.
    pub fn enqueue(&mut self, slot: Slot<T>) {
        debug_assert!(!self.is_full());
        if matches!(slot, Slot::Pill) {
            self.pills += 1;
        }
        self.slots.push_back(slot);
    }

    /// Removes and returns the slot at the head
    /// The caller must have established that the buffer is not empty.
    pub fn dequeue(&mut self) -> Slot<T> {
        let Some(slot) = self.slots.pop_front() else {
            panic!("dequeue on an empty buffer");
        };
        if matches!(slot, Slot::Pill) {
            self.pills -= 1;
        }
        slot
    }
}

#[cfg(test)]
mod tests_buffer {
    use super::{Buffer, Slot};

    #[test]
    fn fifo_order() {
        let mut buffer = Buffer::new(4);
        for i in 0..4 {
            buffer.enqueue(Slot::Item(i));
        }
        assert!(buffer.is_full());
        for i in 0..4 {
            assert_eq!(buffer.dequeue(), Slot::Item(i));
        }
        assert!(buffer.is_empty());
    }

    #[test]
    fn length_accounting() {
        let mut buffer = Buffer::<usize>::new(2);
        assert_eq!(buffer.capacity(), 2);
        assert_eq!(buffer.len(), 0);
        buffer.enqueue(Slot::Item(1));
        assert_eq!(buffer.len(), 1);
        assert!(!buffer.is_full());
        buffer.enqueue(Slot::Item(2));
        assert!(buffer.is_full());
        let _ = buffer.dequeue();
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn pill_accounting() {
        let mut buffer = Buffer::<usize>::new(3);
        buffer.enqueue(Slot::Item(1));
        buffer.enqueue(Slot::Pill);
        buffer.enqueue(Slot::Pill);
        assert_eq!(buffer.pills(), 2);
        assert_eq!(buffer.dequeue(), Slot::Item(1));
        assert_eq!(buffer.pills(), 2);
        assert_eq!(buffer.dequeue(), Slot::Pill);
        assert_eq!(buffer.pills(), 1);
        assert_eq!(buffer.dequeue(), Slot::Pill);
        assert_eq!(buffer.pills(), 0);
    }
}
