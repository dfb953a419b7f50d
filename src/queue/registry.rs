/*******************************************************************************
 * Copyright (c) 2024 Cénotélie Opérations SAS (cenotelie.fr)
 ******************************************************************************/

//! The registry of producer and consumer identities
//!
//! The registry tracks, for each role, which identities are still active and
//! which are currently blocked inside a queue operation (the wait set).
//! Both sets only ever shrink; a retired identity is never re-admitted and is
//! never part of the wait set. The registry is pure bookkeeping, always
//! accessed from within the monitor's critical section; membership
//! preconditions are validated by the monitor before mutation.

use super::{ConsumerId, ProducerId};

/// The membership and wait bookkeeping for one role
#[derive(Debug)]
struct RoleSet {
    /// Whether the identity at each index is still active
    active: Box<[bool]>,
    /// The number of identities still active
    remaining: usize,
    /// Whether the identity at each index is blocked inside an operation
    blocked: Box<[bool]>,
    /// The number of identities currently blocked
    blocked_count: usize,
}

impl RoleSet {
    fn new(count: usize) -> Self {
        Self {
            active: vec![true; count].into_boxed_slice(),
            remaining: count,
            blocked: vec![false; count].into_boxed_slice(),
            blocked_count: 0,
        }
    }

    #[inline]
    fn is_active(&self, index: usize) -> bool {
        self.active.get(index).copied().unwrap_or(false)
    }

    #[inline]
    fn is_blocked(&self, index: usize) -> bool {
        self.blocked.get(index).copied().unwrap_or(false)
    }

    fn mark_blocked(&mut self, index: usize) {
        debug_assert!(self.is_active(index));
        debug_assert!(!self.blocked[index]);
        self.blocked[index] = true;
        self.blocked_count += 1;
    }

    fn mark_unblocked(&mut self, index: usize) {
        debug_assert!(self.blocked[index]);
        self.blocked[index] = false;
        self.blocked_count -= 1;
    }

    fn retire(&mut self, index: usize) {
        debug_assert!(self.is_active(index));
        debug_assert!(!self.is_blocked(index));
        self.active[index] = false;
        self.remaining -= 1;
    }
}

/// The registry for both roles of a queue
#[derive(Debug)]
pub(crate) struct Registry {
    /// The producer set
    producers: RoleSet,
    /// The consumer set
    consumers: RoleSet,
}

impl Registry {
    /// Creates the registry with full initial membership for both roles
    pub fn new(producer_count: usize, consumer_count: usize) -> Self {
        Self {
            producers: RoleSet::new(producer_count),
            consumers: RoleSet::new(consumer_count),
        }
    }

    /// Gets the number of producers not yet retired
    #[inline]
    pub fn producers_remaining(&self) -> usize {
        self.producers.remaining
    }

    /// Gets the number of consumers not yet retired
    #[inline]
    pub fn consumers_remaining(&self) -> usize {
        self.consumers.remaining
    }

    /// Gets the number of producers currently blocked inside `put`
    #[inline]
    pub fn blocked_producers(&self) -> usize {
        self.producers.blocked_count
    }

    /// Gets the number of consumers currently blocked inside `recv`
    #[inline]
    pub fn blocked_consumers(&self) -> usize {
        self.consumers.blocked_count
    }

    #[inline]
    pub fn is_active_producer(&self, id: ProducerId) -> bool {
        self.producers.is_active(id.as_index())
    }

    #[inline]
    pub fn is_active_consumer(&self, id: ConsumerId) -> bool {
        self.consumers.is_active(id.as_index())
    }

    #[inline]
    pub fn is_producer_blocked(&self, id: ProducerId) -> bool {
        self.producers.is_blocked(id.as_index())
    }

    #[inline]
    pub fn is_consumer_blocked(&self, id: ConsumerId) -> bool {
        self.consumers.is_blocked(id.as_index())
    }

    pub fn mark_producer_blocked(&mut self, id: ProducerId) {
        self.producers.mark_blocked(id.as_index());
    }

    pub fn mark_producer_unblocked(&mut self, id: ProducerId) {
        self.producers.mark_unblocked(id.as_index());
    }

    pub fn mark_consumer_blocked(&mut self, id: ConsumerId) {
        self.consumers.mark_blocked(id.as_index());
    }

    pub fn mark_consumer_unblocked(&mut self, id: ConsumerId) {
        self.consumers.mark_unblocked(id.as_index());
    }

    /// Removes a producer from its set; this is the producer's terminal transition
    pub fn retire_producer(&mut self, id: ProducerId) {
        self.producers.retire(id.as_index());
    }

    /// Removes a consumer from its set; this is the consumer's terminal transition
    pub fn retire_consumer(&mut self, id: ConsumerId) {
        self.consumers.retire(id.as_index());
    }
}

#[cfg(test)]
mod tests_registry {
    use super::Registry;
    use crate::queue::{ConsumerId, ProducerId};

    #[test]
    fn membership_shrinks_only() {
        let mut registry = Registry::new(2, 3);
        assert_eq!(registry.producers_remaining(), 2);
        assert_eq!(registry.consumers_remaining(), 3);

        registry.retire_producer(ProducerId::from(1));
        assert_eq!(registry.producers_remaining(), 1);
        assert!(registry.is_active_producer(ProducerId::from(0)));
        assert!(!registry.is_active_producer(ProducerId::from(1)));

        registry.retire_consumer(ConsumerId::from(0));
        assert_eq!(registry.consumers_remaining(), 2);
        assert!(!registry.is_active_consumer(ConsumerId::from(0)));
    }

    #[test]
    fn unknown_identities_are_inactive() {
        let registry = Registry::new(1, 1);
        assert!(!registry.is_active_producer(ProducerId::from(7)));
        assert!(!registry.is_active_consumer(ConsumerId::from(7)));
        assert!(!registry.is_producer_blocked(ProducerId::from(7)));
    }

    #[test]
    fn wait_set_accounting() {
        let mut registry = Registry::new(2, 2);
        registry.mark_producer_blocked(ProducerId::from(0));
        registry.mark_consumer_blocked(ConsumerId::from(1));
        assert_eq!(registry.blocked_producers(), 1);
        assert_eq!(registry.blocked_consumers(), 1);
        assert!(registry.is_producer_blocked(ProducerId::from(0)));
        assert!(!registry.is_producer_blocked(ProducerId::from(1)));

        registry.mark_producer_unblocked(ProducerId::from(0));
        registry.mark_consumer_unblocked(ConsumerId::from(1));
        assert_eq!(registry.blocked_producers(), 0);
        assert_eq!(registry.blocked_consumers(), 0);
    }
}
