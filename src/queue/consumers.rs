/*******************************************************************************
 * Copyright (c) 2024 Cénotélie Opérations SAS (cenotelie.fr)
 ******************************************************************************/

//! The consumer handles for the queue

use std::sync::Arc;

use super::monitor::PillQueue;
use super::ConsumerId;
use crate::errors::{MisuseError, RecvError};

/// A handle owning one consumer identity of a queue
///
/// Consumers cannot elect to retire: the only terminal transition is consuming
/// a pill, delivered by the shutdown coordinator once every producer has
/// retired. [`Consumer::recv`] takes `&mut self`, so the identity can never be
/// suspended under two threads at once. Dropping a handle before retirement is
/// a contract violation, as the pill provisioned for it would never be
/// drained.
#[derive(Debug)]
pub struct Consumer<T> {
    /// The queue itself
    queue: Arc<PillQueue<T>>,
    /// The identity owned by this handle
    id: ConsumerId,
}

impl<T> Consumer<T> {
    /// Creates the handle for an identity; called once per identity at construction
    pub(crate) fn new(queue: Arc<PillQueue<T>>, id: ConsumerId) -> Self {
        Self { queue, id }
    }

    /// Gets the identity owned by this handle
    #[must_use]
    #[inline]
    pub fn id(&self) -> ConsumerId {
        self.id
    }

    /// Gets the queue itself
    #[must_use]
    #[inline]
    pub fn queue(&self) -> &Arc<PillQueue<T>> {
        &self.queue
    }

    /// Gets whether this consumer has consumed its pill and left the consumer set
    #[must_use]
    pub fn retired(&self) -> bool {
        !self.queue.is_active_consumer(self.id)
    }

    /// Dequeues the next item, blocking while the buffer is empty
    ///
    /// `Ok(Some(item))` delivers an ordinary item; `Ok(None)` means this
    /// consumer dequeued a pill and is now retired.
    ///
    /// # Errors
    ///
    /// Returns `MisuseError::NotAConsumer` when called again after retirement.
    pub fn recv(&mut self) -> Result<Option<T>, MisuseError> {
        self.queue.recv(self.id)
    }

    /// Dequeues the next item, folding retirement into the error channel so
    /// the caller can loop with `?` or `while let Ok(item)`
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Retired` once the pill is consumed, and on every
    /// call thereafter.
    pub fn recv_item(&mut self) -> Result<T, RecvError> {
        match self.queue.recv(self.id) {
            Ok(Some(item)) => Ok(item),
            Ok(None) | Err(_) => Err(RecvError::Retired),
        }
    }
}

#[cfg(test)]
mod tests_consumers {
    use crate::errors::{MisuseError, RecvError};
    use crate::queue::pill_queue;

    #[test]
    fn recv_signals_retirement_once() {
        let (producers, mut consumers) = pill_queue::<usize>(4, 1, 1);
        let mut producer = producers.into_iter().next().unwrap();
        let consumer = &mut consumers[0];

        producer.put(5).unwrap();
        producer.terminate().unwrap();

        assert!(!consumer.retired());
        assert_eq!(consumer.recv().unwrap(), Some(5));
        assert_eq!(consumer.recv().unwrap(), None);
        assert!(consumer.retired());
        assert_eq!(consumer.recv(), Err(MisuseError::NotAConsumer));
    }

    #[test]
    fn recv_item_folds_retirement_into_the_error() {
        let (producers, mut consumers) = pill_queue::<usize>(4, 1, 1);
        let mut producer = producers.into_iter().next().unwrap();
        let consumer = &mut consumers[0];

        producer.put(9).unwrap();
        producer.terminate().unwrap();

        assert_eq!(consumer.recv_item(), Ok(9));
        assert_eq!(consumer.recv_item(), Err(RecvError::Retired));
        assert_eq!(consumer.recv_item(), Err(RecvError::Retired));
    }
}
