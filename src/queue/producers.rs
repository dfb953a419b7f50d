/*******************************************************************************
 * Copyright (c) 2024 Cénotélie Opérations SAS (cenotelie.fr)
 ******************************************************************************/

//! The producer handles for the queue

use std::sync::Arc;

use super::monitor::PillQueue;
use super::ProducerId;
use crate::errors::MisuseError;

/// A handle owning one producer identity of a queue
///
/// The handle upholds the monitor preconditions by construction: it is
/// attributed exactly once by [`pill_queue`](super::pill_queue), and
/// [`Producer::terminate`] consumes it, so a retired producer can neither put
/// nor terminate again. [`Producer::put`] takes `&mut self`, so the identity
/// can never be suspended under two threads at once, and since `terminate`
/// requires ownership it cannot race a blocked `put` on the same handle.
#[derive(Debug)]
pub struct Producer<T> {
    /// The queue itself
    queue: Arc<PillQueue<T>>,
    /// The identity owned by this handle
    id: ProducerId,
    /// Whether the identity was explicitly retired
    terminated: bool,
}

impl<T> Producer<T> {
    /// Creates the handle for an identity; called once per identity at construction
    pub(crate) fn new(queue: Arc<PillQueue<T>>, id: ProducerId) -> Self {
        Self {
            queue,
            id,
            terminated: false,
        }
    }

    /// Gets the identity owned by this handle
    #[must_use]
    #[inline]
    pub fn id(&self) -> ProducerId {
        self.id
    }

    /// Gets the queue itself
    #[must_use]
    #[inline]
    pub fn queue(&self) -> &Arc<PillQueue<T>> {
        &self.queue
    }

    /// Enqueues an item, blocking while the buffer is full
    ///
    /// # Errors
    ///
    /// Always `Ok` for a live handle; an error is only reachable when the
    /// identity was retired through the token-level [`PillQueue`] API.
    pub fn put(&mut self, item: T) -> Result<(), MisuseError> {
        self.queue.put(self.id, item)
    }

    /// Retires this producer; when it is the last one, the calling thread
    /// injects the shutdown pills before returning
    ///
    /// # Errors
    ///
    /// Always `Ok` for a live handle; an error is only reachable when the
    /// identity was retired through the token-level [`PillQueue`] API.
    pub fn terminate(mut self) -> Result<(), MisuseError> {
        self.terminated = true;
        self.queue.terminate(self.id)
    }
}

impl<T> Drop for Producer<T> {
    fn drop(&mut self) {
        if !self.terminated {
            // dropping the handle retires the producer
            let _ = self.queue.terminate(self.id);
        }
    }
}

#[cfg(test)]
mod tests_producers {
    use crate::queue::pill_queue;

    #[test]
    fn terminate_consumes_the_handle() {
        let (producers, _consumers) = pill_queue::<usize>(4, 2, 1);
        let queue = producers[0].queue().clone();
        for mut producer in producers {
            producer.put(1).unwrap();
            producer.terminate().unwrap();
        }
        assert_eq!(queue.producers_remaining(), 0);
        assert_eq!(queue.pending_pills(), 1);
    }

    #[test]
    fn drop_retires_the_producer() {
        let (producers, _consumers) = pill_queue::<usize>(4, 1, 2);
        let queue = producers[0].queue().clone();
        drop(producers);
        assert_eq!(queue.producers_remaining(), 0);
        // the drop of the last producer drove the injection
        assert_eq!(queue.pending_pills(), 2);
    }
}
