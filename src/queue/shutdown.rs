/*******************************************************************************
 * Copyright (c) 2024 Cénotélie Opérations SAS (cenotelie.fr)
 ******************************************************************************/

//! The shutdown coordinator for the queue
//!
//! Once the producer set is empty, every remaining consumer must receive
//! exactly one pill. The thread whose `terminate` retires the last producer
//! becomes the janitor: still inside the same critical section, it snapshots
//! the number of remaining consumers and injects exactly that many pills
//! through the ordinary enqueue path. Because the snapshot and the last
//! retirement are one atomic step, and because consumers can only retire by
//! consuming a pill, the count cannot drift while the injection is in flight;
//! there is no over- or under-provisioning to compensate for.
//!
//! The janitor is a coordination role, not a live producer: its waits on a
//! full buffer are tracked by a dedicated flag so that the wait set never
//! contains a retired identity. It shares the `not_full` condition with
//! producers, which is unambiguous since no producer can be blocked once all
//! of them have retired.
//!
//! All ordinary items were enqueued before the last retirement, so FIFO order
//! puts every pill behind every item: consumers drain the items first, then
//! retire one by one, and the terminal state leaves the buffer empty.

use parking_lot::MutexGuard;

use super::buffer::Slot;
use super::monitor::{PillQueue, State, Waiter};

impl<T> PillQueue<T> {
    /// Injects one pill per consumer remaining at the moment the last
    /// producer retired, blocking for space like any enqueue
    pub(crate) fn inject_pills(&self, state: &mut MutexGuard<'_, State<T>>, survivors: usize) {
        for _ in 0..survivors {
            self.enqueue_blocking(state, Waiter::Janitor, Slot::Pill);
        }
    }
}
