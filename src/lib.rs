/*******************************************************************************
 * Copyright (c) 2024 Cénotélie Opérations SAS (cenotelie.fr)
 ******************************************************************************/

//! # Pillbox
//!
//! A bounded, blocking, multi-producer / multi-consumer queue with a coordinated
//! shutdown protocol (poison-pill termination).
//! A fixed set of producers and a fixed set of consumers exchange items through a
//! fixed-capacity FIFO buffer; producers block while the buffer is full and
//! consumers block while it is empty.
//! When the last producer retires, exactly one pill per remaining consumer is
//! injected through the ordinary queue path, so that every consumer is woken and
//! retired without any consumer missing the signal and without deadlock.
//!
//! The pill itself is internal to the crate: application code can neither
//! construct nor enqueue it, it only observes retirement as the end of the item
//! stream.
//!
//!
//! ## Example
//!
//! Create a queue with 2 producers and 3 consumers over a buffer of 8 slots.
//! ```
//! use pillbox::queue::pill_queue;
//!
//! let (producers, consumers) = pill_queue::<usize>(8, 2, 3);
//!
//! let consumer_threads = consumers
//!     .into_iter()
//!     .map(|mut consumer| {
//!         std::thread::spawn(move || {
//!             let mut received = Vec::new();
//!             while let Some(item) = consumer.recv().unwrap() {
//!                 received.push(item);
//!             }
//!             received
//!         })
//!     })
//!     .collect::<Vec<_>>();
//!
//! for (p, mut producer) in producers.into_iter().enumerate() {
//!     for i in 0..100 {
//!         producer.put(p * 100 + i).unwrap();
//!     }
//!     // the last terminating producer injects the pills
//!     producer.terminate().unwrap();
//! }
//!
//! let total: usize = consumer_threads
//!     .into_iter()
//!     .map(|thread| thread.join().unwrap().len())
//!     .sum();
//! assert_eq!(total, 200);
//! ```
//!
//!
//! ## License
//!
//! Copyright 2024 Cénotélie Opérations SAS
//!
//! Permission is hereby granted, free of charge, to any person obtaining a copy of this software and associated documentation files (the “Software”), to deal in the Software without restriction, including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do so, subject to the following conditions:
//!
//! The above copyright notice and this permission notice shall be included in all copies or substantial portions of the Software.
//!
//! THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
//!

#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc, clippy::module_name_repetitions)]
#![forbid(unsafe_code)]

pub mod errors;
pub mod prelude;
pub mod queue;

#[cfg(test)]
mod tests;
