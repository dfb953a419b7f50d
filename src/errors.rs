/*******************************************************************************
 * Copyright (c) 2024 Cénotélie Opérations SAS (cenotelie.fr)
 ******************************************************************************/

//! Definition of errors for this crate
//!
//! The protocol has no I/O and no external failure source, so the taxonomy is
//! entirely about precondition violations. Capacity is enforced by blocking,
//! never by rejection, so there is no capacity error.

use core::fmt::Display;

/// Error when an operation is invoked in violation of its preconditions
///
/// These are programming errors on the caller's side and are not recoverable
/// at runtime; the queue rejects the operation instead of attempting a silent
/// recovery. The safe [`Producer`](crate::queue::Producer) and
/// [`Consumer`](crate::queue::Consumer) handles uphold the preconditions by
/// construction; misuse is only reachable through the token-level monitor API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MisuseError {
    /// The operation requires an active producer, but the identity is retired or unknown
    NotAProducer,
    /// The operation requires an active consumer, but the identity is retired or unknown
    NotAConsumer,
    /// A producer cannot elect to terminate while it is blocked inside `put`
    TerminateWhileBlocked,
    /// The identity is already suspended inside an operation; a member of the
    /// wait set cannot enter a second operation concurrently
    AlreadyBlocked,
}

impl Display for MisuseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotAProducer => write!(f, "misuse: the caller is not an active producer"),
            Self::NotAConsumer => write!(f, "misuse: the caller is not an active consumer"),
            Self::TerminateWhileBlocked => {
                write!(f, "misuse: a producer blocked inside put cannot terminate")
            }
            Self::AlreadyBlocked => {
                write!(f, "misuse: the identity is already blocked inside an operation")
            }
        }
    }
}

impl core::error::Error for MisuseError {}

impl MisuseError {
    /// Tests whether the misuse is a role violation, as opposed to a lifecycle violation
    #[must_use]
    pub fn is_role_violation(&self) -> bool {
        matches!(self, Self::NotAProducer | Self::NotAConsumer)
    }
}

/// Error when receiving an item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecvError {
    /// The consumer consumed a pill and is now retired; no further item will be delivered
    Retired,
}

impl Display for RecvError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Retired => write!(f, "failed to receive: the consumer is retired"),
        }
    }
}

impl core::error::Error for RecvError {}

impl RecvError {
    /// Tests whether the cause of the error is the consumer being retired
    #[must_use]
    pub fn is_retired(&self) -> bool {
        matches!(self, Self::Retired)
    }
}
