/*******************************************************************************
 * Copyright (c) 2024 Cénotélie Opérations SAS (cenotelie.fr)
 ******************************************************************************/


/// The capacity of the buffer to use
pub const SCALE_CAPACITY: usize = 32;

/// The number of items pushed by each producer
pub const SCALE_MSG_COUNT: usize = 10_000;

/// The number of producers in the stress tests
pub const SCALE_PRODUCERS: usize = 4;

/// The number of consumers in the stress tests
pub const SCALE_CONSUMERS: usize = 4;
