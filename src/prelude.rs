/*******************************************************************************
 * Copyright (c) 2024 Cénotélie Opérations SAS (cenotelie.fr)
 ******************************************************************************/

//! Prelude for the pillbox queue

pub use crate::errors::{MisuseError, RecvError};
pub use crate::queue::{pill_queue, Consumer, PillQueue, Producer};
