// src/errors.rs

//! Crate-wide error types.

use thiserror::Error;

use crate::sched::task::TaskId;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoschedError {
    /// An `after`/`during`/`when` attachment named a predecessor that is not
    /// (or is no longer) in the registry.
    ///
    /// Recoverable: the dependent stays registered but dormant, and the
    /// scheduler keeps running.
    #[error("predecessor task {0} not found in registry")]
    PredecessorNotFound(TaskId),
}

pub type Result<T> = std::result::Result<T, CoschedError>;
