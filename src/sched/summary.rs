// src/sched/summary.rs

//! Structured result of a single sweep.

use crate::sched::task::TaskId;

/// What happened during one pass of the run loop.
///
/// Useful for tests and host programs that step the scheduler manually and
/// want to make assertions about what changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepSummary {
    /// Tasks whose bodies were invoked during this sweep, in execution
    /// order (the order itself is unspecified across siblings).
    pub stepped: Vec<TaskId>,
    /// Tasks that reached `Finished` during this sweep and left the
    /// registry. Always a subset of `stepped`: only a task's own body can
    /// finish it mid-sweep.
    pub finished: Vec<TaskId>,
}

impl SweepSummary {
    /// Whether the sweep did any work at all.
    pub fn is_quiescent(&self) -> bool {
        self.stepped.is_empty()
    }
}
