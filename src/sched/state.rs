// src/sched/state.rs

//! Task lifecycle states.

use std::fmt;

/// Where a scheduled task is in its lifecycle.
///
/// The markers are ordered but not linear: a task normally goes
/// `Pending -> Running -> Finished`, and any value may be re-assigned.
/// Each assignment is a fresh event for dependency notification, even when
/// the value does not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    /// Created but not yet eligible to execute.
    Pending,
    /// Transient activation marker.
    ///
    /// The built-in activation path assigns [`Running`](TaskState::Running)
    /// directly, so this value only ever appears when a task body assigns it
    /// explicitly. Dependents bound to `Starting` observe exactly those
    /// explicit assignments and nothing else; wiring against it without an
    /// explicitly announcing predecessor leaves the dependent pending
    /// forever.
    Starting,
    /// Eligible for execution on every sweep.
    Running,
    /// Terminal: the task is removed from the registry and its dependents
    /// are released the moment this is assigned.
    Finished,
}

impl TaskState {
    /// Whether this state ends the task's lifecycle.
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Finished)
    }

    /// Whether a task in this state is invoked by the run loop.
    pub fn is_runnable(self) -> bool {
        matches!(self, TaskState::Running)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskState::Pending => "pending",
            TaskState::Starting => "starting",
            TaskState::Running => "running",
            TaskState::Finished => "finished",
        };
        f.write_str(s)
    }
}
