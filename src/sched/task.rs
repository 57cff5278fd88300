// src/sched/task.rs

//! The task capability trait, task identity, and registry records.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::sched::request::ScheduleRequest;
use crate::sched::scheduler::Scheduler;
use crate::sched::state::TaskState;

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a scheduled task.
///
/// Ids are allocated process-wide and never reused, so a stale id held
/// after its task was reaped simply misses the registry instead of aliasing
/// a newer task, even an id from a different [`Scheduler`] instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    pub(crate) fn allocate() -> Self {
        TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// A unit of cooperative work.
///
/// `step` is invoked once per sweep while the task is
/// [`Running`](TaskState::Running). The body drives its own lifecycle by
/// assigning states through the [`TaskContext`]; a body that needs several
/// sweeps to complete simply returns without finishing and is stepped again
/// on the next sweep. The scheduler keeps no notion of "where the body left
/// off" beyond the task's state.
///
/// Implemented for any `FnMut(&mut TaskContext<'_>)` closure, so most
/// callers never name the trait:
///
/// ```
/// use cosched::{Scheduler, TaskContext};
///
/// let mut scheduler = Scheduler::new();
/// scheduler.schedule_now(|ctx: &mut TaskContext<'_>| ctx.finish());
/// ```
pub trait Task {
    /// Advance the task by one cooperative slice.
    fn step(&mut self, ctx: &mut TaskContext<'_>);
}

impl<F> Task for F
where
    F: for<'a> FnMut(&mut TaskContext<'a>),
{
    fn step(&mut self, ctx: &mut TaskContext<'_>) {
        self(ctx)
    }
}

/// Handle passed to a task body while it is being stepped.
///
/// Borrows the scheduler, so the body can mutate its own state and schedule
/// follow-up work, but cannot re-enter the run loop.
pub struct TaskContext<'s> {
    pub(crate) scheduler: &'s mut Scheduler,
    pub(crate) id: TaskId,
}

impl TaskContext<'_> {
    /// Id of the task being stepped.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Current state of the task being stepped.
    ///
    /// Reads [`Finished`](TaskState::Finished) once the task has finished
    /// within this very step (its registry entry is already gone by then).
    pub fn state(&self) -> TaskState {
        self.scheduler
            .state_of(self.id)
            .unwrap_or(TaskState::Finished)
    }

    /// Assign a new state to this task, firing any dependents bound to the
    /// assigned value. See [`Scheduler::set_state`].
    pub fn set_state(&mut self, state: TaskState) {
        self.scheduler.set_state(self.id, state);
    }

    /// Mark this task finished: dependents bound to
    /// [`Finished`](TaskState::Finished) activate, and the task leaves the
    /// registry.
    pub fn finish(&mut self) {
        self.set_state(TaskState::Finished);
    }

    /// Describe a new task on the owning scheduler, to be attached with
    /// `now`/`when`/`after`/`during`.
    pub fn schedule<T: Task + 'static>(&mut self, task: T) -> ScheduleRequest<'_> {
        self.scheduler.schedule(task)
    }
}

/// Registry entry pairing a task body with its state and its dependents.
pub(crate) struct TaskRecord {
    /// Taken out while the body is being stepped, so the scheduler can be
    /// borrowed by the body's [`TaskContext`] in the meantime.
    pub(crate) body: Option<Box<dyn Task>>,
    pub(crate) state: TaskState,
    /// Dependents keyed by id; the value is the state of *this* task that
    /// activates them. A dependent appears at most once; re-adding it
    /// overwrites the target state.
    pub(crate) observers: HashMap<TaskId, TaskState>,
}

impl TaskRecord {
    pub(crate) fn new(body: Box<dyn Task>) -> Self {
        Self {
            body: Some(body),
            state: TaskState::Pending,
            observers: HashMap::new(),
        }
    }
}

impl fmt::Debug for TaskRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskRecord")
            .field("state", &self.state)
            .field("observers", &self.observers)
            .finish_non_exhaustive()
    }
}
