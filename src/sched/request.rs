// src/sched/request.rs

//! Fluent describe-then-attach scheduling.

use tracing::info;

use crate::errors::Result;
use crate::sched::scheduler::Scheduler;
use crate::sched::state::TaskState;
use crate::sched::task::{Task, TaskId};

/// A described-but-unattached task.
///
/// Produced by [`Scheduler::schedule`]; the body is held in `Pending` until
/// one of the attach methods registers it:
///
/// ```
/// use cosched::{Scheduler, TaskContext};
///
/// let mut scheduler = Scheduler::new();
/// let lift = scheduler.schedule(|ctx: &mut TaskContext<'_>| ctx.finish()).now();
/// let claw = scheduler
///     .schedule(|ctx: &mut TaskContext<'_>| ctx.finish())
///     .after(lift)
///     .unwrap();
///
/// scheduler.run_until_idle();
/// assert!(!scheduler.contains(claw));
/// ```
///
/// Dropping the request without attaching discards the task.
#[must_use = "a described task does nothing until attached with now/when/after/during"]
pub struct ScheduleRequest<'s> {
    scheduler: &'s mut Scheduler,
    body: Box<dyn Task>,
}

impl<'s> ScheduleRequest<'s> {
    pub(crate) fn new(scheduler: &'s mut Scheduler, body: Box<dyn Task>) -> Self {
        Self { scheduler, body }
    }

    /// Register the task and activate it immediately.
    ///
    /// Activation assigns `Running`, which would fire observers bound to
    /// that value (a brand-new task cannot have any yet).
    pub fn now(self) -> TaskId {
        let id = self.scheduler.insert(self.body);
        info!(task = %id, "scheduling now");
        self.scheduler.set_state(id, TaskState::Running);
        id
    }

    /// Register the task, to be activated when `predecessor` is assigned
    /// `target`.
    ///
    /// The task is registered even when the predecessor cannot be found; in
    /// that case the call reports [`PredecessorNotFound`] and the task stays
    /// `Pending` unless some other path drives it.
    ///
    /// [`PredecessorNotFound`]: crate::errors::CoschedError::PredecessorNotFound
    pub fn when(self, predecessor: TaskId, target: TaskState) -> Result<TaskId> {
        self.scheduler.attach(predecessor, self.body, target)
    }

    /// Register the task, to be activated when `predecessor` finishes.
    pub fn after(self, predecessor: TaskId) -> Result<TaskId> {
        self.when(predecessor, TaskState::Finished)
    }

    /// Register the task, to be activated as soon as `predecessor` is
    /// running; it then runs concurrently with it, each reaped on its own
    /// completion.
    pub fn during(self, predecessor: TaskId) -> Result<TaskId> {
        self.when(predecessor, TaskState::Running)
    }
}
