// src/sched/scheduler.rs

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::errors::{CoschedError, Result};
use crate::host::HostLoop;
use crate::sched::request::ScheduleRequest;
use crate::sched::state::TaskState;
use crate::sched::summary::SweepSummary;
use crate::sched::task::{Task, TaskContext, TaskId, TaskRecord};

/// Owns the working set of scheduled tasks and drives them to completion.
///
/// It is responsible for:
/// - registering tasks through the `now`/`when`/`after`/`during` entry points
/// - firing dependency notifications when a task's state is assigned
/// - stepping every `Running` task once per sweep
/// - reaping tasks that reach `Finished`
///
/// A scheduler is an explicit value: independent instances do not share any
/// state, and each instance is driven from a single thread.
#[derive(Debug, Default)]
pub struct Scheduler {
    registry: HashMap<TaskId, TaskRecord>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks currently in the registry.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Whether the given task is still known to the scheduler.
    pub fn contains(&self, id: TaskId) -> bool {
        self.registry.contains_key(&id)
    }

    /// Read-only view of a task's state; `None` once the task was reaped
    /// (or for an id from another scheduler).
    pub fn state_of(&self, id: TaskId) -> Option<TaskState> {
        self.registry.get(&id).map(|record| record.state)
    }

    /// `true` when no task is currently `Running`.
    ///
    /// Pending tasks may still be present; they cannot make progress on
    /// their own.
    pub fn is_idle(&self) -> bool {
        !self.registry.values().any(|record| record.state.is_runnable())
    }

    /// Ids and states of all registered tasks. Iteration order is
    /// unspecified.
    pub fn tasks(&self) -> impl Iterator<Item = (TaskId, TaskState)> + '_ {
        self.registry.iter().map(|(id, record)| (*id, record.state))
    }

    /// Observer entries of the given task: `(dependent, target state)`.
    pub(crate) fn observers_of(&self, id: TaskId) -> impl Iterator<Item = (TaskId, TaskState)> + '_ {
        self.registry
            .get(&id)
            .into_iter()
            .flat_map(|record| record.observers.iter().map(|(dep, target)| (*dep, *target)))
    }

    /// Fluent entry point: describe a task, then attach it with
    /// [`now`](ScheduleRequest::now), [`when`](ScheduleRequest::when),
    /// [`after`](ScheduleRequest::after) or
    /// [`during`](ScheduleRequest::during).
    pub fn schedule<T: Task + 'static>(&mut self, task: T) -> ScheduleRequest<'_> {
        ScheduleRequest::new(self, Box::new(task))
    }

    /// Register a task and activate it immediately.
    pub fn schedule_now<T: Task + 'static>(&mut self, task: T) -> TaskId {
        self.schedule(task).now()
    }

    /// Register a task to be activated when `predecessor` finishes.
    ///
    /// The task is registered even on error; see [`ScheduleRequest::when`].
    pub fn schedule_after<T: Task + 'static>(
        &mut self,
        predecessor: TaskId,
        task: T,
    ) -> Result<TaskId> {
        self.schedule(task).after(predecessor)
    }

    /// Register a task to be activated as soon as `predecessor` is running,
    /// then run concurrently with it.
    ///
    /// The task is registered even on error; see [`ScheduleRequest::when`].
    pub fn schedule_during<T: Task + 'static>(
        &mut self,
        predecessor: TaskId,
        task: T,
    ) -> Result<TaskId> {
        self.schedule(task).during(predecessor)
    }

    /// Assign `state` to the given task and synchronously fire every
    /// dependent bound to that value.
    ///
    /// Each assignment is a fresh notification event: re-assigning the value
    /// a task already holds re-fires its observers. Task bodies that
    /// re-assert `Running` at the top of every step rely on this to wake
    /// `during`-bound dependents attached after the task started.
    ///
    /// Assigning `Finished` drops the task's observers and removes it from
    /// the registry in the same call; stale ids are ignored with a log.
    pub fn set_state(&mut self, id: TaskId, state: TaskState) {
        let Some(record) = self.registry.get_mut(&id) else {
            warn!(task = %id, state = %state, "set_state on unknown task; ignoring");
            return;
        };

        debug!(task = %id, from = %record.state, to = %state, "state assigned");
        record.state = state;

        // Decide first, then mutate: collect the dependents to fire before
        // activation recurses into the registry.
        let fired: Vec<TaskId> = record
            .observers
            .iter()
            .filter(|(_, target)| **target == state)
            .map(|(dependent, _)| *dependent)
            .collect();

        for dependent in fired {
            self.activate(dependent);
        }

        if state.is_terminal() {
            // Dropping the record drops its observer map with it; nothing
            // can fire off this task again.
            self.registry.remove(&id);
            debug!(task = %id, "task finished; removed from registry");
        }
    }

    /// One full pass over the registry: step every task whose state reads
    /// `Running` at visit time, then complete the reap of everything that
    /// finished.
    ///
    /// Execution order across sibling tasks is unspecified. A dependent
    /// activated mid-sweep is stepped in this sweep only if the pass has not
    /// yet reached it; callers may rely only on "no later than the next
    /// sweep".
    pub fn sweep(&mut self) -> SweepSummary {
        let ids: Vec<TaskId> = self.registry.keys().copied().collect();
        let mut stepped = Vec::new();
        let mut finished = Vec::new();

        for id in ids {
            let Some(record) = self.registry.get_mut(&id) else {
                // Reaped earlier in this sweep.
                continue;
            };
            if !record.state.is_runnable() {
                continue;
            }
            let Some(mut body) = record.body.take() else {
                continue;
            };

            body.step(&mut TaskContext { scheduler: self, id });
            stepped.push(id);

            // Hand the body back unless the task finished (and removed
            // itself) during its own step; dropping the body here is the
            // reap for mid-sweep finishers.
            match self.registry.get_mut(&id) {
                Some(record) => record.body = Some(body),
                None => finished.push(id),
            }
        }

        SweepSummary { stepped, finished }
    }

    /// The polling control loop: keep sweeping while the host reports
    /// active and no stop request, polled once per sweep.
    ///
    /// When the host signal goes inactive, tasks mid-flight are abandoned,
    /// not notified.
    pub fn run<H: HostLoop + ?Sized>(&mut self, host: &H) {
        info!(tasks = self.registry.len(), "run loop started");
        while host.is_active() && !host.stop_requested() {
            self.sweep();
        }
        info!(remaining = self.registry.len(), "run loop stopped");
    }

    /// Sweep until no task is `Running`.
    ///
    /// Dormant `Pending` tasks do not keep the loop alive; use
    /// [`DependencySnapshot`](crate::sched::snapshot::DependencySnapshot) to
    /// diagnose what was left behind.
    pub fn run_until_idle(&mut self) {
        while !self.is_idle() {
            self.sweep();
        }
    }

    /// Insert a new record in `Pending` state and hand out its id.
    pub(crate) fn insert(&mut self, body: Box<dyn Task>) -> TaskId {
        let id = TaskId::allocate();
        self.registry.insert(id, TaskRecord::new(body));
        debug!(task = %id, "task registered");
        id
    }

    /// Register `body` and bind it to `predecessor` reaching `target`.
    ///
    /// The new task is registered unconditionally; a missing predecessor
    /// leaves it dormant rather than undoing the registration.
    pub(crate) fn attach(
        &mut self,
        predecessor: TaskId,
        body: Box<dyn Task>,
        target: TaskState,
    ) -> Result<TaskId> {
        let id = self.insert(body);
        match self.registry.get_mut(&predecessor) {
            Some(record) => {
                record.observers.insert(id, target);
                info!(task = %id, predecessor = %predecessor, target = %target, "dependent bound");
                Ok(id)
            }
            None => {
                warn!(
                    task = %id,
                    predecessor = %predecessor,
                    "predecessor not in registry; dependent registered but dormant"
                );
                Err(CoschedError::PredecessorNotFound(predecessor))
            }
        }
    }

    /// Immediate activation used by dependency notification: flips the
    /// dependent to `Running` in place.
    ///
    /// The dependent was registered when its link was wired, so a missing
    /// entry means it already finished; stale observer entries are skipped.
    fn activate(&mut self, id: TaskId) {
        if !self.registry.contains_key(&id) {
            debug!(task = %id, "dependent already reaped; skipping activation");
            return;
        }
        info!(task = %id, "activating dependent");
        self.set_state(id, TaskState::Running);
    }
}
