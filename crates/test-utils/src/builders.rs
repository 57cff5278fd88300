#![allow(dead_code)]

//! Scripted task bodies and host signals for exercising the scheduler.
//!
//! The bodies follow the idiom the scheduler is designed around: each step
//! re-asserts `Running` first, so `during`-bound dependents attached after
//! the task started still get woken by the re-fire.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use cosched::{HostLoop, Task, TaskContext, TaskState};

/// Shared, append-only log of task events, for asserting interleavings.
///
/// Clones share the underlying buffer. Single-threaded by design, like the
/// scheduler itself.
#[derive(Debug, Clone, Default)]
pub struct TraceLog {
    events: Rc<RefCell<Vec<String>>>,
}

impl TraceLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: impl Into<String>) {
        self.events.borrow_mut().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    /// How many times `event` was recorded.
    pub fn count_of(&self, event: &str) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.as_str() == event)
            .count()
    }
}

/// Task body that records each step and finishes after `steps` invocations.
///
/// `steps = 1` finishes on the very first invocation; `steps = 0` is
/// treated the same.
pub struct FinishAfter {
    label: String,
    remaining: usize,
    log: TraceLog,
}

impl FinishAfter {
    pub fn new(label: &str, steps: usize, log: &TraceLog) -> Self {
        Self {
            label: label.to_string(),
            remaining: steps,
            log: log.clone(),
        }
    }
}

impl Task for FinishAfter {
    fn step(&mut self, ctx: &mut TaskContext<'_>) {
        ctx.set_state(TaskState::Running);
        self.log.push(self.label.clone());
        if self.remaining <= 1 {
            ctx.finish();
        } else {
            self.remaining -= 1;
        }
    }
}

/// Task body that records each step and never finishes on its own.
pub struct RunForever {
    label: String,
    log: TraceLog,
}

impl RunForever {
    pub fn new(label: &str, log: &TraceLog) -> Self {
        Self {
            label: label.to_string(),
            log: log.clone(),
        }
    }
}

impl Task for RunForever {
    fn step(&mut self, ctx: &mut TaskContext<'_>) {
        ctx.set_state(TaskState::Running);
        self.log.push(self.label.clone());
    }
}

/// Task body that replays a fixed sequence of state assignments, one batch
/// per step, then finishes.
///
/// Unlike the other builders it does NOT re-assert `Running` on its own;
/// every assignment comes from the script, so tests control notification
/// traffic exactly.
pub struct StateScript {
    label: String,
    script: Vec<Vec<TaskState>>,
    cursor: usize,
    log: TraceLog,
}

impl StateScript {
    pub fn new(label: &str, script: Vec<Vec<TaskState>>, log: &TraceLog) -> Self {
        Self {
            label: label.to_string(),
            script,
            cursor: 0,
            log: log.clone(),
        }
    }
}

impl Task for StateScript {
    fn step(&mut self, ctx: &mut TaskContext<'_>) {
        self.log.push(self.label.clone());
        if let Some(batch) = self.script.get(self.cursor) {
            for state in batch {
                ctx.set_state(*state);
            }
        }
        self.cursor += 1;
        if self.cursor >= self.script.len() {
            ctx.finish();
        }
    }
}

/// Host signal that stays active for a fixed number of sweeps.
///
/// `is_active` is polled exactly once per sweep, so the budget counts
/// sweeps directly.
#[derive(Debug)]
pub struct SweepBudget {
    remaining: Cell<usize>,
}

impl SweepBudget {
    pub fn new(sweeps: usize) -> Self {
        Self {
            remaining: Cell::new(sweeps),
        }
    }

    /// Sweeps left in the budget.
    pub fn remaining(&self) -> usize {
        self.remaining.get()
    }
}

impl HostLoop for SweepBudget {
    fn is_active(&self) -> bool {
        let left = self.remaining.get();
        if left == 0 {
            return false;
        }
        self.remaining.set(left - 1);
        true
    }

    fn stop_requested(&self) -> bool {
        false
    }
}
