// src/lib.rs

//! Cooperative, single-threaded task scheduling.
//!
//! `cosched` lets independent units of work be composed into a dependency
//! graph and driven to completion inside a polling control loop. A task is
//! anything implementing [`Task`] (closures included); it is invoked once
//! per sweep while `Running` and drives its own lifecycle by assigning
//! states through its [`TaskContext`]:
//!
//! ```
//! use cosched::{Scheduler, TaskContext, TaskState};
//!
//! let mut scheduler = Scheduler::new();
//!
//! let raise_lift = scheduler.schedule_now(|ctx: &mut TaskContext<'_>| {
//!     ctx.set_state(TaskState::Running);
//!     // lift logic here; once the lift is at height:
//!     ctx.finish();
//! });
//!
//! let open_claw = scheduler
//!     .schedule_after(raise_lift, |ctx: &mut TaskContext<'_>| ctx.finish())
//!     .unwrap();
//!
//! scheduler.run_until_idle();
//! assert!(!scheduler.contains(open_claw));
//! ```
//!
//! Dependencies are wired at scheduling time: `after` activates a dependent
//! when its predecessor finishes, `during` as soon as the predecessor is
//! running. Notification is push-based: a dependent starts on the same
//! control-flow step its predecessor's state is assigned, with no extra
//! sweep of latency.
//!
//! Everything runs on one thread; "concurrency" among tasks is interleaving
//! at sweep granularity. See [`host::HostLoop`] for the contract with the
//! environment that drives [`Scheduler::run`].

pub mod errors;
pub mod host;
pub mod logging;
pub mod sched;

pub use errors::{CoschedError, Result};
pub use host::{HostLoop, StopFlag};
pub use sched::{
    DependencySnapshot, ScheduleRequest, Scheduler, SnapshotNode, SweepSummary, Task, TaskContext,
    TaskId, TaskState,
};
