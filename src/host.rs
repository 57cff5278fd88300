// src/host.rs

//! The host-environment boundary.
//!
//! The scheduler does not own its polling cadence: an external control
//! environment drives [`Scheduler::run`](crate::sched::Scheduler::run) and
//! is queried once per sweep for liveness.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Liveness queries polled once per sweep by the run loop.
///
/// Polling order is `is_active` first, `stop_requested` second, with
/// short-circuiting: a host that is no longer active is not asked about
/// stop requests.
pub trait HostLoop {
    /// Whether the host environment is still active.
    fn is_active(&self) -> bool;

    /// Whether the host has requested the loop to stop.
    fn stop_requested(&self) -> bool;
}

/// Host signal backed by a shared stop flag.
///
/// Clones share the flag, so one can be handed to a signal handler or
/// another thread while the run loop itself stays single-threaded: the flag
/// is only ever polled between sweeps.
///
/// ```
/// use cosched::{Scheduler, StopFlag, TaskContext};
///
/// let mut scheduler = Scheduler::new();
/// let flag = StopFlag::new();
///
/// let trigger = flag.clone();
/// scheduler.schedule_now(move |_ctx: &mut TaskContext<'_>| trigger.stop());
///
/// scheduler.run(&flag); // stops after the first sweep
/// ```
#[derive(Debug, Clone, Default)]
pub struct StopFlag {
    stopped: Arc<AtomicBool>,
}

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the run loop to stop after the current sweep.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

impl HostLoop for StopFlag {
    fn is_active(&self) -> bool {
        true
    }

    fn stop_requested(&self) -> bool {
        self.is_stopped()
    }
}
