// tests/scheduler_lifecycle.rs

//! End-to-end lifecycle scenarios: immediate scheduling, after/during
//! chains, and reaping.

use cosched::{Scheduler, TaskContext, TaskState};
use cosched_test_utils::builders::{FinishAfter, RunForever, SweepBudget, TraceLog};
use cosched_test_utils::init_tracing;

#[test]
fn task_that_finishes_immediately_is_reaped_after_one_sweep() {
    init_tracing();

    let log = TraceLog::new();
    let mut scheduler = Scheduler::new();

    let t1 = scheduler.schedule_now(FinishAfter::new("t1", 1, &log));
    assert_eq!(scheduler.state_of(t1), Some(TaskState::Running));

    let summary = scheduler.sweep();

    assert_eq!(summary.stepped, vec![t1]);
    assert_eq!(summary.finished, vec![t1]);
    assert!(!scheduler.contains(t1));
    assert!(scheduler.is_empty());
    assert_eq!(log.count_of("t1"), 1);
}

#[test]
fn dependent_stays_pending_while_predecessor_never_finishes() {
    init_tracing();

    let log = TraceLog::new();
    let mut scheduler = Scheduler::new();

    let t1 = scheduler.schedule_now(RunForever::new("t1", &log));
    let t2 = scheduler
        .schedule_after(t1, FinishAfter::new("t2", 1, &log))
        .unwrap();

    for _ in 0..5 {
        scheduler.sweep();
    }

    assert_eq!(scheduler.state_of(t2), Some(TaskState::Pending));
    assert_eq!(log.count_of("t1"), 5);
    assert_eq!(log.count_of("t2"), 0, "t2 must never be invoked");
}

#[test]
fn dependent_activates_no_later_than_the_sweep_after_predecessor_finishes() {
    init_tracing();

    let log = TraceLog::new();
    let mut scheduler = Scheduler::new();

    // t1 runs for three sweeps, then finishes.
    let t1 = scheduler.schedule_now(FinishAfter::new("t1", 3, &log));
    let t2 = scheduler
        .schedule_after(t1, RunForever::new("t2", &log))
        .unwrap();

    scheduler.sweep();
    scheduler.sweep();
    assert_eq!(scheduler.state_of(t2), Some(TaskState::Pending));
    assert_eq!(log.count_of("t2"), 0, "t2 must not run before t1 finishes");

    // Sweep 3: t1 finishes, which activates t2 on the same control-flow
    // step. Whether t2 is also stepped in this sweep depends on iteration
    // order, which is unspecified.
    scheduler.sweep();
    assert!(!scheduler.contains(t1));
    assert_eq!(scheduler.state_of(t2), Some(TaskState::Running));

    // Sweep 4 at the latest: t2 is invoked.
    let summary = scheduler.sweep();
    assert!(summary.stepped.contains(&t2));
    assert!(log.count_of("t2") >= 1);
    assert_eq!(log.count_of("t1"), 3);
}

#[test]
fn during_dependent_runs_concurrently_with_predecessor() {
    init_tracing();

    let log = TraceLog::new();
    let mut scheduler = Scheduler::new();

    let t1 = scheduler.schedule_now(RunForever::new("t1", &log));
    let t2 = scheduler
        .schedule_during(t1, RunForever::new("t2", &log))
        .unwrap();
    assert_eq!(scheduler.state_of(t2), Some(TaskState::Pending));

    // Sweep 1: t1 re-asserts Running at the top of its step, which fires
    // the during-link.
    scheduler.sweep();
    assert_eq!(scheduler.state_of(t2), Some(TaskState::Running));

    // Sweep 2: both are invoked, independently.
    let summary = scheduler.sweep();
    assert!(summary.stepped.contains(&t1));
    assert!(summary.stepped.contains(&t2));
}

#[test]
fn during_dependent_of_a_pending_predecessor_activates_with_it() {
    init_tracing();

    let log = TraceLog::new();
    let mut scheduler = Scheduler::new();

    // a finishes immediately; b is released by a; c rides along with b.
    let a = scheduler.schedule_now(FinishAfter::new("a", 1, &log));
    let b = scheduler.schedule_after(a, RunForever::new("b", &log)).unwrap();
    let c = scheduler.schedule_during(b, RunForever::new("c", &log)).unwrap();

    scheduler.sweep();

    // a's finish activates b; b's activation assigns Running, which fires
    // c's during-link on the same control-flow step.
    assert!(!scheduler.contains(a));
    assert_eq!(scheduler.state_of(b), Some(TaskState::Running));
    assert_eq!(scheduler.state_of(c), Some(TaskState::Running));

    let summary = scheduler.sweep();
    assert!(summary.stepped.contains(&b));
    assert!(summary.stepped.contains(&c));
}

#[test]
fn during_pairs_are_reaped_independently() {
    init_tracing();

    let log = TraceLog::new();
    let mut scheduler = Scheduler::new();

    let t1 = scheduler.schedule_now(FinishAfter::new("t1", 4, &log));
    let t2 = scheduler
        .schedule_during(t1, FinishAfter::new("t2", 2, &log))
        .unwrap();

    scheduler.run_until_idle();

    assert!(!scheduler.contains(t1));
    assert!(!scheduler.contains(t2));
    assert!(scheduler.is_empty());
    assert_eq!(log.count_of("t1"), 4);
    assert_eq!(log.count_of("t2"), 2);
}

#[test]
fn a_task_can_schedule_followup_work_from_its_body() {
    init_tracing();

    let log = TraceLog::new();
    let mut scheduler = Scheduler::new();

    let child_log = log.clone();
    scheduler.schedule_now(move |ctx: &mut TaskContext<'_>| {
        ctx.schedule(FinishAfter::new("child", 1, &child_log)).now();
        ctx.finish();
    });

    // The child was registered mid-sweep; it runs no later than the sweep
    // after it was scheduled.
    scheduler.sweep();
    scheduler.sweep();

    assert_eq!(log.count_of("child"), 1);
    assert!(scheduler.is_empty());
}

#[test]
fn run_stops_when_the_host_budget_is_exhausted() {
    init_tracing();

    let log = TraceLog::new();
    let mut scheduler = Scheduler::new();

    let t1 = scheduler.schedule_now(RunForever::new("t1", &log));

    let host = SweepBudget::new(3);
    scheduler.run(&host);

    // The loop halted with the task mid-flight: abandoned, not notified.
    assert_eq!(log.count_of("t1"), 3);
    assert_eq!(scheduler.state_of(t1), Some(TaskState::Running));
}
