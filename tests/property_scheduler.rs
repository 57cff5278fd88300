// tests/property_scheduler.rs

//! Property test: random task forests with after/during wiring always
//! drain to an empty registry, and every body runs exactly its scripted
//! number of steps.

use cosched::Scheduler;
use cosched_test_utils::builders::{FinishAfter, TraceLog};
use proptest::prelude::*;

// Each entry describes one non-root task: (raw parent index, during?, steps).
// Parents are sanitized to earlier tasks only, so activation always reaches
// every task: a during-link fires when its predecessor is (re-)assigned
// Running, an after-link when it finishes.
fn forest_strategy() -> impl Strategy<Value = Vec<(usize, bool, usize)>> {
    proptest::collection::vec((any::<usize>(), any::<bool>(), 1..4usize), 0..10)
}

proptest! {
    #[test]
    fn random_forests_drain_and_run_exact_step_counts(spec in forest_strategy()) {
        let log = TraceLog::new();
        let mut scheduler = Scheduler::new();

        let root_steps = 2;
        let mut ids = vec![scheduler.schedule_now(FinishAfter::new("task_0", root_steps, &log))];
        let mut steps = vec![root_steps];

        for (i, (parent_raw, during, n_steps)) in spec.iter().enumerate() {
            let idx = i + 1;
            let parent = ids[parent_raw % idx];
            let label = format!("task_{idx}");
            let body = FinishAfter::new(&label, *n_steps, &log);

            // No sweep has happened yet, so every parent is still
            // registered and the attach cannot fail.
            let id = if *during {
                scheduler.schedule_during(parent, body).unwrap()
            } else {
                scheduler.schedule_after(parent, body).unwrap()
            };
            ids.push(id);
            steps.push(*n_steps);
        }

        let max_sweeps = 1000;
        let mut sweeps = 0;
        while !scheduler.is_empty() && sweeps < max_sweeps {
            scheduler.sweep();
            sweeps += 1;
        }

        prop_assert!(
            scheduler.is_empty(),
            "registry did not drain within {} sweeps",
            max_sweeps
        );

        for (idx, n_steps) in steps.iter().enumerate() {
            let label = format!("task_{idx}");
            prop_assert_eq!(log.count_of(&label), *n_steps);
        }
    }
}
