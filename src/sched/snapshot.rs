// src/sched/snapshot.rs

//! Read-only dependency snapshot for diagnostics.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::sched::scheduler::Scheduler;
use crate::sched::state::TaskState;
use crate::sched::task::TaskId;

/// Point-in-time copy of the live dependency graph.
///
/// One node per registry entry; an edge `a -> b` carries the state of `a`
/// that activates `b`. Observer entries pointing at tasks that already
/// finished have no node and produce no edge. The snapshot does not track
/// mutations made after it was captured.
#[derive(Debug)]
pub struct DependencySnapshot {
    graph: DiGraph<SnapshotNode, TaskState>,
    index: HashMap<TaskId, NodeIndex>,
}

/// A registry entry as seen at capture time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotNode {
    pub id: TaskId,
    pub state: TaskState,
}

impl DependencySnapshot {
    /// Capture the scheduler's current registry and observer wiring.
    pub fn capture(scheduler: &Scheduler) -> Self {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();

        for (id, state) in scheduler.tasks() {
            let node = graph.add_node(SnapshotNode { id, state });
            index.insert(id, node);
        }

        let ids: Vec<TaskId> = index.keys().copied().collect();
        for id in ids {
            let from = index[&id];
            for (dependent, target) in scheduler.observers_of(id) {
                if let Some(&to) = index.get(&dependent) {
                    graph.add_edge(from, to, target);
                }
            }
        }

        Self { graph, index }
    }

    /// The underlying graph, for ad-hoc inspection.
    pub fn graph(&self) -> &DiGraph<SnapshotNode, TaskState> {
        &self.graph
    }

    /// Number of tasks in the snapshot.
    pub fn task_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of dependency links in the snapshot.
    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// The state a task had at capture time.
    pub fn state_of(&self, id: TaskId) -> Option<TaskState> {
        self.index.get(&id).map(|&node| self.graph[node].state)
    }

    /// Dependency links out of the given task: `(dependent, target state)`.
    pub fn links_from(&self, id: TaskId) -> Vec<(TaskId, TaskState)> {
        let Some(&node) = self.index.get(&id) else {
            return Vec::new();
        };
        self.graph
            .edges(node)
            .map(|edge| (self.graph[edge.target()].id, *edge.weight()))
            .collect()
    }

    /// Pending tasks with no incoming dependency edge.
    ///
    /// These can only ever run via an explicit external path such as
    /// `set_state`. A dormant task usually means an `after`/`during` call
    /// reported a missing predecessor and the error was ignored.
    pub fn dormant(&self) -> Vec<TaskId> {
        self.graph
            .node_indices()
            .filter(|&node| {
                self.graph[node].state == TaskState::Pending
                    && self
                        .graph
                        .neighbors_directed(node, Direction::Incoming)
                        .next()
                        .is_none()
            })
            .map(|node| self.graph[node].id)
            .collect()
    }
}
