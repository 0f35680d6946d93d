//! Validated task dependency graph
//!
//! A `TaskGraph` can only be obtained from [`TaskGraphBuilder::build`], so
//! every instance is acyclic. Edges point from prerequisite to dependent.
//!
//! [`TaskGraphBuilder::build`]: crate::builder::TaskGraphBuilder::build

use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use stagegate_model::TaskId;
use std::collections::BTreeSet;

/// Finite DAG of task prerequisites
#[derive(Debug, Clone)]
pub struct TaskGraph {
    inner: DiGraphMap<TaskId, ()>,
    order: Vec<TaskId>,
}

impl TaskGraph {
    /// Wrap an already-checked graph and its topological order
    pub(crate) fn from_validated(inner: DiGraphMap<TaskId, ()>, order: Vec<TaskId>) -> Self {
        Self { inner, order }
    }

    /// Graph with no tasks
    #[must_use]
    pub fn empty() -> Self {
        Self::from_validated(DiGraphMap::new(), Vec::new())
    }

    /// Direct prerequisites of `task`
    ///
    /// Empty when the task has none or is not known.
    #[must_use]
    pub fn prerequisites_of(&self, task: TaskId) -> BTreeSet<TaskId> {
        self.inner
            .neighbors_directed(task, Direction::Incoming)
            .collect()
    }

    /// Whether `task` has at least one prerequisite
    #[must_use]
    pub fn has_prerequisites(&self, task: TaskId) -> bool {
        self.inner
            .neighbors_directed(task, Direction::Incoming)
            .next()
            .is_some()
    }

    /// Tasks that list `task` as a direct prerequisite
    #[must_use]
    pub fn dependents_of(&self, task: TaskId) -> BTreeSet<TaskId> {
        self.inner
            .neighbors_directed(task, Direction::Outgoing)
            .collect()
    }

    /// Every transitive prerequisite of `task`
    #[must_use]
    pub fn ancestors_of(&self, task: TaskId) -> BTreeSet<TaskId> {
        let mut seen = BTreeSet::new();
        let mut stack: Vec<TaskId> = self
            .inner
            .neighbors_directed(task, Direction::Incoming)
            .collect();

        while let Some(next) = stack.pop() {
            if seen.insert(next) {
                stack.extend(self.inner.neighbors_directed(next, Direction::Incoming));
            }
        }

        seen
    }

    /// Whether the task is known to the graph
    #[must_use]
    pub fn contains(&self, task: TaskId) -> bool {
        self.inner.contains_node(task)
    }

    /// Known tasks, ascending
    #[must_use]
    pub fn tasks(&self) -> BTreeSet<TaskId> {
        self.inner.nodes().collect()
    }

    /// Tasks ordered so every prerequisite precedes its dependents
    #[must_use]
    pub fn topological_order(&self) -> &[TaskId] {
        &self.order
    }

    /// Tasks with no prerequisites
    pub fn entry_tasks(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.inner.nodes().filter(|t| !self.has_prerequisites(*t))
    }

    /// Number of known tasks
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Number of prerequisite edges
    #[must_use]
    pub fn dependency_count(&self) -> usize {
        self.inner.edge_count()
    }
}

impl Default for TaskGraph {
    fn default() -> Self {
        Self::empty()
    }
}
