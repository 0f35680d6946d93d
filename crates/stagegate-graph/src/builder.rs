//! Task graph builder
//!
//! Collects tasks and prerequisite edges, then validates the whole graph in
//! [`TaskGraphBuilder::build`]. Self-dependencies are refused as soon as they
//! are added; cycles are reported at build time with the offending tasks.

use crate::error::GraphError;
use crate::graph::TaskGraph;
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graphmap::DiGraphMap;
use stagegate_model::TaskId;
use std::collections::{HashMap, HashSet};

/// Builder for [`TaskGraph`]
///
/// Usage:
/// ```rust,ignore
/// let mut builder = TaskGraphBuilder::new();
/// builder.add_task(task(1));
/// builder.add_dependency(task(2), task(1))?;
/// let graph = builder.build()?;
/// ```
#[derive(Debug, Default, Clone)]
pub struct TaskGraphBuilder {
    inner: DiGraphMap<TaskId, ()>,
}

impl TaskGraphBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task with no prerequisites (idempotent)
    pub fn add_task(&mut self, task: TaskId) {
        self.inner.add_node(task);
    }

    /// Declare that `task` requires `prerequisite`
    ///
    /// Duplicate declarations are ignored.
    ///
    /// # Errors
    /// [`GraphError::SelfDependency`] when both ids are equal.
    pub fn add_dependency(&mut self, task: TaskId, prerequisite: TaskId) -> Result<(), GraphError> {
        if task == prerequisite {
            return Err(GraphError::SelfDependency(task));
        }
        self.inner.add_edge(prerequisite, task, ());
        Ok(())
    }

    /// Declare several prerequisites of `task` at once
    ///
    /// # Errors
    /// See [`Self::add_dependency`].
    pub fn add_dependencies(
        &mut self,
        task: TaskId,
        prerequisites: impl IntoIterator<Item = TaskId>,
    ) -> Result<(), GraphError> {
        self.add_task(task);
        for prerequisite in prerequisites {
            self.add_dependency(task, prerequisite)?;
        }
        Ok(())
    }

    /// Whether declaring `task` requires `prerequisite` would close a cycle
    ///
    /// Preview only; the builder is not modified.
    #[must_use]
    pub fn would_create_cycle(&self, task: TaskId, prerequisite: TaskId) -> bool {
        task == prerequisite || self.can_reach(task, prerequisite)
    }

    /// Whether `target` is reachable from `source` along existing edges
    fn can_reach(&self, source: TaskId, target: TaskId) -> bool {
        let mut visited = HashSet::new();
        let mut stack = vec![source];

        while let Some(node) = stack.pop() {
            if node == target {
                return true;
            }
            if visited.insert(node) {
                stack.extend(self.inner.neighbors(node));
            }
        }

        false
    }

    /// Number of registered tasks
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Number of declared prerequisite edges
    #[must_use]
    pub fn dependency_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Validate and freeze the graph
    ///
    /// # Errors
    /// [`GraphError::CyclicDependency`] listing the tasks of one cycle.
    pub fn build(self) -> Result<TaskGraph, GraphError> {
        match toposort(&self.inner, None) {
            Ok(order) => {
                tracing::debug!(
                    tasks = self.inner.node_count(),
                    dependencies = self.inner.edge_count(),
                    "task graph validated"
                );
                Ok(TaskGraph::from_validated(self.inner, order))
            }
            Err(cycle) => {
                let cycle = self.cycle_through(cycle.node_id());
                tracing::error!(?cycle, "task graph contains a cycle");
                Err(GraphError::CyclicDependency { cycle })
            }
        }
    }

    /// Members of the strongly connected component containing `node`
    fn cycle_through(&self, node: TaskId) -> Vec<TaskId> {
        let component_of: HashMap<TaskId, usize> = tarjan_scc(&self.inner)
            .into_iter()
            .enumerate()
            .flat_map(|(idx, members)| members.into_iter().map(move |m| (m, idx)))
            .collect();

        let mut cycle: Vec<TaskId> = component_of
            .iter()
            .filter(|(_, idx)| Some(*idx) == component_of.get(&node))
            .map(|(task, _)| *task)
            .collect();
        cycle.sort_unstable();
        cycle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn t(id: u32) -> TaskId {
        TaskId::new(id).unwrap()
    }

    #[test]
    fn builds_chain() {
        let mut builder = TaskGraphBuilder::new();
        builder.add_dependency(t(2), t(1)).unwrap();
        builder.add_dependency(t(3), t(2)).unwrap();

        let graph = builder.build().unwrap();
        assert_eq!(graph.task_count(), 3);
        assert_eq!(graph.dependency_count(), 2);
        assert_eq!(graph.topological_order(), &[t(1), t(2), t(3)]);
    }

    #[test]
    fn rejects_self_dependency() {
        let mut builder = TaskGraphBuilder::new();
        assert_eq!(
            builder.add_dependency(t(4), t(4)),
            Err(GraphError::SelfDependency(t(4)))
        );
        assert_eq!(builder.dependency_count(), 0);
    }

    #[test]
    fn reports_cycle_members() {
        let mut builder = TaskGraphBuilder::new();
        builder.add_dependency(t(2), t(1)).unwrap();
        builder.add_dependency(t(3), t(2)).unwrap();
        builder.add_dependency(t(1), t(3)).unwrap();
        builder.add_dependency(t(9), t(3)).unwrap();

        assert_eq!(
            builder.build().unwrap_err(),
            GraphError::CyclicDependency {
                cycle: vec![t(1), t(2), t(3)]
            }
        );
    }

    #[test]
    fn cycle_preview_leaves_builder_untouched() {
        let mut builder = TaskGraphBuilder::new();
        builder.add_dependency(t(2), t(1)).unwrap();
        builder.add_dependency(t(3), t(2)).unwrap();

        assert!(builder.would_create_cycle(t(1), t(3)));
        assert!(builder.would_create_cycle(t(5), t(5)));
        assert!(!builder.would_create_cycle(t(3), t(1)));
        assert_eq!(builder.dependency_count(), 2);
    }

    #[test]
    fn duplicate_edges_collapse() {
        let mut builder = TaskGraphBuilder::new();
        builder.add_dependencies(t(5), [t(4), t(4), t(3)]).unwrap();
        let graph = builder.build().unwrap();
        assert_eq!(graph.dependency_count(), 2);
        assert_eq!(graph.prerequisites_of(t(5)).len(), 2);
    }
}
