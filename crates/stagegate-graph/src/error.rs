//! Construction errors for the dependency graph and layout table
//!
//! All of these are configuration errors: they surface while the static
//! tables are built and are fatal to startup.

use stagegate_model::{ProjectStage, Role, TaskId};

/// Invalid static structure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// A task lists itself as a prerequisite
    #[error("task {0} depends on itself")]
    SelfDependency(TaskId),

    /// Prerequisites form a cycle
    #[error("cyclic dependency between tasks {}", format_cycle(.cycle))]
    CyclicDependency {
        /// Tasks on the cycle, ascending
        cycle: Vec<TaskId>,
    },

    /// Same (role, stage) cell declared twice
    #[error("cell ({role}, {stage}) declared more than once")]
    DuplicateCell {
        /// Row of the cell
        role: Role,
        /// Column of the cell
        stage: ProjectStage,
    },

    /// Cell placed in a stage the role cannot see
    #[error("cell ({role}, {stage}) is outside the stages granted to {role}")]
    CellOutsideStageAccess {
        /// Row of the cell
        role: Role,
        /// Stage the role cannot see
        stage: ProjectStage,
    },

    /// Same task shown twice in one row
    #[error("task {task} appears more than once in the {role} row")]
    DuplicateTaskInRow {
        /// Row
        role: Role,
        /// Repeated task
        task: TaskId,
    },
}

fn format_cycle(cycle: &[TaskId]) -> String {
    cycle
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}
