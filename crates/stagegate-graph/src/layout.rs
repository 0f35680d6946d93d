//! Stage-matrix cell layout
//!
//! Maps each (role, stage) cell to a [`CellLayout`] so renderers look the
//! layout up instead of branching on role and stage names.

use crate::error::GraphError;
use serde::{Deserialize, Serialize};
use stagegate_model::{ProjectStage, Role, StageAccessTable, TaskId};
use std::collections::{BTreeSet, HashMap};

/// A row of small step controls closed by one or more milestones
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Small controls, left to right
    #[serde(default)]
    pub steps: Vec<TaskId>,
    /// Prominent controls after the steps
    #[serde(default)]
    pub milestones: Vec<TaskId>,
}

impl Track {
    /// Create a track
    #[must_use]
    pub fn new(steps: Vec<TaskId>, milestones: Vec<TaskId>) -> Self {
        Self { steps, milestones }
    }

    /// `(task, prominent)` pairs in display order
    pub fn controls(&self) -> impl Iterator<Item = (TaskId, bool)> + '_ {
        self.steps
            .iter()
            .map(|t| (*t, false))
            .chain(self.milestones.iter().map(|t| (*t, true)))
    }
}

/// Which controls a cell renders
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum CellLayout {
    /// Nothing to render
    #[default]
    Empty,
    /// One prominent control
    Milestone {
        /// Task behind the control
        task: TaskId,
    },
    /// One track
    Track(Track),
    /// Several stacked tracks
    Lanes {
        /// Tracks, top to bottom
        lanes: Vec<Track>,
    },
}

static EMPTY_CELL: CellLayout = CellLayout::Empty;

impl CellLayout {
    /// `(task, prominent)` pairs in display order
    #[must_use]
    pub fn controls(&self) -> Vec<(TaskId, bool)> {
        match self {
            CellLayout::Empty => Vec::new(),
            CellLayout::Milestone { task } => vec![(*task, true)],
            CellLayout::Track(track) => track.controls().collect(),
            CellLayout::Lanes { lanes } => lanes.iter().flat_map(Track::controls).collect(),
        }
    }

    /// Tasks rendered in this cell, in display order
    #[must_use]
    pub fn tasks(&self) -> Vec<TaskId> {
        self.controls().into_iter().map(|(task, _)| task).collect()
    }

    /// Whether the cell renders nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controls().is_empty()
    }
}

/// (role, stage) → [`CellLayout`] lookup
#[derive(Debug, Clone, Default)]
pub struct LayoutTable {
    cells: HashMap<(Role, ProjectStage), CellLayout>,
    rows: HashMap<Role, BTreeSet<TaskId>>,
}

impl LayoutTable {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `layout` in the (role, stage) cell
    ///
    /// # Errors
    /// - [`GraphError::DuplicateCell`] if the cell was already placed
    /// - [`GraphError::DuplicateTaskInRow`] if one of the tasks is already
    ///   shown elsewhere in the row (or twice in this cell)
    pub fn insert(
        &mut self,
        role: Role,
        stage: ProjectStage,
        layout: CellLayout,
    ) -> Result<(), GraphError> {
        if self.cells.contains_key(&(role, stage)) {
            return Err(GraphError::DuplicateCell { role, stage });
        }

        let mut row = self.rows.get(&role).cloned().unwrap_or_default();
        for task in layout.tasks() {
            if !row.insert(task) {
                return Err(GraphError::DuplicateTaskInRow { role, task });
            }
        }

        self.rows.insert(role, row);
        self.cells.insert((role, stage), layout);
        Ok(())
    }

    /// Layout of a cell; [`CellLayout::Empty`] when not placed
    #[must_use]
    pub fn cell(&self, role: Role, stage: ProjectStage) -> &CellLayout {
        self.cells.get(&(role, stage)).unwrap_or(&EMPTY_CELL)
    }

    /// Every task rendered in the row of `role`
    #[must_use]
    pub fn row_tasks(&self, role: Role) -> BTreeSet<TaskId> {
        self.rows.get(&role).cloned().unwrap_or_default()
    }

    /// Whether `task` is rendered in the row of `role`
    #[must_use]
    pub fn row_contains(&self, role: Role, task: TaskId) -> bool {
        self.rows.get(&role).is_some_and(|row| row.contains(&task))
    }

    /// Every task placed in any cell
    #[must_use]
    pub fn all_tasks(&self) -> BTreeSet<TaskId> {
        self.rows.values().flatten().copied().collect()
    }

    /// Check every placed cell against the stages granted to its role
    ///
    /// # Errors
    /// [`GraphError::CellOutsideStageAccess`] for the first offending cell,
    /// in row then stage order.
    pub fn validate_against(&self, stages: &StageAccessTable) -> Result<(), GraphError> {
        let mut placed: Vec<_> = self.cells.keys().copied().collect();
        placed.sort_unstable();

        for (role, stage) in placed {
            if !stages.has_access(role, stage) {
                return Err(GraphError::CellOutsideStageAccess { role, stage });
            }
        }
        Ok(())
    }

    /// Number of placed cells
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell is placed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
