//! Stage-matrix snapshot
//!
//! A [`MatrixSnapshot`] is everything a renderer needs for one user: rows in
//! row order, one cell per stage in display order, and the derived state of
//! every control. It is plain data and serializes to JSON as-is.

use crate::evaluator::{AccessEvaluator, RowAccess, TaskControl};
use serde::{Deserialize, Serialize};
use stagegate_model::{ProjectStage, Role, User};
use std::fmt::{self, Write as _};

/// One (row, stage) cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixCell {
    /// Column
    pub stage: ProjectStage,
    /// The row's role can see this stage
    pub has_access: bool,
    /// Controls in display order; empty without access
    pub controls: Vec<TaskControl>,
}

/// One role's row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixRow {
    /// Role owning the row
    pub role: Role,
    /// Display label
    pub label: String,
    /// What the viewer may do here
    pub access: RowAccess,
    /// One cell per stage, display order
    pub cells: Vec<MatrixCell>,
}

impl MatrixRow {
    /// Controls across every cell, left to right
    pub fn controls(&self) -> impl Iterator<Item = &TaskControl> + '_ {
        self.cells.iter().flat_map(|cell| cell.controls.iter())
    }
}

/// Whole matrix as seen by one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixSnapshot {
    /// Viewer's role; `None` when nobody is signed in
    pub viewer: Option<Role>,
    /// Columns, display order
    pub stages: Vec<ProjectStage>,
    /// Rows, row order
    pub rows: Vec<MatrixRow>,
}

impl MatrixSnapshot {
    /// Capture the matrix through `evaluator` for `viewer`
    #[must_use]
    pub fn capture(evaluator: &AccessEvaluator<'_>, viewer: Option<&User>) -> Self {
        let catalog = evaluator.catalog();
        let rows = catalog
            .rows()
            .map(|role| {
                let cells = ProjectStage::ALL
                    .into_iter()
                    .map(|stage| {
                        let has_access = catalog.stages().has_access(role, stage);
                        let controls = if has_access {
                            catalog
                                .layout()
                                .cell(role, stage)
                                .controls()
                                .into_iter()
                                .map(|(task, prominent)| {
                                    evaluator.control(viewer, task, role, prominent)
                                })
                                .collect()
                        } else {
                            Vec::new()
                        };
                        MatrixCell {
                            stage,
                            has_access,
                            controls,
                        }
                    })
                    .collect();

                MatrixRow {
                    role,
                    label: role.label().to_string(),
                    access: evaluator.row_access(viewer, role),
                    cells,
                }
            })
            .collect();

        Self {
            viewer: viewer.map(|user| user.role),
            stages: ProjectStage::ALL.to_vec(),
            rows,
        }
    }

    /// Row of `role`, if it has one
    #[must_use]
    pub fn row(&self, role: Role) -> Option<&MatrixRow> {
        self.rows.iter().find(|row| row.role == role)
    }

    /// Plain-text grid, one line per row
    ///
    /// Controls print as `<task><marker>` where the marker is `#` completed,
    /// `o` unlocked, `.` locked; milestones are bracketed. Active rows are
    /// starred, stages without access print as `-`.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) -> fmt::Result {
        write!(out, "{:<24}", "")?;
        for stage in &self.stages {
            write!(out, " | {:<28}", stage.label())?;
        }
        writeln!(out)?;

        for row in &self.rows {
            let star = if row.access.is_active { '*' } else { ' ' };
            write!(out, "{star}{:<23}", row.label)?;
            for cell in &row.cells {
                let text = if cell.has_access {
                    cell.controls
                        .iter()
                        .map(|c| {
                            if c.prominent {
                                format!("[{}{}]", c.task, c.state.marker())
                            } else {
                                format!("{}{}", c.task, c.state.marker())
                            }
                        })
                        .collect::<Vec<_>>()
                        .join(" ")
                } else {
                    "-".to_string()
                };
                write!(out, " | {text:<28}")?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

impl AccessEvaluator<'_> {
    /// See [`MatrixSnapshot::capture`]
    #[must_use]
    pub fn matrix(&self, viewer: Option<&User>) -> MatrixSnapshot {
        MatrixSnapshot::capture(self, viewer)
    }
}
