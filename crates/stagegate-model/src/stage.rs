//! Project stages and the Stage-Access table

use crate::error::ModelError;
use crate::role::Role;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named phase of a project's lifecycle
///
/// `Ord` follows display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStage {
    /// Client acquisition
    Acquisition,
    /// EHO review
    Eho,
    /// Kick-off and development
    Development,
    /// Presentation to the client
    Presentation,
    /// Post-delivery calibration
    Calibration,
}

impl ProjectStage {
    /// All stages in display order
    pub const ALL: [ProjectStage; 5] = [
        ProjectStage::Acquisition,
        ProjectStage::Eho,
        ProjectStage::Development,
        ProjectStage::Presentation,
        ProjectStage::Calibration,
    ];

    /// Canonical identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ProjectStage::Acquisition => "acquisition",
            ProjectStage::Eho => "eho",
            ProjectStage::Development => "development",
            ProjectStage::Presentation => "presentation",
            ProjectStage::Calibration => "calibration",
        }
    }

    /// Column header
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ProjectStage::Acquisition => "Ventas",
            ProjectStage::Eho => "EHO",
            ProjectStage::Development => "Kick-off y desarrollo",
            ProjectStage::Presentation => "Presentación",
            ProjectStage::Calibration => "Calibración",
        }
    }
}

impl fmt::Display for ProjectStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStage {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProjectStage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| ModelError::UnknownStage(s.to_string()))
    }
}

/// Static mapping from role to the stages its row may show
///
/// Entry order is the matrix row order. Each stage list is kept sorted in
/// display order without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageAccessTable {
    rows: IndexMap<Role, Vec<ProjectStage>>,
}

impl StageAccessTable {
    /// Create an empty table
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the stages of `role`
    ///
    /// A new role is appended as the last row; replacing keeps its position.
    pub fn insert(&mut self, role: Role, stages: impl IntoIterator<Item = ProjectStage>) {
        let mut stages: Vec<_> = stages.into_iter().collect();
        stages.sort_unstable();
        stages.dedup();
        self.rows.insert(role, stages);
    }

    /// Stages visible to `role`, in display order
    #[must_use]
    pub fn stages_for(&self, role: Role) -> &[ProjectStage] {
        self.rows.get(&role).map(Vec::as_slice).unwrap_or_default()
    }

    /// String-keyed variant of [`Self::stages_for`]
    #[must_use]
    pub fn stages_for_str(&self, role: &str) -> &[ProjectStage] {
        role.parse::<Role>()
            .map(|role| self.stages_for(role))
            .unwrap_or_default()
    }

    /// Whether `role` may see `stage`
    #[must_use]
    pub fn has_access(&self, role: Role, stage: ProjectStage) -> bool {
        self.stages_for(role).binary_search(&stage).is_ok()
    }

    /// Roles that own a matrix row, in row order
    pub fn rows(&self) -> impl Iterator<Item = Role> + '_ {
        self.rows.keys().copied()
    }

    /// Whether `role` owns a row
    #[must_use]
    pub fn contains(&self, role: Role) -> bool {
        self.rows.contains_key(&role)
    }

    /// Number of rows
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no rows
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn stages_sorted_and_deduplicated() {
        let mut table = StageAccessTable::new();
        table.insert(
            Role::EsporaStrategy,
            [
                ProjectStage::Development,
                ProjectStage::Eho,
                ProjectStage::Development,
            ],
        );
        assert_eq!(
            table.stages_for(Role::EsporaStrategy),
            &[ProjectStage::Eho, ProjectStage::Development]
        );
    }

    #[test]
    fn unknown_role_yields_empty() {
        let mut table = StageAccessTable::new();
        table.insert(Role::AlphaSales, [ProjectStage::Acquisition]);

        assert!(table.stages_for(Role::SuperAdmin).is_empty());
        assert!(table.stages_for_str("nobody").is_empty());
        assert_eq!(table.stages_for_str("alpha-sales"), &[ProjectStage::Acquisition]);
        assert!(!table.has_access(Role::SuperAdmin, ProjectStage::Acquisition));
    }

    #[test]
    fn row_order_is_insertion_order() {
        let mut table = StageAccessTable::new();
        table.insert(Role::EsporaDiffusion, [ProjectStage::Eho]);
        table.insert(Role::AlphaSales, [ProjectStage::Eho]);
        table.insert(Role::EsporaDiffusion, [ProjectStage::Development]);

        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows, vec![Role::EsporaDiffusion, Role::AlphaSales]);
        assert!(table.has_access(Role::EsporaDiffusion, ProjectStage::Development));
        assert!(!table.has_access(Role::EsporaDiffusion, ProjectStage::Eho));
    }

    #[test]
    fn stage_order_matches_display_order() {
        let mut sorted = ProjectStage::ALL;
        sorted.sort();
        assert_eq!(sorted, ProjectStage::ALL);
    }
}
