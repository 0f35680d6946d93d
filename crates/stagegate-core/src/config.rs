//! Catalog configuration schema
//!
//! The on-disk shape of a catalog. Parsed by serde from YAML, TOML or JSON
//! and turned into validated tables by [`crate::Catalog::from_config`].
//!
//! ```yaml
//! unlock_policy: one-hop
//! roles:
//!   - role: alpha-sales
//!     permissions: [view-clients, create-client]
//!     stages: [acquisition, eho]
//! dependencies:
//!   - { task: 2, requires: [1] }
//! layout:
//!   - role: alpha-sales
//!     stage: acquisition
//!     cell: { kind: track, steps: [1, 2], milestones: [3] }
//! ```

use serde::{Deserialize, Serialize};
use stagegate_graph::CellLayout;
use stagegate_model::{Permission, ProjectStage, Role, TaskId};

/// How far back prerequisites are checked when deciding whether a task is
/// unlocked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnlockPolicy {
    /// Only direct prerequisites must be completed
    #[default]
    OneHop,
    /// Every transitive ancestor must be completed
    Transitive,
}

/// One role entry
///
/// Roles with a non-empty `stages` list own a matrix row; rows appear in the
/// order the roles are listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleConfig {
    /// Role being configured
    pub role: Role,
    #[serde(default)]
    /// Free-text description
    pub description: String,
    #[serde(default)]
    /// Permissions granted
    pub permissions: Vec<Permission>,
    #[serde(default)]
    /// Visible stages; non-empty means the role owns a row
    pub stages: Vec<ProjectStage>,
}

impl RoleConfig {
    /// Role with no permissions and no row
    #[must_use]
    pub fn new(role: Role) -> Self {
        Self {
            role,
            description: String::new(),
            permissions: Vec::new(),
            stages: Vec::new(),
        }
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the permissions
    #[must_use]
    pub fn with_permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.permissions = permissions.into_iter().collect();
        self
    }

    /// Set the visible stages
    #[must_use]
    pub fn with_stages(mut self, stages: impl IntoIterator<Item = ProjectStage>) -> Self {
        self.stages = stages.into_iter().collect();
        self
    }
}

/// Direct prerequisites of one task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyConfig {
    /// Dependent task
    pub task: TaskId,
    /// Direct prerequisites
    pub requires: Vec<TaskId>,
}

/// Layout of one (role, stage) cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellConfig {
    /// Row
    pub role: Role,
    /// Column
    pub stage: ProjectStage,
    /// Controls rendered in the cell
    pub cell: CellLayout,
}

/// Whole catalog as written on disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    /// Unlock policy, one-hop when omitted
    pub unlock_policy: UnlockPolicy,
    #[serde(default)]
    /// Role entries, in row order
    pub roles: Vec<RoleConfig>,
    #[serde(default)]
    /// Prerequisite declarations
    pub dependencies: Vec<DependencyConfig>,
    #[serde(default)]
    /// Placed cells
    pub layout: Vec<CellConfig>,
}

impl CatalogConfig {
    /// Empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the unlock policy
    #[must_use]
    pub fn with_unlock_policy(mut self, policy: UnlockPolicy) -> Self {
        self.unlock_policy = policy;
        self
    }

    /// Append a role entry
    #[must_use]
    pub fn with_role(mut self, role: RoleConfig) -> Self {
        self.roles.push(role);
        self
    }

    /// Append a dependency entry
    #[must_use]
    pub fn with_dependency(mut self, task: TaskId, requires: impl IntoIterator<Item = TaskId>) -> Self {
        self.dependencies.push(DependencyConfig {
            task,
            requires: requires.into_iter().collect(),
        });
        self
    }

    /// Append a cell
    #[must_use]
    pub fn with_cell(mut self, role: Role, stage: ProjectStage, cell: CellLayout) -> Self {
        self.layout.push(CellConfig { role, stage, cell });
        self
    }
}
