//! Validated catalog
//!
//! A [`Catalog`] bundles every static table the evaluator reads: role
//! permissions, stage access (which also fixes row order), the task
//! dependency graph, the cell layout and the unlock policy. It is built once
//! from a [`CatalogConfig`] and never mutated afterwards.
//!
//! Loading rejects:
//! - duplicate role entries
//! - a super-admin grant missing any permission another role holds
//! - self-dependencies and dependency cycles
//! - duplicate cells, cells outside the role's stages, tasks placed twice in
//!   one row

use crate::config::{CatalogConfig, UnlockPolicy};
use crate::error::ConfigError;
use stagegate_graph::{LayoutTable, TaskGraph, TaskGraphBuilder};
use stagegate_model::{Role, RoleGrant, RolePermissionTable, StageAccessTable, TaskId};
use std::collections::HashSet;
use std::path::Path;

const BUILTIN_CATALOG: &str = include_str!("../config/default.yaml");

/// Static tables consumed by the access evaluator
#[derive(Debug, Clone)]
pub struct Catalog {
    permissions: RolePermissionTable,
    stages: StageAccessTable,
    graph: TaskGraph,
    layout: LayoutTable,
    unlock_policy: UnlockPolicy,
}

impl Catalog {
    /// Validate `config` into a catalog
    ///
    /// # Errors
    /// Any [`ConfigError`] validation failure; see the module docs.
    pub fn from_config(config: CatalogConfig) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        let mut permissions = RolePermissionTable::new();
        let mut stages = StageAccessTable::new();

        for entry in config.roles {
            if !seen.insert(entry.role) {
                return Err(ConfigError::DuplicateRole(entry.role));
            }
            if !entry.stages.is_empty() {
                stages.insert(entry.role, entry.stages);
            }
            permissions.insert(
                entry.role,
                RoleGrant::new(entry.permissions).with_description(entry.description),
            );
        }

        let missing = permissions.missing_for_super_admin();
        if !missing.is_empty() {
            return Err(ConfigError::SuperAdminIncomplete {
                missing: missing.into_iter().collect(),
            });
        }

        let mut layout = LayoutTable::new();
        for cell in config.layout {
            layout.insert(cell.role, cell.stage, cell.cell)?;
        }
        layout.validate_against(&stages)?;

        let placed = layout.all_tasks();
        let mut builder = TaskGraphBuilder::new();
        for task in &placed {
            builder.add_task(*task);
        }
        for dependency in config.dependencies {
            builder.add_dependencies(dependency.task, dependency.requires)?;
        }
        let graph = builder.build()?;

        let unplaced: Vec<TaskId> = graph
            .tasks()
            .into_iter()
            .filter(|task| !placed.contains(task))
            .collect();
        if !unplaced.is_empty() {
            tracing::warn!(?unplaced, "tasks referenced by dependencies are never rendered");
        }

        tracing::info!(
            roles = permissions.len(),
            rows = stages.len(),
            tasks = graph.task_count(),
            dependencies = graph.dependency_count(),
            cells = layout.len(),
            policy = ?config.unlock_policy,
            "catalog loaded"
        );

        Ok(Self {
            permissions,
            stages,
            graph,
            layout,
            unlock_policy: config.unlock_policy,
        })
    }

    /// Parse and validate a YAML catalog
    ///
    /// # Errors
    /// [`ConfigError::Yaml`] or any validation failure.
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        Self::from_config(serde_yaml::from_str(source)?)
    }

    /// Parse and validate a TOML catalog
    ///
    /// # Errors
    /// [`ConfigError::Toml`] or any validation failure.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Self::from_config(toml::from_str(source)?)
    }

    /// Parse and validate a JSON catalog
    ///
    /// # Errors
    /// [`ConfigError::Json`] or any validation failure.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        Self::from_config(serde_json::from_str(source)?)
    }

    /// Load a catalog file, choosing the format by extension
    ///
    /// # Errors
    /// [`ConfigError::Io`], [`ConfigError::UnsupportedFormat`], a parse error
    /// or any validation failure.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let read = || {
            std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        };

        tracing::debug!(path = %path.display(), "loading catalog");
        match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&read()?),
            "toml" => Self::from_toml_str(&read()?),
            "json" => Self::from_json_str(&read()?),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// The embedded default catalog
    ///
    /// # Errors
    /// Only if the embedded asset is itself invalid.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_yaml_str(BUILTIN_CATALOG)
    }

    /// Role → permission grants
    #[inline]
    #[must_use]
    pub fn permissions(&self) -> &RolePermissionTable {
        &self.permissions
    }

    /// Role → visible stages, in row order
    #[inline]
    #[must_use]
    pub fn stages(&self) -> &StageAccessTable {
        &self.stages
    }

    /// Task dependency graph
    #[inline]
    #[must_use]
    pub fn graph(&self) -> &TaskGraph {
        &self.graph
    }

    /// (role, stage) → cell layout
    #[inline]
    #[must_use]
    pub fn layout(&self) -> &LayoutTable {
        &self.layout
    }

    /// Unlock policy in force
    #[inline]
    #[must_use]
    pub fn unlock_policy(&self) -> UnlockPolicy {
        self.unlock_policy
    }

    /// Same catalog under a different unlock policy
    #[must_use]
    pub fn with_unlock_policy(mut self, policy: UnlockPolicy) -> Self {
        self.unlock_policy = policy;
        self
    }

    /// Roles owning a matrix row, in row order
    pub fn rows(&self) -> impl Iterator<Item = Role> + '_ {
        self.stages.rows()
    }

    /// Whether `task` is part of the catalog
    #[inline]
    #[must_use]
    pub fn knows_task(&self, task: TaskId) -> bool {
        self.graph.contains(task)
    }
}
