//! Error types for Stagegate Core
//!
//! Two families:
//! - [`ConfigError`]: the catalog could not be loaded or failed validation.
//!   Fatal at startup.
//! - [`AccessError`]: a request was rejected at runtime. Rejections never
//!   mutate the ledger.

use stagegate_graph::GraphError;
use stagegate_model::{ClientId, ModelError, Permission, Role, TaskId};
use std::path::PathBuf;

/// Catalog loading and validation failure
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading the file failed
    #[error("cannot read {path}: {source}")]
    Io {
        /// File that was read
        path: PathBuf,
        #[source]
        /// Underlying failure
        source: std::io::Error,
    },

    /// YAML syntax or shape error
    #[error("invalid YAML catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML syntax or shape error
    #[error("invalid TOML catalog: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON syntax or shape error
    #[error("invalid JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    /// Dependency graph or cell layout is invalid
    #[error("invalid task structure: {0}")]
    Graph(#[from] GraphError),

    /// super-admin lacks a permission some other role holds
    #[error("super-admin is missing permissions: {}", join(.missing))]
    SuperAdminIncomplete {
        /// Permissions to add to super-admin
        missing: Vec<Permission>,
    },

    /// Same role configured twice
    #[error("role {0} is configured more than once")]
    DuplicateRole(Role),

    /// File extension is not one of yaml, yml, toml, json
    #[error("unsupported catalog format: {0}")]
    UnsupportedFormat(String),
}

/// Rejected request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// Nobody is signed in
    #[error("no user is signed in")]
    NoUser,

    /// Actor may not interact with the row
    #[error("{actor} may not act on the {row} row")]
    PermissionDenied {
        /// Role of the acting user
        actor: Role,
        /// Row the toggle targeted
        row: Role,
    },

    /// Prerequisites of the task are not completed for the row
    #[error("task {task} is locked for {role} (waiting on {})", join(.waiting_on))]
    TaskLocked {
        /// Requested task
        task: TaskId,
        /// Row
        role: Role,
        /// Prerequisites still outstanding, ascending
        waiting_on: Vec<TaskId>,
    },

    /// Task id is not part of the catalog
    #[error("unknown task {0}")]
    UnknownTask(TaskId),

    /// Task exists but is not rendered in the row
    #[error("task {task} is not shown in the {role} row")]
    TaskNotInRow {
        /// Requested task
        task: TaskId,
        /// Row that does not show it
        role: Role,
    },

    /// Toggle issued before a client was selected
    #[error("no client selected")]
    NoClientSelected,

    /// Role lacks a directory permission
    #[error("{role} lacks the {permission} permission")]
    MissingPermission {
        /// Role of the acting user
        role: Role,
        /// Permission required
        permission: Permission,
    },

    /// Client id not in the registry
    #[error("unknown client {0}")]
    UnknownClient(ClientId),

    /// Client id already in the registry
    #[error("client {0} already exists")]
    DuplicateClient(ClientId),

    /// No user with that username
    #[error("unknown user {0}")]
    UnknownUser(String),

    /// Malformed identifier in a request
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl AccessError {
    /// Whether the rejection is an authorization decision rather than a
    /// malformed request
    #[inline]
    #[must_use]
    pub fn is_denial(&self) -> bool {
        matches!(
            self,
            AccessError::NoUser
                | AccessError::PermissionDenied { .. }
                | AccessError::TaskLocked { .. }
                | AccessError::MissingPermission { .. }
        )
    }

    /// Short stable name, recorded in the audit trail
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            AccessError::NoUser => "no-user",
            AccessError::PermissionDenied { .. } => "permission-denied",
            AccessError::TaskLocked { .. } => "task-locked",
            AccessError::UnknownTask(_) => "unknown-task",
            AccessError::TaskNotInRow { .. } => "task-not-in-row",
            AccessError::NoClientSelected => "no-client-selected",
            AccessError::MissingPermission { .. } => "missing-permission",
            AccessError::UnknownClient(_) => "unknown-client",
            AccessError::DuplicateClient(_) => "duplicate-client",
            AccessError::UnknownUser(_) => "unknown-user",
            AccessError::Model(_) => "malformed",
        }
    }
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
