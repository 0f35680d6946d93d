//! Stagegate Core
//!
//! Role-gated access to a project's stage matrix.
//!
//! ```text
//!   Catalog (validated config)          ProjectState (per client)
//!   ├── RolePermissionTable             ├── CompletionLedger
//!   ├── StageAccessTable (row order)    └── AuditTrail
//!   ├── TaskGraph
//!   └── LayoutTable
//!              \                       /
//!               AccessEvaluator  ── row access, unlock, toggles
//!                      │
//!               MatrixSnapshot   ── what a renderer draws
//! ```
//!
//! A [`Session`] ties a signed-in [`User`](stagegate_model::User) to one
//! [`ProjectState`] per client and hands out evaluators for the selected
//! client.
//!
//! # Example
//!
//! ```rust,ignore
//! use stagegate_core::{AccessEvaluator, Catalog, ProjectState};
//!
//! let catalog = Catalog::builtin()?;
//! let mut state = ProjectState::new();
//! let mut eval = AccessEvaluator::new(&catalog, &mut state);
//! eval.set_completion(Some(&sales), task(1), Role::AlphaSales, true)?;
//! assert!(eval.is_unlocked(Some(&sales), task(2), Role::AlphaSales));
//! ```

#![warn(unreachable_pub)]

pub mod catalog;
pub mod config;
pub mod directory;
pub mod error;
pub mod evaluator;
pub mod matrix;
pub mod session;

pub use catalog::Catalog;
pub use config::{CatalogConfig, CellConfig, DependencyConfig, RoleConfig, UnlockPolicy};
pub use directory::{ClientRegistry, UserDirectory};
pub use error::{AccessError, ConfigError};
pub use evaluator::{
    row_access, AccessEvaluator, ButtonState, ProjectState, RowAccess, TaskControl, ToggleOutcome,
};
pub use matrix::{MatrixCell, MatrixRow, MatrixSnapshot};
pub use session::Session;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
