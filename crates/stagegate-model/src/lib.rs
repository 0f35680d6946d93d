//! Stagegate Model
//!
//! The vocabulary shared by every other crate in the workspace:
//! - [`Role`], [`Permission`] and [`ProjectStage`] identifiers
//! - [`TaskId`], [`User`] and [`Client`]
//! - The two static lookup tables: [`RolePermissionTable`] and
//!   [`StageAccessTable`]
//! - The dashboard [`Panel`] guard derived from permissions
//!
//! Tables are plain data. They are filled once while a catalog is loaded and
//! only read afterwards; lookups against a role the table does not know
//! degrade to `false` / empty instead of failing.

#![warn(unreachable_pub)]

pub mod client;
pub mod error;
pub mod panel;
pub mod permission;
pub mod role;
pub mod stage;
pub mod task;
pub mod user;

pub use client::{Client, ClientId, Contact};
pub use error::ModelError;
pub use panel::{panels_for, Panel, PanelAccess};
pub use permission::{Permission, RoleGrant, RolePermissionTable};
pub use role::Role;
pub use stage::{ProjectStage, StageAccessTable};
pub use task::TaskId;
pub use user::{User, UserId};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
