//! Permissions and the Role-Permission table

use crate::error::ModelError;
use crate::role::Role;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Coarse capability owned by a role
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Permission {
    /// List client accounts
    ViewClients,
    /// Register a new client account
    CreateClient,
    /// Change client details
    EditClient,
    /// Remove a client account
    DeleteClient,
    /// List users
    ViewUsers,
    /// Create users
    CreateUser,
    /// Edit users
    EditUser,
    /// Delete users
    DeleteUser,
    /// Read system configuration
    ViewConfig,
    /// Change system configuration
    EditConfig,
    /// Read analytics
    ViewAnalytics,
    /// Read system logs
    ViewLogs,
}

impl Permission {
    /// Every permission, in declaration order
    pub const ALL: [Permission; 12] = [
        Permission::ViewClients,
        Permission::CreateClient,
        Permission::EditClient,
        Permission::DeleteClient,
        Permission::ViewUsers,
        Permission::CreateUser,
        Permission::EditUser,
        Permission::DeleteUser,
        Permission::ViewConfig,
        Permission::EditConfig,
        Permission::ViewAnalytics,
        Permission::ViewLogs,
    ];

    /// Canonical kebab-case identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Permission::ViewClients => "view-clients",
            Permission::CreateClient => "create-client",
            Permission::EditClient => "edit-client",
            Permission::DeleteClient => "delete-client",
            Permission::ViewUsers => "view-users",
            Permission::CreateUser => "create-user",
            Permission::EditUser => "edit-user",
            Permission::DeleteUser => "delete-user",
            Permission::ViewConfig => "view-config",
            Permission::EditConfig => "edit-config",
            Permission::ViewAnalytics => "view-analytics",
            Permission::ViewLogs => "view-logs",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ModelError::UnknownPermission(s.to_string()))
    }
}

/// Permissions granted to one role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGrant {
    /// Granted permissions
    pub permissions: BTreeSet<Permission>,
    /// Human readable summary of the role
    #[serde(default)]
    pub description: String,
}

impl RoleGrant {
    /// Create a grant from a permission list
    pub fn new(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            permissions: permissions.into_iter().collect(),
            description: String::new(),
        }
    }

    /// With description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Static mapping from role to its permission set
///
/// Pure lookup. A role without an entry holds no permissions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RolePermissionTable {
    grants: IndexMap<Role, RoleGrant>,
}

impl RolePermissionTable {
    /// Create an empty table
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the grant for `role`, returning the previous one
    pub fn insert(&mut self, role: Role, grant: RoleGrant) -> Option<RoleGrant> {
        self.grants.insert(role, grant)
    }

    /// Whether `role` holds `permission`
    ///
    /// Absent or unlisted roles hold nothing.
    #[must_use]
    pub fn has_permission(&self, role: Option<Role>, permission: Permission) -> bool {
        role.and_then(|r| self.grants.get(&r))
            .is_some_and(|grant| grant.permissions.contains(&permission))
    }

    /// String-keyed variant of [`Self::has_permission`]
    ///
    /// An unparseable role string is a configuration gap, not a failure.
    #[must_use]
    pub fn has_permission_str(&self, role: &str, permission: Permission) -> bool {
        self.has_permission(role.parse().ok(), permission)
    }

    /// Permission set of `role`, if listed
    #[must_use]
    pub fn permissions_of(&self, role: Role) -> Option<&BTreeSet<Permission>> {
        self.grants.get(&role).map(|grant| &grant.permissions)
    }

    /// Role description, if listed
    #[must_use]
    pub fn description(&self, role: Role) -> Option<&str> {
        self.grants.get(&role).map(|grant| grant.description.as_str())
    }

    /// Roles with an entry, in insertion order
    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.grants.keys().copied()
    }

    /// Permissions held by some other role but missing from `super-admin`
    ///
    /// Empty when the super-admin grant covers the union of all grants.
    #[must_use]
    pub fn missing_for_super_admin(&self) -> BTreeSet<Permission> {
        let admin = self.permissions_of(Role::SuperAdmin);
        self.grants
            .iter()
            .filter(|(role, _)| !role.is_super_admin())
            .flat_map(|(_, grant)| grant.permissions.iter().copied())
            .filter(|p| !admin.is_some_and(|held| held.contains(p)))
            .collect()
    }

    /// Number of listed roles
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.grants.len()
    }

    /// Whether no role is listed
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}

impl FromIterator<(Role, RoleGrant)> for RolePermissionTable {
    fn from_iter<I: IntoIterator<Item = (Role, RoleGrant)>>(iter: I) -> Self {
        Self {
            grants: iter.into_iter().collect(),
        }
    }
}
