//! Dashboard panel guard
//!
//! Each panel is gated on one view permission; the create/edit/delete
//! flags it exposes come from the matching write permissions.

use crate::permission::{Permission, RolePermissionTable};
use crate::role::Role;
use serde::{Deserialize, Serialize};

/// Functional panel of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Panel {
    /// Client list and maintenance
    ClientManagement,
    /// User list and maintenance
    UserManagement,
    /// System configuration
    SystemConfig,
    /// Analytics dashboards
    Analytics,
}

impl Panel {
    /// Panels in display order
    pub const ALL: [Panel; 4] = [
        Panel::ClientManagement,
        Panel::UserManagement,
        Panel::SystemConfig,
        Panel::Analytics,
    ];

    /// Permission needed to see the panel at all
    #[must_use]
    pub const fn view_permission(self) -> Permission {
        match self {
            Panel::ClientManagement => Permission::ViewClients,
            Panel::UserManagement => Permission::ViewUsers,
            Panel::SystemConfig => Permission::ViewConfig,
            Panel::Analytics => Permission::ViewAnalytics,
        }
    }

    /// (create, edit, delete) permissions, where the panel has them
    const fn write_permissions(
        self,
    ) -> (Option<Permission>, Option<Permission>, Option<Permission>) {
        match self {
            Panel::ClientManagement => (
                Some(Permission::CreateClient),
                Some(Permission::EditClient),
                Some(Permission::DeleteClient),
            ),
            Panel::UserManagement => (
                Some(Permission::CreateUser),
                Some(Permission::EditUser),
                Some(Permission::DeleteUser),
            ),
            Panel::SystemConfig => (None, Some(Permission::EditConfig), None),
            Panel::Analytics => (None, None, None),
        }
    }
}

/// A visible panel and the write actions it offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelAccess {
    /// Visible panel
    pub panel: Panel,
    /// Create action offered
    pub can_create: bool,
    /// Edit action offered
    pub can_edit: bool,
    /// Delete action offered
    pub can_delete: bool,
}

/// Panels `role` may open, in display order
///
/// Nothing is visible without a role.
#[must_use]
pub fn panels_for(table: &RolePermissionTable, role: Option<Role>) -> Vec<PanelAccess> {
    let holds = |p: Option<Permission>| p.is_some_and(|p| table.has_permission(role, p));

    Panel::ALL
        .into_iter()
        .filter(|panel| table.has_permission(role, panel.view_permission()))
        .map(|panel| {
            let (create, edit, delete) = panel.write_permissions();
            PanelAccess {
                panel,
                can_create: holds(create),
                can_edit: holds(edit),
                can_delete: holds(delete),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permission::RoleGrant;
    use pretty_assertions::assert_eq;

    #[test]
    fn only_viewable_panels_are_listed() {
        let table: RolePermissionTable = [(
            Role::AlphaSsc,
            RoleGrant::new([
                Permission::ViewClients,
                Permission::EditClient,
                Permission::ViewConfig,
            ]),
        )]
        .into_iter()
        .collect();

        let panels = panels_for(&table, Some(Role::AlphaSsc));
        assert_eq!(
            panels,
            vec![
                PanelAccess {
                    panel: Panel::ClientManagement,
                    can_create: false,
                    can_edit: true,
                    can_delete: false,
                },
                PanelAccess {
                    panel: Panel::SystemConfig,
                    can_create: false,
                    can_edit: false,
                    can_delete: false,
                },
            ]
        );
    }

    #[test]
    fn no_role_sees_nothing() {
        let table: RolePermissionTable =
            [(Role::SuperAdmin, RoleGrant::new(Permission::ALL))].into_iter().collect();
        assert!(panels_for(&table, None).is_empty());
        assert_eq!(panels_for(&table, Some(Role::SuperAdmin)).len(), 4);
    }
}
