//! Signed-in session
//!
//! A [`Session`] owns everything that changes while a user works: which
//! client is selected, and one [`ProjectState`] per client touched so far.
//! Ending the session drops that state.

use crate::catalog::Catalog;
use crate::directory::ClientRegistry;
use crate::error::AccessError;
use crate::evaluator::{AccessEvaluator, ProjectState, ToggleOutcome};
use crate::matrix::MatrixSnapshot;
use stagegate_model::{ClientId, Permission, Role, TaskId, User};
use std::collections::HashMap;
use std::sync::Arc;

/// One user's working state
#[derive(Debug)]
pub struct Session {
    catalog: Arc<Catalog>,
    user: User,
    selected: Option<ClientId>,
    projects: HashMap<ClientId, ProjectState>,
}

impl Session {
    /// Start a session for `user` with no client selected
    #[must_use]
    pub fn start(catalog: Arc<Catalog>, user: User) -> Self {
        tracing::debug!(user = %user.username, role = %user.role, "session started");
        Self {
            catalog,
            user,
            selected: None,
            projects: HashMap::new(),
        }
    }

    /// Signed-in user
    #[inline]
    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Catalog the session evaluates against
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Selected client, if any
    #[inline]
    #[must_use]
    pub fn selected_client(&self) -> Option<&ClientId> {
        self.selected.as_ref()
    }

    /// Select the client whose matrix subsequent calls act on
    ///
    /// # Errors
    /// - [`AccessError::MissingPermission`] without `view-clients`
    /// - [`AccessError::UnknownClient`] if `id` is not in `registry`
    pub fn select_client(&mut self, registry: &ClientRegistry, id: &ClientId) -> Result<(), AccessError> {
        if !self
            .catalog
            .permissions()
            .has_permission(Some(self.user.role), Permission::ViewClients)
        {
            return Err(AccessError::MissingPermission {
                role: self.user.role,
                permission: Permission::ViewClients,
            });
        }
        if !registry.contains(id) {
            return Err(AccessError::UnknownClient(id.clone()));
        }
        tracing::debug!(client = %id, "client selected");
        self.selected = Some(id.clone());
        Ok(())
    }

    /// Deselect the current client; its state is kept
    pub fn clear_client(&mut self) {
        self.selected = None;
    }

    /// State recorded for `id`, if the session touched it
    #[must_use]
    pub fn project(&self, id: &ClientId) -> Option<&ProjectState> {
        self.projects.get(id)
    }

    /// Evaluator bound to the selected client's state
    ///
    /// # Errors
    /// [`AccessError::NoClientSelected`].
    pub fn evaluator(&mut self) -> Result<AccessEvaluator<'_>, AccessError> {
        let client = self.selected.as_ref().ok_or(AccessError::NoClientSelected)?;
        let state = self.projects.entry(client.clone()).or_default();
        Ok(AccessEvaluator::new(&self.catalog, state))
    }

    /// Set completion of (task, role) on the selected client as this user
    ///
    /// # Errors
    /// [`AccessError::NoClientSelected`] or any rejection from
    /// [`AccessEvaluator::set_completion`].
    pub fn toggle(&mut self, task: TaskId, role: Role, completed: bool) -> Result<ToggleOutcome, AccessError> {
        let client = self.selected.as_ref().ok_or(AccessError::NoClientSelected)?;
        let state = self.projects.entry(client.clone()).or_default();
        AccessEvaluator::new(&self.catalog, state).set_completion(Some(&self.user), task, role, completed)
    }

    /// Matrix of the selected client as seen by this user
    ///
    /// # Errors
    /// [`AccessError::NoClientSelected`].
    pub fn matrix(&mut self) -> Result<MatrixSnapshot, AccessError> {
        let client = self.selected.as_ref().ok_or(AccessError::NoClientSelected)?;
        let state = self.projects.entry(client.clone()).or_default();
        Ok(AccessEvaluator::new(&self.catalog, state).matrix(Some(&self.user)))
    }

    /// Sign out, discarding all session state
    pub fn end(self) {
        tracing::debug!(
            user = %self.user.username,
            projects = self.projects.len(),
            "session ended"
        );
    }
}
