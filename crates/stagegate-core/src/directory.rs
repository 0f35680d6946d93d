//! Users and clients
//!
//! [`UserDirectory`] resolves a username to a [`User`]. There is no
//! credential check: signing in is a lookup. [`ClientRegistry`] holds the
//! client accounts a matrix can be opened for, and gates changes on the
//! acting user's permissions.

use crate::error::AccessError;
use chrono::NaiveDate;
use indexmap::IndexMap;
use stagegate_model::{Client, ClientId, Permission, Role, RolePermissionTable, User};

/// Known users, keyed by lowercase username
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: IndexMap<String, User>,
}

impl UserDirectory {
    /// Empty directory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// One demo user per role
    #[must_use]
    pub fn demo() -> Self {
        const SEED: [(&str, &str, &str, &str, Role); 9] = [
            ("1", "admin", "Admin User", "admin@example.com", Role::SuperAdmin),
            ("2", "sales", "Sales Team", "sales@alpha.com", Role::AlphaSales),
            ("3", "ssc", "SSC Team", "ssc@alpha.com", Role::AlphaSsc),
            ("4", "strategy", "Strategy Team", "strategy@espora.com", Role::EsporaStrategy),
            ("5", "studies", "Studies Team", "studies@testank.com", Role::TestankStudies),
            (
                "6",
                "accompaniment",
                "Accompaniment Team",
                "accompaniment@espora.com",
                Role::EsporaAccompaniment,
            ),
            ("7", "management", "Management Team", "management@espora.com", Role::EsporaManagement),
            ("8", "production", "Production Team", "production@espora.com", Role::EsporaProduction),
            ("9", "diffusion", "Diffusion Team", "diffusion@espora.com", Role::EsporaDiffusion),
        ];

        SEED.into_iter()
            .map(|(id, username, name, email, role)| {
                User::new(id, username, role)
                    .with_name(name)
                    .with_email(email)
                    .with_avatar(format!("https://i.pravatar.cc/150?img={id}"))
            })
            .collect()
    }

    /// Add or replace a user
    pub fn insert(&mut self, user: User) -> Option<User> {
        self.users.insert(user.username.to_lowercase(), user)
    }

    /// User with `username`, ignoring case
    #[must_use]
    pub fn find(&self, username: &str) -> Option<&User> {
        self.users.get(&username.to_lowercase())
    }

    /// Resolve a sign-in
    ///
    /// # Errors
    /// [`AccessError::UnknownUser`] when nobody has that username.
    pub fn sign_in(&self, username: &str) -> Result<User, AccessError> {
        let user = self
            .find(username)
            .cloned()
            .ok_or_else(|| AccessError::UnknownUser(username.to_string()))?;
        tracing::info!(user = %user.username, role = %user.role, "signed in");
        Ok(user)
    }

    /// Users in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &User> + '_ {
        self.users.values()
    }

    /// Number of users
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the directory is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl FromIterator<User> for UserDirectory {
    fn from_iter<I: IntoIterator<Item = User>>(iter: I) -> Self {
        let mut directory = Self::new();
        for user in iter {
            directory.insert(user);
        }
        directory
    }
}

/// Client accounts, in creation order
#[derive(Debug, Clone, Default)]
pub struct ClientRegistry {
    clients: IndexMap<ClientId, Client>,
}

impl ClientRegistry {
    /// Empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with the demo clients
    #[must_use]
    pub fn demo() -> Self {
        const SEED: [(&str, &str, &str, (i32, u32, u32)); 6] = [
            ("1", "Acme Corp", "Leading provider of everything", (2023, 1, 15)),
            ("2", "Globex Industries", "International conglomerate", (2023, 2, 10)),
            ("3", "Initech", "Software solutions provider", (2023, 3, 22)),
            ("4", "Umbrella Corp", "Pharmaceutical company", (2023, 4, 5)),
            ("5", "Stark Industries", "Advanced technology and defense", (2023, 5, 17)),
            ("6", "Soylent Corp", "Food processing company", (2023, 6, 30)),
        ];

        let clients = SEED
            .into_iter()
            .filter_map(|(id, name, description, (y, m, d))| {
                let created = NaiveDate::from_ymd_opt(y, m, d)?;
                Some(Client::new(id, name, created, "admin").with_description(description))
            })
            .map(|client| (client.id.clone(), client))
            .collect();
        Self { clients }
    }

    /// Client with `id`
    #[must_use]
    pub fn get(&self, id: &ClientId) -> Option<&Client> {
        self.clients.get(id)
    }

    /// Whether `id` is registered
    #[must_use]
    pub fn contains(&self, id: &ClientId) -> bool {
        self.clients.contains_key(id)
    }

    /// Clients in creation order
    pub fn iter(&self) -> impl Iterator<Item = &Client> + '_ {
        self.clients.values()
    }

    /// Number of clients
    #[must_use]
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Clients visible to `actor`; empty without `view-clients`
    #[must_use]
    pub fn visible_to(&self, permissions: &RolePermissionTable, actor: Option<&User>) -> Vec<&Client> {
        if permissions.has_permission(actor.map(|u| u.role), Permission::ViewClients) {
            self.clients.values().collect()
        } else {
            Vec::new()
        }
    }

    /// Register a client
    ///
    /// # Errors
    /// - [`AccessError::NoUser`] / [`AccessError::MissingPermission`]
    ///   without `create-client`
    /// - [`AccessError::DuplicateClient`] if the id is taken
    pub fn add(
        &mut self,
        permissions: &RolePermissionTable,
        actor: Option<&User>,
        client: Client,
    ) -> Result<(), AccessError> {
        require(permissions, actor, Permission::CreateClient)?;
        if self.clients.contains_key(&client.id) {
            return Err(AccessError::DuplicateClient(client.id));
        }
        tracing::info!(client = %client.id, name = %client.name, "client added");
        self.clients.insert(client.id.clone(), client);
        Ok(())
    }

    /// Replace an existing client's details
    ///
    /// # Errors
    /// - [`AccessError::NoUser`] / [`AccessError::MissingPermission`]
    ///   without `edit-client`
    /// - [`AccessError::UnknownClient`] if the id is not registered
    pub fn update(
        &mut self,
        permissions: &RolePermissionTable,
        actor: Option<&User>,
        client: Client,
    ) -> Result<(), AccessError> {
        require(permissions, actor, Permission::EditClient)?;
        let slot = self
            .clients
            .get_mut(&client.id)
            .ok_or_else(|| AccessError::UnknownClient(client.id.clone()))?;
        tracing::info!(client = %client.id, "client updated");
        *slot = client;
        Ok(())
    }

    /// Remove a client, returning it
    ///
    /// # Errors
    /// - [`AccessError::NoUser`] / [`AccessError::MissingPermission`]
    ///   without `delete-client`
    /// - [`AccessError::UnknownClient`] if the id is not registered
    pub fn remove(
        &mut self,
        permissions: &RolePermissionTable,
        actor: Option<&User>,
        id: &ClientId,
    ) -> Result<Client, AccessError> {
        require(permissions, actor, Permission::DeleteClient)?;
        let removed = self
            .clients
            .shift_remove(id)
            .ok_or_else(|| AccessError::UnknownClient(id.clone()))?;
        tracing::info!(client = %id, "client removed");
        Ok(removed)
    }
}

fn require(
    permissions: &RolePermissionTable,
    actor: Option<&User>,
    permission: Permission,
) -> Result<(), AccessError> {
    let user = actor.ok_or(AccessError::NoUser)?;
    if permissions.has_permission(Some(user.role), permission) {
        Ok(())
    } else {
        tracing::warn!(user = %user.username, role = %user.role, %permission, "directory change denied");
        Err(AccessError::MissingPermission {
            role: user.role,
            permission,
        })
    }
}
