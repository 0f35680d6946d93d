//! Users as seen by the access core
//!
//! The core never authenticates. It only reads the role of whoever the
//! session layer says is signed in.

use crate::role::Role;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque user identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identifier
    pub id: UserId,
    /// Sign-in name
    pub username: String,
    /// Display name
    pub name: String,
    /// Contact email
    pub email: String,
    /// The one role this user holds
    pub role: Role,
    /// Avatar image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl User {
    /// Create a user with the given id, username and role
    ///
    /// Display name defaults to the username and email is left empty.
    pub fn new(id: impl Into<UserId>, username: impl Into<String>, role: Role) -> Self {
        let username = username.into();
        Self {
            id: id.into(),
            name: username.clone(),
            username,
            email: String::new(),
            role,
            avatar_url: None,
        }
    }

    /// With display name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// With email
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// With avatar
    #[must_use]
    pub fn with_avatar(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = Some(url.into());
        self
    }

    /// Shorthand for `self.role.is_super_admin()`
    #[inline]
    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        self.role.is_super_admin()
    }
}
