//! Client accounts

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Client account identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub String);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClientId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Person to reach at a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Identifier
    pub id: String,
    /// Full name
    pub name: String,
    /// Contact email
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Phone number
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Job title
    pub position: Option<String>,
}

/// Client account a project matrix is tracked for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Identifier
    pub id: ClientId,
    /// Display name
    pub name: String,
    #[serde(default)]
    /// Logo image, empty when none
    pub logo_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Short description
    pub description: Option<String>,
    #[serde(default)]
    /// People to reach
    pub contacts: Vec<Contact>,
    /// Day the account was created
    pub created_at: NaiveDate,
    /// Username of the creator
    pub created_by: String,
}

impl Client {
    /// Create a client with no logo, description or contacts
    pub fn new(
        id: impl Into<ClientId>,
        name: impl Into<String>,
        created_at: NaiveDate,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            logo_url: String::new(),
            description: None,
            contacts: Vec::new(),
            created_at,
            created_by: created_by.into(),
        }
    }

    /// With description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// With logo
    #[must_use]
    pub fn with_logo(mut self, url: impl Into<String>) -> Self {
        self.logo_url = url.into();
        self
    }

    /// With an extra contact
    #[must_use]
    pub fn with_contact(mut self, contact: Contact) -> Self {
        self.contacts.push(contact);
        self
    }
}
