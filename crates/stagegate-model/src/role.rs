//! Role identifiers
//!
//! A role is assigned to a user at sign-in and never changes afterwards.
//! Every row of the stage matrix belongs to exactly one role.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed identity category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Alpha sales team
    AlphaSales,
    /// Alpha shared services
    AlphaSsc,
    /// Espora strategy team
    EsporaStrategy,
    /// Testank studies team
    TestankStudies,
    /// Espora accompaniment team
    EsporaAccompaniment,
    /// Espora management team
    EsporaManagement,
    /// Espora production team
    EsporaProduction,
    /// Espora diffusion team
    EsporaDiffusion,
    /// Unrestricted administrator
    SuperAdmin,
}

impl Role {
    /// Every role, in declaration order
    pub const ALL: [Role; 9] = [
        Role::AlphaSales,
        Role::AlphaSsc,
        Role::EsporaStrategy,
        Role::TestankStudies,
        Role::EsporaAccompaniment,
        Role::EsporaManagement,
        Role::EsporaProduction,
        Role::EsporaDiffusion,
        Role::SuperAdmin,
    ];

    /// Canonical kebab-case identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::AlphaSales => "alpha-sales",
            Role::AlphaSsc => "alpha-ssc",
            Role::EsporaStrategy => "espora-strategy",
            Role::TestankStudies => "testank-studies",
            Role::EsporaAccompaniment => "espora-accompaniment",
            Role::EsporaManagement => "espora-management",
            Role::EsporaProduction => "espora-production",
            Role::EsporaDiffusion => "espora-diffusion",
            Role::SuperAdmin => "super-admin",
        }
    }

    /// Short row label shown next to the role's matrix row
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Role::AlphaSales => "VENTAS",
            Role::AlphaSsc => "SSC",
            Role::EsporaStrategy => "ESTRATEGIA",
            Role::TestankStudies => "ESTUDIOS",
            Role::EsporaAccompaniment => "ACOMPAÑAMIENTO",
            Role::EsporaManagement => "GERENCIA",
            Role::EsporaProduction => "PRODUCCIÓN",
            Role::EsporaDiffusion => "DIFUSIÓN",
            Role::SuperAdmin => "ADMIN",
        }
    }

    /// Organisation the team belongs to, if any
    #[must_use]
    pub const fn organisation(self) -> Option<&'static str> {
        match self {
            Role::AlphaSales | Role::AlphaSsc => Some("ALPHA"),
            Role::TestankStudies => Some("TESTANK"),
            Role::EsporaStrategy
            | Role::EsporaAccompaniment
            | Role::EsporaManagement
            | Role::EsporaProduction
            | Role::EsporaDiffusion => Some("ESPORA"),
            Role::SuperAdmin => None,
        }
    }

    /// Whether this role bypasses row and dependency checks
    #[inline]
    #[must_use]
    pub const fn is_super_admin(self) -> bool {
        matches!(self, Role::SuperAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| ModelError::UnknownRole(s.to_string()))
    }
}
