//! Principals: who is acting on the system.
//!
//! Two principal kinds exist, administrators and regular users, each backed
//! by its own account table. A [`Principal`] is the authenticated identity
//! threaded explicitly through every operation; it is never read from
//! ambient state.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::PrincipalId;

/// The role tag distinguishing the two principal kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Stable string form, used in storage columns.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    /// Parse the stable string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "user" => Some(Role::User),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated principal: role tag plus identifier.
///
/// Immutable for the duration of an operation. Constructed by the
/// authentication boundary (outside this core) and passed by reference into
/// every service call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    pub role: Role,
}

impl Principal {
    /// An admin principal.
    pub const fn admin(id: i64) -> Self {
        Self {
            id: PrincipalId::new(id),
            role: Role::Admin,
        }
    }

    /// A regular user principal.
    pub const fn user(id: i64) -> Self {
        Self {
            id: PrincipalId::new(id),
            role: Role::User,
        }
    }

    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.role, self.id)
    }
}

/// An administrator account record.
///
/// Credentials are handled outside this core; only the identity fields
/// live here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminAccount {
    pub id: PrincipalId,
    pub name: String,
    pub email: String,
    /// Unix milliseconds, stamped by the store.
    pub created_at: i64,
    /// Unix milliseconds, stamped by the store.
    pub updated_at: i64,
}

/// Fields for creating an administrator account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAdmin {
    pub name: String,
    pub email: String,
}

/// Partial update for an administrator account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl AdminPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

/// A regular user account record.
///
/// Users register through the external auth boundary; this core only needs
/// them as a principal lookup table for owner projection and stats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: PrincipalId,
    pub name: String,
    pub email: String,
}

/// Fields for creating a user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}
