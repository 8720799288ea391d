//! Role types carried on the unified user record.
//!
//! Roles are resolved at sign-in time, either from the provider's own claims
//! or from the platform default. Consumers (route authorization, UI) read
//! them from the session snapshot; this crate only carries them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A role assigned to an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Standard user access.
    User,
    /// Administrator access.
    Admin,
}

impl Role {
    /// Returns true if this role has admin privileges.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::User => "user",
            Self::Admin => "admin",
        };
        f.write_str(name)
    }
}

/// Error returned when parsing a role from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRoleError {
    /// The string that failed to parse.
    pub input: String,
}

impl fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.input)
    }
}

impl std::error::Error for ParseRoleError {}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(ParseRoleError {
                input: other.to_string(),
            }),
        }
    }
}

/// Set of roles assigned to a user.
///
/// Duplicates are never stored. The platform default for a freshly signed-in
/// user whose provider supplies no roles of its own is [`RoleSet::admin`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSet {
    roles: Vec<Role>,
}

impl RoleSet {
    /// Creates an empty role set (no access).
    #[must_use]
    pub fn none() -> Self {
        Self { roles: Vec::new() }
    }

    /// Creates a role set with user access only.
    #[must_use]
    pub fn user() -> Self {
        Self {
            roles: vec![Role::User],
        }
    }

    /// Creates the default role set assigned at sign-in.
    #[must_use]
    pub fn admin() -> Self {
        Self {
            roles: vec![Role::Admin],
        }
    }

    /// Creates a role set from provider-supplied role names.
    ///
    /// Unknown names are skipped; duplicates collapse to one entry.
    #[must_use]
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let mut set = Self::none();
        for name in names {
            if let Ok(role) = name.as_ref().parse() {
                set.insert(role);
            }
        }
        set
    }

    /// Adds a role if not already present.
    pub fn insert(&mut self, role: Role) {
        if !self.roles.contains(&role) {
            self.roles.push(role);
        }
    }

    /// Returns true if the set grants any access at all.
    #[must_use]
    pub fn has_access(&self) -> bool {
        !self.roles.is_empty()
    }

    /// Returns true if the set grants admin access.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }

    /// Returns the roles as a slice.
    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }
}

impl Default for RoleSet {
    fn default() -> Self {
        Self::none()
    }
}
