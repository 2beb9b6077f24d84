//! Explicit session context.
//!
//! Whoever needs the current user's role or tenant receives a [`Session`]
//! value; nothing reads it from ambient state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::permissions::{has_permission, Permission};

/// Portal roles, most privileged first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    MasterAdmin,
    SuperAdmin,
    Admin,
    Editor,
    #[default]
    Viewer,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::MasterAdmin,
        Role::SuperAdmin,
        Role::Admin,
        Role::Editor,
        Role::Viewer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::MasterAdmin => "master_admin",
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::Editor => "editor",
            Role::Viewer => "viewer",
        }
    }

    /// Parse a stored role string. Missing or unknown roles become `Viewer`.
    pub fn parse_or_viewer(value: Option<&str>) -> Role {
        value
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s.trim())
            .ok_or_else(|| format!("unknown role: {}", s))
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(Role::parse_or_viewer(raw.as_deref()))
    }
}

/// The logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub username: String,
    #[serde(default)]
    pub role: Role,
    /// Tenant the user belongs to. Empty for a master admin.
    #[serde(default)]
    pub tenant_code: String,
}

impl Session {
    pub fn new(username: impl Into<String>, role: Role, tenant_code: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            role,
            tenant_code: tenant_code.into(),
        }
    }

    pub fn is_master_admin(&self) -> bool {
        self.role == Role::MasterAdmin
    }

    pub fn can(&self, permission: Permission) -> bool {
        has_permission(self.role, permission)
    }

    /// Tenant that new records are written under.
    ///
    /// A master admin works on whichever tenant is selected; everyone else
    /// is pinned to their own tenant.
    pub fn effective_tenant<'a>(&'a self, selected: Option<&'a str>) -> &'a str {
        match selected {
            Some(code) if self.is_master_admin() && !code.is_empty() => code,
            _ => &self.tenant_code,
        }
    }
}
