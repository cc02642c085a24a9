//! School roles and which reporting actions they unlock

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ReportError, Result};

/// Role of a signed-in user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Guardian,
    Teacher,
    Staff,
    Admin,
}

impl UserRole {
    /// Every role, in the default submission allow-list order
    pub const ALL: [UserRole; 5] = [
        UserRole::Student,
        UserRole::Guardian,
        UserRole::Teacher,
        UserRole::Staff,
        UserRole::Admin,
    ];

    /// Parse from string representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "student" => Some(Self::Student),
            "guardian" | "parent" => Some(Self::Guardian),
            "teacher" => Some(Self::Teacher),
            "staff" => Some(Self::Staff),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Guardian => "guardian",
            Self::Teacher => "teacher",
            Self::Staff => "staff",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Only admins and staff may list or change reports
pub fn can_triage(role: Option<UserRole>) -> bool {
    matches!(role, Some(UserRole::Admin) | Some(UserRole::Staff))
}

/// Submission check against the configured allow-list.
/// Anonymous visitors (no known role) are always let through.
pub fn is_role_allowed(role: Option<UserRole>, allowed: &[UserRole]) -> bool {
    match role {
        Some(role) => allowed.contains(&role),
        None => true,
    }
}

/// Parse a comma separated role list such as `"student,teacher,admin"`
pub fn parse_role_list(raw: &str) -> Result<Vec<UserRole>> {
    let mut roles = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let role = UserRole::from_str(part)
            .ok_or_else(|| ReportError::Config(format!("Unknown role '{}'", part)))?;
        if !roles.contains(&role) {
            roles.push(role);
        }
    }
    Ok(roles)
}
