//! Read-only view of the current caller

use super::roles::UserRole;

/// What the auth collaborator knows about the signed-in caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerIdentity {
    pub role: Option<UserRole>,
    pub email: Option<String>,
    /// Raw school identifier. Never persisted as-is.
    pub school_id: Option<String>,
}

impl CallerIdentity {
    pub fn new(role: UserRole) -> Self {
        Self {
            role: Some(role),
            email: None,
            school_id: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_school(mut self, school_id: impl Into<String>) -> Self {
        self.school_id = Some(school_id.into());
        self
    }
}

/// Auth collaborator boundary. Returns `None` for anonymous visitors.
pub trait AuthProvider: Send + Sync {
    fn current_caller(&self) -> Option<CallerIdentity>;
}

/// Provider that always reports the same caller
#[derive(Debug, Clone)]
pub struct StaticAuthProvider {
    caller: CallerIdentity,
}

impl StaticAuthProvider {
    pub fn new(caller: CallerIdentity) -> Self {
        Self { caller }
    }
}

impl AuthProvider for StaticAuthProvider {
    fn current_caller(&self) -> Option<CallerIdentity> {
        Some(self.caller.clone())
    }
}

/// Provider for visitors who are not signed in
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousAuth;

impl AuthProvider for AnonymousAuth {
    fn current_caller(&self) -> Option<CallerIdentity> {
        None
    }
}
