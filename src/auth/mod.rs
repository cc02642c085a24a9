//! Caller identity and role checks
//!
//! Provides:
//! - School roles and the triage rule (admin/staff only)
//! - The read-only view of the signed-in caller supplied by the auth collaborator

pub mod provider;
pub mod roles;

pub use provider::{AnonymousAuth, AuthProvider, CallerIdentity, StaticAuthProvider};
pub use roles::{can_triage, is_role_allowed, parse_role_list, UserRole};
