//! report-desk - error and bug report intake for the school platform
//!
//! Captures error and bug reports from anonymous browsing sessions and lets
//! admins and staff triage them.
//!
//! ## Pieces
//!
//! - **Session**: stable anonymous session id and the sliding one-hour
//!   submission ledger that throttles each session
//! - **Anonymize**: one-way hashing of school identifiers before storage
//! - **Report**: the persisted report shape and its normalization
//! - **Pipeline**: gate checks, normalize, persist, then record the quota
//! - **Triage**: role-gated listing, status changes and dashboard counts
//! - **Store**: the document database boundary (in-memory and MongoDB)

pub mod anonymize;
pub mod auth;
pub mod clock;
pub mod config;
pub mod environment;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod session;
pub mod store;
pub mod triage;

pub use anonymize::hash_school_id;
pub use auth::{AuthProvider, CallerIdentity, UserRole};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Args, ReportingConfig};
pub use environment::{ConsoleBuffer, EnvironmentSnapshot, EnvironmentSnapshotProvider, PageEnvironment};
pub use error::{ReportError, Result};
pub use pipeline::ReportingService;
pub use report::{BugReportForm, ErrorReport, ReportDraft, ReportStatus, ReportType, Severity};
pub use session::{MemorySessionStorage, RateLimiter, SessionContext, SessionStorage};
pub use store::{DocumentStore, InMemoryDocumentStore, MongoDocumentStore};
pub use triage::{ReportStats, TriageService};
