//! Anonymous browsing-session state
//!
//! Everything here lives only as long as one browsing session: the session
//! id that correlates reports, and the advisory per-session submission
//! ledger. None of it is an authentication or security boundary.

pub mod identity;
pub mod rate_limit;
pub mod storage;

pub use identity::SessionContext;
pub use rate_limit::{RateLimiter, RATE_LIMIT_WINDOW_MS};
pub use storage::{MemorySessionStorage, SessionStorage};
