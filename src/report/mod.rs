//! Report data model and normalization

mod bug;
mod model;
mod normalize;

pub use bug::{compose_description, BugReportForm};
pub use model::{ErrorReport, ReportStatus, ReportType, Severity};
pub use normalize::{build_report, ReportContext, ReportDraft, MAX_CONSOLE_ERRORS, UNTITLED_REPORT};
