//! Builds the persisted report from caller input and captured context

use chrono::{DateTime, Utc};

use super::model::{ErrorReport, ReportStatus, ReportType, Severity};
use crate::anonymize::hash_school_id;
use crate::auth::CallerIdentity;
use crate::environment::EnvironmentSnapshot;

/// Most console lines stored with one report
pub const MAX_CONSOLE_ERRORS: usize = 10;

/// Title used when neither a title nor an error message was given
pub const UNTITLED_REPORT: &str = "Untitled report";

/// Caller-supplied part of a report.
///
/// Identity fields (role, school) are deliberately absent: they always come
/// from the auth collaborator, never from the caller.
#[derive(Debug, Clone, Default)]
pub struct ReportDraft {
    pub title: String,
    pub description: String,
    pub report_type: Option<ReportType>,
    pub severity: Option<Severity>,
    pub error_message: Option<String>,
    pub stack_trace: Option<String>,
    pub console_errors: Option<Vec<String>>,
    pub contact_email: Option<String>,
    pub allow_contact: bool,
}

impl ReportDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    /// Draft for an error captured automatically
    pub fn automatic(error_message: impl Into<String>, stack_trace: Option<String>) -> Self {
        let error_message = error_message.into();
        Self {
            title: error_message.clone(),
            description: String::new(),
            report_type: Some(ReportType::Automatic),
            severity: Some(Severity::High),
            error_message: Some(error_message),
            stack_trace,
            ..Default::default()
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_console_errors(mut self, lines: Vec<String>) -> Self {
        self.console_errors = Some(lines);
        self
    }

    pub fn with_contact(mut self, email: Option<String>) -> Self {
        self.allow_contact = true;
        self.contact_email = email;
        self
    }
}

/// Everything the normalizer needs besides the draft
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub caller: Option<CallerIdentity>,
    pub environment: EnvironmentSnapshot,
    /// Console diagnostics captured at submission time, oldest first
    pub console_snapshot: Vec<String>,
    pub session_id: String,
    pub build_version: Option<String>,
    pub now: DateTime<Utc>,
}

/// Build the normalized report.
///
/// Defaults: severity `medium`, type `manual`. Status is always `open`.
/// A blank title falls back to the error message, then [`UNTITLED_REPORT`].
/// Console errors fall back to the captured snapshot and are trimmed to the
/// most recent [`MAX_CONSOLE_ERRORS`].
pub fn build_report(draft: ReportDraft, ctx: ReportContext) -> ErrorReport {
    let error_message = non_empty(draft.error_message);
    let title = match draft.title.trim() {
        "" => error_message
            .as_deref()
            .map(str::trim)
            .unwrap_or(UNTITLED_REPORT)
            .to_string(),
        title => title.to_string(),
    };

    let console_errors = recent_lines(
        draft.console_errors.unwrap_or(ctx.console_snapshot),
        MAX_CONSOLE_ERRORS,
    );

    let caller = ctx.caller.unwrap_or_default();
    let contact_email = if draft.allow_contact {
        non_empty(draft.contact_email).or(caller.email)
    } else {
        None
    };

    ErrorReport {
        id: None,
        session_id: ctx.session_id,
        timestamp: ctx.now,
        created_at: ctx.now,
        updated_at: ctx.now,
        resolved_at: None,
        report_type: draft.report_type.unwrap_or_default(),
        severity: draft.severity.unwrap_or_default(),
        status: ReportStatus::Open,
        title,
        description: draft.description.trim().to_string(),
        error_message,
        stack_trace: non_empty(draft.stack_trace),
        console_errors,
        user_agent: ctx.environment.user_agent,
        url: ctx.environment.url,
        viewport: ctx.environment.viewport,
        user_role: caller.role,
        school_id: caller.school_id.as_deref().map(hash_school_id),
        contact_email,
        allow_contact: draft.allow_contact,
        build_version: non_empty(ctx.build_version),
        assigned_to: None,
        resolved_by: None,
        admin_notes: None,
    }
}

fn recent_lines(mut lines: Vec<String>, limit: usize) -> Vec<String> {
    if lines.len() > limit {
        lines.drain(..lines.len() - limit);
    }
    lines
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::UserRole;

    fn context(caller: Option<CallerIdentity>) -> ReportContext {
        ReportContext {
            caller,
            environment: EnvironmentSnapshot::new("agent/1.0", "https://school.app/roster", 1024, 768),
            console_snapshot: (0..15).map(|i| format!("line {}", i)).collect(),
            session_id: "session_1".into(),
            build_version: Some("2.4.1".into()),
            now: DateTime::from_timestamp_millis(1_700_000_000_000).unwrap(),
        }
    }

    #[test]
    fn test_defaults_applied() {
        let report = build_report(ReportDraft::new("Title", "Body"), context(None));

        assert_eq!(report.severity, Severity::Medium);
        assert_eq!(report.report_type, ReportType::Manual);
        assert_eq!(report.status, ReportStatus::Open);
        assert_eq!(report.session_id, "session_1");
        assert_eq!(report.timestamp, report.created_at);
        assert_eq!(report.created_at, report.updated_at);
        assert_eq!(report.user_role, None);
        assert_eq!(report.school_id, None);
        assert_eq!(report.build_version.as_deref(), Some("2.4.1"));
    }

    #[test]
    fn test_console_snapshot_keeps_most_recent_ten() {
        let report = build_report(ReportDraft::new("T", "D"), context(None));
        assert_eq!(report.console_errors.len(), MAX_CONSOLE_ERRORS);
        assert_eq!(report.console_errors.first().unwrap(), "line 5");
        assert_eq!(report.console_errors.last().unwrap(), "line 14");
    }

    #[test]
    fn test_supplied_console_errors_win_over_snapshot() {
        let draft = ReportDraft::new("T", "D").with_console_errors(vec!["mine".into()]);
        let report = build_report(draft, context(None));
        assert_eq!(report.console_errors, vec!["mine"]);
    }

    #[test]
    fn test_identity_comes_from_caller_and_is_hashed() {
        let caller = CallerIdentity::new(UserRole::Student)
            .with_email("kid@school.org")
            .with_school("lincoln-high");
        let report = build_report(ReportDraft::new("T", "D"), context(Some(caller)));

        assert_eq!(report.user_role, Some(UserRole::Student));
        assert_eq!(report.school_id, Some(hash_school_id("lincoln-high")));
        assert_ne!(report.school_id.as_deref(), Some("lincoln-high"));
        // allow_contact is off, so no email is stored
        assert_eq!(report.contact_email, None);
    }

    #[test]
    fn test_contact_email_falls_back_to_caller() {
        let caller = CallerIdentity::new(UserRole::Teacher).with_email("t@school.org");

        let report = build_report(
            ReportDraft::new("T", "D").with_contact(None),
            context(Some(caller.clone())),
        );
        assert_eq!(report.contact_email.as_deref(), Some("t@school.org"));

        let report = build_report(
            ReportDraft::new("T", "D").with_contact(Some("other@x.org".into())),
            context(Some(caller)),
        );
        assert_eq!(report.contact_email.as_deref(), Some("other@x.org"));
    }

    #[test]
    fn test_blank_title_falls_back() {
        let mut draft = ReportDraft::new("  ", "D");
        draft.error_message = Some("TypeError: roster is null".into());
        let report = build_report(draft, context(None));
        assert_eq!(report.title, "TypeError: roster is null");

        let report = build_report(ReportDraft::automatic("", None), context(None));
        assert_eq!(report.title, UNTITLED_REPORT);
        assert_eq!(report.error_message, None);
        assert_eq!(report.report_type, ReportType::Automatic);
    }

    #[test]
    fn test_blank_optionals_are_dropped() {
        let mut draft = ReportDraft::new("T", "D");
        draft.error_message = Some("   ".into());
        let report = build_report(draft, context(None));
        assert_eq!(report.error_message, None);
        assert!(!report.to_record().unwrap().contains_key("errorMessage"));
    }
}
