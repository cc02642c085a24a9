//! Report submission pipeline
//!
//! Gate checks (feature flag, per-session quota, role allow-list), then
//! normalize, persist, and only after a successful write record the
//! submission in the session's rate-limit ledger.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::auth::{is_role_allowed, AuthProvider};
use crate::clock::Clock;
use crate::config::ReportingConfig;
use crate::environment::EnvironmentSnapshotProvider;
use crate::error::{ReportError, Result};
use crate::report::{build_report, BugReportForm, ReportContext, ReportDraft};
use crate::session::{RateLimiter, SessionContext};
use crate::store::DocumentStore;

/// Submits error and bug reports for one browsing session
pub struct ReportingService {
    config: ReportingConfig,
    store: Arc<dyn DocumentStore>,
    auth: Arc<dyn AuthProvider>,
    session: SessionContext,
    rate_limiter: RateLimiter,
    clock: Arc<dyn Clock>,
}

impl ReportingService {
    /// The rate-limit ledger lives in the session's own storage
    pub fn new(
        config: ReportingConfig,
        store: Arc<dyn DocumentStore>,
        auth: Arc<dyn AuthProvider>,
        session: SessionContext,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let rate_limiter = RateLimiter::new(session.storage().clone(), clock.clone());
        Self {
            config,
            store,
            auth,
            session,
            rate_limiter,
            clock,
        }
    }

    pub fn session_id(&self) -> String {
        self.session.session_id()
    }

    /// Submit a report and return the new report ID
    pub async fn submit_error_report(
        &self,
        draft: ReportDraft,
        env: &dyn EnvironmentSnapshotProvider,
    ) -> Result<String> {
        if !self.config.enabled {
            debug!("Report rejected: reporting disabled");
            return Err(ReportError::Disabled);
        }

        let session_id = self.session.session_id();
        let _session_guard = self.rate_limiter.lock_session(&session_id).await;

        let quota = self.config.max_reports_per_hour;
        if !self.rate_limiter.check(&session_id, quota) {
            let retry_after_ms = self.rate_limiter.retry_after_ms(&session_id, quota);
            warn!(session_id = %session_id, retry_after_ms, "Report rejected: rate limit exceeded");
            return Err(ReportError::RateLimited { retry_after_ms });
        }

        let caller = self.auth.current_caller();
        let role = caller.as_ref().and_then(|c| c.role);
        if !is_role_allowed(role, &self.config.allowed_roles) {
            warn!(session_id = %session_id, role = ?role, "Report rejected: role not allowed");
            return Err(ReportError::permission_denied(
                role.map(|r| r.as_str()),
                "submit reports",
            ));
        }

        let report = build_report(
            draft,
            ReportContext {
                caller,
                environment: env.snapshot(),
                console_snapshot: env.recent_diagnostics(),
                session_id: session_id.clone(),
                build_version: self.config.build_version.clone(),
                now: self.clock.now(),
            },
        );
        let report_type = report.report_type;
        let severity = report.severity;

        let id = self
            .store
            .create(&self.config.collection, report.to_record()?)
            .await?;

        self.rate_limiter.record(&session_id);

        info!(
            report_id = %id,
            session_id = %session_id,
            report_type = %report_type,
            severity = %severity,
            "Report submitted"
        );
        Ok(id)
    }

    /// Submit a bug report filed through the form
    pub async fn submit_bug_report(
        &self,
        form: BugReportForm,
        console_errors: Option<Vec<String>>,
        stack_trace: Option<String>,
        env: &dyn EnvironmentSnapshotProvider,
    ) -> Result<String> {
        let draft = form.into_draft(console_errors, stack_trace);
        self.submit_error_report(draft, env).await
    }
}
