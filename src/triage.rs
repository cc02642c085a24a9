//! Report triage for admins and staff
//!
//! Every call re-checks the caller's role and fetches fresh data; nothing
//! is cached between calls.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::{can_triage, AuthProvider, CallerIdentity};
use crate::clock::Clock;
use crate::config::ReportingConfig;
use crate::error::{ReportError, Result};
use crate::report::{ErrorReport, ReportStatus, ReportType, Severity};
use crate::store::{DocumentStore, FieldFilter, OrderedQuery, Record};

/// Counts shown on the developer dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportStats {
    pub total: usize,
    pub by_status: BTreeMap<ReportStatus, usize>,
    pub by_severity: BTreeMap<Severity, usize>,
    pub by_type: BTreeMap<ReportType, usize>,
    /// Open or in-progress reports at high or critical severity
    pub urgent_open: usize,
}

impl ReportStats {
    pub fn from_reports(reports: &[ErrorReport]) -> Self {
        let mut stats = ReportStats {
            total: reports.len(),
            ..Default::default()
        };
        for report in reports {
            *stats.by_status.entry(report.status).or_default() += 1;
            *stats.by_severity.entry(report.severity).or_default() += 1;
            *stats.by_type.entry(report.report_type).or_default() += 1;

            let active = matches!(report.status, ReportStatus::Open | ReportStatus::InProgress);
            let urgent = report.severity >= Severity::High;
            if active && urgent {
                stats.urgent_open += 1;
            }
        }
        stats
    }
}

/// Role-gated listing and status changes
pub struct TriageService {
    store: Arc<dyn DocumentStore>,
    auth: Arc<dyn AuthProvider>,
    clock: Arc<dyn Clock>,
    collection: String,
    list_limit: usize,
    stats_limit: usize,
}

impl TriageService {
    pub fn new(
        config: &ReportingConfig,
        store: Arc<dyn DocumentStore>,
        auth: Arc<dyn AuthProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            auth,
            clock,
            collection: config.collection.clone(),
            list_limit: config.triage_list_limit,
            stats_limit: config.stats_sample_limit,
        }
    }

    /// Newest reports first, capped at the list limit
    pub async fn get_all_reports(&self) -> Result<Vec<ErrorReport>> {
        self.authorize("list reports")?;
        self.fetch(OrderedQuery::newest_first("timestamp", self.list_limit))
            .await
    }

    /// Newest reports with the given status
    pub async fn get_reports_by_status(&self, status: ReportStatus) -> Result<Vec<ErrorReport>> {
        self.authorize("list reports")?;
        self.fetch(
            OrderedQuery::newest_first("timestamp", self.list_limit)
                .with_filter(FieldFilter::eq("status", status.as_str())),
        )
        .await
    }

    /// Change a report's status.
    ///
    /// Moving to `resolved` also stamps `resolvedAt` and `resolvedBy`.
    /// Leaving `resolved` does not clear them.
    pub async fn update_report_status(
        &self,
        report_id: &str,
        status: ReportStatus,
        resolved_by: Option<&str>,
    ) -> Result<()> {
        let caller = self.authorize("update report status")?;
        let now = self.clock.now();

        let mut changes = Record::new();
        changes.insert("status".into(), serde_json::to_value(status)?);
        changes.insert("updatedAt".into(), now.timestamp_millis().into());

        if status == ReportStatus::Resolved {
            changes.insert("resolvedAt".into(), now.timestamp_millis().into());
            let resolver = resolved_by
                .map(str::to_string)
                .filter(|r| !r.trim().is_empty())
                .or(caller.email);
            if let Some(resolver) = resolver {
                changes.insert("resolvedBy".into(), resolver.into());
            }
        }

        self.store
            .update(&self.collection, report_id, changes)
            .await?;

        info!(report_id, status = %status, "Report status updated");
        Ok(())
    }

    /// Dashboard statistics over the most recent reports
    pub async fn report_stats(&self) -> Result<ReportStats> {
        self.authorize("view report statistics")?;
        let reports = self
            .fetch(OrderedQuery::newest_first("timestamp", self.stats_limit))
            .await?;
        Ok(ReportStats::from_reports(&reports))
    }

    fn authorize(&self, action: &str) -> Result<CallerIdentity> {
        let caller = self.auth.current_caller();
        let role = caller.as_ref().and_then(|c| c.role);
        if !can_triage(role) {
            warn!(role = ?role, action, "Triage access denied");
            return Err(ReportError::permission_denied(role.map(|r| r.as_str()), action));
        }
        Ok(caller.unwrap_or_default())
    }

    async fn fetch(&self, query: OrderedQuery) -> Result<Vec<ErrorReport>> {
        let records = self.store.query_ordered(&self.collection, query).await?;

        let reports = records
            .into_iter()
            .filter_map(|record| match ErrorReport::from_record(record) {
                Ok(report) => Some(report),
                Err(e) => {
                    warn!("Skipping unreadable report: {}", e);
                    None
                }
            })
            .collect();
        Ok(reports)
    }
}
