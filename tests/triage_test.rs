//! Triage integration tests
//!
//! Reports are created through the submission pipeline and then listed,
//! counted and moved between statuses by staff/admin callers.

use chrono::Duration;
use std::sync::Arc;

use report_desk::{
    auth::{AnonymousAuth, CallerIdentity, StaticAuthProvider, UserRole},
    environment::{EnvironmentSnapshot, PageEnvironment},
    report::{ReportStatus, ReportType, Severity},
    Clock, InMemoryDocumentStore, ManualClock, MemorySessionStorage, ReportDraft, ReportError,
    ReportingConfig, ReportingService, SessionContext, TriageService,
};

struct Desk {
    store: Arc<InMemoryDocumentStore>,
    clock: Arc<ManualClock>,
    config: ReportingConfig,
}

impl Desk {
    fn new() -> Self {
        Self {
            store: Arc::new(InMemoryDocumentStore::new()),
            clock: Arc::new(ManualClock::starting_now()),
            config: ReportingConfig {
                max_reports_per_hour: 1_000,
                ..Default::default()
            },
        }
    }

    fn reporter(&self) -> ReportingService {
        ReportingService::new(
            self.config.clone(),
            self.store.clone(),
            Arc::new(AnonymousAuth),
            SessionContext::new(Arc::new(MemorySessionStorage::new())),
            self.clock.clone(),
        )
    }

    fn triage(&self, caller: CallerIdentity) -> TriageService {
        TriageService::new(
            &self.config,
            self.store.clone(),
            Arc::new(StaticAuthProvider::new(caller)),
            self.clock.clone(),
        )
    }

    async fn submit(&self, draft: ReportDraft) -> String {
        let env = PageEnvironment::new(EnvironmentSnapshot::new("agent", "https://school.app/", 800, 600));
        let id = self.reporter().submit_error_report(draft, &env).await.unwrap();
        // Keep timestamps distinct so newest-first ordering is observable
        self.clock.advance(Duration::seconds(1));
        id
    }
}

#[tokio::test]
async fn test_resolve_then_reopen_keeps_resolution_fields() {
    let desk = Desk::new();
    let id = desk.submit(ReportDraft::new("Gradebook crash", "")).await;
    let admin = desk.triage(CallerIdentity::new(UserRole::Admin));

    let resolved_at = desk.clock.now();
    admin
        .update_report_status(&id, ReportStatus::Resolved, Some("Jane"))
        .await
        .unwrap();

    let report = admin.get_all_reports().await.unwrap().remove(0);
    assert_eq!(report.status, ReportStatus::Resolved);
    assert_eq!(report.resolved_by.as_deref(), Some("Jane"));
    assert_eq!(
        report.resolved_at.map(|t| t.timestamp_millis()),
        Some(resolved_at.timestamp_millis())
    );
    assert_eq!(report.updated_at.timestamp_millis(), resolved_at.timestamp_millis());

    desk.clock.advance(Duration::minutes(5));
    let reopened_at = desk.clock.now();
    admin
        .update_report_status(&id, ReportStatus::Open, None)
        .await
        .unwrap();

    let report = admin.get_all_reports().await.unwrap().remove(0);
    assert_eq!(report.status, ReportStatus::Open);
    assert_eq!(report.updated_at.timestamp_millis(), reopened_at.timestamp_millis());
    // Leaving `resolved` does not reset the historical resolution fields
    assert_eq!(report.resolved_by.as_deref(), Some("Jane"));
    assert_eq!(
        report.resolved_at.map(|t| t.timestamp_millis()),
        Some(resolved_at.timestamp_millis())
    );
}

#[tokio::test]
async fn test_non_resolved_transition_sets_no_resolution_fields() {
    let desk = Desk::new();
    let id = desk.submit(ReportDraft::new("Slow login", "")).await;
    let staff = desk.triage(CallerIdentity::new(UserRole::Staff));

    staff
        .update_report_status(&id, ReportStatus::InProgress, Some("Ignored"))
        .await
        .unwrap();

    let report = staff.get_all_reports().await.unwrap().remove(0);
    assert_eq!(report.status, ReportStatus::InProgress);
    assert_eq!(report.resolved_by, None);
    assert_eq!(report.resolved_at, None);
}

#[tokio::test]
async fn test_resolver_defaults_to_operator_email() {
    let desk = Desk::new();
    let id = desk.submit(ReportDraft::new("Typo", "")).await;
    let admin = desk.triage(CallerIdentity::new(UserRole::Admin).with_email("ops@school.org"));

    admin
        .update_report_status(&id, ReportStatus::Resolved, None)
        .await
        .unwrap();

    let report = admin.get_all_reports().await.unwrap().remove(0);
    assert_eq!(report.resolved_by.as_deref(), Some("ops@school.org"));
}

#[tokio::test]
async fn test_list_is_newest_first_and_capped() {
    let desk = Desk::new();
    for i in 0..105 {
        desk.submit(ReportDraft::new(format!("Report {}", i), "")).await;
    }
    let admin = desk.triage(CallerIdentity::new(UserRole::Admin));

    let reports = admin.get_all_reports().await.unwrap();
    assert_eq!(reports.len(), 100);
    assert_eq!(reports[0].title, "Report 104");
    assert_eq!(reports[99].title, "Report 5");
    assert!(reports.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
}

#[tokio::test]
async fn test_filter_by_status_and_stats() {
    let desk = Desk::new();
    let crash = desk
        .submit(ReportDraft::automatic("TypeError: x is undefined", None))
        .await;
    desk.submit(ReportDraft::new("Colour contrast", "").with_severity(Severity::Low))
        .await;
    let outage = desk
        .submit(ReportDraft::new("Cannot sign in", "").with_severity(Severity::Critical))
        .await;

    let admin = desk.triage(CallerIdentity::new(UserRole::Admin));
    admin
        .update_report_status(&outage, ReportStatus::Resolved, Some("Sam"))
        .await
        .unwrap();

    let open = admin.get_reports_by_status(ReportStatus::Open).await.unwrap();
    assert_eq!(open.len(), 2);
    assert!(open.iter().any(|r| r.id.as_deref() == Some(crash.as_str())));

    let stats = admin.report_stats().await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.by_status[&ReportStatus::Open], 2);
    assert_eq!(stats.by_status[&ReportStatus::Resolved], 1);
    assert_eq!(stats.by_type[&ReportType::Automatic], 1);
    assert_eq!(stats.by_type[&ReportType::Manual], 2);
    assert_eq!(stats.by_severity[&Severity::Low], 1);
    // Only the open automatic crash (high) counts; the critical one is resolved
    assert_eq!(stats.urgent_open, 1);
}

#[tokio::test]
async fn test_teacher_cannot_triage() {
    let desk = Desk::new();
    let id = desk.submit(ReportDraft::new("Anything", "")).await;
    let teacher = desk.triage(CallerIdentity::new(UserRole::Teacher));

    assert!(matches!(
        teacher.get_all_reports().await,
        Err(ReportError::PermissionDenied { .. })
    ));
    assert!(matches!(
        teacher.update_report_status(&id, ReportStatus::Rejected, None).await,
        Err(ReportError::PermissionDenied { .. })
    ));
}
