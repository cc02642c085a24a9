//! Bug report form

use super::model::{ReportType, Severity};
use super::normalize::ReportDraft;

/// What a person fills in on the bug report form
#[derive(Debug, Clone, Default)]
pub struct BugReportForm {
    pub title: String,
    pub description: String,
    pub steps_to_reproduce: Vec<String>,
    pub expected_behavior: Option<String>,
    pub actual_behavior: Option<String>,
    pub severity: Option<Severity>,
    pub contact_email: Option<String>,
    pub allow_contact: bool,
}

impl BugReportForm {
    /// Fold the structured sections into one description and produce a
    /// manual report draft.
    pub fn into_draft(self, console_errors: Option<Vec<String>>, stack_trace: Option<String>) -> ReportDraft {
        let description = compose_description(
            &self.description,
            &self.steps_to_reproduce,
            self.expected_behavior.as_deref(),
            self.actual_behavior.as_deref(),
        );

        ReportDraft {
            title: self.title,
            description,
            report_type: Some(ReportType::Manual),
            severity: self.severity,
            error_message: None,
            stack_trace,
            console_errors,
            contact_email: self.contact_email,
            allow_contact: self.allow_contact,
        }
    }
}

/// Description text with numbered reproduction steps and the
/// expected/actual sections. Empty sections are skipped.
pub fn compose_description(
    description: &str,
    steps: &[String],
    expected: Option<&str>,
    actual: Option<&str>,
) -> String {
    let mut sections = Vec::new();

    let description = description.trim();
    if !description.is_empty() {
        sections.push(description.to_string());
    }

    let steps: Vec<&str> = steps
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if !steps.is_empty() {
        let numbered: Vec<String> = steps
            .iter()
            .enumerate()
            .map(|(i, step)| format!("{}. {}", i + 1, step))
            .collect();
        sections.push(format!("Steps to Reproduce:\n{}", numbered.join("\n")));
    }

    if let Some(expected) = expected.map(str::trim).filter(|s| !s.is_empty()) {
        sections.push(format!("Expected Behavior:\n{}", expected));
    }
    if let Some(actual) = actual.map(str::trim).filter(|s| !s.is_empty()) {
        sections.push(format!("Actual Behavior:\n{}", actual));
    }

    sections.join("\n\n")
}
