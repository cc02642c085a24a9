//! Error types for report-desk

use thiserror::Error;

/// Result type for reporting operations
pub type Result<T> = std::result::Result<T, ReportError>;

/// Reporting error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// Error reporting is switched off
    #[error("Error reporting is disabled")]
    Disabled,

    /// Per-session submission quota exhausted
    #[error("Rate limit exceeded, retry in {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Caller role is not allowed to perform the action
    #[error("Permission denied: role {role} may not {action}")]
    PermissionDenied { role: String, action: String },

    /// Document store call failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ReportError {
    pub fn permission_denied(role: Option<&str>, action: impl Into<String>) -> Self {
        ReportError::PermissionDenied {
            role: role.unwrap_or("anonymous").to_string(),
            action: action.into(),
        }
    }

    /// Whether the caller may try the same call again later
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ReportError::RateLimited { .. } | ReportError::Persistence(_)
        )
    }

    /// Message suitable for showing to the person who triggered the call
    pub fn user_message(&self) -> String {
        match self {
            ReportError::Disabled => "Error reporting is currently disabled.".to_string(),
            ReportError::RateLimited { retry_after_ms } => {
                let minutes = retry_after_ms.div_ceil(60_000).max(1);
                format!(
                    "You have submitted too many reports. Please wait {} minute{} before trying again.",
                    minutes,
                    if minutes == 1 { "" } else { "s" }
                )
            }
            ReportError::PermissionDenied { .. } => {
                "Access denied. You do not have permission to do this.".to_string()
            }
            ReportError::Persistence(_) | ReportError::Config(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        ReportError::Persistence(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(ReportError::RateLimited { retry_after_ms: 1 }.is_retryable());
        assert!(ReportError::Persistence("down".into()).is_retryable());
        assert!(!ReportError::Disabled.is_retryable());
        assert!(!ReportError::permission_denied(Some("student"), "triage reports").is_retryable());
    }

    #[test]
    fn test_rate_limit_message_rounds_up_minutes() {
        let err = ReportError::RateLimited { retry_after_ms: 61_000 };
        assert!(err.user_message().contains("2 minutes"));

        let err = ReportError::RateLimited { retry_after_ms: 0 };
        assert!(err.user_message().contains("1 minute "));
    }

    #[test]
    fn test_anonymous_permission_denied() {
        let err = ReportError::permission_denied(None, "submit reports");
        assert_eq!(
            err.to_string(),
            "Permission denied: role anonymous may not submit reports"
        );
    }
}
