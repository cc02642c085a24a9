//! Configuration for report-desk
//!
//! CLI arguments and environment variable handling using clap. The library
//! itself only consumes [`ReportingConfig`]; nothing below `main` reads the
//! environment.

use clap::Parser;

use crate::auth::{parse_role_list, UserRole};
use crate::error::{ReportError, Result};

/// Default collection holding reports
pub const DEFAULT_REPORTS_COLLECTION: &str = "errorReports";

/// Settings consumed by the reporting and triage services
#[derive(Debug, Clone)]
pub struct ReportingConfig {
    /// Feature flag for report submission
    pub enabled: bool,

    /// Successful submissions allowed per session per rolling hour
    pub max_reports_per_hour: u32,

    /// Roles allowed to submit (anonymous visitors are not filtered)
    pub allowed_roles: Vec<UserRole>,

    /// Build identifier stamped onto reports
    pub build_version: Option<String>,

    /// Store collection for reports
    pub collection: String,

    /// Newest-first cap for triage listings
    pub triage_list_limit: usize,

    /// How many recent reports dashboard statistics are computed over
    pub stats_sample_limit: usize,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_reports_per_hour: 5,
            allowed_roles: UserRole::ALL.to_vec(),
            build_version: None,
            collection: DEFAULT_REPORTS_COLLECTION.to_string(),
            triage_list_limit: 100,
            stats_sample_limit: 500,
        }
    }
}

/// report-desk - error report intake and triage
#[derive(Parser, Debug, Clone)]
#[command(name = "report-desk")]
#[command(about = "Error and bug report triage for the school platform")]
pub struct Args {
    /// Enable error/bug report submission
    #[arg(long, env = "ERROR_REPORTING_ENABLED", default_value = "true", action = clap::ArgAction::Set)]
    pub reporting_enabled: bool,

    /// Reports each browsing session may submit per rolling hour
    #[arg(long, env = "MAX_REPORTS_PER_HOUR", default_value = "5")]
    pub max_reports_per_hour: u32,

    /// Comma separated roles allowed to submit reports
    #[arg(
        long,
        env = "ALLOWED_ROLES",
        default_value = "student,guardian,teacher,staff,admin"
    )]
    pub allowed_roles: String,

    /// Build version stamped onto new reports
    #[arg(long, env = "BUILD_VERSION")]
    pub build_version: Option<String>,

    /// Collection holding error reports
    #[arg(long, env = "REPORTS_COLLECTION", default_value = DEFAULT_REPORTS_COLLECTION)]
    pub collection: String,

    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "school")]
    pub mongodb_db: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "LOG_JSON", default_value = "false")]
    pub log_json: bool,
}

impl Args {
    /// Parsed submission allow-list
    pub fn allowed_role_list(&self) -> Result<Vec<UserRole>> {
        parse_role_list(&self.allowed_roles)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_reports_per_hour == 0 {
            return Err(ReportError::Config(
                "MAX_REPORTS_PER_HOUR must be at least 1".to_string(),
            ));
        }

        if self.allowed_role_list()?.is_empty() {
            return Err(ReportError::Config(
                "ALLOWED_ROLES must name at least one role".to_string(),
            ));
        }

        if self.collection.trim().is_empty() {
            return Err(ReportError::Config(
                "REPORTS_COLLECTION must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Service configuration derived from the arguments
    pub fn reporting_config(&self) -> Result<ReportingConfig> {
        self.validate()?;
        Ok(ReportingConfig {
            enabled: self.reporting_enabled,
            max_reports_per_hour: self.max_reports_per_hour,
            allowed_roles: self.allowed_role_list()?,
            build_version: self.build_version.clone().filter(|v| !v.trim().is_empty()),
            collection: self.collection.trim().to_string(),
            ..ReportingConfig::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["report-desk"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = ReportingConfig::default();
        assert!(config.enabled);
        assert_eq!(config.max_reports_per_hour, 5);
        assert_eq!(config.allowed_roles.len(), 5);
        assert_eq!(config.triage_list_limit, 100);
        assert_eq!(config.collection, "errorReports");
    }

    #[test]
    fn test_args_into_config() {
        let args = parse(&[
            "--reporting-enabled",
            "false",
            "--max-reports-per-hour",
            "3",
            "--allowed-roles",
            "teacher,admin",
            "--build-version",
            "1.2.3",
        ]);
        let config = args.reporting_config().unwrap();

        assert!(!config.enabled);
        assert_eq!(config.max_reports_per_hour, 3);
        assert_eq!(config.allowed_roles, vec![UserRole::Teacher, UserRole::Admin]);
        assert_eq!(config.build_version.as_deref(), Some("1.2.3"));
    }

    #[test]
    fn test_validation_failures() {
        assert!(parse(&["--max-reports-per-hour", "0"]).validate().is_err());
        assert!(parse(&["--allowed-roles", " , "]).validate().is_err());
        assert!(parse(&["--allowed-roles", "student,principal"]).validate().is_err());
        assert!(parse(&["--collection", "  "]).validate().is_err());
    }
}
