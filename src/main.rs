//! report-desk - developer dashboard for submitted error and bug reports

use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{error, info};

use report_desk::{
    auth::{CallerIdentity, StaticAuthProvider, UserRole},
    config::Args,
    logging::init_tracing,
    store::{display_host, MongoDocumentStore},
    ReportStatus, SystemClock, TriageService,
};

#[derive(Parser, Debug)]
#[command(name = "report-desk", version)]
struct Cli {
    #[command(flatten)]
    args: Args,

    /// Role the operator acts as (triage needs staff or admin)
    #[arg(long, env = "OPERATOR_ROLE", default_value = "admin")]
    role: String,

    /// Operator email, used as the resolver when none is given
    #[arg(long, env = "OPERATOR_EMAIL")]
    email: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the newest reports
    List {
        /// Only reports with this status (open, in-progress, resolved, rejected)
        #[arg(long)]
        status: Option<String>,
    },
    /// Show dashboard counts
    Stats,
    /// Change a report's status
    SetStatus {
        id: String,
        status: String,
        /// Who resolved the report
        #[arg(long)]
        resolved_by: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(&cli.args.log_level, cli.args.log_json);

    let config = match cli.args.reporting_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let role = UserRole::from_str(&cli.role)
        .ok_or_else(|| anyhow::anyhow!("Unknown operator role '{}'", cli.role))?;
    let mut operator = CallerIdentity::new(role);
    operator.email = cli.email.clone();

    info!("MongoDB: {} / {}", display_host(&cli.args.mongodb_uri), cli.args.mongodb_db);
    info!("Collection: {}", config.collection);

    let store = MongoDocumentStore::connect(&cli.args.mongodb_uri, &cli.args.mongodb_db).await?;
    let triage = TriageService::new(
        &config,
        Arc::new(store),
        Arc::new(StaticAuthProvider::new(operator)),
        Arc::new(SystemClock),
    );

    match cli.command {
        Command::List { status } => {
            let reports = match status {
                Some(raw) => triage.get_reports_by_status(parse_status(&raw)?).await?,
                None => triage.get_all_reports().await?,
            };
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        Command::Stats => {
            let stats = triage.report_stats().await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Command::SetStatus {
            id,
            status,
            resolved_by,
        } => {
            let status = parse_status(&status)?;
            triage
                .update_report_status(&id, status, resolved_by.as_deref())
                .await?;
            println!("{} -> {}", id, status);
        }
    }

    Ok(())
}

fn parse_status(raw: &str) -> anyhow::Result<ReportStatus> {
    ReportStatus::from_str(raw).ok_or_else(|| anyhow::anyhow!("Unknown status '{}'", raw))
}
