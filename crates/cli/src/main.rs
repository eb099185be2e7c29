//! LedgerGuard CLI - Main entry point

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use ledgerguard_audit::{AuditFilter, AuditRequest, RequestOrigin};
use ledgerguard_cli::{commands, AppContext, LedgerGuardConfig};
use ledgerguard_compliance::{ReportType, WindowAnchor};
use ledgerguard_core::{AuditAction, EntityKind};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ledgerguard")]
#[command(about = "LedgerGuard - Hash-chained audit trail and compliance tooling", long_about = None)]
struct Cli {
    /// Data directory path
    #[arg(short, long, default_value = "./data")]
    data: PathBuf,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a status change is allowed
    CheckTransition {
        /// Entity kind (deposit, withdrawal, card_transaction)
        kind: EntityKind,
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },

    /// Append an entry to the audit trail
    Log {
        /// Acting user ID
        user: String,
        /// Action (e.g. login, data_export)
        action: AuditAction,
        /// Resource family
        resource: String,
        #[arg(long)]
        resource_id: Option<String>,
        #[arg(long, default_value = "")]
        ip: String,
        #[arg(long, default_value = "")]
        user_agent: String,
        /// Metadata as key=value (repeatable)
        #[arg(long = "meta")]
        meta: Vec<String>,
    },

    /// Verify the hash chain over a period
    Verify {
        #[command(flatten)]
        period: Period,
        /// First-entry link check
        #[arg(long, value_enum)]
        anchor: Option<AnchorArg>,
        /// Expected previous hash of the first entry (overrides --anchor)
        #[arg(long)]
        checkpoint: Option<String>,
    },

    /// Generate a compliance report
    Report {
        /// soc2, pci_dss, gdpr or internal
        #[arg(long, default_value = "internal")]
        report_type: ReportType,
        #[command(flatten)]
        period: Period,
        /// Write to file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Export entries as a JSON array
    Export {
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        action: Option<AuditAction>,
        #[command(flatten)]
        period: Period,
        #[arg(long, default_value = "0")]
        limit: usize,
        #[arg(long, default_value = "0")]
        offset: usize,
        /// Write to file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Show the chain head
    Head,
}

#[derive(clap::Args)]
struct Period {
    /// Period start (RFC3339); defaults to the beginning of time
    #[arg(long)]
    from: Option<DateTime<Utc>>,
    /// Period end (RFC3339); defaults to now
    #[arg(long)]
    to: Option<DateTime<Utc>>,
}

impl Period {
    fn bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            self.from.unwrap_or(DateTime::<Utc>::MIN_UTC),
            self.to.unwrap_or_else(Utc::now),
        )
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum AnchorArg {
    ChainOrigin,
    Unanchored,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    // Pure policy check, no data directory needed
    if let Commands::CheckTransition { kind, from, to } = &cli.command {
        return commands::check_transition(*kind, from, to);
    }

    let config = match &cli.config {
        Some(path) => LedgerGuardConfig::from_file(path)?,
        None => LedgerGuardConfig::default(),
    };
    let ctx = AppContext::new(&cli.data, config).await?;

    match cli.command {
        Commands::CheckTransition { .. } => {}

        Commands::Log {
            user,
            action,
            resource,
            resource_id,
            ip,
            user_agent,
            meta,
        } => {
            let mut request = AuditRequest::new(user, action, resource)
                .with_origin(RequestOrigin::new(ip, user_agent))
                .with_metadata(commands::parse_metadata(&meta)?);
            request.resource_id = resource_id;
            commands::log(&ctx, request).await?;
        }

        Commands::Verify {
            period,
            anchor,
            checkpoint,
        } => {
            let (start, end) = period.bounds();
            let anchor = match (checkpoint, anchor) {
                (Some(hash), _) => Some(WindowAnchor::Checkpoint(hash)),
                (None, Some(AnchorArg::ChainOrigin)) => Some(WindowAnchor::ChainOrigin),
                (None, Some(AnchorArg::Unanchored)) => Some(WindowAnchor::Unanchored),
                (None, None) => None,
            };
            commands::verify(&ctx, start, end, anchor).await?;
        }

        Commands::Report {
            report_type,
            period,
            output,
        } => {
            let (start, end) = period.bounds();
            commands::report(&ctx, report_type, start, end, output.as_deref()).await?;
        }

        Commands::Export {
            user,
            action,
            period,
            limit,
            offset,
            output,
        } => {
            let (start, end) = period.bounds();
            let filter = AuditFilter {
                user_id: user,
                action,
                start_date: Some(start),
                end_date: Some(end),
                limit,
                offset,
            };
            commands::export(&ctx, filter, output.as_deref()).await?;
        }

        Commands::Head => {
            commands::head(&ctx).await?;
        }
    }

    Ok(())
}
