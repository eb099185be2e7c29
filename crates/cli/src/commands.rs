//! CLI commands

use std::path::Path;

use chrono::{DateTime, Utc};
use ledgerguard_audit::{write_export, AuditFilter, AuditLogEntry, AuditRequest, Metadata};
use ledgerguard_compliance::{
    ComplianceReport, IntegrityStatus, IntegrityVerificationResult, ReportType, WindowAnchor,
};
use ledgerguard_core::EntityKind;
use ledgerguard_lifecycle::{is_terminal, validate_transition};

use crate::context::AppContext;

/// Check a status change against the entity's lifecycle
pub fn check_transition(kind: EntityKind, from: &str, to: &str) -> Result<(), anyhow::Error> {
    validate_transition(kind, from, to)?;

    let terminal = is_terminal(kind, to).unwrap_or(false);
    println!(
        "✅ {} {} → {} allowed{}",
        kind.label(),
        from,
        to,
        if terminal { " (terminal)" } else { "" }
    );
    Ok(())
}

/// Parse `key=value` pairs into entry metadata
pub fn parse_metadata(pairs: &[String]) -> Result<Metadata, anyhow::Error> {
    let mut metadata = Metadata::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("metadata must be key=value, got '{}'", pair))?;
        if key.is_empty() {
            anyhow::bail!("metadata key is empty in '{}'", pair);
        }
        metadata.insert(key.to_string(), value.into());
    }
    Ok(metadata)
}

/// Append one entry to the audit trail
pub async fn log(ctx: &AppContext, request: AuditRequest) -> Result<AuditLogEntry, anyhow::Error> {
    let entry = ctx.writer.log(request).await?;

    println!(
        "✅ Logged {} by {} (id: {}, hash: {})",
        entry.action, entry.user_id, entry.id, entry.current_hash
    );
    Ok(entry)
}

/// Verify the chain over a period
pub async fn verify(
    ctx: &AppContext,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    anchor: Option<WindowAnchor>,
) -> Result<IntegrityVerificationResult, anyhow::Error> {
    let verifier = ctx.verifier();
    let result = match anchor {
        Some(anchor) => verifier.verify_range(start, end, &anchor).await?,
        None => verifier.verify_integrity(start, end).await?,
    };

    match result.status {
        IntegrityStatus::Verified => {
            println!("✅ Hash chain verified ({} entries)", result.total_logs);
        }
        IntegrityStatus::ChainBroken => {
            println!(
                "❌ Hash chain broken: {} broken link(s) in {} entries",
                result.broken_links.len(),
                result.total_logs
            );
        }
        IntegrityStatus::Compromised => {
            println!(
                "❌ Audit trail compromised: {} tampered, {} broken link(s) in {} entries",
                result.tampered_logs.len(),
                result.broken_links.len(),
                result.total_logs
            );
        }
    }
    for id in &result.tampered_logs {
        println!("   tampered: {}", id);
    }
    for id in &result.broken_links {
        println!("   broken link: {}", id);
    }

    Ok(result)
}

/// Generate a compliance report, printing it or writing it to `output`
pub async fn report(
    ctx: &AppContext,
    report_type: ReportType,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    output: Option<&Path>,
) -> Result<ComplianceReport, anyhow::Error> {
    let report = ctx
        .report_generator()
        .generate_compliance_report(report_type, start, end)
        .await?;
    let json = serde_json::to_string_pretty(&report)?;

    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            println!("✅ {} report written to {}", report_type, path.display());
        }
        None => println!("{}", json),
    }
    Ok(report)
}

/// Export matching entries as an indented JSON array
pub async fn export(
    ctx: &AppContext,
    filter: AuditFilter,
    output: Option<&Path>,
) -> Result<(), anyhow::Error> {
    match output {
        Some(path) => {
            let entries = ctx.writer.collect_audit_logs(filter).await?;
            write_export(path, &entries)?;
            println!("✅ Exported {} entries to {}", entries.len(), path.display());
        }
        None => println!("{}", ctx.writer.export_audit_logs(filter).await?),
    }
    Ok(())
}

/// Show the current chain head
pub async fn head(ctx: &AppContext) -> Result<String, anyhow::Error> {
    let head = ctx.writer.chain_head().await;
    let total = ctx.writer.get_audit_logs(AuditFilter::all().page(1, 0)).await?.total;

    if head.is_empty() {
        println!("Chain head: <genesis> ({} entries)", total);
    } else {
        println!("Chain head: {} ({} entries)", head, total);
    }
    Ok(head)
}
