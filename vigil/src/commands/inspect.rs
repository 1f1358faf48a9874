// vigil/src/commands/inspect.rs
//
// USE CASE: Show what the backends report for a report's tables, without
// passing judgement.

use chrono::Utc;
use comfy_table::{Table, presets::UTF8_FULL};
use std::path::PathBuf;

use vigil_core::domain::metadata::{MetadataSummary, SUMMARY_FRESHNESS_DAYS, TableState};

use super::project::Project;

pub async fn execute(
    report_type: String,
    project_dir: PathBuf,
    domains: Vec<String>,
) -> anyhow::Result<()> {
    let project = Project::load(&project_dir)?;
    if let Some(rejection) = project.rejection_for(&report_type) {
        return Err(rejection.clone().into());
    }

    let orchestrator = project.orchestrator(None)?;
    let domains_override = (!domains.is_empty()).then_some(domains.as_slice());
    let (spec, outcome) = orchestrator.collect(&report_type, domains_override).await?;

    println!("\n🔍 Inspecting '{}' ({})", spec.report_type, spec.description);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Table", "Status", "Rows", "Last updated", "Columns / error"]);
    for name in &spec.required_tables {
        let row = match outcome.metadata.get(name).map(|m| &m.state) {
            Some(TableState::Present(stats)) => vec![
                name.clone(),
                "present".to_string(),
                stats.row_count.to_string(),
                stats
                    .last_updated
                    .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
                    .unwrap_or_else(|| "-".to_string()),
                stats.columns.iter().cloned().collect::<Vec<_>>().join(", "),
            ],
            Some(TableState::Absent) => vec![
                name.clone(),
                "absent".to_string(),
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
            ],
            Some(TableState::Unknown { error }) => vec![
                name.clone(),
                "unknown".to_string(),
                "-".to_string(),
                "-".to_string(),
                error.clone(),
            ],
            None => vec![
                name.clone(),
                "unknown".to_string(),
                "-".to_string(),
                "-".to_string(),
                "no metadata was collected".to_string(),
            ],
        };
        table.add_row(row);
    }
    println!("{table}");

    let summary = MetadataSummary::from_metadata(&outcome.metadata, Utc::now());
    println!("📊 Metadata Summary:");
    println!(
        "   Tables: {} ({} present, {} absent, {} unknown)",
        summary.total_tables, summary.present_tables, summary.absent_tables, summary.unknown_tables
    );
    println!(
        "   Rows: {} total, {:.2} per table, {} with data, {} empty",
        summary.total_rows,
        summary.average_rows_per_table,
        summary.tables_with_data,
        summary.empty_tables
    );
    if let Some(oldest) = summary.oldest_update {
        println!("   Oldest update: {}", oldest.format("%Y-%m-%d %H:%M UTC"));
    }
    println!(
        "   Freshness: {}",
        if summary.freshness_ok {
            format!("ok (everything updated within {} days)", SUMMARY_FRESHNESS_DAYS)
        } else {
            format!("stale (something is older than {} days)", SUMMARY_FRESHNESS_DAYS)
        }
    );

    for failure in &outcome.failed_domains {
        eprintln!("   ⚠️  {}", failure.reason);
    }
    Ok(())
}
