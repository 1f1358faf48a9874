// vigil/src/commands/check.rs
//
// USE CASE: Gate a report on data readiness (CI/CD or scheduler step).

use anyhow::Context;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

use vigil_core::domain::verdict::{GateStatus, Verdict};
use vigil_core::infrastructure::fs::atomic_write;

use super::project::Project;
use crate::cli::OutputFormat;

pub async fn execute(
    report_type: String,
    project_dir: PathBuf,
    domains: Vec<String>,
    format: OutputFormat,
    output: Option<PathBuf>,
    strict: bool,
    as_of: Option<DateTime<Utc>>,
) -> anyhow::Result<()> {
    let project = Project::load(&project_dir)?;
    if let Some(rejection) = project.rejection_for(&report_type) {
        return Err(rejection.clone().into());
    }

    let orchestrator = project.orchestrator(as_of)?;
    let domains_override = (!domains.is_empty()).then_some(domains.as_slice());
    let verdict = orchestrator
        .check_readiness_at(&report_type, domains_override, as_of.unwrap_or_else(Utc::now))
        .await?;

    let json = serde_json::to_string_pretty(&verdict)?;
    if let Some(path) = &output {
        let path = project.output_path(path);
        atomic_write(&path, format!("{}\n", json))
            .with_context(|| format!("Cannot write verdict to '{}'", path.display()))?;
    }

    match format {
        OutputFormat::Json => println!("{}", json),
        OutputFormat::Text => print_text(&verdict),
    }

    if !verdict.status.allows_generation(strict) {
        std::process::exit(1);
    }
    Ok(())
}

fn print_text(verdict: &Verdict) {
    let icon = match verdict.status {
        GateStatus::Ready => "✅",
        GateStatus::Partial => "⚠️ ",
        GateStatus::Blocked => "⛔",
    };
    println!("{} {}: {}", icon, verdict.report_type, verdict.status);

    for finding in &verdict.missing {
        println!("   ❌ {}", finding.clause());
    }
    for finding in &verdict.warnings {
        println!("   ⚠️  {}", finding.clause());
    }
    if let Some(message) = &verdict.message {
        println!("\n{}", message);
    }
}
