// vigil/src/commands/validate.rs
//
// USE CASE: Pre-flight check of the conditions file (CI on config changes).

use std::path::PathBuf;

use super::project::Project;

pub fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    println!("🧪 Validating readiness conditions...");
    let project = Project::load(&project_dir)?;

    for (domain, reason) in project.router(None).broken_domains() {
        eprintln!("   ⚠️  Domain '{}' is unavailable: {}", domain, reason);
    }

    let valid = project.registry.report_types();
    for report_type in &valid {
        println!("   ✅ {}", report_type);
    }

    if project.rejected.is_empty() {
        println!("\n✨ {} report type(s) valid.", valid.len());
        return Ok(());
    }

    for rejection in &project.rejected {
        eprintln!("{:?}", miette::Report::new(rejection.clone()));
    }
    eprintln!(
        "\n❌ {} invalid report type(s), {} valid.",
        project.rejected.len(),
        valid.len()
    );
    std::process::exit(1);
}
