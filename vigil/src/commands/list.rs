// vigil/src/commands/list.rs

use comfy_table::{Table, presets::UTF8_FULL};
use std::path::PathBuf;

use super::project::Project;

pub fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    let project = Project::load(&project_dir)?;
    let specs = project.registry.specs();

    println!(
        "📋 {} report type(s) in '{}' v{}",
        specs.len(),
        project.config.name,
        project.config.version
    );

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Report type", "Description", "Tables", "Domains"]);
    for spec in &specs {
        let domains = if spec.domains.is_empty() {
            "(all)".to_string()
        } else {
            spec.domains.join(", ")
        };
        table.add_row(vec![
            spec.report_type.clone(),
            spec.description.clone(),
            spec.required_tables.join(", "),
            domains,
        ]);
    }
    println!("{table}");

    if !project.rejected.is_empty() {
        eprintln!(
            "\n⚠️  {} report type(s) skipped because their conditions are invalid. Run 'vigil validate' for details.",
            project.rejected.len()
        );
    }
    Ok(())
}
