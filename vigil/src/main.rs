// vigil/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // 1. Setup Logging (Tracing)
    // RUST_LOG=vigil_core=debug vigil check monthly_sales to see every domain call.
    // Logs go to stderr so `--format json` output stays parseable.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            report_type,
            project_dir,
            domains,
            format,
            output,
            strict,
            as_of,
        } => {
            commands::check::execute(
                report_type,
                project_dir,
                domains,
                format,
                output,
                strict,
                as_of,
            )
            .await
        }
        Commands::List { project_dir } => commands::list::execute(project_dir),
        Commands::Validate { project_dir } => commands::validate::execute(project_dir),
        Commands::Inspect {
            report_type,
            project_dir,
            domains,
        } => commands::inspect::execute(report_type, project_dir, domains).await,
    };

    // Exit 1 is reserved for a failed gate; errors use 2.
    if let Err(e) = result {
        eprintln!("💥 {:#}", e);
        std::process::exit(2);
    }
}
