// vigil/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vigil")]
#[command(about = "Data-readiness gate: decides whether a report can be generated", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🚦 Checks whether a report type is READY, PARTIAL or BLOCKED
    Check {
        /// Report type to check (ex: "monthly_sales")
        report_type: String,

        /// Project directory
        #[arg(long, default_value = ".", env = "VIGIL_PROJECT_DIR")]
        project_dir: PathBuf,

        /// Query these domains instead of the ones declared for the report
        #[arg(long = "domain", short = 'd')]
        domains: Vec<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Also write the JSON verdict to this file (relative to the target path)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Fail on PARTIAL as well as BLOCKED
        #[arg(long)]
        strict: bool,

        /// Evaluate as of this instant (RFC 3339) instead of now
        #[arg(long)]
        as_of: Option<DateTime<Utc>>,
    },

    /// 📋 Lists the registered report types
    List {
        #[arg(long, default_value = ".", env = "VIGIL_PROJECT_DIR")]
        project_dir: PathBuf,
    },

    /// 🧪 Validates every readiness condition without running a check
    Validate {
        #[arg(long, default_value = ".", env = "VIGIL_PROJECT_DIR")]
        project_dir: PathBuf,
    },

    /// 🔍 Shows the metadata collected for a report's tables
    Inspect {
        report_type: String,

        #[arg(long, default_value = ".", env = "VIGIL_PROJECT_DIR")]
        project_dir: PathBuf,

        #[arg(long = "domain", short = 'd')]
        domains: Vec<String>,
    },
}
