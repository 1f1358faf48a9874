// vigil-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum DomainError {
    #[error("Report type '{0}' has no registered readiness conditions")]
    #[diagnostic(
        code(vigil::domain::unknown_report_type),
        help("Run `vigil list` to see the report types declared in your conditions file.")
    )]
    UnknownReportType(String),

    #[error("Invalid readiness conditions for '{report_type}': {reason}")]
    #[diagnostic(
        code(vigil::domain::invalid_condition),
        help("Every key of `required_columns` must also appear in `required_tables`, which cannot be empty.")
    )]
    InvalidConditionSpec { report_type: String, reason: String },

    #[error("Report type '{report_type}' is declared more than once")]
    #[diagnostic(
        code(vigil::domain::duplicate_report_type),
        help("Report types must be unique across every file of the conditions directory.")
    )]
    DuplicateReportType { report_type: String },

    #[error("Metadata unavailable: {0}")]
    #[diagnostic(
        code(vigil::domain::metadata_unavailable),
        help("No domain answered. Check connectivity to the metadata backends, then retry the check.")
    )]
    MetadataUnavailable(String),
}
