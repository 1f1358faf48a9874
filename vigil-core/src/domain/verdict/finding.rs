// vigil-core/src/domain/verdict/finding.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::GateStatus;

/// One reason contributing to a non-READY verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub table: String,
    #[serde(flatten)]
    pub kind: FindingKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum FindingKind {
    // --- Hard gate ---
    TableAbsent,
    TableUnknown {
        reason: String,
    },
    ColumnsMissing {
        columns: Vec<String>,
    },

    // --- Soft gate ---
    InsufficientRows {
        rows: u64,
        min_rows: u64,
    },
    Stale {
        last_updated: DateTime<Utc>,
        /// Rounded up to whole days.
        age_days: i64,
        freshness_days: u32,
    },
    PeriodMismatch {
        expected: String,
        actual: String,
    },
}

impl FindingKind {
    /// The status this finding alone would impose on a verdict.
    pub fn severity(&self) -> GateStatus {
        match self {
            Self::TableAbsent | Self::TableUnknown { .. } | Self::ColumnsMissing { .. } => {
                GateStatus::Blocked
            }
            Self::InsufficientRows { .. } | Self::Stale { .. } | Self::PeriodMismatch { .. } => {
                GateStatus::Partial
            }
        }
    }

    pub fn is_hard(&self) -> bool {
        self.severity() == GateStatus::Blocked
    }
}

impl Finding {
    pub fn new(table: impl Into<String>, kind: FindingKind) -> Self {
        Self {
            table: table.into(),
            kind,
        }
    }

    /// One factual clause, suitable for humans and for the phrasing service.
    pub fn clause(&self) -> String {
        let t = &self.table;
        match &self.kind {
            FindingKind::TableAbsent => format!("table {} is missing", t),
            FindingKind::TableUnknown { reason } => {
                format!("table {} could not be verified ({})", t, reason)
            }
            FindingKind::ColumnsMissing { columns } => {
                format!("table {} is missing columns: {}", t, columns.join(", "))
            }
            FindingKind::InsufficientRows { rows, min_rows } => {
                format!("table {} has {} rows (minimum: {})", t, rows, min_rows)
            }
            FindingKind::Stale {
                age_days,
                freshness_days,
                ..
            } => format!(
                "table {} has not been updated in {} days (threshold: {} days)",
                t, age_days, freshness_days
            ),
            FindingKind::PeriodMismatch { expected, actual } => format!(
                "table {} covers period '{}' but the report expects '{}'",
                t, actual, expected
            ),
        }
    }
}
