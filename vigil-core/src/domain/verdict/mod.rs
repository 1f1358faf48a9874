// vigil-core/src/domain/verdict/mod.rs

pub mod finding;
pub mod status;

pub use finding::{Finding, FindingKind};
pub use status::GateStatus;

use serde::{Deserialize, Serialize};

/// The sole output of a readiness check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub report_type: String,
    pub status: GateStatus,
    /// Hard-gate reasons, in `required_tables` order.
    pub missing: Vec<Finding>,
    /// Soft-gate reasons, in `required_tables` order.
    pub warnings: Vec<Finding>,
    /// Advisory text. `None` until composed, and always `None` for READY.
    #[serde(default)]
    pub message: Option<String>,
}

impl Verdict {
    /// Routes each finding to `missing` or `warnings` (keeping their relative
    /// order) and derives the status with worst-wins.
    pub fn from_findings(report_type: impl Into<String>, findings: Vec<Finding>) -> Self {
        let status = findings
            .iter()
            .map(|f| f.kind.severity())
            .fold(GateStatus::Ready, GateStatus::worst);

        let (missing, warnings) = findings.into_iter().partition(|f| f.kind.is_hard());

        Self {
            report_type: report_type.into(),
            status,
            missing,
            warnings,
            message: None,
        }
    }

    /// Every finding, hard ones first.
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.missing.iter().chain(self.warnings.iter())
    }

    pub fn is_ready(&self) -> bool {
        self.status == GateStatus::Ready
    }
}
