// vigil-core/src/domain/gate/evaluator.rs

use chrono::{DateTime, Duration, Utc};

use crate::domain::condition::ConditionSpec;
use crate::domain::metadata::{MetadataSet, TableState, TableStats};
use crate::domain::verdict::{Finding, FindingKind, Verdict};

pub struct GateEvaluator;

impl GateEvaluator {
    /// Turns collected metadata into a verdict. Pure: the same inputs always
    /// produce the same verdict, and `now` is the only notion of time used.
    ///
    /// Tables are visited in declared order, so findings are too.
    pub fn evaluate(spec: &ConditionSpec, metadata: &MetadataSet, now: DateTime<Utc>) -> Verdict {
        let mut findings = Vec::new();

        for table in &spec.required_tables {
            match metadata.get(table).map(|m| &m.state) {
                None => findings.push(Finding::new(
                    table,
                    FindingKind::TableUnknown {
                        reason: "no metadata was collected".into(),
                    },
                )),
                Some(TableState::Unknown { error }) => findings.push(Finding::new(
                    table,
                    FindingKind::TableUnknown {
                        reason: error.clone(),
                    },
                )),
                Some(TableState::Absent) => {
                    findings.push(Finding::new(table, FindingKind::TableAbsent))
                }
                Some(TableState::Present(stats)) => {
                    Self::check_present(spec, table, stats, now, &mut findings)
                }
            }
        }

        Verdict::from_findings(&spec.report_type, findings)
    }

    fn check_present(
        spec: &ConditionSpec,
        table: &str,
        stats: &TableStats,
        now: DateTime<Utc>,
        findings: &mut Vec<Finding>,
    ) {
        // a. Columns
        let missing_columns: Vec<String> = spec
            .required_columns_for(table)
            .iter()
            .filter(|col| !stats.has_column(col))
            .cloned()
            .collect();
        if !missing_columns.is_empty() {
            findings.push(Finding::new(
                table,
                FindingKind::ColumnsMissing {
                    columns: missing_columns,
                },
            ));
        }

        // b. Volume
        if stats.row_count < spec.min_rows {
            findings.push(Finding::new(
                table,
                FindingKind::InsufficientRows {
                    rows: stats.row_count,
                    min_rows: spec.min_rows,
                },
            ));
        }

        // c. Freshness (strictly older than the threshold)
        if let (Some(freshness_days), Some(last_updated)) = (spec.freshness_days, stats.last_updated)
        {
            let age = now.signed_duration_since(last_updated);
            if age > Duration::days(i64::from(freshness_days)) {
                findings.push(Finding::new(
                    table,
                    FindingKind::Stale {
                        last_updated,
                        age_days: whole_days_rounded_up(age),
                        freshness_days,
                    },
                ));
            }
        }

        // d. Period, only when both sides know it
        if let (Some(expected), Some(actual)) = (&spec.required_period, &stats.period)
            && !expected.eq_ignore_ascii_case(actual)
        {
            findings.push(Finding::new(
                table,
                FindingKind::PeriodMismatch {
                    expected: expected.clone(),
                    actual: actual.clone(),
                },
            ));
        }
    }

    /// Verdict used when no domain could be queried at all: every required
    /// table is reported unknown, without running the evaluation.
    pub fn unavailable(spec: &ConditionSpec, reason: &str) -> Verdict {
        let findings = spec
            .required_tables
            .iter()
            .map(|table| {
                Finding::new(
                    table,
                    FindingKind::TableUnknown {
                        reason: reason.to_string(),
                    },
                )
            })
            .collect();
        Verdict::from_findings(&spec.report_type, findings)
    }
}

// Partial days count as whole days.
fn whole_days_rounded_up(age: Duration) -> i64 {
    let days = age.num_days();
    if age > Duration::days(days) { days + 1 } else { days }
}
