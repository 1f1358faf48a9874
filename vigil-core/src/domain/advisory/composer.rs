// vigil-core/src/domain/advisory/composer.rs

use crate::domain::condition::ConditionSpec;
use crate::domain::verdict::{GateStatus, Verdict};

/// Renders verdicts into plain, deterministic facts.
///
/// The composer never judges readiness: it only restates what the evaluator
/// found. Anything downstream (an LLM, a translator) receives these facts.
pub struct AdvisoryComposer;

impl AdvisoryComposer {
    /// One clause per finding, hard findings first, in verdict order.
    pub fn clauses(verdict: &Verdict) -> Vec<String> {
        verdict.findings().map(|f| f.clause()).collect()
    }

    pub fn headline(verdict: &Verdict, spec: &ConditionSpec) -> Option<String> {
        match verdict.status {
            GateStatus::Ready => None,
            GateStatus::Partial => Some(format!(
                "The {} report can be generated, but some data quality issues were found.",
                spec.description
            )),
            GateStatus::Blocked => Some(format!(
                "The {} report cannot be generated: required data is missing or could not be verified.",
                spec.description
            )),
        }
    }

    /// Headline followed by one bullet per fact. `None` for READY verdicts.
    pub fn explain(verdict: &Verdict, spec: &ConditionSpec) -> Option<String> {
        let headline = Self::headline(verdict, spec)?;
        let mut text = headline;
        for clause in Self::clauses(verdict) {
            text.push_str("\n- ");
            text.push_str(&clause);
        }
        Some(text)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::condition::ConditionDefinition;
    use crate::domain::verdict::{Finding, FindingKind};
    use chrono::{TimeZone, Utc};

    fn spec() -> ConditionSpec {
        ConditionSpec::from_definition(
            "monthly_sales",
            ConditionDefinition {
                description: Some("Monthly Sales".into()),
                required_tables: vec!["sales_summary".into(), "profit_margin".into()],
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn test_ready_has_no_message() {
        let verdict = Verdict::from_findings("monthly_sales", vec![]);
        assert_eq!(AdvisoryComposer::explain(&verdict, &spec()), None);
        assert!(AdvisoryComposer::clauses(&verdict).is_empty());
    }

    #[test]
    fn test_blocked_explanation() {
        let verdict = Verdict::from_findings(
            "monthly_sales",
            vec![
                Finding::new(
                    "sales_summary",
                    FindingKind::Stale {
                        last_updated: Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap(),
                        age_days: 41,
                        freshness_days: 7,
                    },
                ),
                Finding::new("profit_margin", FindingKind::TableAbsent),
                Finding::new(
                    "sales_summary",
                    FindingKind::ColumnsMissing {
                        columns: vec!["region".into(), "sales".into()],
                    },
                ),
            ],
        );

        let text = AdvisoryComposer::explain(&verdict, &spec()).unwrap();
        insta::assert_snapshot!(text, @r"
        The Monthly Sales report cannot be generated: required data is missing or could not be verified.
        - table profit_margin is missing
        - table sales_summary is missing columns: region, sales
        - table sales_summary has not been updated in 41 days (threshold: 7 days)
        ");
    }

    #[test]
    fn test_partial_explanation() {
        let verdict = Verdict::from_findings(
            "monthly_sales",
            vec![
                Finding::new(
                    "sales_summary",
                    FindingKind::InsufficientRows {
                        rows: 5,
                        min_rows: 10,
                    },
                ),
                Finding::new(
                    "profit_margin",
                    FindingKind::PeriodMismatch {
                        expected: "month".into(),
                        actual: "week".into(),
                    },
                ),
            ],
        );

        let text = AdvisoryComposer::explain(&verdict, &spec()).unwrap();
        insta::assert_snapshot!(text, @r"
        The Monthly Sales report can be generated, but some data quality issues were found.
        - table sales_summary has 5 rows (minimum: 10)
        - table profit_margin covers period 'week' but the report expects 'month'
        ");
    }

    #[test]
    fn test_unknown_clause_carries_reason() {
        let verdict = Verdict::from_findings(
            "monthly_sales",
            vec![Finding::new(
                "profit_margin",
                FindingKind::TableUnknown {
                    reason: "timed out after 10000ms".into(),
                },
            )],
        );
        assert_eq!(
            AdvisoryComposer::clauses(&verdict),
            vec!["table profit_margin could not be verified (timed out after 10000ms)"]
        );
    }
}
