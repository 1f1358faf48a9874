// vigil-core/src/domain/condition/spec.rs

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::error::DomainError;

fn re_identifier() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*){0,2}$")
            .unwrap_or_else(|_| Regex::new("$^").unwrap_or_else(|_| unreachable!()))
    })
}

pub fn is_valid_identifier(name: &str) -> bool {
    re_identifier().is_match(name)
}

// =============================================================================
//  1. RAW DEFINITION (as written in YAML)
// =============================================================================

/// One entry of the `report_conditions` mapping, before validation.
#[derive(Debug, Deserialize, Serialize, Clone, Default, Validate)]
#[validate(schema(function = "validate_definition"))]
pub struct ConditionDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[validate(length(min = 1, message = "required_tables must not be empty"))]
    #[serde(default)]
    pub required_tables: Vec<String>,

    #[serde(default)]
    pub required_columns: BTreeMap<String, Vec<String>>,

    #[serde(default)]
    pub min_rows: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freshness_days: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_period: Option<String>,

    // The originating system called these "Genie domains".
    #[serde(default, alias = "genie_domains")]
    pub domains: Vec<String>,

    #[serde(default)]
    pub table_domains: BTreeMap<String, String>,
}

fn rule(code: &'static str, message: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Owned(message));
    err
}

fn validate_definition(def: &ConditionDefinition) -> Result<(), ValidationError> {
    if let Some(bad) = def.required_tables.iter().find(|t| !is_valid_identifier(t)) {
        return Err(rule(
            "invalid_table",
            format!("'{}' is not a valid table identifier", bad),
        ));
    }

    let tables: HashSet<&str> = def.required_tables.iter().map(String::as_str).collect();

    for (table, columns) in &def.required_columns {
        if !tables.contains(table.as_str()) {
            return Err(rule(
                "unknown_table",
                format!(
                    "required_columns references '{}' which is not listed in required_tables",
                    table
                ),
            ));
        }
        if let Some(bad) = columns.iter().find(|c| !is_valid_identifier(c)) {
            return Err(rule(
                "invalid_column",
                format!("'{}' is not a valid column name for table '{}'", bad, table),
            ));
        }
    }

    if let Some(bad) = def.domains.iter().find(|d| d.trim().is_empty()) {
        return Err(rule(
            "invalid_domain",
            format!("domain identifiers cannot be blank ('{}')", bad),
        ));
    }

    for (table, domain) in &def.table_domains {
        if !tables.contains(table.as_str()) {
            return Err(rule(
                "unknown_table",
                format!(
                    "table_domains references '{}' which is not listed in required_tables",
                    table
                ),
            ));
        }
        if !def.domains.contains(domain) {
            return Err(rule(
                "unknown_domain",
                format!(
                    "table_domains pins '{}' to '{}' which is not listed in domains",
                    table, domain
                ),
            ));
        }
    }

    Ok(())
}

/// Flattens validator output into one stable, human readable reason.
fn describe(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(_, errs)| errs.iter())
        .map(|e| {
            e.message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| e.code.to_string())
        })
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
//  2. VALIDATED SPEC (immutable once loaded)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionSpec {
    pub report_type: String,
    pub description: String,
    /// Declared order, duplicates collapsed. Drives the order of every finding.
    pub required_tables: Vec<String>,
    pub required_columns: BTreeMap<String, Vec<String>>,
    pub min_rows: u64,
    pub freshness_days: Option<u32>,
    pub required_period: Option<String>,
    pub domains: Vec<String>,
    pub table_domains: BTreeMap<String, String>,
}

impl ConditionSpec {
    /// Deserializes and validates one YAML entry. Type errors are reported
    /// against the report type rather than failing the whole document.
    pub fn parse(report_type: &str, body: serde_yaml::Value) -> Result<Self, DomainError> {
        let definition: ConditionDefinition =
            serde_yaml::from_value(body).map_err(|e| DomainError::InvalidConditionSpec {
                report_type: report_type.to_string(),
                reason: e.to_string(),
            })?;
        Self::from_definition(report_type, definition)
    }

    pub fn from_definition(
        report_type: &str,
        definition: ConditionDefinition,
    ) -> Result<Self, DomainError> {
        if !is_valid_identifier(report_type) {
            return Err(DomainError::InvalidConditionSpec {
                report_type: report_type.to_string(),
                reason: "report type must be a plain identifier".into(),
            });
        }

        definition
            .validate()
            .map_err(|errors| DomainError::InvalidConditionSpec {
                report_type: report_type.to_string(),
                reason: describe(&errors),
            })?;

        let ConditionDefinition {
            description,
            required_tables,
            required_columns,
            min_rows,
            freshness_days,
            required_period,
            domains,
            table_domains,
        } = definition;

        Ok(Self {
            report_type: report_type.to_string(),
            description: description.unwrap_or_else(|| report_type.to_string()),
            required_tables: dedup_ordered(required_tables),
            required_columns: required_columns
                .into_iter()
                .map(|(table, cols)| (table, dedup_ordered(cols)))
                .collect(),
            min_rows,
            freshness_days,
            required_period: required_period.filter(|p| !p.trim().is_empty()),
            domains: dedup_ordered(domains),
            table_domains,
        })
    }

    pub fn required_columns_for(&self, table: &str) -> &[String] {
        self.required_columns
            .get(table)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The domain a table is pinned to, if any.
    pub fn pinned_domain(&self, table: &str) -> Option<&str> {
        self.table_domains.get(table).map(String::as_str)
    }
}

fn dedup_ordered(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Result<ConditionSpec, DomainError> {
        ConditionSpec::parse("monthly_sales", serde_yaml::from_str(yaml).unwrap())
    }

    fn reason(err: DomainError) -> String {
        match err {
            DomainError::InvalidConditionSpec { reason, .. } => reason,
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_full_definition() -> anyhow::Result<()> {
        let spec = parse(
            r#"
description: Monthly sales report
required_tables: [sales_summary, profit_margin, sales_summary]
required_columns:
  sales_summary: [month, region, sales]
min_rows: 10
freshness_days: 7
required_period: month
genie_domains: [SALES_GENIE]
"#,
        )?;

        assert_eq!(spec.description, "Monthly sales report");
        assert_eq!(spec.required_tables, vec!["sales_summary", "profit_margin"]);
        assert_eq!(
            spec.required_columns_for("sales_summary"),
            ["month", "region", "sales"]
        );
        assert!(spec.required_columns_for("profit_margin").is_empty());
        assert_eq!(spec.min_rows, 10);
        assert_eq!(spec.freshness_days, Some(7));
        assert_eq!(spec.required_period.as_deref(), Some("month"));
        assert_eq!(spec.domains, vec!["SALES_GENIE"]);
        Ok(())
    }

    #[test]
    fn test_defaults() -> anyhow::Result<()> {
        let spec = parse("required_tables: [orders]")?;
        assert_eq!(spec.description, "monthly_sales");
        assert_eq!(spec.min_rows, 0);
        assert_eq!(spec.freshness_days, None);
        assert!(spec.domains.is_empty());
        Ok(())
    }

    #[test]
    fn test_rejects_empty_required_tables() {
        let err = parse("required_tables: []").unwrap_err();
        assert_eq!(reason(err), "required_tables must not be empty");

        let err = parse("description: nothing").unwrap_err();
        assert_eq!(reason(err), "required_tables must not be empty");
    }

    #[test]
    fn test_rejects_columns_for_unlisted_table() {
        let err = parse(
            r#"
required_tables: [sales_summary]
required_columns:
  profit_margin: [margin]
"#,
        )
        .unwrap_err();
        assert!(reason(err).contains("'profit_margin' which is not listed in required_tables"));
    }

    #[test]
    fn test_rejects_malformed_identifiers() {
        let err = parse("required_tables: [\"sales; DROP TABLE x\"]").unwrap_err();
        assert!(reason(err).contains("not a valid table identifier"));

        let err = parse(
            r#"
required_tables: [sales]
required_columns:
  sales: ["month-name"]
"#,
        )
        .unwrap_err();
        assert!(reason(err).contains("not a valid column name"));
    }

    #[test]
    fn test_rejects_foreign_table_domains() {
        let err = parse(
            r#"
required_tables: [sales]
domains: [SALES_GENIE]
table_domains:
  sales: CONTRACT_GENIE
"#,
        )
        .unwrap_err();
        assert!(reason(err).contains("not listed in domains"));
    }

    #[test]
    fn test_type_errors_are_scoped_to_the_report_type() {
        let err = parse("required_tables: [sales]\nmin_rows: -3").unwrap_err();
        match err {
            DomainError::InvalidConditionSpec { report_type, .. } => {
                assert_eq!(report_type, "monthly_sales")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_qualified_identifiers_are_accepted() {
        assert!(is_valid_identifier("main.sales.orders"));
        assert!(is_valid_identifier("_tmp"));
        assert!(!is_valid_identifier("a.b.c.d"));
        assert!(!is_valid_identifier("1table"));
    }
}
