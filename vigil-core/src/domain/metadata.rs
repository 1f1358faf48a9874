// vigil-core/src/domain/metadata.rs

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Metadata gathered for one checkpoint, keyed by table identifier.
pub type MetadataSet = HashMap<String, DatasetMetadata>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub table: String,
    #[serde(flatten)]
    pub state: TableState,
}

/// What a backend could tell us about a table.
///
/// `Absent` means the backend verifiably reported the table does not exist.
/// `Unknown` means we could not check (timeout, permissions, unreachable
/// backend); the two lead to different remediation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TableState {
    Present(TableStats),
    Absent,
    Unknown { error: String },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableStats {
    #[serde(default)]
    pub columns: BTreeSet<String>,
    #[serde(default)]
    pub row_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    /// Time grain the table is published at, when the backend knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

impl TableStats {
    pub fn new<I, S>(columns: I, row_count: u64, last_updated: Option<DateTime<Utc>>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            row_count,
            last_updated,
            period: None,
        }
    }

    pub fn with_period(mut self, period: impl Into<String>) -> Self {
        self.period = Some(period.into());
        self
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c.eq_ignore_ascii_case(column))
    }
}

impl DatasetMetadata {
    pub fn present(table: impl Into<String>, stats: TableStats) -> Self {
        Self {
            table: table.into(),
            state: TableState::Present(stats),
        }
    }

    pub fn absent(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            state: TableState::Absent,
        }
    }

    pub fn unknown(table: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            state: TableState::Unknown {
                error: error.into(),
            },
        }
    }

    /// `None` when existence could not be established.
    pub fn exists(&self) -> Option<bool> {
        match self.state {
            TableState::Present(_) => Some(true),
            TableState::Absent => Some(false),
            TableState::Unknown { .. } => None,
        }
    }

    pub fn fetch_error(&self) -> Option<&str> {
        match &self.state {
            TableState::Unknown { error } => Some(error),
            _ => None,
        }
    }

    pub fn stats(&self) -> Option<&TableStats> {
        match &self.state {
            TableState::Present(stats) => Some(stats),
            _ => None,
        }
    }

    /// Merge precedence when a table is probed in several domains:
    /// present > unknown > absent. A table is only verifiably absent when
    /// every domain asked answered and none has it.
    pub(crate) fn precedence(&self) -> u8 {
        match self.state {
            TableState::Present(_) => 2,
            TableState::Unknown { .. } => 1,
            TableState::Absent => 0,
        }
    }
}

// =============================================================================
//  DATA QUALITY OVERVIEW
// =============================================================================

/// Age past which the overview flags a table as not fresh.
pub const SUMMARY_FRESHNESS_DAYS: i64 = 30;

/// Aggregate view over a metadata set, independent of any report condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataSummary {
    pub total_tables: usize,
    pub present_tables: usize,
    pub absent_tables: usize,
    pub unknown_tables: usize,
    pub total_rows: u64,
    pub average_rows_per_table: f64,
    pub tables_with_data: usize,
    pub empty_tables: usize,
    pub oldest_update: Option<DateTime<Utc>>,
    /// No known update is older than [`SUMMARY_FRESHNESS_DAYS`] at `now`.
    pub freshness_ok: bool,
}

impl MetadataSummary {
    pub fn from_metadata(metadata: &MetadataSet, now: DateTime<Utc>) -> Self {
        let mut summary = Self {
            total_tables: metadata.len(),
            present_tables: 0,
            absent_tables: 0,
            unknown_tables: 0,
            total_rows: 0,
            average_rows_per_table: 0.0,
            tables_with_data: 0,
            empty_tables: 0,
            oldest_update: None,
            freshness_ok: true,
        };

        for meta in metadata.values() {
            match &meta.state {
                TableState::Present(stats) => {
                    summary.present_tables += 1;
                    summary.total_rows += stats.row_count;
                    if stats.row_count == 0 {
                        summary.empty_tables += 1;
                    } else {
                        summary.tables_with_data += 1;
                    }
                    if let Some(ts) = stats.last_updated {
                        summary.oldest_update =
                            Some(summary.oldest_update.map_or(ts, |o| o.min(ts)));
                    }
                }
                TableState::Absent => summary.absent_tables += 1,
                TableState::Unknown { .. } => summary.unknown_tables += 1,
            }
        }

        if let Some(oldest) = summary.oldest_update {
            summary.freshness_ok = now - oldest <= Duration::days(SUMMARY_FRESHNESS_DAYS);
        }

        if summary.present_tables > 0 {
            let avg = summary.total_rows as f64 / summary.present_tables as f64;
            summary.average_rows_per_table = (avg * 100.0).round() / 100.0;
        }

        summary
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_exists_distinguishes_absent_from_unknown() {
        assert_eq!(DatasetMetadata::absent("t").exists(), Some(false));
        assert_eq!(DatasetMetadata::unknown("t", "timeout").exists(), None);
        assert_eq!(
            DatasetMetadata::unknown("t", "timeout").fetch_error(),
            Some("timeout")
        );
        assert_eq!(
            DatasetMetadata::present("t", TableStats::default()).exists(),
            Some(true)
        );
    }

    #[test]
    fn test_yaml_shape() -> anyhow::Result<()> {
        let meta: DatasetMetadata = serde_yaml::from_str(
            r#"
table: sales_summary
status: present
columns: [month, Region]
row_count: 20
last_updated: 2025-10-12T14:00:00Z
"#,
        )?;
        let stats = meta.stats().unwrap();
        assert_eq!(stats.row_count, 20);
        assert!(stats.has_column("region"));
        assert_eq!(
            stats.last_updated,
            Some(Utc.with_ymd_and_hms(2025, 10, 12, 14, 0, 0).unwrap())
        );

        let meta: DatasetMetadata =
            serde_yaml::from_str("table: t\nstatus: unknown\nerror: permission denied")?;
        assert_eq!(meta.fetch_error(), Some("permission denied"));
        Ok(())
    }

    #[test]
    fn test_summary() {
        let old = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let new = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let metadata: MetadataSet = [
            DatasetMetadata::present("a", TableStats::new(["x"], 100, Some(new))),
            DatasetMetadata::present("b", TableStats::new(["x"], 0, Some(old))),
            DatasetMetadata::present("c", TableStats::new(["x"], 51, None)),
            DatasetMetadata::absent("d"),
            DatasetMetadata::unknown("e", "boom"),
        ]
        .into_iter()
        .map(|m| (m.table.clone(), m))
        .collect();

        let summary = MetadataSummary::from_metadata(&metadata, new);
        assert_eq!(summary.total_tables, 5);
        assert_eq!(summary.present_tables, 3);
        assert_eq!(summary.absent_tables, 1);
        assert_eq!(summary.unknown_tables, 1);
        assert_eq!(summary.total_rows, 151);
        assert_eq!(summary.average_rows_per_table, 50.33);
        assert_eq!(summary.tables_with_data, 2);
        assert_eq!(summary.empty_tables, 1);
        assert_eq!(summary.oldest_update, Some(old));
        // b was last touched five months before `new`
        assert!(!summary.freshness_ok);

        let recent: MetadataSet = [DatasetMetadata::present(
            "a",
            TableStats::new(["x"], 100, Some(new - Duration::days(30))),
        )]
        .into_iter()
        .map(|m| (m.table.clone(), m))
        .collect();
        let summary = MetadataSummary::from_metadata(&recent, new);
        assert_eq!(summary.tables_with_data, 1);
        assert!(summary.freshness_ok);

        let empty = MetadataSummary::from_metadata(&MetadataSet::new(), new);
        assert!(empty.freshness_ok);
        assert_eq!(empty.average_rows_per_table, 0.0);
    }
}
