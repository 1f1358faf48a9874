// vigil-core/src/infrastructure/adapters/snapshot.rs

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;

use crate::domain::metadata::{DatasetMetadata, TableStats};
use crate::error::VigilError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::metadata::MetadataSource;

#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
enum SnapshotStatus {
    #[default]
    Present,
    Absent,
    Unknown,
}

#[derive(Debug, Deserialize, Clone)]
struct SnapshotEntry {
    #[serde(default)]
    status: SnapshotStatus,
    #[serde(default)]
    columns: BTreeSet<String>,
    #[serde(default)]
    row_count: u64,
    #[serde(default)]
    last_updated: Option<DateTime<Utc>>,
    /// Relative alternative to `last_updated`, resolved when the file is read.
    #[serde(default)]
    updated_days_ago: Option<i64>,
    #[serde(default)]
    period: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    tables: BTreeMap<String, SnapshotEntry>,
}

impl SnapshotEntry {
    fn into_metadata(self, table: &str, now: DateTime<Utc>) -> DatasetMetadata {
        match self.status {
            SnapshotStatus::Absent => DatasetMetadata::absent(table),
            SnapshotStatus::Unknown => DatasetMetadata::unknown(
                table,
                self.error
                    .unwrap_or_else(|| "recorded as unknown in snapshot".to_string()),
            ),
            SnapshotStatus::Present => {
                let last_updated = match (self.last_updated, self.updated_days_ago) {
                    (Some(at), _) => Some(at),
                    (None, Some(days)) => match days_before(now, days) {
                        Some(at) => Some(at),
                        None => {
                            return DatasetMetadata::unknown(
                                table,
                                format!("invalid updated_days_ago: {}", days),
                            );
                        }
                    },
                    (None, None) => None,
                };
                let mut stats = TableStats::new(self.columns, self.row_count, last_updated);
                stats.period = self.period;
                DatasetMetadata::present(table, stats)
            }
        }
    }
}

fn days_before(now: DateTime<Utc>, days: i64) -> Option<DateTime<Utc>> {
    Duration::try_days(days).and_then(|d| now.checked_sub_signed(d))
}

/// Metadata recorded in a YAML file, for offline checks and demos.
///
/// ```yaml
/// tables:
///   sales_summary:
///     columns: [region, revenue]
///     row_count: 1200
///     updated_days_ago: 2
///   legacy_feed:
///     status: unknown
///     error: permission denied
/// ```
///
/// Tables not listed in the file are reported absent. `updated_days_ago`
/// counts back from the reference time, the wall clock unless one is set.
pub struct SnapshotMetadataSource {
    path: PathBuf,
    reference_time: Option<DateTime<Utc>>,
}

impl SnapshotMetadataSource {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            reference_time: None,
        }
    }

    pub fn with_reference_time(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.reference_time = at;
        self
    }

    fn read(&self) -> Result<SnapshotFile, InfrastructureError> {
        if !self.path.is_file() {
            return Err(InfrastructureError::ConfigNotFound(
                self.path.display().to_string(),
            ));
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_yaml::from_str(&content)?)
    }
}

#[async_trait]
impl MetadataSource for SnapshotMetadataSource {
    #[instrument(skip(self, tables), fields(engine = "snapshot"))]
    async fn list_table_metadata(
        &self,
        domain: &str,
        tables: &[String],
    ) -> Result<HashMap<String, DatasetMetadata>, VigilError> {
        // Re-read on every call so edits are picked up without a restart.
        let mut snapshot = self.read()?;
        let now = self.reference_time.unwrap_or_else(Utc::now);

        Ok(tables
            .iter()
            .map(|table| {
                let metadata = match snapshot.tables.remove(table) {
                    Some(entry) => entry.into_metadata(table, now),
                    None => DatasetMetadata::absent(table),
                };
                (table.clone(), metadata)
            })
            .collect())
    }

    fn engine_name(&self) -> &str {
        "snapshot"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::metadata::TableState;
    use anyhow::Result;
    use tempfile::tempdir;

    const SNAPSHOT: &str = r#"
tables:
  sales_summary:
    columns: [region, revenue]
    row_count: 1200
    updated_days_ago: 2
    period: "2026-09"
  profit_margin:
    status: absent
  legacy_feed:
    status: unknown
    error: permission denied
  pinned:
    row_count: 5
    last_updated: 2026-10-01T00:00:00Z
"#;

    #[tokio::test]
    async fn test_snapshot_states() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("sales.yaml");
        fs::write(&path, SNAPSHOT)?;

        let source = SnapshotMetadataSource::new(&path);
        let tables: Vec<String> = ["sales_summary", "profit_margin", "legacy_feed", "pinned", "unlisted"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let meta = source.list_table_metadata("SALES", &tables).await?;

        let sales = meta["sales_summary"].stats().expect("present");
        assert_eq!(sales.row_count, 1200);
        assert_eq!(sales.period.as_deref(), Some("2026-09"));
        let age = Utc::now() - sales.last_updated.expect("relative timestamp resolved");
        assert_eq!(age.num_days(), 2);

        assert_eq!(meta["profit_margin"].state, TableState::Absent);
        assert_eq!(meta["legacy_feed"].fetch_error(), Some("permission denied"));
        assert_eq!(
            meta["pinned"].stats().and_then(|s| s.last_updated),
            Some("2026-10-01T00:00:00Z".parse()?)
        );
        assert_eq!(meta["unlisted"].state, TableState::Absent);
        Ok(())
    }

    #[tokio::test]
    async fn test_out_of_range_age_is_unknown() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("sales.yaml");
        fs::write(
            &path,
            "tables:\n  ancient: { row_count: 1, updated_days_ago: 100000000 }\n  far: { row_count: 1, updated_days_ago: 9223372036854775807 }\n",
        )?;

        let source = SnapshotMetadataSource::new(&path);
        let tables = vec!["ancient".to_string(), "far".to_string()];
        let meta = source.list_table_metadata("SALES", &tables).await?;

        for table in &tables {
            let err = meta[table].fetch_error().expect("unknown");
            assert!(err.starts_with("invalid updated_days_ago"), "{}", err);
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_relative_age_uses_reference_time() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("sales.yaml");
        fs::write(&path, SNAPSHOT)?;

        let at: DateTime<Utc> = "2026-03-10T12:00:00Z".parse()?;
        let source = SnapshotMetadataSource::new(&path).with_reference_time(Some(at));
        let meta = source
            .list_table_metadata("SALES", &["sales_summary".to_string()])
            .await?;

        assert_eq!(
            meta["sales_summary"].stats().and_then(|s| s.last_updated),
            Some("2026-03-08T12:00:00Z".parse()?)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_snapshot_fails_the_domain() -> Result<()> {
        let dir = tempdir()?;
        let source = SnapshotMetadataSource::new(&dir.path().join("gone.yaml"));
        let result = source
            .list_table_metadata("SALES", &["sales_summary".to_string()])
            .await;
        assert!(result.is_err());
        Ok(())
    }
}
