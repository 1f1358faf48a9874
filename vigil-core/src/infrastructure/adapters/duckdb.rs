// vigil-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use chrono::DateTime;
use duckdb::{AccessMode, Config, Connection, params};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument, warn};

use crate::domain::metadata::{DatasetMetadata, TableStats};
use crate::error::VigilError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::metadata::MetadataSource;

/// Reads table metadata from a DuckDB database file, opened read-only.
pub struct DuckDbMetadataSource {
    conn: Arc<Mutex<Connection>>,
    freshness_column: Option<String>,
}

impl DuckDbMetadataSource {
    pub fn open(
        db_path: &Path,
        freshness_column: Option<String>,
    ) -> Result<Self, InfrastructureError> {
        let config = Config::default().access_mode(AccessMode::ReadOnly)?;
        let conn = Connection::open_with_flags(db_path, config)?;
        Ok(Self::from_connection(conn, freshness_column))
    }

    pub fn from_connection(conn: Connection, freshness_column: Option<String>) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            freshness_column,
        }
    }
}

/// `catalog.schema.table`, `schema.table` or `table`.
struct QualifiedName<'a> {
    catalog: Option<&'a str>,
    schema: &'a str,
    table: &'a str,
}

impl<'a> QualifiedName<'a> {
    fn parse(identifier: &'a str) -> Self {
        let parts: Vec<&str> = identifier.split('.').collect();
        match parts.as_slice() {
            [catalog, schema, table] => Self {
                catalog: Some(*catalog),
                schema: *schema,
                table: *table,
            },
            [schema, table] => Self {
                catalog: None,
                schema: *schema,
                table: *table,
            },
            _ => Self {
                catalog: None,
                schema: "main",
                table: identifier,
            },
        }
    }

    fn quoted(&self) -> String {
        let mut out = String::new();
        if let Some(catalog) = self.catalog {
            out.push_str(&format!("\"{}\".", catalog));
        }
        out.push_str(&format!("\"{}\".\"{}\"", self.schema, self.table));
        out
    }
}

fn probe_table(
    conn: &Connection,
    identifier: &str,
    freshness_column: Option<&str>,
) -> Result<DatasetMetadata, duckdb::Error> {
    let name = QualifiedName::parse(identifier);

    let mut stmt = conn.prepare(
        "SELECT column_name FROM information_schema.columns \
         WHERE table_name = ? AND table_schema = ? \
           AND table_catalog = coalesce(?, table_catalog) \
         ORDER BY ordinal_position",
    )?;
    let columns = stmt
        .query_map(params![name.table, name.schema, name.catalog], |row| {
            row.get::<_, String>(0)
        })?
        .collect::<Result<BTreeSet<String>, _>>()?;

    if columns.is_empty() {
        return Ok(DatasetMetadata::absent(identifier));
    }

    let qualified = name.quoted();
    let rows: i64 = conn.query_row(&format!("SELECT count(*) FROM {}", qualified), [], |row| {
        row.get(0)
    })?;

    let mut last_updated = None;
    if let Some(wanted) = freshness_column
        && let Some(actual) = columns.iter().find(|c| c.eq_ignore_ascii_case(wanted))
    {
        // An unreadable freshness column only leaves the age unknown.
        match conn.query_row(
            &format!(
                "SELECT epoch_ms(max(CAST(\"{}\" AS TIMESTAMP))) FROM {}",
                actual, qualified
            ),
            [],
            |row| row.get::<_, Option<i64>>(0),
        ) {
            Ok(epoch_ms) => last_updated = epoch_ms.and_then(DateTime::from_timestamp_millis),
            Err(e) => {
                warn!(table = %identifier, column = %actual, error = %e, "Freshness column unreadable");
            }
        }
    }

    Ok(DatasetMetadata::present(
        identifier,
        TableStats::new(columns, u64::try_from(rows).unwrap_or_default(), last_updated),
    ))
}

#[async_trait]
impl MetadataSource for DuckDbMetadataSource {
    #[instrument(skip(self, tables), fields(engine = "duckdb"))]
    async fn list_table_metadata(
        &self,
        domain: &str,
        tables: &[String],
    ) -> Result<HashMap<String, DatasetMetadata>, VigilError> {
        let conn = Arc::clone(&self.conn);
        let tables = tables.to_vec();
        let freshness_column = self.freshness_column.clone();

        // DuckDB is synchronous: keep it off the async workers.
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| {
                VigilError::Infrastructure(InfrastructureError::Io(std::io::Error::other(
                    "DuckDB Mutex Poisoned",
                )))
            })?;

            let mut result = HashMap::with_capacity(tables.len());
            for table in tables {
                let metadata = probe_table(&conn, &table, freshness_column.as_deref())
                    .unwrap_or_else(|e| {
                        debug!(table = %table, error = %e, "Table probe failed");
                        DatasetMetadata::unknown(&table, e.to_string())
                    });
                result.insert(table, metadata);
            }
            Ok(result)
        })
        .await
        .map_err(|e| VigilError::InternalError(format!("DuckDB probe task failed: {}", e)))?
    }

    fn engine_name(&self) -> &str {
        "duckdb"
    }
}
