// vigil-core/src/ports/metadata.rs

// What the collector needs from a data backend, without knowing whether the
// answer comes from DuckDB, a folder of Parquet files or a remote catalog.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::domain::metadata::DatasetMetadata;
use crate::error::VigilError;

#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// One batched lookup for every table a domain must answer for.
    ///
    /// A table the backend cannot find is returned as absent; a per-table
    /// failure is returned as unknown. `Err` means the whole domain failed.
    async fn list_table_metadata(
        &self,
        domain: &str,
        tables: &[String],
    ) -> Result<HashMap<String, DatasetMetadata>, VigilError>;

    fn engine_name(&self) -> &str;
}
