// vigil-core/src/infrastructure/adapters/datafusion.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use datafusion::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use crate::domain::metadata::{DatasetMetadata, TableStats};
use crate::error::VigilError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::metadata::MetadataSource;

/// Treats a directory of `<table>.parquet` / `<table>.csv` files as a domain.
///
/// Row counts come from a full scan, columns from the file schema and the
/// last update time from the file's modification time.
pub struct DataFusionMetadataSource {
    data_dir: PathBuf,
}

enum DataFile {
    Parquet(PathBuf),
    Csv(PathBuf),
}

impl DataFile {
    fn path(&self) -> &Path {
        match self {
            DataFile::Parquet(p) | DataFile::Csv(p) => p,
        }
    }
}

impl DataFusionMetadataSource {
    pub fn new(data_dir: &Path) -> Result<Self, InfrastructureError> {
        if !data_dir.is_dir() {
            return Err(InfrastructureError::ConfigError(format!(
                "DataFusion data directory '{}' does not exist",
                data_dir.display()
            )));
        }
        Ok(Self {
            data_dir: data_dir.to_path_buf(),
        })
    }

    fn locate(&self, table: &str) -> Option<DataFile> {
        let parquet = self.data_dir.join(format!("{}.parquet", table));
        if parquet.is_file() {
            return Some(DataFile::Parquet(parquet));
        }
        let csv = self.data_dir.join(format!("{}.csv", table));
        csv.is_file().then_some(DataFile::Csv(csv))
    }

    async fn probe_table(
        &self,
        ctx: &SessionContext,
        table: &str,
    ) -> Result<DatasetMetadata, InfrastructureError> {
        let Some(file) = self.locate(table) else {
            return Ok(DatasetMetadata::absent(table));
        };

        let location = file.path().to_string_lossy().to_string();
        let df = match &file {
            DataFile::Parquet(_) => {
                ctx.read_parquet(location, ParquetReadOptions::default())
                    .await?
            }
            DataFile::Csv(_) => ctx.read_csv(location, CsvReadOptions::new()).await?,
        };

        let columns: BTreeSet<String> = df
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect();
        let row_count = df.count().await? as u64;

        let last_updated = std::fs::metadata(file.path())?
            .modified()
            .ok()
            .map(DateTime::<Utc>::from);

        Ok(DatasetMetadata::present(
            table,
            TableStats::new(columns, row_count, last_updated),
        ))
    }
}

#[async_trait]
impl MetadataSource for DataFusionMetadataSource {
    #[instrument(skip(self, tables), fields(engine = "datafusion"))]
    async fn list_table_metadata(
        &self,
        domain: &str,
        tables: &[String],
    ) -> Result<HashMap<String, DatasetMetadata>, VigilError> {
        // A fresh session per call: nothing is registered, files are re-read.
        let ctx = SessionContext::new();

        let mut result = HashMap::with_capacity(tables.len());
        for table in tables {
            let metadata = match self.probe_table(&ctx, table).await {
                Ok(m) => m,
                Err(e) => {
                    debug!(table = %table, error = %e, "Table probe failed");
                    DatasetMetadata::unknown(table, e.to_string())
                }
            };
            result.insert(table.clone(), metadata);
        }
        Ok(result)
    }

    fn engine_name(&self) -> &str {
        "datafusion"
    }
}
