// vigil-core/src/infrastructure/adapters/router.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::domain::metadata::DatasetMetadata;
use crate::domain::project::{DomainConfig, Engine, ProjectConfig};
use crate::error::VigilError;
use crate::infrastructure::adapters::{
    DataFusionMetadataSource, DuckDbMetadataSource, SnapshotMetadataSource,
};
use crate::infrastructure::config::resolve_path;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::metadata::MetadataSource;

/// Dispatches metadata queries to the backend configured for each domain.
///
/// A domain whose backend cannot be opened is kept as "broken": every query
/// against it fails, which the collector turns into unknown tables instead of
/// aborting the whole check.
#[derive(Default)]
pub struct DomainRouter {
    routes: BTreeMap<String, Arc<dyn MetadataSource>>,
    broken: BTreeMap<String, String>,
}

impl DomainRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens every configured domain. `as_of` pins the instant relative
    /// snapshot ages count back from.
    #[instrument(skip_all, fields(project = %config.name))]
    pub fn from_config(
        config: &ProjectConfig,
        project_dir: &Path,
        as_of: Option<DateTime<Utc>>,
    ) -> Self {
        let mut router = Self::new();
        for (name, domain) in &config.domains {
            match open_backend(domain, project_dir, as_of) {
                Ok(source) => {
                    info!(domain = %name, engine = source.engine_name(), "Domain backend ready");
                    router = router.with_source(name.clone(), source);
                }
                Err(e) => {
                    warn!(domain = %name, error = %e, "Domain backend unavailable");
                    router.broken.insert(name.clone(), e.to_string());
                }
            }
        }
        router
    }

    pub fn with_source(mut self, domain: impl Into<String>, source: Arc<dyn MetadataSource>) -> Self {
        self.routes.insert(domain.into(), source);
        self
    }

    /// Every configured domain, including broken ones.
    pub fn domains(&self) -> Vec<String> {
        let mut all: Vec<String> = self
            .routes
            .keys()
            .chain(self.broken.keys())
            .cloned()
            .collect();
        all.sort();
        all
    }

    pub fn broken_domains(&self) -> &BTreeMap<String, String> {
        &self.broken
    }
}

fn open_backend(
    domain: &DomainConfig,
    project_dir: &Path,
    as_of: Option<DateTime<Utc>>,
) -> Result<Arc<dyn MetadataSource>, InfrastructureError> {
    let path = resolve_path(project_dir, &domain.path);
    let source: Arc<dyn MetadataSource> = match domain.engine {
        Engine::DuckDB => Arc::new(DuckDbMetadataSource::open(
            &path,
            domain.freshness_column.clone(),
        )?),
        Engine::DataFusion => Arc::new(DataFusionMetadataSource::new(&path)?),
        Engine::Snapshot => {
            Arc::new(SnapshotMetadataSource::new(&path).with_reference_time(as_of))
        }
    };
    Ok(source)
}

#[async_trait]
impl MetadataSource for DomainRouter {
    async fn list_table_metadata(
        &self,
        domain: &str,
        tables: &[String],
    ) -> Result<HashMap<String, DatasetMetadata>, VigilError> {
        if let Some(source) = self.routes.get(domain) {
            return source.list_table_metadata(domain, tables).await;
        }
        let reason = match self.broken.get(domain) {
            Some(reason) => format!("domain '{}' is unavailable: {}", domain, reason),
            None => format!("domain '{}' is not configured", domain),
        };
        Err(InfrastructureError::ConfigError(reason).into())
    }

    fn engine_name(&self) -> &str {
        "router"
    }
}
