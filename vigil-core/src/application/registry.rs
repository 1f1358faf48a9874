// vigil-core/src/application/registry.rs

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, instrument, warn};

use crate::domain::condition::{ConditionSpec, RawCondition};
use crate::domain::error::DomainError;
use crate::domain::ports::ConditionSource;
use crate::error::VigilError;

type SpecMap = HashMap<String, Arc<ConditionSpec>>;

/// In-memory catalogue of validated readiness conditions.
///
/// Readers clone the current `Arc<SpecMap>`; loaders build a complete new map
/// outside the lock and swap it in with one write, so a `get` running during a
/// reload sees either the old mapping or the new one, never a mix.
#[derive(Default)]
pub struct ConditionRegistry {
    specs: RwLock<Arc<SpecMap>>,
    source: RwLock<Option<Arc<dyn ConditionSource>>>,
}

impl ConditionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strict load: any invalid entry fails the whole load and the cached
    /// mapping is left as it was. Returns the number of registered specs.
    #[instrument(skip_all, fields(source = %source.describe()))]
    pub fn load_all(&self, source: Arc<dyn ConditionSource>) -> Result<usize, VigilError> {
        let raw = sorted(source.load_conditions()?);
        ensure_unique(&raw)?;

        let mut specs = SpecMap::with_capacity(raw.len());
        for entry in raw {
            let spec = ConditionSpec::parse(&entry.report_type, entry.body)?;
            specs.insert(entry.report_type, Arc::new(spec));
        }

        let count = specs.len();
        self.install(specs, source);
        info!(count, "Readiness conditions loaded");
        Ok(count)
    }

    /// Lenient load: valid specs are installed, invalid ones are returned.
    /// Fails (leaving the cache untouched) only when the source itself cannot
    /// be read.
    #[instrument(skip_all, fields(source = %source.describe()))]
    pub fn load_partial(
        &self,
        source: Arc<dyn ConditionSource>,
    ) -> Result<Vec<DomainError>, VigilError> {
        let raw = sorted(source.load_conditions()?);
        ensure_unique(&raw)?;

        let mut specs = SpecMap::with_capacity(raw.len());
        let mut rejected = Vec::new();
        for entry in raw {
            match ConditionSpec::parse(&entry.report_type, entry.body) {
                Ok(spec) => {
                    specs.insert(entry.report_type, Arc::new(spec));
                }
                Err(e) => {
                    warn!(report_type = %entry.report_type, origin = %entry.origin, error = %e, "Rejected readiness conditions");
                    rejected.push(e);
                }
            }
        }

        info!(count = specs.len(), rejected = rejected.len(), "Readiness conditions loaded");
        self.install(specs, source);
        Ok(rejected)
    }

    /// Re-reads the source of the last successful load.
    pub fn refresh(&self) -> Result<usize, VigilError> {
        let source = self
            .source
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(|| {
                VigilError::InternalError("condition registry has never been loaded".into())
            })?;
        self.load_all(source)
    }

    pub fn get(&self, report_type: &str) -> Result<Arc<ConditionSpec>, DomainError> {
        self.snapshot()
            .get(report_type)
            .cloned()
            .ok_or_else(|| DomainError::UnknownReportType(report_type.to_string()))
    }

    /// Registered report types, sorted.
    pub fn report_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.snapshot().keys().cloned().collect();
        types.sort();
        types
    }

    /// Every registered spec, sorted by report type.
    pub fn specs(&self) -> Vec<Arc<ConditionSpec>> {
        let mut specs: Vec<_> = self.snapshot().values().cloned().collect();
        specs.sort_by(|a, b| a.report_type.cmp(&b.report_type));
        specs
    }

    fn snapshot(&self) -> Arc<SpecMap> {
        Arc::clone(&self.specs.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn install(&self, specs: SpecMap, source: Arc<dyn ConditionSource>) {
        *self.specs.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(specs);
        *self.source.write().unwrap_or_else(PoisonError::into_inner) = Some(source);
    }
}

fn sorted(mut raw: Vec<RawCondition>) -> Vec<RawCondition> {
    raw.sort_by(|a, b| a.report_type.cmp(&b.report_type));
    raw
}

// Expects sorted input.
fn ensure_unique(raw: &[RawCondition]) -> Result<(), DomainError> {
    match raw.windows(2).find(|w| w[0].report_type == w[1].report_type) {
        Some(w) => Err(DomainError::DuplicateReportType {
            report_type: w[0].report_type.clone(),
        }),
        None => Ok(()),
    }
}
