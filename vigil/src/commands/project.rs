// vigil/src/commands/project.rs
//
// Wiring shared by every command: config, registry, domain backends.

use anyhow::Context;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

use vigil_core::application::{AdvisoryService, ConditionRegistry, GateOrchestrator, MetadataCollector};
use vigil_core::domain::DomainError;
use vigil_core::domain::ports::ConditionSource;
use vigil_core::domain::project::ProjectConfig;
use vigil_core::infrastructure::adapters::{DomainRouter, HttpAdvisoryPhraser};
use vigil_core::infrastructure::config::{YamlConditionSource, load_project_config, resolve_path};
use vigil_core::infrastructure::templating::JinjaRenderer;

pub struct Project {
    pub dir: PathBuf,
    pub config: ProjectConfig,
    pub registry: Arc<ConditionRegistry>,
    /// Specs that failed validation; the rest of the registry is usable.
    pub rejected: Vec<DomainError>,
}

impl Project {
    pub fn load(project_dir: &Path) -> anyhow::Result<Self> {
        let config = load_project_config(project_dir)
            .with_context(|| format!("Cannot load project in '{}'", project_dir.display()))?;

        let conditions_path = resolve_path(project_dir, &config.conditions);
        let source: Arc<dyn ConditionSource> =
            Arc::new(YamlConditionSource::from_path(&conditions_path));

        let registry = Arc::new(ConditionRegistry::new());
        let rejected = registry
            .load_partial(source)
            .with_context(|| format!("Cannot read conditions from '{}'", conditions_path.display()))?;

        for e in &rejected {
            warn!(error = %e, "Skipping invalid readiness conditions");
        }

        Ok(Self {
            dir: project_dir.to_path_buf(),
            config,
            registry,
            rejected,
        })
    }

    /// The rejection for `report_type`, if its spec failed validation.
    pub fn rejection_for(&self, report_type: &str) -> Option<&DomainError> {
        self.rejected.iter().find(|e| {
            matches!(e, DomainError::InvalidConditionSpec { report_type: rt, .. } if rt == report_type)
        })
    }

    /// Where generated artifacts go: `<project>/<target-path>`.
    pub fn target_dir(&self) -> PathBuf {
        resolve_path(&self.dir, &self.config.target_path)
    }

    /// Relative verdict paths land under the target directory.
    pub fn output_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.target_dir().join(path)
        }
    }

    pub fn router(&self, as_of: Option<DateTime<Utc>>) -> DomainRouter {
        DomainRouter::from_config(&self.config, &self.dir, as_of)
    }

    pub fn orchestrator(&self, as_of: Option<DateTime<Utc>>) -> anyhow::Result<GateOrchestrator> {
        let router = self.router(as_of);
        let default_domains = router.domains();
        let collector = MetadataCollector::new(Arc::new(router), self.config.collector.timeout());

        let advisory = match &self.config.advisory.endpoint {
            Some(endpoint) => {
                let phraser = HttpAdvisoryPhraser::new(endpoint, self.config.advisory.timeout())
                    .context("Cannot build the advisory HTTP client")?;
                AdvisoryService::with_phraser(
                    Arc::new(phraser),
                    Arc::new(JinjaRenderer::new()),
                    self.config.advisory.language.clone(),
                    self.config.advisory.timeout(),
                )
            }
            None => AdvisoryService::deterministic(),
        };

        Ok(
            GateOrchestrator::new(Arc::clone(&self.registry), collector, advisory)
                .with_default_domains(default_domains),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn project(yaml: &str) -> Result<Project> {
        Ok(Project {
            dir: PathBuf::from("/srv/reports"),
            config: serde_yaml::from_str(yaml)?,
            registry: Arc::new(ConditionRegistry::new()),
            rejected: Vec::new(),
        })
    }

    #[test]
    fn test_output_lands_under_target_path() -> Result<()> {
        let project = project("name: sales\ntarget-path: out/verdicts")?;
        assert_eq!(
            project.output_path(Path::new("monthly.json")),
            PathBuf::from("/srv/reports/out/verdicts/monthly.json")
        );
        assert_eq!(
            project.output_path(Path::new("/tmp/monthly.json")),
            PathBuf::from("/tmp/monthly.json")
        );

        let defaulted = project("name: sales")?;
        assert_eq!(defaulted.target_dir(), PathBuf::from("/srv/reports/target"));
        Ok(())
    }
}
