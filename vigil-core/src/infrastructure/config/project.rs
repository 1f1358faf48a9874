// vigil-core/src/infrastructure/config/project.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::domain::condition::is_valid_identifier;
use crate::domain::project::ProjectConfig;
use crate::infrastructure::error::InfrastructureError;

const CONFIG_CANDIDATES: [&str; 2] = ["vigil.yaml", "vigil.yml"];

#[instrument(skip(project_dir))]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    // 1. Discover the main file
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading project configuration");

    // 2. Base YAML
    let content = fs::read_to_string(&config_path)?;
    let mut config: ProjectConfig = serde_yaml::from_str(&content)?;

    // 3. Environment layering, e.g. VIGIL_LANGUAGE=ko vigil check monthly_sales
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    validate_domains(&config)?;

    Ok(config)
}

fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in CONFIG_CANDIDATES {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "No configuration file found in {:?}. Checked: {:?}",
        root, CONFIG_CANDIDATES
    )))
}

/// Applies `VIGIL_*` overrides. `lookup` abstracts the environment.
pub fn apply_env_overrides<F>(config: &mut ProjectConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("VIGIL_CONDITIONS") {
        info!(old = ?config.conditions, new = ?val, "Overriding conditions path via ENV");
        config.conditions = val;
    }
    if let Some(val) = lookup("VIGIL_COLLECTOR_TIMEOUT_MS") {
        match val.parse::<u64>() {
            Ok(ms) => {
                info!(old = config.collector.timeout_ms, new = ms, "Overriding collector timeout via ENV");
                config.collector.timeout_ms = ms;
            }
            Err(_) => tracing::warn!(value = ?val, "Ignoring non-numeric VIGIL_COLLECTOR_TIMEOUT_MS"),
        }
    }
    if let Some(val) = lookup("VIGIL_LANGUAGE") {
        info!(old = ?config.advisory.language, new = ?val, "Overriding advisory language via ENV");
        config.advisory.language = val;
    }
    if let Some(val) = lookup("VIGIL_ADVISORY_ENDPOINT") {
        info!(new = ?val, "Overriding advisory endpoint via ENV");
        config.advisory.endpoint = Some(val).filter(|v| !v.is_empty());
    }
}

fn validate_domains(config: &ProjectConfig) -> Result<(), InfrastructureError> {
    for (name, domain) in &config.domains {
        if domain.path.trim().is_empty() {
            return Err(InfrastructureError::ConfigError(format!(
                "domain '{}' has an empty path",
                name
            )));
        }
        if let Some(col) = &domain.freshness_column
            && !is_valid_identifier(col)
        {
            return Err(InfrastructureError::ConfigError(format!(
                "domain '{}' has an invalid freshness_column '{}'",
                name, col
            )));
        }
    }
    Ok(())
}

/// Resolves a configured path against the project directory.
pub fn resolve_path(project_dir: &Path, configured: &str) -> PathBuf {
    let raw = Path::new(configured);
    if raw.is_absolute() {
        raw.to_path_buf()
    } else {
        project_dir.join(raw)
    }
}
