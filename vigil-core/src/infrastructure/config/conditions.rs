// vigil-core/src/infrastructure/config/conditions.rs

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::domain::condition::RawCondition;
use crate::domain::error::DomainError;
use crate::domain::ports::ConditionSource;
use crate::error::VigilError;
use crate::infrastructure::error::InfrastructureError;

const SUPPORTED_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

#[derive(Deserialize)]
struct ConditionsFile {
    #[serde(default)]
    report_conditions: serde_yaml::Mapping,
}

enum Origin {
    Path(PathBuf),
    Inline(String),
}

/// Reads `report_conditions` from a YAML file, a directory of YAML files, or
/// an in-memory document.
pub struct YamlConditionSource {
    origin: Origin,
}

impl YamlConditionSource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            origin: Origin::Path(path.into()),
        }
    }

    pub fn inline(yaml: impl Into<String>) -> Self {
        Self {
            origin: Origin::Inline(yaml.into()),
        }
    }

    #[instrument(skip(self))]
    fn load_path(&self, path: &Path) -> Result<Vec<RawCondition>, VigilError> {
        if !path.exists() {
            return Err(InfrastructureError::ConfigNotFound(path.display().to_string()).into());
        }
        if path.is_file() {
            let content = fs::read_to_string(path)?;
            return parse_document(&content, &path.display().to_string());
        }

        let mut files: Vec<PathBuf> = WalkDir::new(path)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.into_path())
            .filter(|p| {
                p.is_file()
                    && p.extension()
                        .and_then(|s| s.to_str())
                        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
            })
            .collect();
        files.sort();

        let mut seen: HashMap<String, String> = HashMap::new();
        let mut conditions = Vec::new();

        for file in files {
            let content = fs::read_to_string(&file)?;
            let origin = file.display().to_string();
            for raw in parse_document(&content, &origin)? {
                if seen.insert(raw.report_type.clone(), origin.clone()).is_some() {
                    return Err(DomainError::DuplicateReportType {
                        report_type: raw.report_type,
                    }
                    .into());
                }
                conditions.push(raw);
            }
            debug!(file = %origin, "Conditions file read");
        }

        Ok(conditions)
    }
}

fn parse_document(content: &str, origin: &str) -> Result<Vec<RawCondition>, VigilError> {
    let file: ConditionsFile =
        serde_yaml::from_str(content).map_err(InfrastructureError::YamlError)?;

    file.report_conditions
        .into_iter()
        .map(|(key, body)| {
            let report_type = key.as_str().map(str::to_string).ok_or_else(|| {
                InfrastructureError::ConfigError(format!(
                    "report type keys must be strings (in {})",
                    origin
                ))
            })?;
            Ok(RawCondition {
                report_type,
                origin: origin.to_string(),
                body,
            })
        })
        .collect()
}

impl ConditionSource for YamlConditionSource {
    fn load_conditions(&self) -> Result<Vec<RawCondition>, VigilError> {
        match &self.origin {
            Origin::Path(path) => self.load_path(path),
            Origin::Inline(yaml) => parse_document(yaml, "<inline>"),
        }
    }

    fn describe(&self) -> String {
        match &self.origin {
            Origin::Path(path) => path.display().to_string(),
            Origin::Inline(_) => "<inline>".to_string(),
        }
    }
}
