// src/domain/project/configuration.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Backend used to answer metadata queries for a domain.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    #[default]
    DuckDB,
    DataFusion,
    Snapshot,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,

    /// Conditions file or directory, relative to the project directory.
    #[serde(default = "default_conditions")]
    pub conditions: String,

    #[serde(rename = "target-path", default = "default_target_path")]
    pub target_path: String,

    #[serde(default)]
    pub collector: CollectorConfig,

    #[serde(default)]
    pub advisory: AdvisoryConfig,

    #[serde(default)]
    pub domains: BTreeMap<String, DomainConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CollectorConfig {
    #[serde(default = "default_collector_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_collector_timeout_ms(),
        }
    }
}

impl CollectorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AdvisoryConfig {
    #[serde(default = "default_language")]
    pub language: String,
    /// Phrasing service endpoint. Without it, messages stay deterministic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default = "default_advisory_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            endpoint: None,
            timeout_ms: default_advisory_timeout_ms(),
        }
    }
}

impl AdvisoryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DomainConfig {
    #[serde(default)]
    pub engine: Engine,
    /// DuckDB file, DataFusion directory or snapshot YAML, relative to the project.
    pub path: String,
    /// Timestamp column whose maximum is the table's last update (DuckDB only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freshness_column: Option<String>,
}

fn default_version() -> String {
    "1.0".to_string()
}
fn default_conditions() -> String {
    "config/report_conditions.yaml".to_string()
}
fn default_target_path() -> String {
    "target".to_string()
}
fn default_collector_timeout_ms() -> u64 {
    10_000
}
fn default_language() -> String {
    "en".to_string()
}
fn default_advisory_timeout_ms() -> u64 {
    15_000
}
