// vigil-core/src/domain/condition/mod.rs

pub mod spec;

pub use spec::{ConditionDefinition, ConditionSpec, is_valid_identifier};

/// One `report_conditions` entry as read from a configuration source,
/// not yet validated.
#[derive(Debug, Clone)]
pub struct RawCondition {
    pub report_type: String,
    /// Where the entry came from (file path), for diagnostics.
    pub origin: String,
    pub body: serde_yaml::Value,
}
