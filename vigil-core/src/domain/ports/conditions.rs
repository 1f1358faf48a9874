use crate::domain::condition::RawCondition;
use crate::error::VigilError;

/// Where readiness conditions come from (a YAML file, a directory, a string...).
pub trait ConditionSource: Send + Sync {
    /// Reads every `report_conditions` entry. Fails only when the source
    /// itself cannot be read or parsed; per-entry problems are left to the
    /// registry's validation.
    fn load_conditions(&self) -> Result<Vec<RawCondition>, VigilError>;

    /// Short description used in logs.
    fn describe(&self) -> String;
}
