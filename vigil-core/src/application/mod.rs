// vigil-core/src/application/mod.rs

pub mod advisory;
pub mod collector;
pub mod orchestrator;
pub mod ports;
pub mod registry;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Lets the CLI write
// `use vigil_core::application::{ConditionRegistry, GateOrchestrator};`
// without knowing the file layout.

pub use advisory::{ADVISORY_PROMPT, AdvisoryService};
pub use collector::{CollectionOutcome, DomainFailure, FetchPlan, MetadataCollector};
pub use orchestrator::GateOrchestrator;
pub use registry::ConditionRegistry;
