// vigil-core/src/lib.rs

#![allow(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (async contracts towards metadata backends and phrasing services)
pub mod ports;

// 2. Domain (conditions, metadata, verdicts, the pure evaluator)
// Depends on nothing else in the crate.
pub mod domain;

// 3. Infrastructure (YAML config, DuckDB / DataFusion / snapshot backends, HTTP, Jinja)
pub mod infrastructure;

// 4. Application (registry, collector, advisory, orchestrator)
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use application::{ConditionRegistry, GateOrchestrator, MetadataCollector};
pub use domain::verdict::{Finding, FindingKind, GateStatus, Verdict};
pub use error::VigilError;
