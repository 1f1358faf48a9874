pub mod configuration;

pub use configuration::{AdvisoryConfig, CollectorConfig, DomainConfig, Engine, ProjectConfig};
