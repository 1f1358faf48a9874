pub mod datafusion;
pub mod duckdb;
pub mod http_phraser;
pub mod router;
pub mod snapshot;

pub use self::datafusion::DataFusionMetadataSource;
pub use self::duckdb::DuckDbMetadataSource;
pub use http_phraser::HttpAdvisoryPhraser;
pub use router::DomainRouter;
pub use snapshot::SnapshotMetadataSource;
