// vigil-core/src/ports/phraser.rs

use async_trait::async_trait;
use serde::Serialize;

use crate::error::VigilError;

/// Everything an external phrasing service receives. `facts` is always the
/// complete clause list of the verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhrasingRequest {
    pub report_type: String,
    pub status: String,
    pub prompt: String,
    pub facts: Vec<String>,
    pub language: String,
}

#[async_trait]
pub trait AdvisoryPhraser: Send + Sync {
    /// Returns fluent prose for the request. Formatting only: it must not be
    /// used to decide anything about readiness.
    async fn phrase(&self, request: &PhrasingRequest) -> Result<String, VigilError>;
}
