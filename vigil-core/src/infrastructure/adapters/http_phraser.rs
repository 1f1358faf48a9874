// vigil-core/src/infrastructure/adapters/http_phraser.rs

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::error::VigilError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::phraser::{AdvisoryPhraser, PhrasingRequest};

#[derive(Debug, Deserialize)]
struct PhrasingResponse {
    text: String,
}

/// Posts the phrasing request as JSON and expects `{"text": "..."}` back.
pub struct HttpAdvisoryPhraser {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpAdvisoryPhraser {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, InfrastructureError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }
}

#[async_trait]
impl AdvisoryPhraser for HttpAdvisoryPhraser {
    #[instrument(skip_all, fields(endpoint = %self.endpoint, report_type = %request.report_type))]
    async fn phrase(&self, request: &PhrasingRequest) -> Result<String, VigilError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(InfrastructureError::Http)?
            .error_for_status()
            .map_err(InfrastructureError::Http)?;

        let body: PhrasingResponse = response.json().await.map_err(InfrastructureError::Http)?;
        debug!(chars = body.text.len(), "Phrasing service answered");

        let text = body.text.trim();
        if text.is_empty() {
            return Err(VigilError::InternalError(
                "phrasing service returned an empty text".to_string(),
            ));
        }
        Ok(text.to_string())
    }
}
