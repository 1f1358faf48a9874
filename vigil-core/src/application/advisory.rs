// vigil-core/src/application/advisory.rs

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{instrument, warn};

use crate::application::ports::TemplateEngine;
use crate::domain::advisory::AdvisoryComposer;
use crate::domain::condition::ConditionSpec;
use crate::domain::verdict::Verdict;
use crate::ports::phraser::{AdvisoryPhraser, PhrasingRequest};

/// Prompt handed to the phrasing service alongside the raw facts.
pub const ADVISORY_PROMPT: &str = "\
You are writing a short notice for people waiting on the {{ description }} report ({{ report_type }}).
The readiness check returned {{ status }}.
Rewrite the facts below as a brief, friendly explanation in language '{{ language }}'.
Do not add, drop or soften any fact. Do not speculate about causes.

Facts:
{{ facts | bullets }}";

struct Phrasing {
    phraser: Arc<dyn AdvisoryPhraser>,
    renderer: Arc<dyn TemplateEngine>,
    language: String,
    timeout: Duration,
}

/// Produces the human-readable message of a verdict.
///
/// The deterministic text from [`AdvisoryComposer`] is always computed first;
/// a configured phraser may replace it, but any phraser failure falls back to
/// that text. The verdict itself is never touched.
pub struct AdvisoryService {
    phrasing: Option<Phrasing>,
}

impl AdvisoryService {
    pub fn deterministic() -> Self {
        Self { phrasing: None }
    }

    pub fn with_phraser(
        phraser: Arc<dyn AdvisoryPhraser>,
        renderer: Arc<dyn TemplateEngine>,
        language: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            phrasing: Some(Phrasing {
                phraser,
                renderer,
                language: language.into(),
                timeout,
            }),
        }
    }

    #[instrument(skip_all, fields(report_type = %verdict.report_type, status = %verdict.status))]
    pub async fn explain(&self, verdict: &Verdict, spec: &ConditionSpec) -> Option<String> {
        let fallback = AdvisoryComposer::explain(verdict, spec)?;
        let Some(phrasing) = &self.phrasing else {
            return Some(fallback);
        };

        let facts = AdvisoryComposer::clauses(verdict);
        let context = json!({
            "report_type": verdict.report_type,
            "description": spec.description,
            "status": verdict.status.as_str(),
            "facts": facts,
            "language": phrasing.language,
        });
        let prompt = match phrasing.renderer.render(ADVISORY_PROMPT, &context) {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "Advisory prompt could not be rendered, using plain text");
                return Some(fallback);
            }
        };

        let request = PhrasingRequest {
            report_type: verdict.report_type.clone(),
            status: verdict.status.as_str().to_string(),
            prompt,
            facts,
            language: phrasing.language.clone(),
        };

        match tokio::time::timeout(phrasing.timeout, phrasing.phraser.phrase(&request)).await {
            Ok(Ok(text)) => Some(text),
            Ok(Err(e)) => {
                warn!(error = %e, "Phrasing service failed, using plain text");
                Some(fallback)
            }
            Err(_) => {
                warn!(timeout_ms = phrasing.timeout.as_millis() as u64, "Phrasing service timed out, using plain text");
                Some(fallback)
            }
        }
    }
}
