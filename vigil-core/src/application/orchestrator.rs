// vigil-core/src/application/orchestrator.rs

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::application::advisory::AdvisoryService;
use crate::application::collector::{CollectionOutcome, FetchPlan, MetadataCollector};
use crate::application::registry::ConditionRegistry;
use crate::domain::condition::ConditionSpec;
use crate::domain::error::DomainError;
use crate::domain::gate::GateEvaluator;
use crate::domain::verdict::Verdict;
use crate::error::VigilError;

/// Runs one readiness check end to end:
/// registry lookup, metadata fan-out, evaluation, advisory message.
pub struct GateOrchestrator {
    registry: Arc<ConditionRegistry>,
    collector: MetadataCollector,
    advisory: AdvisoryService,
    /// Queried when neither the caller nor the conditions name any domain.
    default_domains: Vec<String>,
}

impl GateOrchestrator {
    pub fn new(
        registry: Arc<ConditionRegistry>,
        collector: MetadataCollector,
        advisory: AdvisoryService,
    ) -> Self {
        Self {
            registry,
            collector,
            advisory,
            default_domains: Vec::new(),
        }
    }

    pub fn with_default_domains(mut self, domains: Vec<String>) -> Self {
        self.default_domains = domains;
        self
    }

    pub async fn check_readiness(
        &self,
        report_type: &str,
        domains_override: Option<&[String]>,
    ) -> Result<Verdict, VigilError> {
        self.check_readiness_at(report_type, domains_override, Utc::now())
            .await
    }

    #[instrument(skip_all, fields(report_type = %report_type))]
    pub async fn check_readiness_at(
        &self,
        report_type: &str,
        domains_override: Option<&[String]>,
        now: DateTime<Utc>,
    ) -> Result<Verdict, VigilError> {
        let (spec, outcome) = self.collect(report_type, domains_override).await?;

        let mut verdict = if outcome.is_unavailable() {
            let reason = DomainError::MetadataUnavailable(outcome.unavailable_reason());
            warn!(error = %reason, "Metadata unavailable, blocking without evaluation");
            GateEvaluator::unavailable(&spec, &reason.to_string())
        } else {
            GateEvaluator::evaluate(&spec, &outcome.metadata, now)
        };

        verdict.message = self.advisory.explain(&verdict, &spec).await;

        info!(
            status = %verdict.status,
            missing = verdict.missing.len(),
            warnings = verdict.warnings.len(),
            "Readiness check complete"
        );
        Ok(verdict)
    }

    /// Looks up the conditions and gathers their metadata without evaluating them.
    pub async fn collect(
        &self,
        report_type: &str,
        domains_override: Option<&[String]>,
    ) -> Result<(Arc<ConditionSpec>, CollectionOutcome), VigilError> {
        let spec = self.registry.get(report_type)?;
        let domains = self.effective_domains(&spec, domains_override);
        let plan = FetchPlan::for_spec(&spec, &domains);
        let outcome = self.collector.fetch(&plan).await;
        Ok((spec, outcome))
    }

    fn effective_domains(&self, spec: &ConditionSpec, overridden: Option<&[String]>) -> Vec<String> {
        match overridden {
            Some(domains) if !domains.is_empty() => domains.to_vec(),
            _ if !spec.domains.is_empty() => spec.domains.clone(),
            _ => self.default_domains.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::metadata::{DatasetMetadata, TableStats};
    use crate::domain::verdict::{FindingKind, GateStatus};
    use crate::infrastructure::config::YamlConditionSource;
    use crate::ports::metadata::MetadataSource;
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::{Duration as ChronoDuration, TimeZone};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    const CONDITIONS: &str = r#"
report_conditions:
  monthly_sales:
    description: Monthly sales
    required_tables: [sales_summary, profit_margin]
    required_columns:
      sales_summary: [region, revenue]
    min_rows: 1
    freshness_days: 35
    domains: [SALES_GENIE]
  unscoped:
    required_tables: [sales_summary]
"#;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap()
    }

    /// Domain name -> tables it knows; `None` makes the domain fail.
    struct FakeDomains {
        domains: HashMap<String, Option<Vec<DatasetMetadata>>>,
        asked: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl MetadataSource for FakeDomains {
        async fn list_table_metadata(
            &self,
            domain: &str,
            tables: &[String],
        ) -> Result<HashMap<String, DatasetMetadata>, VigilError> {
            self.asked.lock().unwrap().push(domain.to_string());
            match self.domains.get(domain) {
                Some(Some(known)) => Ok(tables
                    .iter()
                    .map(|t| {
                        let meta = known
                            .iter()
                            .find(|m| &m.table == t)
                            .cloned()
                            .unwrap_or_else(|| DatasetMetadata::absent(t));
                        (t.clone(), meta)
                    })
                    .collect()),
                _ => Err(VigilError::InternalError("connection refused".into())),
            }
        }

        fn engine_name(&self) -> &str {
            "fake"
        }
    }

    fn orchestrator(
        domains: Vec<(&str, Option<Vec<DatasetMetadata>>)>,
    ) -> Result<(GateOrchestrator, Arc<Mutex<Vec<String>>>)> {
        let registry = Arc::new(ConditionRegistry::new());
        registry.load_all(Arc::new(YamlConditionSource::inline(CONDITIONS)))?;

        let asked = Arc::new(Mutex::new(Vec::new()));
        let source = FakeDomains {
            domains: domains
                .into_iter()
                .map(|(d, t)| (d.to_string(), t))
                .collect(),
            asked: asked.clone(),
        };
        let collector = MetadataCollector::new(Arc::new(source), Duration::from_secs(1));
        Ok((
            GateOrchestrator::new(registry, collector, AdvisoryService::deterministic()),
            asked,
        ))
    }

    fn healthy_sales() -> Vec<DatasetMetadata> {
        vec![
            DatasetMetadata::present(
                "sales_summary",
                TableStats::new(["region", "revenue"], 1200, Some(now() - ChronoDuration::days(2))),
            ),
            DatasetMetadata::present(
                "profit_margin",
                TableStats::new(["margin"], 40, Some(now() - ChronoDuration::days(1))),
            ),
        ]
    }

    #[tokio::test]
    async fn test_ready_report() -> Result<()> {
        let (orch, _) = orchestrator(vec![("SALES_GENIE", Some(healthy_sales()))])?;
        let verdict = orch.check_readiness_at("monthly_sales", None, now()).await?;

        assert_eq!(verdict.status, GateStatus::Ready);
        assert!(verdict.missing.is_empty() && verdict.warnings.is_empty());
        assert_eq!(verdict.message, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_blocked_report_carries_message() -> Result<()> {
        let (orch, _) = orchestrator(vec![(
            "SALES_GENIE",
            Some(vec![healthy_sales().remove(0)]),
        )])?;
        let verdict = orch.check_readiness_at("monthly_sales", None, now()).await?;

        assert_eq!(verdict.status, GateStatus::Blocked);
        assert_eq!(verdict.missing.len(), 1);
        assert_eq!(verdict.missing[0].kind, FindingKind::TableAbsent);
        let message = verdict.message.expect("blocked verdicts explain themselves");
        assert!(message.contains("table profit_margin is missing"));
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_report_type_propagates() -> Result<()> {
        let (orch, _) = orchestrator(vec![("SALES_GENIE", Some(healthy_sales()))])?;
        let err = orch.check_readiness("weekly_sales", None).await.unwrap_err();
        assert!(matches!(
            err,
            VigilError::Domain(DomainError::UnknownReportType(ref rt)) if rt == "weekly_sales"
        ));
        assert!(err.is_caller_error());
        Ok(())
    }

    #[tokio::test]
    async fn test_total_collector_failure_is_a_synthetic_block() -> Result<()> {
        let (orch, _) = orchestrator(vec![("SALES_GENIE", None)])?;
        let verdict = orch.check_readiness_at("monthly_sales", None, now()).await?;

        assert_eq!(verdict.status, GateStatus::Blocked);
        assert_eq!(verdict.missing.len(), 2);
        for finding in &verdict.missing {
            match &finding.kind {
                FindingKind::TableUnknown { reason } => {
                    assert!(reason.starts_with("Metadata unavailable"));
                    assert!(reason.contains("connection refused"));
                }
                other => panic!("unexpected finding {:?}", other),
            }
        }
        assert!(verdict.message.is_some());
        Ok(())
    }

    /// Never answers within any reasonable timeout.
    struct StalledDomains;

    #[async_trait]
    impl MetadataSource for StalledDomains {
        async fn list_table_metadata(
            &self,
            _domain: &str,
            _tables: &[String],
        ) -> Result<HashMap<String, DatasetMetadata>, VigilError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(HashMap::new())
        }

        fn engine_name(&self) -> &str {
            "stalled"
        }
    }

    #[tokio::test]
    async fn test_every_domain_timing_out_is_a_synthetic_block() -> Result<()> {
        let registry = Arc::new(ConditionRegistry::new());
        registry.load_all(Arc::new(YamlConditionSource::inline(CONDITIONS)))?;
        let collector = MetadataCollector::new(Arc::new(StalledDomains), Duration::from_millis(50));
        let orch = GateOrchestrator::new(registry, collector, AdvisoryService::deterministic());

        let overridden = vec!["SALES_GENIE".to_string(), "REGION_GENIE".to_string()];
        let verdict = orch
            .check_readiness_at("monthly_sales", Some(&overridden), now())
            .await?;

        assert_eq!(verdict.status, GateStatus::Blocked);
        assert!(verdict.warnings.is_empty());
        let tables: Vec<&str> = verdict.missing.iter().map(|f| f.table.as_str()).collect();
        assert_eq!(tables, ["sales_summary", "profit_margin"]);
        for finding in &verdict.missing {
            match &finding.kind {
                FindingKind::TableUnknown { reason } => {
                    assert!(reason.starts_with("Metadata unavailable"));
                    assert!(reason.contains("timed out after 50 ms"));
                }
                other => panic!("unexpected finding {:?}", other),
            }
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_domain_override_and_defaults() -> Result<()> {
        let (orch, asked) = orchestrator(vec![
            ("SALES_GENIE", Some(vec![])),
            ("BACKUP_GENIE", Some(healthy_sales())),
        ])?;

        let overridden = vec!["BACKUP_GENIE".to_string()];
        let verdict = orch
            .check_readiness_at("monthly_sales", Some(&overridden), now())
            .await?;
        assert_eq!(verdict.status, GateStatus::Ready);
        assert_eq!(*asked.lock().unwrap(), ["BACKUP_GENIE"]);

        // No domains anywhere: nothing to query
        let verdict = orch.check_readiness_at("unscoped", None, now()).await?;
        assert_eq!(verdict.status, GateStatus::Blocked);

        let orch = orch.with_default_domains(vec!["BACKUP_GENIE".to_string()]);
        let verdict = orch.check_readiness_at("unscoped", None, now()).await?;
        assert_eq!(verdict.status, GateStatus::Ready);
        Ok(())
    }

    #[tokio::test]
    async fn test_checks_are_idempotent() -> Result<()> {
        let (orch, _) = orchestrator(vec![("SALES_GENIE", Some(vec![healthy_sales().remove(1)]))])?;
        let first = orch.check_readiness_at("monthly_sales", None, now()).await?;
        let second = orch.check_readiness_at("monthly_sales", None, now()).await?;
        assert_eq!(first, second);
        Ok(())
    }
}
