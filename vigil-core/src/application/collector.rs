// vigil-core/src/application/collector.rs

use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::domain::condition::ConditionSpec;
use crate::domain::metadata::{DatasetMetadata, MetadataSet};
use crate::ports::metadata::MetadataSource;

/// Which tables to ask each domain for, in domain order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FetchPlan {
    batches: Vec<(String, Vec<String>)>,
}

impl FetchPlan {
    /// Pinned tables (`table_domains`) go to their domain only; every other
    /// table is probed in each of `domains`.
    pub fn for_spec(spec: &ConditionSpec, domains: &[String]) -> Self {
        let mut plan = Self::default();
        for table in &spec.required_tables {
            match spec.pinned_domain(table) {
                Some(domain) => plan.push(domain, table),
                None => {
                    for domain in domains {
                        plan.push(domain, table);
                    }
                }
            }
        }
        plan
    }

    fn push(&mut self, domain: &str, table: &str) {
        match self.batches.iter_mut().find(|(d, _)| d == domain) {
            Some((_, tables)) => {
                if !tables.iter().any(|t| t == table) {
                    tables.push(table.to_string());
                }
            }
            None => self
                .batches
                .push((domain.to_string(), vec![table.to_string()])),
        }
    }

    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.batches.iter().map(|(d, _)| d.as_str())
    }

    pub fn tables_for(&self, domain: &str) -> &[String] {
        self.batches
            .iter()
            .find(|(d, _)| d == domain)
            .map(|(_, t)| t.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DomainFailure {
    pub domain: String,
    pub reason: String,
}

/// Merged result of one fan-out.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CollectionOutcome {
    pub metadata: MetadataSet,
    pub queried_domains: usize,
    pub failed_domains: Vec<DomainFailure>,
}

impl CollectionOutcome {
    /// True when nothing could be asked, or every domain asked failed.
    pub fn is_unavailable(&self) -> bool {
        self.queried_domains == 0 || self.failed_domains.len() == self.queried_domains
    }

    pub fn unavailable_reason(&self) -> String {
        if self.queried_domains == 0 {
            return "no domain to query".to_string();
        }
        let details: Vec<String> = self
            .failed_domains
            .iter()
            .map(|f| f.reason.clone())
            .collect();
        format!("every domain failed: {}", details.join("; "))
    }
}

/// Fans metadata requests out to domains concurrently.
pub struct MetadataCollector {
    source: Arc<dyn MetadataSource>,
    timeout: Duration,
}

impl MetadataCollector {
    pub fn new(source: Arc<dyn MetadataSource>, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    /// One batched call per domain, all in flight at once, joined before
    /// merging. Never fails: domain errors become unknown tables.
    #[instrument(skip_all, fields(domains = plan.batches.len()))]
    pub async fn fetch(&self, plan: &FetchPlan) -> CollectionOutcome {
        let calls = plan.batches.iter().map(|(domain, tables)| async move {
            let answer =
                tokio::time::timeout(self.timeout, self.source.list_table_metadata(domain, tables))
                    .await;
            let result = match answer {
                Ok(Ok(found)) => Ok(found),
                Ok(Err(e)) => Err(format!("domain '{}' failed: {}", domain, e)),
                Err(_) => Err(format!(
                    "domain '{}' timed out after {} ms",
                    domain,
                    self.timeout.as_millis()
                )),
            };
            (domain, tables, result)
        });

        let answers = join_all(calls).await;

        // Merge after the barrier, in plan order.
        let mut outcome = CollectionOutcome {
            queried_domains: answers.len(),
            ..Default::default()
        };
        for (domain, tables, result) in answers {
            match result {
                Ok(mut found) => {
                    debug!(domain = %domain, tables = found.len(), "Domain answered");
                    for table in tables {
                        let meta = match found.remove(table) {
                            Some(m) => DatasetMetadata {
                                table: table.clone(),
                                state: m.state,
                            },
                            None => DatasetMetadata::unknown(
                                table,
                                format!("not reported by domain '{}'", domain),
                            ),
                        };
                        merge(&mut outcome.metadata, table, meta);
                    }
                }
                Err(reason) => {
                    warn!(domain = %domain, reason = %reason, "Domain fetch failed");
                    for table in tables {
                        merge(
                            &mut outcome.metadata,
                            table,
                            DatasetMetadata::unknown(table, reason.clone()),
                        );
                    }
                    outcome.failed_domains.push(DomainFailure {
                        domain: domain.clone(),
                        reason,
                    });
                }
            }
        }
        outcome
    }
}

// present > unknown > absent; the earlier domain keeps ties.
fn merge(into: &mut HashMap<String, DatasetMetadata>, table: &str, candidate: DatasetMetadata) {
    match into.get(table) {
        Some(existing) if existing.precedence() >= candidate.precedence() => {}
        _ => {
            into.insert(table.to_string(), candidate);
        }
    }
}
