//! Availability resolver: registrar first, DNS second, static fallback last

use crate::availability::{fallback_record, AvailabilityCheck, DnsChecker, RegistrarChecker};
use crate::error::Result;
use crate::types::{AvailabilityStatus, DomainStatusRecord, ResolverConfig};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Resolves a batch of candidate domains into status records.
///
/// The output always has one record per input, in input order; no upstream
/// failure is ever surfaced to the caller.
pub struct AvailabilityResolver {
    registrar: Option<Arc<dyn AvailabilityCheck>>,
    dns: Arc<dyn AvailabilityCheck>,
    pacing: Duration,
    register_search_url: String,
}

impl AvailabilityResolver {
    /// Build the resolver from explicit configuration.
    ///
    /// The registrar source is only wired in when credentials are present.
    pub fn new(config: &ResolverConfig) -> Self {
        let client = super::build_http_client(config);

        let registrar = config.registrar.clone().map(|credentials| {
            Arc::new(RegistrarChecker::with_client(client.clone(), credentials, config))
                as Arc<dyn AvailabilityCheck>
        });
        let dns = Arc::new(DnsChecker::with_client(client, config));

        Self::with_sources(registrar, dns, config)
    }

    /// Build the resolver around caller-provided sources
    pub fn with_sources(
        registrar: Option<Arc<dyn AvailabilityCheck>>,
        dns: Arc<dyn AvailabilityCheck>,
        config: &ResolverConfig,
    ) -> Self {
        Self {
            registrar,
            dns,
            pacing: config.pacing,
            register_search_url: config.register_search_url.clone(),
        }
    }

    /// Whether live registrar lookups are configured
    pub fn has_registrar(&self) -> bool {
        self.registrar.is_some()
    }

    /// Resolve every domain, in order
    pub async fn resolve(&self, domains: &[String]) -> Vec<DomainStatusRecord> {
        let batch_start = Instant::now();

        let records = match &self.registrar {
            Some(registrar) => match self.resolve_via_registrar(registrar.as_ref(), domains).await {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!(
                        source = %registrar.source(),
                        error = %e,
                        "Registrar unavailable for batch, using DNS for all domains"
                    );
                    self.resolve_via_dns(domains).await
                }
            },
            None => {
                tracing::debug!("No registrar credentials, using DNS for all domains");
                self.resolve_via_dns(domains).await
            }
        };

        let available = records
            .iter()
            .filter(|r| r.status == AvailabilityStatus::Available)
            .count();
        tracing::info!(
            domains_requested = %domains.len(),
            available = %available,
            batch_duration_ms = %batch_start.elapsed().as_millis(),
            "Availability batch resolved"
        );

        records
    }

    /// Resolve a single domain through the full chain
    pub async fn resolve_one(&self, domain: &str) -> DomainStatusRecord {
        let batch = [domain.to_string()];
        self.resolve(&batch)
            .await
            .pop()
            .unwrap_or_else(|| fallback_record(domain, &self.register_search_url))
    }

    async fn resolve_via_registrar(
        &self,
        registrar: &dyn AvailabilityCheck,
        domains: &[String],
    ) -> Result<Vec<DomainStatusRecord>> {
        registrar.ensure_ready()?;

        let mut records = Vec::with_capacity(domains.len());
        for (index, domain) in domains.iter().enumerate() {
            if index > 0 && !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }

            let start = Instant::now();
            let record = match registrar.check_domain(domain).await {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!(domain = %domain, error = %e, "Registrar check failed, falling back to DNS");
                    self.check_dns(domain).await
                }
            };

            tracing::debug!(
                domain = %domain,
                source = %record.source,
                status = %record.status,
                duration_ms = %start.elapsed().as_millis(),
                "Domain check completed"
            );
            records.push(record);
        }

        Ok(records)
    }

    async fn resolve_via_dns(&self, domains: &[String]) -> Vec<DomainStatusRecord> {
        let mut records = Vec::with_capacity(domains.len());
        for domain in domains {
            let start = Instant::now();
            let record = self.check_dns(domain).await;

            tracing::debug!(
                domain = %domain,
                source = %record.source,
                status = %record.status,
                duration_ms = %start.elapsed().as_millis(),
                "Domain check completed"
            );
            records.push(record);
        }
        records
    }

    async fn check_dns(&self, domain: &str) -> DomainStatusRecord {
        match self.dns.check_domain(domain).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(domain = %domain, error = %e, "All availability sources failed");
                fallback_record(domain, &self.register_search_url)
            }
        }
    }
}
