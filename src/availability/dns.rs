//! DNS-over-HTTPS fallback checker

use crate::availability::{normalize, register_url, AvailabilityCheck, DEFAULT_CURRENCY};
use crate::error::{Result, ScoutError};
use crate::types::{AvailabilityStatus, CheckSource, DomainStatusRecord, ResolverConfig};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Infers registration from the presence of A records
pub struct DnsChecker {
    client: Client,
    base_url: String,
    register_search_url: String,
    timeout: Duration,
}

impl DnsChecker {
    pub fn new(config: &ResolverConfig) -> Self {
        Self::with_client(super::build_http_client(config), config)
    }

    pub fn with_client(client: Client, config: &ResolverConfig) -> Self {
        Self {
            client,
            base_url: config.doh_base_url.trim_end_matches('/').to_string(),
            register_search_url: config.register_search_url.clone(),
            timeout: config.timeout,
        }
    }

    fn transport_error(&self, domain: &str, err: reqwest::Error) -> ScoutError {
        if err.is_timeout() {
            ScoutError::timeout(format!("DNS lookup for {}", domain), Some(self.timeout))
        } else {
            ScoutError::dns(domain, err.to_string(), None)
        }
    }

    fn build_record(&self, domain: &str, response: DohResponse) -> DomainStatusRecord {
        let answers = response.answer.map_or(0, |a| a.len());
        let status = normalize::from_dns_answer_count(answers);
        let summary = match status {
            AvailabilityStatus::Taken => "Domain appears to be registered (has DNS records)",
            _ => "Domain appears available (no DNS records found)",
        };

        DomainStatusRecord {
            domain: domain.to_string(),
            status,
            price: None,
            currency: Some(DEFAULT_CURRENCY.to_string()),
            period: None,
            register_url: register_url(&self.register_search_url, domain),
            summary: summary.to_string(),
            source: CheckSource::Dns,
        }
    }
}

#[async_trait]
impl AvailabilityCheck for DnsChecker {
    async fn check_domain(&self, domain: &str) -> Result<DomainStatusRecord> {
        let url = format!("{}/resolve", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("name", domain), ("type", "A")])
            .header("Accept", "application/dns-json")
            .send()
            .await
            .map_err(|e| self.transport_error(domain, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScoutError::dns(
                domain,
                format!("resolver answered with status {}", status),
                Some(status.as_u16()),
            ));
        }

        let body: DohResponse = response
            .json()
            .await
            .map_err(|e| ScoutError::dns(domain, format!("unreadable resolver response: {}", e), None))?;

        Ok(self.build_record(domain, body))
    }

    fn source(&self) -> CheckSource {
        CheckSource::Dns
    }
}

/// DoH JSON response; only the answer section matters here
#[derive(Debug, Deserialize)]
struct DohResponse {
    #[serde(rename = "Answer", default)]
    answer: Option<Vec<serde_json::Value>>,
}
