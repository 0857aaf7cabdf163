//! Domain availability resolution
//!
//! Each signal source (registrar API, DNS-over-HTTPS) implements
//! [`AvailabilityCheck`]; the [`AvailabilityResolver`] chains them and
//! degrades to a static "unknown" record when every source fails.

pub mod dns;
pub mod normalize;
pub mod registrar;
pub mod resolver;
pub mod validator;

// Re-export main functionality
pub use dns::DnsChecker;
pub use registrar::RegistrarChecker;
pub use resolver::AvailabilityResolver;
pub use validator::DomainValidator;

use crate::error::Result;
use crate::types::{
    AvailabilityStatus, CheckSource, DomainStatusRecord, ResolverConfig, DEFAULT_REGISTER_SEARCH_URL,
};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Summary used when no source could tell us anything
pub const FALLBACK_SUMMARY: &str = "Click to check availability on GoDaddy";

/// Currency reported when the upstream does not name one
pub const DEFAULT_CURRENCY: &str = "USD";

/// Trait for availability signal sources
#[async_trait]
pub trait AvailabilityCheck: Send + Sync {
    /// Check a single domain. Any `Err` makes the caller fall back.
    async fn check_domain(&self, domain: &str) -> Result<DomainStatusRecord>;

    /// Which source this is
    fn source(&self) -> CheckSource;

    /// Batch-level readiness; an error skips this source for the whole batch
    fn ensure_ready(&self) -> Result<()> {
        Ok(())
    }
}

/// Registrar search page for `domain`, always a well-formed URL
pub fn register_url(search_base: &str, domain: &str) -> String {
    let params = [("domainToCheck", domain)];
    Url::parse_with_params(search_base, &params)
        .or_else(|_| Url::parse_with_params(DEFAULT_REGISTER_SEARCH_URL, &params))
        .map(String::from)
        .unwrap_or_else(|_| DEFAULT_REGISTER_SEARCH_URL.to_string())
}

/// Terminal record for a domain no source could resolve
pub fn fallback_record(domain: &str, search_base: &str) -> DomainStatusRecord {
    DomainStatusRecord {
        domain: domain.to_string(),
        status: AvailabilityStatus::Unknown,
        price: None,
        currency: Some(DEFAULT_CURRENCY.to_string()),
        period: None,
        register_url: register_url(search_base, domain),
        summary: FALLBACK_SUMMARY.to_string(),
        source: CheckSource::Fallback,
    }
}

/// Shared HTTP client for the availability sources
pub(crate) fn build_http_client(config: &ResolverConfig) -> Client {
    Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.as_str())
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to create configured HTTP client: {}. Using default.", e);
            Client::new()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_url_is_well_formed() {
        let url = register_url(DEFAULT_REGISTER_SEARCH_URL, "getflow.com");
        assert_eq!(url, "https://www.godaddy.com/domainsearch/find?domainToCheck=getflow.com");
        assert!(Url::parse(&url).is_ok());
    }

    #[test]
    fn test_register_url_encodes_odd_input() {
        let url = register_url(DEFAULT_REGISTER_SEARCH_URL, "my site&co.com");
        let parsed = Url::parse(&url).unwrap();
        let value = parsed
            .query_pairs()
            .find(|(k, _)| k == "domainToCheck")
            .map(|(_, v)| v.into_owned());
        assert_eq!(value.as_deref(), Some("my site&co.com"));
    }

    #[test]
    fn test_register_url_survives_bad_base() {
        let url = register_url("not a url", "getflow.com");
        assert!(url.starts_with(DEFAULT_REGISTER_SEARCH_URL));
        assert!(url.contains("getflow.com"));
    }

    #[test]
    fn test_fallback_record() {
        let record = fallback_record("getflow.com", DEFAULT_REGISTER_SEARCH_URL);
        assert_eq!(record.status, AvailabilityStatus::Unknown);
        assert_eq!(record.summary, FALLBACK_SUMMARY);
        assert_eq!(record.source, CheckSource::Fallback);
        assert_eq!(record.currency.as_deref(), Some("USD"));
        assert!(!record.register_url.is_empty());
    }
}
