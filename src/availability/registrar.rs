//! Registrar availability checker (GoDaddy domains API)

use crate::availability::{normalize, register_url, AvailabilityCheck, DEFAULT_CURRENCY};
use crate::error::{Result, ScoutError};
use crate::types::{AvailabilityStatus, CheckSource, DomainStatusRecord, RegistrarCredentials, ResolverConfig};
use async_trait::async_trait;
use reqwest::header::HeaderValue;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;

/// Registrar prices come in millionths of the currency unit
const PRICE_SCALE: u32 = 6;

/// Authenticated live availability lookups
pub struct RegistrarChecker {
    client: Client,
    credentials: RegistrarCredentials,
    base_url: String,
    register_search_url: String,
    timeout: Duration,
}

impl RegistrarChecker {
    pub fn new(credentials: RegistrarCredentials, config: &ResolverConfig) -> Self {
        Self::with_client(super::build_http_client(config), credentials, config)
    }

    pub fn with_client(client: Client, credentials: RegistrarCredentials, config: &ResolverConfig) -> Self {
        Self {
            client,
            credentials,
            base_url: config.registrar_base_url.trim_end_matches('/').to_string(),
            register_search_url: config.register_search_url.clone(),
            timeout: config.timeout,
        }
    }

    fn authorization(&self) -> Result<HeaderValue> {
        HeaderValue::from_str(&self.credentials.authorization())
            .map_err(|e| ScoutError::config(format!("Registrar credentials are not a valid header value: {}", e)))
    }

    fn transport_error(&self, domain: &str, err: reqwest::Error) -> ScoutError {
        if err.is_timeout() {
            ScoutError::timeout(format!("Registrar lookup for {}", domain), Some(self.timeout))
        } else {
            ScoutError::registrar(domain, err.to_string(), None)
        }
    }

    fn build_record(&self, domain: &str, response: AvailabilityResponse) -> DomainStatusRecord {
        let status = normalize::from_registrar_flag(response.available);
        let summary = match status {
            AvailabilityStatus::Available => "Available for registration on GoDaddy",
            _ => "Already registered",
        };

        DomainStatusRecord {
            domain: domain.to_string(),
            status,
            price: response.price.map(micros_to_decimal),
            currency: Some(response.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string())),
            period: Some(response.period.unwrap_or(1)),
            register_url: register_url(&self.register_search_url, domain),
            summary: summary.to_string(),
            source: CheckSource::Registrar,
        }
    }
}

/// Convert a micro-unit price into major units, e.g. 11990000 -> 11.99
pub fn micros_to_decimal(micros: i64) -> Decimal {
    Decimal::new(micros, PRICE_SCALE).normalize()
}

#[async_trait]
impl AvailabilityCheck for RegistrarChecker {
    async fn check_domain(&self, domain: &str) -> Result<DomainStatusRecord> {
        let query_domain = domain.trim().to_lowercase();
        let url = format!("{}/v1/domains/available", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("domain", query_domain.as_str())])
            .header("Authorization", self.authorization()?)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| self.transport_error(domain, e))?;

        let status = response.status();
        if !status.is_success() {
            let message = match status.as_u16() {
                401 | 403 => format!("credentials rejected ({})", status),
                429 => "rate limit exceeded (429)".to_string(),
                _ => format!("registrar answered with status {}", status),
            };
            return Err(ScoutError::registrar(domain, message, Some(status.as_u16())));
        }

        let body: AvailabilityResponse = response
            .json()
            .await
            .map_err(|e| ScoutError::registrar(domain, format!("unreadable registrar response: {}", e), None))?;

        tracing::debug!(
            domain = %domain,
            available = body.available,
            "Registrar answered"
        );

        Ok(self.build_record(domain, body))
    }

    fn source(&self) -> CheckSource {
        CheckSource::Registrar
    }

    fn ensure_ready(&self) -> Result<()> {
        self.authorization().map(|_| ())
    }
}

/// `GET /v1/domains/available` response body
#[derive(Debug, Deserialize)]
struct AvailabilityResponse {
    available: bool,
    #[serde(default)]
    price: Option<i64>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    period: Option<u32>,
}
