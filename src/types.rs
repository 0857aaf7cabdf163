//! Core types and structures for domain-scout

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::str::FromStr;
use std::time::Duration;

/// Domain availability status
///
/// Deserialization goes through the status normalizer, so any upstream
/// vocabulary (`inactive`, `registered`, ...) lands on one of the three
/// values and unrecognized labels become `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum AvailabilityStatus {
    Available,
    Taken,
    Unknown,
}

impl std::fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AvailabilityStatus::Available => write!(f, "available"),
            AvailabilityStatus::Taken => write!(f, "taken"),
            AvailabilityStatus::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for AvailabilityStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(crate::availability::normalize::from_label(s))
    }
}

impl From<String> for AvailabilityStatus {
    fn from(label: String) -> Self {
        crate::availability::normalize::from_label(&label)
    }
}

/// Which signal source produced a status record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckSource {
    Registrar,
    Dns,
    #[default]
    Fallback,
}

impl std::fmt::Display for CheckSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckSource::Registrar => write!(f, "registrar"),
            CheckSource::Dns => write!(f, "dns"),
            CheckSource::Fallback => write!(f, "fallback"),
        }
    }
}

/// Availability of one candidate domain, as handed to the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainStatusRecord {
    pub domain: String,
    pub status: AvailabilityStatus,
    /// Major currency units; a JSON number on the wire
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
    #[serde(rename = "registerURL")]
    pub register_url: String,
    pub summary: String,
    /// Not part of the wire shape; kept for logs and tests.
    #[serde(skip)]
    pub source: CheckSource,
}

impl DomainStatusRecord {
    pub fn is_available(&self) -> bool {
        self.status == AvailabilityStatus::Available
    }

    /// Price rendered for display, e.g. `$11.99`
    pub fn display_price(&self) -> Option<String> {
        let price = self.price?;
        match self.currency.as_deref() {
            None | Some("USD") => Some(format!("${:.2}", price)),
            Some(code) => Some(format!("{:.2} {}", price, code)),
        }
    }
}

/// Chat participant role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl std::fmt::Display for ChatRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatRole::User => write!(f, "user"),
            ChatRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// One message of a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            created_at: Some(Utc::now()),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            created_at: Some(Utc::now()),
        }
    }
}

/// What the user is trying to do with their message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    DomainRequest,
    ProjectDiscussion,
    Clarification,
    #[serde(other)]
    General,
}

impl Intent {
    /// Whether the message is substantial enough to name a conversation after
    pub fn names_conversation(&self) -> bool {
        matches!(self, Intent::DomainRequest | Intent::ProjectDiscussion)
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Intent::DomainRequest => write!(f, "domain_request"),
            Intent::ProjectDiscussion => write!(f, "project_discussion"),
            Intent::Clarification => write!(f, "clarification"),
            Intent::General => write!(f, "general"),
        }
    }
}

/// Domain name proposed by the LLM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainSuggestion {
    pub domain: String,
    pub explanation: String,
    /// How well the name matches the user's intent, 1-10
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<u8>,
    /// e.g. "brandable", "descriptive", "keyword-rich"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl DomainSuggestion {
    pub fn new(domain: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            explanation: explanation.into(),
            relevance_score: None,
            category: None,
            reasoning: None,
        }
    }
}

/// Parsed LLM turn: reply text, intent and any domain suggestions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationalResponse {
    pub assistant_reply: String,
    pub domain_suggestions: Vec<DomainSuggestion>,
    pub intent: Intent,
    pub needs_more_info: bool,
}

/// A suggestion joined with its availability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainWithStatus {
    pub suggestion: DomainSuggestion,
    pub availability: DomainStatusRecord,
}

/// Configuration for suggestion generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionConfig {
    pub max_suggestions: usize,
    pub tlds: Vec<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Number of most recent history messages sent with each request
    pub history_limit: usize,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            max_suggestions: 5,
            tlds: vec!["com".to_string()],
            temperature: 0.9,
            max_tokens: 1024,
            history_limit: 10,
        }
    }
}

/// Registrar API key pair
#[derive(Clone, PartialEq, Eq)]
pub struct RegistrarCredentials {
    pub api_key: String,
    pub api_secret: String,
}

impl RegistrarCredentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Value for the `Authorization` header
    pub fn authorization(&self) -> String {
        format!("sso-key {}:{}", self.api_key, self.api_secret)
    }
}

impl std::fmt::Debug for RegistrarCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrarCredentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

pub const DEFAULT_REGISTRAR_URL: &str = "https://api.godaddy.com";
pub const DEFAULT_DOH_URL: &str = "https://dns.google";
pub const DEFAULT_REGISTER_SEARCH_URL: &str = "https://www.godaddy.com/domainsearch/find";

/// Configuration for availability resolution
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// `None` routes every lookup through DNS
    pub registrar: Option<RegistrarCredentials>,
    pub registrar_base_url: String,
    pub doh_base_url: String,
    pub register_search_url: String,
    /// Delay between consecutive registrar calls
    pub pacing: Duration,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            registrar: None,
            registrar_base_url: DEFAULT_REGISTRAR_URL.to_string(),
            doh_base_url: DEFAULT_DOH_URL.to_string(),
            register_search_url: DEFAULT_REGISTER_SEARCH_URL.to_string(),
            pacing: Duration::from_millis(150),
            timeout: Duration::from_secs(10),
            user_agent: concat!("domain-scout/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// LLM configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: String,
    pub model: String,
    pub api_key: String,
    pub base_url: Option<String>,
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openrouter".to_string(),
            model: "meta-llama/llama-3-8b-instruct".to_string(),
            api_key: String::new(),
            base_url: None,
            temperature: 0.9,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(price: Option<Decimal>, currency: Option<&str>) -> DomainStatusRecord {
        DomainStatusRecord {
            domain: "getflow.com".to_string(),
            status: AvailabilityStatus::Available,
            price,
            currency: currency.map(str::to_string),
            period: Some(1),
            register_url: "https://www.godaddy.com/domainsearch/find?domainToCheck=getflow.com".to_string(),
            summary: "Available for registration on GoDaddy".to_string(),
            source: CheckSource::Registrar,
        }
    }

    #[test]
    fn test_record_wire_shape() {
        let json = serde_json::to_value(record(Some(Decimal::new(1199, 2)), Some("USD"))).unwrap();

        assert_eq!(json["domain"], "getflow.com");
        assert_eq!(json["status"], "available");
        assert_eq!(json["price"], 11.99);
        assert!(json["registerURL"].as_str().unwrap().contains("getflow.com"));
        assert!(json.get("source").is_none());
        assert!(json.get("register_url").is_none());
    }

    #[test]
    fn test_price_reads_back_from_number() {
        let record: DomainStatusRecord = serde_json::from_str(
            r#"{"domain":"getflow.com","status":"available","price":11.99,"currency":"USD","registerURL":"https://www.godaddy.com/domainsearch/find?domainToCheck=getflow.com","summary":"ok"}"#,
        )
        .unwrap();
        assert_eq!(record.price, Some(Decimal::new(1199, 2)));

        let record: DomainStatusRecord = serde_json::from_str(
            r#"{"domain":"getflow.com","status":"unknown","registerURL":"https://www.godaddy.com/domainsearch/find?domainToCheck=getflow.com","summary":"ok"}"#,
        )
        .unwrap();
        assert_eq!(record.price, None);
    }

    #[test]
    fn test_record_omits_missing_price() {
        let json = serde_json::to_value(record(None, Some("USD"))).unwrap();
        assert!(json.get("price").is_none());
    }

    #[test]
    fn test_status_deserializes_foreign_vocabulary() {
        let status: AvailabilityStatus = serde_json::from_str("\"inactive\"").unwrap();
        assert_eq!(status, AvailabilityStatus::Available);

        let status: AvailabilityStatus = serde_json::from_str("\"registered\"").unwrap();
        assert_eq!(status, AvailabilityStatus::Taken);

        let status: AvailabilityStatus = serde_json::from_str("\"checking\"").unwrap();
        assert_eq!(status, AvailabilityStatus::Unknown);
    }

    #[test]
    fn test_display_price() {
        assert_eq!(
            record(Some(Decimal::new(1199, 2)), Some("USD")).display_price().as_deref(),
            Some("$11.99")
        );
        assert_eq!(
            record(Some(Decimal::new(9, 0)), Some("EUR")).display_price().as_deref(),
            Some("9.00 EUR")
        );
        assert_eq!(record(None, None).display_price(), None);
    }

    #[test]
    fn test_intent_unknown_values_are_general() {
        let intent: Intent = serde_json::from_str("\"small_talk\"").unwrap();
        assert_eq!(intent, Intent::General);
        assert!(Intent::DomainRequest.names_conversation());
        assert!(!Intent::Clarification.names_conversation());
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let creds = RegistrarCredentials::new("key", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("hunter2"));
        assert_eq!(creds.authorization(), "sso-key key:hunter2");
    }
}
