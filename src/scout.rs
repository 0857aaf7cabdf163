//! Suggest-then-check pipeline

use crate::availability::{fallback_record, AvailabilityResolver};
use crate::error::Result;
use crate::llm::SuggestionGenerator;
use crate::types::{ChatMessage, ConversationalResponse, DomainStatusRecord, DomainWithStatus, ResolverConfig};
use serde::Serialize;

const TITLE_CHARS: usize = 50;

/// Result of one conversational turn
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoutReply {
    pub response: ConversationalResponse,
    pub domains: Vec<DomainWithStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_title: Option<String>,
}

/// Asks the LLM for names and checks each one for availability
pub struct DomainScout {
    generator: SuggestionGenerator,
    resolver: AvailabilityResolver,
    register_search_url: String,
}

impl DomainScout {
    pub fn new(generator: SuggestionGenerator, resolver: AvailabilityResolver, config: &ResolverConfig) -> Self {
        Self {
            generator,
            resolver,
            register_search_url: config.register_search_url.clone(),
        }
    }

    /// Reply to a user message and check every suggested domain.
    ///
    /// Only the LLM call can fail; availability always yields one record per
    /// suggestion.
    pub async fn suggest_and_check(&self, message: &str, history: &[ChatMessage]) -> Result<ScoutReply> {
        let response = self.generator.respond(message, history).await?;

        let names: Vec<String> = response
            .domain_suggestions
            .iter()
            .map(|s| s.domain.clone())
            .collect();
        let records = if names.is_empty() {
            Vec::new()
        } else {
            self.resolver.resolve(&names).await
        };

        let domains = join_by_index(&response, records, &self.register_search_url);
        let conversation_title = if response.intent.names_conversation() {
            Some(conversation_title(message))
        } else {
            None
        };

        Ok(ScoutReply {
            response,
            domains,
            conversation_title,
        })
    }

    /// Check domains directly, without the LLM
    pub async fn check(&self, domains: &[String]) -> Vec<DomainStatusRecord> {
        self.resolver.resolve(domains).await
    }
}

fn join_by_index(
    response: &ConversationalResponse,
    records: Vec<DomainStatusRecord>,
    register_search_url: &str,
) -> Vec<DomainWithStatus> {
    let mut records = records.into_iter();
    response
        .domain_suggestions
        .iter()
        .map(|suggestion| DomainWithStatus {
            suggestion: suggestion.clone(),
            availability: records
                .next()
                .unwrap_or_else(|| fallback_record(&suggestion.domain, register_search_url)),
        })
        .collect()
}

/// First characters of the opening message, with an ellipsis when cut
pub fn conversation_title(message: &str) -> String {
    let message = message.trim();
    if message.chars().count() > TITLE_CHARS {
        let head: String = message.chars().take(TITLE_CHARS).collect();
        format!("{}...", head)
    } else {
        message.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::AvailabilityCheck;
    use crate::error::ScoutError;
    use crate::llm::{CompletionRequest, LlmProvider};
    use crate::types::{AvailabilityStatus, CheckSource, Intent, SuggestionConfig};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;

    struct CannedProvider(&'static str);

    #[async_trait]
    impl LlmProvider for CannedProvider {
        async fn complete(&self, _request: &CompletionRequest) -> Result<String> {
            Ok(self.0.to_string())
        }

        fn name(&self) -> &'static str {
            "openrouter"
        }

        fn model(&self) -> &str {
            "canned"
        }

        fn is_ready(&self) -> bool {
            true
        }
    }

    /// Marks `example.com` taken and everything else available
    #[derive(Default)]
    struct LedgerDns {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl AvailabilityCheck for LedgerDns {
        async fn check_domain(&self, domain: &str) -> Result<DomainStatusRecord> {
            self.calls.lock().push(domain.to_string());
            if domain == "broken.com" {
                return Err(ScoutError::dns(domain, "Server error (500)", Some(500)));
            }
            let status = if domain == "example.com" {
                AvailabilityStatus::Taken
            } else {
                AvailabilityStatus::Available
            };
            Ok(DomainStatusRecord {
                domain: domain.to_string(),
                status,
                price: None,
                currency: None,
                period: None,
                register_url: format!("https://www.godaddy.com/domainsearch/find?domainToCheck={}", domain),
                summary: status.to_string(),
                source: CheckSource::Dns,
            })
        }

        fn source(&self) -> CheckSource {
            CheckSource::Dns
        }
    }

    fn scout(reply: &'static str, dns: Arc<LedgerDns>) -> DomainScout {
        let config = ResolverConfig {
            pacing: Duration::ZERO,
            ..Default::default()
        };
        let generator = SuggestionGenerator::new(SuggestionConfig::default());
        generator.add_provider_instance(Arc::new(CannedProvider(reply)));
        let resolver = AvailabilityResolver::with_sources(None, dns, &config);
        DomainScout::new(generator, resolver, &config)
    }

    #[tokio::test]
    async fn test_suggestions_joined_with_availability() {
        let dns = Arc::new(LedgerDns::default());
        let scout = scout(
            r#"{"assistantReply":"Some ideas","intent":"domain_request","domainSuggestions":[
                {"domain":"getflow.com","explanation":"flow"},
                {"domain":"example.com","explanation":"classic"},
                {"domain":"broken.com","explanation":"unlucky"}]}"#,
            dns.clone(),
        );

        let reply = scout.suggest_and_check("I need a name for my workflow app", &[]).await.unwrap();

        assert_eq!(reply.domains.len(), 3);
        let pairs: Vec<(&str, AvailabilityStatus)> = reply
            .domains
            .iter()
            .map(|d| (d.suggestion.domain.as_str(), d.availability.status))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("getflow.com", AvailabilityStatus::Available),
                ("example.com", AvailabilityStatus::Taken),
                ("broken.com", AvailabilityStatus::Unknown),
            ]
        );
        assert!(reply.domains.iter().all(|d| d.suggestion.domain == d.availability.domain));
        assert_eq!(dns.calls.lock().len(), 3);
        assert_eq!(
            reply.conversation_title.as_deref(),
            Some("I need a name for my workflow app")
        );
    }

    #[tokio::test]
    async fn test_clarification_skips_checks_and_title() {
        let dns = Arc::new(LedgerDns::default());
        let scout = scout(
            r#"{"assistantReply":"Who is it for?","intent":"clarification","needsMoreInfo":true}"#,
            dns.clone(),
        );

        let reply = scout.suggest_and_check("hello", &[]).await.unwrap();

        assert_eq!(reply.response.intent, Intent::Clarification);
        assert!(reply.domains.is_empty());
        assert!(reply.conversation_title.is_none());
        assert!(dns.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn test_direct_check() {
        let dns = Arc::new(LedgerDns::default());
        let scout = scout("unused", dns);

        let records = scout
            .check(&["example.com".to_string(), "getflow.com".to_string()])
            .await;
        assert_eq!(records[0].status, AvailabilityStatus::Taken);
        assert_eq!(records[1].status, AvailabilityStatus::Available);
    }

    #[test]
    fn test_missing_records_fall_back() {
        let response = ConversationalResponse {
            assistant_reply: String::new(),
            domain_suggestions: vec![crate::types::DomainSuggestion::new("getflow.com", "flow")],
            intent: Intent::DomainRequest,
            needs_more_info: false,
        };

        let joined = join_by_index(&response, Vec::new(), crate::types::DEFAULT_REGISTER_SEARCH_URL);
        assert_eq!(joined[0].availability.status, AvailabilityStatus::Unknown);
        assert_eq!(joined[0].availability.source, CheckSource::Fallback);
    }

    #[test]
    fn test_conversation_title() {
        assert_eq!(conversation_title("  short title "), "short title");

        let long = "a".repeat(80);
        let title = conversation_title(&long);
        assert_eq!(title.len(), 53);
        assert!(title.ends_with("..."));
    }
}
