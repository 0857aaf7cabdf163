//! Parsing of free-form LLM output
//!
//! Models rarely follow the requested format exactly, so parsing degrades
//! step by step: a JSON reply object, then a bare JSON array of names, then
//! `N. domain.tld - explanation` lines, and finally the raw text as a plain
//! reply with no suggestions. It never fails.

use crate::availability::DomainValidator;
use crate::types::{ConversationalResponse, DomainSuggestion, Intent, SuggestionConfig};
use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashSet;

const SUGGESTIONS_REPLY: &str = "Here are some domain name ideas for your project:";

/// Parse a model response into a [`ConversationalResponse`]
pub fn parse_conversational_response(content: &str, config: &SuggestionConfig) -> ConversationalResponse {
    let validator = DomainValidator::new();

    if let Some(response) = parse_reply_object(content, config, &validator) {
        return response;
    }

    if let Some(response) = parse_suggestion_array(content, config, &validator) {
        return response;
    }

    if let Some(response) = parse_numbered_lines(content, config, &validator) {
        return response;
    }

    tracing::debug!("LLM response had no recognizable suggestions, treating it as plain reply");
    ConversationalResponse {
        assistant_reply: content.trim().to_string(),
        domain_suggestions: Vec::new(),
        intent: Intent::General,
        needs_more_info: true,
    }
}

/// Reply object as requested by the system prompt.
///
/// Models get the types of optional fields wrong often enough (`"9"` for a
/// score, `"false"` for a flag) that every field here is read leniently: a
/// malformed value drops that field, and a malformed entry drops only that
/// suggestion.
#[derive(Debug, Deserialize)]
struct RawReply {
    #[serde(
        default,
        alias = "assistantReply",
        alias = "assistant_reply",
        alias = "message",
        deserialize_with = "lenient_text"
    )]
    reply: Option<String>,
    #[serde(default, deserialize_with = "lenient_intent")]
    intent: Option<Intent>,
    #[serde(default, alias = "needsMoreInfo", deserialize_with = "lenient_flag")]
    needs_more_info: Option<bool>,
    #[serde(
        default,
        alias = "domainSuggestions",
        alias = "domain_suggestions",
        alias = "domains",
        deserialize_with = "lenient_suggestions"
    )]
    suggestions: Vec<RawSuggestion>,
}

#[derive(Debug, Deserialize)]
struct RawSuggestion {
    #[serde(alias = "name")]
    domain: String,
    #[serde(default, alias = "description", deserialize_with = "lenient_text")]
    explanation: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    reasoning: Option<String>,
    #[serde(
        default,
        alias = "relevanceScore",
        alias = "relevance_score",
        alias = "confidence",
        deserialize_with = "lenient_number"
    )]
    score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    category: Option<String>,
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(text) => text.trim().trim_end_matches("/10").trim().parse().ok(),
        _ => None,
    })
}

fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => Some(b),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

fn lenient_intent<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Intent>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        value @ Value::String(_) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

fn lenient_suggestions<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<RawSuggestion>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => raw_suggestions(items),
        _ => Vec::new(),
    })
}

/// Keep the entries that look like suggestions, skip the rest
fn raw_suggestions(items: Vec<Value>) -> Vec<RawSuggestion> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<RawSuggestion>(item) {
            Ok(raw) => Some(raw),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping malformed suggestion entry");
                None
            }
        })
        .collect()
}

fn parse_reply_object(
    content: &str,
    config: &SuggestionConfig,
    validator: &DomainValidator,
) -> Option<ConversationalResponse> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    if end <= start {
        return None;
    }

    let raw: RawReply = serde_json::from_str(&content[start..=end]).ok()?;
    if raw.reply.is_none() && raw.suggestions.is_empty() {
        return None;
    }

    let suggestions = finalize(raw.suggestions, config, validator);
    let has_suggestions = !suggestions.is_empty();

    Some(ConversationalResponse {
        assistant_reply: raw
            .reply
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| SUGGESTIONS_REPLY.to_string()),
        intent: raw.intent.unwrap_or(if has_suggestions {
            Intent::DomainRequest
        } else {
            Intent::General
        }),
        needs_more_info: raw.needs_more_info.unwrap_or(!has_suggestions),
        domain_suggestions: suggestions,
    })
}

fn parse_suggestion_array(
    content: &str,
    config: &SuggestionConfig,
    validator: &DomainValidator,
) -> Option<ConversationalResponse> {
    let start = content.find('[')?;
    let end = content.rfind(']')?;
    if end <= start {
        return None;
    }

    let items: Vec<Value> = serde_json::from_str(&content[start..=end]).ok()?;
    let suggestions = finalize(raw_suggestions(items), config, validator);
    if suggestions.is_empty() {
        return None;
    }

    let preamble = content[..start].trim();
    Some(ConversationalResponse {
        assistant_reply: if preamble.is_empty() || preamble.starts_with("```") {
            SUGGESTIONS_REPLY.to_string()
        } else {
            preamble.trim_end_matches("```json").trim().to_string()
        },
        domain_suggestions: suggestions,
        intent: Intent::DomainRequest,
        needs_more_info: false,
    })
}

fn parse_numbered_lines(
    content: &str,
    config: &SuggestionConfig,
    validator: &DomainValidator,
) -> Option<ConversationalResponse> {
    let line_regex = Regex::new(r"(?i)^(?:\d+\.\s*)?([\w-]+\.[a-z]{2,})\s*-\s*(.+)$").ok()?;

    let mut raw = Vec::new();
    let mut reply_lines = Vec::new();
    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let cleaned = line.replace("**", "");
        match line_regex.captures(&cleaned) {
            Some(caps) => raw.push(RawSuggestion {
                domain: caps[1].to_string(),
                explanation: Some(caps[2].trim().to_string()),
                reasoning: None,
                score: None,
                category: None,
            }),
            None => reply_lines.push(line),
        }
    }

    let suggestions = finalize(raw, config, validator);
    if suggestions.is_empty() {
        return None;
    }

    Some(ConversationalResponse {
        assistant_reply: if reply_lines.is_empty() {
            SUGGESTIONS_REPLY.to_string()
        } else {
            reply_lines.join("\n")
        },
        domain_suggestions: suggestions,
        intent: Intent::DomainRequest,
        needs_more_info: false,
    })
}

/// Normalize, validate, dedupe and cap raw suggestions
fn finalize(raw: Vec<RawSuggestion>, config: &SuggestionConfig, validator: &DomainValidator) -> Vec<DomainSuggestion> {
    let default_tld = config.tlds.first().map(String::as_str).unwrap_or("com");
    let mut seen = HashSet::new();
    let mut suggestions = Vec::new();

    for item in raw {
        if suggestions.len() >= config.max_suggestions {
            break;
        }

        let mut domain = validator.normalize(&item.domain);
        for prefix in ["https://", "http://", "www."] {
            if let Some(rest) = domain.strip_prefix(prefix) {
                domain = rest.to_string();
            }
        }
        let domain = domain.trim_end_matches(['.', '/']).to_string();
        let candidate = if domain.contains('.') {
            domain
        } else {
            format!("{}.{}", domain, default_tld)
        };

        let domain = match validator.validate(&candidate) {
            Ok(domain) => domain,
            Err(e) => {
                tracing::debug!(domain = %candidate, error = %e, "Dropping malformed suggestion");
                continue;
            }
        };
        if !seen.insert(domain.clone()) {
            continue;
        }

        let explanation = item
            .explanation
            .or_else(|| item.reasoning.clone())
            .unwrap_or_default();

        suggestions.push(DomainSuggestion {
            domain,
            explanation,
            relevance_score: item.score.and_then(relevance_score),
            category: item.category.filter(|c| !c.trim().is_empty()),
            reasoning: item.reasoning,
        });
    }

    suggestions
}

/// Scores arrive as 1-10 or as 0-1 confidences; both map onto 1-10
fn relevance_score(raw: f64) -> Option<u8> {
    if !raw.is_finite() || raw <= 0.0 {
        return None;
    }
    let scaled = if raw <= 1.0 { raw * 10.0 } else { raw };
    Some(scaled.round().clamp(1.0, 10.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SuggestionConfig {
        SuggestionConfig::default()
    }

    #[test]
    fn test_reply_object() {
        let content = r#"Sure! ```json
{
  "assistantReply": "Great idea for a coffee brand.",
  "intent": "domain_request",
  "needsMoreInfo": false,
  "domainSuggestions": [
    {"domain": "Brewly.com", "explanation": "Short and warm", "relevanceScore": 9, "category": "brandable", "reasoning": "Evokes brewing"},
    {"domain": "beanloop.com", "explanation": "Playful loop of beans", "relevanceScore": 7.6}
  ]
}
```"#;

        let response = parse_conversational_response(content, &config());
        assert_eq!(response.assistant_reply, "Great idea for a coffee brand.");
        assert_eq!(response.intent, Intent::DomainRequest);
        assert!(!response.needs_more_info);
        assert_eq!(response.domain_suggestions.len(), 2);

        let first = &response.domain_suggestions[0];
        assert_eq!(first.domain, "brewly.com");
        assert_eq!(first.relevance_score, Some(9));
        assert_eq!(first.category.as_deref(), Some("brandable"));
        assert_eq!(first.reasoning.as_deref(), Some("Evokes brewing"));
        assert_eq!(response.domain_suggestions[1].relevance_score, Some(8));
    }

    #[test]
    fn test_reply_object_without_suggestions_asks_for_more() {
        let content = r#"{"reply": "What does your product do?", "intent": "clarification"}"#;

        let response = parse_conversational_response(content, &config());
        assert_eq!(response.intent, Intent::Clarification);
        assert!(response.needs_more_info);
        assert!(response.domain_suggestions.is_empty());
    }

    #[test]
    fn test_suggestion_array_with_bare_names() {
        let content = r#"[
  {"name": "flowbase", "reasoning": "flow plus base", "confidence": 0.87},
  {"name": "taskly.io", "reasoning": "task tool"}
]"#;

        let response = parse_conversational_response(content, &config());
        assert_eq!(response.intent, Intent::DomainRequest);
        let domains: Vec<&str> = response.domain_suggestions.iter().map(|s| s.domain.as_str()).collect();
        assert_eq!(domains, vec!["flowbase.com", "taskly.io"]);
        assert_eq!(response.domain_suggestions[0].explanation, "flow plus base");
        assert_eq!(response.domain_suggestions[0].relevance_score, Some(9));
    }

    #[test]
    fn test_numbered_lines() {
        let content = "Here you go:\n1. getflow.com - Smooth and action oriented\n2. **Tidyhq.com** - Sounds organized\nnot a suggestion line";

        let response = parse_conversational_response(content, &config());
        assert_eq!(response.domain_suggestions.len(), 2);
        assert_eq!(response.domain_suggestions[0].domain, "getflow.com");
        assert_eq!(response.domain_suggestions[0].explanation, "Smooth and action oriented");
        assert_eq!(response.domain_suggestions[1].domain, "tidyhq.com");
        assert_eq!(response.assistant_reply, "Here you go:\nnot a suggestion line");
    }

    #[test]
    fn test_plain_text_fallback() {
        let content = "  Could you tell me a bit more about your audience?  ";

        let response = parse_conversational_response(content, &config());
        assert_eq!(response.assistant_reply, "Could you tell me a bit more about your audience?");
        assert_eq!(response.intent, Intent::General);
        assert!(response.needs_more_info);
        assert!(response.domain_suggestions.is_empty());
    }

    #[test]
    fn test_invalid_and_duplicate_domains_dropped() {
        let content = r#"{"reply": "ideas", "suggestions": [
  {"domain": "good.com", "explanation": "a"},
  {"domain": "GOOD.com", "explanation": "dup"},
  {"domain": "bad_name.com", "explanation": "b"},
  {"domain": "https://www.nice.io/", "explanation": "c"}
]}"#;

        let response = parse_conversational_response(content, &config());
        let domains: Vec<&str> = response.domain_suggestions.iter().map(|s| s.domain.as_str()).collect();
        assert_eq!(domains, vec!["good.com", "nice.io"]);
    }

    #[test]
    fn test_suggestions_capped() {
        let lines: Vec<String> = (1..=8).map(|i| format!("{}. name{}.com - idea {}", i, i, i)).collect();
        let config = SuggestionConfig {
            max_suggestions: 3,
            ..Default::default()
        };

        let response = parse_conversational_response(&lines.join("\n"), &config);
        assert_eq!(response.domain_suggestions.len(), 3);
        assert_eq!(response.domain_suggestions[2].domain, "name3.com");
    }

    #[test]
    fn test_relevance_score_scaling() {
        assert_eq!(relevance_score(0.87), Some(9));
        assert_eq!(relevance_score(7.0), Some(7));
        assert_eq!(relevance_score(42.0), Some(10));
        assert_eq!(relevance_score(0.0), None);
        assert_eq!(relevance_score(f64::NAN), None);
    }

    #[test]
    fn test_loosely_typed_fields_keep_the_suggestion() {
        let content = r#"```json
{"assistantReply":"Some ideas","intent":"domain_request","needsMoreInfo":"false","domainSuggestions":[
  {"domain":"getflow.com","explanation":"flow","relevanceScore":"9","category":7},
  {"domain":"tidyhq.com","explanation":"tidy","relevanceScore":{"value":8}},
  {"explanation":"no domain at all"}
]}
```"#;

        let response = parse_conversational_response(content, &config());
        assert_eq!(response.assistant_reply, "Some ideas");
        assert!(!response.needs_more_info);
        assert_eq!(response.domain_suggestions.len(), 2);

        let first = &response.domain_suggestions[0];
        assert_eq!(first.domain, "getflow.com");
        assert_eq!(first.relevance_score, Some(9));
        assert_eq!(first.category.as_deref(), Some("7"));
        assert_eq!(response.domain_suggestions[1].relevance_score, None);
    }

    #[test]
    fn test_unusable_flag_and_intent_fall_back_to_defaults() {
        let content = r#"{"reply":"Ideas","intent":3,"needsMoreInfo":"maybe","suggestions":[{"name":"brewly","confidence":"0.9"}]}"#;

        let response = parse_conversational_response(content, &config());
        assert_eq!(response.intent, Intent::DomainRequest);
        assert!(!response.needs_more_info);
        assert_eq!(response.domain_suggestions[0].domain, "brewly.com");
        assert_eq!(response.domain_suggestions[0].relevance_score, Some(9));
    }

    #[test]
    fn test_zero_cap_returns_nothing() {
        let config = SuggestionConfig {
            max_suggestions: 0,
            ..Default::default()
        };

        let response = parse_conversational_response("1. getflow.com - flow", &config);
        assert!(response.domain_suggestions.is_empty());
    }
}
