//! Process configuration
//!
//! The environment is read once at startup and turned into explicit config
//! objects; nothing else in the crate looks at environment variables.

use crate::types::{
    LlmConfig, RegistrarCredentials, ResolverConfig, DEFAULT_DOH_URL, DEFAULT_REGISTRAR_URL,
};
use std::time::Duration;

/// Resolver configuration from the process environment
pub fn resolver_config_from_env() -> ResolverConfig {
    resolver_config_from_lookup(|key| std::env::var(key).ok())
}

/// LLM provider configurations from the process environment, in preference order
pub fn llm_configs_from_env() -> Vec<LlmConfig> {
    llm_configs_from_lookup(|key| std::env::var(key).ok())
}

/// Resolver configuration from an arbitrary key lookup.
///
/// Registrar credentials are only set when both key and secret are present
/// and non-empty; a half-configured registrar is treated as absent.
pub fn resolver_config_from_lookup<F>(lookup: F) -> ResolverConfig
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    let defaults = ResolverConfig::default();

    let registrar = match (get("GODADDY_API_KEY"), get("GODADDY_API_SECRET")) {
        (Some(key), Some(secret)) => Some(RegistrarCredentials::new(key, secret)),
        (Some(_), None) | (None, Some(_)) => {
            tracing::warn!("Only one of GODADDY_API_KEY / GODADDY_API_SECRET is set, ignoring registrar");
            None
        }
        (None, None) => None,
    };

    let pacing = get("DOMAIN_SCOUT_PACING_MS")
        .and_then(|v| parse_number(&v, "DOMAIN_SCOUT_PACING_MS"))
        .map(Duration::from_millis)
        .unwrap_or(defaults.pacing);

    let timeout = get("DOMAIN_SCOUT_TIMEOUT_SECS")
        .and_then(|v| parse_number(&v, "DOMAIN_SCOUT_TIMEOUT_SECS"))
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(defaults.timeout);

    ResolverConfig {
        registrar,
        registrar_base_url: get("GODADDY_API_URL").unwrap_or_else(|| DEFAULT_REGISTRAR_URL.to_string()),
        doh_base_url: get("DOMAIN_SCOUT_DOH_URL").unwrap_or_else(|| DEFAULT_DOH_URL.to_string()),
        pacing,
        timeout,
        ..defaults
    }
}

/// LLM provider configurations from an arbitrary key lookup
pub fn llm_configs_from_lookup<F>(lookup: F) -> Vec<LlmConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    let mut configs = Vec::new();

    if let Some(api_key) = get("OPENROUTER_API_KEY") {
        configs.push(LlmConfig {
            provider: "openrouter".to_string(),
            model: get("OPENROUTER_MODEL").unwrap_or_else(|| "meta-llama/llama-3-8b-instruct".to_string()),
            api_key,
            base_url: None,
            temperature: 0.9,
        });
    }

    if let Some(api_key) = get("OPENAI_API_KEY") {
        configs.push(LlmConfig {
            provider: "openai".to_string(),
            model: get("OPENAI_MODEL").unwrap_or_else(|| "gpt-4.1-mini".to_string()),
            api_key,
            base_url: get("OPENAI_BASE_URL"),
            temperature: 0.9,
        });
    }

    if let Some(api_key) = get("ANTHROPIC_API_KEY") {
        configs.push(LlmConfig {
            provider: "anthropic".to_string(),
            model: get("ANTHROPIC_MODEL").unwrap_or_else(|| "claude-sonnet-4-5".to_string()),
            api_key,
            base_url: None,
            temperature: 0.9,
        });
    }

    configs
}

fn parse_number(value: &str, key: &str) -> Option<u64> {
    match value.parse::<u64>() {
        Ok(n) => Some(n),
        Err(e) => {
            tracing::warn!(key = %key, value = %value, error = %e, "Ignoring non-numeric setting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = resolver_config_from_lookup(lookup(&[]));

        assert!(config.registrar.is_none());
        assert_eq!(config.registrar_base_url, DEFAULT_REGISTRAR_URL);
        assert_eq!(config.doh_base_url, DEFAULT_DOH_URL);
        assert_eq!(config.pacing, Duration::from_millis(150));
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_registrar_needs_both_halves() {
        let config = resolver_config_from_lookup(lookup(&[("GODADDY_API_KEY", "key")]));
        assert!(config.registrar.is_none());

        let config = resolver_config_from_lookup(lookup(&[("GODADDY_API_KEY", "key"), ("GODADDY_API_SECRET", "  ")]));
        assert!(config.registrar.is_none());

        let config = resolver_config_from_lookup(lookup(&[("GODADDY_API_KEY", "key"), ("GODADDY_API_SECRET", "secret")]));
        assert_eq!(config.registrar, Some(RegistrarCredentials::new("key", "secret")));
    }

    #[test]
    fn test_overrides() {
        let config = resolver_config_from_lookup(lookup(&[
            ("GODADDY_API_URL", "https://api.ote-godaddy.com"),
            ("DOMAIN_SCOUT_DOH_URL", "https://cloudflare-dns.com/dns-query"),
            ("DOMAIN_SCOUT_PACING_MS", "0"),
            ("DOMAIN_SCOUT_TIMEOUT_SECS", "3"),
        ]));

        assert_eq!(config.registrar_base_url, "https://api.ote-godaddy.com");
        assert_eq!(config.doh_base_url, "https://cloudflare-dns.com/dns-query");
        assert_eq!(config.pacing, Duration::ZERO);
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_bad_numbers_fall_back_to_defaults() {
        let config = resolver_config_from_lookup(lookup(&[
            ("DOMAIN_SCOUT_PACING_MS", "fast"),
            ("DOMAIN_SCOUT_TIMEOUT_SECS", "0"),
        ]));

        assert_eq!(config.pacing, Duration::from_millis(150));
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_llm_configs_in_preference_order() {
        let configs = llm_configs_from_lookup(lookup(&[
            ("ANTHROPIC_API_KEY", "a"),
            ("OPENROUTER_API_KEY", "r"),
            ("OPENAI_API_KEY", "o"),
            ("OPENAI_BASE_URL", "https://proxy.example.com/v1"),
        ]));

        let names: Vec<&str> = configs.iter().map(|c| c.provider.as_str()).collect();
        assert_eq!(names, vec!["openrouter", "openai", "anthropic"]);
        assert_eq!(configs[0].model, "meta-llama/llama-3-8b-instruct");
        assert_eq!(configs[1].base_url.as_deref(), Some("https://proxy.example.com/v1"));
    }

    #[test]
    fn test_no_llm_keys() {
        assert!(llm_configs_from_lookup(lookup(&[])).is_empty());
    }
}
