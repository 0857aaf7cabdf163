//! Syntax checks for candidate domains
//!
//! Only LLM output goes through here; the resolver accepts whatever it is
//! given.

use crate::error::{Result, ScoutError};
use regex::Regex;

const MAX_DOMAIN_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// Checks that a string is a plausible registrable `label.tld` name
pub struct DomainValidator;

impl DomainValidator {
    pub fn new() -> Self {
        Self
    }

    /// Lowercase and trim, then check every label and the TLD; returns the
    /// normalized domain
    pub fn validate(&self, input: &str) -> Result<String> {
        let domain = self.normalize(input);
        if domain.is_empty() {
            return Err(ScoutError::validation("Empty domain"));
        }
        if domain.len() > MAX_DOMAIN_LEN {
            return Err(ScoutError::validation(format!(
                "'{}' is longer than {} characters",
                domain, MAX_DOMAIN_LEN
            )));
        }

        let Some((name, tld)) = domain.rsplit_once('.') else {
            return Err(ScoutError::validation(format!("'{}' has no TLD", domain)));
        };

        let tld_pattern = Regex::new(r"^[a-z]{2,63}$").map_err(|e| ScoutError::internal(e.to_string()))?;
        if !tld_pattern.is_match(tld) {
            return Err(ScoutError::validation(format!("'{}' is not a valid TLD", tld)));
        }

        let label_pattern = Regex::new(r"^[a-z0-9](?:[a-z0-9-]*[a-z0-9])?$")
            .map_err(|e| ScoutError::internal(e.to_string()))?;
        for label in name.split('.') {
            if label.is_empty() || label.len() > MAX_LABEL_LEN || !label_pattern.is_match(label) {
                return Err(ScoutError::validation(format!(
                    "'{}' is not a valid label in '{}'",
                    label, domain
                )));
            }
        }

        Ok(domain)
    }

    pub fn normalize(&self, domain: &str) -> String {
        domain.trim().to_lowercase()
    }
}

impl Default for DomainValidator {
    fn default() -> Self {
        Self::new()
    }
}
