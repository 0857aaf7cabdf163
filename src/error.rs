//! Error handling for domain-scout

use std::time::Duration;
use thiserror::Error;

/// Main error type for domain-scout
#[derive(Debug, Clone, Error)]
pub enum ScoutError {
    #[error("Missing or invalid configuration: {message}")]
    Config { message: String },

    #[error("LLM provider error ({provider}): {message}")]
    LlmProvider {
        provider: String,
        message: String,
        status_code: Option<u16>,
    },

    #[error("Registrar check failed for '{domain}': {message}")]
    Registrar {
        domain: String,
        message: String,
        status_code: Option<u16>,
    },

    #[error("DNS lookup failed for '{domain}': {message}")]
    Dns {
        domain: String,
        message: String,
        status_code: Option<u16>,
    },

    #[error("Request failed: {message}")]
    Network {
        message: String,
        status_code: Option<u16>,
        url: Option<String>,
    },

    #[error("{operation} timed out{}", after_secs(.timeout_secs))]
    Timeout {
        operation: String,
        /// Configured limit, when the caller knows it
        timeout_secs: Option<u64>,
    },

    #[error("Could not parse upstream response: {message}")]
    Parse {
        message: String,
        content: Option<String>,
    },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ScoutError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an LLM provider error
    pub fn llm_provider(
        provider: impl Into<String>,
        message: impl Into<String>,
        status_code: Option<u16>,
    ) -> Self {
        Self::LlmProvider {
            provider: provider.into(),
            message: message.into(),
            status_code,
        }
    }

    /// Create a registrar error
    pub fn registrar(
        domain: impl Into<String>,
        message: impl Into<String>,
        status_code: Option<u16>,
    ) -> Self {
        Self::Registrar {
            domain: domain.into(),
            message: message.into(),
            status_code,
        }
    }

    /// Create a DNS lookup error
    pub fn dns(
        domain: impl Into<String>,
        message: impl Into<String>,
        status_code: Option<u16>,
    ) -> Self {
        Self::Dns {
            domain: domain.into(),
            message: message.into(),
            status_code,
        }
    }

    pub fn network(
        message: impl Into<String>,
        status_code: Option<u16>,
        url: Option<String>,
    ) -> Self {
        Self::Network {
            message: message.into(),
            status_code,
            url,
        }
    }

    pub fn timeout(operation: impl Into<String>, limit: Option<Duration>) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_secs: limit.map(|d| d.as_secs()),
        }
    }

    pub fn parse(message: impl Into<String>, content: Option<String>) -> Self {
        Self::Parse {
            message: message.into(),
            content,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status attached to the error, if the upstream answered at all
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::LlmProvider { status_code, .. }
            | Self::Registrar { status_code, .. }
            | Self::Dns { status_code, .. }
            | Self::Network { status_code, .. } => *status_code,
            _ => None,
        }
    }

    /// Message for the terminal, with a hint on what to fix
    pub fn user_message(&self) -> String {
        let (headline, hint) = match self {
            Self::Config { message } => (
                format!("❌ Setup incomplete: {}", message),
                Some("Set the variables in .env or the environment, see --help"),
            ),
            Self::LlmProvider { provider, message, status_code } => (
                format!("❌ {} could not suggest names: {}", provider, message),
                match status_code {
                    Some(401) | Some(403) => Some("The API key was rejected"),
                    Some(429) => Some("Wait a moment before asking again"),
                    _ => Some("Another configured provider may work; check its key"),
                },
            ),
            Self::Registrar { domain, message, .. } => {
                (format!("⚠️  Registrar lookup for {} failed: {}", domain, message), None)
            }
            Self::Dns { domain, message, .. } => {
                (format!("⚠️  DNS lookup for {} failed: {}", domain, message), None)
            }
            Self::Network { message, url, .. } => (
                match url {
                    Some(url) => format!("❌ Could not reach {}: {}", url, message),
                    None => format!("❌ Network problem: {}", message),
                },
                Some("Are you online?"),
            ),
            Self::Timeout { operation, timeout_secs } => (
                format!("⏱️  {} gave up{}", operation, after_secs(timeout_secs)),
                Some("Raise DOMAIN_SCOUT_TIMEOUT_SECS for slow links"),
            ),
            Self::Parse { message, .. } => (
                format!("❌ Unexpected upstream response: {}", message),
                Some("Usually transient, run it again"),
            ),
            Self::Validation { message } => (format!("❌ {}", message), Some("See --help for usage")),
            Self::Internal { message } => (format!("❌ Internal error: {}", message), None),
        };

        match hint {
            Some(hint) => format!("{}\n💡 {}", headline, hint),
            None => headline,
        }
    }
}

impl From<reqwest::Error> for ScoutError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            let operation = match err.url() {
                Some(url) => format!("Request to {}", url),
                None => "HTTP request".to_string(),
            };
            return Self::timeout(operation, None);
        }
        if err.is_decode() {
            return Self::parse(err.to_string(), None);
        }

        Self::Network {
            status_code: err.status().map(|s| s.as_u16()),
            url: err.url().map(ToString::to_string),
            message: if err.is_connect() {
                "connection refused or unreachable".to_string()
            } else {
                err.to_string()
            },
        }
    }
}

impl From<serde_json::Error> for ScoutError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            message: format!("invalid JSON at line {} column {}", err.line(), err.column()),
            content: None,
        }
    }
}

fn after_secs(timeout_secs: &Option<u64>) -> String {
    timeout_secs.map_or(String::new(), |secs| format!(" after {}s", secs))
}

pub type Result<T> = std::result::Result<T, ScoutError>;

/// Build a [`ScoutError::Config`] from a message or a format string
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::ScoutError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::ScoutError::config(format!($fmt, $($arg)*))
    };
}
