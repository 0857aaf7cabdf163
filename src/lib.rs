//! Domain Scout - conversational domain name suggestions with availability checks
//!
//! An LLM proposes brandable domain names for a project description; each
//! name is then checked against the registrar API, DNS-over-HTTPS, or a
//! static fallback, in that order.

pub mod availability;
pub mod config;
pub mod error;
pub mod llm;
pub mod scout;
pub mod types;

// Re-export commonly used types
pub use error::{Result, ScoutError};
pub use types::{
    AvailabilityStatus, ChatMessage, ChatRole, CheckSource, ConversationalResponse, DomainStatusRecord,
    DomainSuggestion, DomainWithStatus, Intent, LlmConfig, RegistrarCredentials, ResolverConfig,
    SuggestionConfig,
};

// Re-export main functionality
pub use availability::AvailabilityResolver;
pub use llm::SuggestionGenerator;
pub use scout::{DomainScout, ScoutReply};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}
