//! Pluggable AI extraction providers
//!
//! A provider turns a prompt into raw model text; everything else
//! (prompting, JSON cleaning, normalization, fallback) lives in the
//! orchestrator. Providers are tried in a fixed preference order and a
//! failed provider is never retried within a request.
//!
//! # Architecture
//!
//! - `Provider` trait: one `complete` call per provider
//! - `ProviderClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Provider implementations: `OpenAiChatProvider` (Groq and OpenAI share
//!   the chat-completions wire shape), `GeminiProvider`, `CohereProvider`,
//!   `MockProvider`
//!
//! # Configuration
//!
//! Environment variables, checked in preference order:
//! - `GROQ_API_KEY`
//! - `OPENAI_API_KEY`
//! - `GEMINI_API_KEY`
//! - `COHERE_API_KEY`

mod cohere;
mod gemini;
mod mock;
mod openai_compatible;
pub mod orchestrator;
pub mod parsing;

pub use cohere::CohereProvider;
pub use gemini::GeminiProvider;
pub use mock::{MockMode, MockProvider};
pub use openai_compatible::OpenAiChatProvider;
pub use orchestrator::{ExtractionOutcome, ExtractionSource, Orchestrator};

use async_trait::async_trait;

use crate::error::Result;

/// Trait implemented by every AI extraction provider
#[async_trait]
pub trait Provider: Send + Sync {
    /// Send a prompt and return the raw model text
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Short provider name used in logs and outcome tags
    fn name(&self) -> &str;
}

/// Concrete provider wrapper for compile-time dispatch
#[derive(Clone)]
pub enum ProviderClient {
    OpenAiChat(OpenAiChatProvider),
    Gemini(GeminiProvider),
    Cohere(CohereProvider),
    Mock(MockProvider),
}

#[async_trait]
impl Provider for ProviderClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        match self {
            Self::OpenAiChat(p) => p.complete(prompt).await,
            Self::Gemini(p) => p.complete(prompt).await,
            Self::Cohere(p) => p.complete(prompt).await,
            Self::Mock(p) => p.complete(prompt).await,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::OpenAiChat(p) => p.name(),
            Self::Gemini(p) => p.name(),
            Self::Cohere(p) => p.name(),
            Self::Mock(p) => p.name(),
        }
    }
}

impl ProviderClient {
    /// Build the configured provider chain from environment variables,
    /// in preference order. Missing keys are skipped; an empty chain
    /// means the orchestrator goes straight to rule-based extraction.
    pub fn chain_from_env() -> Vec<ProviderClient> {
        let mut chain = Vec::new();

        if let Ok(key) = std::env::var("GROQ_API_KEY") {
            if !key.is_empty() {
                chain.push(ProviderClient::OpenAiChat(OpenAiChatProvider::groq(&key)));
            }
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if !key.is_empty() {
                chain.push(ProviderClient::OpenAiChat(OpenAiChatProvider::openai(&key)));
            }
        }
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.is_empty() {
                chain.push(ProviderClient::Gemini(GeminiProvider::new(&key)));
            }
        }
        if let Ok(key) = std::env::var("COHERE_API_KEY") {
            if !key.is_empty() {
                chain.push(ProviderClient::Cohere(CohereProvider::new(&key)));
            }
        }

        chain
    }
}

/// Prompt asking a model for strict-JSON transaction extraction
pub fn build_extraction_prompt(text: &str) -> String {
    format!(
        r#"Extract bank transaction details from this message.

Return STRICT JSON ONLY with keys:

- "txn_type": "Credited" | "Debited" | "Unknown"
- "amount": number
- "counterparty": string
- "category": string

Message: "{text}"
"#
    )
}
