//! Provider-fallback extraction orchestrator
//!
//! Tries each configured provider in preference order under two clocks: a
//! per-provider timeout and a total deadline for the whole chain. Any
//! provider failure (transport error, timeout, unusable JSON) moves on to
//! the next provider; the rule-based parser is the guaranteed terminal
//! fallback, so `analyze` always returns a draft. A provider's category
//! is never trusted; classification is recomputed from the source text so
//! that results are comparable across sources.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{timeout, Instant};
use tracing::{debug, info, warn};

use crate::error::Error;
use crate::extract::{DateExtractor, SmsParser, VoiceParser};
use crate::models::{Channel, TransactionDraft};
use crate::taxonomy::Taxonomy;

use super::parsing::{parse_extraction, ExtractedFields};
use super::{build_extraction_prompt, Provider, ProviderClient};

const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(18);
const DEFAULT_TOTAL_BUDGET: Duration = Duration::from_secs(45);

/// Where an extraction result came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionSource {
    /// A provider produced a usable extraction
    Provider(String),
    /// Every provider failed; the regex parser produced the draft
    RuleBased,
    /// The pipeline itself failed upstream of extraction
    Error,
}

impl ExtractionSource {
    pub fn label(&self) -> &str {
        match self {
            Self::Provider(name) => name,
            Self::RuleBased => "rule_based",
            Self::Error => "error",
        }
    }
}

/// A draft plus the source that produced it
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    pub draft: TransactionDraft,
    pub source: ExtractionSource,
}

pub struct Orchestrator {
    providers: Vec<ProviderClient>,
    fallback: SmsParser,
    voice_fallback: VoiceParser,
    taxonomy: Arc<Taxonomy>,
    date: DateExtractor,
    provider_timeout: Duration,
    total_budget: Duration,
}

impl Orchestrator {
    pub fn new(providers: Vec<ProviderClient>, taxonomy: Arc<Taxonomy>) -> Self {
        Self {
            providers,
            fallback: SmsParser::new(taxonomy.clone()),
            voice_fallback: VoiceParser::new(taxonomy.clone()),
            taxonomy,
            date: DateExtractor::new(),
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
            total_budget: DEFAULT_TOTAL_BUDGET,
        }
    }

    /// Build from environment: provider chain from API-key variables,
    /// per-provider timeout from `FINPARSE_PROVIDER_TIMEOUT_SECS`.
    pub fn from_env(taxonomy: Arc<Taxonomy>) -> Self {
        let mut orchestrator = Self::new(ProviderClient::chain_from_env(), taxonomy);
        if let Some(secs) = std::env::var("FINPARSE_PROVIDER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            orchestrator.provider_timeout = Duration::from_secs(secs);
        }
        orchestrator
    }

    /// Override both clocks. Used by tests to keep timeouts short.
    pub fn with_timeouts(mut self, provider_timeout: Duration, total_budget: Duration) -> Self {
        self.provider_timeout = provider_timeout;
        self.total_budget = total_budget;
        self
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Extract a draft from free text. Always returns; the source tag
    /// records whether a provider or the rule-based parser produced it.
    pub async fn analyze(&self, text: &str, channel: Channel) -> ExtractionOutcome {
        let prompt = build_extraction_prompt(text);
        let deadline = Instant::now() + self.total_budget;

        for provider in &self.providers {
            let now = Instant::now();
            if now >= deadline {
                warn!("Extraction deadline exhausted before trying remaining providers");
                break;
            }
            let window = self.provider_timeout.min(deadline - now);

            info!(provider = provider.name(), "Trying provider");
            match timeout(window, provider.complete(&prompt)).await {
                Ok(Ok(raw)) => match parse_extraction(&raw) {
                    Ok(fields) => {
                        debug!(provider = provider.name(), "Provider extraction accepted");
                        return ExtractionOutcome {
                            draft: self.draft_from_fields(fields, text, channel),
                            source: ExtractionSource::Provider(provider.name().to_string()),
                        };
                    }
                    Err(e) => {
                        warn!(provider = provider.name(), error = %e, "Unusable provider response");
                    }
                },
                Ok(Err(e)) => {
                    warn!(provider = provider.name(), error = %e, "Provider failed");
                }
                Err(_) => {
                    warn!(
                        provider = provider.name(),
                        timeout_secs = window.as_secs_f64(),
                        "Provider timed out"
                    );
                }
            }
        }

        info!("Falling back to rule-based extraction");
        // Voice transcripts get the colloquial amount patterns and the
        // "Voice Entry" counterparty default
        let draft = match channel {
            Channel::Voice => self.voice_fallback.parse(text),
            _ => {
                let mut draft = self.fallback.parse(text);
                draft.source_channel = channel;
                draft
            }
        };
        ExtractionOutcome {
            draft,
            source: ExtractionSource::RuleBased,
        }
    }

    /// Terminal failure outcome for upstream channel errors
    pub fn error_outcome(text: &str, channel: Channel, err: &Error) -> ExtractionOutcome {
        ExtractionOutcome {
            draft: TransactionDraft::error_draft(text, channel, &err.to_string()),
            source: ExtractionSource::Error,
        }
    }

    fn draft_from_fields(
        &self,
        fields: ExtractedFields,
        text: &str,
        channel: Channel,
    ) -> TransactionDraft {
        TransactionDraft {
            txn_type: fields.txn_type,
            amount: fields.amount,
            counterparty: fields.counterparty,
            category: self.taxonomy.classify(text, fields.amount),
            message: text.to_string(),
            date: self.date.extract_or_now(text),
            source_channel: channel,
            error: None,
        }
    }
}
