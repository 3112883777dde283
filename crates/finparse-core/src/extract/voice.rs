//! Voice transcript channel parser
//!
//! Transcripts are looser than bank alerts: colloquial amount phrasings
//! ("500 rupaye", "200 kharch") and usually no merchant name at all. The
//! shared extractors run first; voice-specific patterns only fill an
//! amount the shared pass could not find.

use std::sync::Arc;

use regex::Regex;
use tracing::debug;

use crate::models::{Channel, Extracted, TransactionDraft};
use crate::taxonomy::Taxonomy;

use super::{AmountExtractor, CounterpartyExtractor, DateExtractor, TypeDetector};

const VOICE_AMOUNT_PATTERNS: &[&str] = &[
    r"([\d,]+(?:\.\d{1,2})?)\s*(?:rupaye|rupees|rs)\b",
    r"([\d,]+(?:\.\d{1,2})?)\s*(?:spent|kharch|pay)\b",
];

pub struct VoiceParser {
    amount: AmountExtractor,
    voice_amount: Vec<Regex>,
    txn_type: TypeDetector,
    counterparty: CounterpartyExtractor,
    date: DateExtractor,
    taxonomy: Arc<Taxonomy>,
}

impl VoiceParser {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self {
            amount: AmountExtractor::new(),
            voice_amount: VOICE_AMOUNT_PATTERNS
                .iter()
                .map(|p| Regex::new(p).expect("valid voice amount pattern"))
                .collect(),
            txn_type: TypeDetector::new(),
            counterparty: CounterpartyExtractor::new(),
            date: DateExtractor::new(),
            taxonomy,
        }
    }

    fn extract_amount(&self, lowered: &str) -> Extracted<f64> {
        let shared = self.amount.extract(lowered);
        if shared.is_parsed() {
            return shared;
        }
        for pattern in &self.voice_amount {
            if let Some(caps) = pattern.captures(lowered) {
                if let Some(m) = caps.get(1) {
                    if let Ok(value) = m.as_str().replace(',', "").parse::<f64>() {
                        if value >= 0.0 {
                            return Extracted::Parsed(value);
                        }
                    }
                }
            }
        }
        Extracted::Defaulted(0.0)
    }

    /// Parse a speech transcript into a draft. Never fails.
    pub fn parse(&self, text: &str) -> TransactionDraft {
        let lowered = text.to_lowercase();
        let amount = self.extract_amount(&lowered);
        let txn_type = self.txn_type.detect(text);
        let counterparty = self.counterparty.extract(text, "Voice Entry");
        let category = self.taxonomy.classify(text, amount.value());
        let date = self.date.extract_or_now(text);

        debug!(%txn_type, amount = amount.value(), %counterparty, "Voice transcript parsed");

        TransactionDraft {
            txn_type,
            amount: amount.value(),
            counterparty,
            category,
            message: text.to_string(),
            date,
            source_channel: Channel::Voice,
            error: None,
        }
    }
}
