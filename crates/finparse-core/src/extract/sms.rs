//! SMS channel parser
//!
//! The primary rule-based path: bank alert SMS text in, full draft out.
//! Also used verbatim for high-confidence voice transcripts and as the
//! orchestrator's deterministic fallback.

use std::sync::Arc;

use tracing::debug;

use crate::models::{Channel, TransactionDraft};
use crate::taxonomy::Taxonomy;

use super::{AmountExtractor, CounterpartyExtractor, DateExtractor, TypeDetector};

pub struct SmsParser {
    amount: AmountExtractor,
    txn_type: TypeDetector,
    counterparty: CounterpartyExtractor,
    date: DateExtractor,
    taxonomy: Arc<Taxonomy>,
}

impl SmsParser {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self {
            amount: AmountExtractor::new(),
            txn_type: TypeDetector::new(),
            counterparty: CounterpartyExtractor::new(),
            date: DateExtractor::new(),
            taxonomy,
        }
    }

    /// Parse an SMS into a fully-populated draft. Never fails.
    pub fn parse(&self, text: &str) -> TransactionDraft {
        let amount = self.amount.extract(text);
        let txn_type = self.txn_type.detect(text);
        let counterparty = self.counterparty.extract(text, "Unknown");
        let category = self.taxonomy.classify(text, amount.value());
        let date = self.date.extract_or_now(text);

        debug!(
            %txn_type,
            amount = amount.value(),
            %counterparty,
            %category,
            "SMS parsed"
        );

        TransactionDraft {
            txn_type,
            amount: amount.value(),
            counterparty,
            category,
            message: text.to_string(),
            date,
            source_channel: Channel::Sms,
            error: None,
        }
    }
}
