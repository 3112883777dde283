//! Bank email channel parser
//!
//! Email alert bodies carry the same field shapes as SMS but tend to be
//! longer and more formal ("by", "merchant:" phrasings, written-out
//! dates). The composition is identical; the channel tag differs.

use std::sync::Arc;

use tracing::debug;

use crate::models::{Channel, TransactionDraft};
use crate::taxonomy::Taxonomy;

use super::{AmountExtractor, CounterpartyExtractor, DateExtractor, TypeDetector};

pub struct EmailParser {
    amount: AmountExtractor,
    txn_type: TypeDetector,
    counterparty: CounterpartyExtractor,
    date: DateExtractor,
    taxonomy: Arc<Taxonomy>,
}

impl EmailParser {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self {
            amount: AmountExtractor::new(),
            txn_type: TypeDetector::new(),
            counterparty: CounterpartyExtractor::new(),
            date: DateExtractor::new(),
            taxonomy,
        }
    }

    /// Parse an email body into a fully-populated draft. Never fails.
    pub fn parse(&self, text: &str) -> TransactionDraft {
        let amount = self.amount.extract(text);
        let txn_type = self.txn_type.detect(text);
        let counterparty = self.counterparty.extract(text, "Unknown");
        let category = self.taxonomy.classify(text, amount.value());
        let date = self.date.extract_or_now(text);

        debug!(%txn_type, amount = amount.value(), %counterparty, "Email parsed");

        TransactionDraft {
            txn_type,
            amount: amount.value(),
            counterparty,
            category,
            message: text.to_string(),
            date,
            source_channel: Channel::Email,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TxnType;

    fn parser() -> EmailParser {
        EmailParser::new(Arc::new(Taxonomy::standard()))
    }

    #[test]
    fn test_formal_email_body() {
        let draft = parser().parse(
            "Dear customer, INR 2,499.00 was charged by Amazon on 12 March 2024. \
             Ref no 445566.",
        );

        assert_eq!(draft.txn_type, TxnType::Debited);
        assert_eq!(draft.amount, 2499.0);
        assert_eq!(draft.counterparty, "Amazon");
        assert_eq!(draft.category, "Shopping");
        assert_eq!(draft.date.format("%Y-%m-%d").to_string(), "2024-03-12");
        assert_eq!(draft.source_channel, Channel::Email);
    }

    #[test]
    fn test_refund_email() {
        let draft = parser().parse("Your refund of Rs 1,200 has been processed to your account");
        assert_eq!(draft.category, "Refund");
        assert_eq!(draft.amount, 1200.0);
    }

    #[test]
    fn test_merchant_field_phrasing() {
        let draft = parser().parse("Amount 350 debited. Merchant: Apollo Pharmacy");
        assert_eq!(draft.counterparty, "Apollo Pharmacy");
        assert_eq!(draft.category, "Healthcare");
    }
}
