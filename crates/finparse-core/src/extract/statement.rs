//! Bank-statement page parser
//!
//! Statement pages are one transaction per line. A line without a
//! recognizable date is never a transaction, so the date filter runs
//! first; the matched date text is then removed from the line so its
//! day/month digits cannot be picked up as an amount. Lines whose amount
//! comes out non-positive are dropped.

use std::sync::Arc;

use regex::Regex;
use tracing::debug;

use crate::models::{Channel, TransactionDraft, TxnType};
use crate::taxonomy::Taxonomy;

use super::{CounterpartyExtractor, DateExtractor, TypeDetector};

/// Decimal amounts first, bare 3-7 digit integers as fallback
const LINE_AMOUNT_PATTERNS: &[&str] = &[r"([\d,]+\.\d{2})", r"\b(\d{3,7})\b"];

pub struct StatementParser {
    date: DateExtractor,
    amounts: Vec<Regex>,
    txn_type: TypeDetector,
    /// "cr"/"dr" column markers, too short for the shared keyword sets
    credit_marker: Regex,
    debit_marker: Regex,
    counterparty: CounterpartyExtractor,
    taxonomy: Arc<Taxonomy>,
}

impl StatementParser {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self {
            date: DateExtractor::new(),
            amounts: LINE_AMOUNT_PATTERNS
                .iter()
                .map(|p| Regex::new(p).expect("valid amount pattern"))
                .collect(),
            txn_type: TypeDetector::new(),
            credit_marker: Regex::new(r"\bcr\b").expect("valid regex"),
            debit_marker: Regex::new(r"\bdr\b").expect("valid regex"),
            counterparty: CounterpartyExtractor::new(),
            taxonomy,
        }
    }

    /// Parse a statement page into one draft per transaction line.
    /// Non-transaction lines (headers, footers, balances without dates)
    /// are silently skipped.
    pub fn parse(&self, text: &str) -> Vec<TransactionDraft> {
        let drafts: Vec<TransactionDraft> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .filter_map(|line| self.parse_line(line))
            .collect();

        debug!(extracted = drafts.len(), "Statement page parsed");
        drafts
    }

    fn parse_line(&self, line: &str) -> Option<TransactionDraft> {
        let line_low = line.to_lowercase();

        let date_match = self.date.extract(&line_low)?;

        // Blank out the date span so "12/01/2024" cannot contribute "12"
        // as an amount
        let mut remainder = String::with_capacity(line_low.len());
        remainder.push_str(&line_low[..date_match.start]);
        remainder.push(' ');
        remainder.push_str(&line_low[date_match.end..]);

        let amount = self.extract_line_amount(&remainder);
        if amount <= 0.0 {
            return None;
        }

        let txn_type = self.detect_line_type(&line_low);
        let counterparty = self.counterparty.extract(line, "Unknown");
        let category = self.taxonomy.classify(line, amount);

        Some(TransactionDraft {
            txn_type,
            amount,
            counterparty,
            category,
            message: line.to_string(),
            date: date_match.to_utc(),
            source_channel: Channel::PdfStatement,
            error: None,
        })
    }

    fn extract_line_amount(&self, remainder: &str) -> f64 {
        for pattern in &self.amounts {
            if let Some(caps) = pattern.captures(remainder) {
                if let Ok(value) = caps[1].replace(',', "").parse::<f64>() {
                    return value;
                }
            }
        }
        0.0
    }

    fn detect_line_type(&self, line_low: &str) -> TxnType {
        if self.credit_marker.is_match(line_low) {
            return TxnType::Credited;
        }
        if self.debit_marker.is_match(line_low) {
            return TxnType::Debited;
        }
        self.txn_type.detect(line_low)
    }
}
