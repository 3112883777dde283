//! Core data models
//!
//! `TransactionDraft` is the only entity the extraction pipeline produces.
//! Every field is always populated: the extractors fail soft to documented
//! defaults instead of returning partial drafts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TxnType {
    Credited,
    Debited,
    #[default]
    Unknown,
}

impl fmt::Display for TxnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxnType::Credited => write!(f, "Credited"),
            TxnType::Debited => write!(f, "Debited"),
            TxnType::Unknown => write!(f, "Unknown"),
        }
    }
}

impl FromStr for TxnType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "credited" | "credit" => Ok(TxnType::Credited),
            "debited" | "debit" => Ok(TxnType::Debited),
            "unknown" => Ok(TxnType::Unknown),
            other => Err(format!("Unknown transaction type: {}", other)),
        }
    }
}

/// Originating input medium for a draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Sms,
    Voice,
    Email,
    Receipt,
    PdfStatement,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Sms => "sms",
            Channel::Voice => "voice",
            Channel::Email => "email",
            Channel::Receipt => "receipt",
            Channel::PdfStatement => "pdf_statement",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of a fail-soft field extraction
///
/// `Parsed` means the value was genuinely found in the text; `Defaulted`
/// means no pattern matched and the documented default was used. Tests can
/// distinguish "used default 0.0" from "parsed an actual zero".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extracted<T> {
    Parsed(T),
    Defaulted(T),
}

impl<T: Copy> Extracted<T> {
    /// The extracted or default value
    pub fn value(&self) -> T {
        match self {
            Extracted::Parsed(v) | Extracted::Defaulted(v) => *v,
        }
    }

    /// Whether the value was genuinely parsed from the input
    pub fn is_parsed(&self) -> bool {
        matches!(self, Extracted::Parsed(_))
    }
}

/// A fully-populated, not-yet-persisted transaction record
///
/// Immutable after creation from the pipeline's point of view. The raw
/// input text is preserved verbatim in `message` for audit and debugging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub txn_type: TxnType,
    /// Non-negative; 0.0 when unparseable, never a coerced negative
    pub amount: f64,
    /// Non-empty; "Unknown" (or a channel default) when no pattern matched
    pub counterparty: String,
    /// Canonical label from the shared taxonomy, or a tier/fallback label
    pub category: String,
    /// Original raw input, verbatim
    pub message: String,
    /// Parsed from the text when possible, otherwise extraction time
    pub date: DateTime<Utc>,
    pub source_channel: Channel,
    /// Set only on the minimal error draft produced when the rule-based
    /// fallback itself fails
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TransactionDraft {
    /// Minimal well-formed draft for total pipeline failure
    ///
    /// Returned instead of an error so callers always receive a structured
    /// result (Unknown / 0.0 / Unknown / Miscellaneous plus the error text).
    pub fn error_draft(message: &str, channel: Channel, error: &str) -> Self {
        Self {
            txn_type: TxnType::Unknown,
            amount: 0.0,
            counterparty: "Unknown".to_string(),
            category: "Miscellaneous".to_string(),
            message: message.to_string(),
            date: Utc::now(),
            source_channel: channel,
            error: Some(error.to_string()),
        }
    }
}

/// A line item extracted from a receipt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptItem {
    pub name: String,
    pub quantity: u32,
    pub price: f64,
}

/// Receipt extraction result: the draft plus recognized line items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptDraft {
    #[serde(flatten)]
    pub draft: TransactionDraft,
    pub items: Vec<ReceiptItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_txn_type_roundtrip() {
        assert_eq!("Credited".parse::<TxnType>().unwrap(), TxnType::Credited);
        assert_eq!("debit".parse::<TxnType>().unwrap(), TxnType::Debited);
        assert_eq!(TxnType::Unknown.to_string(), "Unknown");
        assert!("overdraft".parse::<TxnType>().is_err());
    }

    #[test]
    fn test_txn_type_default_is_unknown() {
        assert_eq!(TxnType::default(), TxnType::Unknown);
    }

    #[test]
    fn test_channel_serialization() {
        let json = serde_json::to_string(&Channel::PdfStatement).unwrap();
        assert_eq!(json, "\"pdf_statement\"");
        assert_eq!(Channel::Voice.as_str(), "voice");
    }

    #[test]
    fn test_extracted_value_access() {
        let parsed = Extracted::Parsed(500.0);
        let defaulted: Extracted<f64> = Extracted::Defaulted(0.0);

        assert_eq!(parsed.value(), 500.0);
        assert!(parsed.is_parsed());
        assert_eq!(defaulted.value(), 0.0);
        assert!(!defaulted.is_parsed());
    }

    #[test]
    fn test_error_draft_is_well_formed() {
        let draft = TransactionDraft::error_draft("bad input", Channel::Sms, "boom");

        assert_eq!(draft.txn_type, TxnType::Unknown);
        assert_eq!(draft.amount, 0.0);
        assert_eq!(draft.counterparty, "Unknown");
        assert_eq!(draft.category, "Miscellaneous");
        assert_eq!(draft.message, "bad input");
        assert_eq!(draft.error.as_deref(), Some("boom"));
    }
}
