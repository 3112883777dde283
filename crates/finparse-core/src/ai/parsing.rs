//! JSON parsing and normalization for provider responses
//!
//! Model output often wraps the JSON payload in code fences or prose, so
//! the object is isolated by the first `{` and last `}` before parsing.
//! All four extraction keys must be present; field values are then
//! normalized, because models return "DEBIT", "₹1,234" and similar
//! variants. The model's category is discarded downstream in favor of
//! the keyword classifier.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::TxnType;

const REQUIRED_KEYS: &[&str] = &["txn_type", "amount", "counterparty", "category"];

/// Extraction fields after normalization. Category is intentionally
/// absent; it is recomputed from the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFields {
    pub txn_type: TxnType,
    pub amount: f64,
    pub counterparty: String,
}

/// Isolate the JSON object from a raw model response
pub fn clean_response(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if start < end {
        Some(&trimmed[start..=end])
    } else {
        None
    }
}

/// Parse and normalize a provider response into extraction fields
pub fn parse_extraction(response: &str) -> Result<ExtractedFields> {
    let json_str = clean_response(response).ok_or_else(|| {
        Error::InvalidData(format!(
            "No JSON found in provider response | Raw: {}",
            truncate(response)
        ))
    })?;

    let parsed: Value = serde_json::from_str(json_str).map_err(|e| {
        Error::InvalidData(format!(
            "Invalid JSON from provider: {} | Raw: {}",
            e,
            truncate(json_str)
        ))
    })?;

    let object = parsed
        .as_object()
        .ok_or_else(|| Error::InvalidData("Provider JSON is not an object".into()))?;

    for key in REQUIRED_KEYS {
        if !object.contains_key(*key) {
            return Err(Error::InvalidData(format!(
                "Provider JSON missing key \"{key}\""
            )));
        }
    }

    Ok(ExtractedFields {
        txn_type: normalize_txn_type(&object["txn_type"]),
        amount: normalize_amount(&object["amount"]),
        counterparty: normalize_counterparty(&object["counterparty"]),
    })
}

/// Substring match so "DEBIT", "debited", "Debit Card" all normalize
fn normalize_txn_type(value: &Value) -> TxnType {
    let lowered = value.as_str().unwrap_or_default().to_lowercase();
    if lowered.contains("credit") {
        TxnType::Credited
    } else if lowered.contains("debit") {
        TxnType::Debited
    } else {
        TxnType::Unknown
    }
}

/// Accept numbers or currency-decorated strings; anything else is 0.
/// Amounts are never negative, so a negative parse is treated as a
/// failed extraction.
fn normalize_amount(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s
            .replace(',', "")
            .replace('₹', "")
            .trim()
            .parse()
            .unwrap_or(0.0),
        _ => 0.0,
    };
    if parsed.is_finite() && parsed >= 0.0 {
        parsed
    } else {
        0.0
    }
}

fn normalize_counterparty(value: &Value) -> String {
    match value.as_str() {
        Some(s) if !s.trim().is_empty() => s.trim().to_string(),
        _ => "Unknown".to_string(),
    }
}

// Slices on a char boundary; raw responses can contain multibyte text.
fn truncate(text: &str) -> String {
    match text.char_indices().nth(200) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
