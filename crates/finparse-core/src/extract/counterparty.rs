//! Counterparty / merchant extraction
//!
//! Positional prepositional patterns in fixed precedence order, then a
//! known-merchant keyword table, then a channel-specific default. Captures
//! are truncated at connective stop words ("to Swiggy for dinner" yields
//! "Swiggy"), noise tokens are stripped, and the result is title-cased.

use regex::Regex;

use super::title_case;

/// Prepositional patterns in precedence order; first match wins
const COUNTERPARTY_PATTERNS: &[&str] = &[
    r"\bfrom\s+([a-z0-9 .&@_-]+)",
    r"\bto\s+([a-z0-9 .&@_-]+)",
    r"\bvia\s+([a-z0-9 .&@_-]+)",
    r"\bby\s+([a-z0-9 .&@_-]+)",
    r"\bmerchant\s*:?\s+([a-z0-9 .&@_-]+)",
    r"\bat\s+([a-z0-9 .&@_-]+)",
];

/// Connectives that end a name capture
const STOP_WORDS: &[&str] = &[
    "for", "on", "of", "with", "towards", "from", "to", "via", "by", "at", "upi", "ref", "txn",
];

/// SMS noise tokens removed from captured names
const NOISE_WORDS: &[&str] = &["upi", "ref", "txn", "id", "no", "bank"];

/// Keyword fallback when no positional pattern matches
const KNOWN_MERCHANTS: &[(&str, &str)] = &[
    ("amazon", "Amazon"),
    ("flipkart", "Flipkart"),
    ("zomato", "Zomato"),
    ("swiggy", "Swiggy"),
    ("uber", "Uber"),
    ("ola", "Ola"),
    ("kirana", "Kirana Store"),
    ("petrol", "Petrol Pump"),
    ("restaurant", "Restaurant"),
];

pub struct CounterpartyExtractor {
    patterns: Vec<Regex>,
}

impl CounterpartyExtractor {
    pub fn new() -> Self {
        Self {
            patterns: COUNTERPARTY_PATTERNS
                .iter()
                .map(|p| Regex::new(p).expect("valid counterparty pattern"))
                .collect(),
        }
    }

    /// Extract a non-empty counterparty name, falling back to `default`
    pub fn extract(&self, text: &str, default: &str) -> String {
        let text_low = text.to_lowercase();

        for pattern in &self.patterns {
            if let Some(caps) = pattern.captures(&text_low) {
                let cleaned = clean_counterparty(&caps[1]);
                if cleaned.len() > 1 {
                    return cleaned;
                }
            }
        }

        for (keyword, name) in KNOWN_MERCHANTS {
            if text_low.contains(keyword) {
                return (*name).to_string();
            }
        }

        default.to_string()
    }
}

impl Default for CounterpartyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Truncate at the first stop word, drop noise tokens, title-case.
/// Falls back to the raw capture when cleaning empties the string.
fn clean_counterparty(capture: &str) -> String {
    let tokens: Vec<&str> = capture
        .split_whitespace()
        .take_while(|t| !STOP_WORDS.contains(t))
        .collect();

    let filtered: Vec<&str> = tokens
        .iter()
        .copied()
        .filter(|t| !NOISE_WORDS.contains(t))
        .collect();

    let cleaned = filtered.join(" ");
    if cleaned.is_empty() {
        title_case(capture.trim())
    } else {
        title_case(&cleaned)
    }
}
