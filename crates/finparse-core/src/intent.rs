//! Intent detection for voice transcripts
//!
//! The pipeline only needs an intent label, a confidence in [0, 1], and
//! whatever entities the detector can surface. `KeywordIntentDetector` is
//! the built-in deterministic implementation: per intent, regex-pattern
//! hits weigh 0.7 and plain keyword hits 0.3, normalized by the maximum
//! score that intent could reach. ML-backed detectors can replace it
//! behind the trait.

use async_trait::async_trait;
use regex::Regex;
use serde::Serialize;

use crate::error::Result;
use crate::models::TxnType;

/// Entities surfaced alongside an intent. Passed through to the caller
/// opaquely; extraction proper happens in the channel parsers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Entities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txn_type: Option<TxnType>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntentResult {
    pub intent: String,
    pub confidence: f64,
    pub entities: Entities,
}

#[async_trait]
pub trait IntentDetector: Send + Sync {
    async fn detect(&self, text: &str) -> Result<IntentResult>;

    /// Suggestion offered when confidence is too low to act
    fn fallback_hint(&self, text: &str) -> String;
}

struct IntentDef {
    name: &'static str,
    patterns: Vec<Regex>,
    keywords: &'static [&'static str],
}

/// (name, patterns, keywords) for each recognized intent, Hinglish
/// phrasings included
const INTENT_TABLE: &[(&str, &[&str], &[&str])] = &[
    (
        "balance_inquiry",
        &[
            r"(balance|kitna.*paisa|remaining.*amount)",
            r"(current.*balance|how.*much.*money)",
        ],
        &["balance", "paisa", "remaining", "money"],
    ),
    (
        "transaction_add",
        &[
            r"(add|spend|expense|kharcha).*(\d+)",
            r"(\d+).*(rs|rupaye|rupees).*(add|spend)",
            r"(petrol|food|kirana|fuel).*(\d+)",
        ],
        &["add", "expense", "spend", "kharcha"],
    ),
    (
        "financial_advice",
        &[
            r"(tax.*saving|deduction)",
            r"(investment|mutual.*fund|stock)",
            r"(saving|bachat|financial.*tip)",
            r"(budget|monthly.*planning)",
        ],
        &["tax", "investment", "saving", "budget"],
    ),
    (
        "transaction_history",
        &[
            r"(history|record|statement|transactions)",
            r"(past.*spending|previous.*transaction)",
            r"(show.*expenses|where.*money.*went)",
        ],
        &["history", "transactions", "past"],
    ),
    (
        "general_help",
        &[r"(help|madad|sahayata)", r"(how.*to.*use|instructions|guide)"],
        &["help", "guide"],
    ),
    (
        "greeting",
        &[r"(hello|hi|namaste|hey)", r"(good.*morning|good.*evening)"],
        &["hello", "hi", "namaste"],
    ),
];

const HINTS: &[&str] = &[
    "Ask me about your expenses, savings, or tax tips.",
    "You can say: 'Add expense 120 for food'.",
    "Try asking: 'What is my balance?'",
    "Say 'Give me tax saving advice' for tips.",
];

/// Entity keyword map: spoken word to category label
const ENTITY_CATEGORIES: &[(&str, &str)] = &[
    ("petrol", "Travel"),
    ("fuel", "Travel"),
    ("diesel", "Travel"),
    ("food", "Food & Dining"),
    ("restaurant", "Food & Dining"),
    ("shopping", "Shopping"),
    ("kirana", "Groceries"),
    ("amazon", "Shopping"),
    ("flipkart", "Shopping"),
    ("salary", "Income"),
    ("credited", "Income"),
    ("bill", "Utilities"),
    ("recharge", "Utilities"),
];

pub struct KeywordIntentDetector {
    intents: Vec<IntentDef>,
    entity_amounts: Vec<Regex>,
}

impl KeywordIntentDetector {
    pub fn new() -> Self {
        let intents = INTENT_TABLE
            .iter()
            .map(|(name, patterns, keywords)| IntentDef {
                name,
                patterns: patterns
                    .iter()
                    .map(|p| Regex::new(p).expect("valid intent pattern"))
                    .collect(),
                keywords,
            })
            .collect();

        let entity_amounts = [
            r"₹\s?(\d+(?:,\d+)*(?:\.\d+)?)",
            r"rs\.?\s?(\d+(?:,\d+)*(?:\.\d+)?)",
            r"(\d+(?:,\d+)*(?:\.\d+)?)\s*(?:rupaye|rupees|rs)",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("valid entity pattern"))
        .collect();

        Self {
            intents,
            entity_amounts,
        }
    }

    /// Score every intent and return the best with normalized confidence
    fn score(&self, text_low: &str) -> (String, f64) {
        let mut best_name = "";
        let mut best_score = f64::MIN;
        let mut best_max = 0.0_f64;

        for intent in &self.intents {
            let pattern_hits = intent
                .patterns
                .iter()
                .filter(|p| p.is_match(text_low))
                .count() as f64;
            let keyword_hits = intent
                .keywords
                .iter()
                .filter(|k| text_low.contains(*k))
                .count() as f64;

            let score = pattern_hits * 0.7 + keyword_hits * 0.3;
            // First definition wins ties, so table order is precedence
            if score > best_score {
                best_score = score;
                best_name = intent.name;
                best_max = intent.patterns.len() as f64 * 0.7 + intent.keywords.len() as f64 * 0.3;
            }
        }

        let confidence = if best_max > 0.0 {
            (best_score / best_max).clamp(0.0, 1.0)
        } else {
            1.0
        };
        (best_name.to_string(), confidence)
    }

    fn extract_entities(&self, text_low: &str) -> Entities {
        let mut entities = Entities::default();

        for pattern in &self.entity_amounts {
            if let Some(caps) = pattern.captures(text_low) {
                if let Ok(value) = caps[1].replace(',', "").parse::<f64>() {
                    entities.amount = Some(value);
                    break;
                }
            }
        }

        for (word, category) in ENTITY_CATEGORIES {
            if text_low.contains(word) {
                entities.category = Some((*category).to_string());
                break;
            }
        }

        if ["credited", "salary", "received"]
            .iter()
            .any(|w| text_low.contains(w))
        {
            entities.txn_type = Some(TxnType::Credited);
        } else if ["spent", "paid", "expense", "kharcha"]
            .iter()
            .any(|w| text_low.contains(w))
        {
            entities.txn_type = Some(TxnType::Debited);
        }

        entities
    }
}

impl Default for KeywordIntentDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IntentDetector for KeywordIntentDetector {
    async fn detect(&self, text: &str) -> Result<IntentResult> {
        let text_low = text.to_lowercase();
        let text_low = text_low.trim();
        let (intent, confidence) = self.score(text_low);
        let entities = self.extract_entities(text_low);

        Ok(IntentResult {
            intent,
            confidence,
            entities,
        })
    }

    /// Hint selection is keyed off the transcript length, so repeated
    /// identical inputs get identical hints
    fn fallback_hint(&self, text: &str) -> String {
        HINTS[text.len() % HINTS.len()].to_string()
    }
}
