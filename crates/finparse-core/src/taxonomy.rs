//! Shared category taxonomy
//!
//! One classifier instance is injected into every channel parser so the
//! category vocabulary can never drift between SMS, voice, email, receipt
//! and statement extraction. Rules are an ordered list of word-boundary
//! regex patterns; precedence is the list order, first match wins.

use regex::Regex;
use tracing::debug;

use crate::error::Result;

/// A single keyword rule mapping a pattern to a canonical category label
#[derive(Debug)]
struct CategoryRule {
    pattern: Regex,
    label: String,
}

/// Immutable ordered keyword-to-category mapping with amount-tier fallback
///
/// Matching is done against lowercased input; stored labels keep their
/// canonical casing, which makes repeated classification idempotent.
#[derive(Debug)]
pub struct Taxonomy {
    rules: Vec<CategoryRule>,
}

/// The fixed precedence table shared by all channels
///
/// Order matters: categories can share substrings, and income must beat
/// refund, which beats the expense groups. Patterns are word-boundary
/// anchored so "trainee" never matches "train".
const STANDARD_RULES: &[(&str, &str)] = &[
    // Income
    (r"\bsalary\b", "Income"),
    (r"\bcredited\b", "Income"),
    (r"\breceived?\b", "Income"),
    (r"\bdeposit\b", "Income"),
    // Refunds
    (r"\brefund\b", "Refund"),
    (r"\bcashback\b", "Refund"),
    (r"\breward\b", "Refund"),
    // Food & Dining
    (r"\bfood\b", "Food & Dining"),
    (r"\brestaurant\b", "Food & Dining"),
    (r"\bdining\b", "Food & Dining"),
    (r"\bdinner\b", "Food & Dining"),
    (r"\bzomato\b", "Food & Dining"),
    (r"\bswiggy\b", "Food & Dining"),
    (r"\bkhana\b", "Food & Dining"),
    // Shopping
    (r"\bshopping\b", "Shopping"),
    (r"\bamazon\b", "Shopping"),
    (r"\bflipkart\b", "Shopping"),
    (r"\bmyntra\b", "Shopping"),
    // Groceries
    (r"\bkirana\b", "Groceries"),
    (r"\bgrocer(y|ies)\b", "Groceries"),
    (r"\bmilk\b", "Groceries"),
    // Travel
    (r"\bpetrol\b", "Travel"),
    (r"\bfuel\b", "Travel"),
    (r"\bdiesel\b", "Travel"),
    (r"\buber\b", "Travel"),
    (r"\bola\b", "Travel"),
    (r"\bcab\b", "Travel"),
    (r"\bbus\b", "Travel"),
    (r"\btrain\b", "Travel"),
    (r"\bflight\b", "Travel"),
    // Utilities
    (r"\bbill\b", "Utilities"),
    (r"\belectricity\b", "Utilities"),
    (r"\bwater\b", "Utilities"),
    (r"\binternet\b", "Utilities"),
    (r"\bmobile\b", "Utilities"),
    (r"\brecharge\b", "Utilities"),
    // Housing
    (r"\brent\b", "Housing"),
    (r"\bmaintenance\b", "Housing"),
    // Loan / EMI
    (r"\bemi\b", "Loan / EMI"),
    (r"\bloan\b", "Loan / EMI"),
    (r"\binstallment\b", "Loan / EMI"),
    // Healthcare
    (r"\bmedical\b", "Healthcare"),
    (r"\bhospital\b", "Healthcare"),
    (r"\bdoctor\b", "Healthcare"),
    (r"\bmedicine\b", "Healthcare"),
    (r"\bpharmacy\b", "Healthcare"),
    // Entertainment
    (r"\bmovie\b", "Entertainment"),
    (r"\bnetflix\b", "Entertainment"),
    (r"\bprime\b", "Entertainment"),
    (r"\bhotstar\b", "Entertainment"),
    // Investment
    (r"\binvest(ment)?\b", "Investment"),
    (r"\bmutual fund\b", "Investment"),
    (r"\bstock\b", "Investment"),
    (r"\bsip\b", "Investment"),
    // Insurance
    (r"\binsurance\b", "Insurance"),
    (r"\bpremium\b", "Insurance"),
];

impl Taxonomy {
    /// Build a taxonomy from an ordered (pattern, label) list
    ///
    /// Tests can substitute alternate tables here; production uses
    /// [`Taxonomy::standard`].
    pub fn new(pairs: &[(&str, &str)]) -> Result<Self> {
        let rules = pairs
            .iter()
            .map(|(pattern, label)| {
                Ok(CategoryRule {
                    pattern: Regex::new(pattern)?,
                    label: (*label).to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// The fixed standard taxonomy shared by all channels
    pub fn standard() -> Self {
        Self::new(STANDARD_RULES).expect("standard taxonomy patterns are valid")
    }

    /// Classify text into a category label
    ///
    /// Strict precedence: first keyword rule that matches wins, then the
    /// amount-tier fallback, then "Uncategorized". Never fails.
    pub fn classify(&self, text: &str, amount: f64) -> String {
        let text_low = text.to_lowercase();

        for rule in &self.rules {
            if rule.pattern.is_match(&text_low) {
                debug!(pattern = %rule.pattern, category = %rule.label, "Taxonomy rule matched");
                return rule.label.clone();
            }
        }

        if amount >= 25_000.0 {
            return "High-Value Expense".to_string();
        }
        if amount >= 10_000.0 {
            return "Large Expense".to_string();
        }
        if amount >= 3_000.0 {
            return "General Expense".to_string();
        }

        "Uncategorized".to_string()
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::standard()
    }
}
