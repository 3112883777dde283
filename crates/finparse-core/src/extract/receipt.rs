//! OCR receipt channel parser
//!
//! Receipts are line-oriented: total labels ("grand total", "amount
//! payable") beat bare currency marks, the merchant name lives in the top
//! few lines, and item rows follow a "name qty x price" shape. Receipts
//! are purchases, so the draft type is always Debited.

use std::sync::Arc;

use regex::Regex;
use tracing::debug;

use crate::models::{Channel, ReceiptDraft, ReceiptItem, TransactionDraft, TxnType};
use crate::taxonomy::Taxonomy;

use super::{title_case, DateExtractor};

/// Total-amount patterns, strongest label first
const TOTAL_PATTERNS: &[&str] = &[
    r"grand\s*total[:\-]?\s*₹?\s*([\d,]+\.?\d*)",
    r"total\s*[:\-]?\s*₹?\s*([\d,]+\.?\d*)",
    r"amount\s*payable[:\-]?\s*₹?\s*([\d,]+\.?\d*)",
    r"net\s*amount[:\-]?\s*₹?\s*([\d,]+\.?\d*)",
    r"bill\s*amt[:\-]?\s*₹?\s*([\d,]+\.?\d*)",
    r"₹\s*([\d,]+\.?\d*)",
    r"rs\.?\s*([\d,]+\.?\d*)",
];

/// Storefront shapes looked for in the top five lines
const MERCHANT_PATTERNS: &[&str] = &[
    r"store",
    r"mart",
    r"bazaar",
    r"reliance",
    r"dmart",
    r"big bazaar",
    r"petrol.*pump",
    r"restaurant",
    r"medical",
];

/// Header noise removed from the merchant line
const MERCHANT_NOISE: &[&str] = &["gst", "bill", "tax", "invoice", "#", "no", "date"];

/// Storefront keywords mapped to spend categories, checked before the
/// shared taxonomy
const RECEIPT_CATEGORIES: &[(&str, &[&str])] = &[
    ("Fuel", &["petrol", "diesel", "fuel", "pump"]),
    (
        "Groceries",
        &["mart", "supermarket", "grocery", "fresh", "bazaar", "bazar", "kirana"],
    ),
    (
        "Food & Dining",
        &["restaurant", "cafe", "dining", "hotel", "swiggy", "zomato"],
    ),
    ("Healthcare", &["medical", "pharmacy", "chemist", "drug"]),
    (
        "Shopping",
        &["mall", "electronics", "fashion", "lifestyle", "myntra", "flipkart"],
    ),
    (
        "Utilities",
        &["electricity", "water", "gas", "recharge", "dth"],
    ),
];

pub struct ReceiptParser {
    totals: Vec<Regex>,
    merchants: Vec<Regex>,
    fallback_number: Regex,
    item_row: Regex,
    date: DateExtractor,
    taxonomy: Arc<Taxonomy>,
}

impl ReceiptParser {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self {
            totals: TOTAL_PATTERNS
                .iter()
                .map(|p| Regex::new(p).expect("valid total pattern"))
                .collect(),
            merchants: MERCHANT_PATTERNS
                .iter()
                .map(|p| Regex::new(p).expect("valid merchant pattern"))
                .collect(),
            fallback_number: Regex::new(r"\b(\d{2,7}(?:\.\d{1,2})?)\b").expect("valid regex"),
            item_row: Regex::new(r"([A-Za-z][A-Za-z0-9 \-]*)\s+(\d+)\s*x\s*([\d.]+)")
                .expect("valid item pattern"),
            date: DateExtractor::new(),
            taxonomy,
        }
    }

    /// Parse OCR text into a draft plus line items. Never fails.
    pub fn parse(&self, text: &str) -> ReceiptDraft {
        let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        let text_low = text.to_lowercase();

        let amount = self.extract_total(&lines, &text_low);
        let merchant = self.extract_merchant(&lines);
        let items = self.extract_items(&lines);
        let category = self.classify(&text_low, amount);
        let date = self.date.extract_or_now(&text_low);

        debug!(amount, %merchant, items = items.len(), "Receipt parsed");

        ReceiptDraft {
            draft: TransactionDraft {
                txn_type: TxnType::Debited,
                amount,
                counterparty: merchant,
                category,
                message: text.to_string(),
                date,
                source_channel: Channel::Receipt,
                error: None,
            },
            items,
        }
    }

    /// Labeled totals line by line, then the largest bare number anywhere
    fn extract_total(&self, lines: &[&str], text_low: &str) -> f64 {
        for line in lines {
            let l_low = line.to_lowercase();
            for pattern in &self.totals {
                if let Some(caps) = pattern.captures(&l_low) {
                    if let Ok(value) = caps[1].replace(',', "").parse::<f64>() {
                        if value > 0.0 {
                            return value;
                        }
                    }
                }
            }
        }

        self.fallback_number
            .captures_iter(text_low)
            .filter_map(|caps| caps[1].parse::<f64>().ok())
            .fold(0.0, f64::max)
    }

    fn extract_merchant(&self, lines: &[&str]) -> String {
        for line in lines.iter().take(5) {
            let l_low = line.to_lowercase();
            if self.merchants.iter().any(|p| p.is_match(&l_low)) {
                return clean_merchant(line);
            }
        }
        "Unknown".to_string()
    }

    fn extract_items(&self, lines: &[&str]) -> Vec<ReceiptItem> {
        lines
            .iter()
            .filter_map(|line| self.item_row.captures(line))
            .filter_map(|caps| {
                let quantity: u32 = caps[2].parse().ok()?;
                let price: f64 = caps[3].parse().ok()?;
                Some(ReceiptItem {
                    name: title_case(caps[1].trim()),
                    quantity,
                    price,
                })
            })
            .collect()
    }

    fn classify(&self, text_low: &str, amount: f64) -> String {
        for (label, keywords) in RECEIPT_CATEGORIES {
            if keywords.iter().any(|k| text_low.contains(k)) {
                return (*label).to_string();
            }
        }
        self.taxonomy.classify(text_low, amount)
    }
}

/// Strip header noise tokens from a merchant line and title-case it
fn clean_merchant(line: &str) -> String {
    let filtered: Vec<&str> = line
        .split_whitespace()
        .filter(|w| !MERCHANT_NOISE.contains(&w.to_lowercase().as_str()))
        .collect();

    if filtered.is_empty() {
        title_case(line.trim())
    } else {
        title_case(&filtered.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> ReceiptParser {
        ReceiptParser::new(Arc::new(Taxonomy::standard()))
    }

    const GROCERY_RECEIPT: &str = "\
DMart Super Store
GST No 22AABCU9603R1ZM
Date 12/01/2024
Rice 2 x 80.00
Milk 4 x 30.50
Grand Total: 282.00
Thank you";

    #[test]
    fn test_labeled_total_beats_item_prices() {
        let result = parser().parse(GROCERY_RECEIPT);
        assert_eq!(result.draft.amount, 282.0);
    }

    #[test]
    fn test_merchant_from_top_lines() {
        let result = parser().parse(GROCERY_RECEIPT);
        assert_eq!(result.draft.counterparty, "Dmart Super Store");
    }

    #[test]
    fn test_line_items() {
        let result = parser().parse(GROCERY_RECEIPT);
        assert_eq!(result.items.len(), 2);
        assert_eq!(result.items[0].name, "Rice");
        assert_eq!(result.items[0].quantity, 2);
        assert_eq!(result.items[0].price, 80.0);
        assert_eq!(result.items[1].name, "Milk");
        assert_eq!(result.items[1].quantity, 4);
    }

    #[test]
    fn test_receipts_are_always_debits() {
        let result = parser().parse(GROCERY_RECEIPT);
        assert_eq!(result.draft.txn_type, TxnType::Debited);
        assert_eq!(result.draft.source_channel, Channel::Receipt);
    }

    #[test]
    fn test_storefront_category() {
        let result = parser().parse(GROCERY_RECEIPT);
        assert_eq!(result.draft.category, "Groceries");
    }

    #[test]
    fn test_fallback_takes_largest_number() {
        let result = parser().parse("Corner Shop\nItem A 45\nItem B 120\nItem C 85");
        assert_eq!(result.draft.amount, 120.0);
    }

    #[test]
    fn test_date_from_receipt() {
        let result = parser().parse(GROCERY_RECEIPT);
        assert_eq!(
            result.draft.date.format("%Y-%m-%d").to_string(),
            "2024-01-12"
        );
    }

    #[test]
    fn test_merchant_noise_stripped() {
        assert_eq!(clean_merchant("GST Mega Mart Invoice"), "Mega Mart");
    }
}
