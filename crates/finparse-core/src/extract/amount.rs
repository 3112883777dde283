//! Amount extraction
//!
//! Ordered regex cascade from most to least specific: currency-prefixed,
//! labeled amount/amt, bare two-decimal number, last-resort 3-7 digit bare
//! integer. First pattern that matches and parses cleanly wins. Fail-soft:
//! never errors, returns `Defaulted(0.0)` when nothing usable is found.

use regex::Regex;

use crate::models::Extracted;

/// Strong patterns, most specific first. All captures allow comma groups;
/// commas are stripped before parsing, which also handles Indian digit
/// grouping ("1,50,000" parses as 150000).
const AMOUNT_PATTERNS: &[&str] = &[
    r"inr\s*([\d,]+\.?\d*)",
    r"rs\.?\s*([\d,]+\.?\d*)",
    r"₹\s*([\d,]+\.?\d*)",
    r"amount\s*:?\s*([\d,]+\.?\d*)",
    r"amt\s*:?\s*([\d,]+\.?\d*)",
    r"([\d,]+\.\d{2})",
];

pub struct AmountExtractor {
    patterns: Vec<Regex>,
    /// 3-7 digits only, so clock times like "8 PM" or years inside ids
    /// longer than 7 digits are never mistaken for amounts
    bare_integer: Regex,
}

impl AmountExtractor {
    pub fn new() -> Self {
        Self {
            patterns: AMOUNT_PATTERNS
                .iter()
                .map(|p| Regex::new(p).expect("valid amount pattern"))
                .collect(),
            bare_integer: Regex::new(r"\b(\d{3,7})\b").expect("valid regex"),
        }
    }

    /// Extract a non-negative amount from raw text
    pub fn extract(&self, text: &str) -> Extracted<f64> {
        let text_low = text.to_lowercase();

        for pattern in &self.patterns {
            if let Some(caps) = pattern.captures(&text_low) {
                let raw = caps[1].replace(',', "");
                if let Ok(value) = raw.parse::<f64>() {
                    if value >= 0.0 {
                        return Extracted::Parsed(value);
                    }
                }
                // Matched but did not parse cleanly: fall through to the
                // next, less specific pattern
            }
        }

        if let Some(caps) = self.bare_integer.captures(&text_low) {
            if let Ok(value) = caps[1].parse::<f64>() {
                return Extracted::Parsed(value);
            }
        }

        Extracted::Defaulted(0.0)
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_prefixed() {
        let ex = AmountExtractor::new();
        assert_eq!(ex.extract("Paid Rs. 500 to Swiggy").value(), 500.0);
        assert_eq!(ex.extract("Salary of INR 45000 credited").value(), 45000.0);
        assert_eq!(ex.extract("₹1,234.50 debited").value(), 1234.5);
    }

    #[test]
    fn test_labeled_amount() {
        let ex = AmountExtractor::new();
        assert_eq!(ex.extract("Amount: 2500 transferred").value(), 2500.0);
        assert_eq!(ex.extract("amt 320.75 deducted").value(), 320.75);
    }

    #[test]
    fn test_indian_digit_grouping() {
        let ex = AmountExtractor::new();
        // All comma groups are stripped, so lakh grouping parses correctly
        assert_eq!(ex.extract("Rs 1,50,000 credited").value(), 150_000.0);
    }

    #[test]
    fn test_bare_decimal() {
        let ex = AmountExtractor::new();
        let result = ex.extract("Your card was charged 4500.00 today");
        assert!(result.is_parsed());
        assert_eq!(result.value(), 4500.0);
    }

    #[test]
    fn test_bare_integer_fallback_three_to_seven_digits() {
        let ex = AmountExtractor::new();
        assert_eq!(ex.extract("spent 750 on fuel").value(), 750.0);
        // Two digits never match the fallback, so "8 PM"-style numbers
        // cannot become amounts
        let result = ex.extract("meeting at 8 pm for 45 minutes");
        assert!(!result.is_parsed());
        assert_eq!(result.value(), 0.0);
    }

    #[test]
    fn test_no_amount_defaults_to_zero() {
        let ex = AmountExtractor::new();
        let result = ex.extract("thanks for the update");
        assert!(!result.is_parsed());
        assert_eq!(result.value(), 0.0);
    }

    #[test]
    fn test_first_match_wins() {
        let ex = AmountExtractor::new();
        // Currency prefix beats the later bare decimal
        assert_eq!(ex.extract("INR 300 fee, balance 9999.99").value(), 300.0);
    }

    #[test]
    fn test_parsed_zero_is_distinguishable_from_default() {
        let ex = AmountExtractor::new();
        let zero = ex.extract("Rs 0.00 charged as annual fee");
        assert!(zero.is_parsed());
        assert_eq!(zero.value(), 0.0);
    }

    #[test]
    fn test_deterministic() {
        let ex = AmountExtractor::new();
        let a = ex.extract("Rs. 1,299 spent at Amazon");
        let b = ex.extract("Rs. 1,299 spent at Amazon");
        assert_eq!(a, b);
    }
}
