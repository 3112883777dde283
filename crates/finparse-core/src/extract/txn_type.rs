//! Transaction-type detection
//!
//! Keyword-set membership with word-boundary anchoring. Credit keywords are
//! checked before debit keywords, so text containing both classifies as
//! Credited. That tie-break is deliberate and fixed by the test suite.

use regex::Regex;

use crate::models::TxnType;

pub struct TypeDetector {
    credit: Regex,
    debit: Regex,
}

impl TypeDetector {
    pub fn new() -> Self {
        Self {
            credit: Regex::new(r"\b(credited|received|deposit|income|credit)\b")
                .expect("valid regex"),
            debit: Regex::new(r"\b(debited|spent|paid|withdrawn|charged|debit)\b")
                .expect("valid regex"),
        }
    }

    pub fn detect(&self, text: &str) -> TxnType {
        let text_low = text.to_lowercase();

        if self.credit.is_match(&text_low) {
            TxnType::Credited
        } else if self.debit.is_match(&text_low) {
            TxnType::Debited
        } else {
            TxnType::Unknown
        }
    }
}

impl Default for TypeDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_keywords() {
        let det = TypeDetector::new();
        assert_eq!(det.detect("INR 45000 credited to your account"), TxnType::Credited);
        assert_eq!(det.detect("you have received 500"), TxnType::Credited);
        assert_eq!(det.detect("cash deposit of 2000"), TxnType::Credited);
    }

    #[test]
    fn test_debit_keywords() {
        let det = TypeDetector::new();
        assert_eq!(det.detect("Rs 500 debited via UPI"), TxnType::Debited);
        assert_eq!(det.detect("paid 300 to Swiggy"), TxnType::Debited);
        assert_eq!(det.detect("you spent 99 at Spotify"), TxnType::Debited);
        assert_eq!(det.detect("1200 withdrawn from ATM"), TxnType::Debited);
    }

    #[test]
    fn test_neither_is_unknown() {
        let det = TypeDetector::new();
        assert_eq!(det.detect("thanks for the update"), TxnType::Unknown);
    }

    #[test]
    fn test_credit_bias_tie_break() {
        let det = TypeDetector::new();
        // Both keyword sets hit; credit is checked first
        assert_eq!(det.detect("salary credited, EMI debited same day"), TxnType::Credited);
    }

    #[test]
    fn test_word_boundaries() {
        let det = TypeDetector::new();
        // "creditworthiness" must not hit the credit set
        assert_eq!(det.detect("your creditworthiness improved"), TxnType::Unknown);
        // but the bare word "credit" does
        assert_eq!(det.detect("credit of 900 done"), TxnType::Credited);
    }
}
