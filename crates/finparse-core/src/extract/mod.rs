//! Rule-based field extractors and channel parsers
//!
//! Leaf extractors (amount, transaction type, counterparty, date) are
//! independent regex cascades with no dependencies on the rest of the
//! core. Channel parsers compose them into full drafts, all classifying
//! through one shared [`Taxonomy`](crate::taxonomy::Taxonomy) instance.

pub mod amount;
pub mod counterparty;
pub mod date;
pub mod email;
pub mod receipt;
pub mod sms;
pub mod statement;
pub mod txn_type;
pub mod voice;

pub use amount::AmountExtractor;
pub use counterparty::CounterpartyExtractor;
pub use date::{DateExtractor, DateMatch};
pub use email::EmailParser;
pub use receipt::ReceiptParser;
pub use sms::SmsParser;
pub use statement::StatementParser;
pub use txn_type::TypeDetector;
pub use voice::VoiceParser;

/// Title-case each whitespace-separated word
pub(crate) fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("john doe"), "John Doe");
        assert_eq!(title_case("BIG BAZAAR"), "Big Bazaar");
        assert_eq!(title_case(""), "");
    }
}
