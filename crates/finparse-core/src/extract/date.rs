//! Date extraction
//!
//! Scans for numeric and written date patterns, then tries a fixed format
//! ladder (day-first formats before ISO). The match span is reported so the
//! statement parser can remove it from a line before amount extraction.

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;

const DATE_PATTERNS: &[&str] = &[
    r"(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})",
    r"(\d{4}[/-]\d{1,2}[/-]\d{1,2})",
    r"(\d{1,2}\s+[a-zA-Z]{3,9}\s+\d{2,4})",
];

const DATE_FORMATS: &[&str] = &[
    "%d-%m-%Y", "%d/%m/%Y", "%d-%m-%y", "%d/%m/%y", "%Y-%m-%d", "%Y/%m/%d", "%d %B %Y", "%d %b %Y",
];

/// A recognized date and the byte span it occupied in the input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateMatch {
    pub date: NaiveDate,
    pub start: usize,
    pub end: usize,
}

impl DateMatch {
    /// Midnight UTC on the matched date
    pub fn to_utc(&self) -> DateTime<Utc> {
        self.date
            .and_hms_opt(0, 0, 0)
            .unwrap_or_default()
            .and_utc()
    }
}

pub struct DateExtractor {
    patterns: Vec<Regex>,
}

impl DateExtractor {
    pub fn new() -> Self {
        Self {
            patterns: DATE_PATTERNS
                .iter()
                .map(|p| Regex::new(p).expect("valid date pattern"))
                .collect(),
        }
    }

    /// First recognizable date in the text, if any
    pub fn extract(&self, text: &str) -> Option<DateMatch> {
        for pattern in &self.patterns {
            for caps in pattern.captures_iter(text) {
                let m = caps.get(1)?;
                for fmt in DATE_FORMATS {
                    if let Ok(date) = NaiveDate::parse_from_str(m.as_str(), fmt) {
                        return Some(DateMatch {
                            date,
                            start: m.start(),
                            end: m.end(),
                        });
                    }
                }
            }
        }
        None
    }

    /// Parsed date as a UTC timestamp, or the current time when absent
    pub fn extract_or_now(&self, text: &str) -> DateTime<Utc> {
        self.extract(text)
            .map(|m| m.to_utc())
            .unwrap_or_else(Utc::now)
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_first_numeric() {
        let ex = DateExtractor::new();
        let m = ex.extract("debited on 15/01/2024 via UPI").unwrap();
        assert_eq!(m.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_dash_separated_two_digit_year() {
        let ex = DateExtractor::new();
        let m = ex.extract("txn dated 02-03-24").unwrap();
        assert_eq!(m.date, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
    }

    #[test]
    fn test_iso_format() {
        let ex = DateExtractor::new();
        let m = ex.extract("statement line 2024-06-30 closing").unwrap();
        assert_eq!(m.date, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
    }

    #[test]
    fn test_written_month() {
        let ex = DateExtractor::new();
        let m = ex.extract("paid on 5 March 2024 at noon").unwrap();
        assert_eq!(m.date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }

    #[test]
    fn test_span_covers_the_date_text() {
        let ex = DateExtractor::new();
        let text = "12/01/2024 UPI-SWIGGY 450.00 DR";
        let m = ex.extract(text).unwrap();
        assert_eq!(&text[m.start..m.end], "12/01/2024");
    }

    #[test]
    fn test_invalid_date_skipped() {
        let ex = DateExtractor::new();
        // 45/45/2024 matches the numeric pattern but no format parses it
        assert!(ex.extract("code 45/45/2024 here").is_none());
    }

    #[test]
    fn test_no_date() {
        let ex = DateExtractor::new();
        assert!(ex.extract("thanks for the update").is_none());
    }
}
