//! Recent-activity window for duplicate detection
//!
//! A size-bounded FIFO of (amount, counterparty) pairs. A new draft is a
//! duplicate when the same pair appears among the most recent entries.
//! Single-writer: the pipeline owns one window per process, so no lock
//! is needed inside.

use std::collections::VecDeque;

const DEFAULT_CAPACITY: usize = 20;
const CHECK_DEPTH: usize = 5;

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    amount: f64,
    counterparty: String,
}

#[derive(Debug)]
pub struct RecentWindow {
    entries: VecDeque<Entry>,
    capacity: usize,
}

impl RecentWindow {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Check the newest entries for a matching pair, then record this
    /// one. Returns true when the draft looks like a duplicate.
    pub fn check_and_record(&mut self, amount: f64, counterparty: &str) -> bool {
        let duplicate = self
            .entries
            .iter()
            .rev()
            .take(CHECK_DEPTH)
            .any(|e| e.amount == amount && e.counterparty == counterparty);

        if !duplicate {
            self.entries.push_back(Entry {
                amount,
                counterparty: counterparty.to_string(),
            });
            if self.entries.len() > self.capacity {
                self.entries.pop_front();
            }
        }

        duplicate
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RecentWindow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeat_within_window_is_duplicate() {
        let mut window = RecentWindow::new();
        assert!(!window.check_and_record(450.0, "Swiggy"));
        assert!(window.check_and_record(450.0, "Swiggy"));
    }

    #[test]
    fn test_different_counterparty_is_not_duplicate() {
        let mut window = RecentWindow::new();
        assert!(!window.check_and_record(450.0, "Swiggy"));
        assert!(!window.check_and_record(450.0, "Zomato"));
    }

    #[test]
    fn test_only_newest_entries_are_checked() {
        let mut window = RecentWindow::new();
        assert!(!window.check_and_record(100.0, "Swiggy"));
        for i in 0..CHECK_DEPTH {
            window.check_and_record(200.0 + i as f64, "Filler");
        }
        // The Swiggy entry has aged past the check depth
        assert!(!window.check_and_record(100.0, "Swiggy"));
    }

    #[test]
    fn test_eviction_cap() {
        let mut window = RecentWindow::with_capacity(3);
        for i in 0..10 {
            window.check_and_record(i as f64, "M");
        }
        assert!(window.len() <= 3);
    }
}
