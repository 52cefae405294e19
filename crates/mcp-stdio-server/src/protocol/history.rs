//! Bounded FIFO of recent raw request lines, for diagnostics.

use std::collections::VecDeque;

/// Number of raw requests retained.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

#[derive(Debug, Clone)]
pub struct RequestHistory {
    entries: VecDeque<String>,
    capacity: usize,
}

impl RequestHistory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a raw request, evicting the oldest once over capacity.
    pub fn record(&mut self, raw: &str) {
        if self.capacity == 0 {
            return;
        }
        self.entries.push_back(raw.to_string());
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for RequestHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_insertion_order() {
        let mut history = RequestHistory::new();
        history.record("a");
        history.record("b");
        history.record("c");
        assert_eq!(history.iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_evicts_oldest_past_capacity() {
        let mut history = RequestHistory::new();
        for i in 1..=11 {
            history.record(&format!("req-{i}"));
        }
        assert_eq!(history.len(), DEFAULT_HISTORY_CAPACITY);
        let entries = history.snapshot();
        assert!(!entries.contains(&"req-1".to_string()));
        assert_eq!(entries.first().map(String::as_str), Some("req-2"));
        assert_eq!(entries.last().map(String::as_str), Some("req-11"));
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut history = RequestHistory::with_capacity(3);
        for i in 0..100 {
            history.record(&i.to_string());
            assert!(history.len() <= 3);
        }
        assert_eq!(history.snapshot(), vec!["97", "98", "99"]);
    }

    #[test]
    fn test_zero_capacity_records_nothing() {
        let mut history = RequestHistory::with_capacity(0);
        history.record("x");
        assert!(history.is_empty());
    }
}
