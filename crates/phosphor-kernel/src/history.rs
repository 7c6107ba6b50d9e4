//! Bounded command history with a recall cursor.

use std::collections::VecDeque;

/// Default number of remembered inputs.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Previously submitted inputs, oldest first.
///
/// Holds at most `limit` entries; pushing past the limit evicts the oldest.
/// The cursor walks backwards with [`older`](Self::older) and forwards
/// with [`newer`](Self::newer), and resets to "none" on every submission.
#[derive(Debug, Clone)]
pub struct CommandHistory {
    entries: VecDeque<String>,
    limit: usize,
    cursor: Option<usize>,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl CommandHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit.min(DEFAULT_HISTORY_LIMIT)),
            limit,
            cursor: None,
        }
    }

    /// Record a submitted input.
    ///
    /// Blank input and an exact repeat of the newest entry are not stored.
    /// Returns whether the input was recorded. Always resets the cursor.
    pub fn push(&mut self, input: &str) -> bool {
        self.cursor = None;
        if input.trim().is_empty() || self.limit == 0 {
            return false;
        }
        if self.entries.back().is_some_and(|last| last == input) {
            return false;
        }
        self.entries.push_back(input.to_string());
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
        true
    }

    /// Step back to an older entry. Stops at the oldest.
    pub fn older(&mut self) -> Option<&str> {
        let idx = match self.cursor {
            None => self.entries.len().checked_sub(1)?,
            Some(idx) => idx.saturating_sub(1),
        };
        self.cursor = Some(idx);
        self.entries.get(idx).map(String::as_str)
    }

    /// Step forward to a newer entry. Past the newest, the cursor resets
    /// and `None` means "back to an empty line".
    pub fn newer(&mut self) -> Option<&str> {
        let idx = self.cursor? + 1;
        if idx >= self.entries.len() {
            self.cursor = None;
            return None;
        }
        self.cursor = Some(idx);
        self.entries.get(idx).map(String::as_str)
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = None;
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_past_limit() {
        let mut history = CommandHistory::new(3);
        for cmd in ["a", "b", "c", "d"] {
            history.push(cmd);
        }
        assert_eq!(history.iter().collect::<Vec<_>>(), ["b", "c", "d"]);
    }

    #[test]
    fn default_limit_is_fifty() {
        let mut history = CommandHistory::default();
        for i in 0..60 {
            history.push(&format!("cmd {i}"));
        }
        assert_eq!(history.len(), 50);
        assert_eq!(history.iter().next(), Some("cmd 10"));
    }

    #[test]
    fn skips_blank_and_repeats() {
        let mut history = CommandHistory::default();
        assert!(history.push("ls"));
        assert!(!history.push("ls"));
        assert!(!history.push("   "));
        assert!(history.push("pwd"));
        assert!(history.push("ls"));
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn recall_walks_back_and_forth() {
        let mut history = CommandHistory::default();
        history.push("one");
        history.push("two");
        history.push("three");

        assert_eq!(history.older(), Some("three"));
        assert_eq!(history.older(), Some("two"));
        assert_eq!(history.older(), Some("one"));
        // Clamped at the oldest
        assert_eq!(history.older(), Some("one"));

        assert_eq!(history.newer(), Some("two"));
        assert_eq!(history.newer(), Some("three"));
        assert_eq!(history.newer(), None);
        assert_eq!(history.cursor(), None);
    }

    #[test]
    fn submission_resets_cursor() {
        let mut history = CommandHistory::default();
        history.push("one");
        history.push("two");
        history.older();
        assert_eq!(history.cursor(), Some(1));
        history.push("three");
        assert_eq!(history.cursor(), None);
        assert_eq!(history.older(), Some("three"));
    }

    #[test]
    fn empty_history_recalls_nothing() {
        let mut history = CommandHistory::default();
        assert_eq!(history.older(), None);
        assert_eq!(history.newer(), None);
        assert_eq!(history.cursor(), None);
    }

    #[test]
    fn zero_limit_stores_nothing() {
        let mut history = CommandHistory::new(0);
        assert!(!history.push("ls"));
        assert!(history.is_empty());
    }

    #[test]
    fn clear_forgets_everything() {
        let mut history = CommandHistory::default();
        history.push("ls");
        history.older();
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.cursor(), None);
    }
}
