//! Bounded conversation history and recent-answer log.
//!
//! The history enforces a token budget by evicting oldest turns first after
//! every mutation. Costs are a cheap length-proportional proxy fixed on each
//! message at construction, never an exact token count.

use chrono::Local;

use murmur_core::types::{AnswerLogEntry, ConversationMessage};

/// Ordered, token-budgeted conversation log.
///
/// Invariant: `total_cost() <= budget` after every mutation. The message
/// currently being constructed for an in-flight completion is never here;
/// turns are only pushed after a successful round-trip.
#[derive(Debug)]
pub struct ConversationHistory {
    messages: Vec<ConversationMessage>,
    budget: usize,
}

impl ConversationHistory {
    pub fn new(budget: usize) -> Self {
        Self {
            messages: Vec::new(),
            budget,
        }
    }

    /// Append a turn, then evict oldest-first until back under budget.
    pub fn push(&mut self, message: ConversationMessage) {
        self.messages.push(message);
        let mut evicted = 0;
        while self.total_cost() > self.budget && !self.messages.is_empty() {
            self.messages.remove(0);
            evicted += 1;
        }
        if evicted > 0 {
            tracing::debug!(evicted, remaining = self.messages.len(), "History trimmed to budget");
        }
    }

    pub fn total_cost(&self) -> usize {
        self.messages.iter().map(|m| m.estimated_cost).sum()
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

/// Fixed-capacity recent-answer list, newest first.
#[derive(Debug)]
pub struct AnswerLog {
    entries: Vec<AnswerLogEntry>,
    capacity: usize,
}

impl AnswerLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Insert at the head, dropping the oldest entry past capacity.
    pub fn push(&mut self, text: impl Into<String>) {
        self.insert_stamped(text, Local::now().format("%H:%M").to_string());
    }

    fn insert_stamped(&mut self, text: impl Into<String>, timestamp: String) {
        self.entries.insert(
            0,
            AnswerLogEntry {
                text: text.into(),
                timestamp,
            },
        );
        self.entries.truncate(self.capacity);
    }

    pub fn entries(&self) -> &[AnswerLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use murmur_core::types::{MessageOrigin, Role};

    fn msg(content: &str) -> ConversationMessage {
        ConversationMessage::new(Role::User, content, MessageOrigin::Voice)
    }

    // ---- ConversationHistory ----

    #[test]
    fn test_history_starts_empty() {
        let history = ConversationHistory::new(100);
        assert!(history.is_empty());
        assert_eq!(history.total_cost(), 0);
    }

    #[test]
    fn test_push_within_budget_keeps_all() {
        let mut history = ConversationHistory::new(100);
        history.push(msg(&"a".repeat(40))); // cost 10
        history.push(msg(&"b".repeat(40))); // cost 10
        assert_eq!(history.len(), 2);
        assert_eq!(history.total_cost(), 20);
    }

    #[test]
    fn test_budget_invariant_after_every_push() {
        let mut history = ConversationHistory::new(25);
        for _ in 0..20 {
            history.push(msg(&"x".repeat(40))); // cost 10 each
            assert!(history.total_cost() <= 25);
        }
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_eviction_is_fifo_keeping_recent_suffix() {
        let mut history = ConversationHistory::new(20);
        history.push(msg(&"first ".repeat(8))); // cost 12
        history.push(msg(&"second ".repeat(4))); // cost 7
        history.push(msg(&"third ".repeat(6))); // cost 9, evicts "first"
        let contents: Vec<&str> = history
            .messages()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents.len(), 2);
        assert!(contents[0].starts_with("second"));
        assert!(contents[1].starts_with("third"));
    }

    #[test]
    fn test_oversized_single_message_evicts_itself_last() {
        // A message alone over budget leaves the history empty rather than
        // looping forever.
        let mut history = ConversationHistory::new(10);
        history.push(msg(&"y".repeat(400))); // cost 100
        assert!(history.is_empty());
        assert_eq!(history.total_cost(), 0);
    }

    #[test]
    fn test_exact_budget_is_kept() {
        let mut history = ConversationHistory::new(10);
        history.push(msg(&"z".repeat(40))); // cost exactly 10
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut history = ConversationHistory::new(100);
        history.push(msg("hello there"));
        history.clear();
        assert!(history.is_empty());
    }

    // ---- AnswerLog ----

    #[test]
    fn test_answer_log_newest_at_head() {
        let mut log = AnswerLog::new(15);
        log.push("first");
        log.push("second");
        assert_eq!(log.entries()[0].text, "second");
        assert_eq!(log.entries()[1].text, "first");
    }

    #[test]
    fn test_answer_log_never_exceeds_capacity() {
        let mut log = AnswerLog::new(3);
        for i in 0..10 {
            log.push(format!("answer {}", i));
            assert!(log.len() <= 3);
        }
    }

    #[test]
    fn test_answer_log_overflow_drops_oldest() {
        let mut log = AnswerLog::new(3);
        for i in 0..4 {
            log.push(format!("answer {}", i));
        }
        let texts: Vec<&str> = log.entries().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["answer 3", "answer 2", "answer 1"]);
    }

    #[test]
    fn test_answer_log_entries_are_timestamped() {
        let mut log = AnswerLog::new(5);
        log.push("stamped");
        let stamp = &log.entries()[0].timestamp;
        // %H:%M
        assert_eq!(stamp.len(), 5);
        assert_eq!(stamp.as_bytes()[2], b':');
    }

    #[test]
    fn test_answer_log_clear() {
        let mut log = AnswerLog::new(5);
        log.push("gone soon");
        log.clear();
        assert!(log.is_empty());
    }
}
