//! Bounded conversation buffers for private chats and group channels.
//!
//! Both buffers trim on write: after every mutation only the most recent
//! `cap` entries survive, oldest first out.

use crate::types::Turn;

/// Three user/model pairs.
pub const CONVERSATION_CAP: usize = 6;

/// Lines kept per group channel.
pub const GROUP_LOG_CAP: usize = 10;

/// Appends `new_entries` in order, then keeps only the last `cap` elements.
pub fn append_and_trim<T>(
    buffer: &mut Vec<T>,
    new_entries: impl IntoIterator<Item = T>,
    cap: usize,
) {
    buffer.extend(new_entries);
    if buffer.len() > cap {
        let excess = buffer.len() - cap;
        buffer.drain(..excess);
    }
}

/// Rolling history of a private 1:1 chat session.
///
/// Turns are always recorded in user/model pairs and the cap is even, so the
/// buffer never starts with a model turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationHistory {
    turns: Vec<Turn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one exchange as a user turn followed by a model turn.
    pub fn record_exchange(
        &mut self,
        user_text: impl Into<String>,
        model_text: impl Into<String>,
    ) {
        append_and_trim(
            &mut self.turns,
            [Turn::user(user_text), Turn::model(model_text)],
            CONVERSATION_CAP,
        );
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Recent lines seen in a group channel, formatted as `"<sender>: <text>"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupMessageLog {
    lines: Vec<String>,
}

impl GroupMessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_message(&mut self, sender: &str, text: &str) {
        append_and_trim(&mut self.lines, [format!("{sender}: {text}")], GROUP_LOG_CAP);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    #[test]
    fn append_and_trim_keeps_most_recent() {
        let mut buffer = vec![1, 2, 3];
        append_and_trim(&mut buffer, [4, 5], 4);
        assert_eq!(buffer, vec![2, 3, 4, 5]);
    }

    #[test]
    fn append_and_trim_under_cap_is_plain_append() {
        let mut buffer = vec!["a"];
        append_and_trim(&mut buffer, ["b"], 10);
        assert_eq!(buffer, vec!["a", "b"]);
    }

    #[test]
    fn append_and_trim_with_oversized_batch() {
        let mut buffer: Vec<u8> = Vec::new();
        append_and_trim(&mut buffer, 0..20, 3);
        assert_eq!(buffer, vec![17, 18, 19]);
    }

    #[test]
    fn conversation_length_follows_exchange_count() {
        let mut history = ConversationHistory::new();
        for exchange in 1..=8 {
            history.record_exchange(format!("q{exchange}"), format!("a{exchange}"));
            assert_eq!(history.len(), (2 * exchange).min(CONVERSATION_CAP));
            assert_eq!(history.turns()[0].role, Role::User);
            for pair in history.turns().chunks(2) {
                assert_eq!(pair[0].role, Role::User);
                assert_eq!(pair[1].role, Role::Model);
                assert_eq!(&pair[0].text[1..], &pair[1].text[1..]);
            }
        }
    }

    #[test]
    fn conversation_evicts_oldest_pair() {
        let mut history = ConversationHistory::new();
        history.record_exchange("hello", "hi there");
        assert_eq!(
            history.turns(),
            &[Turn::user("hello"), Turn::model("hi there")]
        );

        for text in ["two", "three", "four"] {
            history.record_exchange(text, "ok");
        }

        assert_eq!(history.len(), 6);
        assert_eq!(history.turns()[0], Turn::user("two"));
        assert!(!history.turns().iter().any(|t| t.text == "hello"));
    }

    #[test]
    fn group_log_keeps_last_ten_in_order() {
        let mut log = GroupMessageLog::new();
        for n in 1..=25 {
            log.push_message("A", &format!("msg {n}"));
            assert_eq!(log.len(), n.min(GROUP_LOG_CAP));
        }

        let expected: Vec<String> = (16..=25).map(|n| format!("A: msg {n}")).collect();
        assert_eq!(log.lines(), expected.as_slice());
    }

    #[test]
    fn group_log_formats_sender_prefix() {
        let mut log = GroupMessageLog::new();
        log.push_message("Alice", "hi");
        assert_eq!(log.lines(), &["Alice: hi".to_string()]);
    }
}
