use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::message::{Message, MessageId};

/// What gets stored for a non-blank message.
///
/// Blankness is always judged on the trimmed text; the policy only decides whether the
/// surrounding whitespace survives into the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextPolicy {
    #[default]
    Verbatim,
    Trimmed,
}

impl TextPolicy {
    fn apply<'a>(&self, text: &'a str) -> &'a str {
        match self {
            Self::Verbatim => text,
            Self::Trimmed => Message::trimmed(text),
        }
    }
}

/// Append-only message log for one screen session.
///
/// The store is the only owner of the conversation. Readers get a borrowed slice, so
/// what they see is always the state after the latest append.
#[derive(Debug)]
pub struct MessageStore {
    messages: Vec<Message>,
    next_message_id: u64,
    revision: u64,
    text_policy: TextPolicy,
    clock: Box<dyn Clock>,
}

impl MessageStore {
    /// Creates an empty conversation stamped by the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            messages: Vec::new(),
            next_message_id: 1,
            revision: 0,
            text_policy: TextPolicy::default(),
            clock: Box::new(clock),
        }
    }

    pub fn with_text_policy(mut self, text_policy: TextPolicy) -> Self {
        self.text_policy = text_policy;
        self
    }

    pub fn text_policy(&self) -> TextPolicy {
        self.text_policy
    }

    /// Appends a locally authored message.
    ///
    /// Blank text is a silent no-op: nothing is constructed and the log is unchanged.
    pub fn append(&mut self, text: &str) -> Option<&Message> {
        self.push(text, true)
    }

    /// Appends a message from some other origin.
    ///
    /// Nothing in this workspace produces inbound messages; this is the hook an
    /// external channel would call.
    pub fn append_incoming(&mut self, text: &str) -> Option<&Message> {
        self.push(text, false)
    }

    /// The conversation in insertion order, oldest first.
    pub fn current(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Bumped once per accepted append; views compare it to skip redundant syncs.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn push(&mut self, text: &str, is_sender: bool) -> Option<&Message> {
        if Message::is_blank(text) {
            tracing::debug!(is_sender, "ignored blank message");
            return None;
        }

        let id = self.alloc_message_id();
        let message = Message::new(id, self.text_policy.apply(text), self.clock.now(), is_sender);
        self.messages.push(message);
        self.revision = self.revision.saturating_add(1);

        tracing::debug!(
            message_id = %id,
            is_sender,
            len = self.messages.len(),
            "appended message"
        );
        self.messages.last()
    }

    fn alloc_message_id(&mut self) -> MessageId {
        let id = MessageId::new(self.next_message_id);
        self.next_message_id = self.next_message_id.saturating_add(1);
        id
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::clock::ManualClock;

    fn texts(store: &MessageStore) -> Vec<&str> {
        store.current().iter().map(Message::text).collect()
    }

    #[test]
    fn append_keeps_insertion_order() {
        let mut store = MessageStore::new();
        for text in ["first", "second", "third"] {
            assert!(store.append(text).is_some());
        }

        assert_eq!(texts(&store), ["first", "second", "third"]);
        assert_eq!(store.last().map(Message::text), Some("third"));
    }

    #[test]
    fn blank_append_is_a_no_op() {
        let mut store = MessageStore::new();
        store.append("keep");
        let revision = store.revision();

        for blank in ["", " ", "\t\n", "   \r\n  ", "\u{FEFF}"] {
            assert!(store.append(blank).is_none());
            assert!(store.append_incoming(blank).is_none());
        }

        assert_eq!(store.len(), 1);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn verbatim_policy_stores_untrimmed_text() {
        let mut store = MessageStore::new();
        let message = store.append("  padded  ").cloned();

        assert_eq!(message.map(|m| m.text().to_string()), Some("  padded  ".into()));
    }

    #[test]
    fn trimmed_policy_strips_surrounding_whitespace() {
        let mut store = MessageStore::new().with_text_policy(TextPolicy::Trimmed);
        store.append("\n  padded  \t");
        store.append("\u{FEFF}marked ");

        assert_eq!(texts(&store), ["padded", "marked"]);
        assert_eq!(store.text_policy(), TextPolicy::Trimmed);
    }

    #[test]
    fn sender_flag_depends_on_origin() {
        let mut store = MessageStore::new();
        store.append("mine");
        store.append_incoming("theirs");

        let flags = store
            .current()
            .iter()
            .map(Message::is_sender)
            .collect::<Vec<_>>();
        assert_eq!(flags, [true, false]);
    }

    #[test]
    fn ids_are_distinct() {
        let mut store = MessageStore::new();
        let first = store.append("a").map(Message::id);
        let second = store.append("b").map(Message::id);

        assert!(first.is_some() && second.is_some());
        assert_ne!(first, second);
        assert_eq!(store.last().map(Message::id), second);
    }

    #[test]
    fn created_at_comes_from_the_clock() {
        let clock = Rc::new(ManualClock::fixed());
        let start = clock.now();
        let mut store = MessageStore::with_clock(Rc::clone(&clock));

        store.append("at start");
        clock.advance(chrono::Duration::minutes(5));
        store.append("later");

        let stamps = store
            .current()
            .iter()
            .map(Message::created_at)
            .collect::<Vec<_>>();
        assert_eq!(stamps, [start, start + chrono::Duration::minutes(5)]);
    }

    #[test]
    fn revision_tracks_accepted_appends() {
        let mut store = MessageStore::default();
        assert_eq!(store.revision(), 0);
        assert!(store.is_empty());

        store.append("one");
        store.append("");
        store.append_incoming("two");

        assert_eq!(store.revision(), 2);
        assert_eq!(store.len(), 2);
    }
}
