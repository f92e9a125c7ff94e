use std::fmt;

use chrono::{DateTime, Utc};

/// Stable identifier for one message.
///
/// Only used for list identity inside a single session; ids are not comparable across
/// stores and callers must not infer ordering from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub u64);

impl MessageId {
    /// Creates a typed message identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// One immutable chat entry.
///
/// Messages are only built by [`crate::MessageStore`] and expose no mutators, so an
/// entry never changes once it is in the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    id: MessageId,
    text: String,
    created_at: DateTime<Utc>,
    is_sender: bool,
}

impl Message {
    pub(crate) fn new(
        id: MessageId,
        text: impl Into<String>,
        created_at: DateTime<Utc>,
        is_sender: bool,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            created_at,
            is_sender,
        }
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// True for messages authored on this device.
    pub fn is_sender(&self) -> bool {
        self.is_sender
    }

    /// Blank text never becomes a message.
    pub fn is_blank(text: &str) -> bool {
        Self::trimmed(text).is_empty()
    }

    /// Strips surrounding whitespace, including byte order marks pasted in with the text.
    pub fn trimmed(text: &str) -> &str {
        text.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_detection_uses_the_trimmed_form() {
        assert!(Message::is_blank(""));
        assert!(Message::is_blank("   "));
        assert!(Message::is_blank("\n\t \r\n"));
        assert!(Message::is_blank("\u{3000}"));
        assert!(Message::is_blank("\u{FEFF}"));
        assert!(Message::is_blank(" \u{FEFF}\n"));
        assert!(!Message::is_blank(" a "));
        assert!(!Message::is_blank("."));
    }

    #[test]
    fn trimmed_strips_byte_order_marks_but_keeps_inner_text() {
        assert_eq!(Message::trimmed("\u{FEFF} hi there \u{FEFF}"), "hi there");
        assert_eq!(Message::trimmed("a\u{FEFF}b"), "a\u{FEFF}b");
    }

    #[test]
    fn message_id_displays_raw_value() {
        assert_eq!(MessageId::new(42).to_string(), "42");
    }
}
