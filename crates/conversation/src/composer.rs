use crate::message::Message;

/// Whether the draft holds any characters at all.
///
/// `NonEmpty` does not imply sendable: a draft of spaces is `NonEmpty` but blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposerState {
    #[default]
    Empty,
    NonEmpty,
}

/// What an Enter keystroke does, decided before the text field applies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnterAction {
    /// Send this text. The composer is already empty.
    Submit(String),
    /// Shift+Enter: the field should insert a line break.
    InsertNewline,
    /// Blank draft: swallow the key and keep the draft.
    Ignore,
}

/// Draft text behind the send action.
///
/// The composer never owns messages; it hands the draft over on a successful send and
/// starts again from empty.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    draft: String,
    state: ComposerState,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn state(&self) -> ComposerState {
        self.state
    }

    /// Replaces the draft with the current field contents.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
        self.refresh_state();
    }

    pub fn clear(&mut self) {
        self.draft.clear();
        self.refresh_state();
    }

    /// True when a send would produce a message.
    pub fn can_send(&self) -> bool {
        self.state == ComposerState::NonEmpty && !Message::is_blank(&self.draft)
    }

    /// Runs the send action.
    ///
    /// A blank draft is left untouched and yields `None`. Otherwise the draft is handed
    /// over verbatim and the composer is empty afterwards.
    pub fn take_submission(&mut self) -> Option<String> {
        if !self.can_send() {
            return None;
        }

        let submission = std::mem::take(&mut self.draft);
        self.refresh_state();
        Some(submission)
    }

    /// Resolves Enter against the draft as it stood before the key reached the field.
    ///
    /// Plain Enter sends exactly that draft wherever the cursor or selection was, so the
    /// line break the field would have inserted never becomes part of the message.
    pub fn press_enter(&mut self, shift: bool) -> EnterAction {
        if shift {
            return EnterAction::InsertNewline;
        }

        match self.take_submission() {
            Some(text) => EnterAction::Submit(text),
            None => EnterAction::Ignore,
        }
    }

    fn refresh_state(&mut self) {
        self.state = if self.draft.is_empty() {
            ComposerState::Empty
        } else {
            ComposerState::NonEmpty
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_follows_every_edit() {
        let mut composer = Composer::new();
        assert_eq!(composer.state(), ComposerState::Empty);

        composer.set_draft("h");
        assert_eq!(composer.state(), ComposerState::NonEmpty);

        composer.set_draft("");
        assert_eq!(composer.state(), ComposerState::Empty);

        composer.set_draft("  ");
        assert_eq!(composer.state(), ComposerState::NonEmpty);
        assert!(!composer.can_send());
    }

    #[test]
    fn submission_hands_over_the_draft_and_clears() {
        let mut composer = Composer::new();
        composer.set_draft("  hello there ");

        assert_eq!(composer.take_submission().as_deref(), Some("  hello there "));
        assert_eq!(composer.draft(), "");
        assert_eq!(composer.state(), ComposerState::Empty);
    }

    #[test]
    fn blank_submission_leaves_the_draft_alone() {
        let mut composer = Composer::new();
        assert!(composer.take_submission().is_none());
        assert_eq!(composer.draft(), "");

        composer.set_draft(" \n ");
        assert!(composer.take_submission().is_none());
        assert_eq!(composer.draft(), " \n ");
        assert_eq!(composer.state(), ComposerState::NonEmpty);
    }

    #[test]
    fn enter_sends_the_draft_as_typed_before_the_key() {
        let mut composer = Composer::new();
        // The caret sits after "hel"; the field has not applied the Enter yet.
        composer.set_draft("hello");

        assert_eq!(
            composer.press_enter(false),
            EnterAction::Submit("hello".to_string())
        );
        assert_eq!(composer.draft(), "");
    }

    #[test]
    fn enter_on_a_multiline_draft_keeps_inner_line_breaks() {
        let mut composer = Composer::new();
        composer.set_draft("first line\nsecond line");

        assert_eq!(
            composer.press_enter(false),
            EnterAction::Submit("first line\nsecond line".to_string())
        );
    }

    #[test]
    fn enter_after_a_trailing_line_break_keeps_it() {
        let mut composer = Composer::new();
        composer.set_draft("list:\n");

        assert_eq!(
            composer.press_enter(false),
            EnterAction::Submit("list:\n".to_string())
        );
    }

    #[test]
    fn shift_enter_leaves_the_draft_for_a_line_break() {
        let mut composer = Composer::new();
        composer.set_draft("hello");

        assert_eq!(composer.press_enter(true), EnterAction::InsertNewline);
        assert_eq!(composer.draft(), "hello");
    }

    #[test]
    fn enter_on_a_blank_draft_is_swallowed() {
        let mut composer = Composer::new();
        composer.set_draft("   ");

        assert_eq!(composer.press_enter(false), EnterAction::Ignore);
        assert_eq!(composer.draft(), "   ");
    }

    #[test]
    fn clear_resets_to_empty() {
        let mut composer = Composer::new();
        composer.set_draft("typing");
        composer.clear();

        assert_eq!(composer.draft(), "");
        assert_eq!(composer.state(), ComposerState::Empty);
        assert!(composer.take_submission().is_none());
    }
}
