use crate::message::Message;
use crate::scroll::ScrollFollow;
use crate::store::MessageStore;

/// The list's copy of the conversation plus its scroll policy.
///
/// Syncing from the store is the only way rows change, and every sync that changes the
/// row count schedules a scroll to the newest row.
#[derive(Debug, Clone, Default)]
pub struct MessageFeed {
    messages: Vec<Message>,
    synced_revision: u64,
    follow: ScrollFollow,
}

impl MessageFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn follow(&self) -> &ScrollFollow {
        &self.follow
    }

    pub fn follow_mut(&mut self) -> &mut ScrollFollow {
        &mut self.follow
    }

    /// Pulls the store's current sequence; returns false when nothing changed.
    pub fn sync(&mut self, store: &MessageStore) -> bool {
        let revision = store.revision();
        if revision == self.synced_revision {
            return false;
        }

        self.synced_revision = revision;
        self.messages = store.current().to_vec();
        if self.follow.observe_len(self.messages.len()) {
            tracing::trace!(len = self.messages.len(), "scheduled scroll to newest message");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_copies_appends_and_schedules_scroll() {
        let mut store = MessageStore::new();
        let mut feed = MessageFeed::new();
        assert!(!feed.sync(&store));

        store.append("hi");
        assert!(feed.sync(&store));
        assert_eq!(feed.messages().len(), 1);
        assert!(feed.follow().has_pending_scroll());
    }

    #[test]
    fn repeated_sync_without_appends_is_a_no_op() {
        let mut store = MessageStore::new();
        let mut feed = MessageFeed::new();
        store.append("a");
        feed.sync(&store);
        feed.follow_mut().apply_pending(crate::ScrollMetrics::new(0.0, 0.0));

        store.append("   ");
        assert!(!feed.sync(&store));
        assert!(!feed.follow().has_pending_scroll());
    }
}
