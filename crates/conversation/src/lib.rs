#![deny(unsafe_code)]

//! Session-scoped chat state shared by the chatroom views.
//!
//! Nothing in this crate depends on a UI toolkit: the message log, the composer draft
//! and the follow-the-tail scroll policy are plain state machines that the gpui views
//! drive from their event handlers.

/// Time source used to stamp new messages.
pub mod clock;
/// Draft buffer behind the send action.
pub mod composer;
/// List-side snapshot of the conversation with its scroll policy.
pub mod feed;
/// Immutable chat entries.
pub mod message;
/// Follow-the-tail scroll policy.
pub mod scroll;
/// Append-only message log for one screen session.
pub mod store;

#[cfg(any(test, feature = "testing"))]
pub use clock::ManualClock;
pub use clock::{Clock, SystemClock};
pub use composer::{Composer, ComposerState, EnterAction};
pub use feed::MessageFeed;
pub use message::{Message, MessageId};
pub use scroll::{AUTO_FOLLOW_RESUME_THRESHOLD, ScrollFollow, ScrollMetrics};
pub use store::{MessageStore, TextPolicy};
