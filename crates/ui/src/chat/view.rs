use chatroom_conversation::{Message, MessageStore};
use gpui::*;
use gpui_component::{ActiveTheme, v_flex};

use crate::chat::events::Submit;
use crate::chat::{MessageInput, MessageList};
use crate::settings::ChatSettings;

/// The conversation screen: message list above the composer.
///
/// Owns the session's [`MessageStore`]. The store lives exactly as long as this view
/// and nothing is written anywhere else.
pub struct ChatView {
    message_list: Entity<MessageList>,
    message_input: Entity<MessageInput>,
    store: MessageStore,
}

impl ChatView {
    pub fn new(settings: &ChatSettings, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let message_list = cx.new(MessageList::new);
        let message_input = cx.new(|cx| MessageInput::new(settings, window, cx));
        let store = MessageStore::new().with_text_policy(settings.text_policy);

        cx.subscribe(&message_input, |this, _, event: &Submit, cx| {
            this.handle_submit(event, cx);
        })
        .detach();

        tracing::debug!(text_policy = ?store.text_policy(), "opened conversation");

        Self {
            message_list,
            message_input,
            store,
        }
    }

    fn handle_submit(&mut self, event: &Submit, cx: &mut Context<Self>) {
        let Some(message_id) = self.store.append(&event.content).map(Message::id) else {
            tracing::debug!("submit produced no message");
            return;
        };

        tracing::debug!(%message_id, len = self.store.len(), "sent message");
        let store = &self.store;
        self.message_list.update(cx, |list, cx| list.sync(store, cx));
        cx.notify();
    }
}

impl Render for ChatView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        v_flex()
            .id("chat-view")
            .relative()
            .size_full()
            .min_h_0()
            .overflow_hidden()
            .bg(theme.background)
            .child(
                div()
                    .id("chat-view-message-list")
                    .flex_1()
                    .min_h_0()
                    .child(self.message_list.clone()),
            )
            .child(
                div()
                    .id("chat-view-message-input")
                    .flex_shrink_0()
                    .w_full()
                    .border_t_1()
                    .border_color(theme.border)
                    .child(self.message_input.clone()),
            )
    }
}
