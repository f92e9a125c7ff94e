use chatroom_conversation::{Composer, EnterAction};
use gpui::*;
use gpui_component::{
    ActiveTheme, Disableable, IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex,
    input::{Input, InputEvent, InputState},
};

use crate::chat::events::Submit;
use crate::settings::ChatSettings;

/// Text field plus send button.
///
/// The field's contents are mirrored into a [`Composer`] on every input event, and the
/// send action goes through [`Composer::take_submission`] so blank drafts never leave
/// this view. Enter is intercepted in the capture phase, before the field edits its
/// text, so the submitted content is exactly the draft as typed.
pub struct MessageInput {
    input_state: Entity<InputState>,
    composer: Composer,
    send_label: SharedString,
}

impl EventEmitter<Submit> for MessageInput {}

impl MessageInput {
    pub fn new(settings: &ChatSettings, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let placeholder = SharedString::from(settings.placeholder.clone());
        let input_state = cx.new(|cx| {
            InputState::new(window, cx)
                .placeholder(placeholder)
                .clean_on_escape()
                .auto_grow(1, 5)
        });

        cx.subscribe_in(
            &input_state,
            window,
            |this, _, _: &InputEvent, _, cx| this.sync_draft(cx),
        )
        .detach();

        Self {
            input_state,
            composer: Composer::new(),
            send_label: SharedString::from(settings.send_label.clone()),
        }
    }

    pub fn clear(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.input_state.update(cx, |state, cx| {
            state.set_value("", window, cx);
        });
        self.composer.clear();
        cx.notify();
    }

    fn sync_draft(&mut self, cx: &mut Context<Self>) {
        let value = self.input_state.read(cx).value().to_string();
        if value == self.composer.draft() {
            return;
        }

        self.composer.set_draft(value);
        cx.notify();
    }

    fn handle_enter(&mut self, shift: bool, window: &mut Window, cx: &mut Context<Self>) {
        self.sync_draft(cx);

        match self.composer.press_enter(shift) {
            EnterAction::Submit(content) => {
                cx.emit(Submit::new(content));
                self.clear(window, cx);
            }
            EnterAction::InsertNewline => {
                self.input_state.update(cx, |state, cx| {
                    state.insert("\n", window, cx);
                });
                self.sync_draft(cx);
            }
            EnterAction::Ignore => tracing::debug!("ignored enter on blank draft"),
        }

        // The field never sees the keystroke, so it cannot split the draft at the cursor.
        cx.stop_propagation();
    }

    fn handle_submit(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.sync_draft(cx);

        let Some(content) = self.composer.take_submission() else {
            tracing::debug!("ignored blank draft");
            return;
        };

        cx.emit(Submit::new(content));
        self.clear(window, cx);
    }
}

impl Render for MessageInput {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let can_send = self.composer.can_send();

        h_flex()
            .w_full()
            .items_end()
            .gap_2()
            .p_3()
            .bg(theme.background)
            .child(
                div()
                    .flex_1()
                    .min_w_0()
                    .px_3()
                    .py_2()
                    .rounded_xl()
                    .border_1()
                    .border_color(theme.border)
                    .bg(theme.muted)
                    .capture_key_down(cx.listener(|this, event: &KeyDownEvent, window, cx| {
                        if event.keystroke.key == "enter" {
                            this.handle_enter(event.keystroke.modifiers.shift, window, cx);
                        }
                    }))
                    .child(Input::new(&self.input_state).w_full()),
            )
            .child(
                Button::new("send")
                    .small()
                    .primary()
                    .icon(IconName::ArrowUp)
                    .child(self.send_label.clone())
                    .disabled(!can_send)
                    .on_click(cx.listener(|this, _, window, cx| {
                        this.handle_submit(window, cx);
                    })),
            )
    }
}
