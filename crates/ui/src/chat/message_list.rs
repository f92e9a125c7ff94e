use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::Hasher;
use std::ops::Range;
use std::rc::Rc;

use chatroom_conversation::{Message, MessageFeed, MessageId, MessageStore};
use gpui::*;
use gpui_component::{ActiveTheme, label::Label, v_flex, v_virtual_list};

use crate::chat::scroll_manager::ScrollManager;

const DEFAULT_CONTENT_WIDTH: Pixels = px(380.);
const LIST_HORIZONTAL_PADDING: Pixels = px(12.);
const CONTENT_WIDTH_CHANGE_EPSILON: f32 = 1.0;
/// Bubbles never take more than this share of the row.
const BUBBLE_MAX_WIDTH_RATIO: f32 = 0.8;
const BUBBLE_PADDING_X: Pixels = px(12.);
const BUBBLE_PADDING_Y: Pixels = px(10.);
const ESTIMATED_TEXT_LINE_HEIGHT: Pixels = px(20.);
const ESTIMATED_CHAR_WIDTH: f32 = 8.0;

struct SizeCacheEntry {
    layout_hash: u64,
    height: Pixels,
    measured: bool,
}

/// Virtualized bubble list for the conversation.
///
/// Rows are keyed by [`MessageId`] for both element identity and the size cache, so a
/// re-render without new messages reuses every row as-is.
pub struct MessageList {
    feed: MessageFeed,
    item_sizes: Rc<Vec<Size<Pixels>>>,
    scroll_manager: ScrollManager,
    size_cache: HashMap<MessageId, SizeCacheEntry>,
    content_width: Option<Pixels>,
}

impl MessageList {
    pub fn new(_cx: &mut Context<Self>) -> Self {
        Self {
            feed: MessageFeed::new(),
            item_sizes: Rc::new(Vec::new()),
            scroll_manager: ScrollManager::new(),
            size_cache: HashMap::new(),
            content_width: None,
        }
    }

    /// Pulls new rows from the store; a no-op when nothing was appended since last sync.
    pub fn sync(&mut self, store: &MessageStore, cx: &mut Context<Self>) {
        if self.feed.sync(store) {
            self.rebuild_item_sizes();
            cx.notify();
        }
    }

    fn update_content_width(&mut self, cx: &mut Context<Self>) {
        let list_width = self.scroll_manager.bounds().size.width;
        if list_width <= Pixels::ZERO {
            return;
        }

        let next_content_width = max_pixels(px(1.), list_width - LIST_HORIZONTAL_PADDING * 2);
        let width_changed = self.content_width.is_none_or(|current| {
            (f32::from(current) - f32::from(next_content_width)).abs()
                > CONTENT_WIDTH_CHANGE_EPSILON
        });

        if width_changed {
            self.content_width = Some(next_content_width);

            // Wrapping changes with width, so every cached measurement is stale.
            for entry in self.size_cache.values_mut() {
                entry.measured = false;
            }

            self.rebuild_item_sizes();
            cx.notify();
        }
    }

    fn rebuild_item_sizes(&mut self) {
        let content_width = self.content_width.unwrap_or(DEFAULT_CONTENT_WIDTH);
        let mut active_ids = HashSet::with_capacity(self.feed.messages().len());
        let mut sizes = Vec::with_capacity(self.feed.messages().len());

        for message in self.feed.messages() {
            let next_hash = layout_hash(message);
            let estimated_height = estimate_message_height(message, content_width);

            let entry = self.size_cache.entry(message.id()).or_insert(SizeCacheEntry {
                layout_hash: next_hash,
                height: estimated_height,
                measured: false,
            });

            if entry.layout_hash != next_hash {
                entry.layout_hash = next_hash;
                entry.height = estimated_height;
                entry.measured = false;
            } else if !entry.measured {
                entry.height = estimated_height;
            }

            sizes.push(size(px(0.), entry.height));
            active_ids.insert(message.id());
        }

        self.size_cache.retain(|id, _| active_ids.contains(id));
        self.item_sizes = Rc::new(sizes);
    }

    fn measure_visible_items(
        &mut self,
        visible_range: Range<usize>,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        if self.feed.messages().is_empty() {
            return;
        }

        let content_width = self.content_width.unwrap_or(DEFAULT_CONTENT_WIDTH);
        let available_space = size(
            AvailableSpace::Definite(content_width),
            AvailableSpace::MinContent,
        );
        let mut updated = false;

        for index in visible_range {
            let Some(message) = self.feed.messages().get(index).cloned() else {
                continue;
            };

            let mut row = self.render_message_row(&message, content_width, cx);
            let measured_height = row.layout_as_root(available_space, window, cx).height;
            let Some(entry) = self.size_cache.get_mut(&message.id()) else {
                continue;
            };
            if !entry.measured || pixels_changed(entry.height, measured_height) {
                entry.height = measured_height;
                updated = true;
            }
            entry.measured = true;
        }

        if updated {
            self.rebuild_item_sizes();
            cx.notify();
        }
    }

    fn render_message_row(
        &self,
        message: &Message,
        content_width: Pixels,
        cx: &mut Context<Self>,
    ) -> AnyElement {
        let theme = cx.theme();
        let (background, foreground) = if message.is_sender() {
            (theme.accent, theme.accent_foreground)
        } else {
            (theme.secondary, theme.secondary_foreground)
        };

        let row = v_flex()
            .id(ElementId::Name(SharedString::from(format!(
                "message-{}",
                message.id()
            ))))
            .w_full();
        let row = if message.is_sender() {
            row.items_end()
        } else {
            row.items_start()
        };

        row.child(
            div()
                .max_w(bubble_max_width(content_width))
                .px(BUBBLE_PADDING_X)
                .py(BUBBLE_PADDING_Y)
                .rounded_lg()
                .bg(background)
                .text_color(foreground)
                .child(Label::new(message.text().to_string()).text_sm()),
        )
        .into_any_element()
    }
}

impl Render for MessageList {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        self.update_content_width(cx);
        let follow = self.feed.follow_mut();
        let forced = follow.has_pending_scroll();
        self.scroll_manager.update_follow_state(follow);
        if self.scroll_manager.apply_pending_scroll(follow) && forced {
            // Row heights of a fresh append settle one layout later; follow again next frame.
            window.request_animation_frame();
        }

        v_flex().size_full().min_h_0().child(
            v_virtual_list(
                cx.entity().clone(),
                "message-list",
                self.item_sizes.clone(),
                |this, visible_range, window, cx| {
                    // Measure only visible rows so long histories keep O(visible) layout work.
                    this.update_content_width(cx);
                    this.measure_visible_items(visible_range.clone(), window, cx);
                    let content_width = this.content_width.unwrap_or(DEFAULT_CONTENT_WIDTH);
                    visible_range
                        .filter_map(|index| {
                            this.feed.messages().get(index).cloned().map(|message| {
                                this.render_message_row(&message, content_width, cx)
                            })
                        })
                        .collect::<Vec<_>>()
                },
            )
            .size_full()
            .px_3()
            .py_3()
            .gap_2()
            .track_scroll(self.scroll_manager.handle()),
        )
    }
}

fn layout_hash(message: &Message) -> u64 {
    let mut hasher = DefaultHasher::new();
    hasher.write_u64(message.id().0);
    hasher.write_u8(u8::from(message.is_sender()));
    hasher.write(message.text().as_bytes());
    hasher.finish()
}

fn bubble_max_width(content_width: Pixels) -> Pixels {
    max_pixels(px(1.), content_width * BUBBLE_MAX_WIDTH_RATIO)
}

fn estimate_message_height(message: &Message, content_width: Pixels) -> Pixels {
    let text_width = max_pixels(px(1.), bubble_max_width(content_width) - BUBBLE_PADDING_X * 2);
    estimate_text_height(message.text(), text_width) + BUBBLE_PADDING_Y * 2
}

fn estimate_text_height(content: &str, width: Pixels) -> Pixels {
    if content.is_empty() {
        return ESTIMATED_TEXT_LINE_HEIGHT;
    }

    let chars_per_line = (f32::from(width) / ESTIMATED_CHAR_WIDTH).floor().max(1.0) as usize;

    let mut line_count = 0usize;
    for line in content.lines() {
        let char_count = line.chars().count().max(1);
        line_count += char_count.div_ceil(chars_per_line);
    }

    // A trailing newline still occupies a visual line.
    if content.ends_with('\n') {
        line_count += 1;
    }

    ESTIMATED_TEXT_LINE_HEIGHT * line_count.max(1)
}

fn max_pixels(a: Pixels, b: Pixels) -> Pixels {
    if f32::from(a) >= f32::from(b) { a } else { b }
}

fn pixels_changed(a: Pixels, b: Pixels) -> bool {
    (f32::from(a) - f32::from(b)).abs() > 0.5
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VirtualizationMetric {
    pub message_id: MessageId,
    pub estimated_height: f32,
    pub layout_hash: u64,
}

pub fn virtualization_metrics(
    messages: &[Message],
    content_width: f32,
) -> Vec<VirtualizationMetric> {
    let bounded_width = px(content_width.max(1.0));

    messages
        .iter()
        .map(|message| VirtualizationMetric {
            message_id: message.id(),
            estimated_height: f32::from(estimate_message_height(message, bounded_width)),
            layout_hash: layout_hash(message),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chatroom_conversation::{ManualClock, MessageStore};

    use super::*;

    fn fixture_store(count: usize) -> MessageStore {
        let mut store = MessageStore::with_clock(ManualClock::fixed());
        for index in 0..count {
            let text = format!("message-{index}: virtualization fixture payload");
            if index % 2 == 0 {
                store.append(&text);
            } else {
                store.append_incoming(&text);
            }
        }
        store
    }

    #[test]
    fn large_history_keeps_row_metrics_deterministic() {
        let mut store = fixture_store(2_000);
        let before = virtualization_metrics(store.current(), 380.);

        assert_eq!(before.len(), 2_000);
        assert!(before.iter().all(|metric| metric.estimated_height > 0.));

        store.append("tail");
        let after = virtualization_metrics(store.current(), 380.);

        // Appending must leave every existing row untouched.
        assert_eq!(after.len(), 2_001);
        assert_eq!(before[..], after[..2_000]);
    }

    #[test]
    fn rerender_without_appends_keeps_row_identity() {
        let store = fixture_store(12);
        let first = virtualization_metrics(store.current(), 380.);
        let second = virtualization_metrics(store.current(), 380.);

        assert_eq!(first, second);
        let ids = first.iter().map(|metric| metric.message_id).collect::<HashSet<_>>();
        assert_eq!(ids.len(), 12);
    }

    #[test]
    fn sender_flag_is_part_of_the_layout_key() {
        let mut store = MessageStore::with_clock(ManualClock::fixed());
        store.append("same");
        store.append_incoming("same");
        let metrics = virtualization_metrics(store.current(), 380.);

        assert_ne!(metrics[0].layout_hash, metrics[1].layout_hash);
    }

    #[test]
    fn long_and_multiline_text_grows_the_estimate() {
        let width = px(380.);
        let line = estimate_text_height("short", width);

        assert_eq!(line, ESTIMATED_TEXT_LINE_HEIGHT);
        assert!(estimate_text_height(&"x".repeat(400), width) > line);
        assert_eq!(
            estimate_text_height("one\ntwo\nthree", width),
            ESTIMATED_TEXT_LINE_HEIGHT * 3
        );
        assert_eq!(
            estimate_text_height("trailing\n", width),
            ESTIMATED_TEXT_LINE_HEIGHT * 2
        );
    }
}
