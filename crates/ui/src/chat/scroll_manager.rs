use chatroom_conversation::{ScrollFollow, ScrollMetrics};
use gpui::{Bounds, Pixels, point, px};
use gpui_component::VirtualListScrollHandle;

/// Binds the virtual-list scroll handle to a follow-the-tail policy owned by the caller.
///
/// GPUI reports scroll offsets as negative y values that reach `-max_offset` at the
/// tail; the policy works on positive distances from the top.
pub struct ScrollManager {
    scroll_handle: VirtualListScrollHandle,
}

impl ScrollManager {
    pub fn new() -> Self {
        Self {
            scroll_handle: VirtualListScrollHandle::new(),
        }
    }

    pub fn handle(&self) -> &VirtualListScrollHandle {
        &self.scroll_handle
    }

    pub fn update_follow_state(&self, follow: &mut ScrollFollow) {
        follow.update(self.metrics());
    }

    pub fn apply_pending_scroll(&self, follow: &mut ScrollFollow) -> bool {
        let Some(target) = follow.apply_pending(self.metrics()) else {
            return false;
        };

        let current_x = self.scroll_handle.offset().x;
        self.scroll_handle.set_offset(point(current_x, -px(target)));
        true
    }

    pub fn bounds(&self) -> Bounds<Pixels> {
        self.scroll_handle.bounds()
    }

    pub fn metrics(&self) -> ScrollMetrics {
        let offset = f32::from(self.scroll_handle.offset().y);
        let max_offset = f32::from(self.scroll_handle.max_offset().height);
        ScrollMetrics::new((-offset).max(0.0), max_offset.max(0.0))
    }
}

impl Default for ScrollManager {
    fn default() -> Self {
        Self::new()
    }
}
