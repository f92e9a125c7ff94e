/// Distance from the tail, in pixels, inside which follow mode resumes.
pub const AUTO_FOLLOW_RESUME_THRESHOLD: f32 = 24.0;
/// Small delta used to ignore floating-point scroll jitter.
const SCROLL_DELTA_EPSILON: f32 = 1.0;

/// Scroll position of a vertical list.
///
/// `scroll_top` is the distance scrolled from the top and `max_scroll` the largest
/// reachable distance, both non-negative. The tail is visible at `scroll_top == max_scroll`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub scroll_top: f32,
    pub max_scroll: f32,
}

impl ScrollMetrics {
    pub const fn new(scroll_top: f32, max_scroll: f32) -> Self {
        Self {
            scroll_top,
            max_scroll,
        }
    }

    fn is_near_tail(&self) -> bool {
        if self.max_scroll <= 0.0 {
            return true;
        }

        (self.max_scroll - self.scroll_top).abs() <= AUTO_FOLLOW_RESUME_THRESHOLD
    }
}

/// Keeps the newest message in view.
///
/// Any change in conversation length forces a scroll to the tail on the next frame.
/// Between appends the list follows the tail as content resizes, unless the user has
/// scrolled away from it.
#[derive(Debug, Clone)]
pub struct ScrollFollow {
    pending_scroll_to_bottom: bool,
    follow_bottom: bool,
    observed_len: usize,
    last: ScrollMetrics,
}

impl ScrollFollow {
    pub fn new() -> Self {
        Self {
            pending_scroll_to_bottom: false,
            follow_bottom: true,
            observed_len: 0,
            last: ScrollMetrics::default(),
        }
    }

    pub fn is_following_bottom(&self) -> bool {
        self.follow_bottom
    }

    pub fn has_pending_scroll(&self) -> bool {
        self.pending_scroll_to_bottom
    }

    /// Records the conversation length; returns true when it changed.
    pub fn observe_len(&mut self, len: usize) -> bool {
        if len == self.observed_len {
            return false;
        }

        self.observed_len = len;
        self.request_scroll_to_bottom();
        true
    }

    pub fn request_scroll_to_bottom(&mut self) {
        self.pending_scroll_to_bottom = true;
        self.follow_bottom = true;
    }

    /// Updates follow mode from the metrics of the frame about to be painted.
    pub fn update(&mut self, metrics: ScrollMetrics) {
        let scroll_delta = metrics.scroll_top - self.last.scroll_top;
        let max_delta = (metrics.max_scroll - self.last.max_scroll).abs();
        let content_size_changed = max_delta > SCROLL_DELTA_EPSILON;
        let user_scrolled_up = scroll_delta < -SCROLL_DELTA_EPSILON && !content_size_changed;
        let user_scrolled_down = scroll_delta > SCROLL_DELTA_EPSILON && !content_size_changed;

        // Keep follow mode enabled while an explicit request is still outstanding.
        if self.pending_scroll_to_bottom || (content_size_changed && self.last.is_near_tail()) {
            self.follow_bottom = true;
        } else if self.follow_bottom {
            if user_scrolled_up {
                self.follow_bottom = false;
            }
        } else if user_scrolled_down && metrics.is_near_tail() {
            self.follow_bottom = true;
        }

        self.last = metrics;
    }

    /// Consumes a pending request and returns the `scroll_top` to jump to, if any.
    pub fn apply_pending(&mut self, metrics: ScrollMetrics) -> Option<f32> {
        let should_scroll = self.follow_bottom || self.pending_scroll_to_bottom;
        self.pending_scroll_to_bottom = false;

        if !should_scroll {
            return None;
        }

        let target = metrics.max_scroll.max(0.0);
        self.last = ScrollMetrics::new(target, metrics.max_scroll);
        Some(target)
    }

    /// True when the newest row is within the resume threshold of the viewport bottom.
    pub fn is_tail_visible(&self, metrics: ScrollMetrics) -> bool {
        metrics.is_near_tail()
    }
}

impl Default for ScrollFollow {
    fn default() -> Self {
        Self::new()
    }
}
