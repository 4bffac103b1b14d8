//! Scroll windowing over a resident list.
//!
//! Renders a growing window over an append-only (or prepend-only) list.
//! `Top` consumes oldest-first growth and needs a scroll anchor so the
//! viewport does not jump when items are prepended; `Bottom` consumes
//! newest-first growth.

/// Which edge of the list the window grows from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Window grows at the top (older items prepended).
    Top,
    /// Window grows at the bottom (newer items appended).
    Bottom,
}

/// Window sizing and trigger configuration.
#[derive(Debug, Clone, Copy)]
pub struct WindowConfig {
    /// Direction of growth.
    pub direction: Direction,
    /// Number of items visible initially.
    pub initial_batch: usize,
    /// Number of items added per load.
    pub batch: usize,
    /// Fraction of the scrollable distance from the far edge inside
    /// which a load is triggered (0..1).
    pub threshold: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            direction: Direction::Bottom,
            initial_batch: 50,
            batch: 30,
            threshold: 0.8,
        }
    }
}

/// Pure state machine for an infinite-scroll window.
#[derive(Debug, Clone)]
pub struct ScrollWindow {
    config: WindowConfig,
    visible: usize,
    loading: bool,
    anchor_extent: Option<f64>,
}

impl ScrollWindow {
    /// Create a window with the given configuration.
    #[must_use]
    pub const fn new(config: WindowConfig) -> Self {
        Self {
            visible: config.initial_batch,
            config,
            loading: false,
            anchor_extent: None,
        }
    }

    /// The slice of the full list that should be rendered.
    ///
    /// `Bottom` shows the most recent items (end of the list), `Top` the
    /// oldest (start of the list).
    #[must_use]
    pub fn visible_range(&self, total: usize) -> std::ops::Range<usize> {
        let count = self.visible.min(total);
        match self.config.direction {
            Direction::Bottom => total - count..total,
            Direction::Top => 0..count,
        }
    }

    /// Whether every item is already visible.
    #[must_use]
    pub const fn is_exhausted(&self, total: usize) -> bool {
        self.visible >= total
    }

    /// Whether a load is currently in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the viewport is close enough to the loading edge to
    /// trigger a load. `offset` is the scroll position, `viewport` the
    /// visible height, `extent` the full scrollable height.
    #[must_use]
    pub fn near_edge(&self, offset: f64, viewport: f64, extent: f64) -> bool {
        let threshold_px = extent * (1.0 - self.config.threshold);
        match self.config.direction {
            Direction::Bottom => {
                let from_bottom = extent - offset - viewport;
                from_bottom < threshold_px
            }
            Direction::Top => offset < threshold_px,
        }
    }

    /// Start a load. No-op (returns false) while a load is already in
    /// flight or every item is visible. For `Top` windows the current
    /// extent is recorded so the viewport can be restored after the
    /// prepend.
    pub fn begin_load(&mut self, total: usize, extent: f64) -> bool {
        if self.loading || self.is_exhausted(total) {
            return false;
        }
        self.loading = true;
        if self.config.direction == Direction::Top {
            self.anchor_extent = Some(extent);
        }
        true
    }

    /// Complete a load, growing the window by one batch (clamped to the
    /// total). Returns the number of newly visible items.
    pub fn finish_load(&mut self, total: usize) -> usize {
        let before = self.visible.min(total);
        self.visible = (self.visible + self.config.batch).min(total);
        self.loading = false;
        self.visible - before
    }

    /// Scroll offset that keeps the viewport stable after a `Top`
    /// prepend, given the new scrollable extent. Consumes the anchor
    /// recorded by [`Self::begin_load`].
    pub fn restore_offset(&mut self, new_extent: f64) -> Option<f64> {
        self.anchor_extent.take().map(|old| new_extent - old)
    }
}
