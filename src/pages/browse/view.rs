use std::ops::Range;

use crate::core::config::Settings;
use crate::models::Entry;

/// What the listing area shows. Loading wins over everything else, and an
/// empty filtered set is distinct from loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingView {
    Loading,
    Empty,
    Entries(Vec<Entry>),
}

impl ListingView {
    pub fn new(loading: bool, visible: Vec<Entry>) -> Self {
        if loading {
            ListingView::Loading
        } else if visible.is_empty() {
            ListingView::Empty
        } else {
            ListingView::Entries(visible)
        }
    }
}

/// Fixed-height virtual list: only rows inside the viewport get rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualList {
    pub item_height: u32,
    pub viewport_height: u32,
    chrome_height: u32,
}

impl VirtualList {
    pub fn new(item_height: u32, chrome_height: u32) -> Self {
        Self {
            item_height: item_height.max(1),
            viewport_height: 0,
            chrome_height,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.item_height, settings.chrome_height)
    }

    /// Recomputes the viewport after the window was resized.
    pub fn resize(&mut self, window_height: u32) {
        self.viewport_height = window_height.saturating_sub(self.chrome_height);
    }

    pub fn content_height(&self, count: usize) -> u64 {
        count as u64 * u64::from(self.item_height)
    }

    /// Indices of the rows intersecting the viewport at `scroll_top`.
    pub fn visible_range(&self, scroll_top: u64, count: usize) -> Range<usize> {
        if count == 0 || self.viewport_height == 0 {
            return 0..0;
        }
        let item = u64::from(self.item_height);
        let max_scroll = self
            .content_height(count)
            .saturating_sub(u64::from(self.viewport_height));
        let top = scroll_top.min(max_scroll);
        let bottom = top + u64::from(self.viewport_height);

        let first = (top / item) as usize;
        let last = bottom.div_ceil(item) as usize;
        first.min(count)..last.min(count)
    }
}
