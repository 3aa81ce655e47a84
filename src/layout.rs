use crate::config::UiConfig;

/// Lines taken by the header, the section label and the status bar.
pub const CHROME_HEIGHT: u16 = 3;

/// Geometry of the card grid and the sentinel row below it.
///
/// Positions are in terminal lines measured from the top of the grid
/// content; scrolling is in whole card rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub columns: usize,
    pub card_width: u16,
    pub card_height: u16,
    pub sentinel_height: u16,
    pub viewport_height: u16,
}

impl GridLayout {
    pub fn new(width: u16, height: u16, ui: &UiConfig) -> Self {
        let columns = (width / ui.min_card_width.max(1)).max(1);
        Self {
            columns: columns as usize,
            card_width: (width / columns).max(1),
            card_height: ui.card_height.max(1),
            sentinel_height: ui.sentinel_height.max(1),
            viewport_height: height,
        }
    }

    /// Layout for the grid area of a terminal of the given size.
    pub fn for_terminal(width: u16, height: u16, ui: &UiConfig) -> Self {
        Self::new(width, height.saturating_sub(CHROME_HEIGHT), ui)
    }

    pub fn rows(&self, len: usize) -> usize {
        len.div_ceil(self.columns)
    }

    pub fn row_of(&self, index: usize) -> usize {
        index / self.columns
    }

    /// Card rows that fit entirely in the viewport (at least one).
    pub fn visible_rows(&self) -> usize {
        ((self.viewport_height / self.card_height) as usize).max(1)
    }

    /// First line of the sentinel, directly under the last card row.
    pub fn sentinel_top(&self, len: usize) -> usize {
        self.rows(len) * self.card_height as usize
    }

    /// Fraction of the sentinel inside the viewport, in `[0, 1]`.
    pub fn sentinel_visibility(&self, len: usize, scroll_row: usize) -> f32 {
        let offset = (scroll_row * self.card_height as usize) as i64;
        let top = self.sentinel_top(len) as i64 - offset;
        let bottom = top + self.sentinel_height as i64;

        let lo = top.max(0);
        let hi = bottom.min(self.viewport_height as i64);
        if hi <= lo {
            return 0.0;
        }
        (hi - lo) as f32 / self.sentinel_height as f32
    }

    /// Scroll offset that keeps `selected` on screen, moving as little as
    /// possible from `current`. With the last row selected the sentinel is
    /// brought into view as well, when the viewport has room for both.
    pub fn scroll_for(&self, selected: usize, len: usize, current: usize) -> usize {
        if len == 0 {
            return 0;
        }

        let rows = self.rows(len);
        let row = self.row_of(selected.min(len - 1));
        let fit = self.visible_rows();

        let mut offset = current.min(row);
        if row >= offset + fit {
            offset = row + 1 - fit;
        }

        if row == rows - 1 {
            let room = self.viewport_height.saturating_sub(self.sentinel_height) / self.card_height;
            let needed = rows.saturating_sub(room as usize);
            offset = offset.max(needed.min(row));
        }

        offset
    }
}
