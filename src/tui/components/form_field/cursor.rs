//! Cursor tracking for a form field.
//!
//! `CursorState` owns the byte offset and the internal scroll; the text lives
//! in `FormField` and is passed in explicitly.

use ratatui::layout::Rect;

use super::text_wrap::{BORDER_OFFSET, inner_width, wrap_line_count, wrap_options};

pub(super) struct CursorState {
    /// Byte offset into the buffer (0..=buffer.len())
    pub pos: usize,
    /// First visible wrapped line
    pub scroll_offset: u16,
    /// Outer width from the last layout, used for vertical movement
    pub last_width: u16,
}

impl CursorState {
    const DEFAULT_WIDTH: u16 = 60;

    pub fn new() -> Self {
        Self {
            pos: 0,
            scroll_offset: 0,
            last_width: Self::DEFAULT_WIDTH,
        }
    }

    pub fn reset(&mut self) {
        self.pos = 0;
        self.scroll_offset = 0;
    }

    /// Wrapped line and column of the cursor, both 0-based.
    pub fn line_and_column(&self, buffer: &str, outer_width: u16) -> (u16, u16) {
        let width = inner_width(outer_width);
        if width == 0 {
            return (0, 0);
        }

        let before = &buffer[..self.pos];
        let line = wrap_line_count(before, width).saturating_sub(1);

        // Count chars rather than using wrapped lengths: textwrap trims
        // trailing spaces, the cursor must not.
        let logical_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let logical = &before[logical_start..];
        let segments = textwrap::wrap(logical, wrap_options(width));
        let consumed: usize = segments
            .iter()
            .take(segments.len().saturating_sub(1))
            .map(|s| s.chars().count())
            .sum();
        let column = logical.chars().count().saturating_sub(consumed) as u16;

        (line, column)
    }

    /// Moves up (`-1`) or down (`1`) one wrapped line, keeping the column.
    /// Returns false at the first/last line.
    pub fn move_vertically(&mut self, buffer: &str, direction: i16) -> bool {
        let width = inner_width(self.last_width);
        if width == 0 || buffer.is_empty() {
            return false;
        }

        let (line, column) = self.line_and_column(buffer, self.last_width);
        let target = if direction < 0 {
            match line.checked_sub(1) {
                Some(t) => t,
                None => return false,
            }
        } else {
            line + 1
        };
        if target >= wrap_line_count(buffer, width) {
            return false;
        }

        // Walk forward one char at a time until we reach the target line at
        // the wanted column, or the end of that line.
        let mut probe = CursorState {
            pos: 0,
            scroll_offset: 0,
            last_width: self.last_width,
        };
        let mut best = None;
        for (i, c) in buffer.char_indices().chain(std::iter::once((buffer.len(), '\0'))) {
            probe.pos = i;
            let (l, col) = probe.line_and_column(buffer, self.last_width);
            if l == target {
                best = Some(i);
                if col >= column {
                    break;
                }
            } else if l > target {
                break;
            }
            if c == '\0' {
                break;
            }
        }

        match best {
            Some(pos) => {
                self.pos = pos;
                true
            }
            None => false,
        }
    }

    /// Keeps the cursor line inside the `max_lines` window.
    pub fn update_scroll_offset(&mut self, buffer: &str, outer_width: u16, max_lines: u16) {
        let total = wrap_line_count(buffer, inner_width(outer_width));
        if total <= max_lines {
            self.scroll_offset = 0;
            return;
        }

        let (line, _) = self.line_and_column(buffer, outer_width);
        if line < self.scroll_offset {
            self.scroll_offset = line;
        } else if line >= self.scroll_offset + max_lines {
            self.scroll_offset = line + 1 - max_lines;
        }
    }

    /// Terminal cell of the cursor for a field drawn at `area`.
    pub fn screen_pos(&self, buffer: &str, area: Rect) -> (u16, u16) {
        let (line, column) = self.line_and_column(buffer, area.width);
        let visible_line = line.saturating_sub(self.scroll_offset);
        (
            area.x + BORDER_OFFSET + column,
            area.y + BORDER_OFFSET + visible_line,
        )
    }
}
