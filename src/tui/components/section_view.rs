//! # SectionView Component
//!
//! Scrollable view of the current section's content blocks.
//!
//! ## Responsibilities
//!
//! - Lay out the section's blocks and cache their heights
//! - Scroll: wheel and page keys, scroll-to-top on navigation, scroll an
//!   opened panel into view, keep the focused block on screen
//! - Hit testing for mouse clicks
//! - Report which statistic blocks are visible enough to start counting
//!
//! ## Architecture
//!
//! `SectionView` is transient (built every frame) and wraps
//! `&'a mut SectionViewState`, which lives in the parent `TuiState`. Scroll
//! requests arrive between frames, before the new layout is known, so they
//! are queued and resolved during the next render once heights are fresh.

use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::counter::is_sufficiently_visible;
use crate::core::effect::{Anchor, Field};
use crate::core::navigation::Transition;
use crate::core::state::App;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::form_field::OrderFormState;
use crate::tui::event::TuiEvent;
use crate::tui::sections::{BlockBody, BlockContext, FocusStop, Target, build_blocks, focus_stops};

/// Rows kept between a scrolled-to block and the viewport edge.
pub const SCROLL_MARGIN: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollRequest {
    Top,
    /// Center the anchor's block.
    Center(Anchor),
    /// Scroll the least distance that shows the anchor's block.
    Nearest(Anchor),
    /// Keep a block index on screen.
    Block(usize),
}

/// Layout and scroll state for the section view.
/// Must be persisted in the parent TuiState.
pub struct SectionViewState {
    pub scroll_state: ScrollViewState,
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Focus stops of the last render, in reading order.
    pub stops: Vec<FocusStop>,
    /// First target of each block; what a click on the block activates.
    primary: Vec<Option<Target>>,
    anchors: Vec<(Anchor, usize)>,
    stats: Vec<(usize, usize)>,
    pending: Option<ScrollRequest>,
}

impl Default for SectionViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionViewState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            viewport_height: 0,
            stops: Vec::new(),
            primary: Vec::new(),
            anchors: Vec::new(),
            stats: Vec::new(),
            pending: None,
        }
    }

    pub fn offset(&self) -> u16 {
        self.scroll_state.offset().y
    }

    fn set_offset(&mut self, y: u16) {
        self.scroll_state.set_offset(Position { x: 0, y });
    }

    pub fn request(&mut self, request: ScrollRequest) {
        // A pending scroll-to-top wins over a focus follow in the same frame.
        if self.pending == Some(ScrollRequest::Top) && matches!(request, ScrollRequest::Block(_)) {
            return;
        }
        self.pending = Some(request);
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// `(top, bottom)` of a block in content rows.
    pub fn block_span(&self, block: usize) -> Option<(u16, u16)> {
        let bottom = *self.prefix_heights.get(block)?;
        let top = if block == 0 {
            0
        } else {
            self.prefix_heights[block - 1]
        };
        Some((top, bottom))
    }

    fn anchor_block(&self, anchor: Anchor) -> Option<usize> {
        self.anchors
            .iter()
            .find(|(a, _)| *a == anchor)
            .map(|(_, block)| *block)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.total_height().saturating_sub(self.viewport_height);
        if self.offset() > max_y {
            self.set_offset(max_y);
        }
    }

    fn scroll_nearest(&mut self, block: usize, margin: u16) {
        let Some((top, bottom)) = self.block_span(block) else {
            return;
        };
        let offset = self.offset();
        let view = self.viewport_height;
        if top < offset + margin || bottom - top + 2 * margin > view {
            self.set_offset(top.saturating_sub(margin));
        } else if bottom + margin > offset + view {
            self.set_offset(bottom + margin - view);
        }
    }

    /// Centers the block, but only if its bottom edge is hidden.
    fn scroll_center(&mut self, block: usize) {
        let Some((top, bottom)) = self.block_span(block) else {
            return;
        };
        if bottom + SCROLL_MARGIN <= self.offset() + self.viewport_height {
            return;
        }
        let height = bottom - top;
        let y = if height >= self.viewport_height {
            top
        } else {
            top.saturating_sub((self.viewport_height - height) / 2)
        };
        self.set_offset(y);
    }

    fn resolve_pending(&mut self) {
        match self.pending.take() {
            None => {}
            Some(ScrollRequest::Top) => self.set_offset(0),
            Some(ScrollRequest::Center(anchor)) => {
                if let Some(block) = self.anchor_block(anchor) {
                    self.scroll_center(block);
                }
            }
            Some(ScrollRequest::Nearest(anchor)) => {
                if let Some(block) = self.anchor_block(anchor) {
                    self.scroll_nearest(block, SCROLL_MARGIN);
                }
            }
            Some(ScrollRequest::Block(block)) => self.scroll_nearest(block, 0),
        }
        self.clamp_scroll();
    }

    /// Block under a row of the content canvas.
    pub fn block_at(&self, content_y: u16) -> Option<usize> {
        let index = self.prefix_heights.partition_point(|&end| end <= content_y);
        (index < self.prefix_heights.len()).then_some(index)
    }

    /// What a click at `row` (screen coordinates) activates.
    pub fn target_at(&self, area: Rect, column: u16, row: u16) -> Option<(usize, Target)> {
        if !area.contains(Position { x: column, y: row }) {
            return None;
        }
        let block = self.block_at(self.offset() + (row - area.y))?;
        let target = self.primary.get(block)?.clone()?;
        Some((block, target))
    }

    /// Rows of `block` currently on screen.
    pub fn visible_rows(&self, block: usize) -> u16 {
        let Some((top, bottom)) = self.block_span(block) else {
            return 0;
        };
        let view_top = self.offset();
        let view_bottom = view_top + self.viewport_height;
        bottom.min(view_bottom).saturating_sub(top.max(view_top))
    }

    /// Statistic indices whose blocks are at least half on screen.
    pub fn visible_stats(&self) -> Vec<usize> {
        self.stats
            .iter()
            .filter(|(_, block)| {
                let height = self.heights.get(*block).copied().unwrap_or(0);
                is_sufficiently_visible(self.visible_rows(*block), height)
            })
            .map(|(stat, _)| *stat)
            .collect()
    }

    pub fn visible_range(&self) -> std::ops::Range<usize> {
        let offset = self.offset();
        let start = self.prefix_heights.partition_point(|&end| end <= offset);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < offset.saturating_add(self.viewport_height))
            .saturating_add(1)
            .min(self.prefix_heights.len());
        start..end
    }

    fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }
}

impl EventHandler for SectionViewState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => self.scroll_state.scroll_up(),
            TuiEvent::ScrollDown => self.scroll_state.scroll_down(),
            TuiEvent::ScrollPageUp => self.scroll_state.scroll_page_up(),
            TuiEvent::ScrollPageDown => self.scroll_state.scroll_page_down(),
            _ => return None,
        }
        self.clamp_scroll();
        None
    }
}

/// Scrollable section content.
/// Created fresh each frame with references to state and data.
pub struct SectionView<'a> {
    pub state: &'a mut SectionViewState,
    pub app: &'a App,
    pub form: &'a mut OrderFormState,
    pub focus: Option<&'a FocusStop>,
    pub editing: Option<Field>,
    pub accent: Color,
    pub now: Instant,
}

impl Component for SectionView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // scrollbar column

        for field in [Field::Description, Field::Contact] {
            self.form.field_mut(field).layout(content_width);
        }

        let blocks = build_blocks(&BlockContext {
            app: self.app,
            form: &*self.form,
            focus: self.focus,
            editing: self.editing,
            accent: self.accent,
            width: content_width,
            now: self.now,
        });

        // 1. Refresh layout
        let state = &mut *self.state;
        state.heights = blocks.iter().map(|b| b.height).collect();
        state.rebuild_prefix_heights();
        state.primary = blocks.iter().map(|b| b.targets.first().cloned()).collect();
        state.anchors = blocks
            .iter()
            .enumerate()
            .filter_map(|(i, b)| b.anchor.map(|a| (a, i)))
            .collect();
        state.stats = blocks
            .iter()
            .enumerate()
            .filter_map(|(i, b)| b.stat.map(|s| (s, i)))
            .collect();
        state.stops = focus_stops(&blocks);
        state.viewport_height = area.height;

        // 2. Scroll
        state.resolve_pending();
        state.clamp_scroll();

        // 3. Render visible blocks
        let mut scroll_view = ScrollView::new(Size::new(content_width, state.total_height()))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let range = state.visible_range();
        let mut cursor = None;
        for (i, block) in blocks.into_iter().enumerate().skip(range.start).take(range.len()) {
            let Some((top, _)) = state.block_span(i) else {
                continue;
            };
            let rect = Rect::new(0, top, content_width, block.height);
            match block.body {
                BlockBody::Text(paragraph) => scroll_view.render_widget(paragraph, rect),
                BlockBody::Field(field) => {
                    let input = self.form.field(field);
                    let focused = self
                        .focus
                        .is_some_and(|f| f.target == Target::Field(field));
                    let editing = self.editing == Some(field);
                    scroll_view.render_widget(
                        input.widget(content_width, focused, editing, self.accent),
                        rect,
                    );
                    if editing {
                        cursor = Some((field, top, block.height));
                    }
                }
            }
        }

        frame.render_stateful_widget(scroll_view, area, &mut state.scroll_state);

        if let Some((field, top, height)) = cursor {
            let offset = state.offset();
            if top >= offset && top + height <= offset + area.height {
                let on_screen = Rect::new(area.x, area.y + top - offset, content_width, height);
                let (x, y) = self.form.field(field).screen_pos(on_screen);
                frame.set_cursor_position(Position { x, y });
            }
        }

        if matches!(self.app.nav.transition(), Transition::Changing { .. }) {
            frame
                .buffer_mut()
                .set_style(area, Style::default().add_modifier(Modifier::DIM));
        }
    }
}
