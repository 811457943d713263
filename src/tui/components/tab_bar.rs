//! # TabBar Component
//!
//! Bottom bar with one equal-width cell per tab. The active tab is drawn
//! reversed in the accent color. Labels are centered by display width so
//! Cyrillic and emoji labels line up.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::Component;

pub struct TabBar {
    /// `(key hint, label)` in slot order.
    pub tabs: Vec<(usize, String)>,
    pub active: Option<usize>,
    pub accent: Color,
}

impl TabBar {
    pub fn new(tabs: Vec<(usize, String)>, active: Option<usize>, accent: Color) -> Self {
        Self {
            tabs,
            active,
            accent,
        }
    }

    fn cell_width(area: Rect, count: usize) -> u16 {
        if count == 0 {
            0
        } else {
            area.width / count as u16
        }
    }

    /// Position (0-based, in slot order) of the tab under `column`.
    pub fn tab_at(area: Rect, count: usize, column: u16) -> Option<usize> {
        let cell = Self::cell_width(area, count);
        if cell == 0 || column < area.x {
            return None;
        }
        let position = ((column - area.x) / cell) as usize;
        (position < count).then_some(position)
    }
}

fn centered(text: &str, width: u16) -> String {
    let text_width = UnicodeWidthStr::width(text) as u16;
    if text_width >= width {
        return text.to_string();
    }
    let left = (width - text_width) / 2;
    let right = width - text_width - left;
    format!("{}{}{}", " ".repeat(left as usize), text, " ".repeat(right as usize))
}

impl Component for TabBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let cell = Self::cell_width(area, self.tabs.len());
        if cell == 0 {
            return;
        }

        let spans: Vec<Span> = self
            .tabs
            .iter()
            .map(|(slot, label)| {
                let text = centered(&format!("{} {}", slot + 1, label), cell);
                let style = if self.active == Some(*slot) {
                    Style::default()
                        .fg(self.accent)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(Color::Gray)
                };
                Span::styled(text, style)
            })
            .collect();

        frame.render_widget(Line::from(spans), area);
    }
}
