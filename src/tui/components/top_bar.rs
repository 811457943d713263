//! # TopBar Component
//!
//! One-line navigation bar above the section content: a back arrow and the
//! current section's title. Hidden on the home section (the parent simply
//! gives it no space).
//!
//! Stateless; all data arrives as props:
//!
//! ```rust,ignore
//! let mut top_bar = TopBar::new(app.nav.top_bar().title.clone(), accent);
//! top_bar.render(frame, area);
//! ```

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

/// Columns of the back affordance, counted from the bar's left edge.
pub const BACK_HIT_WIDTH: u16 = 4;

const BACK_LABEL: &str = " ← ";

pub struct TopBar {
    pub title: String,
    pub accent: Color,
}

impl TopBar {
    pub fn new(title: impl Into<String>, accent: Color) -> Self {
        Self {
            title: title.into(),
            accent,
        }
    }

    /// Whether a click at `column` lands on the back arrow.
    pub fn hits_back(area: Rect, column: u16) -> bool {
        column >= area.x && column < area.x + BACK_HIT_WIDTH
    }
}

impl Component for TopBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled(BACK_LABEL, Style::default().fg(self.accent)),
            Span::raw(" "),
            Span::styled(
                self.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]);
        frame.render_widget(line, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_top_bar_shows_arrow_and_title() {
        let backend = TestBackend::new(40, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut top_bar = TopBar::new("Калькулятор", Color::Blue);

        terminal.draw(|f| top_bar.render(f, f.area())).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains('←'));
        assert!(text.contains("Калькулятор"));
    }

    #[test]
    fn test_back_hit_region() {
        let area = Rect::new(0, 0, 40, 1);
        assert!(TopBar::hits_back(area, 0));
        assert!(TopBar::hits_back(area, 3));
        assert!(!TopBar::hits_back(area, 4));
    }
}
