//! # Tooltip Overlay
//!
//! Glossary definition shown over the section content. Sized to its text and
//! centered; a click outside it (or Esc) closes it.
//!
//! Transient render wrapper: the `Tooltip` itself lives in core state.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Padding, Paragraph, Wrap};

use crate::core::glossary::Tooltip;
use crate::tui::component::Component;

const MAX_WIDTH: u16 = 56;
/// Border (2) + horizontal padding (2)
const HORIZONTAL_OVERHEAD: u16 = 4;

pub struct TooltipOverlay<'a> {
    tooltip: &'a Tooltip,
    accent: Color,
}

impl<'a> TooltipOverlay<'a> {
    pub fn new(tooltip: &'a Tooltip, accent: Color) -> Self {
        Self { tooltip, accent }
    }

    fn paragraph(&self) -> Paragraph<'a> {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.accent))
            .title(Line::from(Span::styled(
                format!(" {} ", self.tooltip.term),
                Style::default().fg(self.accent).add_modifier(Modifier::BOLD),
            )))
            .title_bottom(Line::from(" Esc ").centered())
            .padding(Padding::horizontal(1));
        Paragraph::new(self.tooltip.definition.as_str())
            .block(block)
            .wrap(Wrap { trim: true })
    }

    /// Where the overlay lands inside `area`.
    pub fn rect(&self, area: Rect) -> Rect {
        let width = MAX_WIDTH.min(area.width.saturating_sub(2)).max(HORIZONTAL_OVERHEAD + 1);
        let height = self.paragraph().line_count(width) as u16;
        centered_rect_fixed(area, width, height)
    }
}

impl Component for TooltipOverlay<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = self.rect(area);
        frame.render_widget(Clear, overlay);
        frame.render_widget(self.paragraph(), overlay);
    }
}

/// A `width` x `height` rect centered in `area`, clamped to fit.
pub fn centered_rect_fixed(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::glossary::{Glossary, builtin_entries};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn tooltip(term: &str) -> Tooltip {
        Tooltip::show(&Glossary::new(builtin_entries()), term, None).0
    }

    #[test]
    fn test_centered_rect_fixed() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(centered_rect_fixed(area, 40, 10), Rect::new(20, 7, 40, 10));
        assert_eq!(centered_rect_fixed(area, 100, 30), area);
    }

    #[test]
    fn test_rect_fits_definition() {
        let tip = tooltip("CRM");
        let overlay = TooltipOverlay::new(&tip, Color::Blue);
        let rect = overlay.rect(Rect::new(0, 0, 80, 24));
        assert_eq!(rect.width, MAX_WIDTH);
        // Border + at least two wrapped lines of definition.
        assert!(rect.height >= 4);
        assert!(rect.height < 24);
    }

    #[test]
    fn test_renders_term_and_definition() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let tip = tooltip("Неизвестное");

        terminal
            .draw(|f| TooltipOverlay::new(&tip, Color::Blue).render(f, f.area()))
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Неизвестное"));
        assert!(text.contains("Определение скоро"));
    }
}
