//! # Toast Line
//!
//! Single-line notification above the tab bar. Dimmed while its exit phase
//! plays.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;

use crate::core::toast::Toast;
use crate::tui::component::Component;

pub struct ToastLine<'a> {
    pub toast: &'a Toast,
}

impl Component for ToastLine<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut style = Style::default().fg(Color::Black).bg(Color::Yellow);
        if self.toast.leaving {
            style = style.add_modifier(Modifier::DIM);
        }
        let line = Line::from(format!(" {} ", self.toast.message))
            .style(style)
            .centered();
        frame.render_widget(line, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::toast::Toasts;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_toast_line() {
        let backend = TestBackend::new(60, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut toasts = Toasts::new();
        let id = toasts.show("Укажите контакт для связи");
        toasts.begin_exit(id);
        let toast = toasts.current().unwrap();

        terminal
            .draw(|f| ToastLine { toast }.render(f, f.area()))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Укажите контакт"));
        assert!(buffer[(30, 0)].modifier.contains(Modifier::DIM));
    }
}
