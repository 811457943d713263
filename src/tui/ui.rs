//! Screen layout, the per-frame draw, and mouse hit testing.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ ←  Калькулятор               │  top bar (hidden on home)
//! ├──────────────────────────────┤
//! │                              │
//! │   section content (scrolls)  │
//! │                              │
//! │        toast (overlay)       │
//! ├──────────────────────────────┤
//! │ 1 Главная │ 2 Работы │ ...   │  tab bar (hidden under keyboard)
//! └──────────────────────────────┘
//! ```

use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};

use crate::core::section::SectionId;
use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{SectionView, TabBar, ToastLine, TooltipOverlay, TopBar};
use crate::tui::sections::Target;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub top_bar: Option<Rect>,
    pub body: Rect,
    pub tab_bar: Option<Rect>,
}

impl ScreenLayout {
    pub fn new(area: Rect, show_top_bar: bool, show_tab_bar: bool) -> Self {
        use Constraint::{Length, Min};
        let top = if show_top_bar { 1 } else { 0 };
        let bottom = if show_tab_bar { 1 } else { 0 };
        let [top_area, body, bottom_area] =
            Layout::vertical([Length(top), Min(0), Length(bottom)]).areas(area);
        Self {
            top_bar: show_top_bar.then_some(top_area),
            body,
            tab_bar: show_tab_bar.then_some(bottom_area),
        }
    }

    pub fn for_app(area: Rect, app: &App) -> Self {
        Self::new(area, app.nav.top_bar().visible, !app.tab_bar_hidden)
    }

    /// The body row a toast covers.
    pub fn toast_row(&self) -> Rect {
        Rect {
            y: self.body.y + self.body.height.saturating_sub(1),
            height: self.body.height.min(1),
            ..self.body
        }
    }
}

/// Tab bar entries `(slot, label)` and their section ids, in slot order.
pub fn tab_entries(app: &App) -> Vec<(usize, String, SectionId)> {
    app.nav
        .table()
        .tabs()
        .into_iter()
        .filter_map(|s| s.tab.map(|slot| (slot, s.tab_label().to_string(), s.id.clone())))
        .collect()
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, now: Instant) {
    let layout = ScreenLayout::for_app(frame.area(), app);

    if let Some(area) = layout.top_bar {
        TopBar::new(app.nav.top_bar().title.clone(), tui.accent).render(frame, area);
    }

    SectionView {
        state: &mut tui.section_view,
        app,
        form: &mut tui.form,
        focus: tui.focus.as_ref(),
        editing: tui.editing,
        accent: tui.accent,
        now,
    }
    .render(frame, layout.body);

    if let Some(toast) = app.toasts.current() {
        ToastLine { toast }.render(frame, layout.toast_row());
    }

    if let Some(area) = layout.tab_bar {
        let tabs = tab_entries(app)
            .into_iter()
            .map(|(slot, label, _)| (slot, label))
            .collect();
        TabBar::new(tabs, app.nav.active_tab(), tui.accent).render(frame, area);
    }

    if let Some(tooltip) = &app.tooltip {
        TooltipOverlay::new(tooltip, tui.accent).render(frame, layout.body);
    }
}

/// What a mouse click landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hit {
    Back,
    Tab(SectionId),
    Content { block: usize, target: Target },
    /// Inside the tooltip overlay.
    Tooltip,
    Nothing,
}

pub fn hit_test(app: &App, tui: &TuiState, area: Rect, column: u16, row: u16) -> Hit {
    let layout = ScreenLayout::for_app(area, app);
    let point = Position { x: column, y: row };

    if let Some(tooltip) = &app.tooltip {
        let rect = TooltipOverlay::new(tooltip, tui.accent).rect(layout.body);
        return if rect.contains(point) {
            Hit::Tooltip
        } else {
            Hit::Nothing
        };
    }

    if let Some(bar) = layout.top_bar
        && bar.contains(point)
    {
        return if TopBar::hits_back(bar, column) {
            Hit::Back
        } else {
            Hit::Nothing
        };
    }

    if let Some(bar) = layout.tab_bar
        && bar.contains(point)
    {
        let tabs = tab_entries(app);
        return TabBar::tab_at(bar, tabs.len(), column)
            .and_then(|i| tabs.into_iter().nth(i))
            .map(|(_, _, id)| Hit::Tab(id))
            .unwrap_or(Hit::Nothing);
    }

    match tui.section_view.target_at(layout.body, column, row) {
        Some((block, target)) => Hit::Content { block, target },
        None => Hit::Nothing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, update};
    use crate::core::section::{CALC, HOME};
    use crate::test_support::test_app;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::style::Color;

    fn render(app: &App, tui: &mut TuiState) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|f| draw_ui(f, app, tui, Instant::now()))
            .unwrap();
        terminal
    }

    fn text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_layout_rows() {
        let area = Rect::new(0, 0, 80, 24);
        let full = ScreenLayout::new(area, true, true);
        assert_eq!(full.top_bar, Some(Rect::new(0, 0, 80, 1)));
        assert_eq!(full.body, Rect::new(0, 1, 80, 22));
        assert_eq!(full.tab_bar, Some(Rect::new(0, 23, 80, 1)));
        assert_eq!(full.toast_row(), Rect::new(0, 22, 80, 1));

        let bare = ScreenLayout::new(area, false, false);
        assert_eq!(bare.top_bar, None);
        assert_eq!(bare.body, area);
        assert_eq!(bare.tab_bar, None);
    }

    #[test]
    fn test_home_has_no_top_bar() {
        let app = test_app();
        let mut tui = TuiState::new(Color::Blue);
        let terminal = render(&app, &mut tui);
        let screen = text(&terminal);
        assert!(!screen.contains('←'));
        assert!(screen.contains("1 Главная"));
    }

    #[test]
    fn test_calculator_shows_back_and_title() {
        let mut app = test_app();
        update(&mut app, Action::ShowSection(CALC.into()), Instant::now());
        let mut tui = TuiState::new(Color::Blue);
        let screen = text(&render(&app, &mut tui));
        assert!(screen.contains('←'));
        assert!(screen.contains(app.nav.top_bar().title.as_str()));
    }

    #[test]
    fn test_hidden_tab_bar_not_drawn() {
        let mut app = test_app();
        app.tab_bar_hidden = true;
        let mut tui = TuiState::new(Color::Blue);
        assert!(!text(&render(&app, &mut tui)).contains("1 Главная"));
    }

    #[test]
    fn test_hit_test_bars() {
        let mut app = test_app();
        update(&mut app, Action::ShowSection(CALC.into()), Instant::now());
        let mut tui = TuiState::new(Color::Blue);
        render(&app, &mut tui);
        let area = Rect::new(0, 0, 80, 24);

        assert_eq!(hit_test(&app, &tui, area, 1, 0), Hit::Back);
        assert_eq!(hit_test(&app, &tui, area, 30, 0), Hit::Nothing);
        assert_eq!(hit_test(&app, &tui, area, 2, 23), Hit::Tab(SectionId::new(HOME)));
    }

    #[test]
    fn test_tooltip_captures_clicks() {
        let mut app = test_app();
        update(
            &mut app,
            Action::ShowTooltip {
                term: "CRM".into(),
                definition: None,
            },
            Instant::now(),
        );
        let mut tui = TuiState::new(Color::Blue);
        render(&app, &mut tui);
        let area = Rect::new(0, 0, 80, 24);

        assert_eq!(hit_test(&app, &tui, area, 40, 12), Hit::Tooltip);
        assert_eq!(hit_test(&app, &tui, area, 0, 23), Hit::Nothing);
    }
}
