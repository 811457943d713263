//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the site, and
//! translates keyboard and mouse events into `core::Action` values. Effects
//! returned by `update()` are carried out here: scrolling and focus in the
//! terminal, haptics and payloads through the `Host`.
//!
//! ## Redraw Strategy
//!
//! - **Animating** (counters running, a transition settling, timers pending):
//!   draws every ~50ms so counters and fades move.
//! - **Idle**: sleeps up to 500ms and only redraws on events.
//!
//! Either way the wait never runs past the next scheduled timer.
//!
//! `Action::Tick` runs every loop iteration so due timers fire even when the
//! terminal is quiet.
//!
//! ## Keys
//!
//! | Key | Outside a field | Editing a field |
//! |---|---|---|
//! | Tab / Shift+Tab, ↓ / ↑ | next / previous focus stop | leave field, move focus |
//! | Enter, Space | activate focus stop | Enter: done, next stop |
//! | Esc | close tooltip, else history back | stop editing |
//! | Backspace | top-bar back | delete |
//! | 1-9 | switch tab | type |
//! | q | quit | type |
//! | PgUp / PgDn, wheel | scroll | scroll |
//!
//! Ctrl+C always quits. A terminal resize stands in for the host viewport:
//! shrinking well below the tallest height seen hides the tab bar, as an
//! on-screen keyboard would. The terminal regaining focus stands in for the
//! host's theme change.

mod component;
pub mod components;
mod event;
pub mod sections;
mod ui;

use std::io::stdout;
use std::str::FromStr;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableFocusChange, DisableMouseCapture, EnableBracketedPaste,
    EnableFocusChange, EnableMouseCapture, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use log::{debug, info, warn};
use ratatui::layout::Rect;
use ratatui::style::Color;

use crate::core::catalog::Catalog;
use crate::core::config::{DEFAULT_ACCENT_COLOR, ResolvedConfig};
use crate::core::effect::{Anchor, Effect, Field};
use crate::core::state::App;
use crate::core::{Action, update};
use crate::host::{Host, HostEvent};
use crate::tui::component::EventHandler;
use crate::tui::components::{FieldEvent, OrderFormState, ScrollRequest, SectionViewState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::sections::{FocusStop, Target};
use crate::tui::ui::Hit;

const FRAME_INTERVAL: Duration = Duration::from_millis(50);
const IDLE_INTERVAL: Duration = Duration::from_millis(500);

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub section_view: SectionViewState,
    pub form: OrderFormState,
    pub focus: Option<FocusStop>,
    /// Field receiving keystrokes, if any.
    pub editing: Option<Field>,
    pub accent: Color,
    /// Field to focus once it is on screen.
    focus_request: Option<Field>,
    /// Tallest terminal height seen; the "no keyboard" viewport.
    stable_height: u16,
}

impl TuiState {
    pub fn new(accent: Color) -> Self {
        Self {
            section_view: SectionViewState::new(),
            form: OrderFormState::new(),
            focus: None,
            editing: None,
            accent,
            focus_request: None,
            stable_height: 0,
        }
    }

    fn set_focus(&mut self, stop: FocusStop) {
        self.section_view.request(ScrollRequest::Block(stop.block));
        self.focus = Some(stop);
    }

    /// Cycles through the focus stops of the last render.
    pub fn move_focus(&mut self, forward: bool) {
        let stops = &self.section_view.stops;
        if stops.is_empty() {
            self.focus = None;
            return;
        }
        let len = stops.len();
        let current = self
            .focus
            .as_ref()
            .and_then(|f| stops.iter().position(|s| s == f));
        let next = match current {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None if forward => 0,
            None => len - 1,
        };
        let stop = stops[next].clone();
        self.set_focus(stop);
    }

    /// Moves focus and starts editing if it landed on a field.
    fn advance(&mut self, forward: bool) {
        self.editing = None;
        self.move_focus(forward);
        if let Some(FocusStop {
            target: Target::Field(field),
            ..
        }) = self.focus
        {
            self.editing = Some(field);
        }
    }

    /// Applies a pending field focus once the field has been laid out.
    /// Returns true if focus moved.
    pub fn resolve_focus_request(&mut self) -> bool {
        let Some(field) = self.focus_request else {
            return false;
        };
        let Some(stop) = self
            .section_view
            .stops
            .iter()
            .find(|s| s.target == Target::Field(field))
            .cloned()
        else {
            return false;
        };
        self.focus_request = None;
        self.set_focus(stop);
        self.editing = Some(field);
        true
    }

    fn clear_focus(&mut self) {
        self.focus = None;
        self.editing = None;
        self.focus_request = None;
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            EnableFocusChange,
            Show,
            SetCursorStyle::SteadyBar,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, focus, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            DisableFocusChange,
            Hide
        );
    }
}

/// Parses a `#RRGGBB` theme color.
pub fn parse_color(value: &str) -> Color {
    Color::from_str(value).unwrap_or_else(|_| {
        warn!("Invalid color {:?}, using {}", value, DEFAULT_ACCENT_COLOR);
        Color::from_str(DEFAULT_ACCENT_COLOR).unwrap_or(Color::Blue)
    })
}

/// Carries out effects from `update()`. Returns true on quit.
pub fn apply_effects(effects: Vec<Effect>, tui: &mut TuiState, host: &mut Host) -> bool {
    let mut quit = false;
    for effect in effects {
        match effect {
            Effect::Haptic(haptic) => host.haptic(haptic),
            Effect::Expand => host.expand(),
            Effect::ScrollToTop => {
                tui.section_view.request(ScrollRequest::Top);
                tui.clear_focus();
            }
            Effect::ScrollIntoView(anchor) => {
                let request = match anchor {
                    Anchor::Panel(..) => ScrollRequest::Center(anchor),
                    Anchor::About => ScrollRequest::Nearest(anchor),
                };
                tui.section_view.request(request);
            }
            Effect::Focus(field) => tui.focus_request = Some(field),
            Effect::ResetOrderForm => tui.form.reset(),
            Effect::SendData(payload) => {
                if host.send_data(&payload) {
                    info!("Order payload delivered ({} bytes)", payload.len());
                }
            }
            Effect::Quit => quit = true,
        }
    }
    quit
}

/// The action a focus stop triggers. Fields have none; they start editing.
pub fn target_action(target: &Target, form: &OrderFormState) -> Option<Action> {
    match target {
        Target::Section(id) => Some(Action::ShowSection(id.clone())),
        Target::Tab(id) => Some(Action::SwitchTab(id.clone())),
        Target::Faq(i) => Some(Action::ToggleFaq(*i)),
        Target::ServiceCard(i) => Some(Action::ToggleServiceCard(*i)),
        Target::SelectService(i) => Some(Action::SelectService(*i)),
        Target::Term(term) => Some(Action::ShowTooltip {
            term: term.clone(),
            definition: None,
        }),
        Target::Feature(key) => Some(Action::ShowFeatureDetail(key.clone())),
        Target::About => Some(Action::ToggleAbout),
        Target::Submit => Some(Action::SubmitOrder(form.snapshot())),
        Target::Field(_) => None,
    }
}

fn activate(tui: &mut TuiState) -> Option<Action> {
    let stop = tui.focus.clone()?;
    if let Target::Field(field) = stop.target {
        tui.editing = Some(field);
        return None;
    }
    target_action(&stop.target, &tui.form)
}

fn tab_action(app: &App, key: char) -> Option<Action> {
    let slot = key.to_digit(10)?.checked_sub(1)? as usize;
    let section = app.nav.table().section_for_tab(slot)?;
    Some(Action::SwitchTab(section.id.to_string()))
}

/// Routes one terminal event. Returns the actions it implies, in order.
pub fn handle_event(
    event: TuiEvent,
    app: &App,
    tui: &mut TuiState,
    host: &Host,
    area: Rect,
) -> Vec<Action> {
    match event {
        TuiEvent::ForceQuit => return vec![Action::Quit],
        TuiEvent::Resize(_, height) => {
            tui.stable_height = tui.stable_height.max(height);
            let viewport = HostEvent::ViewportChanged {
                height,
                stable_height: tui.stable_height,
            };
            return host.dispatch(viewport).into_iter().collect();
        }
        TuiEvent::FocusGained => {
            return host.dispatch(HostEvent::ThemeChanged).into_iter().collect();
        }
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.section_view.handle_event(&event);
            return Vec::new();
        }
        TuiEvent::MouseClick(column, row) => return handle_click(app, tui, area, column, row),
        _ => {}
    }

    if app.tooltip.is_some() {
        return match event {
            TuiEvent::Escape | TuiEvent::Submit | TuiEvent::InputChar(' ') => {
                vec![Action::HideTooltip]
            }
            _ => Vec::new(),
        };
    }

    if let Some(field) = tui.editing {
        return match event {
            TuiEvent::Escape => {
                tui.editing = None;
                Vec::new()
            }
            TuiEvent::FocusNext | TuiEvent::FocusPrev => {
                tui.advance(matches!(event, TuiEvent::FocusNext));
                Vec::new()
            }
            _ => {
                match tui.form.field_mut(field).handle_event(&event) {
                    Some(FieldEvent::Done) => tui.advance(true),
                    Some(FieldEvent::Changed) => {
                        if let Some(stop) = &tui.focus {
                            tui.section_view.request(ScrollRequest::Block(stop.block));
                        }
                    }
                    None => {}
                }
                Vec::new()
            }
        };
    }

    // Typing on a focused field starts editing it.
    if let Some(FocusStop {
        target: Target::Field(field),
        ..
    }) = tui.focus
        && matches!(event, TuiEvent::InputChar(_) | TuiEvent::Paste(_))
    {
        tui.editing = Some(field);
        tui.form.field_mut(field).handle_event(&event);
        return Vec::new();
    }

    match event {
        TuiEvent::FocusNext | TuiEvent::CursorDown => {
            tui.move_focus(true);
            Vec::new()
        }
        TuiEvent::FocusPrev | TuiEvent::CursorUp => {
            tui.move_focus(false);
            Vec::new()
        }
        TuiEvent::Submit | TuiEvent::InputChar(' ') => activate(tui).into_iter().collect(),
        TuiEvent::Escape => vec![Action::HistoryBack],
        TuiEvent::Backspace => vec![Action::GoBack],
        TuiEvent::InputChar('q') => vec![Action::Quit],
        TuiEvent::InputChar(c) if c.is_ascii_digit() => tab_action(app, c).into_iter().collect(),
        _ => Vec::new(),
    }
}

fn handle_click(app: &App, tui: &mut TuiState, area: Rect, column: u16, row: u16) -> Vec<Action> {
    let hit = ui::hit_test(app, tui, area, column, row);
    debug!("Click at ({}, {}): {:?}", column, row, hit);
    match hit {
        Hit::Tooltip => Vec::new(),
        _ if app.tooltip.is_some() => vec![Action::HideTooltip],
        Hit::Nothing => {
            tui.editing = None;
            Vec::new()
        }
        Hit::Back => vec![Action::GoBack],
        Hit::Tab(id) => vec![Action::SwitchTab(id.to_string())],
        Hit::Content { block, target } => {
            tui.editing = None;
            tui.focus = Some(FocusStop { block, target });
            activate(tui).into_iter().collect()
        }
    }
}

/// How long to wait for input: a frame while animating, otherwise the idle
/// interval, never past the next scheduled timer.
fn poll_timeout(app: &App, now: Instant) -> Duration {
    let base = if app.is_animating(now) {
        FRAME_INTERVAL
    } else {
        IDLE_INTERVAL
    };
    app.scheduler
        .next_due()
        .map_or(base, |due| due.saturating_duration_since(now).min(base))
}

pub fn run(config: &ResolvedConfig, catalog: Catalog, mut host: Host) -> std::io::Result<()> {
    let mut app = App::new(catalog)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
    let mut tui = TuiState::new(parse_color(&config.theme.accent_color));

    host.setup(&config.theme);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();
    tui.stable_height = terminal.size()?.height;

    let mut needs_redraw = true; // Force first frame

    loop {
        let now = Instant::now();

        // Timers
        let effects = update(&mut app, Action::Tick, now);
        if !effects.is_empty() {
            needs_redraw = true;
        }
        if apply_effects(effects, &mut tui, &mut host) {
            break;
        }

        let animating = app.is_animating(now);
        if animating || needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, now))?;
            needs_redraw = tui.resolve_focus_request();

            let visible: Vec<usize> = tui
                .section_view
                .visible_stats()
                .into_iter()
                .filter(|i| app.counters.get(*i).is_some_and(|c| !c.has_started()))
                .collect();
            if !visible.is_empty() {
                update(&mut app, Action::StatsVisible(visible), now);
                needs_redraw = true;
            }
        }

        let first_event = poll_event_timeout(poll_timeout(&app, now));
        if first_event.is_some() {
            needs_redraw = true;
        }

        let area = terminal.get_frame().area();
        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            for action in handle_event(event, &app, &mut tui, &host, area) {
                let effects = update(&mut app, action, Instant::now());
                should_quit |= apply_effects(effects, &mut tui, &mut host);
            }
        }
        if should_quit {
            break;
        }
    }

    info!("Exiting");
    ratatui::restore();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::TRANSITION_SETTLE;
    use crate::core::effect::Haptic;
    use crate::core::order::OrderForm;
    use crate::core::section::{CALC, HOME, ORDER, PORTFOLIO};
    use crate::test_support::{RecordingBridge, test_app};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    const AREA: Rect = Rect {
        x: 0,
        y: 0,
        width: 80,
        height: 24,
    };

    fn draw(app: &App, tui: &mut TuiState) {
        let mut terminal = Terminal::new(TestBackend::new(AREA.width, AREA.height)).unwrap();
        terminal
            .draw(|f| ui::draw_ui(f, app, tui, Instant::now()))
            .unwrap();
    }

    /// Feeds events through the adapter and the core like the event loop does.
    fn feed(app: &mut App, tui: &mut TuiState, host: &mut Host, events: Vec<TuiEvent>) -> bool {
        let mut quit = false;
        for event in events {
            draw(app, tui);
            for action in handle_event(event, app, tui, host, AREA) {
                let effects = update(app, action, Instant::now());
                quit |= apply_effects(effects, tui, host);
            }
        }
        draw(app, tui);
        tui.resolve_focus_request();
        quit
    }

    #[test]
    fn test_target_actions() {
        let form = OrderFormState::new();
        assert_eq!(
            target_action(&Target::Section(CALC.into()), &form),
            Some(Action::ShowSection(CALC.into()))
        );
        assert_eq!(
            target_action(&Target::Tab(HOME.into()), &form),
            Some(Action::SwitchTab(HOME.into()))
        );
        assert_eq!(
            target_action(&Target::Term("CRM".into()), &form),
            Some(Action::ShowTooltip {
                term: "CRM".into(),
                definition: None
            })
        );
        assert_eq!(
            target_action(&Target::Submit, &form),
            Some(Action::SubmitOrder(OrderForm::default()))
        );
        assert_eq!(target_action(&Target::Field(Field::Contact), &form), None);
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#0071E3"), Color::Rgb(0x00, 0x71, 0xE3));
        assert_eq!(parse_color("not a color"), Color::Rgb(0x00, 0x71, 0xE3));
    }

    #[test]
    fn test_digit_keys_switch_tabs() {
        let mut app = test_app();
        let mut tui = TuiState::new(Color::Blue);
        let mut host = Host::detached();
        feed(&mut app, &mut tui, &mut host, vec![TuiEvent::InputChar('2')]);
        assert_eq!(app.nav.current().as_str(), PORTFOLIO);
        feed(&mut app, &mut tui, &mut host, vec![TuiEvent::InputChar('9')]);
        assert_eq!(app.nav.current().as_str(), PORTFOLIO);
    }

    #[test]
    fn test_focus_cycles_and_wraps() {
        let mut app = test_app();
        let mut tui = TuiState::new(Color::Blue);
        let mut host = Host::detached();
        feed(&mut app, &mut tui, &mut host, vec![TuiEvent::FocusNext]);
        let first = tui.section_view.stops[0].clone();
        assert_eq!(tui.focus.as_ref(), Some(&first));

        feed(&mut app, &mut tui, &mut host, vec![TuiEvent::FocusPrev]);
        assert_eq!(tui.focus.as_ref(), tui.section_view.stops.last());
    }

    #[test]
    fn test_escape_hides_tooltip_before_history() {
        let mut app = test_app();
        let mut tui = TuiState::new(Color::Blue);
        let mut host = Host::detached();
        update(&mut app, Action::ShowSection(CALC.into()), Instant::now());
        update(
            &mut app,
            Action::ShowTooltip {
                term: "FSM".into(),
                definition: None,
            },
            Instant::now(),
        );

        feed(&mut app, &mut tui, &mut host, vec![TuiEvent::Escape]);
        assert!(app.tooltip.is_none());
        assert_eq!(app.nav.current().as_str(), CALC);

        feed(&mut app, &mut tui, &mut host, vec![TuiEvent::Escape]);
        assert_eq!(app.nav.current().as_str(), HOME);
    }

    #[test]
    fn test_typing_in_field_does_not_quit() {
        let mut app = test_app();
        let mut tui = TuiState::new(Color::Blue);
        let mut host = Host::detached();
        update(&mut app, Action::SwitchTab(ORDER.into()), Instant::now());
        draw(&app, &mut tui);
        tui.focus_request = Some(Field::Contact);
        assert!(tui.resolve_focus_request());

        let quit = feed(
            &mut app,
            &mut tui,
            &mut host,
            vec![TuiEvent::InputChar('q'), TuiEvent::InputChar('1')],
        );
        assert!(!quit);
        assert_eq!(tui.form.contact.buffer, "q1");
        assert_eq!(app.nav.current().as_str(), ORDER);
    }

    #[test]
    fn test_invalid_submit_focuses_field() {
        let mut app = test_app();
        let mut tui = TuiState::new(Color::Blue);
        let (bridge, calls) = RecordingBridge::new();
        let mut host = Host::new(Some(Box::new(bridge)), true);
        update(&mut app, Action::SwitchTab(ORDER.into()), Instant::now());
        draw(&app, &mut tui);

        let submit = tui
            .section_view
            .stops
            .iter()
            .find(|s| s.target == Target::Submit)
            .cloned()
            .unwrap();
        tui.focus = Some(submit);
        feed(&mut app, &mut tui, &mut host, vec![TuiEvent::Submit]);

        assert_eq!(tui.editing, Some(Field::Description));
        assert!(calls.borrow().contains(&"notification error".to_string()));
        assert!(app.toasts.current().is_some());
    }

    #[test]
    fn test_apply_effects() {
        let mut tui = TuiState::new(Color::Blue);
        let (bridge, calls) = RecordingBridge::new();
        let mut host = Host::new(Some(Box::new(bridge)), true);
        tui.form.contact.buffer = "@me".into();
        tui.editing = Some(Field::Contact);

        let quit = apply_effects(
            vec![
                Effect::Haptic(Haptic::SOFT),
                Effect::ResetOrderForm,
                Effect::SendData("{}".into()),
                Effect::ScrollToTop,
            ],
            &mut tui,
            &mut host,
        );
        assert!(!quit);
        assert!(tui.form.contact.buffer.is_empty());
        assert_eq!(tui.editing, None);
        assert_eq!(
            *calls.borrow(),
            vec!["impact soft".to_string(), "send_data {}".to_string()]
        );
        assert!(apply_effects(vec![Effect::Quit], &mut tui, &mut host));
    }

    #[test]
    fn test_resize_tracks_stable_height() {
        let mut app = test_app();
        let mut tui = TuiState::new(Color::Blue);
        let mut host = Host::detached();
        tui.stable_height = 40;

        feed(&mut app, &mut tui, &mut host, vec![TuiEvent::Resize(80, 20)]);
        assert!(app.tab_bar_hidden);
        feed(&mut app, &mut tui, &mut host, vec![TuiEvent::Resize(80, 50)]);
        assert!(!app.tab_bar_hidden);
        assert_eq!(tui.stable_height, 50);
    }

    #[test]
    fn test_focus_gained_reports_theme_change() {
        let app = test_app();
        let mut tui = TuiState::new(Color::Blue);
        let host = Host::detached();
        assert_eq!(
            handle_event(TuiEvent::FocusGained, &app, &mut tui, &host, AREA),
            vec![Action::ThemeChanged]
        );
    }

    #[test]
    fn test_poll_timeout_stops_at_next_timer() {
        let mut app = test_app();
        let t0 = Instant::now();
        assert_eq!(poll_timeout(&app, t0), IDLE_INTERVAL);

        update(&mut app, Action::ShowSection(CALC.into()), t0);
        assert_eq!(poll_timeout(&app, t0), FRAME_INTERVAL);
        let near_settle = t0 + TRANSITION_SETTLE - Duration::from_millis(10);
        assert_eq!(poll_timeout(&app, near_settle), Duration::from_millis(10));
        // Overdue timers mean no wait at all.
        assert_eq!(poll_timeout(&app, t0 + TRANSITION_SETTLE * 2), Duration::ZERO);
    }

    #[test]
    fn test_click_tab_bar() {
        let mut app = test_app();
        let mut tui = TuiState::new(Color::Blue);
        let mut host = Host::detached();
        // Third of four cells on an 80-column bar.
        feed(&mut app, &mut tui, &mut host, vec![TuiEvent::MouseClick(45, 23)]);
        assert_eq!(app.nav.current().as_str(), CALC);
    }
}
