//! # Actions
//!
//! Everything that can happen in the app becomes an `Action`.
//! User taps a tab? That's `Action::SwitchTab(target)`.
//! A timer fires? That's `Action::Tick`, which runs whatever is due.
//!
//! `update()` takes the current state and an action, mutates the state, and
//! returns the `Effect`s the adapter should carry out. No I/O here.
//!
//! ```text
//! State + Action + now  →  update()  →  New State + Vec<Effect>
//! ```
//!
//! Deferred work is scheduled with the navigation epoch it belongs to. When
//! it fires after a newer navigation, it is dropped.

use std::time::{Duration, Instant};

use chrono::Utc;
use log::{debug, info, warn};

use crate::core::effect::{Anchor, Effect, Field, Haptic};
use crate::core::glossary::Tooltip;
use crate::core::navigation::{NavError, NavigationController};
use crate::core::order::{OrderForm, OrderPayload, SubmitState};
use crate::core::panel::{PanelChange, PanelGroupKind};
use crate::core::section::{ORDER, SUCCESS};
use crate::core::state::App;
use crate::core::toast::{TOAST_EXIT, TOAST_VISIBLE};

/// How long a section transition runs before it counts as settled.
pub const TRANSITION_SETTLE: Duration = Duration::from_millis(300);
/// Pause between picking a service and landing on the order form.
pub const SELECTION_FLASH: Duration = Duration::from_millis(200);
/// Simulated send time for an order.
pub const SUBMIT_DELAY: Duration = Duration::from_millis(1500);
pub const SCROLL_INTO_VIEW_DELAY: Duration = Duration::from_millis(100);
/// Below this share of the stable viewport height the keyboard is assumed
/// open and the tab bar gets out of the way.
pub const KEYBOARD_VIEWPORT_RATIO: f32 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Forward navigation (records history).
    ShowSection(String),
    SwitchTab(String),
    /// Top-bar back button.
    GoBack,
    /// Platform back gesture; ignored when there is no history.
    HistoryBack,
    ToggleFaq(usize),
    ToggleServiceCard(usize),
    SelectService(usize),
    SubmitOrder(OrderForm),
    ShowTooltip {
        term: String,
        definition: Option<String>,
    },
    HideTooltip,
    ToggleAbout,
    ShowFeatureDetail(String),
    /// Stat blocks that crossed the visibility threshold.
    StatsVisible(Vec<usize>),
    ViewportChanged {
        height: u16,
        stable_height: u16,
    },
    ThemeChanged,
    Tick,
    Quit,
}

/// Work queued on the scheduler.
#[derive(Debug, Clone, PartialEq)]
pub enum Deferred {
    SettleTransition { epoch: u64 },
    OpenOrderForm { epoch: u64 },
    CompleteSubmission,
    ScrollIntoView { anchor: Anchor, epoch: u64 },
    ToastExit { id: u64 },
    ToastRemove { id: u64 },
}

pub fn update(app: &mut App, action: Action, now: Instant) -> Vec<Effect> {
    if action != Action::Tick {
        debug!("Action: {:?}", action);
    }

    match action {
        Action::ShowSection(target) => navigate(app, now, |nav| nav.show_section(&target, true)),
        Action::SwitchTab(target) => navigate(app, now, |nav| nav.switch_tab(&target)),
        Action::GoBack => navigate(app, now, NavigationController::go_back),
        Action::HistoryBack => navigate(app, now, NavigationController::history_back),
        Action::ToggleFaq(panel) => toggle_panel(app, PanelGroupKind::Faq, panel, now),
        Action::ToggleServiceCard(panel) => {
            toggle_panel(app, PanelGroupKind::ServiceCards, panel, now)
        }
        Action::SelectService(card) => select_service(app, card, now),
        Action::SubmitOrder(form) => submit_order(app, form, now),
        Action::ShowTooltip { term, definition } => {
            let (tooltip, effect) = Tooltip::show(&app.glossary, &term, definition.as_deref());
            app.tooltip = Some(tooltip);
            vec![effect]
        }
        Action::HideTooltip => {
            app.tooltip = None;
            Vec::new()
        }
        Action::ToggleAbout => toggle_about(app, now),
        Action::ShowFeatureDetail(feature) => {
            info!("Feature detail: {}", feature);
            vec![Effect::Haptic(Haptic::MEDIUM)]
        }
        Action::StatsVisible(indices) => {
            for index in indices {
                if let Some(counter) = app.counters.get_mut(index)
                    && counter.start(now)
                {
                    debug!("Counter {} started (target {})", index, counter.target());
                }
            }
            Vec::new()
        }
        Action::ViewportChanged {
            height,
            stable_height,
        } => {
            let hidden = (height as f32) < stable_height as f32 * KEYBOARD_VIEWPORT_RATIO;
            if hidden != app.tab_bar_hidden {
                debug!(
                    "Tab bar {} (viewport {}/{})",
                    if hidden { "hidden" } else { "shown" },
                    height,
                    stable_height
                );
            }
            app.tab_bar_hidden = hidden;
            Vec::new()
        }
        Action::ThemeChanged => {
            debug!("Theme changed; colors come from config");
            Vec::new()
        }
        Action::Tick => run_due(app, now),
        Action::Quit => vec![Effect::Quit],
    }
}

/// Runs a navigation and, when it actually moved, schedules the settle.
fn navigate(
    app: &mut App,
    now: Instant,
    go: impl FnOnce(&mut NavigationController) -> Result<Vec<Effect>, NavError>,
) -> Vec<Effect> {
    let before = app.nav.epoch();
    match go(&mut app.nav) {
        Ok(effects) => {
            let epoch = app.nav.epoch();
            if epoch != before {
                // Any focus still waiting belongs to the transition we just superseded.
                app.pending_focus = None;
                app.scheduler
                    .schedule(now, TRANSITION_SETTLE, Deferred::SettleTransition { epoch });
            }
            effects
        }
        Err(e) => {
            warn!("Navigation aborted: {}", e);
            Vec::new()
        }
    }
}

fn toggle_panel(app: &mut App, kind: PanelGroupKind, panel: usize, now: Instant) -> Vec<Effect> {
    let epoch = app.nav.epoch();
    match app.panels_mut(kind).toggle(panel) {
        Ok(PanelChange::Opened { panel, closed }) => {
            debug!("Opened {} panel {} (closed {:?})", kind, panel, closed);
            app.scheduler.schedule(
                now,
                SCROLL_INTO_VIEW_DELAY,
                Deferred::ScrollIntoView {
                    anchor: Anchor::Panel(kind, panel),
                    epoch,
                },
            );
            vec![Effect::Haptic(Haptic::MEDIUM)]
        }
        Ok(PanelChange::Closed { panel }) => {
            debug!("Closed {} panel {}", kind, panel);
            vec![Effect::Haptic(Haptic::MEDIUM)]
        }
        Err(e) => {
            warn!("Toggle ignored: {}", e);
            Vec::new()
        }
    }
}

fn select_service(app: &mut App, card: usize, now: Instant) -> Vec<Effect> {
    let Some(service) = app.catalog.services.get(card) else {
        warn!("No service card {}", card);
        return Vec::new();
    };

    info!("Service selected: {} ({})", service.id, service.price);
    app.selected_service = Some(service.selection());
    app.selected_card = Some(card);
    app.scheduler.schedule(
        now,
        SELECTION_FLASH,
        Deferred::OpenOrderForm {
            epoch: app.nav.epoch(),
        },
    );
    vec![Effect::Haptic(Haptic::SUCCESS)]
}

fn submit_order(app: &mut App, form: OrderForm, now: Instant) -> Vec<Effect> {
    if app.submission.is_sending() {
        debug!("Submit ignored: already sending");
        return Vec::new();
    }

    // The press itself is acknowledged before validation.
    let mut effects = vec![Effect::Haptic(Haptic::SUCCESS)];
    if let Err(e) = form.validate() {
        debug!("Order rejected: {:?}", e);
        show_toast(app, e.message(), now);
        effects.extend([Effect::Focus(e.field()), Effect::Haptic(Haptic::ERROR)]);
        return effects;
    }

    app.submission = SubmitState::Sending(form);
    app.scheduler.schedule(now, SUBMIT_DELAY, Deferred::CompleteSubmission);
    effects
}

fn toggle_about(app: &mut App, now: Instant) -> Vec<Effect> {
    let effects = vec![Effect::Haptic(Haptic::LIGHT)];
    if app.catalog.about.is_none() {
        return effects;
    }

    app.about_open = !app.about_open;
    if app.about_open {
        app.scheduler.schedule(
            now,
            SCROLL_INTO_VIEW_DELAY,
            Deferred::ScrollIntoView {
                anchor: Anchor::About,
                epoch: app.nav.epoch(),
            },
        );
    }
    effects
}

fn show_toast(app: &mut App, message: &str, now: Instant) {
    app.scheduler.cancel_where(|task| {
        matches!(task, Deferred::ToastExit { .. } | Deferred::ToastRemove { .. })
    });
    let id = app.toasts.show(message);
    app.scheduler.schedule(now, TOAST_VISIBLE, Deferred::ToastExit { id });
    app.scheduler
        .schedule(now, TOAST_VISIBLE + TOAST_EXIT, Deferred::ToastRemove { id });
}

fn run_due(app: &mut App, now: Instant) -> Vec<Effect> {
    let mut effects = Vec::new();
    for task in app.scheduler.take_due(now) {
        effects.extend(run_deferred(app, task, now));
    }
    effects
}

fn run_deferred(app: &mut App, task: Deferred, now: Instant) -> Vec<Effect> {
    match task {
        Deferred::SettleTransition { epoch } => {
            if !app.nav.settle(epoch) {
                return Vec::new();
            }
            app.pending_focus.take().map(Effect::Focus).into_iter().collect()
        }
        Deferred::OpenOrderForm { epoch } => {
            if epoch != app.nav.epoch() {
                debug!("Order form navigation superseded");
                return Vec::new();
            }
            let effects = navigate(app, now, |nav| nav.show_section(ORDER, true));
            if app.nav.current() == ORDER {
                app.pending_focus = Some(Field::Description);
            }
            effects
        }
        Deferred::CompleteSubmission => complete_submission(app, now),
        Deferred::ScrollIntoView { anchor, epoch } => {
            let still_open = match anchor {
                Anchor::Panel(kind, panel) => app.panels(kind).is_open(panel),
                Anchor::About => app.about_open,
            };
            if epoch == app.nav.epoch() && still_open {
                vec![Effect::ScrollIntoView(anchor)]
            } else {
                Vec::new()
            }
        }
        Deferred::ToastExit { id } => {
            app.toasts.begin_exit(id);
            Vec::new()
        }
        Deferred::ToastRemove { id } => {
            app.toasts.remove(id);
            Vec::new()
        }
    }
}

fn complete_submission(app: &mut App, now: Instant) -> Vec<Effect> {
    let SubmitState::Sending(form) = std::mem::replace(&mut app.submission, SubmitState::Idle)
    else {
        return Vec::new();
    };

    let service = app.selected_service.take();
    app.selected_card = None;

    let mut effects = navigate(app, now, |nav| nav.show_section(SUCCESS, true));
    effects.push(Effect::ResetOrderForm);

    let payload = OrderPayload::new(form, service, Utc::now());
    match payload.to_json() {
        Ok(json) => {
            info!("Order sent ({} bytes)", json.len());
            effects.push(Effect::SendData(json));
        }
        Err(e) => warn!("Failed to encode order payload: {}", e),
    }
    effects
}
