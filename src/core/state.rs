//! # Application State
//!
//! Everything the site knows at runtime, in one struct. No terminal types
//! here; presentation state (scroll offsets, focus, form buffers) lives in
//! the `tui` module.
//!
//! ```text
//! App
//! ├── catalog: Catalog                 // site content
//! ├── glossary: Glossary               // tooltip definitions
//! ├── nav: NavigationController        // current section + back stack
//! ├── faq: PanelGroup                  // FAQ accordion
//! ├── cards: PanelGroup                // calculator service cards
//! ├── selected_service: Option<...>    // calculator selection in flight
//! ├── selected_card: Option<usize>     // card showing the "selected" mark
//! ├── submission: SubmitState          // Idle | Sending
//! ├── tooltip: Option<Tooltip>         // glossary tooltip overlay
//! ├── toasts: Toasts                   // transient notification
//! ├── counters: Vec<CountUp>           // one per catalog stat
//! ├── about_open: bool                 // about card expanded
//! ├── tab_bar_hidden: bool             // keyboard is eating the viewport
//! ├── pending_focus: Option<Field>     // released when a transition settles
//! └── scheduler: Scheduler<Deferred>   // timers
//! ```
//!
//! State changes only happen through `update(state, action, now)` in
//! action.rs.

use std::time::Instant;

use crate::core::action::Deferred;
use crate::core::catalog::Catalog;
use crate::core::counter::CountUp;
use crate::core::effect::Field;
use crate::core::glossary::{Glossary, Tooltip};
use crate::core::navigation::{NavError, NavigationController, Transition};
use crate::core::order::{SelectedService, SubmitState};
use crate::core::panel::{PanelGroup, PanelGroupKind};
use crate::core::schedule::Scheduler;
use crate::core::toast::Toasts;

pub struct App {
    pub catalog: Catalog,
    pub glossary: Glossary,
    pub nav: NavigationController,
    pub faq: PanelGroup,
    pub cards: PanelGroup,
    pub selected_service: Option<SelectedService>,
    pub selected_card: Option<usize>,
    pub submission: SubmitState,
    pub tooltip: Option<Tooltip>,
    pub toasts: Toasts,
    pub counters: Vec<CountUp>,
    pub about_open: bool,
    pub tab_bar_hidden: bool,
    pub pending_focus: Option<Field>,
    pub scheduler: Scheduler<Deferred>,
}

impl App {
    /// Fails only if the catalog's section table is inconsistent.
    pub fn new(catalog: Catalog) -> Result<Self, NavError> {
        let nav = NavigationController::new(catalog.section_table()?);
        Ok(Self {
            glossary: catalog.glossary(),
            faq: PanelGroup::new(PanelGroupKind::Faq, catalog.faq.len()),
            cards: PanelGroup::new(PanelGroupKind::ServiceCards, catalog.services.len()),
            counters: catalog.stats.iter().map(|s| CountUp::new(s.target)).collect(),
            nav,
            selected_service: None,
            selected_card: None,
            submission: SubmitState::Idle,
            tooltip: None,
            toasts: Toasts::new(),
            about_open: false,
            tab_bar_hidden: false,
            pending_focus: None,
            scheduler: Scheduler::new(),
            catalog,
        })
    }

    pub fn panels(&self, kind: PanelGroupKind) -> &PanelGroup {
        match kind {
            PanelGroupKind::Faq => &self.faq,
            PanelGroupKind::ServiceCards => &self.cards,
        }
    }

    pub fn panels_mut(&mut self, kind: PanelGroupKind) -> &mut PanelGroup {
        match kind {
            PanelGroupKind::Faq => &mut self.faq,
            PanelGroupKind::ServiceCards => &mut self.cards,
        }
    }

    /// True while anything on screen changes without input: counters
    /// running, a transition in flight, timers pending.
    pub fn is_animating(&self, now: Instant) -> bool {
        self.counters.iter().any(|c| c.is_running(now))
            || matches!(self.nav.transition(), Transition::Changing { .. })
            || !self.scheduler.is_empty()
    }
}
