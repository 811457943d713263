//! # Navigation Controller
//!
//! Owns the current section and the back stack, and keeps the three
//! projections that depend on them in step:
//!
//! ```text
//!              show_section / switch_tab / go_back
//!                             │
//!                             ▼
//!   ┌──────────────────────────────────────────────┐
//!   │ current: SectionId     history: Vec<Section> │
//!   └───────┬───────────────────┬──────────────┬───┘
//!           ▼                   ▼              ▼
//!     active section      top bar         tab bar
//!     (exactly one)    (hidden on home)  (slot of target,
//!                                          if it has one)
//! ```
//!
//! Transitions are forward (push current, go to target), back (pop, go to
//! popped) and lateral (tabs, no stack change). Every successful navigation
//! bumps `epoch`; deferred work scheduled under an older epoch is stale.

use std::fmt;

use log::{debug, error};

use crate::core::effect::{Effect, Haptic};
use crate::core::section::{SectionId, SectionTable};

#[derive(Debug)]
pub enum NavError {
    /// Navigation target doesn't name a known section. Nothing changed.
    UnknownSection(String),
    /// A section table failed validation.
    InvalidTable(String),
}

impl fmt::Display for NavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavError::UnknownSection(id) => write!(f, "section {id} not found"),
            NavError::InvalidTable(msg) => write!(f, "invalid section table: {msg}"),
        }
    }
}

impl std::error::Error for NavError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopBar {
    pub visible: bool,
    pub title: String,
}

/// Section transition state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Settled,
    Changing { from: SectionId, to: SectionId },
}

#[derive(Debug, Clone)]
pub struct NavigationController {
    table: SectionTable,
    current: SectionId,
    history: Vec<SectionId>,
    top_bar: TopBar,
    active_tab: Option<usize>,
    transition: Transition,
    epoch: u64,
}

impl NavigationController {
    /// Starts on the table's home section with an empty back stack.
    pub fn new(table: SectionTable) -> Self {
        let home = table.home().clone();
        let active_tab = table.tab_index(home.as_str());
        Self {
            top_bar: TopBar {
                visible: false,
                title: table.title_for(home.as_str()).to_string(),
            },
            current: home,
            history: Vec::new(),
            active_tab,
            transition: Transition::Settled,
            epoch: 0,
            table,
        }
    }

    pub fn table(&self) -> &SectionTable {
        &self.table
    }

    pub fn current(&self) -> &SectionId {
        &self.current
    }

    pub fn history(&self) -> &[SectionId] {
        &self.history
    }

    pub fn top_bar(&self) -> &TopBar {
        &self.top_bar
    }

    pub fn active_tab(&self) -> Option<usize> {
        self.active_tab
    }

    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Exactly one section is active: the current one.
    pub fn is_active(&self, id: &str) -> bool {
        self.current == id
    }

    /// Navigates to `target`.
    ///
    /// With `record_history`, the section being left is pushed onto the back
    /// stack unless it *is* the target. Unknown targets are logged and leave
    /// every piece of state untouched.
    pub fn show_section(
        &mut self,
        target: &str,
        record_history: bool,
    ) -> Result<Vec<Effect>, NavError> {
        let Some(section) = self.table.get(target) else {
            error!("Section {} not found", target);
            return Err(NavError::UnknownSection(target.to_string()));
        };
        let target_id = section.id.clone();
        let target_tab = section.tab;

        if record_history && self.current != target_id {
            self.history.push(self.current.clone());
        }

        self.top_bar = if self.table.is_home(target) {
            TopBar {
                visible: false,
                title: self.top_bar.title.clone(),
            }
        } else {
            TopBar {
                visible: true,
                title: self.table.title_for(target).to_string(),
            }
        };

        if let Some(tab) = target_tab {
            self.active_tab = Some(tab);
        }

        let from = std::mem::replace(&mut self.current, target_id.clone());
        self.transition = Transition::Changing {
            from,
            to: target_id,
        };
        self.epoch += 1;

        debug!(
            "Navigated to {} (record_history={}, depth={}, epoch={})",
            target,
            record_history,
            self.history.len(),
            self.epoch
        );

        let mut effects = vec![Effect::ScrollToTop, Effect::Expand];
        if record_history {
            effects.push(Effect::Haptic(Haptic::SOFT));
        }
        Ok(effects)
    }

    /// Lateral navigation from the bottom bar. Never touches the back stack.
    pub fn switch_tab(&mut self, target: &str) -> Result<Vec<Effect>, NavError> {
        if !self.table.contains(target) {
            error!("Section {} not found", target);
            return Err(NavError::UnknownSection(target.to_string()));
        }

        let mut effects = vec![Effect::Haptic(Haptic::LIGHT)];
        effects.extend(self.show_section(target, false)?);
        if let Some(tab) = self.table.tab_index(target) {
            self.active_tab = Some(tab);
        }
        Ok(effects)
    }

    /// Pops the back stack, or lands on home when it is empty.
    pub fn go_back(&mut self) -> Result<Vec<Effect>, NavError> {
        let mut effects = vec![Effect::Haptic(Haptic::LIGHT)];
        let target = match self.history.pop() {
            Some(previous) => previous,
            None => self.table.home().clone(),
        };
        effects.extend(self.show_section(target.as_str(), false)?);
        Ok(effects)
    }

    /// Platform back gesture: only meaningful while there is somewhere to go.
    pub fn history_back(&mut self) -> Result<Vec<Effect>, NavError> {
        if self.history.is_empty() {
            return Ok(Vec::new());
        }
        self.go_back()
    }

    /// Marks the transition started at `epoch` as finished. Returns false for
    /// a stale epoch (a newer navigation already started).
    pub fn settle(&mut self, epoch: u64) -> bool {
        if epoch != self.epoch {
            return false;
        }
        self.transition = Transition::Settled;
        true
    }
}
