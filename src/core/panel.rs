//! # Exclusive-Open Panels
//!
//! Accordion behaviour: a `PanelGroup` tracks at most one open member. The
//! open panel is a single `Option<usize>`, so two siblings can never be open
//! at once, not even in between the close and the open of a toggle.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelGroupKind {
    Faq,
    ServiceCards,
}

impl fmt::Display for PanelGroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelGroupKind::Faq => f.write_str("faq"),
            PanelGroupKind::ServiceCards => f.write_str("service cards"),
        }
    }
}

#[derive(Debug)]
pub enum PanelError {
    UnknownPanel { group: PanelGroupKind, index: usize },
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelError::UnknownPanel { group, index } => {
                write!(f, "no panel {index} in {group} group")
            }
        }
    }
}

impl std::error::Error for PanelError {}

/// What a toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelChange {
    /// `panel` opened; `closed` is the sibling that had to close for it.
    Opened { panel: usize, closed: Option<usize> },
    Closed { panel: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelGroup {
    kind: PanelGroupKind,
    len: usize,
    open: Option<usize>,
}

impl PanelGroup {
    pub fn new(kind: PanelGroupKind, len: usize) -> Self {
        Self {
            kind,
            len,
            open: None,
        }
    }

    pub fn kind(&self) -> PanelGroupKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn open_panel(&self) -> Option<usize> {
        self.open
    }

    pub fn is_open(&self, panel: usize) -> bool {
        self.open == Some(panel)
    }

    pub fn toggle(&mut self, panel: usize) -> Result<PanelChange, PanelError> {
        if panel >= self.len {
            return Err(PanelError::UnknownPanel {
                group: self.kind,
                index: panel,
            });
        }

        if self.open == Some(panel) {
            self.open = None;
            return Ok(PanelChange::Closed { panel });
        }

        let closed = self.open.replace(panel);
        Ok(PanelChange::Opened { panel, closed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_open_then_close() {
        let mut faq = PanelGroup::new(PanelGroupKind::Faq, 3);
        assert_eq!(
            faq.toggle(1).unwrap(),
            PanelChange::Opened { panel: 1, closed: None }
        );
        assert!(faq.is_open(1));
        assert_eq!(faq.toggle(1).unwrap(), PanelChange::Closed { panel: 1 });
        assert_eq!(faq.open_panel(), None);
    }

    #[test]
    fn test_opening_sibling_closes_previous() {
        let mut faq = PanelGroup::new(PanelGroupKind::Faq, 3);
        faq.toggle(0).unwrap();
        assert_eq!(
            faq.toggle(2).unwrap(),
            PanelChange::Opened { panel: 2, closed: Some(0) }
        );
        assert!(!faq.is_open(0));
        assert!(faq.is_open(2));
    }

    #[test]
    fn test_unknown_panel_rejected() {
        let mut cards = PanelGroup::new(PanelGroupKind::ServiceCards, 2);
        cards.toggle(0).unwrap();
        let err = cards.toggle(5).unwrap_err();
        assert!(matches!(
            err,
            PanelError::UnknownPanel { group: PanelGroupKind::ServiceCards, index: 5 }
        ));
        assert!(cards.is_open(0));
    }

    #[test]
    fn test_groups_are_independent() {
        let mut faq = PanelGroup::new(PanelGroupKind::Faq, 2);
        let mut cards = PanelGroup::new(PanelGroupKind::ServiceCards, 2);
        faq.toggle(0).unwrap();
        cards.toggle(1).unwrap();
        assert!(faq.is_open(0));
        assert!(cards.is_open(1));
    }

    proptest! {
        #[test]
        fn prop_at_most_one_open(toggles in prop::collection::vec(0usize..6, 0..64)) {
            let mut group = PanelGroup::new(PanelGroupKind::Faq, 6);
            for panel in toggles {
                group.toggle(panel).unwrap();
                let open = (0..group.len()).filter(|&p| group.is_open(p)).count();
                prop_assert!(open <= 1);
            }
        }

        #[test]
        fn prop_double_toggle_restores(
            setup in prop::collection::vec(0usize..5, 0..16),
            panel in 0usize..5,
        ) {
            let mut group = PanelGroup::new(PanelGroupKind::ServiceCards, 5);
            for p in setup {
                group.toggle(p).unwrap();
            }
            let before = group.open_panel();
            group.toggle(panel).unwrap();
            group.toggle(panel).unwrap();
            // Opening then closing a closed panel leaves nothing open; closing
            // then reopening an open panel leaves it open.
            if before == Some(panel) {
                prop_assert_eq!(group.open_panel(), Some(panel));
            } else {
                prop_assert_eq!(group.open_panel(), None);
            }
        }
    }
}
