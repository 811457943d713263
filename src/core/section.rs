//! # Sections
//!
//! A section is one navigable view region of the app. The set of sections is
//! static: it is described once by a `SectionTable` and never changes while
//! the app runs.
//!
//! ```text
//! SectionTable
//! ├── sections: Vec<Section>   // id, title, optional tab slot
//! ├── home: SectionId          // where the app starts and `go_back` bottoms out
//! └── default_title: String    // top-bar title for sections without one
//! ```

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::navigation::NavError;

pub const HOME: &str = "home";
pub const PORTFOLIO: &str = "portfolio";
pub const CALC: &str = "calc";
pub const ORDER: &str = "order";
pub const SUCCESS: &str = "success";

pub const DEFAULT_TITLE: &str = "STRATUM";

/// Identifier of a section (`"home"`, `"calc"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SectionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl PartialEq<str> for SectionId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SectionId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub title: String,
    /// Slot in the bottom tab bar, if this section is a tab.
    #[serde(default)]
    pub tab: Option<usize>,
    /// Short label shown in the tab bar (falls back to the title).
    #[serde(default)]
    pub tab_label: Option<String>,
}

impl Section {
    pub fn new(id: &str, title: &str, tab: Option<usize>, tab_label: Option<&str>) -> Self {
        Self {
            id: SectionId::new(id),
            title: title.to_string(),
            tab,
            tab_label: tab_label.map(str::to_string),
        }
    }

    pub fn tab_label(&self) -> &str {
        self.tab_label.as_deref().unwrap_or(&self.title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionTable {
    sections: Vec<Section>,
    home: SectionId,
    default_title: String,
}

impl SectionTable {
    /// Builds a table, rejecting duplicate ids, duplicate tab slots and a
    /// home section that isn't part of the table.
    pub fn new(
        sections: Vec<Section>,
        home: SectionId,
        default_title: impl Into<String>,
    ) -> Result<Self, NavError> {
        let mut ids = HashSet::new();
        let mut tabs = HashSet::new();
        for section in &sections {
            if !ids.insert(section.id.as_str()) {
                return Err(NavError::InvalidTable(format!(
                    "duplicate section id '{}'",
                    section.id
                )));
            }
            if let Some(tab) = section.tab
                && !tabs.insert(tab)
            {
                return Err(NavError::InvalidTable(format!(
                    "tab slot {tab} claimed twice (by '{}')",
                    section.id
                )));
            }
        }
        if !ids.contains(home.as_str()) {
            return Err(NavError::InvalidTable(format!(
                "home section '{home}' is not in the table"
            )));
        }

        Ok(Self {
            sections,
            home,
            default_title: default_title.into(),
        })
    }

    /// The built-in table: four tabs plus the success screen.
    pub fn stratum() -> Self {
        Self {
            sections: builtin_sections(),
            home: SectionId::new(HOME),
            default_title: DEFAULT_TITLE.to_string(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn home(&self) -> &SectionId {
        &self.home
    }

    pub fn is_home(&self, id: &str) -> bool {
        self.home == id
    }

    pub fn default_title(&self) -> &str {
        &self.default_title
    }

    /// Top-bar title for a section; unknown ids get the default title.
    pub fn title_for(&self, id: &str) -> &str {
        self.get(id)
            .map(|s| s.title.as_str())
            .unwrap_or(&self.default_title)
    }

    pub fn tab_index(&self, id: &str) -> Option<usize> {
        self.get(id).and_then(|s| s.tab)
    }

    pub fn section_for_tab(&self, index: usize) -> Option<&Section> {
        self.sections.iter().find(|s| s.tab == Some(index))
    }

    /// Tab sections ordered by their slot.
    pub fn tabs(&self) -> Vec<&Section> {
        let mut tabs: Vec<&Section> = self.sections.iter().filter(|s| s.tab.is_some()).collect();
        tabs.sort_by_key(|s| s.tab);
        tabs
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }
}

pub fn builtin_sections() -> Vec<Section> {
    vec![
        Section::new(HOME, "STRATUM", Some(0), Some("Главная")),
        Section::new(PORTFOLIO, "Наши работы", Some(1), Some("Работы")),
        Section::new(CALC, "Калькулятор", Some(2), Some("Цены")),
        Section::new(ORDER, "Оформить заказ", Some(3), Some("Заказ")),
        Section::new(SUCCESS, "Готово", None, None),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_titles() {
        let table = SectionTable::stratum();
        assert_eq!(table.title_for(CALC), "Калькулятор");
        assert_eq!(table.title_for(PORTFOLIO), "Наши работы");
        assert_eq!(table.title_for(SUCCESS), "Готово");
        assert_eq!(table.title_for("nowhere"), DEFAULT_TITLE);
    }

    #[test]
    fn test_builtin_tab_map() {
        let table = SectionTable::stratum();
        assert_eq!(table.tab_index(HOME), Some(0));
        assert_eq!(table.tab_index(PORTFOLIO), Some(1));
        assert_eq!(table.tab_index(CALC), Some(2));
        assert_eq!(table.tab_index(ORDER), Some(3));
        assert_eq!(table.tab_index(SUCCESS), None);
        assert_eq!(table.section_for_tab(2).map(|s| s.id.as_str()), Some(CALC));
        assert!(table.section_for_tab(4).is_none());
    }

    #[test]
    fn test_tabs_sorted_by_slot() {
        let sections = vec![
            Section::new("b", "B", Some(1), None),
            Section::new("a", "A", Some(0), None),
            Section::new("c", "C", None, None),
        ];
        let table = SectionTable::new(sections, SectionId::new("a"), "X").unwrap();
        let ids: Vec<&str> = table.tabs().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_table_rejects_missing_home() {
        let sections = vec![Section::new("a", "A", None, None)];
        let err = SectionTable::new(sections, SectionId::new("home"), "X").unwrap_err();
        assert!(matches!(err, NavError::InvalidTable(_)));
    }

    #[test]
    fn test_table_rejects_duplicates() {
        let dup_ids = vec![
            Section::new("a", "A", None, None),
            Section::new("a", "A again", None, None),
        ];
        assert!(SectionTable::new(dup_ids, SectionId::new("a"), "X").is_err());

        let dup_tabs = vec![
            Section::new("a", "A", Some(0), None),
            Section::new("b", "B", Some(0), None),
        ];
        assert!(SectionTable::new(dup_tabs, SectionId::new("a"), "X").is_err());
    }

    #[test]
    fn test_tab_label_falls_back_to_title() {
        let section = Section::new("x", "Title", Some(0), None);
        assert_eq!(section.tab_label(), "Title");
        let labelled = Section::new("x", "Title", Some(0), Some("T"));
        assert_eq!(labelled.tab_label(), "T");
    }
}
