//! # Glossary
//!
//! IT terms that get a tooltip. Body text marks a term inline with braces,
//! `{API}`, and `runs()` splits such text into plain and term pieces for the
//! renderer.

use std::collections::BTreeMap;

use crate::core::effect::{Effect, Haptic};

pub const PENDING_DEFINITION: &str = "Определение скоро появится...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glossary {
    entries: BTreeMap<String, String>,
}

impl Glossary {
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }

    /// Inline definition wins, then the glossary, then the placeholder.
    pub fn define(&self, term: &str, inline: Option<&str>) -> String {
        inline
            .filter(|d| !d.trim().is_empty())
            .or_else(|| self.entries.get(term).map(String::as_str))
            .unwrap_or(PENDING_DEFINITION)
            .to_string()
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn builtin_entries() -> BTreeMap<String, String> {
    [
        ("API", "Application Programming Interface — набор правил, позволяющий разным программам обмениваться данными между собой"),
        ("CRM", "Customer Relationship Management — система для управления взаимоотношениями с клиентами и автоматизации продаж"),
        ("ERP", "Enterprise Resource Planning — система планирования ресурсов предприятия (бухгалтерия, склад, персонал)"),
        ("FSM", "Finite State Machine — конечный автомат, помогает боту помнить, на каком шаге диалога находится пользователь"),
        ("MVP", "Minimum Viable Product — минимально жизнеспособный продукт с базовыми функциями для быстрого запуска"),
        ("Mini Apps", "Мини-приложения прямо внутри Telegram, работают без установки как обычные сайты"),
        ("USDT", "Криптовалютный стейблкоин, привязанный к доллару США (1 USDT ≈ 1 USD), удобен для международных переводов"),
    ]
    .into_iter()
    .map(|(term, def)| (term.to_string(), def.to_string()))
    .collect()
}

/// The tooltip currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    pub term: String,
    pub definition: String,
}

impl Tooltip {
    pub fn show(glossary: &Glossary, term: &str, inline: Option<&str>) -> (Self, Effect) {
        let tooltip = Self {
            term: term.to_string(),
            definition: glossary.define(term, inline),
        };
        (tooltip, Effect::Haptic(Haptic::LIGHT))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRun<'a> {
    Plain(&'a str),
    Term(&'a str),
}

/// Splits `text` on `{term}` markers. An unclosed brace is kept as plain text.
pub fn runs(text: &str) -> Vec<TextRun<'_>> {
    let mut out = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}').map(|i| open + i) else {
            break;
        };
        if open > 0 {
            out.push(TextRun::Plain(&rest[..open]));
        }
        let term = &rest[open + 1..close];
        if !term.is_empty() {
            out.push(TextRun::Term(term));
        }
        rest = &rest[close + 1..];
    }
    if !rest.is_empty() {
        out.push(TextRun::Plain(rest));
    }
    out
}

/// Distinct terms marked in `text`, in order of first appearance.
pub fn marked_terms(text: &str) -> Vec<&str> {
    let mut terms: Vec<&str> = Vec::new();
    for run in runs(text) {
        if let TextRun::Term(term) = run
            && !terms.contains(&term)
        {
            terms.push(term);
        }
    }
    terms
}

/// `text` with the markers removed.
pub fn plain_text(text: &str) -> String {
    runs(text)
        .into_iter()
        .map(|run| match run {
            TextRun::Plain(s) | TextRun::Term(s) => s,
        })
        .collect()
}
