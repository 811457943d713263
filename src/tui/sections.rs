//! # Section Content
//!
//! Turns the current section into a column of `ContentBlock`s for the
//! section view. Each block knows its height at the given width, the focus
//! stops it offers (buttons, panels, glossary terms, fields), and whether it
//! is a scroll anchor or a statistic counter.
//!
//! Built fresh every frame from core state; nothing here is persistent.

use std::time::Instant;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Wrap};

use crate::core::catalog::Catalog;
use crate::core::effect::{Anchor, Field};
use crate::core::glossary::{self, TextRun};
use crate::core::order::format_rub;
use crate::core::panel::PanelGroupKind;
use crate::core::section::{CALC, HOME, ORDER, PORTFOLIO, SUCCESS};
use crate::core::state::App;
use crate::tui::components::form_field::OrderFormState;

/// Something a focus stop does when activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Forward navigation, recorded in history.
    Section(String),
    /// Same as picking the tab.
    Tab(String),
    Faq(usize),
    ServiceCard(usize),
    SelectService(usize),
    Term(String),
    Feature(String),
    About,
    Field(Field),
    Submit,
}

/// A target inside a specific block. Terms repeat across blocks, so the
/// block index keeps stops distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusStop {
    pub block: usize,
    pub target: Target,
}

pub enum BlockBody {
    Text(Paragraph<'static>),
    /// Drawn by the form field itself.
    Field(Field),
}

pub struct ContentBlock {
    pub body: BlockBody,
    pub height: u16,
    pub targets: Vec<Target>,
    pub anchor: Option<Anchor>,
    pub stat: Option<usize>,
}

pub struct BlockContext<'a> {
    pub app: &'a App,
    pub form: &'a OrderFormState,
    pub focus: Option<&'a FocusStop>,
    pub editing: Option<Field>,
    pub accent: Color,
    pub width: u16,
    pub now: Instant,
}

pub fn focus_stops(blocks: &[ContentBlock]) -> Vec<FocusStop> {
    blocks
        .iter()
        .enumerate()
        .flat_map(|(block, b)| {
            b.targets.iter().map(move |target| FocusStop {
                block,
                target: target.clone(),
            })
        })
        .collect()
}

pub fn build_blocks(ctx: &BlockContext) -> Vec<ContentBlock> {
    let mut b = Builder {
        ctx,
        blocks: Vec::new(),
    };
    match ctx.app.nav.current().as_str() {
        HOME => home(&mut b),
        PORTFOLIO => portfolio(&mut b),
        CALC => calculator(&mut b),
        ORDER => order(&mut b),
        SUCCESS => success(&mut b),
        other => {
            let title = ctx.app.nav.table().title_for(other).to_string();
            b.heading(&title);
        }
    }
    b.blocks
}

struct Builder<'a> {
    ctx: &'a BlockContext<'a>,
    blocks: Vec<ContentBlock>,
}

impl Builder<'_> {
    fn catalog(&self) -> &Catalog {
        &self.ctx.app.catalog
    }

    fn accent(&self) -> Color {
        self.ctx.accent
    }

    /// Whether `target` in the block about to be pushed has focus.
    fn focused(&self, target: &Target) -> bool {
        self.ctx
            .focus
            .is_some_and(|f| f.block == self.blocks.len() && &f.target == target)
    }

    fn push(&mut self, paragraph: Paragraph<'static>, targets: Vec<Target>) -> &mut ContentBlock {
        // Wrap at the width inside a border, like the bordered cards render.
        let height = paragraph.line_count(self.ctx.width.saturating_sub(2)) as u16;
        self.blocks.push(ContentBlock {
            body: BlockBody::Text(paragraph),
            height,
            targets,
            anchor: None,
            stat: None,
        });
        let last = self.blocks.len() - 1;
        &mut self.blocks[last]
    }

    fn spacer(&mut self) {
        self.push(Paragraph::new(Line::default()), Vec::new());
    }

    fn heading(&mut self, text: &str) {
        let line = Line::from(Span::styled(
            text.to_string(),
            Style::default().fg(self.accent()).add_modifier(Modifier::BOLD),
        ));
        self.push(Paragraph::new(line), Vec::new());
    }

    /// A line of body text with `{Term}` markers turned into focusable terms.
    fn rich_line(&self, text: &str, base: Style) -> (Line<'static>, Vec<Target>) {
        let mut spans = Vec::new();
        let mut targets: Vec<Target> = Vec::new();
        for run in glossary::runs(text) {
            match run {
                TextRun::Plain(s) => spans.push(Span::styled(s.to_string(), base)),
                TextRun::Term(term) => {
                    let target = Target::Term(term.to_string());
                    let mut style = base
                        .fg(self.accent())
                        .add_modifier(Modifier::UNDERLINED);
                    if self.focused(&target) {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    spans.push(Span::styled(term.to_string(), style));
                    if !targets.contains(&target) {
                        targets.push(target);
                    }
                }
            }
        }
        (Line::from(spans), targets)
    }

    fn card_block(&self, title: &str, primary: Option<&Target>) -> Block<'static> {
        let border = if primary.is_some_and(|t| self.focused(t)) {
            Style::default().fg(self.accent()).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border);
        if title.is_empty() {
            block
        } else {
            block.title(format!(" {title} "))
        }
    }

    fn button(&mut self, label: &str, target: Option<Target>) {
        let style = match &target {
            Some(t) if self.focused(t) => Style::default()
                .fg(self.accent())
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            Some(_) => Style::default().fg(self.accent()).add_modifier(Modifier::BOLD),
            None => Style::default().fg(Color::DarkGray),
        };
        let block = self.card_block("", target.as_ref());
        let paragraph = Paragraph::new(Line::from(Span::styled(label.to_string(), style)).centered())
            .block(block);
        self.push(paragraph, target.into_iter().collect());
    }

    fn field(&mut self, field: Field) {
        let height = self.ctx.form.field(field).height(self.ctx.width);
        self.blocks.push(ContentBlock {
            body: BlockBody::Field(field),
            height,
            targets: vec![Target::Field(field)],
            anchor: None,
            stat: None,
        });
    }
}

fn home(b: &mut Builder) {
    let hero = b.catalog().hero.clone();
    let title = Line::from(Span::styled(
        hero.title.clone(),
        Style::default().fg(b.accent()).add_modifier(Modifier::BOLD),
    ));
    let (tagline, mut targets) = b.rich_line(&hero.tagline, Style::default().add_modifier(Modifier::BOLD));
    let (text, more) = b.rich_line(&hero.text, Style::default());
    for term in more {
        if !targets.contains(&term) {
            targets.push(term);
        }
    }
    b.push(
        Paragraph::new(vec![title, tagline, Line::default(), text]).wrap(Wrap { trim: true }),
        targets,
    );

    b.spacer();
    b.button("Рассчитать стоимость", Some(Target::Section(CALC.to_string())));
    b.button("Наши работы", Some(Target::Section(PORTFOLIO.to_string())));

    b.spacer();
    let stats = b.catalog().stats.clone();
    for (i, stat) in stats.iter().enumerate() {
        let value = b
            .ctx
            .app
            .counters
            .get(i)
            .map(|c| c.value_at(b.ctx.now))
            .unwrap_or(stat.target);
        let line = Line::from(vec![
            Span::styled(
                format!("{value}{}", stat.suffix),
                Style::default().fg(b.accent()).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(stat.label.clone(), Style::default().fg(Color::Gray)),
        ]);
        let block = b.card_block("", None);
        b.push(Paragraph::new(line).block(block), Vec::new()).stat = Some(i);
    }

    let features = b.catalog().features.clone();
    if !features.is_empty() {
        b.spacer();
        b.heading("Что мы делаем");
        for feature in &features {
            let primary = Target::Feature(feature.key.clone());
            let (summary, terms) = b.rich_line(&feature.summary, Style::default());
            let block = b.card_block(&feature.title, Some(&primary));
            let mut targets = vec![primary];
            targets.extend(terms);
            b.push(Paragraph::new(summary).block(block).wrap(Wrap { trim: true }), targets);
        }
    }

    let faq = b.catalog().faq.clone();
    if !faq.is_empty() {
        b.spacer();
        b.heading("Частые вопросы");
        for (i, entry) in faq.iter().enumerate() {
            let open = b.ctx.app.faq.is_open(i);
            let primary = Target::Faq(i);
            let marker = if open { "▾" } else { "▸" };
            let mut lines = vec![Line::from(Span::styled(
                format!("{marker} {}", entry.question),
                Style::default().add_modifier(Modifier::BOLD),
            ))];
            let mut targets = vec![primary.clone()];
            if open {
                let (answer, terms) = b.rich_line(&entry.answer, Style::default());
                lines.push(answer);
                targets.extend(terms);
            }
            let block = b.card_block("", Some(&primary));
            b.push(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), targets)
                .anchor = Some(Anchor::Panel(PanelGroupKind::Faq, i));
        }
    }

    // No about card in the catalog: no button either.
    if let Some(about) = b.catalog().about.clone() {
        b.spacer();
        let open = b.ctx.app.about_open;
        let label = if open { "О команде ▾" } else { "О команде ▸" };
        b.button(label, Some(Target::About));
        if open {
            let lines = vec![
                Line::from(Span::styled(
                    about.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(about.role.clone(), Style::default().fg(Color::Gray))),
                Line::default(),
                Line::from(about.bio.clone()),
            ];
            let block = b.card_block("", None);
            b.push(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), Vec::new())
                .anchor = Some(Anchor::About);
        }
    }
}

fn portfolio(b: &mut Builder) {
    let items = b.catalog().portfolio.clone();
    for item in &items {
        let (summary, terms) = b.rich_line(&item.summary, Style::default());
        let lines = vec![
            Line::from(Span::styled(item.category.clone(), Style::default().fg(Color::Gray))),
            summary,
        ];
        let primary = terms.first().cloned();
        let block = b.card_block(&item.title, primary.as_ref());
        b.push(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), terms);
    }
    b.spacer();
    b.button("Обсудить проект", Some(Target::Section(CALC.to_string())));
}

fn calculator(b: &mut Builder) {
    b.push(
        Paragraph::new("Выберите услугу. Итоговая цена фиксируется в договоре.")
            .style(Style::default().fg(Color::Gray))
            .wrap(Wrap { trim: true }),
        Vec::new(),
    );

    let services = b.catalog().services.clone();
    for (i, card) in services.iter().enumerate() {
        let open = b.ctx.app.cards.is_open(i);
        let selected = b.ctx.app.selected_card == Some(i);
        let primary = Target::ServiceCard(i);
        let select = Target::SelectService(i);

        let marker = if open { "▾" } else { "▸" };
        let mut header = vec![
            Span::styled(
                format!("{marker} {}", card.name),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(format_rub(card.price), Style::default().fg(b.accent())),
        ];
        if selected {
            header.push(Span::styled("  ✓ Выбрано", Style::default().fg(Color::Green)));
        }

        let mut lines = vec![Line::from(header)];
        let mut targets = vec![primary.clone()];
        if open {
            let (summary, terms) = b.rich_line(&card.summary, Style::default());
            lines.push(summary);
            for include in &card.includes {
                lines.push(Line::from(format!("• {include}")));
            }
            let select_style = if b.focused(&select) {
                Style::default()
                    .fg(b.accent())
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(b.accent()).add_modifier(Modifier::BOLD)
            };
            lines.push(Line::from(Span::styled("[ Выбрать ]", select_style)).right_aligned());
            targets.push(select);
            targets.extend(terms);
        }

        let block = b.card_block("", Some(&primary));
        b.push(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), targets)
            .anchor = Some(Anchor::Panel(PanelGroupKind::ServiceCards, i));
    }
}

fn order(b: &mut Builder) {
    let summary = match &b.ctx.app.selected_service {
        Some(service) => Line::from(vec![
            Span::raw("Услуга: "),
            Span::styled(service.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(format_rub(service.price), Style::default().fg(b.accent())),
        ]),
        None => Line::from(Span::styled(
            "Услуга не выбрана. Опишите задачу, и мы подберём решение.",
            Style::default().fg(Color::Gray),
        )),
    };
    b.push(Paragraph::new(summary).wrap(Wrap { trim: true }), Vec::new());
    b.spacer();

    b.field(Field::Description);
    b.field(Field::Contact);
    b.spacer();

    if b.ctx.app.submission.is_sending() {
        b.button("Отправка...", None);
    } else {
        b.button("Отправить заявку", Some(Target::Submit));
    }
}

fn success(b: &mut Builder) {
    let lines = vec![
        Line::from(Span::styled(
            "✓ Заявка отправлена!",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ))
        .centered(),
        Line::default(),
        Line::from("Мы свяжемся с вами в течение часа.").centered(),
    ];
    b.push(Paragraph::new(lines).wrap(Wrap { trim: true }), Vec::new());
    b.spacer();
    b.button("На главную", Some(Target::Tab(HOME.to_string())));
}
