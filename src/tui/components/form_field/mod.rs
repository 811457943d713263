//! # Form Fields
//!
//! Text inputs for the order form: a multi-line task description and a
//! one-line contact. Each field owns its buffer and cursor; the order form
//! groups the two and produces the `OrderForm` the core validates.
//!
//! Fields are drawn inside the scrolling section view, so rendering is split
//! in two: `widget()` builds the bordered paragraph that goes into the
//! scroll canvas, and `screen_pos()` maps the cursor to a terminal cell once
//! the field's on-screen rect is known.

mod cursor;
mod text_wrap;

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};
use ratatui::layout::Rect;

use crate::core::effect::Field;
use crate::core::order::OrderForm;
use crate::tui::component::EventHandler;
use crate::tui::event::TuiEvent;

use cursor::CursorState;
use text_wrap::{
    VERTICAL_OVERHEAD, inner_width, next_char_boundary, prev_char_boundary, wrap_line_count,
    wrap_options,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEvent {
    Changed,
    /// Enter on a field: move on to the next stop.
    Done,
}

pub struct FormField {
    pub field: Field,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub buffer: String,
    max_lines: u16,
    multiline: bool,
    cursor: CursorState,
}

impl FormField {
    pub fn new(
        field: Field,
        label: &'static str,
        placeholder: &'static str,
        max_lines: u16,
        multiline: bool,
    ) -> Self {
        Self {
            field,
            label,
            placeholder,
            buffer: String::new(),
            max_lines: max_lines.max(1),
            multiline,
            cursor: CursorState::new(),
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor.reset();
    }

    /// Outer height for the given outer width, borders included.
    pub fn height(&self, width: u16) -> u16 {
        let lines = wrap_line_count(&self.buffer, inner_width(width));
        lines.clamp(1, self.max_lines) + VERTICAL_OVERHEAD
    }

    /// Records the width the field is laid out at and scrolls to the cursor.
    pub fn layout(&mut self, width: u16) {
        self.cursor.last_width = width;
        self.cursor
            .update_scroll_offset(&self.buffer, width, self.max_lines);
    }

    fn visible_text(&self, width: u16) -> String {
        let width = inner_width(width);
        if width == 0 {
            return String::new();
        }
        if self.cursor.scroll_offset == 0 && wrap_line_count(&self.buffer, width) <= self.max_lines
        {
            return self.buffer.clone();
        }
        let lines = textwrap::wrap(&self.buffer, wrap_options(width));
        let start = (self.cursor.scroll_offset as usize).min(lines.len());
        let end = (start + self.max_lines as usize).min(lines.len());
        lines[start..end].join("\n")
    }

    pub fn widget(&self, width: u16, focused: bool, editing: bool, accent: Color) -> Paragraph<'static> {
        let border_style = if editing {
            Style::default().fg(accent)
        } else if focused {
            Style::default().fg(accent).add_modifier(Modifier::DIM)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(self.label);

        if self.buffer.is_empty() {
            Paragraph::new(self.placeholder)
                .style(Style::default().fg(Color::DarkGray))
                .block(block)
        } else {
            Paragraph::new(self.visible_text(width)).block(block)
        }
    }

    pub fn screen_pos(&self, area: Rect) -> (u16, u16) {
        self.cursor.screen_pos(&self.buffer, area)
    }
}

impl EventHandler for FormField {
    type Event = FieldEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar('\n') if !self.multiline => None,
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor.pos, *c);
                self.cursor.pos += c.len_utf8();
                Some(FieldEvent::Changed)
            }
            TuiEvent::Paste(text) => {
                let text = if self.multiline {
                    text.replace("\r\n", "\n")
                } else {
                    text.replace(['\r', '\n'], " ")
                };
                self.buffer.insert_str(self.cursor.pos, &text);
                self.cursor.pos += text.len();
                Some(FieldEvent::Changed)
            }
            TuiEvent::Backspace => (self.cursor.pos > 0).then(|| {
                let prev = prev_char_boundary(&self.buffer, self.cursor.pos);
                self.buffer.drain(prev..self.cursor.pos);
                self.cursor.pos = prev;
                FieldEvent::Changed
            }),
            TuiEvent::Delete => (self.cursor.pos < self.buffer.len()).then(|| {
                let next = next_char_boundary(&self.buffer, self.cursor.pos);
                self.buffer.drain(self.cursor.pos..next);
                FieldEvent::Changed
            }),
            TuiEvent::CursorLeft => (self.cursor.pos > 0).then(|| {
                self.cursor.pos = prev_char_boundary(&self.buffer, self.cursor.pos);
                FieldEvent::Changed
            }),
            TuiEvent::CursorRight => (self.cursor.pos < self.buffer.len()).then(|| {
                self.cursor.pos = next_char_boundary(&self.buffer, self.cursor.pos);
                FieldEvent::Changed
            }),
            TuiEvent::CursorHome => {
                let line_start = self.buffer[..self.cursor.pos]
                    .rfind('\n')
                    .map(|i| i + 1)
                    .unwrap_or(0);
                (self.cursor.pos != line_start).then(|| {
                    self.cursor.pos = line_start;
                    FieldEvent::Changed
                })
            }
            TuiEvent::CursorEnd => {
                let line_end = self.buffer[self.cursor.pos..]
                    .find('\n')
                    .map(|i| self.cursor.pos + i)
                    .unwrap_or(self.buffer.len());
                (self.cursor.pos != line_end).then(|| {
                    self.cursor.pos = line_end;
                    FieldEvent::Changed
                })
            }
            TuiEvent::CursorUp if self.multiline => self
                .cursor
                .move_vertically(&self.buffer, -1)
                .then_some(FieldEvent::Changed),
            TuiEvent::CursorDown if self.multiline => self
                .cursor
                .move_vertically(&self.buffer, 1)
                .then_some(FieldEvent::Changed),
            TuiEvent::Submit => Some(FieldEvent::Done),
            _ => None,
        }
    }
}

/// The order form's two fields.
pub struct OrderFormState {
    pub description: FormField,
    pub contact: FormField,
}

impl Default for OrderFormState {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderFormState {
    pub fn new() -> Self {
        Self {
            description: FormField::new(
                Field::Description,
                " Опишите задачу ",
                "Например: бот для записи клиентов с напоминаниями",
                5,
                true,
            ),
            contact: FormField::new(
                Field::Contact,
                " Контакт для связи ",
                "@username или телефон",
                1,
                false,
            ),
        }
    }

    pub fn field(&self, field: Field) -> &FormField {
        match field {
            Field::Description => &self.description,
            Field::Contact => &self.contact,
        }
    }

    pub fn field_mut(&mut self, field: Field) -> &mut FormField {
        match field {
            Field::Description => &mut self.description,
            Field::Contact => &mut self.contact,
        }
    }

    pub fn snapshot(&self) -> OrderForm {
        OrderForm::new(self.description.buffer.clone(), self.contact.buffer.clone())
    }

    pub fn reset(&mut self) {
        self.description.clear();
        self.contact.clear();
    }
}
