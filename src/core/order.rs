//! # Order Form
//!
//! Validation and payload shape for the order submission flow. The flow
//! itself (haptics, toasts, the deferred "sending" phase) lives in
//! `action::update`; this module only knows what a valid order looks like.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::core::effect::Field;

/// Minimum description length, in UTF-16 code units (what a browser text
/// field reports as its length).
pub const MIN_DESCRIPTION_CHARS: usize = 20;

/// The calculator selection riding along with the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedService {
    pub id: String,
    pub price: u64,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    DescriptionTooShort,
    MissingContact,
}

impl ValidationError {
    /// Text shown to the user in the toast.
    pub fn message(&self) -> &'static str {
        match self {
            ValidationError::DescriptionTooShort => {
                "Опишите задачу подробнее (минимум 20 символов)"
            }
            ValidationError::MissingContact => "Укажите контакт для связи",
        }
    }

    /// The field that gets focus back.
    pub fn field(&self) -> Field {
        match self {
            ValidationError::DescriptionTooShort => Field::Description,
            ValidationError::MissingContact => Field::Contact,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderForm {
    pub description: String,
    pub contact: String,
}

impl OrderForm {
    pub fn new(description: impl Into<String>, contact: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            contact: contact.into(),
        }
    }

    /// Description first, then contact. The length check counts the raw
    /// text in UTF-16 code units, surrounding whitespace included; blank text
    /// never passes.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.description.trim().is_empty()
            || self.description.encode_utf16().count() < MIN_DESCRIPTION_CHARS
        {
            return Err(ValidationError::DescriptionTooShort);
        }
        if self.contact.trim().is_empty() {
            return Err(ValidationError::MissingContact);
        }
        Ok(())
    }
}

/// What gets forwarded to the host once an order is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPayload {
    pub service: Option<SelectedService>,
    pub description: String,
    pub contact: String,
    /// ISO 8601 with millisecond precision and a `Z` suffix.
    #[serde(serialize_with = "serialize_millis")]
    pub timestamp: DateTime<Utc>,
}

fn serialize_millis<S: Serializer>(
    timestamp: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
}

impl OrderPayload {
    pub fn new(form: OrderForm, service: Option<SelectedService>, timestamp: DateTime<Utc>) -> Self {
        Self {
            service,
            description: form.description,
            contact: form.contact,
            timestamp,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Submission lifecycle. While `Sending`, further submits are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Sending(OrderForm),
}

impl SubmitState {
    pub fn is_sending(&self) -> bool {
        matches!(self, SubmitState::Sending(_))
    }
}

/// Formats a price the way ru-RU locales do: `45 000 ₽` with no-break spaces
/// between digit groups.
pub fn format_rub(price: u64) -> String {
    let digits = price.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 * 2);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('\u{a0}');
        }
        grouped.push(c);
    }
    format!("{grouped} ₽")
}
