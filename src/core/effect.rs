//! # Effects
//!
//! `update()` never touches the terminal or the host. It returns `Effect`
//! values and the adapter carries them out. The core only asks; whether a
//! haptic actually buzzes or a payload actually leaves is the adapter's
//! business.

use crate::core::panel::PanelGroupKind;

/// Impact feedback strengths understood by the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactStyle {
    Light,
    Medium,
    Heavy,
    Rigid,
    Soft,
}

impl ImpactStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactStyle::Light => "light",
            ImpactStyle::Medium => "medium",
            ImpactStyle::Heavy => "heavy",
            ImpactStyle::Rigid => "rigid",
            ImpactStyle::Soft => "soft",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    Success,
    Error,
    Warning,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Success => "success",
            NotificationType::Error => "error",
            NotificationType::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Haptic {
    Impact(ImpactStyle),
    Notification(NotificationType),
}

impl Haptic {
    pub const LIGHT: Haptic = Haptic::Impact(ImpactStyle::Light);
    pub const MEDIUM: Haptic = Haptic::Impact(ImpactStyle::Medium);
    pub const SOFT: Haptic = Haptic::Impact(ImpactStyle::Soft);
    pub const SUCCESS: Haptic = Haptic::Notification(NotificationType::Success);
    pub const ERROR: Haptic = Haptic::Notification(NotificationType::Error);
}

/// Order form input fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Description,
    Contact,
}

/// Something on screen the adapter can scroll to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    Panel(PanelGroupKind, usize),
    About,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Haptic(Haptic),
    /// Ask the host to expand to full height.
    Expand,
    ScrollToTop,
    /// Best effort: only scroll if the anchor renders partly off-screen.
    ScrollIntoView(Anchor),
    Focus(Field),
    ResetOrderForm,
    /// JSON payload for the host's outbound data channel.
    SendData(String),
    Quit,
}
