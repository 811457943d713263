//! # Host Platform
//!
//! The mini-app container (theme, haptics, outbound data) sits behind the
//! `HostBridge` trait. `Host` wraps an optional bridge so the rest of the
//! app never has to ask whether one exists: every call is a no-op without it.
//!
//! ```text
//!   Effect ──▶ Host ──▶ Option<Box<dyn HostBridge>>
//!                           │
//!                           ├── TerminalBridge (log + outbox file)
//!                           └── (tests) RecordingBridge
//! ```

pub mod bridge;
pub mod terminal;

pub use bridge::{BridgeError, HostBridge};
pub use terminal::TerminalBridge;

use log::{debug, info, warn};

use crate::core::action::Action;
use crate::core::config::Theme;
use crate::core::effect::Haptic;

/// Events the host pushes at the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    ThemeChanged,
    ViewportChanged { height: u16, stable_height: u16 },
}

pub struct Host {
    bridge: Option<Box<dyn HostBridge>>,
    haptics: bool,
}

impl Host {
    pub fn new(bridge: Option<Box<dyn HostBridge>>, haptics: bool) -> Self {
        Self { bridge, haptics }
    }

    /// No host at all, e.g. `--no-bridge`.
    pub fn detached() -> Self {
        Self::new(None, false)
    }

    pub fn is_available(&self) -> bool {
        self.bridge.is_some()
    }

    pub fn bridge(&self) -> Option<&dyn HostBridge> {
        self.bridge.as_deref()
    }

    /// Startup handshake: ready, closing confirmation, colors, expand.
    pub fn setup(&mut self, theme: &Theme) {
        let Some(bridge) = self.bridge.as_mut() else {
            info!("Host bridge not available");
            return;
        };

        info!("Connecting to host: {}", bridge.name());
        let mut steps = vec![bridge.ready()];
        if theme.closing_confirmation {
            steps.push(bridge.enable_closing_confirmation());
        }
        steps.push(bridge.set_header_color(&theme.header_color));
        steps.push(bridge.set_background_color(&theme.background_color));
        steps.push(bridge.expand());

        for result in steps {
            if let Err(e) = result {
                warn!("Host setup step failed: {}", e);
            }
        }
    }

    /// Fires a haptic. Failures are swallowed.
    pub fn haptic(&mut self, haptic: Haptic) {
        if !self.haptics {
            return;
        }
        let Some(bridge) = self.bridge.as_mut() else {
            return;
        };
        let result = match haptic {
            Haptic::Impact(style) => bridge.impact_occurred(style),
            Haptic::Notification(kind) => bridge.notification_occurred(kind),
        };
        if let Err(e) = result {
            debug!("Haptic ignored: {}", e);
        }
    }

    pub fn expand(&mut self) {
        if let Some(bridge) = self.bridge.as_mut()
            && let Err(e) = bridge.expand()
        {
            warn!("Expand failed: {}", e);
        }
    }

    /// Forwards a payload. Returns true if a bridge accepted it.
    pub fn send_data(&mut self, data: &str) -> bool {
        let Some(bridge) = self.bridge.as_mut() else {
            info!("No host bridge; payload dropped");
            return false;
        };
        match bridge.send_data(data) {
            Ok(()) => true,
            Err(e) => {
                warn!("send_data failed: {}", e);
                false
            }
        }
    }

    /// Maps a host event to the action it implies, if any.
    pub fn dispatch(&self, event: HostEvent) -> Option<Action> {
        match event {
            HostEvent::ThemeChanged => {
                debug!("Host theme changed");
                Some(Action::ThemeChanged)
            }
            HostEvent::ViewportChanged {
                height,
                stable_height,
            } => Some(Action::ViewportChanged {
                height,
                stable_height,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingBridge;

    #[test]
    fn test_detached_host_is_noop() {
        let mut host = Host::detached();
        host.setup(&Theme::default());
        host.haptic(Haptic::LIGHT);
        host.expand();
        assert!(!host.send_data("{}"));
        assert!(!host.is_available());
    }

    #[test]
    fn test_setup_sequence() {
        let (bridge, calls) = RecordingBridge::new();
        let mut host = Host::new(Some(Box::new(bridge)), true);
        host.setup(&Theme::default());
        assert_eq!(
            calls.borrow().as_slice(),
            [
                "ready",
                "enable_closing_confirmation",
                "set_header_color #F5F5F7",
                "set_background_color #F5F5F7",
                "expand",
            ]
        );
        assert!(host.bridge().unwrap().is_expanded());
    }

    #[test]
    fn test_setup_without_closing_confirmation() {
        let (bridge, calls) = RecordingBridge::new();
        let mut host = Host::new(Some(Box::new(bridge)), true);
        let theme = Theme {
            closing_confirmation: false,
            ..Theme::default()
        };
        host.setup(&theme);
        assert!(!calls.borrow().iter().any(|c| c == "enable_closing_confirmation"));
    }

    #[test]
    fn test_haptics() {
        let (bridge, calls) = RecordingBridge::new();
        let mut host = Host::new(Some(Box::new(bridge)), true);
        host.haptic(Haptic::SOFT);
        host.haptic(Haptic::ERROR);
        assert_eq!(calls.borrow().as_slice(), ["impact soft", "notification error"]);
    }

    #[test]
    fn test_haptics_disabled_by_config() {
        let (bridge, calls) = RecordingBridge::new();
        let mut host = Host::new(Some(Box::new(bridge)), false);
        host.haptic(Haptic::MEDIUM);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_haptic_errors_are_swallowed() {
        let (bridge, calls) = RecordingBridge::failing();
        let mut host = Host::new(Some(Box::new(bridge)), true);
        host.haptic(Haptic::LIGHT);
        assert!(!host.send_data("{}"));
        assert_eq!(calls.borrow().len(), 2);
    }

    #[test]
    fn test_send_data() {
        let (bridge, calls) = RecordingBridge::new();
        let mut host = Host::new(Some(Box::new(bridge)), true);
        assert!(host.send_data(r#"{"a":1}"#));
        assert_eq!(calls.borrow().as_slice(), [r#"send_data {"a":1}"#]);
    }

    #[test]
    fn test_dispatch() {
        let host = Host::detached();
        assert_eq!(host.dispatch(HostEvent::ThemeChanged), Some(Action::ThemeChanged));
        assert_eq!(
            host.dispatch(HostEvent::ViewportChanged { height: 10, stable_height: 40 }),
            Some(Action::ViewportChanged { height: 10, stable_height: 40 })
        );
    }
}
