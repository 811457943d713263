//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::catalog::Catalog;
use crate::core::effect::{ImpactStyle, NotificationType};
use crate::core::state::App;
use crate::host::bridge::{BridgeError, HostBridge};

/// Creates a test App with the built-in catalog.
pub fn test_app() -> App {
    match App::new(Catalog::stratum()) {
        Ok(app) => app,
        Err(e) => panic!("built-in catalog is invalid: {e}"),
    }
}

pub type CallLog = Rc<RefCell<Vec<String>>>;

/// A bridge that records every call as a string, e.g. `"impact soft"`.
pub struct RecordingBridge {
    calls: CallLog,
    expanded: bool,
    fail: bool,
}

impl RecordingBridge {
    pub fn new() -> (Self, CallLog) {
        let calls = CallLog::default();
        let bridge = Self {
            calls: Rc::clone(&calls),
            expanded: false,
            fail: false,
        };
        (bridge, calls)
    }

    /// Records calls but returns an error from each one.
    pub fn failing() -> (Self, CallLog) {
        let (mut bridge, calls) = Self::new();
        bridge.fail = true;
        (bridge, calls)
    }

    fn record(&mut self, call: String) -> Result<(), BridgeError> {
        self.calls.borrow_mut().push(call);
        if self.fail {
            Err(BridgeError::Unsupported("recording"))
        } else {
            Ok(())
        }
    }
}

impl HostBridge for RecordingBridge {
    fn name(&self) -> &str {
        "recording"
    }

    fn ready(&mut self) -> Result<(), BridgeError> {
        self.record("ready".into())
    }

    fn expand(&mut self) -> Result<(), BridgeError> {
        self.expanded = true;
        self.record("expand".into())
    }

    fn is_expanded(&self) -> bool {
        self.expanded
    }

    fn set_header_color(&mut self, color: &str) -> Result<(), BridgeError> {
        self.record(format!("set_header_color {color}"))
    }

    fn set_background_color(&mut self, color: &str) -> Result<(), BridgeError> {
        self.record(format!("set_background_color {color}"))
    }

    fn enable_closing_confirmation(&mut self) -> Result<(), BridgeError> {
        self.record("enable_closing_confirmation".into())
    }

    fn impact_occurred(&mut self, style: ImpactStyle) -> Result<(), BridgeError> {
        self.record(format!("impact {}", style.as_str()))
    }

    fn notification_occurred(&mut self, kind: NotificationType) -> Result<(), BridgeError> {
        self.record(format!("notification {}", kind.as_str()))
    }

    fn send_data(&mut self, data: &str) -> Result<(), BridgeError> {
        self.record(format!("send_data {data}"))
    }
}
