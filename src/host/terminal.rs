//! Bridge used when the mini-app runs in a terminal.
//!
//! There is no phone to vibrate, so haptics become log lines. Outbound data
//! is appended to an outbox file, one JSON document per line.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::core::effect::{ImpactStyle, NotificationType};
use crate::host::bridge::{BridgeError, HostBridge};

pub struct TerminalBridge {
    outbox: PathBuf,
    expanded: bool,
    header_color: Option<String>,
    background_color: Option<String>,
    closing_confirmation: bool,
}

impl TerminalBridge {
    pub fn new(outbox: impl Into<PathBuf>) -> Self {
        Self {
            outbox: outbox.into(),
            expanded: false,
            header_color: None,
            background_color: None,
            closing_confirmation: false,
        }
    }

    pub fn outbox(&self) -> &Path {
        &self.outbox
    }

    pub fn header_color(&self) -> Option<&str> {
        self.header_color.as_deref()
    }

    pub fn background_color(&self) -> Option<&str> {
        self.background_color.as_deref()
    }

    pub fn closing_confirmation(&self) -> bool {
        self.closing_confirmation
    }
}

impl HostBridge for TerminalBridge {
    fn name(&self) -> &str {
        "terminal"
    }

    fn ready(&mut self) -> Result<(), BridgeError> {
        info!("Host ready (outbox: {})", self.outbox.display());
        Ok(())
    }

    fn expand(&mut self) -> Result<(), BridgeError> {
        self.expanded = true;
        Ok(())
    }

    fn is_expanded(&self) -> bool {
        self.expanded
    }

    fn set_header_color(&mut self, color: &str) -> Result<(), BridgeError> {
        self.header_color = Some(color.to_string());
        Ok(())
    }

    fn set_background_color(&mut self, color: &str) -> Result<(), BridgeError> {
        self.background_color = Some(color.to_string());
        Ok(())
    }

    fn enable_closing_confirmation(&mut self) -> Result<(), BridgeError> {
        self.closing_confirmation = true;
        Ok(())
    }

    fn impact_occurred(&mut self, style: ImpactStyle) -> Result<(), BridgeError> {
        debug!("Haptic impact: {}", style.as_str());
        Ok(())
    }

    fn notification_occurred(&mut self, kind: NotificationType) -> Result<(), BridgeError> {
        debug!("Haptic notification: {}", kind.as_str());
        Ok(())
    }

    fn send_data(&mut self, data: &str) -> Result<(), BridgeError> {
        if let Some(parent) = self.outbox.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.outbox)?;
        writeln!(file, "{}", data)?;
        info!("Wrote {} bytes to {}", data.len(), self.outbox.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_data_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("outbox.jsonl");
        let mut bridge = TerminalBridge::new(&path);

        bridge.send_data(r#"{"n":1}"#).unwrap();
        bridge.send_data(r#"{"n":2}"#).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines, vec![r#"{"n":1}"#, r#"{"n":2}"#]);
    }

    #[test]
    fn test_expand_and_colors() {
        let mut bridge = TerminalBridge::new("unused.jsonl");
        assert!(!bridge.is_expanded());
        bridge.expand().unwrap();
        bridge.set_header_color("#F5F5F7").unwrap();
        bridge.enable_closing_confirmation().unwrap();
        assert!(bridge.is_expanded());
        assert_eq!(bridge.header_color(), Some("#F5F5F7"));
        assert_eq!(bridge.background_color(), None);
        assert!(bridge.closing_confirmation());
    }

    #[test]
    fn test_send_data_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory can't be opened for appending.
        let mut bridge = TerminalBridge::new(dir.path());
        assert!(matches!(bridge.send_data("{}"), Err(BridgeError::Io(_))));
    }
}
