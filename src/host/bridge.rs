use std::fmt;

use crate::core::effect::{ImpactStyle, NotificationType};

/// Errors a host bridge can report.
#[derive(Debug)]
pub enum BridgeError {
    /// The host refused or does not support the call.
    Unsupported(&'static str),
    /// Writing to the host's outbound channel failed.
    Io(std::io::Error),
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::Unsupported(call) => write!(f, "host does not support {call}"),
            BridgeError::Io(e) => write!(f, "host I/O error: {e}"),
        }
    }
}

impl std::error::Error for BridgeError {}

impl From<std::io::Error> for BridgeError {
    fn from(e: std::io::Error) -> Self {
        BridgeError::Io(e)
    }
}

/// The mini-app container's API surface.
pub trait HostBridge {
    /// Returns the name of the host.
    fn name(&self) -> &str;

    fn ready(&mut self) -> Result<(), BridgeError>;

    /// Expands the container to full height.
    fn expand(&mut self) -> Result<(), BridgeError>;

    fn is_expanded(&self) -> bool;

    fn set_header_color(&mut self, color: &str) -> Result<(), BridgeError>;

    fn set_background_color(&mut self, color: &str) -> Result<(), BridgeError>;

    fn enable_closing_confirmation(&mut self) -> Result<(), BridgeError>;

    fn impact_occurred(&mut self, style: ImpactStyle) -> Result<(), BridgeError>;

    fn notification_occurred(&mut self, kind: NotificationType) -> Result<(), BridgeError>;

    /// Sends a payload to the bot that opened the mini-app.
    fn send_data(&mut self, data: &str) -> Result<(), BridgeError>;
}
