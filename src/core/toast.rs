//! # Toasts
//!
//! One transient notification at a time. A new toast replaces the old one
//! outright; ids keep a stale "hide" timer from removing its successor.

use std::time::Duration;

pub const TOAST_VISIBLE: Duration = Duration::from_millis(3000);
pub const TOAST_EXIT: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    /// Set while the exit animation plays.
    pub leaving: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Toasts {
    current: Option<Toast>,
    next_id: u64,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Toast> {
        self.current.as_ref()
    }

    /// Shows `message`, replacing whatever was up. Returns the new toast's id.
    pub fn show(&mut self, message: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.current = Some(Toast {
            id,
            message: message.into(),
            leaving: false,
        });
        id
    }

    pub fn begin_exit(&mut self, id: u64) -> bool {
        match self.current.as_mut() {
            Some(toast) if toast.id == id => {
                toast.leaving = true;
                true
            }
            _ => false,
        }
    }

    pub fn remove(&mut self, id: u64) -> bool {
        if self.current.as_ref().is_some_and(|t| t.id == id) {
            self.current = None;
            true
        } else {
            false
        }
    }
}
