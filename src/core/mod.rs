//! # Core Application Logic
//!
//! This module contains Stratum's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • Effect (requests)    │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │ Vec<Effect>
//!                    ┌───────────┴───────────┐
//!                    ▼                       ▼
//!             ┌────────────┐          ┌────────────┐
//!             │    TUI     │          │    Host    │
//!             │  Adapter   │─────────▶│   Bridge   │
//!             │ (ratatui)  │          │ (haptics,  │
//!             └────────────┘          │  sendData) │
//!                                     └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and `update()`, the only mutation path
//! - [`effect`]: Side-effect requests handed to the adapter
//! - [`section`]: Section ids and the section table
//! - [`navigation`]: Current section, back stack, top bar, tab highlight
//! - [`panel`]: Exclusive-open panel groups (FAQ, service cards)
//! - [`order`]: Order form validation and payload
//! - [`schedule`]: Deferred work keyed by due time
//! - [`glossary`], [`counter`], [`toast`]: smaller presentation state
//! - [`catalog`]: Site content, built in or loaded from TOML
//! - [`config`]: `~/.stratum/config.toml` and override resolution

pub mod action;
pub mod catalog;
pub mod config;
pub mod counter;
pub mod effect;
pub mod glossary;
pub mod navigation;
pub mod order;
pub mod panel;
pub mod schedule;
pub mod section;
pub mod state;
pub mod toast;

// Re-export commonly used types for convenience
pub use action::{Action, update};
pub use effect::Effect;
pub use state::App;
