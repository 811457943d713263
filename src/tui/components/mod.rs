//! # TUI Components
//!
//! UI components for the terminal site.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Receive all data as fields and render it:
//! - `TopBar`: back arrow and section title
//! - `TabBar`: bottom tab strip
//! - `ToastLine`: transient notification
//! - `TooltipOverlay`: glossary definition popup
//!
//! ### Stateful Components (Event-Driven)
//!
//! Persistent state lives in `TuiState`; a transient wrapper borrows it for
//! one frame:
//! - `SectionView` / `SectionViewState`: scrollable section content, layout
//!   cache, hit testing
//! - `FormField` / `OrderFormState`: order form inputs
//!
//! ## Props-Based Data Flow
//!
//! Components receive external data as props, never by reaching into `App`:
//!
//! ```rust,ignore
//! TopBar::new(app.nav.top_bar().title.clone(), accent).render(frame, area);
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── top_bar.rs       (back arrow + title)
//! ├── tab_bar.rs       (tab strip)
//! ├── toast.rs         (notification line)
//! ├── tooltip.rs       (glossary popup)
//! ├── section_view.rs  (scrolling content)
//! └── form_field/      (order form inputs)
//! ```

pub mod form_field;
pub mod section_view;
mod tab_bar;
mod toast;
mod tooltip;
mod top_bar;

pub use form_field::{FieldEvent, FormField, OrderFormState};
pub use section_view::{ScrollRequest, SectionView, SectionViewState};
pub use tab_bar::TabBar;
pub use toast::ToastLine;
pub use tooltip::TooltipOverlay;
pub use top_bar::TopBar;
