//! # User Interface Module
//!
//! Dear ImGui overlay for the editor.
//!
//! ## Key Components
//!
//! - [`UiManager`] - ImGui integration with winit and wgpu, input capture
//! - [`mode_panel`] - Transform mode entries and the snap checkbox
//! - [`ModeIndicator`] - Mode display fed by the selection controller
//!
//! ## Input Handling
//!
//! Pointer events over a panel and keyboard events while a widget has focus are
//! captured by the UI and never reach the editor. While a text field is being
//! edited, mode shortcuts are suppressed.

pub mod manager;
pub mod panel;

// Re-export main types
pub use manager::UiManager;
pub use panel::{mode_panel, ModeIndicator, UiAction};
