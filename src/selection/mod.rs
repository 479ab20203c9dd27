//! # Selection & Transform
//!
//! The editor's core state machine: pointer picking, transform handle attachment,
//! per-mode axis constraints, snapping and keyboard mode switching.
//!
//! ## Key Components
//!
//! - [`SelectionController`] - Owns the gizmo and the selection state
//! - [`TransformMode`] / [`AxisVisibility`] - Mode and the axes it allows
//! - [`SnapSettings`] - Increments applied to handle drags
//! - [`ModeDisplay`] - Hook for whatever shows the active mode

pub mod controller;
pub mod mode;

pub use controller::{gizmo_handle_size, SelectionController};
pub use mode::{AxisVisibility, ModeDisplay, SnapSettings, TransformMode};
