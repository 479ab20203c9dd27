//! # Input Module
//!
//! Window-system independent input types consumed by the editor core, and the
//! scoped listener set used to subscribe to and release editor events.
//!
//! The app layer translates winit events into these types, which keeps the selection
//! controller and the scene host drivable without a window (see the integration tests).

pub mod listeners;
pub mod pointer;
pub mod shortcut;

pub use listeners::{ListenerKind, ListenerSet, Subscription};
pub use pointer::{PointerEvent, SurfaceRect};
pub use shortcut::{KeyboardFocus, Shortcut};
