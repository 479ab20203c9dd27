// src/lib.rs
//! Plane Editor
//!
//! A minimal top-down 3D scene editor built on wgpu and winit. Colored squares lie
//! on a ground plane; click one to select it and drag the transform handle to move,
//! rotate or scale it without ever leaving the plane.
//!
//! The editor core ([`Editor`]) runs without a window, which is how the integration
//! tests drive it. [`app::EditorApp`] adds the window, GPU renderer and UI.

pub mod app;
pub mod config;
pub mod editor;
pub mod error;
pub mod gfx;
pub mod host;
pub mod input;
pub mod selection;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::EditorApp;
pub use config::EditorConfig;
pub use editor::Editor;
pub use error::EditorError;
