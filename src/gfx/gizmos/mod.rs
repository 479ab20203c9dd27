//! # Gizmo System
//!
//! On-screen manipulation handles.
//!
//! ## Key Components
//!
//! - [`TransformGizmo`] - Translate/rotate/scale handle bound to one scene node
//! - [`GizmoEvent`] - Drag state and object change notifications
//!
//! The gizmo has no GPU state of its own. Each frame the renderer asks it for a line
//! list ([`TransformGizmo::line_vertices`]) and draws it on top of the scene.
//!
//! ## Usage
//!
//! ```rust
//! use plane_editor::gfx::gizmos::{GizmoMode, TransformGizmo};
//!
//! let mut gizmo = TransformGizmo::new();
//! gizmo.set_mode(GizmoMode::Rotate);
//! gizmo.show_x = false;
//! gizmo.show_z = false;
//! assert!(!gizmo.is_visible());
//! ```

pub mod transform_gizmo;

pub use transform_gizmo::{GizmoAxis, GizmoEvent, GizmoMode, TransformGizmo};
