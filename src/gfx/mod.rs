//! # Graphics Module
//!
//! Camera rig, scene graph, picking, the transform handle and the wgpu renderer.
//!
//! ## Architecture Overview
//!
//! - **Camera System** ([`camera`]) - Top-down orthographic camera with pan/zoom controls
//! - **Scene Management** ([`scene`]) - Node arena, editor objects and vertex formats
//! - **Geometry** ([`geometry`]) - Procedural plane generation
//! - **Picking** ([`picking`]) - Rays from the pointer and ray/mesh intersection
//! - **Gizmos** ([`gizmos`]) - The transform handle
//! - **Rendering Pipeline** ([`rendering`]) - Flat mesh pass plus line overlay
//! - **Resource Management** ([`resources`]) - Materials, depth buffer and global bindings
//!
//! Everything except [`rendering`] works without a GPU.

pub mod camera;
pub mod geometry;
pub mod gizmos;
pub mod picking;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::OrthoCamera;
pub use rendering::render_engine::RenderEngine;
