// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Depth buffer, global camera bindings and the flat material types.

pub mod global_bindings;
pub mod material;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO};
pub use material::{Color, FlatMaterial, MeshUniform};
pub use texture_resource::TextureResource;
