//! # Scene Management Module
//!
//! Scene graph, editor objects and vertex data structures.
//!
//! ## Key Components
//!
//! - [`Scene`] - Arena of nodes plus the list of roots that are drawn
//! - [`Node`] / [`Transform`] - Hierarchy entries with local TRS transforms
//! - [`SceneObject`] - A colored square lying on the ground plane
//! - [`ObjectRegistry`] - Owns editor objects and maps pickable surfaces back to them
//! - [`Vertex3D`] - GPU vertex format
//!
//! ## Usage
//!
//! ```rust
//! use plane_editor::gfx::resources::material::Color;
//! use plane_editor::gfx::scene::{ObjectRegistry, Scene, SceneObject};
//!
//! let mut scene = Scene::new();
//! let mut registry = ObjectRegistry::new();
//!
//! let object = SceneObject::new(&mut scene, 10.0, 0.0, Color::rgb(0.2, 0.4, 0.9));
//! scene.add(object.root());
//! let id = registry.register(object);
//! assert!(registry.get(id).is_some());
//! ```

pub mod node;
pub mod object;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use node::{DirectionalLight, MeshData, Node, NodeId, NodeKind, Transform};
pub use object::{ObjectId, ObjectRegistry, SceneObject};
pub use scene::Scene;
pub use vertex::Vertex3D;
