//! # Procedural Geometry Generation
//!
//! Generates the primitive shapes used by the editor so no model files are needed.
//!
//! ## Usage
//!
//! ```rust
//! use plane_editor::gfx::geometry::generate_plane;
//!
//! // A 4x4 square in the XY plane, one quad
//! let plane = generate_plane(4.0, 4.0, 1, 1);
//! assert_eq!(plane.triangle_count(), 2);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::vertex::Vertex3D;

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            tex_coords: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate the triangles as vertex position triples
    pub fn triangles(&self) -> impl Iterator<Item = [[f32; 3]; 3]> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            [
                self.vertices[tri[0] as usize],
                self.vertices[tri[1] as usize],
                self.vertices[tri[2] as usize],
            ]
        })
    }

    /// Interleave into the vertex format used by the renderer
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        (0..self.vertices.len())
            .map(|i| Vertex3D {
                position: self.vertices[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0, 0.0, 1.0]),
            })
            .collect()
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new()
    }
}
