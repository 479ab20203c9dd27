//! # Object Picking
//!
//! Ray casting from the pointer into the scene.
//!
//! ## How it works
//!
//! 1. **Pointer to Ray**: the pointer position is converted to normalized device
//!    coordinates and unprojected through the camera
//! 2. **Broad phase**: each candidate mesh's bounds are tested in world space
//! 3. **Narrow phase**: the ray is tested against every triangle of the mesh
//! 4. **Ordering**: hits are returned nearest first
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::Vector3;
//! use plane_editor::gfx::picking::Ray;
//!
//! let ray = Ray::new(Vector3::new(0.0, 10.0, 0.0), Vector3::new(0.0, -1.0, 0.0));
//! assert_eq!(ray.intersect_plane(Vector3::unit_y(), 0.0), Some(10.0));
//! ```

use cgmath::{ElementWise, InnerSpace, Matrix4, Vector3, Vector4, Zero};

use crate::gfx::{
    camera::OrthoCamera,
    scene::{NodeId, Scene},
};
use crate::input::SurfaceRect;

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ray origin point in world space
    pub origin: Vector3<f32>,
    /// Ray direction (normalized)
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Create a new ray
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }

    /// Distance to the plane `dot(normal, p) = offset`, if hit in front of the origin
    pub fn intersect_plane(&self, normal: Vector3<f32>, offset: f32) -> Option<f32> {
        let denom = normal.dot(self.direction);
        if denom.abs() < 1e-6 {
            return None;
        }
        let t = (offset - normal.dot(self.origin)) / denom;
        (t >= 0.0).then_some(t)
    }
}

/// Moller-Trumbore ray/triangle test. Both faces count as hits.
pub fn ray_intersect_triangle(
    ray: &Ray,
    a: Vector3<f32>,
    b: Vector3<f32>,
    c: Vector3<f32>,
) -> Option<f32> {
    const EPSILON: f32 = 1e-7;

    let edge1 = b - a;
    let edge2 = c - a;
    let h = ray.direction.cross(edge2);
    let det = edge1.dot(h);
    if det.abs() < EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = ray.origin - a;
    let u = inv_det * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = inv_det * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = inv_det * edge2.dot(q);
    (t > EPSILON).then_some(t)
}

/// Axis-aligned bounding box for intersection testing
#[derive(Debug, Clone, Copy)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vector3<f32>,
    /// Maximum corner of the bounding box
    pub max: Vector3<f32>,
}

impl AABB {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Create AABB from a set of vertices
    pub fn from_vertices(vertices: &[[f32; 3]]) -> Self {
        let Some(first) = vertices.first() else {
            return Self::new(Vector3::zero(), Vector3::zero());
        };

        let mut min = Vector3::from(*first);
        let mut max = min;
        for vertex in vertices.iter().skip(1) {
            min.x = min.x.min(vertex[0]);
            min.y = min.y.min(vertex[1]);
            min.z = min.z.min(vertex[2]);
            max.x = max.x.max(vertex[0]);
            max.y = max.y.max(vertex[1]);
            max.z = max.z.max(vertex[2]);
        }

        Self::new(min, max)
    }

    /// Slab test. Flat boxes are padded slightly so rays parallel to a face still hit.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        const PAD: f32 = 1e-4;
        let min = self.min - Vector3::new(PAD, PAD, PAD);
        let max = self.max + Vector3::new(PAD, PAD, PAD);

        let inv_dir = Vector3::new(
            1.0 / ray.direction.x,
            1.0 / ray.direction.y,
            1.0 / ray.direction.z,
        );

        let t_min = (min - ray.origin).mul_element_wise(inv_dir);
        let t_max = (max - ray.origin).mul_element_wise(inv_dir);

        let t1 = Vector3::new(
            t_min.x.min(t_max.x),
            t_min.y.min(t_max.y),
            t_min.z.min(t_max.z),
        );
        let t2 = Vector3::new(
            t_min.x.max(t_max.x),
            t_min.y.max(t_max.y),
            t_min.z.max(t_max.z),
        );

        let t_near = t1.x.max(t1.y.max(t1.z));
        let t_far = t2.x.min(t2.y.min(t2.z));

        if t_near <= t_far && t_far >= 0.0 {
            Some(t_near.max(0.0))
        } else {
            None
        }
    }

    /// Bounds of the box after transformation by `matrix`
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        let corners = [
            Vector3::new(self.min.x, self.min.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.min.z),
            Vector3::new(self.min.x, self.max.y, self.min.z),
            Vector3::new(self.min.x, self.min.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.max.z),
            Vector3::new(self.min.x, self.max.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.max.z),
        ];

        let transformed: Vec<[f32; 3]> = corners
            .iter()
            .map(|corner| {
                let p = matrix * corner.extend(1.0);
                [p.x / p.w, p.y / p.w, p.z / p.w]
            })
            .collect();

        Self::from_vertices(&transformed)
    }
}

/// A ray hit on a mesh node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// The mesh node that was hit
    pub node: NodeId,
    /// Distance along the ray
    pub distance: f32,
    /// World space hit point
    pub point: Vector3<f32>,
}

/// Casts rays from the camera into the scene
#[derive(Debug, Clone, Copy, Default)]
pub struct Raycaster {
    ray: Option<Ray>,
}

impl Raycaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aim through a pointer position given in window client coordinates
    pub fn set_from_pointer(
        &mut self,
        client_x: f32,
        client_y: f32,
        surface: &SurfaceRect,
        camera: &OrthoCamera,
    ) -> Option<Ray> {
        self.ray = surface
            .to_ndc(client_x, client_y)
            .and_then(|(x, y)| camera.ray_from_ndc(x, y));
        self.ray
    }

    pub fn ray(&self) -> Option<Ray> {
        self.ray
    }

    /// Intersect the current ray with the given mesh nodes, nearest first.
    ///
    /// Only the listed nodes are tested; their children are not visited. Nodes that
    /// are not meshes, are hidden or are not part of the scene are skipped.
    pub fn intersect_objects(&self, scene: &Scene, nodes: &[NodeId]) -> Vec<Intersection> {
        let Some(ray) = self.ray else {
            return Vec::new();
        };

        let mut hits = Vec::new();
        for &node_id in nodes {
            if let Some(hit) = intersect_node(scene, node_id, &ray) {
                hits.push(hit);
            }
        }
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

fn intersect_node(scene: &Scene, node_id: NodeId, ray: &Ray) -> Option<Intersection> {
    let node = scene.node(node_id)?;
    let mesh = node.mesh()?;
    if !node.visible || !scene.is_attached(node_id) {
        return None;
    }

    let world = scene.world_matrix(node_id)?;
    AABB::from_vertices(&mesh.geometry.vertices)
        .transform(&world)
        .intersect_ray(ray)?;

    let to_world = |p: [f32; 3]| -> Vector3<f32> {
        let v: Vector4<f32> = world * Vector3::from(p).extend(1.0);
        v.truncate() / v.w
    };

    let distance = mesh
        .geometry
        .triangles()
        .filter_map(|[a, b, c]| ray_intersect_triangle(ray, to_world(a), to_world(b), to_world(c)))
        .min_by(|a, b| a.total_cmp(b))?;

    log::trace!("Ray hit node {:?} at distance {}", node_id, distance);
    Some(Intersection {
        node: node_id,
        distance,
        point: ray.point_at(distance),
    })
}
