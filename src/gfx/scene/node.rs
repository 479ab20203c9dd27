//! Scene graph nodes
//!
//! Every node carries a local [`Transform`] relative to its parent and a [`NodeKind`]
//! describing what, if anything, it draws.

use cgmath::{Matrix4, One, Quaternion, Vector3};
use slotmap::new_key_type;

use crate::gfx::{geometry::GeometryData, resources::material::FlatMaterial};

new_key_type! {
    /// Stable handle of a node in a [`Scene`](super::Scene)
    pub struct NodeId;
}

/// Translation, rotation and scale of a node relative to its parent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Transform {
    pub fn from_position(position: Vector3<f32>) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Local matrix, applied as T * R * S
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from(self.rotation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

/// Drawable surface attached to a node
#[derive(Debug, Clone)]
pub struct MeshData {
    pub geometry: GeometryData,
    pub material: FlatMaterial,
}

/// Directional light parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Pure transform node grouping its children
    Group,
    Mesh(MeshData),
    DirectionalLight(DirectionalLight),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub kind: NodeKind,
    pub visible: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            kind,
            visible: true,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Group)
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn mesh(&self) -> Option<&MeshData> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }
}
