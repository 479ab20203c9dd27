//! Editor objects
//!
//! A [`SceneObject`] is a flat, colored square lying on the ground plane: a group node
//! positioned at `(x, 0, z)` holding a single pickable mesh. The [`ObjectRegistry`]
//! owns the objects and keeps the index from pickable surface back to owning object,
//! so a ray hit on a mesh node resolves to the logical object without tagging the node.

use std::collections::HashMap;

use cgmath::{Deg, Quaternion, Rotation3, Vector3};
use slotmap::{new_key_type, SlotMap};

use super::{
    node::{MeshData, Node, NodeId, NodeKind, Transform},
    scene::Scene,
};
use crate::gfx::{
    geometry::generate_plane,
    resources::material::{Color, FlatMaterial},
};

new_key_type! {
    /// Identity of an editor object
    pub struct ObjectId;
}

/// A placeable, colored square on the ground plane
#[derive(Debug, Clone)]
pub struct SceneObject {
    root: NodeId,
    surface: NodeId,
    color: Color,
}

impl SceneObject {
    /// Edge length of the square
    pub const SIZE: f32 = 4.0;

    /// Builds the object's nodes in `scene`. The tree stays detached until it is
    /// added to the scene.
    pub fn new(scene: &mut Scene, x: f32, z: f32, color: Color) -> Self {
        let surface_transform = Transform {
            // the plane is generated upright in XY; lay it flat with its normal up
            rotation: Quaternion::from_angle_x(Deg(-90.0)),
            ..Transform::default()
        };
        let surface = scene.create_node(
            Node::new(
                "surface",
                NodeKind::Mesh(MeshData {
                    geometry: generate_plane(Self::SIZE, Self::SIZE, 1, 1),
                    material: FlatMaterial::new(color).double_sided(),
                }),
            )
            .with_transform(surface_transform),
        );

        let root = scene.create_node(
            Node::group("object").with_transform(Transform::from_position(Vector3::new(x, 0.0, z))),
        );
        scene.add_child(root, surface);

        Self {
            root,
            surface,
            color,
        }
    }

    /// Visual root: inserted into the scene and attached to the transform handle
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The pickable mesh
    pub fn surface(&self) -> NodeId {
        self.surface
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

/// All editor objects plus the surface-to-object lookup used by picking
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    objects: SlotMap<ObjectId, SceneObject>,
    order: Vec<ObjectId>,
    by_surface: HashMap<NodeId, ObjectId>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, object: SceneObject) -> ObjectId {
        let surface = object.surface();
        let id = self.objects.insert(object);
        self.order.push(id);
        self.by_surface.insert(surface, id);
        id
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id)
    }

    /// Owning object of a pickable surface
    pub fn resolve_surface(&self, surface: NodeId) -> Option<ObjectId> {
        self.by_surface.get(&surface).copied()
    }

    /// Pickable surfaces of every object, in insertion order
    pub fn surfaces(&self) -> Vec<NodeId> {
        self.iter().map(|(_, object)| object.surface()).collect()
    }

    /// Objects in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> + '_ {
        self.order
            .iter()
            .filter_map(move |id| self.objects.get(*id).map(|o| (*id, o)))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
