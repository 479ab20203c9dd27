use cgmath::{Matrix4, SquareMatrix, Vector3};
use slotmap::SlotMap;

use super::node::{MeshData, Node, NodeId};

/// Arena-backed scene graph
///
/// Nodes are created detached and become part of the rendered scene once their
/// top-most ancestor is added with [`Scene::add`].
pub struct Scene {
    nodes: SlotMap<NodeId, Node>,
    roots: Vec<NodeId>,
}

impl Scene {
    /// Creates an empty scene
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            roots: Vec::new(),
        }
    }

    /// Stores a detached node and returns its handle
    pub fn create_node(&mut self, node: Node) -> NodeId {
        self.nodes.insert(node)
    }

    /// Makes `child` a child of `parent`, detaching it from any previous parent.
    ///
    /// Returns false and leaves the graph unchanged if either node is missing or if
    /// `parent` lies inside `child`'s subtree, which would close a cycle.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.nodes.contains_key(parent) || self.is_ancestor_or_self(child, parent) {
            return false;
        }
        let old_parent = match self.nodes.get(child) {
            Some(node) => node.parent,
            None => return false,
        };
        if let Some(old) = old_parent.and_then(|id| self.nodes.get_mut(id)) {
            old.children.retain(|c| *c != child);
        }

        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }
        true
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if node_id == ancestor {
                return true;
            }
            current = self.nodes.get(node_id).and_then(|n| n.parent);
        }
        false
    }

    /// Inserts a node tree into the rendered scene.
    ///
    /// No duplicate check is made; adding the same root twice draws it twice.
    pub fn add(&mut self, root: NodeId) {
        if self.nodes.contains_key(root) {
            self.roots.push(root);
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Whether the node or one of its ancestors has been added to the scene
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if self.roots.contains(&node_id) {
                return true;
            }
            current = self.nodes.get(node_id).and_then(|n| n.parent);
        }
        false
    }

    /// World matrix of a node, composed from its ancestors
    pub fn world_matrix(&self, id: NodeId) -> Option<Matrix4<f32>> {
        let mut matrix = Matrix4::identity();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.nodes.get(node_id)?;
            matrix = node.transform.matrix() * matrix;
            current = node.parent;
        }
        Some(matrix)
    }

    pub fn world_position(&self, id: NodeId) -> Option<Vector3<f32>> {
        self.world_matrix(id).map(|m| m.w.truncate())
    }

    /// Visible mesh nodes reachable from the scene roots, with their world matrices
    pub fn visible_meshes(&self) -> Vec<(NodeId, Matrix4<f32>, &MeshData)> {
        let mut out = Vec::new();
        for root in &self.roots {
            self.collect_meshes(*root, Matrix4::identity(), &mut out);
        }
        out
    }

    fn collect_meshes<'a>(
        &'a self,
        id: NodeId,
        parent_matrix: Matrix4<f32>,
        out: &mut Vec<(NodeId, Matrix4<f32>, &'a MeshData)>,
    ) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if !node.visible {
            return;
        }

        let world = parent_matrix * node.transform.matrix();
        if let Some(mesh) = node.mesh() {
            out.push((id, world, mesh));
        }
        for child in &node.children {
            self.collect_meshes(*child, world, out);
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        geometry::generate_plane,
        resources::material::{Color, FlatMaterial},
        scene::node::{NodeKind, Transform},
    };

    fn mesh_node() -> Node {
        Node::new(
            "mesh",
            NodeKind::Mesh(MeshData {
                geometry: generate_plane(1.0, 1.0, 1, 1),
                material: FlatMaterial::new(Color::WHITE),
            }),
        )
    }

    #[test]
    fn test_world_matrix_composes_parents() {
        let mut scene = Scene::new();
        let parent = scene.create_node(
            Node::group("parent").with_transform(Transform::from_position(Vector3::new(5.0, 0.0, 0.0))),
        );
        let child = scene.create_node(
            Node::group("child").with_transform(Transform::from_position(Vector3::new(0.0, 0.0, 3.0))),
        );
        scene.add_child(parent, child);

        assert_eq!(scene.world_position(child), Some(Vector3::new(5.0, 0.0, 3.0)));
    }

    #[test]
    fn test_only_added_trees_are_drawn() {
        let mut scene = Scene::new();
        let root = scene.create_node(Node::group("root"));
        let mesh = scene.create_node(mesh_node());
        scene.add_child(root, mesh);
        let stray = scene.create_node(mesh_node());

        assert!(scene.visible_meshes().is_empty());
        assert!(!scene.is_attached(mesh));

        scene.add(root);
        let drawn: Vec<NodeId> = scene.visible_meshes().iter().map(|(id, _, _)| *id).collect();
        assert_eq!(drawn, vec![mesh]);
        assert!(scene.is_attached(mesh));
        assert!(!scene.is_attached(stray));
    }

    #[test]
    fn test_hidden_subtree_is_skipped() {
        let mut scene = Scene::new();
        let root = scene.create_node(Node::group("root"));
        let mesh = scene.create_node(mesh_node());
        scene.add_child(root, mesh);
        scene.add(root);

        scene.node_mut(root).unwrap().visible = false;
        assert!(scene.visible_meshes().is_empty());
    }

    #[test]
    fn test_reparenting_detaches_from_old_parent() {
        let mut scene = Scene::new();
        let a = scene.create_node(Node::group("a"));
        let b = scene.create_node(Node::group("b"));
        let child = scene.create_node(Node::group("child"));

        scene.add_child(a, child);
        scene.add_child(b, child);

        assert!(scene.node(a).unwrap().children().is_empty());
        assert_eq!(scene.node(b).unwrap().children(), &[child]);
        assert_eq!(scene.node(child).unwrap().parent(), Some(b));
    }

    #[test]
    fn test_add_child_rejects_cycles() {
        let mut scene = Scene::new();
        let a = scene.create_node(Node::group("a"));
        let b = scene.create_node(Node::group("b"));
        let c = scene.create_node(Node::group("c"));
        assert!(scene.add_child(a, b));
        assert!(scene.add_child(b, c));

        assert!(!scene.add_child(c, a));
        assert!(!scene.add_child(b, b));
        assert_eq!(scene.node(a).unwrap().parent(), None);
        assert!(scene.node(c).unwrap().children().is_empty());

        // both walks terminate
        scene.add(a);
        assert!(scene.is_attached(c));
        assert!(scene.world_matrix(c).is_some());
    }
}
