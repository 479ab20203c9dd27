//! Interactive transform handle.
//!
//! The gizmo attaches to one scene node and turns pointer rays into translate, rotate
//! or scale edits of that node's local transform. It does not own the node; every call
//! that reads or writes the transform is handed the [`Scene`].

use std::f32::consts::TAU;

use cgmath::{InnerSpace, Matrix4, Quaternion, Rad, Rotation3, SquareMatrix, Vector3};

use crate::gfx::{
    picking::Ray,
    scene::{vertex::LineVertex, NodeId, Scene},
};

/// Active operation of the gizmo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GizmoMode {
    #[default]
    Translate,
    Rotate,
    Scale,
}

/// A grabbable part of the gizmo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GizmoAxis {
    X,
    Y,
    Z,
    XY,
    XZ,
    YZ,
}

impl GizmoAxis {
    fn color(self) -> [f32; 4] {
        match self {
            GizmoAxis::X => [0.9, 0.2, 0.2, 1.0],
            GizmoAxis::Y => [0.2, 0.8, 0.2, 1.0],
            GizmoAxis::Z => [0.2, 0.4, 0.95, 1.0],
            GizmoAxis::XY => [0.9, 0.9, 0.2, 1.0],
            GizmoAxis::XZ => [0.9, 0.2, 0.9, 1.0],
            GizmoAxis::YZ => [0.2, 0.9, 0.9, 1.0],
        }
    }

    fn highlight_color() -> [f32; 4] {
        [1.0, 0.85, 0.0, 1.0]
    }

    /// Unit direction of a single axis handle
    fn direction(self) -> Option<Vector3<f32>> {
        match self {
            GizmoAxis::X => Some(Vector3::unit_x()),
            GizmoAxis::Y => Some(Vector3::unit_y()),
            GizmoAxis::Z => Some(Vector3::unit_z()),
            _ => None,
        }
    }

    /// Normal and in-plane axes of a plane handle
    fn plane(self) -> Option<(Vector3<f32>, Vector3<f32>, Vector3<f32>)> {
        match self {
            GizmoAxis::XY => Some((Vector3::unit_z(), Vector3::unit_x(), Vector3::unit_y())),
            GizmoAxis::XZ => Some((Vector3::unit_y(), Vector3::unit_x(), Vector3::unit_z())),
            GizmoAxis::YZ => Some((Vector3::unit_x(), Vector3::unit_y(), Vector3::unit_z())),
            _ => None,
        }
    }

    /// Which world components a drag on this handle may change
    fn mask(self) -> Vector3<f32> {
        match self {
            GizmoAxis::X => Vector3::new(1.0, 0.0, 0.0),
            GizmoAxis::Y => Vector3::new(0.0, 1.0, 0.0),
            GizmoAxis::Z => Vector3::new(0.0, 0.0, 1.0),
            GizmoAxis::XY => Vector3::new(1.0, 1.0, 0.0),
            GizmoAxis::XZ => Vector3::new(1.0, 0.0, 1.0),
            GizmoAxis::YZ => Vector3::new(0.0, 1.0, 1.0),
        }
    }
}

/// Notifications produced by pointer input on the gizmo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GizmoEvent {
    /// A drag started (`true`) or ended (`false`)
    DraggingChanged(bool),
    /// The attached node's transform was modified
    ObjectChange,
}

const PICK_RADIUS: f32 = 0.12;
const PLANE_OFFSET: f32 = 0.25;
const PLANE_SIZE: f32 = 0.3;
const ARROWHEAD: f32 = 0.15;
const RING_SEGMENTS: usize = 64;

#[derive(Debug, Clone, Copy)]
struct DragState {
    axis: GizmoAxis,
    plane_normal: Vector3<f32>,
    origin: Vector3<f32>,
    start_point: Vector3<f32>,
    start_position: Vector3<f32>,
    start_rotation: Quaternion<f32>,
    start_scale: Vector3<f32>,
    parent_inverse: Matrix4<f32>,
    handle_size: f32,
}

/// Translate/rotate/scale handle bound to at most one node
#[derive(Debug, Clone)]
pub struct TransformGizmo {
    mode: GizmoMode,
    pub show_x: bool,
    pub show_y: bool,
    pub show_z: bool,
    translation_snap: Option<f32>,
    rotation_snap: Option<f32>,
    scale_snap: Option<f32>,
    object: Option<NodeId>,
    hovered: Option<GizmoAxis>,
    drag: Option<DragState>,
}

impl Default for TransformGizmo {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformGizmo {
    pub fn new() -> Self {
        Self {
            mode: GizmoMode::Translate,
            show_x: true,
            show_y: true,
            show_z: true,
            translation_snap: None,
            rotation_snap: None,
            scale_snap: None,
            object: None,
            hovered: None,
            drag: None,
        }
    }

    /// Bind to `node`, replacing any previous attachment
    pub fn attach(&mut self, node: NodeId) {
        self.object = Some(node);
    }

    /// Unbind. A drag in progress still reports its end on the next pointer release.
    pub fn detach(&mut self) {
        self.object = None;
        self.hovered = None;
    }

    pub fn object(&self) -> Option<NodeId> {
        self.object
    }

    /// The gizmo is drawn and interactive only while attached
    pub fn is_visible(&self) -> bool {
        self.object.is_some()
    }

    pub fn mode(&self) -> GizmoMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: GizmoMode) {
        self.mode = mode;
    }

    pub fn set_translation_snap(&mut self, snap: Option<f32>) {
        self.translation_snap = snap;
    }

    pub fn set_rotation_snap(&mut self, snap: Option<f32>) {
        self.rotation_snap = snap;
    }

    pub fn set_scale_snap(&mut self, snap: Option<f32>) {
        self.scale_snap = snap;
    }

    pub fn translation_snap(&self) -> Option<f32> {
        self.translation_snap
    }

    pub fn rotation_snap(&self) -> Option<f32> {
        self.rotation_snap
    }

    pub fn scale_snap(&self) -> Option<f32> {
        self.scale_snap
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Active axis: the dragged one, otherwise the hovered one
    pub fn active_axis(&self) -> Option<GizmoAxis> {
        self.drag.map(|d| d.axis).or(self.hovered)
    }

    fn axis_shown(&self, axis: GizmoAxis) -> bool {
        match axis {
            GizmoAxis::X => self.show_x,
            GizmoAxis::Y => self.show_y,
            GizmoAxis::Z => self.show_z,
            GizmoAxis::XY => self.show_x && self.show_y,
            GizmoAxis::XZ => self.show_x && self.show_z,
            GizmoAxis::YZ => self.show_y && self.show_z,
        }
    }

    /// Handles that can currently be grabbed, in hit-test priority order
    pub fn visible_handles(&self) -> Vec<GizmoAxis> {
        let candidates: &[GizmoAxis] = match self.mode {
            GizmoMode::Translate | GizmoMode::Scale => &[
                GizmoAxis::XY,
                GizmoAxis::XZ,
                GizmoAxis::YZ,
                GizmoAxis::X,
                GizmoAxis::Y,
                GizmoAxis::Z,
            ],
            GizmoMode::Rotate => &[GizmoAxis::X, GizmoAxis::Y, GizmoAxis::Z],
        };
        candidates
            .iter()
            .copied()
            .filter(|axis| self.axis_shown(*axis))
            .collect()
    }

    /// Handle under the ray, if any
    pub fn hit_test(&self, ray: &Ray, scene: &Scene, handle_size: f32) -> Option<GizmoAxis> {
        let origin = scene.world_position(self.object?)?;
        let pick_radius = PICK_RADIUS * handle_size;

        let mut best: Option<(GizmoAxis, f32)> = None;
        for axis in self.visible_handles() {
            let distance = match (self.mode, axis.plane(), axis.direction()) {
                (GizmoMode::Rotate, _, Some(dir)) => {
                    ray_circle_distance(ray, origin, dir, handle_size)
                }
                (_, Some((normal, u, v)), _) => {
                    // plane handles win outright when hit
                    if hit_plane_handle(ray, origin, normal, u, v, handle_size) {
                        return Some(axis);
                    }
                    None
                }
                (_, _, Some(dir)) => ray_segment_distance(ray, origin, origin + dir * handle_size),
                _ => None,
            };

            if let Some(d) = distance.filter(|d| *d < pick_radius) {
                if best.map_or(true, |(_, best_d)| d < best_d) {
                    best = Some((axis, d));
                }
            }
        }
        best.map(|(axis, _)| axis)
    }

    /// Press: start a drag if the ray grabs a handle
    pub fn pointer_down(&mut self, ray: &Ray, scene: &Scene, handle_size: f32) -> Vec<GizmoEvent> {
        if self.drag.is_some() {
            return Vec::new();
        }
        let Some(node_id) = self.object else {
            return Vec::new();
        };
        let Some(axis) = self.hit_test(ray, scene, handle_size) else {
            return Vec::new();
        };
        let (Some(node), Some(origin)) = (scene.node(node_id), scene.world_position(node_id)) else {
            return Vec::new();
        };

        let plane_normal = drag_plane_normal(self.mode, axis, ray);
        let Some(t) = ray.intersect_plane(plane_normal, plane_normal.dot(origin)) else {
            return Vec::new();
        };

        let parent_inverse = node
            .parent()
            .and_then(|parent| scene.world_matrix(parent))
            .and_then(|m| m.invert())
            .unwrap_or_else(Matrix4::identity);

        self.drag = Some(DragState {
            axis,
            plane_normal,
            origin,
            start_point: ray.point_at(t),
            start_position: node.transform.position,
            start_rotation: node.transform.rotation,
            start_scale: node.transform.scale,
            parent_inverse,
            handle_size,
        });
        self.hovered = Some(axis);
        log::debug!("Gizmo drag started on {:?} in {:?} mode", axis, self.mode);

        vec![GizmoEvent::DraggingChanged(true)]
    }

    /// Move: update the attached node while dragging, otherwise track hover
    pub fn pointer_move(&mut self, ray: &Ray, scene: &mut Scene, handle_size: f32) -> Vec<GizmoEvent> {
        let Some(drag) = self.drag else {
            self.hovered = self.hit_test(ray, scene, handle_size);
            return Vec::new();
        };
        let Some(node_id) = self.object else {
            return Vec::new();
        };
        // a mode switch mid-drag can hide the grabbed handle
        if !self.visible_handles().contains(&drag.axis) {
            return Vec::new();
        }
        let Some(t) = ray.intersect_plane(drag.plane_normal, drag.plane_normal.dot(drag.origin)) else {
            return Vec::new();
        };
        let point = ray.point_at(t);

        let mode = self.mode;
        let (translation_snap, rotation_snap, scale_snap) =
            (self.translation_snap, self.rotation_snap, self.scale_snap);
        let Some(node) = scene.node_mut(node_id) else {
            return Vec::new();
        };

        match mode {
            GizmoMode::Translate => {
                let world_delta = mask(point - drag.start_point, drag.axis.mask());
                let local_delta = (drag.parent_inverse * world_delta.extend(0.0)).truncate();
                let mut position = drag.start_position + local_delta;
                if let Some(step) = translation_snap {
                    let m = drag.axis.mask();
                    position.x = if m.x > 0.0 { snap(position.x, step) } else { position.x };
                    position.y = if m.y > 0.0 { snap(position.y, step) } else { position.y };
                    position.z = if m.z > 0.0 { snap(position.z, step) } else { position.z };
                }
                node.transform.position = position;
            }
            GizmoMode::Rotate => {
                let Some(axis) = drag.axis.direction() else {
                    return Vec::new();
                };
                let mut angle = signed_angle(drag.start_point - drag.origin, point - drag.origin, axis);
                if let Some(step) = rotation_snap {
                    angle = snap(angle, step);
                }
                node.transform.rotation = Quaternion::from_axis_angle(axis, Rad(angle)) * drag.start_rotation;
            }
            GizmoMode::Scale => {
                let delta = point - drag.start_point;
                let m = drag.axis.mask();
                let stretch = |component: f32, start: f32, enabled: f32| -> f32 {
                    if enabled == 0.0 {
                        return start;
                    }
                    let scaled = start * (1.0 + component / drag.handle_size);
                    match scale_snap {
                        Some(step) => {
                            let snapped = snap(scaled, step);
                            if snapped == 0.0 {
                                step
                            } else {
                                snapped
                            }
                        }
                        None => scaled,
                    }
                };
                let uniform = match drag.axis {
                    GizmoAxis::XY => (delta.x + delta.y) / 2.0,
                    GizmoAxis::XZ => (delta.x + delta.z) / 2.0,
                    GizmoAxis::YZ => (delta.y + delta.z) / 2.0,
                    _ => 0.0,
                };
                let (dx, dy, dz) = if drag.axis.plane().is_some() {
                    (uniform, uniform, uniform)
                } else {
                    (delta.x, delta.y, delta.z)
                };
                node.transform.scale = Vector3::new(
                    stretch(dx, drag.start_scale.x, m.x),
                    stretch(dy, drag.start_scale.y, m.y),
                    stretch(dz, drag.start_scale.z, m.z),
                );
            }
        }
        log::trace!("Gizmo moved node {:?}", node_id);

        vec![GizmoEvent::ObjectChange]
    }

    /// Release: finish any drag in progress
    pub fn pointer_up(&mut self) -> Vec<GizmoEvent> {
        match self.drag.take() {
            Some(drag) => {
                log::debug!("Gizmo drag on {:?} finished", drag.axis);
                vec![GizmoEvent::DraggingChanged(false)]
            }
            None => Vec::new(),
        }
    }

    /// Overlay line list for the current mode, in world space
    pub fn line_vertices(&self, scene: &Scene, handle_size: f32) -> Vec<LineVertex> {
        let Some(origin) = self.object.and_then(|id| scene.world_position(id)) else {
            return Vec::new();
        };
        let active = self.active_axis();
        let color_of = |axis: GizmoAxis| {
            if active == Some(axis) {
                GizmoAxis::highlight_color()
            } else {
                axis.color()
            }
        };

        let mut lines = LineBuilder::default();
        for axis in self.visible_handles() {
            let color = color_of(axis);
            match (self.mode, axis.direction(), axis.plane()) {
                (GizmoMode::Rotate, Some(dir), _) => lines.ring(origin, dir, handle_size, color),
                (_, _, Some((_, u, v))) => {
                    let a = PLANE_OFFSET * handle_size;
                    let b = (PLANE_OFFSET + PLANE_SIZE) * handle_size;
                    lines.quad(
                        [
                            origin + u * a + v * a,
                            origin + u * b + v * a,
                            origin + u * b + v * b,
                            origin + u * a + v * b,
                        ],
                        color,
                    );
                }
                (GizmoMode::Translate, Some(dir), _) => {
                    let tip = origin + dir * handle_size;
                    lines.segment(origin, tip, color);
                    let side = perpendicular(dir) * (ARROWHEAD * handle_size * 0.5);
                    let back = tip - dir * (ARROWHEAD * handle_size);
                    lines.segment(tip, back + side, color);
                    lines.segment(tip, back - side, color);
                }
                (GizmoMode::Scale, Some(dir), _) => {
                    let tip = origin + dir * handle_size;
                    lines.segment(origin, tip, color);
                    let side = perpendicular(dir) * (ARROWHEAD * handle_size * 0.5);
                    let along = dir * (ARROWHEAD * handle_size * 0.5);
                    lines.quad(
                        [tip - along - side, tip + along - side, tip + along + side, tip - along + side],
                        color,
                    );
                }
                _ => {}
            }
        }
        lines.vertices
    }
}

#[derive(Default)]
struct LineBuilder {
    vertices: Vec<LineVertex>,
}

impl LineBuilder {
    fn segment(&mut self, a: Vector3<f32>, b: Vector3<f32>, color: [f32; 4]) {
        self.vertices.push(LineVertex::new(a.into(), color));
        self.vertices.push(LineVertex::new(b.into(), color));
    }

    fn quad(&mut self, corners: [Vector3<f32>; 4], color: [f32; 4]) {
        for i in 0..4 {
            self.segment(corners[i], corners[(i + 1) % 4], color);
        }
    }

    fn ring(&mut self, center: Vector3<f32>, normal: Vector3<f32>, radius: f32, color: [f32; 4]) {
        let u = perpendicular(normal);
        let v = normal.cross(u);
        let point = |i: usize| {
            let theta = i as f32 / RING_SEGMENTS as f32 * TAU;
            center + (u * theta.cos() + v * theta.sin()) * radius
        };
        for i in 0..RING_SEGMENTS {
            self.segment(point(i), point(i + 1), color);
        }
    }
}

/// Round to the nearest multiple of `step`
fn snap(value: f32, step: f32) -> f32 {
    if step <= 0.0 {
        return value;
    }
    (value / step).round() * step
}

fn mask(v: Vector3<f32>, m: Vector3<f32>) -> Vector3<f32> {
    Vector3::new(v.x * m.x, v.y * m.y, v.z * m.z)
}

/// A unit vector perpendicular to `v`
fn perpendicular(v: Vector3<f32>) -> Vector3<f32> {
    let helper = if v.y.abs() < 0.9 {
        Vector3::unit_y()
    } else {
        Vector3::unit_x()
    };
    v.cross(helper).normalize()
}

/// Angle from `from` to `to` around `axis`, counter-clockwise positive
fn signed_angle(from: Vector3<f32>, to: Vector3<f32>, axis: Vector3<f32>) -> f32 {
    let from = from - axis * from.dot(axis);
    let to = to - axis * to.dot(axis);
    if from.magnitude2() < 1e-8 || to.magnitude2() < 1e-8 {
        return 0.0;
    }
    let from = from.normalize();
    let to = to.normalize();
    let angle = from.dot(to).clamp(-1.0, 1.0).acos();
    if from.cross(to).dot(axis) < 0.0 {
        -angle
    } else {
        angle
    }
}

/// Plane the pointer is projected onto during a drag
fn drag_plane_normal(mode: GizmoMode, axis: GizmoAxis, ray: &Ray) -> Vector3<f32> {
    if let Some((normal, _, _)) = axis.plane() {
        return normal;
    }
    let Some(dir) = axis.direction() else {
        return -ray.direction;
    };
    if mode == GizmoMode::Rotate {
        return dir;
    }

    // of the two planes containing the axis, use the one facing the viewer most
    let [a, b] = match axis {
        GizmoAxis::X => [Vector3::unit_y(), Vector3::unit_z()],
        GizmoAxis::Y => [Vector3::unit_x(), Vector3::unit_z()],
        _ => [Vector3::unit_x(), Vector3::unit_y()],
    };
    if ray.direction.dot(a).abs() >= ray.direction.dot(b).abs() {
        a
    } else {
        b
    }
}

/// Closest distance between a ray and a segment
fn ray_segment_distance(ray: &Ray, p0: Vector3<f32>, p1: Vector3<f32>) -> Option<f32> {
    let u = ray.direction;
    let v = p1 - p0;
    let w = ray.origin - p0;

    let a = u.dot(u);
    let b = u.dot(v);
    let c = v.dot(v);
    let d = u.dot(w);
    let e = v.dot(w);

    let denom = a * c - b * b;
    if denom.abs() < 1e-8 {
        return None;
    }

    let s = ((b * e - c * d) / denom).max(0.0);
    let t = ((a * e - b * d) / denom).clamp(0.0, 1.0);

    Some((ray.point_at(s) - (p0 + v * t)).magnitude())
}

fn ray_circle_distance(ray: &Ray, center: Vector3<f32>, normal: Vector3<f32>, radius: f32) -> Option<f32> {
    let t = ray.intersect_plane(normal, normal.dot(center))?;
    Some(((ray.point_at(t) - center).magnitude() - radius).abs())
}

fn hit_plane_handle(
    ray: &Ray,
    origin: Vector3<f32>,
    normal: Vector3<f32>,
    u: Vector3<f32>,
    v: Vector3<f32>,
    handle_size: f32,
) -> bool {
    let Some(t) = ray.intersect_plane(normal, normal.dot(origin)) else {
        return false;
    };
    let local = ray.point_at(t) - origin;
    let range = PLANE_OFFSET * handle_size..=(PLANE_OFFSET + PLANE_SIZE) * handle_size;
    range.contains(&local.dot(u)) && range.contains(&local.dot(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{resources::material::Color, scene::SceneObject};
    use approx::assert_relative_eq;
    use cgmath::{Deg, Rotation};
    use std::f32::consts::PI;

    const SIZE: f32 = 8.0;

    fn down(x: f32, z: f32) -> Ray {
        Ray::new(Vector3::new(x, 100.0, z), -Vector3::unit_y())
    }

    fn setup(mode: GizmoMode) -> (Scene, NodeId, TransformGizmo) {
        let mut scene = Scene::new();
        let object = SceneObject::new(&mut scene, 0.0, 0.0, Color::WHITE);
        scene.add(object.root());

        let mut gizmo = TransformGizmo::new();
        gizmo.set_mode(mode);
        gizmo.show_y = mode == GizmoMode::Rotate;
        gizmo.show_x = mode != GizmoMode::Rotate;
        gizmo.show_z = mode != GizmoMode::Rotate;
        gizmo.attach(object.root());
        (scene, object.root(), gizmo)
    }

    #[test]
    fn test_detached_gizmo_ignores_pointer() {
        let (scene, _, mut gizmo) = setup(GizmoMode::Translate);
        gizmo.detach();

        assert!(gizmo.pointer_down(&down(5.0, 0.0), &scene, SIZE).is_empty());
        assert!(!gizmo.is_dragging());
        assert!(gizmo.line_vertices(&scene, SIZE).is_empty());
    }

    #[test]
    fn test_hit_test_respects_visible_handles() {
        let (scene, _, mut gizmo) = setup(GizmoMode::Translate);
        assert_eq!(gizmo.hit_test(&down(5.0, 0.2), &scene, SIZE), Some(GizmoAxis::X));
        assert_eq!(gizmo.hit_test(&down(0.2, 5.0), &scene, SIZE), Some(GizmoAxis::Z));
        assert_eq!(gizmo.hit_test(&down(3.0, 3.0), &scene, SIZE), Some(GizmoAxis::XZ));
        assert_eq!(gizmo.hit_test(&down(-5.0, -5.0), &scene, SIZE), None);

        gizmo.show_x = false;
        assert_eq!(gizmo.hit_test(&down(5.0, 0.2), &scene, SIZE), None);
        assert_eq!(gizmo.hit_test(&down(3.0, 3.0), &scene, SIZE), None);
    }

    #[test]
    fn test_translate_drag_is_constrained_to_axis() {
        let (mut scene, root, mut gizmo) = setup(GizmoMode::Translate);

        let events = gizmo.pointer_down(&down(5.0, 0.2), &scene, SIZE);
        assert_eq!(events, vec![GizmoEvent::DraggingChanged(true)]);

        let events = gizmo.pointer_move(&down(8.4, 3.0), &mut scene, SIZE);
        assert_eq!(events, vec![GizmoEvent::ObjectChange]);
        let position = scene.node(root).unwrap().transform.position;
        assert_relative_eq!(position, Vector3::new(3.4, 0.0, 0.0), epsilon = 1e-4);

        assert_eq!(gizmo.pointer_up(), vec![GizmoEvent::DraggingChanged(false)]);
        assert!(gizmo.pointer_up().is_empty());
    }

    #[test]
    fn test_translate_snaps_to_increment() {
        let (mut scene, root, mut gizmo) = setup(GizmoMode::Translate);
        gizmo.set_translation_snap(Some(1.0));

        gizmo.pointer_down(&down(3.0, 3.0), &scene, SIZE);
        gizmo.pointer_move(&down(5.4, 1.3), &mut scene, SIZE);

        let position = scene.node(root).unwrap().transform.position;
        assert_eq!(position, Vector3::new(2.0, 0.0, -2.0));
    }

    #[test]
    fn test_rotate_snaps_angle() {
        let (mut scene, root, mut gizmo) = setup(GizmoMode::Rotate);
        gizmo.set_rotation_snap(Some(PI / 8.0));

        gizmo.pointer_down(&down(SIZE, 0.0), &scene, SIZE);
        let (s, c) = Deg(30.0_f32).0.to_radians().sin_cos();
        gizmo.pointer_move(&down(SIZE * c, -SIZE * s), &mut scene, SIZE);

        let rotation = scene.node(root).unwrap().transform.rotation;
        let rotated = rotation.rotate_vector(Vector3::unit_x());
        let expected = Quaternion::from_angle_y(Rad(PI / 8.0)).rotate_vector(Vector3::unit_x());
        assert_relative_eq!(rotated, expected, epsilon = 1e-4);
    }

    #[test]
    fn test_scale_drag_and_zero_snap() {
        let (mut scene, root, mut gizmo) = setup(GizmoMode::Scale);

        gizmo.pointer_down(&down(6.0, 0.0), &scene, SIZE);
        gizmo.pointer_move(&down(10.0, 0.0), &mut scene, SIZE);
        let scale = scene.node(root).unwrap().transform.scale;
        assert_relative_eq!(scale, Vector3::new(1.5, 1.0, 1.0), epsilon = 1e-5);

        gizmo.set_scale_snap(Some(0.25));
        gizmo.pointer_move(&down(-2.0, 0.0), &mut scene, SIZE);
        assert_eq!(scene.node(root).unwrap().transform.scale.x, 0.25);
    }

    #[test]
    fn test_detach_mid_drag_still_reports_release() {
        let (mut scene, root, mut gizmo) = setup(GizmoMode::Translate);
        gizmo.pointer_down(&down(5.0, 0.0), &scene, SIZE);
        gizmo.detach();

        assert!(gizmo.pointer_move(&down(9.0, 0.0), &mut scene, SIZE).is_empty());
        assert_eq!(scene.node(root).unwrap().transform.position, Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(gizmo.pointer_up(), vec![GizmoEvent::DraggingChanged(false)]);
    }

    #[test]
    fn test_drag_on_handle_hidden_by_mode_switch_is_inert() {
        let (mut scene, root, mut gizmo) = setup(GizmoMode::Translate);
        let before = scene.node(root).unwrap().transform;
        gizmo.pointer_down(&down(5.0, 0.2), &scene, SIZE);

        // rotate mode only offers the vertical ring
        gizmo.set_mode(GizmoMode::Rotate);
        gizmo.show_x = false;
        gizmo.show_y = true;
        gizmo.show_z = false;

        assert!(gizmo.pointer_move(&down(5.0, -5.0), &mut scene, SIZE).is_empty());
        let after = scene.node(root).unwrap().transform;
        assert_eq!(after.rotation, before.rotation);
        assert_eq!(after.position, before.position);

        assert!(gizmo.is_dragging());
        assert_eq!(gizmo.pointer_up(), vec![GizmoEvent::DraggingChanged(false)]);
    }

    #[test]
    fn test_lines_follow_mode() {
        let (scene, _, mut gizmo) = setup(GizmoMode::Rotate);
        assert_eq!(gizmo.line_vertices(&scene, SIZE).len(), RING_SEGMENTS * 2);

        gizmo.set_mode(GizmoMode::Translate);
        gizmo.show_y = false;
        gizmo.show_x = true;
        gizmo.show_z = true;
        // two arrows of three segments plus the XZ square
        assert_eq!(gizmo.line_vertices(&scene, SIZE).len(), (3 + 3 + 4) * 2);
    }
}
