use log::{debug, info};
use winit::keyboard::Key;

use super::mode::{AxisVisibility, ModeDisplay, SnapSettings, TransformMode};
use crate::{
    config::SnapIncrements,
    gfx::{
        camera::OrthoCamera,
        gizmos::{GizmoEvent, TransformGizmo},
        picking::Raycaster,
        scene::{vertex::LineVertex, ObjectId, ObjectRegistry, Scene},
    },
    host::SceneHost,
    input::{KeyboardFocus, ListenerKind, ListenerSet, PointerEvent, Shortcut, Subscription},
};

/// Fraction of the visible view height covered by one gizmo handle
const GIZMO_VIEW_FRACTION: f32 = 0.125;

/// World-space handle length for the current camera zoom
pub fn gizmo_handle_size(camera: &OrthoCamera) -> f32 {
    camera.visible_extent().1 * GIZMO_VIEW_FRACTION
}

/// Picking, transform handle lifecycle, axis constraints, snapping and mode shortcuts
///
/// The controller never owns objects. It records the selected [`ObjectId`] and attaches
/// the gizmo to that object's root node; the scene and the registry are passed in by
/// the caller for every operation that needs them.
pub struct SelectionController {
    gizmo: TransformGizmo,
    raycaster: Raycaster,
    mode: TransformMode,
    selected: Option<ObjectId>,
    snap_enabled: bool,
    snap_increments: SnapIncrements,
    dragging_gizmo: bool,
    listeners: ListenerSet,
    subscriptions: Vec<Subscription>,
    mode_display: Option<Box<dyn ModeDisplay>>,
}

impl SelectionController {
    pub fn new(snap_increments: SnapIncrements) -> Self {
        let mut listeners = ListenerSet::new();
        let subscriptions = [
            ListenerKind::DraggingChanged,
            ListenerKind::ObjectChange,
            ListenerKind::PointerDown,
            ListenerKind::KeyDown,
        ]
        .into_iter()
        .map(|kind| listeners.subscribe(kind))
        .collect();

        let mut controller = Self {
            gizmo: TransformGizmo::new(),
            raycaster: Raycaster::new(),
            mode: TransformMode::Translate,
            selected: None,
            snap_enabled: false,
            snap_increments,
            dragging_gizmo: false,
            listeners,
            subscriptions,
            mode_display: None,
        };
        controller.set_mode(TransformMode::Translate);
        controller
    }

    /// Install the mode display and bring it up to date
    pub fn set_mode_display(&mut self, mut display: Box<dyn ModeDisplay>) {
        display.update_mode_display(self.mode);
        self.mode_display = Some(display);
    }

    pub fn set_mode(&mut self, mode: TransformMode) {
        self.mode = mode;
        self.gizmo.set_mode(mode.into());

        let axes = AxisVisibility::for_mode(mode);
        self.gizmo.show_x = axes.x;
        self.gizmo.show_y = axes.y;
        self.gizmo.show_z = axes.z;

        if let Some(display) = self.mode_display.as_mut() {
            display.update_mode_display(mode);
        }
        debug!("Transform mode set to {}", mode.label());
    }

    /// Turn snapping on with the configured increments, or off entirely
    pub fn toggle_snap(&mut self, enabled: bool) {
        self.snap_enabled = enabled;
        let snap = if enabled {
            SnapSettings::enabled(&self.snap_increments)
        } else {
            SnapSettings::disabled()
        };
        self.gizmo.set_translation_snap(snap.translation);
        self.gizmo.set_rotation_snap(snap.rotation);
        self.gizmo.set_scale_snap(snap.scale);
        info!("Snapping {}", if enabled { "enabled" } else { "disabled" });
    }

    /// Select the nearest object under the pointer, or deselect on a miss.
    /// Does nothing while the gizmo is being dragged.
    pub fn pick(&mut self, event: &PointerEvent, host: &SceneHost, registry: &ObjectRegistry) {
        if self.dragging_gizmo {
            return;
        }

        let surface = host.surface_rect();
        self.raycaster
            .set_from_pointer(event.client_x, event.client_y, &surface, host.camera());
        let hits = self
            .raycaster
            .intersect_objects(host.scene(), &registry.surfaces());

        let target = hits
            .first()
            .and_then(|hit| registry.resolve_surface(hit.node));
        self.select(target, host.scene(), registry);
    }

    /// Attach the gizmo to `object`'s root, or detach it when `None`
    pub fn select(&mut self, object: Option<ObjectId>, scene: &Scene, registry: &ObjectRegistry) {
        let root = object
            .and_then(|id| registry.get(id))
            .map(|o| o.root())
            .filter(|root| scene.node(*root).is_some());

        match (object, root) {
            (Some(id), Some(root)) => {
                self.selected = Some(id);
                self.gizmo.attach(root);
                debug!("Selected object {:?}", id);
            }
            _ => {
                if self.selected.take().is_some() {
                    debug!("Selection cleared");
                }
                self.gizmo.detach();
            }
        }
    }

    /// Mirror the gizmo drag flag and keep the camera out of the gesture
    pub fn on_handle_drag_state_change(&mut self, dragging: bool, host: &mut SceneHost) {
        self.dragging_gizmo = dragging;
        host.controls_mut().set_enabled(!dragging);
    }

    /// Keep the attached object on the ground plane with unit vertical scale
    pub fn on_handle_object_change(&mut self, scene: &mut Scene) {
        let Some(node) = self.gizmo.object().and_then(|id| scene.node_mut(id)) else {
            return;
        };
        node.transform.position.y = 0.0;
        node.transform.scale.y = 1.0;
    }

    /// Mode shortcuts and Escape to deselect. Ignored while a text field has focus.
    pub fn on_key_down(
        &mut self,
        key: &Key,
        focus: KeyboardFocus,
        scene: &Scene,
        registry: &ObjectRegistry,
    ) {
        if !self.listeners.is_listening(ListenerKind::KeyDown) || focus == KeyboardFocus::TextEntry {
            return;
        }
        match Shortcut::from_key(key) {
            Some(Shortcut::Translate) => self.set_mode(TransformMode::Translate),
            Some(Shortcut::Rotate) => self.set_mode(TransformMode::Rotate),
            Some(Shortcut::Scale) => self.set_mode(TransformMode::Scale),
            Some(Shortcut::Deselect) => self.select(None, scene, registry),
            None => {}
        }
    }

    /// Offer a primary press to the gizmo. Must run before the camera controls see the
    /// press so a handle grab can switch them off first.
    pub fn handle_pointer_down(&mut self, event: &PointerEvent, host: &mut SceneHost) {
        if !event.is_primary() {
            return;
        }
        let Some(ray) = self.ray_at(event.client_x, event.client_y, host) else {
            return;
        };
        let size = gizmo_handle_size(host.camera());
        let events = self.gizmo.pointer_down(&ray, host.scene(), size);
        self.dispatch(events, host);
    }

    /// Pointer-down listener: any button picks unless the subscription has been released
    pub fn on_pointer_down(&mut self, event: &PointerEvent, host: &SceneHost, registry: &ObjectRegistry) {
        if !self.listeners.is_listening(ListenerKind::PointerDown) {
            return;
        }
        self.pick(event, host, registry);
    }

    pub fn handle_pointer_move(&mut self, client_x: f32, client_y: f32, host: &mut SceneHost) {
        if !self.gizmo.is_visible() && !self.gizmo.is_dragging() {
            return;
        }
        let Some(ray) = self.ray_at(client_x, client_y, host) else {
            return;
        };
        let size = gizmo_handle_size(host.camera());
        let events = self.gizmo.pointer_move(&ray, host.scene_mut(), size);
        self.dispatch(events, host);
    }

    pub fn handle_pointer_up(&mut self, host: &mut SceneHost) {
        let events = self.gizmo.pointer_up();
        self.dispatch(events, host);
    }

    fn ray_at(&mut self, client_x: f32, client_y: f32, host: &SceneHost) -> Option<crate::gfx::picking::Ray> {
        let surface = host.surface_rect();
        self.raycaster
            .set_from_pointer(client_x, client_y, &surface, host.camera())
    }

    fn dispatch(&mut self, events: Vec<GizmoEvent>, host: &mut SceneHost) {
        for event in events {
            match event {
                GizmoEvent::DraggingChanged(dragging)
                    if self.listeners.is_listening(ListenerKind::DraggingChanged) =>
                {
                    self.on_handle_drag_state_change(dragging, host);
                }
                GizmoEvent::ObjectChange if self.listeners.is_listening(ListenerKind::ObjectChange) => {
                    self.on_handle_object_change(host.scene_mut());
                }
                _ => {}
            }
        }
    }

    /// Release every event subscription. Selection, mode and snap state are kept.
    /// Calling this again has no effect.
    pub fn teardown(&mut self) {
        let mut released = 0;
        for subscription in self.subscriptions.drain(..) {
            if self.listeners.unsubscribe(subscription) {
                released += 1;
            }
        }
        if released > 0 {
            info!("Selection controller released {} subscriptions", released);
        }
    }

    /// Overlay geometry of the gizmo for this frame
    pub fn gizmo_lines(&self, host: &SceneHost) -> Vec<LineVertex> {
        self.gizmo
            .line_vertices(host.scene(), gizmo_handle_size(host.camera()))
    }

    pub fn mode(&self) -> TransformMode {
        self.mode
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    pub fn is_snap_enabled(&self) -> bool {
        self.snap_enabled
    }

    pub fn is_dragging_gizmo(&self) -> bool {
        self.dragging_gizmo
    }

    pub fn gizmo(&self) -> &TransformGizmo {
        &self.gizmo
    }

    /// Axis handles currently enabled on the gizmo
    pub fn axis_visibility(&self) -> AxisVisibility {
        AxisVisibility {
            x: self.gizmo.show_x,
            y: self.gizmo.show_y,
            z: self.gizmo.show_z,
        }
    }

    /// Snap increments currently applied by the gizmo
    pub fn snap_settings(&self) -> SnapSettings {
        SnapSettings {
            translation: self.gizmo.translation_snap(),
            rotation: self.gizmo.rotation_snap(),
            scale: self.gizmo.scale_snap(),
        }
    }

    pub fn is_listening(&self, kind: ListenerKind) -> bool {
        self.listeners.is_listening(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::EditorConfig,
        gfx::{resources::material::Color, scene::SceneObject},
    };
    use std::{cell::RefCell, rc::Rc};
    use winit::keyboard::NamedKey;

    struct Recorder(Rc<RefCell<Vec<TransformMode>>>);

    impl ModeDisplay for Recorder {
        fn update_mode_display(&mut self, mode: TransformMode) {
            self.0.borrow_mut().push(mode);
        }
    }

    fn world() -> (SceneHost, ObjectRegistry, Vec<ObjectId>) {
        let mut host = SceneHost::headless(800, 600, &EditorConfig::default());
        let mut registry = ObjectRegistry::new();
        let ids = [0.0, 10.0, 20.0]
            .into_iter()
            .map(|x| {
                let object = SceneObject::new(host.scene_mut(), x, 0.0, Color::WHITE);
                host.add(object.root());
                registry.register(object)
            })
            .collect();
        (host, registry, ids)
    }

    #[test]
    fn test_initial_state() {
        let controller = SelectionController::new(SnapIncrements::default());
        assert_eq!(controller.mode(), TransformMode::Translate);
        assert_eq!(controller.selected(), None);
        assert!(!controller.is_snap_enabled());
        assert!(!controller.is_dragging_gizmo());
        assert_eq!(
            controller.axis_visibility(),
            AxisVisibility::for_mode(TransformMode::Translate)
        );
        assert!(controller.snap_settings().is_free());
    }

    #[test]
    fn test_select_replaces_attachment() {
        let (host, registry, ids) = world();
        let mut controller = SelectionController::new(SnapIncrements::default());

        controller.select(Some(ids[0]), host.scene(), &registry);
        controller.select(Some(ids[2]), host.scene(), &registry);

        assert_eq!(controller.selected(), Some(ids[2]));
        assert_eq!(controller.gizmo().object(), registry.get(ids[2]).map(|o| o.root()));

        controller.select(None, host.scene(), &registry);
        assert_eq!(controller.selected(), None);
        assert!(!controller.gizmo().is_visible());
    }

    #[test]
    fn test_pick_hits_middle_object() {
        let (host, registry, ids) = world();
        let mut controller = SelectionController::new(SnapIncrements::default());

        controller.pick(&PointerEvent::primary(500.0, 300.0), &host, &registry);
        assert_eq!(controller.selected(), Some(ids[1]));

        controller.pick(&PointerEvent::primary(400.0, 50.0), &host, &registry);
        assert_eq!(controller.selected(), None);
    }

    #[test]
    fn test_drag_flag_blocks_pick_and_camera() {
        let (mut host, registry, ids) = world();
        let mut controller = SelectionController::new(SnapIncrements::default());
        controller.select(Some(ids[0]), host.scene(), &registry);

        controller.on_handle_drag_state_change(true, &mut host);
        assert!(!host.controls().enabled);

        controller.pick(&PointerEvent::primary(500.0, 300.0), &host, &registry);
        assert_eq!(controller.selected(), Some(ids[0]));

        controller.on_handle_drag_state_change(false, &mut host);
        assert!(host.controls().enabled);
    }

    #[test]
    fn test_object_change_restores_ground_plane() {
        let (mut host, registry, ids) = world();
        let mut controller = SelectionController::new(SnapIncrements::default());
        controller.select(Some(ids[1]), host.scene(), &registry);

        let root = registry.get(ids[1]).unwrap().root();
        {
            let node = host.scene_mut().node_mut(root).unwrap();
            node.transform.position.y = 3.5;
            node.transform.scale.y = 2.0;
            node.transform.scale.x = 1.5;
        }
        controller.on_handle_object_change(host.scene_mut());

        let transform = host.scene().node(root).unwrap().transform;
        assert_eq!(transform.position.y, 0.0);
        assert_eq!(transform.scale.y, 1.0);
        assert_eq!(transform.scale.x, 1.5);
    }

    #[test]
    fn test_keys_and_text_focus() {
        let (host, registry, ids) = world();
        let mut controller = SelectionController::new(SnapIncrements::default());
        let seen = Rc::new(RefCell::new(Vec::new()));
        controller.set_mode_display(Box::new(Recorder(seen.clone())));

        controller.on_key_down(&Key::Character("R".into()), KeyboardFocus::Viewport, host.scene(), &registry);
        assert_eq!(controller.mode(), TransformMode::Rotate);

        controller.on_key_down(&Key::Character("s".into()), KeyboardFocus::TextEntry, host.scene(), &registry);
        assert_eq!(controller.mode(), TransformMode::Rotate);

        controller.select(Some(ids[0]), host.scene(), &registry);
        controller.on_key_down(&Key::Named(NamedKey::Escape), KeyboardFocus::Viewport, host.scene(), &registry);
        assert_eq!(controller.selected(), None);

        assert_eq!(
            *seen.borrow(),
            vec![TransformMode::Translate, TransformMode::Rotate]
        );
    }

    #[test]
    fn test_toggle_snap_round_trip() {
        let mut controller = SelectionController::new(SnapIncrements::default());
        controller.toggle_snap(true);
        let once = controller.snap_settings();
        controller.toggle_snap(true);
        assert_eq!(controller.snap_settings(), once);
        assert_eq!(once, SnapSettings::enabled(&SnapIncrements::default()));

        controller.toggle_snap(false);
        assert!(controller.snap_settings().is_free());
        assert!(!controller.is_snap_enabled());
    }

    #[test]
    fn test_teardown_keeps_state_and_is_idempotent() {
        let (host, registry, ids) = world();
        let mut controller = SelectionController::new(SnapIncrements::default());
        controller.set_mode(TransformMode::Scale);
        controller.select(Some(ids[2]), host.scene(), &registry);

        controller.teardown();
        controller.teardown();

        assert_eq!(controller.mode(), TransformMode::Scale);
        assert_eq!(controller.selected(), Some(ids[2]));
        assert!(!controller.is_listening(ListenerKind::KeyDown));

        controller.on_key_down(&Key::Named(NamedKey::Escape), KeyboardFocus::Viewport, host.scene(), &registry);
        controller.on_pointer_down(&PointerEvent::primary(400.0, 50.0), &host, &registry);
        assert_eq!(controller.selected(), Some(ids[2]));
    }
}
