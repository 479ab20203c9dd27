//! Top-level coordinator
//!
//! [`Editor`] owns the scene host, the selection controller and the object registry,
//! and routes input to them in the order the interaction model depends on: the
//! transform handle sees a press before the camera controls, and picking runs last.

use log::{debug, info};
use winit::{event::MouseButton, keyboard::Key};

use crate::{
    config::{EditorConfig, ObjectSeed},
    error::EditorError,
    gfx::{
        resources::material::Color,
        scene::{vertex::LineVertex, ObjectId, ObjectRegistry, SceneObject},
    },
    host::SceneHost,
    input::{KeyboardFocus, PointerEvent},
    selection::{ModeDisplay, SelectionController, TransformMode},
};

pub struct Editor {
    host: SceneHost,
    selection: SelectionController,
    registry: ObjectRegistry,
    torn_down: bool,
}

impl Editor {
    /// Creates an editor without a window or GPU, sized like the configured window
    pub fn new(config: &EditorConfig) -> Self {
        Self::with_size(config.window.width, config.window.height, config)
    }

    /// Creates an editor for a `width` x `height` render surface
    pub fn with_size(width: u32, height: u32, config: &EditorConfig) -> Self {
        Self {
            host: SceneHost::headless(width, height, config),
            selection: SelectionController::new(config.snap),
            registry: ObjectRegistry::new(),
            torn_down: false,
        }
    }

    /// Adds every seed object. Fails on the first invalid color, leaving the objects
    /// added before it in place.
    pub fn seed(&mut self, seeds: &[ObjectSeed]) -> Result<Vec<ObjectId>, EditorError> {
        let mut ids = Vec::with_capacity(seeds.len());
        for seed in seeds {
            let color = Color::from_hex(&seed.color)?;
            ids.push(self.spawn(seed.x, seed.z, color));
        }
        info!("Seeded {} objects", ids.len());
        Ok(ids)
    }

    /// Inserts an object built against this editor's scene. Adding the same object
    /// twice is not checked.
    pub fn add(&mut self, object: SceneObject) -> ObjectId {
        self.host.add(object.root());
        let id = self.registry.register(object);
        debug!("Added object {:?}", id);
        id
    }

    /// Builds a colored square at `(x, 0, z)` and adds it
    pub fn spawn(&mut self, x: f32, z: f32, color: Color) -> ObjectId {
        let object = SceneObject::new(self.host.scene_mut(), x, z, color);
        self.add(object)
    }

    /// All registered objects, in insertion order
    pub fn objects(&self) -> Vec<ObjectId> {
        self.registry.iter().map(|(id, _)| id).collect()
    }

    pub fn pointer_down(&mut self, event: PointerEvent, shift: bool) {
        self.selection.handle_pointer_down(&event, &mut self.host);
        self.host
            .controls_mut()
            .pointer_down(event.button, event.client_x, event.client_y, shift);
        self.selection
            .on_pointer_down(&event, &self.host, &self.registry);
    }

    pub fn pointer_move(&mut self, client_x: f32, client_y: f32) {
        self.selection
            .handle_pointer_move(client_x, client_y, &mut self.host);
        self.host.controls_mut().pointer_move(client_x, client_y);
    }

    pub fn pointer_up(&mut self, button: MouseButton) {
        if button == MouseButton::Left {
            self.selection.handle_pointer_up(&mut self.host);
        }
        self.host.controls_mut().pointer_up();
    }

    /// Wheel input in lines; positive zooms in
    pub fn wheel(&mut self, lines: f32) {
        self.host.controls_mut().wheel(lines);
    }

    pub fn key_down(&mut self, key: &Key, focus: KeyboardFocus) {
        self.selection
            .on_key_down(key, focus, self.host.scene(), &self.registry);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.host.on_resize(width, height);
    }

    pub fn set_mode(&mut self, mode: TransformMode) {
        self.selection.set_mode(mode);
    }

    pub fn toggle_snap(&mut self, enabled: bool) {
        self.selection.toggle_snap(enabled);
    }

    pub fn set_mode_display(&mut self, display: Box<dyn ModeDisplay>) {
        self.selection.set_mode_display(display);
    }

    pub fn select(&mut self, object: Option<ObjectId>) {
        self.selection
            .select(object, self.host.scene(), &self.registry);
    }

    /// Transform handle overlay for the current frame
    pub fn overlay_lines(&self) -> Vec<LineVertex> {
        self.selection.gizmo_lines(&self.host)
    }

    /// One render loop tick. Returns whether the loop should keep running.
    pub fn frame<F>(&mut self, ui_callback: Option<F>) -> bool
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let lines = self.overlay_lines();
        self.host.frame(&lines, ui_callback)
    }

    /// Releases the controller's subscriptions and the host. Repeated calls do nothing.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.selection.teardown();
        self.host.teardown();
        info!("Editor torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn host(&self) -> &SceneHost {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut SceneHost {
        &mut self.host
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }
}
