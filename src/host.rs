//! Scene/render host
//!
//! [`SceneHost`] owns the scene graph, the top-down camera rig, the directional light
//! and (once a window exists) the GPU renderer. The app drives it once per display
//! frame through [`SceneHost::frame`]; [`SceneHost::teardown`] clears the running flag
//! so no frame is drawn after the host is released.

use cgmath::Vector3;
use log::{debug, error, info, trace};

use crate::{
    config::EditorConfig,
    gfx::{
        camera::{CameraManager, OrthoCamera, PanZoomController},
        rendering::RenderEngine,
        scene::{
            node::{DirectionalLight, Node, NodeId, NodeKind, Transform},
            vertex::LineVertex,
            Scene,
        },
    },
    input::{ListenerKind, ListenerSet, SurfaceRect},
};

/// Position of the scene light
pub const LIGHT_POSITION: [f32; 3] = [30.0, 60.0, 30.0];
pub const LIGHT_INTENSITY: f32 = 0.9;

pub struct SceneHost {
    scene: Scene,
    camera_manager: CameraManager,
    light: NodeId,
    surface: SurfaceRect,
    listeners: ListenerSet,
    running: bool,
    torn_down: bool,
    renderer: Option<RenderEngine>,
}

impl SceneHost {
    /// Builds the scene, camera, light and controls for a `width` x `height` surface.
    ///
    /// No GPU resources are created; frames only update the camera until a renderer
    /// is attached with [`attach_renderer`](Self::attach_renderer).
    pub fn headless(width: u32, height: u32, config: &EditorConfig) -> Self {
        let mut scene = Scene::new();

        let light = scene.create_node(
            Node::new(
                "sun",
                NodeKind::DirectionalLight(DirectionalLight {
                    color: [1.0, 1.0, 1.0],
                    intensity: LIGHT_INTENSITY,
                }),
            )
            .with_transform(Transform::from_position(Vector3::from(LIGHT_POSITION))),
        );
        scene.add(light);

        let aspect = if width > 0 && height > 0 {
            width as f32 / height as f32
        } else {
            1.0
        };
        let camera = OrthoCamera::new(&config.camera, aspect);
        let controller = PanZoomController::from_config(&config.camera);

        let mut listeners = ListenerSet::new();
        listeners.subscribe(ListenerKind::Resize);

        debug!("Scene host created for {}x{} surface", width, height);

        Self {
            scene,
            camera_manager: CameraManager::new(camera, controller),
            light,
            surface: SurfaceRect::from_size(width, height),
            listeners,
            running: true,
            torn_down: false,
            renderer: None,
        }
    }

    /// Hands the host a GPU renderer; subsequent frames draw to its surface
    pub fn attach_renderer(&mut self, renderer: RenderEngine) {
        if self.torn_down {
            return;
        }
        let (width, height) = renderer.get_surface_size();
        self.renderer = Some(renderer);
        self.on_resize(width, height);
    }

    /// Inserts a node tree into the drawn scene
    pub fn add(&mut self, root: NodeId) {
        self.scene.add(root);
    }

    /// Window resize notification: reproject the camera and resize the surface.
    ///
    /// Ignored after teardown and for zero sizes.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        if !self.listeners.is_listening(ListenerKind::Resize) || width == 0 || height == 0 {
            return;
        }
        self.camera_manager.camera.resize_projection(width, height);
        self.camera_manager.camera.update_view_proj();
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.resize(width, height);
        }
        self.surface = SurfaceRect::from_size(width, height);
        debug!("Surface resized to {}x{}", width, height);
    }

    /// One tick of the render loop: controls update, then draw.
    ///
    /// Returns whether the loop should keep running.
    pub fn frame<F>(&mut self, lines: &[LineVertex], ui_callback: Option<F>) -> bool
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        if !self.running {
            return false;
        }

        if self.camera_manager.update(&self.surface) {
            trace!("Camera moved");
        }

        let Some(renderer) = self.renderer.as_mut() else {
            return true;
        };
        renderer.update(self.camera_manager.camera.uniform);

        match renderer.render_frame(&self.scene, lines, ui_callback) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                debug!("Surface lost or outdated, reconfiguring");
                renderer.reconfigure();
            }
            Err(wgpu::SurfaceError::Timeout) => {
                trace!("Surface timeout, skipping frame");
            }
            Err(e) => {
                error!("Render loop stopped: {}", e);
                self.running = false;
            }
        }
        self.running
    }

    /// Stops the render loop and releases listeners, controls and the renderer.
    ///
    /// Calling it again has no effect.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.running = false;
        self.listeners.release_all();
        self.camera_manager.controller.dispose();
        self.renderer = None;
        info!("Scene host torn down");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn camera(&self) -> &OrthoCamera {
        &self.camera_manager.camera
    }

    pub fn controls(&self) -> &PanZoomController {
        &self.camera_manager.controller
    }

    pub fn controls_mut(&mut self) -> &mut PanZoomController {
        &mut self.camera_manager.controller
    }

    pub fn camera_manager(&self) -> &CameraManager {
        &self.camera_manager
    }

    pub fn light(&self) -> NodeId {
        self.light
    }

    /// Bounding rectangle of the render surface in client coordinates
    pub fn surface_rect(&self) -> SurfaceRect {
        self.surface
    }

    pub fn renderer(&self) -> Option<&RenderEngine> {
        self.renderer.as_ref()
    }
}

/// UI callback type for frames drawn without an overlay
pub type NoUi = fn(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use winit::event::MouseButton;

    fn host() -> SceneHost {
        SceneHost::headless(800, 600, &EditorConfig::default())
    }

    #[test]
    fn test_light_is_part_of_the_scene() {
        let host = host();
        let light = host.scene().node(host.light()).unwrap();

        assert!(matches!(
            light.kind,
            NodeKind::DirectionalLight(DirectionalLight { intensity, .. }) if intensity == LIGHT_INTENSITY
        ));
        assert_eq!(host.scene().world_position(host.light()), Some(Vector3::from(LIGHT_POSITION)));
        assert!(host.scene().is_attached(host.light()));
    }

    #[test]
    fn test_controls_pan_and_zoom_only() {
        let host = host();
        assert!(!host.controls().enable_rotate);
        assert!(host.controls().enable_pan);
        assert!(host.controls().enable_zoom);
        assert!(host.controls().screen_space_panning);
    }

    #[test]
    fn test_resize_reprojects_camera() {
        let mut host = host();
        host.on_resize(1000, 500);

        let camera = host.camera();
        assert_relative_eq!(camera.aspect, 2.0);
        assert_relative_eq!(camera.top - camera.bottom, 60.0);
        assert_relative_eq!(camera.right - camera.left, 120.0);
        assert_eq!(host.surface_rect(), SurfaceRect::from_size(1000, 500));

        host.on_resize(1000, 500);
        assert_relative_eq!(host.camera().aspect, 2.0);

        host.on_resize(0, 0);
        assert_relative_eq!(host.camera().aspect, 2.0);
    }

    #[test]
    fn test_frame_applies_pending_zoom() {
        let mut host = host();
        host.controls_mut().wheel(1.0);

        assert!(host.frame(&[], None::<NoUi>));
        assert!(host.camera().zoom > 1.0);
    }

    #[test]
    fn test_teardown_stops_loop_and_is_idempotent() {
        let mut host = host();
        host.teardown();
        host.teardown();

        assert!(!host.is_running());
        assert!(!host.frame(&[], None::<NoUi>));
        assert!(host.controls().is_disposed());
        assert!(!host.controls_mut().pointer_down(MouseButton::Right, 0.0, 0.0, false));

        host.on_resize(1000, 500);
        assert_relative_eq!(host.camera().aspect, 800.0 / 600.0);
    }
}
