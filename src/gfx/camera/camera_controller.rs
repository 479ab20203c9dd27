use cgmath::{InnerSpace, Vector2, Vector3, Zero};
use winit::event::MouseButton;

use super::ortho_camera::OrthoCamera;
use crate::{config::CameraConfig, input::SurfaceRect};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    Pan { last: Vector2<f32> },
}

/// Pan and zoom controls for the top-down camera
///
/// Input is accumulated between frames and applied to the camera in [`update`](Self::update).
/// Rotation is never performed; a primary drag without shift is left to the scene.
pub struct PanZoomController {
    pub enabled: bool,
    pub enable_rotate: bool,
    pub enable_pan: bool,
    pub enable_zoom: bool,
    /// Pan along the screen's up axis rather than the ground plane's
    pub screen_space_panning: bool,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    gesture: Gesture,
    pending_pan: Vector2<f32>,
    pending_zoom: f32,
    disposed: bool,
}

impl PanZoomController {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            enabled: true,
            enable_rotate: false,
            enable_pan: true,
            enable_zoom: true,
            screen_space_panning: true,
            zoom_speed: config.zoom_speed,
            pan_speed: config.pan_speed,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            gesture: Gesture::Idle,
            pending_pan: Vector2::zero(),
            pending_zoom: 1.0,
            disposed: false,
        }
    }

    fn accepts_input(&self) -> bool {
        self.enabled && !self.disposed
    }

    /// Returns true if the press started a camera gesture
    pub fn pointer_down(&mut self, button: MouseButton, x: f32, y: f32, shift: bool) -> bool {
        if !self.accepts_input() {
            return false;
        }

        let wants_pan = match button {
            MouseButton::Right => true,
            MouseButton::Left => shift,
            _ => false,
        };
        if wants_pan && self.enable_pan {
            self.gesture = Gesture::Pan {
                last: Vector2::new(x, y),
            };
            log::trace!("Camera pan started at ({x}, {y})");
            return true;
        }
        false
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if !self.accepts_input() {
            return;
        }
        if let Gesture::Pan { last } = &mut self.gesture {
            let current = Vector2::new(x, y);
            self.pending_pan += current - *last;
            *last = current;
        }
    }

    pub fn pointer_up(&mut self) {
        self.gesture = Gesture::Idle;
    }

    /// Wheel input in lines; positive values zoom in
    pub fn wheel(&mut self, lines: f32) {
        if !self.accepts_input() || !self.enable_zoom || lines == 0.0 {
            return;
        }
        let step = 0.95_f32.powf(self.zoom_speed);
        self.pending_zoom /= step.powf(lines);
    }

    /// Disabling cancels any gesture in progress
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.gesture = Gesture::Idle;
            self.pending_pan = Vector2::zero();
        }
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, Gesture::Pan { .. })
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Apply accumulated input to the camera. Returns true if the camera changed.
    pub fn update(&mut self, camera: &mut OrthoCamera, surface: &SurfaceRect) -> bool {
        if self.disposed {
            return false;
        }
        let mut changed = false;

        if self.pending_zoom != 1.0 {
            let zoom = (camera.zoom * self.pending_zoom).clamp(self.min_zoom, self.max_zoom);
            if zoom != camera.zoom {
                camera.zoom = zoom;
                changed = true;
            }
            self.pending_zoom = 1.0;
        }

        if self.pending_pan != Vector2::zero() && surface.width > 0.0 && surface.height > 0.0 {
            let (view_width, view_height) = camera.visible_extent();
            let dx = self.pending_pan.x * view_width / surface.width * self.pan_speed;
            let dy = self.pending_pan.y * view_height / surface.height * self.pan_speed;

            let right = camera.right_vector();
            let up = if self.screen_space_panning {
                camera.up_vector()
            } else {
                let up = camera.up_vector();
                let flat = Vector3::new(up.x, 0.0, up.z);
                if flat.magnitude2() > f32::EPSILON {
                    flat.normalize()
                } else {
                    up
                }
            };

            // drag right moves the view left so the ground follows the cursor
            let offset = -right * dx + up * dy;
            camera.eye += offset;
            camera.target += offset;
            changed = true;
        }
        self.pending_pan = Vector2::zero();

        changed
    }

    /// Stop listening for good
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.gesture = Gesture::Idle;
        self.pending_pan = Vector2::zero();
        self.pending_zoom = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rig() -> (OrthoCamera, PanZoomController, SurfaceRect) {
        let config = CameraConfig::default();
        (
            OrthoCamera::new(&config, 800.0 / 600.0),
            PanZoomController::from_config(&config),
            SurfaceRect::from_size(800, 600),
        )
    }

    #[test]
    fn test_primary_drag_without_shift_is_not_a_camera_gesture() {
        let (_, mut controls, _) = rig();
        assert!(!controls.pointer_down(MouseButton::Left, 10.0, 10.0, false));
        assert!(!controls.is_panning());
        assert!(controls.pointer_down(MouseButton::Left, 10.0, 10.0, true));
        assert!(controls.is_panning());
    }

    #[test]
    fn test_pan_follows_cursor() {
        let (mut camera, mut controls, surface) = rig();
        controls.pointer_down(MouseButton::Right, 400.0, 300.0, false);
        controls.pointer_move(500.0, 300.0);
        controls.pointer_up();

        assert!(controls.update(&mut camera, &surface));
        // 100px of an 800px wide, 80 unit wide view
        assert_relative_eq!(camera.eye.x, -10.0, epsilon = 1e-4);
        assert_relative_eq!(camera.target.x, -10.0, epsilon = 1e-4);
        assert_relative_eq!(camera.eye.y, 200.0, epsilon = 1e-4);

        assert!(!controls.update(&mut camera, &surface));
    }

    #[test]
    fn test_wheel_zoom_is_clamped() {
        let (mut camera, mut controls, surface) = rig();
        controls.wheel(1.0);
        assert!(controls.update(&mut camera, &surface));
        assert!(camera.zoom > 1.0);

        controls.wheel(-10_000.0);
        controls.update(&mut camera, &surface);
        assert_eq!(camera.zoom, controls.min_zoom);
    }

    #[test]
    fn test_disabling_cancels_gesture() {
        let (mut camera, mut controls, surface) = rig();
        controls.pointer_down(MouseButton::Right, 0.0, 0.0, false);
        controls.pointer_move(50.0, 0.0);
        controls.set_enabled(false);
        controls.pointer_move(80.0, 0.0);

        assert!(!controls.is_panning());
        assert!(!controls.update(&mut camera, &surface));
        assert!(!controls.pointer_down(MouseButton::Right, 0.0, 0.0, false));
    }

    #[test]
    fn test_disposed_controls_ignore_input() {
        let (mut camera, mut controls, surface) = rig();
        controls.dispose();
        controls.wheel(3.0);
        assert!(!controls.pointer_down(MouseButton::Right, 0.0, 0.0, false));
        assert!(!controls.update(&mut camera, &surface));
        assert_eq!(camera.zoom, 1.0);
    }
}
