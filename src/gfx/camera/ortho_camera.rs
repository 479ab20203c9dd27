use cgmath::*;

use super::camera_utils::{Camera, CameraUniform};
use crate::{config::CameraConfig, gfx::picking::Ray};

/// Remaps clip-space depth from OpenGL's -1..1 to wgpu's 0..1.
///
/// `Matrix4::new` is column-major: the 0.5 offset sits in the last column so that
/// `z' = 0.5 * z + 0.5 * w` and `w` is left untouched.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Top-down orthographic camera
///
/// The vertical extent of the view is fixed (`frustum_size`); the horizontal extent
/// follows the surface aspect ratio. The camera hangs above the origin looking
/// straight down with its up vector along world -Z, so screen X maps onto world X
/// and screen Y onto world -Z.
#[derive(Debug, Clone, Copy)]
pub struct OrthoCamera {
    pub frustum_size: f32,
    pub aspect: f32,
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub near: f32,
    pub far: f32,
    /// Magnification; values above 1 show less of the world
    pub zoom: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub uniform: CameraUniform,
}

impl Camera for OrthoCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }
}

impl OrthoCamera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        let mut camera = Self {
            frustum_size: config.frustum_size,
            aspect,
            left: 0.0,
            right: 0.0,
            top: 0.0,
            bottom: 0.0,
            near: config.near,
            far: config.far,
            zoom: 1.0,
            eye: Vector3::new(0.0, config.height, 0.0),
            target: Vector3::zero(),
            up: -Vector3::unit_z(),
            uniform: CameraUniform::default(),
        };
        camera.update_projection();
        camera.update_view_proj();
        camera
    }

    /// Recompute the view bounds from the frustum height and aspect ratio
    pub fn update_projection(&mut self) {
        let half_height = self.frustum_size / 2.0;
        let half_width = self.frustum_size * self.aspect / 2.0;
        self.left = -half_width;
        self.right = half_width;
        self.top = half_height;
        self.bottom = -half_height;
    }

    /// Adapt to a new surface size. Zero-sized surfaces (minimized windows) keep the
    /// previous aspect ratio.
    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
        self.update_projection();
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(Point3::from_vec(self.eye), Point3::from_vec(self.target), self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX
            * ortho(
                self.left / self.zoom,
                self.right / self.zoom,
                self.bottom / self.zoom,
                self.top / self.zoom,
                self.near,
                self.far,
            )
    }

    /// World-space size of the visible area at the current zoom
    pub fn visible_extent(&self) -> (f32, f32) {
        (
            (self.right - self.left) / self.zoom,
            (self.top - self.bottom) / self.zoom,
        )
    }

    pub fn forward(&self) -> Vector3<f32> {
        (self.target - self.eye).normalize()
    }

    /// Screen-right direction in world space
    pub fn right_vector(&self) -> Vector3<f32> {
        self.forward().cross(self.up).normalize()
    }

    /// Screen-up direction in world space
    pub fn up_vector(&self) -> Vector3<f32> {
        self.right_vector().cross(self.forward()).normalize()
    }

    /// Ray from the near plane through a point given in normalized device coordinates
    pub fn ray_from_ndc(&self, ndc_x: f32, ndc_y: f32) -> Option<Ray> {
        let inv_view_proj = self.build_view_projection_matrix().invert()?;

        // wgpu depth runs from 0 (near) to 1 (far)
        let near = inv_view_proj * Vector4::new(ndc_x, ndc_y, 0.0, 1.0);
        let far = inv_view_proj * Vector4::new(ndc_x, ndc_y, 1.0, 1.0);
        let near = near.truncate() / near.w;
        let far = far.truncate() / far.w;

        Some(Ray::new(near, far - near))
    }

    /// Project a world point to normalized device coordinates
    pub fn project(&self, point: Vector3<f32>) -> Vector2<f32> {
        let clip = self.build_view_projection_matrix() * point.extend(1.0);
        Vector2::new(clip.x / clip.w, clip.y / clip.w)
    }

    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view_proj = self.build_view_projection_matrix().into();
    }
}
