use cgmath::{Matrix4, SquareMatrix};

use super::{camera_controller::PanZoomController, ortho_camera::OrthoCamera};
use crate::input::SurfaceRect;

/// The camera rig: camera plus the controls that move it
pub struct CameraManager {
    pub camera: OrthoCamera,
    pub controller: PanZoomController,
}

impl CameraManager {
    pub fn new(camera: OrthoCamera, controller: PanZoomController) -> Self {
        Self { camera, controller }
    }

    /// Apply pending control input to the camera and refresh its uniform.
    /// Returns true if the camera moved or zoomed.
    pub fn update(&mut self, surface: &SurfaceRect) -> bool {
        let changed = self.controller.update(&mut self.camera, surface);
        self.camera.update_view_proj();
        changed
    }
}

pub trait Camera: Sized {
    fn build_view_projection_matrix(&self) -> Matrix4<f32>;
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],

    /// Contains the view projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    /// Creates a default [CameraUniform].
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }
}
