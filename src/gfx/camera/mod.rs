pub mod camera_controller;
pub mod camera_utils;
pub mod ortho_camera;

// Re-export main types
pub use camera_controller::PanZoomController;
pub use camera_utils::{CameraManager, CameraUniform};
pub use ortho_camera::OrthoCamera;
