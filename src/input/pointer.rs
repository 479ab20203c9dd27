use winit::event::MouseButton;

/// Bounding rectangle of the render surface in window client coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl SurfaceRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Rectangle anchored at the window origin
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }

    /// Convert client coordinates to normalized device coordinates.
    ///
    /// X grows to the right and Y grows upwards, both in [-1, 1] inside the rectangle.
    /// Returns `None` for a degenerate (zero-sized) rectangle.
    pub fn to_ndc(&self, client_x: f32, client_y: f32) -> Option<(f32, f32)> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        let x = ((client_x - self.left) / self.width) * 2.0 - 1.0;
        let y = -(((client_y - self.top) / self.height) * 2.0 - 1.0);
        Some((x, y))
    }
}

/// A pointer press, move or release in window client coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub client_x: f32,
    pub client_y: f32,
    pub button: MouseButton,
}

impl PointerEvent {
    pub fn new(client_x: f32, client_y: f32, button: MouseButton) -> Self {
        Self {
            client_x,
            client_y,
            button,
        }
    }

    pub fn primary(client_x: f32, client_y: f32) -> Self {
        Self::new(client_x, client_y, MouseButton::Left)
    }

    pub fn is_primary(&self) -> bool {
        self.button == MouseButton::Left
    }
}
