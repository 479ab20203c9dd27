//! Flat (unshaded) materials
//!
//! Editor objects use a single flat color with no lighting response, drawn from both
//! sides so a plane is visible regardless of its winding.

use crate::error::EditorError;

/// RGBA color with sRGB-encoded channels, as written in `#rrggbb` strings.
///
/// Channels are passed to the shader unchanged, so the render surface must use a
/// non-sRGB format for them to appear as written.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parse a `#rrggbb` (or `rrggbb`) hex string
    pub fn from_hex(hex: &str) -> Result<Self, EditorError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(EditorError::InvalidColor(hex.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| EditorError::InvalidColor(hex.to_string()))
        };

        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[f32; 4]> for Color {
    fn from(c: [f32; 4]) -> Self {
        Self {
            r: c[0],
            g: c[1],
            b: c[2],
            a: c[3],
        }
    }
}

/// Material for unlit, single-color surfaces
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatMaterial {
    pub color: Color,
    /// Draw back faces as well as front faces
    pub double_sided: bool,
}

impl FlatMaterial {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            double_sided: false,
        }
    }

    pub fn double_sided(mut self) -> Self {
        self.double_sided = true;
        self
    }
}

/// GPU uniform data for a drawn mesh
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshUniform {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}
