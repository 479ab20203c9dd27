//! # Primitive Shape Generation
//!
//! All shapes are generated with normals and texture coordinates.

use super::GeometryData;

/// Generate a plane centered at the origin lying in the XY plane
///
/// # Arguments
/// * `width` - Extent along X
/// * `height` - Extent along Y
/// * `width_segments` - Subdivisions along X (at least 1)
/// * `height_segments` - Subdivisions along Y (at least 1)
///
/// The normal points along +Z. Rotate the owning node by -90° about X to lay it
/// flat on the ground with the normal pointing up.
pub fn generate_plane(width: f32, height: f32, width_segments: u32, height_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let w_segs = width_segments.max(1);
    let h_segs = height_segments.max(1);

    for y in 0..=h_segs {
        let v = y as f32 / h_segs as f32;
        let pos_y = (v - 0.5) * height;

        for x in 0..=w_segs {
            let u = x as f32 / w_segs as f32;
            let pos_x = (u - 0.5) * width;

            data.vertices.push([pos_x, pos_y, 0.0]);
            data.normals.push([0.0, 0.0, 1.0]);
            data.tex_coords.push([u, v]);
        }
    }

    // Counter-clockwise when viewed from +Z
    for y in 0..h_segs {
        for x in 0..w_segs {
            let i = y * (w_segs + 1) + x;
            let next_row = i + w_segs + 1;

            data.indices.push(i);
            data.indices.push(i + 1);
            data.indices.push(next_row);

            data.indices.push(next_row);
            data.indices.push(i + 1);
            data.indices.push(next_row + 1);
        }
    }

    data
}
