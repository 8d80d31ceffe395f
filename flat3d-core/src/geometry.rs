/// Geometry primitives for 3D rendering
use thiserror::Error;

use crate::transform::Vec3;

/// Opaque black, the alpha bits every packed color carries.
pub const OPAQUE: u32 = 0xFF00_0000;

/// Split a packed `0xAARRGGBB` color into its red, green and blue channels.
#[inline]
pub fn unpack_rgb(color: u32) -> (u8, u8, u8) {
    (
        ((color >> 16) & 0xff) as u8,
        ((color >> 8) & 0xff) as u8,
        (color & 0xff) as u8,
    )
}

/// Pack red, green and blue into an opaque `0xAARRGGBB` color.
#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    OPAQUE | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Multiply each channel by `factor`, truncating back to 8 bits.
pub fn scale_color(color: u32, factor: f32) -> u32 {
    let (r, g, b) = unpack_rgb(color);
    pack_rgb(
        (r as f32 * factor) as u8,
        (g as f32 * factor) as u8,
        (b as f32 * factor) as u8,
    )
}

/// A vertex after projection, ready for rasterization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Normalized device coordinates (after the perspective divide)
    pub position: Vec3,
    /// NDC z in [-1, 1], compared against the depth buffer
    pub depth: f32,
    pub color: u32,
}

impl Vertex {
    pub fn new(x: f32, y: f32, depth: f32, color: u32) -> Self {
        Self {
            position: Vec3::new(x, y, depth),
            depth,
            color,
        }
    }
}

/// Local corner indices of the two triangles covering a quad.
pub const QUAD_FAN: [[usize; 3]; 2] = [[0, 1, 2], [0, 2, 3]];

/// A convex quad: four corner indices and one flat base color.
///
/// Seen from outside the mesh, corners 0, 1, 2 run counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub corners: [usize; 4],
    pub color: u32,
}

impl Quad {
    pub fn new(corners: [usize; 4], color: u32) -> Self {
        Self { corners, color }
    }

    /// Triangle fan covering the quad: (0, 1, 2) and (0, 2, 3).
    pub fn triangles(&self) -> [[usize; 3]; 2] {
        QUAD_FAN.map(|tri| tri.map(|i| self.corners[i]))
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum MeshError {
    #[error("quad {corners:?} refers to corner {index}, but the mesh has {count} corners")]
    MissingCorner {
        corners: [usize; 4],
        index: usize,
        count: usize,
    },
}

/// A 3D mesh composed of shared corner positions and flat quads
#[derive(Debug, Clone)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub quads: Vec<Quad>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            quads: Vec::new(),
        }
    }

    /// Build a mesh from corner positions and faces, checking every index.
    pub fn from_parts(positions: Vec<Vec3>, quads: Vec<Quad>) -> Result<Self, MeshError> {
        for quad in &quads {
            if let Some(&index) = quad.corners.iter().find(|&&i| i >= positions.len()) {
                return Err(MeshError::MissingCorner {
                    corners: quad.corners,
                    index,
                    count: positions.len(),
                });
            }
        }
        Ok(Self { positions, quads })
    }

    /// Corner positions of one face, in winding order.
    pub fn quad_positions(&self, quad: &Quad) -> [Vec3; 4] {
        quad.corners.map(|i| self.positions[i])
    }

    /// Axis-aligned cube centered at the origin with edge length `size`.
    ///
    /// Faces are ordered -Z, +Z, -X, +X, -Y, +Y and colored from `colors`.
    pub fn cube(size: f32, colors: [u32; 6]) -> Self {
        let h = size / 2.0;
        let positions = vec![
            Vec3::new(-h, -h, -h),
            Vec3::new(h, -h, -h),
            Vec3::new(h, h, -h),
            Vec3::new(-h, h, -h),
            Vec3::new(-h, -h, h),
            Vec3::new(h, -h, h),
            Vec3::new(h, h, h),
            Vec3::new(-h, h, h),
        ];

        let faces = [
            [0, 3, 2, 1], // -Z
            [4, 5, 6, 7], // +Z
            [0, 4, 7, 3], // -X
            [1, 2, 6, 5], // +X
            [0, 1, 5, 4], // -Y
            [3, 7, 6, 2], // +Y
        ];
        let quads = faces
            .iter()
            .zip(colors)
            .map(|(&corners, color)| Quad::new(corners, color))
            .collect();

        Self { positions, quads }
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
