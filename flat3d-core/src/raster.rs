/// Edge-function triangle rasterizer with depth testing
use crate::framebuffer::FrameBuffer;
use crate::geometry::{pack_rgb, unpack_rgb, Vertex};

/// A position in pixel units, origin top-left, y growing downward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Map NDC x/y onto a `width` × `height` viewport, flipping y.
    pub fn from_ndc(ndc_x: f32, ndc_y: f32, width: usize, height: usize) -> Self {
        Self {
            x: (ndc_x * 0.5 + 0.5) * width as f32,
            y: (-ndc_y * 0.5 + 0.5) * height as f32,
        }
    }
}

/// Signed area term of `p` against the directed edge `a -> b`.
#[inline]
pub fn edge(a: ScreenPoint, b: ScreenPoint, p: ScreenPoint) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Screen-space barycentric weights of `p`, or `None` for a culled triangle.
///
/// The weights sum to one and are all non-negative exactly when `p` is
/// inside the triangle or on its boundary.
pub fn barycentric(
    s0: ScreenPoint,
    s1: ScreenPoint,
    s2: ScreenPoint,
    p: ScreenPoint,
) -> Option<[f32; 3]> {
    let area = edge(s0, s1, s2);
    if !(area > 0.0) {
        return None;
    }
    Some(weights([s0, s1, s2], area, p))
}

/// Edge values of `p` divided by the triangle's positive `area`.
#[inline]
fn weights([s0, s1, s2]: [ScreenPoint; 3], area: f32, p: ScreenPoint) -> [f32; 3] {
    [
        edge(s1, s2, p) / area,
        edge(s2, s0, p) / area,
        edge(s0, s1, p) / area,
    ]
}

/// Rasterize one triangle into `target`; returns how many pixels were written.
///
/// Triangles whose screen-space edge value `edge(v0, v1, v2)` is not positive
/// are culled, which also drops zero-area and NaN triangles. Depth and color
/// are interpolated linearly in screen space.
pub fn draw_triangle(target: &mut FrameBuffer, vertices: &[Vertex; 3]) -> usize {
    let (width, height) = (target.width(), target.height());
    let [v0, v1, v2] = vertices;
    let s0 = ScreenPoint::from_ndc(v0.position.x, v0.position.y, width, height);
    let s1 = ScreenPoint::from_ndc(v1.position.x, v1.position.y, width, height);
    let s2 = ScreenPoint::from_ndc(v2.position.x, v2.position.y, width, height);

    // Backface cull
    let area = edge(s0, s1, s2);
    if !(area > 0.0) {
        return 0;
    }

    // Bounding box, clamped to the viewport
    let min_x = s0.x.min(s1.x).min(s2.x).max(0.0) as i32;
    let max_x = s0.x.max(s1.x).max(s2.x).min((width - 1) as f32) as i32;
    let min_y = s0.y.min(s1.y).min(s2.y).max(0.0) as i32;
    let max_y = s0.y.max(s1.y).max(s2.y).min((height - 1) as f32) as i32;

    let c0 = channels(v0.color);
    let c1 = channels(v1.color);
    let c2 = channels(v2.color);

    let mut written = 0;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = ScreenPoint::new(x as f32 + 0.5, y as f32 + 0.5);
            let [w0, w1, w2] = weights([s0, s1, s2], area, p);
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }

            let depth = w0 * v0.depth + w1 * v1.depth + w2 * v2.depth;
            let lerp = |i: usize| (w0 * c0[i] + w1 * c1[i] + w2 * c2[i]) as u8;
            let color = pack_rgb(lerp(0), lerp(1), lerp(2));

            if target.plot(x, y, depth, color) {
                written += 1;
            }
        }
    }
    written
}

fn channels(color: u32) -> [f32; 3] {
    let (r, g, b) = unpack_rgb(color);
    [r as f32, g as f32, b as f32]
}
