/// Flat per-face shading and quad submission
use tracing::trace;

use crate::framebuffer::FrameBuffer;
use crate::geometry::{scale_color, Mesh, Quad, Vertex, QUAD_FAN};
use crate::projection::FrameMatrices;
use crate::raster::draw_triangle;
use crate::transform::{transform_clip, transform_point, Mat4, Vec3};

/// Light parameters shared by every face in a frame
#[derive(Debug, Clone, Copy)]
pub struct Lighting {
    /// Unit vector pointing towards the light
    pub direction: Vec3,
    /// Floor of the diffuse term so faces turned away stay visible
    pub ambient: f32,
}

impl Lighting {
    pub fn new(direction: Vec3, ambient: f32) -> Self {
        Self {
            direction: direction.normalize(),
            ambient,
        }
    }

    pub fn diffuse(&self, normal: &Vec3) -> f32 {
        normal.dot(&self.direction).max(self.ambient)
    }
}

/// Outward unit normal of a face whose first three corners wind
/// counter-clockwise seen from outside.
pub fn face_normal(corners: &[Vec3; 4]) -> Vec3 {
    (corners[1] - corners[0]).cross(&(corners[2] - corners[0])).normalize()
}

/// Flat color of one quad under `lighting`, in world space.
pub fn shade_quad(mesh: &Mesh, quad: &Quad, model: &Mat4, lighting: &Lighting) -> u32 {
    let world = mesh.quad_positions(quad).map(|p| transform_point(model, &p));
    let diffuse = lighting.diffuse(&face_normal(&world));
    scale_color(quad.color, diffuse)
}

/// Project an object-space point through the full MVP.
pub fn project_vertex(mvp: &Mat4, position: &Vec3, color: u32) -> Vertex {
    let clip = transform_clip(mvp, position);
    let ndc = clip.xyz() / clip.w;
    Vertex {
        position: ndc,
        depth: ndc.z,
        color,
    }
}

/// Per-frame totals from [`draw_mesh`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub triangles: usize,
    /// Triangles that wrote no pixel: culled, degenerate or fully hidden
    pub empty: usize,
    pub pixels: usize,
}

/// Shade and rasterize every face of `mesh` into `target`.
pub fn draw_mesh(
    target: &mut FrameBuffer,
    mesh: &Mesh,
    matrices: &FrameMatrices,
    lighting: &Lighting,
) -> DrawStats {
    let mut stats = DrawStats::default();

    for quad in &mesh.quads {
        let shaded = shade_quad(mesh, quad, &matrices.model, lighting);
        let projected = quad
            .corners
            .map(|i| project_vertex(&matrices.mvp, &mesh.positions[i], shaded));

        for [a, b, c] in QUAD_FAN {
            let written = draw_triangle(target, &[projected[a], projected[b], projected[c]]);
            stats.triangles += 1;
            if written == 0 {
                stats.empty += 1;
            }
            stats.pixels += written;
        }
    }

    trace!(
        triangles = stats.triangles,
        empty = stats.empty,
        pixels = stats.pixels,
        "mesh drawn"
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::geometry::pack_rgb;
    use crate::projection::{projection_matrix, Camera};
    use crate::transform::{RotationState, Transform};

    fn light() -> Lighting {
        Lighting::new(Vec3::new(1.0, 2.0, 3.0), 0.15)
    }

    #[test]
    fn test_diffuse_has_ambient_floor() {
        let lighting = light();
        assert_eq!(lighting.diffuse(&-lighting.direction), 0.15);
        assert!((lighting.diffuse(&lighting.direction) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_face_normal_follows_model_rotation() {
        let cube = Mesh::cube(2.0, [0xFFFFFFFF; 6]);
        let plus_z = &cube.quads[1];
        let model = Transform::rotate_y(std::f32::consts::FRAC_PI_2);
        let world = cube.quad_positions(plus_z).map(|p| transform_point(&model, &p));
        let normal = face_normal(&world);
        assert!((normal - Vec3::new(1.0, 0.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn test_shade_quad_scales_base_color() {
        let cube = Mesh::cube(2.0, [0xFFC86432; 6]);
        // Light straight down the face normal of +Y
        let lighting = Lighting::new(Vec3::new(0.0, 1.0, 0.0), 0.15);
        let top = &cube.quads[5];
        let shade = shade_quad(&cube, top, &Mat4::identity(), &lighting);
        assert_eq!(shade, 0xFFC86432);

        // The bottom face only gets the ambient floor: 200, 100, 50 scaled by 0.15
        let bottom = &cube.quads[4];
        assert_eq!(
            shade_quad(&cube, bottom, &Mat4::identity(), &lighting),
            pack_rgb(30, 15, 7)
        );
    }

    #[test]
    fn test_project_vertex_keeps_ndc_depth() {
        let config = RenderConfig::default();
        let proj = projection_matrix(&config);
        let v = project_vertex(&proj, &Vec3::new(0.0, 0.0, -config.near), 7);
        assert!((v.depth + 1.0).abs() < 1e-4);
        assert_eq!(v.depth, v.position.z);
        assert_eq!(v.color, 7);
    }

    #[test]
    fn test_draw_mesh_submits_two_triangles_per_face() {
        let config = RenderConfig {
            width: 64,
            height: 36,
            ..RenderConfig::default()
        };
        let cube = Mesh::cube(2.0, config.face_colors);
        let matrices = FrameMatrices::build(
            &Camera::default(),
            &RotationState::new(0.3, 0.5, 0.0),
            &projection_matrix(&config),
        );
        let mut fb = FrameBuffer::new(config.width, config.height);
        fb.clear(config.background);

        let stats = draw_mesh(&mut fb, &cube, &matrices, &light());
        assert_eq!(stats.triangles, 12);
        // Faces towards the camera are culled
        assert!(stats.empty >= 6);
        assert!(stats.pixels > 0);
    }
}
