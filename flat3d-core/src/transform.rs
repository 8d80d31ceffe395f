/// 3D transformation matrices and rotation state
///
/// Matrices follow the column-vector convention: `a * b` applies `b` first.
/// None of these functions check their input; degenerate arguments produce
/// non-finite entries instead of errors.
use nalgebra::{Matrix3, Matrix4, Point3, Vector3, Vector4};

pub type Vec3 = Vector3<f32>;
pub type Mat4 = Matrix4<f32>;

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Identity with the translation column set to `t`
    pub fn translate(t: &Vec3) -> Mat4 {
        Mat4::new_translation(t)
    }

    pub fn rotate_x(angle: f32) -> Mat4 {
        Mat4::new_rotation(Vec3::x() * angle)
    }

    /// Right-handed rotation about +Y: `rotate_y(PI / 2)` turns -Z into -X.
    pub fn rotate_y(angle: f32) -> Mat4 {
        Mat4::new_rotation(Vec3::y() * angle)
    }

    pub fn rotate_z(angle: f32) -> Mat4 {
        Mat4::new_rotation(Vec3::z() * angle)
    }

    /// Create a rotation matrix from a rotation state
    pub fn rotation_matrix(rotation: &RotationState) -> Mat4 {
        // Apply rotations in order: X, then Y, then Z
        Self::rotate_z(rotation.z) * Self::rotate_y(rotation.y) * Self::rotate_x(rotation.x)
    }

    pub fn scale(s: &Vec3) -> Mat4 {
        Mat4::new_nonuniform_scaling(s)
    }

    /// Right-handed perspective projection, camera looking down -Z.
    ///
    /// View-space depth `-near` maps to NDC z = -1 and `-far` to +1.
    /// `fov_y` outside (0, PI) yields a meaningless matrix; nalgebra panics
    /// when `near == far` or `aspect == 0`, which [`crate::RenderConfig::validate`]
    /// rules out.
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::new_perspective(aspect, fov_y, near, far)
    }

    /// World-to-camera transform looking from `eye` towards `target`.
    ///
    /// `up` only needs to be roughly up; it is re-orthogonalized against the
    /// forward axis. Degenerates to NaN when `target == eye` or `up` is
    /// parallel to the view direction.
    pub fn look_at(eye: &Vec3, target: &Vec3, up: &Vec3) -> Mat4 {
        Mat4::look_at_rh(&Point3::from(*eye), &Point3::from(*target), up)
    }

    /// Create a model-view-projection matrix
    pub fn mvp(model: &Mat4, view: &Mat4, projection: &Mat4) -> Mat4 {
        projection * view * model
    }
}

/// Transforms a point (implicit w = 1) and divides by the resulting w.
///
/// The divide is unconditional: a zero w gives infinities or NaN.
/// `Matrix4::transform_point` skips the divide when w == 0, so it is not used.
pub fn transform_point(m: &Mat4, p: &Vec3) -> Vec3 {
    let h = transform_clip(m, p);
    Vec3::new(h.x / h.w, h.y / h.w, h.z / h.w)
}

/// Transforms a point (implicit w = 1) without the perspective divide.
pub fn transform_clip(m: &Mat4, p: &Vec3) -> Vector4<f32> {
    m * p.push(1.0)
}

/// Transforms a direction: no translation, no divide.
pub fn transform_dir(m: &Mat4, d: &Vec3) -> Vec3 {
    let linear: Matrix3<f32> = m.fixed_view::<3, 3>(0, 0).into_owned();
    linear * d
}
