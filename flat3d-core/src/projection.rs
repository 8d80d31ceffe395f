/// Camera and projection utilities
use crate::config::RenderConfig;
use crate::frame::FrameInput;
use crate::transform::{Mat4, RotationState, Transform, Vec3};

/// First-person camera: a position plus yaw and pitch in radians.
///
/// Yaw 0 and pitch 0 look down -Z. Positive yaw turns towards +X and
/// positive pitch tilts the view downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    pub fn forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(sy * cp, -sp, -cy * cp)
    }

    /// Horizontal right vector; independent of pitch.
    pub fn right(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        Vec3::new(cy, 0.0, sy)
    }

    /// World up; vertical movement ignores the camera orientation.
    pub fn up(&self) -> Vec3 {
        Vec3::y()
    }

    /// Turn, clamp pitch, then move along the updated basis.
    pub fn apply(&mut self, input: &FrameInput, dt: f32, config: &RenderConfig) {
        self.yaw += input.yaw_delta;
        self.pitch =
            (self.pitch + input.pitch_delta).clamp(-config.pitch_limit, config.pitch_limit);

        let step = config.move_speed * dt;
        let motion = self.forward() * input.forward_move
            + self.right() * input.strafe_move
            + self.up() * input.vertical_move;
        self.position += motion * step;
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Mat4 {
        Transform::look_at(&self.position, &(self.position + self.forward()), &self.up())
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 5.0))
    }
}

/// Create the projection matrix for a viewport
pub fn projection_matrix(config: &RenderConfig) -> Mat4 {
    Transform::perspective(config.fov_y, config.aspect(), config.near, config.far)
}

/// Object spin for a given angle: yaw by `angle`, tumble by `0.4 * angle`.
pub fn spin_rotation(angle: f32) -> RotationState {
    RotationState::new(angle * 0.4, angle, 0.0)
}

/// Matrices for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameMatrices {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub mvp: Mat4,
}

impl FrameMatrices {
    pub fn build(camera: &Camera, rotation: &RotationState, projection: &Mat4) -> Self {
        let model = Transform::rotation_matrix(rotation);
        let view = camera.view_matrix();
        Self {
            model,
            view,
            projection: *projection,
            mvp: Transform::mvp(&model, &view, projection),
        }
    }
}
