/// Render configuration constants
use std::f32::consts::PI;

use thiserror::Error;

use crate::transform::Vec3;

/// Reasons a [`RenderConfig`] cannot drive a renderer.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("viewport must be at least 1x1, got {width}x{height}")]
    EmptyViewport { width: usize, height: usize },
    #[error("field of view must lie in (0, pi) radians, got {0}")]
    FieldOfView(f32),
    #[error("clip planes must satisfy 0 < near < far, got near={near} far={far}")]
    ClipPlanes { near: f32, far: f32 },
    #[error("pitch limit must lie in [0, pi/2) radians, got {0}")]
    PitchLimit(f32),
    #[error("light direction must be a non-zero finite vector")]
    LightDirection,
}

/// Fixed parameters of the renderer, chosen once at startup
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    /// Camera movement in world units per second
    pub move_speed: f32,
    /// Largest allowed |pitch| in radians
    pub pitch_limit: f32,
    /// Object spin in radians per second
    pub spin_rate: f32,
    /// Direction towards the light; normalized before use
    pub light_dir: Vec3,
    /// Lower bound of the diffuse term
    pub ambient: f32,
    pub background: u32,
    /// Base colors of the cube faces: -Z, +Z, -X, +X, -Y, +Y
    pub face_colors: [u32; 6],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fov_y: 60.0_f32.to_radians(),
            near: 0.1,
            far: 100.0,
            move_speed: 3.0,
            pitch_limit: 85.0_f32.to_radians(),
            spin_rate: 0.8,
            light_dir: Vec3::new(1.0, 2.0, 3.0),
            ambient: 0.15,
            background: 0xFF1A1A2E,
            face_colors: [
                0xFFE74C3C, // red
                0xFF3498DB, // blue
                0xFF2ECC71, // green
                0xFFE67E22, // orange
                0xFFECF0F1, // white
                0xFF9B59B6, // purple
            ],
        }
    }
}

impl RenderConfig {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Unit vector towards the light.
    pub fn light(&self) -> Vec3 {
        self.light_dir.normalize()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyViewport {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.fov_y > 0.0 && self.fov_y < PI) {
            return Err(ConfigError::FieldOfView(self.fov_y));
        }
        if !(self.near > 0.0 && self.near < self.far) || !self.far.is_finite() {
            return Err(ConfigError::ClipPlanes {
                near: self.near,
                far: self.far,
            });
        }
        if !(self.pitch_limit >= 0.0 && self.pitch_limit < PI / 2.0) {
            return Err(ConfigError::PitchLimit(self.pitch_limit));
        }
        if !self.light().iter().all(|c| c.is_finite()) {
            return Err(ConfigError::LightDirection);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = RenderConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert!((config.aspect() - 16.0 / 9.0).abs() < 1e-6);
        assert!((config.light().norm() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_bad_values() {
        let config = RenderConfig {
            width: 0,
            ..RenderConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyViewport { .. })));

        let config = RenderConfig {
            fov_y: PI,
            ..RenderConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::FieldOfView(PI)));

        let config = RenderConfig {
            near: 10.0,
            far: 10.0,
            ..RenderConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ClipPlanes { .. })));

        let config = RenderConfig {
            pitch_limit: -0.1,
            ..RenderConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::PitchLimit(-0.1)));

        let config = RenderConfig {
            light_dir: Vec3::zeros(),
            ..RenderConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::LightDirection));
    }

    #[test]
    fn test_error_messages() {
        let err = ConfigError::ClipPlanes { near: 1.0, far: 0.5 };
        assert_eq!(
            err.to_string(),
            "clip planes must satisfy 0 < near < far, got near=1 far=0.5"
        );
    }
}
