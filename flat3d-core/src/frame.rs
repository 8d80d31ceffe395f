/// Per-frame driver: input -> camera -> matrices -> clear -> draw -> present
use std::time::Instant;

use tracing::{debug, info};

use crate::config::{ConfigError, RenderConfig};
use crate::framebuffer::FrameBuffer;
use crate::geometry::Mesh;
use crate::projection::{projection_matrix, spin_rotation, Camera, FrameMatrices};
use crate::shading::{draw_mesh, DrawStats, Lighting};
use crate::transform::Mat4;

/// Input gathered by the windowing side once per tick.
///
/// Movement axes are usually -1, 0 or 1 and get scaled by speed and
/// elapsed time. Look deltas are radians applied as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    pub forward_move: f32,
    pub strafe_move: f32,
    pub vertical_move: f32,
    pub yaw_delta: f32,
    pub pitch_delta: f32,
    pub quit_requested: bool,
}

/// Supplies one [`FrameInput`] per tick
pub trait InputSource {
    type Error;

    fn poll(&mut self) -> Result<FrameInput, Self::Error>;
}

/// Displays a finished frame
pub trait Presenter {
    type Error;

    fn present(&mut self, frame: &FrameBuffer) -> Result<(), Self::Error>;
}

/// Seconds elapsed since the previous tick
pub trait Clock {
    fn delta(&mut self) -> f32;
}

/// A clock that always reports the same step
#[derive(Debug, Clone, Copy)]
pub struct FixedStep(pub f32);

impl Clock for FixedStep {
    fn delta(&mut self) -> f32 {
        self.0
    }
}

/// Owns the scene, camera and buffers for one viewport
pub struct Renderer {
    config: RenderConfig,
    camera: Camera,
    spin: f32,
    projection: Mat4,
    lighting: Lighting,
    mesh: Mesh,
    target: FrameBuffer,
    stats: DrawStats,
}

impl Renderer {
    /// Renderer for the default cube scene.
    pub fn new(config: RenderConfig) -> Result<Self, ConfigError> {
        let mesh = Mesh::cube(2.0, config.face_colors);
        Self::with_mesh(config, mesh)
    }

    pub fn with_mesh(config: RenderConfig, mesh: Mesh) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(
            width = config.width,
            height = config.height,
            fov = config.fov_y,
            faces = mesh.quads.len(),
            "renderer ready"
        );

        let mut target = FrameBuffer::new(config.width, config.height);
        target.clear(config.background);

        Ok(Self {
            camera: Camera::default(),
            spin: 0.0,
            projection: projection_matrix(&config),
            lighting: Lighting::new(config.light_dir, config.ambient),
            mesh,
            target,
            stats: DrawStats::default(),
            config,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Current object rotation angle in radians.
    pub fn spin(&self) -> f32 {
        self.spin
    }

    pub fn set_spin(&mut self, angle: f32) {
        self.spin = angle;
    }

    /// The most recently finished frame.
    pub fn frame(&self) -> &FrameBuffer {
        &self.target
    }

    pub fn stats(&self) -> DrawStats {
        self.stats
    }

    /// Advance camera and object by one step, then render.
    pub fn tick(&mut self, input: &FrameInput, dt: f32) -> &FrameBuffer {
        self.camera.apply(input, dt, &self.config);
        self.spin += self.config.spin_rate * dt;
        self.render()
    }

    /// Render the current state without advancing it.
    pub fn render(&mut self) -> &FrameBuffer {
        let started = Instant::now();
        let matrices =
            FrameMatrices::build(&self.camera, &spin_rotation(self.spin), &self.projection);

        self.target.clear(self.config.background);
        self.stats = draw_mesh(&mut self.target, &self.mesh, &matrices, &self.lighting);

        debug!(
            elapsed_us = started.elapsed().as_micros() as u64,
            pixels = self.stats.pixels,
            "frame rendered"
        );
        &self.target
    }
}

/// Drive `renderer` until input asks to quit or `max_frames` have been shown.
///
/// Each frame is presented before the next one is cleared. Returns the
/// number of frames presented.
pub fn run<I, P, C, E>(
    renderer: &mut Renderer,
    input: &mut I,
    presenter: &mut P,
    clock: &mut C,
    max_frames: Option<u64>,
) -> Result<u64, E>
where
    I: InputSource,
    P: Presenter,
    C: Clock,
    E: From<I::Error> + From<P::Error>,
{
    let mut frames = 0;
    while max_frames.map_or(true, |max| frames < max) {
        let frame_input = input.poll()?;
        if frame_input.quit_requested {
            info!(frames, "quit requested");
            break;
        }
        let dt = clock.delta();
        let frame = renderer.tick(&frame_input, dt);
        presenter.present(frame)?;
        frames += 1;
    }
    Ok(frames)
}
