//! Flat3D Core Library - software rendering pipeline
//!
//! Transforms object-space geometry through model, view and projection
//! matrices, rasterizes triangles with a depth buffer and shades every face
//! with a single diffuse term.

pub mod config;
pub mod frame;
pub mod framebuffer;
pub mod geometry;
pub mod projection;
pub mod raster;
pub mod shading;
pub mod transform;

// Re-export commonly used types
pub use config::{ConfigError, RenderConfig};
pub use frame::{run, Clock, FixedStep, FrameInput, InputSource, Presenter, Renderer};
pub use framebuffer::FrameBuffer;
pub use geometry::{Mesh, MeshError, Quad, Vertex};
pub use projection::{Camera, FrameMatrices};
pub use raster::draw_triangle;
pub use shading::{draw_mesh, DrawStats, Lighting};
pub use transform::{transform_dir, transform_point, Mat4, RotationState, Transform, Vec3};
