//! Owned color and depth buffers for one viewport

/// Depth every pixel is reset to; farther than any real fragment.
pub const FAR_DEPTH: f32 = f32::MAX;

/// Color buffer of packed `0xAARRGGBB` pixels with a parallel depth buffer.
///
/// Pixel (0, 0) is the top-left corner; rows are stored top to bottom.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    color: Vec<u32>,
    depth: Vec<f32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            color: vec![0; size],
            depth: vec![FAR_DEPTH; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self, background: u32) {
        self.color.fill(background);
        self.depth.fill(FAR_DEPTH);
    }

    /// Depth-tested write. Out-of-bounds coordinates are ignored.
    ///
    /// A fragment lands when it is at least as near as what is stored, so
    /// among equal depths the latest write wins.
    #[inline]
    pub fn plot(&mut self, x: i32, y: i32, depth: f32, color: u32) -> bool {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return false;
        }
        let idx = y as usize * self.width + x as usize;
        if depth <= self.depth[idx] {
            self.depth[idx] = depth;
            self.color[idx] = color;
            true
        } else {
            false
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.color[y * self.width + x]
    }

    pub fn depth_at(&self, x: usize, y: usize) -> f32 {
        self.depth[y * self.width + x]
    }

    /// Row-major pixels, ready to hand to a presenter.
    pub fn pixels(&self) -> &[u32] {
        &self.color
    }
}
