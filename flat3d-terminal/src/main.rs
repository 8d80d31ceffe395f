/// Flat3D Terminal Demo - Rotating Cube
///
/// Renders a flat-shaded, spinning cube and shows it in the terminal.
/// Controls:
///   - W/S: Move forward/back
///   - A/D: Strafe
///   - Q/E: Move down/up
///   - Arrow Keys / mouse drag: Look around
///   - Esc / Ctrl+C: Quit
use anyhow::{Context, Result};
use clap::Parser;
use flat3d_core::RenderConfig;
use flat3d_terminal::TerminalApp;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flat3d-terminal", about = "Software-rasterized cube in your terminal")]
struct Cli {
    /// Framebuffer width in pixels
    #[arg(long, default_value = "1280")]
    width: usize,

    /// Framebuffer height in pixels
    #[arg(long, default_value = "720")]
    height: usize,

    /// Vertical field of view in degrees
    #[arg(long, default_value = "60")]
    fov: f32,

    /// Camera speed in units per second
    #[arg(long, default_value = "3")]
    speed: f32,

    /// Target frames per second
    #[arg(long, default_value = "30")]
    fps: u32,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// Render without a terminal and log per-frame stats to stderr
    #[arg(long)]
    headless: bool,

    /// Write logs here while the terminal is in use
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> RenderConfig {
        RenderConfig {
            width: self.width,
            height: self.height,
            fov_y: self.fov.to_radians(),
            move_speed: self.speed,
            ..RenderConfig::default()
        }
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if cli.headless {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }
    // Otherwise the terminal belongs to the renderer and logs are dropped
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;
    tracing::info!("flat3d-terminal v{} starting", env!("CARGO_PKG_VERSION"));

    let mut app = TerminalApp::new(cli.config())?
        .with_target_fps(cli.fps)
        .with_max_frames(cli.frames);

    let frames = if cli.headless {
        app.run_headless(cli.frames.unwrap_or(30))?
    } else {
        app.run()?
    };

    tracing::info!(frames, "done");
    if !cli.headless {
        println!("Rendered {frames} frames. Thank you for using Flat3D!");
    }
    Ok(())
}
