/// Terminal front-end for the Flat3D software renderer
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{self},
};
use flat3d_core::{
    run, Clock, ConfigError, FrameBuffer, FrameInput, InputSource, Presenter, RenderConfig,
    Renderer,
};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io::{self, stdout};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

pub mod renderer;

pub use renderer::TerminalPresenter;

/// Radians turned per arrow key press
pub const LOOK_STEP: f32 = 0.05;

/// Radians turned per terminal cell of mouse drag
pub const DRAG_STEP: f32 = 0.02;

/// Smallest terminal the presenter can use
pub const MIN_COLS: u16 = 20;
pub const MIN_ROWS: u16 = 5;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("terminal is {cols}x{rows}, need at least {}x{}", MIN_COLS, MIN_ROWS)]
    TerminalTooSmall { cols: u16, rows: u16 },
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// What a key press does to the frame's input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyAction {
    Forward(f32),
    Strafe(f32),
    Vertical(f32),
    Yaw(f32),
    Pitch(f32),
    Quit,
}

impl KeyAction {
    /// Look up the action bound to a key, if any.
    pub fn for_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Self> {
        let action = match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Self::Quit,
            KeyCode::Esc => Self::Quit,
            KeyCode::Char('w') => Self::Forward(1.0),
            KeyCode::Char('s') => Self::Forward(-1.0),
            KeyCode::Char('d') => Self::Strafe(1.0),
            KeyCode::Char('a') => Self::Strafe(-1.0),
            KeyCode::Char('e') => Self::Vertical(1.0),
            KeyCode::Char('q') => Self::Vertical(-1.0),
            KeyCode::Right => Self::Yaw(LOOK_STEP),
            KeyCode::Left => Self::Yaw(-LOOK_STEP),
            // Positive pitch looks down
            KeyCode::Up => Self::Pitch(-LOOK_STEP),
            KeyCode::Down => Self::Pitch(LOOK_STEP),
            _ => return None,
        };
        Some(action)
    }

    /// Fold this action into the input being gathered for a frame.
    pub fn apply(self, input: &mut FrameInput) {
        match self {
            Self::Forward(v) => input.forward_move += v,
            Self::Strafe(v) => input.strafe_move += v,
            Self::Vertical(v) => input.vertical_move += v,
            Self::Yaw(v) => input.yaw_delta += v,
            Self::Pitch(v) => input.pitch_delta += v,
            Self::Quit => input.quit_requested = true,
        }
    }
}

/// Reads pending key and mouse events without blocking.
///
/// Terminals only report presses (and auto-repeat), so every press counts
/// as one frame's worth of movement. Dragging with any mouse button turns
/// the camera by the distance moved since the previous drag event.
#[derive(Debug, Default)]
pub struct TerminalInput {
    drag_from: Option<(u16, u16)>,
}

impl TerminalInput {
    /// Fold one terminal event into the frame's input.
    pub fn handle(&mut self, event: Event, input: &mut FrameInput) {
        match event {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind,
                ..
            }) => {
                if kind == KeyEventKind::Release {
                    return;
                }
                if let Some(action) = KeyAction::for_key(code, modifiers) {
                    action.apply(input);
                }
            }
            Event::Mouse(MouseEvent {
                kind, column, row, ..
            }) => match kind {
                MouseEventKind::Down(_) => self.drag_from = Some((column, row)),
                MouseEventKind::Drag(_) => {
                    if let Some((from_col, from_row)) = self.drag_from {
                        let dx = f32::from(column) - f32::from(from_col);
                        let dy = f32::from(row) - f32::from(from_row);
                        KeyAction::Yaw(dx * DRAG_STEP).apply(input);
                        KeyAction::Pitch(dy * DRAG_STEP).apply(input);
                    }
                    self.drag_from = Some((column, row));
                }
                MouseEventKind::Up(_) => self.drag_from = None,
                _ => {}
            },
            _ => {}
        }
    }
}

impl InputSource for TerminalInput {
    type Error = io::Error;

    fn poll(&mut self) -> io::Result<FrameInput> {
        let mut input = FrameInput::default();
        while event::poll(Duration::ZERO)? {
            let event = event::read()?;
            self.handle(event, &mut input);
        }
        Ok(input)
    }
}

/// Input that never moves and never quits
#[derive(Debug, Default)]
pub struct NeutralInput;

impl InputSource for NeutralInput {
    type Error = io::Error;

    fn poll(&mut self) -> io::Result<FrameInput> {
        Ok(FrameInput::default())
    }
}

/// Sleeps out the rest of each frame, then reports real elapsed time
pub struct PacedClock {
    target: Duration,
    last: Instant,
}

impl PacedClock {
    pub fn new(fps: u32) -> Self {
        Self {
            target: Duration::from_secs(1) / fps.max(1),
            last: Instant::now(),
        }
    }
}

impl Clock for PacedClock {
    fn delta(&mut self) -> f32 {
        let elapsed = self.last.elapsed();
        if elapsed < self.target {
            thread::sleep(self.target - elapsed);
        }
        let now = Instant::now();
        let dt = (now - self.last).as_secs_f32();
        self.last = now;
        dt
    }
}

/// Logs a summary of every frame instead of drawing it
#[derive(Debug)]
pub struct FrameStats {
    background: u32,
    frames: u64,
}

impl FrameStats {
    pub fn new(background: u32) -> Self {
        Self {
            background,
            frames: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Stable within one build; used to spot frame-to-frame changes.
pub fn frame_checksum(frame: &FrameBuffer) -> u64 {
    let mut hasher = DefaultHasher::new();
    frame.pixels().hash(&mut hasher);
    hasher.finish()
}

impl Presenter for FrameStats {
    type Error = io::Error;

    fn present(&mut self, frame: &FrameBuffer) -> io::Result<()> {
        let covered = frame
            .pixels()
            .iter()
            .filter(|&&c| c != self.background)
            .count();
        info!(
            frame = self.frames,
            covered,
            checksum = frame_checksum(frame),
            "frame"
        );
        self.frames += 1;
        Ok(())
    }
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    renderer: Renderer,
    target_fps: u32,
    max_frames: Option<u64>,
}

impl TerminalApp {
    pub fn new(config: RenderConfig) -> Result<Self, AppError> {
        Ok(Self {
            renderer: Renderer::new(config)?,
            target_fps: 30,
            max_frames: None,
        })
    }

    pub fn with_max_frames(mut self, max_frames: Option<u64>) -> Self {
        self.max_frames = max_frames;
        self
    }

    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Interactive loop on the current terminal. Returns frames shown.
    pub fn run(&mut self) -> Result<u64, AppError> {
        let (cols, rows) = terminal::size()?;
        if cols < MIN_COLS || rows < MIN_ROWS {
            return Err(AppError::TerminalTooSmall { cols, rows });
        }

        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        let restored = terminal::disable_raw_mode().and_then(|_| {
            execute!(
                stdout(),
                DisableMouseCapture,
                terminal::LeaveAlternateScreen,
                cursor::Show
            )
        });

        let frames = result?;
        restored?;
        info!(frames, "terminal restored");
        Ok(frames)
    }

    fn main_loop(&mut self) -> Result<u64, AppError> {
        let mut presenter = TerminalPresenter::new(stdout());
        let mut clock = PacedClock::new(self.target_fps);
        debug!(fps = self.target_fps, "entering frame loop");
        run(
            &mut self.renderer,
            &mut TerminalInput::default(),
            &mut presenter,
            &mut clock,
            self.max_frames,
        )
    }

    /// Render without a terminal, logging per-frame stats.
    pub fn run_headless(&mut self, frames: u64) -> Result<u64, AppError> {
        let mut stats = FrameStats::new(self.renderer.config().background);
        let step = 1.0 / self.target_fps.max(1) as f32;
        run(
            &mut self.renderer,
            &mut NeutralInput,
            &mut stats,
            &mut flat3d_core::FixedStep(step),
            Some(frames),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> RenderConfig {
        RenderConfig {
            width: 64,
            height: 36,
            ..RenderConfig::default()
        }
    }

    #[test]
    fn test_key_bindings() {
        let none = KeyModifiers::NONE;
        let bindings = [
            (KeyCode::Char('w'), KeyAction::Forward(1.0)),
            (KeyCode::Char('a'), KeyAction::Strafe(-1.0)),
            (KeyCode::Char('q'), KeyAction::Vertical(-1.0)),
            (KeyCode::Up, KeyAction::Pitch(-LOOK_STEP)),
            (KeyCode::Esc, KeyAction::Quit),
        ];
        for (code, action) in bindings {
            assert_eq!(KeyAction::for_key(code, none), Some(action), "{code:?}");
        }
        assert_eq!(
            KeyAction::for_key(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Some(KeyAction::Quit)
        );
        assert_eq!(KeyAction::for_key(KeyCode::Char('c'), none), None);
        assert_eq!(KeyAction::for_key(KeyCode::Tab, none), None);
    }

    #[test]
    fn test_actions_accumulate() {
        let mut input = FrameInput::default();
        KeyAction::Forward(1.0).apply(&mut input);
        KeyAction::Forward(1.0).apply(&mut input);
        KeyAction::Strafe(-1.0).apply(&mut input);
        KeyAction::Yaw(LOOK_STEP).apply(&mut input);
        assert_eq!(input.forward_move, 2.0);
        assert_eq!(input.strafe_move, -1.0);
        assert_eq!(input.yaw_delta, LOOK_STEP);
        assert!(!input.quit_requested);

        KeyAction::Quit.apply(&mut input);
        assert!(input.quit_requested);
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_mouse_drag_turns_camera() {
        use crossterm::event::MouseButton;

        let mut source = TerminalInput::default();
        let mut input = FrameInput::default();
        source.handle(mouse(MouseEventKind::Down(MouseButton::Left), 10, 5), &mut input);
        source.handle(mouse(MouseEventKind::Drag(MouseButton::Left), 13, 5), &mut input);
        source.handle(mouse(MouseEventKind::Drag(MouseButton::Left), 14, 3), &mut input);
        assert!((input.yaw_delta - 4.0 * DRAG_STEP).abs() < 1e-6);
        assert!((input.pitch_delta + 2.0 * DRAG_STEP).abs() < 1e-6);

        // Plain motion after release does not turn
        source.handle(mouse(MouseEventKind::Up(MouseButton::Left), 14, 3), &mut input);
        let mut idle = FrameInput::default();
        source.handle(mouse(MouseEventKind::Moved, 30, 20), &mut idle);
        assert_eq!(idle.yaw_delta, 0.0);
        assert_eq!(idle.pitch_delta, 0.0);
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut source = TerminalInput::default();
        let mut input = FrameInput::default();
        let mut release = KeyEvent::new(KeyCode::Char('w'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        source.handle(Event::Key(release), &mut input);
        assert_eq!(input.forward_move, 0.0);

        let press = KeyEvent::new(KeyCode::Char('w'), KeyModifiers::NONE);
        source.handle(Event::Key(press), &mut input);
        assert_eq!(input.forward_move, 1.0);
    }

    #[test]
    fn test_headless_runs_requested_frames() {
        let mut app = TerminalApp::new(small_config()).unwrap();
        let frames = app.run_headless(5).unwrap();
        assert_eq!(frames, 5);
        assert!((app.renderer().spin() - 5.0 / 30.0 * 0.8).abs() < 1e-5);
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let config = RenderConfig {
            height: 0,
            ..small_config()
        };
        let err = TerminalApp::new(config).err().unwrap();
        assert!(matches!(err, AppError::Config(ConfigError::EmptyViewport { .. })));
    }

    #[test]
    fn test_frame_stats_counts_presented_frames() {
        let mut stats = FrameStats::new(0);
        let frame = FrameBuffer::new(4, 4);
        stats.present(&frame).unwrap();
        stats.present(&frame).unwrap();
        assert_eq!(stats.frames(), 2);
    }

    #[test]
    fn test_checksum_tracks_content() {
        let mut a = FrameBuffer::new(4, 4);
        a.clear(1);
        let mut b = a.clone();
        assert_eq!(frame_checksum(&a), frame_checksum(&b));
        b.plot(2, 2, 0.0, 7);
        assert_ne!(frame_checksum(&a), frame_checksum(&b));
    }
}
