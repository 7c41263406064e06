// Fixed frame loop that drives a pluggable scene.
// Per frame: poll toggle key -> (if rendering) update + render -> panel -> present.

use std::time::{Duration, Instant};

use crate::error::Error;
use crate::types::FrameBuffer;

/// Keys the program cares about. The window layer maps its own key codes onto these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Q,
    E,
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Space,
    Equal,
    Minus,
    C,
    G,
    P,
    Escape,
}

/// Read-only view of this frame's input.
pub trait Input {
    /// Held down this frame.
    fn is_key_down(&self, key: Key) -> bool;
    /// Went up this frame.
    fn is_key_released(&self, key: Key) -> bool;
    /// Mouse position in window pixels (top-left origin), if over the window.
    fn mouse_pos(&self) -> Option<(f32, f32)>;
    /// The user asked to quit; honoured at the next frame boundary.
    fn close_requested(&self) -> bool {
        self.is_key_down(Key::Escape)
    }
}

/// A window that can show a `FrameBuffer` and deliver input.
pub trait Platform: Input {
    fn is_open(&self) -> bool;
    /// Current drawable size in pixels.
    fn size(&self) -> (usize, usize);
    /// Show the buffer and poll events.
    fn present(&mut self, screen: &FrameBuffer) -> Result<(), Error>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayState {
    Rendering,
    Paused,
}

/// What the panel callback gets to report.
#[derive(Clone, Copy, Debug)]
pub struct FrameStats {
    pub fps: f32,
    pub state: PlayState,
}

/// An application plugged into the orchestrator.
pub trait Scene {
    /// Allocate resources for a window of the given size. Failure aborts startup.
    fn load(&mut self, width: usize, height: usize) -> Result<(), Error>;
    /// Apply input to the simulation.
    fn update(&mut self, input: &dyn Input, dt: f32);
    /// Draw the frame into `screen`.
    fn render(&mut self, screen: &mut FrameBuffer, dt: f32) -> Result<(), Error>;
    /// Window size changed; recreate size-dependent resources.
    fn resize(&mut self, width: usize, height: usize) -> Result<(), Error>;
    /// Overlay drawn every frame, paused or not.
    fn panel(&mut self, _stats: &FrameStats, _screen: &mut FrameBuffer) {}
    fn unload(&mut self) {}
}

/// Counts frames and produces a rate once per second.
struct FpsCounter {
    since: Instant,
    frames: u32,
}

impl FpsCounter {
    fn new(now: Instant) -> Self {
        Self { since: now, frames: 0 }
    }

    fn tick(&mut self, now: Instant) -> Option<f32> {
        self.frames += 1;
        let elapsed = now.duration_since(self.since);
        if elapsed < Duration::from_secs(1) {
            return None;
        }
        let fps = self.frames as f32 / elapsed.as_secs_f32();
        self.frames = 0;
        self.since = now;
        Some(fps)
    }
}

pub struct FrameOrchestrator<S: Scene> {
    scene: S,
    screen: FrameBuffer,
    state: PlayState,
    toggle_key: Key,
    toggle_was_pressed: bool,
    fps: f32,
    frame: u64,
}

impl<S: Scene> FrameOrchestrator<S> {
    pub fn new(scene: S, width: usize, height: usize) -> Self {
        Self {
            scene,
            screen: FrameBuffer::new(width, height),
            state: PlayState::Rendering,
            toggle_key: Key::Space,
            toggle_was_pressed: false,
            fps: 0.0,
            frame: 0,
        }
    }

    pub fn with_toggle_key(mut self, key: Key) -> Self {
        self.toggle_key = key;
        self
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn screen(&self) -> &FrameBuffer {
        &self.screen
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// Flip state once per press: only the frame where the key goes down counts.
    fn poll_toggle(&mut self, input: &dyn Input) {
        let down = input.is_key_down(self.toggle_key);
        if down && !self.toggle_was_pressed {
            self.state = match self.state {
                PlayState::Rendering => PlayState::Paused,
                PlayState::Paused => PlayState::Rendering,
            };
            log::info!("{:?}", self.state);
        }
        self.toggle_was_pressed = down;
    }

    /// One iteration without presenting. While paused the scene is neither
    /// updated nor rendered, so the screen keeps its last image.
    pub fn frame(&mut self, input: &dyn Input, dt: f32) -> Result<(), Error> {
        self.poll_toggle(input);
        if self.state == PlayState::Rendering {
            self.scene.update(input, dt);
            self.scene.render(&mut self.screen, dt)?;
        }
        let stats = FrameStats { fps: self.fps, state: self.state };
        self.scene.panel(&stats, &mut self.screen);
        self.frame += 1;
        Ok(())
    }

    /// Load, loop until the window closes, unload. Once loaded, the scene is
    /// unloaded however the loop ends.
    pub fn run<P: Platform>(&mut self, platform: &mut P) -> Result<(), Error> {
        let (w, h) = platform.size();
        if (w, h) != (self.screen.width, self.screen.height) {
            self.screen.resize(w, h);
        }
        self.scene.load(w, h)?;
        log::info!("scene loaded for {w}x{h}");

        let result = self.drive(platform);
        self.scene.unload();
        match &result {
            Ok(()) => log::info!("scene unloaded after {} frames", self.frame),
            Err(e) => log::error!("frame loop stopped after {} frames: {e}", self.frame),
        }
        result
    }

    fn drive<P: Platform>(&mut self, platform: &mut P) -> Result<(), Error> {
        let mut last = Instant::now();
        let mut fps = FpsCounter::new(last);
        while platform.is_open() && !platform.close_requested() {
            let now = Instant::now();
            let dt = now.duration_since(last).as_secs_f32();
            last = now;

            let (w, h) = platform.size();
            if w > 0 && h > 0 && (w, h) != (self.screen.width, self.screen.height) {
                log::debug!("window resized to {w}x{h}");
                self.screen.resize(w, h);
                self.scene.resize(w, h)?;
            }

            self.frame(&*platform, dt)?;
            platform.present(&self.screen)?;

            if let Some(rate) = fps.tick(now) {
                log::info!("FPS: {rate:.1}");
                self.fps = rate;
            }
        }
        Ok(())
    }
}
