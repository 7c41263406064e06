// The Milwaukee scene: ray-traced spheres on a CPU canvas, uploaded into a
// frame target and blitted to the window every frame while rendering.
//
// Controls:
//   W/A/S/D/Q/E      move the red sphere
//   arrows, PgUp/Dn  move the camera
//   = / -            grow / shrink the canvas
//   C                recenter the canvas origin
//   G                toggle debug guides drawn straight into the frame target
//   P                save a PNG snapshot of the canvas

use std::path::PathBuf;

use glam::{Vec3, Vec4};

use crate::canvas::PixelCanvas;
use crate::config::Config;
use crate::draw::{draw_text_5x7, text_width_5x7};
use crate::error::Error;
use crate::orchestrator::{FrameStats, Input, Key, PlayState, Scene};
use crate::raster::{draw_filled_square, draw_line_bresenham};
use crate::snapshot;
use crate::target::FrameTarget;
use crate::tracer::{self, SphereScene};
use crate::types::{FrameBuffer, color_to_rgba8, opaque, rgba8_to_packed};

/// Sphere moved by W/A/S/D/Q/E.
const MOVABLE_SPHERE: usize = 0;
/// Canvas grows/shrinks by this factor per key press.
const CANVAS_STEP: f32 = 1.1;
const GUIDE_COLOR: Vec4 = Vec4::new(1.0, 0.9, 0.2, 1.0);
const HUD_COLOR: Vec4 = Vec4::new(1.0, 1.0, 1.0, 1.0);
const HUD_BACKDROP: Vec4 = Vec4::new(0.0, 0.0, 0.0, 1.0);

/// Sum of unit axes for every held key in `bindings`.
fn held_direction(input: &dyn Input, bindings: &[(Key, Vec3)]) -> Vec3 {
    bindings
        .iter()
        .filter(|(key, _)| input.is_key_down(*key))
        .fold(Vec3::ZERO, |acc, (_, dir)| acc + *dir)
}

const SPHERE_KEYS: [(Key, Vec3); 6] = [
    (Key::A, Vec3::NEG_X),
    (Key::D, Vec3::X),
    (Key::W, Vec3::Y),
    (Key::S, Vec3::NEG_Y),
    (Key::E, Vec3::Z),
    (Key::Q, Vec3::NEG_Z),
];

const CAMERA_KEYS: [(Key, Vec3); 6] = [
    (Key::Left, Vec3::NEG_X),
    (Key::Right, Vec3::X),
    (Key::PageUp, Vec3::Y),
    (Key::PageDown, Vec3::NEG_Y),
    (Key::Up, Vec3::Z),
    (Key::Down, Vec3::NEG_Z),
];

/// GPU-ish resources, present between load and unload.
struct Surfaces {
    canvas: PixelCanvas,
    target: FrameTarget,
}

pub struct Milwaukee {
    config: Config,
    scene: SphereScene,
    surfaces: Option<Surfaces>,
    show_guides: bool,
    mouse: Option<(f32, f32)>,
    snapshot_dir: PathBuf,
    snapshots_taken: u32,
    // edge flags for one-shot keys
    grow_was_down: bool,
    shrink_was_down: bool,
    recenter_was_down: bool,
    guides_was_down: bool,
}

impl Milwaukee {
    pub fn new(config: Config) -> Self {
        let scene = config.initial_scene();
        Self {
            config,
            scene,
            surfaces: None,
            show_guides: false,
            mouse: None,
            snapshot_dir: PathBuf::from("."),
            snapshots_taken: 0,
            grow_was_down: false,
            shrink_was_down: false,
            recenter_was_down: false,
            guides_was_down: false,
        }
    }

    /// Where `P` writes PNG files.
    pub fn with_snapshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshot_dir = dir.into();
        self
    }

    pub fn sphere_scene(&self) -> &SphereScene {
        &self.scene
    }

    pub fn canvas(&self) -> Option<&PixelCanvas> {
        self.surfaces.as_ref().map(|s| &s.canvas)
    }

    pub fn target(&self) -> Option<&FrameTarget> {
        self.surfaces.as_ref().map(|s| &s.target)
    }

    pub fn guides_visible(&self) -> bool {
        self.show_guides
    }

    pub fn snapshots_taken(&self) -> u32 {
        self.snapshots_taken
    }

    /// Scale the canvas by `factor`, never beyond the frame target.
    fn scale_canvas(&mut self, factor: f32) {
        let Some(s) = self.surfaces.as_mut() else { return };
        let w = ((s.canvas.width() as f32 * factor) as usize).clamp(1, s.target.width());
        let h = ((s.canvas.height() as f32 * factor) as usize).clamp(1, s.target.height());
        if (w, h) != (s.canvas.width(), s.canvas.height()) {
            s.canvas.resize(w, h);
        }
    }

    fn recenter(&mut self) {
        if let Some(s) = self.surfaces.as_mut() {
            s.canvas.recenter();
        }
    }

    fn take_snapshot(&mut self) {
        let Some(s) = self.surfaces.as_ref() else { return };
        let path = self.snapshot_dir.join(format!("milwaukee-{:03}.png", self.snapshots_taken));
        match snapshot::save_canvas(&s.canvas, &path) {
            Ok(()) => self.snapshots_taken += 1,
            Err(e) => log::warn!("{e}"),
        }
    }

    /// Axes through the target center plus a marker under the mouse,
    /// written texel by texel into the frame target.
    fn draw_guides(target: &mut FrameTarget, mouse: Option<(f32, f32)>, screen_height: usize) {
        let (w, h) = (target.width() as i32, target.height() as i32);
        draw_line_bresenham(target, (-w / 2, 0), (w - w / 2 - 1, 0), GUIDE_COLOR, true);
        draw_line_bresenham(target, (0, -h / 2), (0, h - h / 2 - 1), GUIDE_COLOR, true);
        if let Some((mx, my)) = mouse {
            // window rows grow downward, target rows grow upward
            let ty = screen_height as i32 - 1 - my as i32;
            draw_filled_square(target, (mx as i32, ty), GUIDE_COLOR, 5, false);
        }
    }
}

/// True on the frame `key` goes down.
fn rising_edge(input: &dyn Input, key: Key, was_down: &mut bool) -> bool {
    let down = input.is_key_down(key);
    let edge = down && !*was_down;
    *was_down = down;
    edge
}

impl Scene for Milwaukee {
    fn load(&mut self, width: usize, height: usize) -> Result<(), Error> {
        let clear = opaque(Vec3::from(self.config.target_clear));
        let target = FrameTarget::new(width, height, clear)?;
        let (cw, ch) = self.config.canvas_size(width, height);
        let canvas = PixelCanvas::new(cw, ch);
        log::info!("canvas {cw}x{ch} in frame target {width}x{height}");
        self.surfaces = Some(Surfaces { canvas, target });
        Ok(())
    }

    fn update(&mut self, input: &dyn Input, dt: f32) {
        let speed = self.config.move_speed;
        let sphere_dir = held_direction(input, &SPHERE_KEYS);
        if sphere_dir != Vec3::ZERO {
            self.scene.move_sphere(MOVABLE_SPHERE, sphere_dir * speed, dt);
        }
        let camera_dir = held_direction(input, &CAMERA_KEYS);
        if camera_dir != Vec3::ZERO {
            self.scene.move_camera(camera_dir * speed, dt);
        }

        if rising_edge(input, Key::Equal, &mut self.grow_was_down) {
            self.scale_canvas(CANVAS_STEP);
        }
        if rising_edge(input, Key::Minus, &mut self.shrink_was_down) {
            self.scale_canvas(1.0 / CANVAS_STEP);
        }
        if rising_edge(input, Key::C, &mut self.recenter_was_down) {
            self.recenter();
        }
        if rising_edge(input, Key::G, &mut self.guides_was_down) {
            self.show_guides = !self.show_guides;
        }
        if input.is_key_released(Key::P) {
            self.take_snapshot();
        }
        self.mouse = input.mouse_pos();
    }

    fn render(&mut self, screen: &mut FrameBuffer, _dt: f32) -> Result<(), Error> {
        let Some(s) = self.surfaces.as_mut() else { return Ok(()) };
        s.target.clear();
        s.canvas.clear_default();
        tracer::render(&self.scene, &mut s.canvas);
        s.canvas.draw_to_target(&mut s.target);
        if self.show_guides {
            Self::draw_guides(&mut s.target, self.mouse, screen.height);
        }
        s.target.blit_to(screen);
        Ok(())
    }

    /// Recreate the frame target for the new window size. The canvas keeps
    /// its size unless it no longer fits, and the origin is pulled back inside.
    fn resize(&mut self, width: usize, height: usize) -> Result<(), Error> {
        let Some(s) = self.surfaces.as_mut() else { return Ok(()) };
        s.target.resize(width, height)?;
        if s.canvas.width() > width || s.canvas.height() > height {
            let (cw, ch) = self.config.canvas_size(width, height);
            s.canvas.resize(cw, ch);
        }
        let (ox, oy) = s.canvas.origin();
        if ox < 0 || oy < 0 || ox as usize >= width || oy as usize >= height {
            s.canvas.recenter();
        }
        Ok(())
    }

    fn panel(&mut self, stats: &FrameStats, screen: &mut FrameBuffer) {
        let Some(s) = self.surfaces.as_ref() else { return };
        let state = match stats.state {
            PlayState::Rendering => "RENDERING",
            PlayState::Paused => "PAUSED",
        };
        let (ox, oy) = s.canvas.origin();
        let hud = format!(
            "FPS: {:.1} | {state} | CANVAS {}X{} ORIGIN ({ox},{oy}) | TARGET {}X{}",
            stats.fps,
            s.canvas.width(),
            s.canvas.height(),
            s.target.width(),
            s.target.height(),
        );
        // Backdrop so old text never shows through while paused.
        let backdrop = rgba8_to_packed(color_to_rgba8(HUD_BACKDROP));
        let bar_w = screen.width.min(text_width_5x7(&hud) + 12);
        for y in 0..screen.height.min(20) {
            let row = y * screen.width;
            screen.pixels[row..row + bar_w].fill(backdrop);
        }
        draw_text_5x7(screen, 6, 6, &hud, HUD_COLOR);
    }

    fn unload(&mut self) {
        self.surfaces = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Default)]
    struct Keys {
        down: HashSet<Key>,
        released: HashSet<Key>,
        mouse: Option<(f32, f32)>,
    }

    impl Keys {
        fn down(keys: &[Key]) -> Self {
            Self { down: keys.iter().copied().collect(), ..Self::default() }
        }
    }

    impl Input for Keys {
        fn is_key_down(&self, key: Key) -> bool {
            self.down.contains(&key)
        }
        fn is_key_released(&self, key: Key) -> bool {
            self.released.contains(&key)
        }
        fn mouse_pos(&self) -> Option<(f32, f32)> {
            self.mouse
        }
    }

    fn loaded(w: usize, h: usize) -> Milwaukee {
        let mut m = Milwaukee::new(Config::default());
        m.load(w, h).unwrap();
        m
    }

    #[test]
    fn load_sizes_canvas_as_fraction_of_window() {
        let m = loaded(200, 100);
        let c = m.canvas().unwrap();
        assert_eq!((c.width(), c.height()), (100, 50));
        assert_eq!(c.origin(), (50, 25));
        assert_eq!((m.target().unwrap().width(), m.target().unwrap().height()), (200, 100));
    }

    #[test]
    fn zero_sized_window_fails_load() {
        let mut m = Milwaukee::new(Config::default());
        assert!(matches!(m.load(0, 10), Err(Error::TargetAlloc(_))));
    }

    #[test]
    fn held_keys_move_sphere_and_camera_by_speed_times_dt() {
        let mut m = loaded(40, 40);
        let start = m.sphere_scene().spheres[MOVABLE_SPHERE].center;
        m.update(&Keys::down(&[Key::D, Key::W, Key::Up]), 0.5);
        let speed = Config::default().move_speed;
        assert_eq!(m.sphere_scene().spheres[MOVABLE_SPHERE].center, start + Vec3::new(1.0, 1.0, 0.0) * speed * 0.5);
        assert_eq!(m.sphere_scene().camera, Vec3::new(0.0, 0.0, speed * 0.5));
    }

    #[test]
    fn canvas_grows_once_per_press_and_stays_inside_target() {
        let mut m = loaded(100, 100);
        let grow = Keys::down(&[Key::Equal]);
        m.update(&grow, 0.0);
        m.update(&grow, 0.0);
        assert_eq!(m.canvas().unwrap().width(), 55);
        for _ in 0..20 {
            m.update(&Keys::default(), 0.0);
            m.update(&grow, 0.0);
        }
        assert_eq!(m.canvas().unwrap().width(), 100);
    }

    #[test]
    fn render_puts_traced_canvas_on_screen() {
        let mut m = loaded(64, 48);
        let mut screen = FrameBuffer::new(64, 48);
        m.render(&mut screen, 0.016).unwrap();
        // Canvas 32x24 uploaded at (16,12): screen center comes from the canvas,
        // screen corner keeps the target clear color.
        let clear = rgba8_to_packed(color_to_rgba8(opaque(Vec3::from(Config::default().target_clear))));
        assert_eq!(screen.get(0, 0), Some(clear));
        assert_ne!(screen.get(32, 24), Some(clear));
    }

    #[test]
    fn guides_toggle_and_draw_into_target() {
        let mut m = loaded(64, 48);
        m.update(&Keys::down(&[Key::G]), 0.0);
        assert!(m.guides_visible());
        let mut screen = FrameBuffer::new(64, 48);
        m.render(&mut screen, 0.0).unwrap();
        let t = m.target().unwrap();
        let guide = color_to_rgba8(GUIDE_COLOR);
        assert_eq!(t.texel(0, 24), Some(guide));
        assert_eq!(t.texel(32, 0), Some(guide));
        assert_eq!(t.texel(63, 24), Some(guide));
    }

    #[test]
    fn resize_recreates_target_and_refits_canvas() {
        let mut m = loaded(200, 100);
        m.resize(80, 40).unwrap();
        let t = m.target().unwrap();
        assert_eq!((t.width(), t.height()), (80, 40));
        let c = m.canvas().unwrap();
        assert_eq!((c.width(), c.height()), (40, 20));
        let mut screen = FrameBuffer::new(80, 40);
        m.render(&mut screen, 0.0).unwrap();
    }

    #[test]
    fn resize_pulls_origin_back_inside_target() {
        let mut m = loaded(200, 100);
        m.surfaces.as_mut().unwrap().canvas.set_origin(-3, 2);
        m.resize(200, 100).unwrap();
        assert_eq!(m.canvas().unwrap().origin(), (50, 25));

        m.surfaces.as_mut().unwrap().canvas.set_origin(7, 9);
        m.resize(180, 90).unwrap();
        assert_eq!(m.canvas().unwrap().origin(), (7, 9));

        m.surfaces.as_mut().unwrap().canvas.set_origin(10, -1);
        m.resize(180, 90).unwrap();
        assert_eq!(m.canvas().unwrap().origin(), (50, 25));
    }

    #[test]
    fn panel_reports_sizes() {
        let mut m = loaded(400, 40);
        let mut screen = FrameBuffer::new(400, 40);
        let stats = FrameStats { fps: 60.0, state: PlayState::Paused };
        m.panel(&stats, &mut screen);
        assert!(screen.pixels.iter().any(|&p| p == 0x00FF_FFFF));
    }

    #[test_log::test]
    fn failed_snapshot_is_logged_not_fatal() {
        let dir = std::env::temp_dir().join("milwaukee-no-such-dir").join("nested");
        let mut m = loaded(20, 20).with_snapshot_dir(dir);
        let keys = Keys { released: [Key::P].into_iter().collect(), ..Keys::default() };
        m.update(&keys, 0.0);
        assert_eq!(m.snapshots_taken(), 0);
    }
}
