// End-to-end scenarios: drawing on a canvas, tracing a small scene,
// and driving the frame loop with a scripted window.

use std::collections::HashSet;

use glam::{Vec3, Vec4};

use milwaukee::canvas::PixelCanvas;
use milwaukee::config::Config;
use milwaukee::error::Error;
use milwaukee::milwaukee::Milwaukee;
use milwaukee::orchestrator::{FrameOrchestrator, FrameStats, Input, Key, PlayState, Platform, Scene};
use milwaukee::raster::{draw_filled_square, draw_line_bresenham};
use milwaukee::tracer::{self, Light, Sphere, SphereScene, Viewport};
use milwaukee::types::{DEFAULT_CLEAR, FrameBuffer};

const RED: Vec4 = Vec4::new(1.0, 0.0, 0.0, 1.0);

#[test]
fn filled_square_on_centered_canvas() {
    let mut canvas = PixelCanvas::new(100, 100);
    assert_eq!(canvas.origin(), (50, 50));
    draw_filled_square(&mut canvas, (0, 0), RED, 10, true);

    let mut red = 0;
    for y in 45..55 {
        for x in 45..55 {
            assert_eq!(canvas.pixel(x, y), Some(RED), "({x},{y})");
            red += 1;
        }
    }
    assert_eq!(red, 100);
    for i in 44..=55 {
        for (x, y) in [(44, i), (55, i), (i, 44), (i, 55)] {
            assert_eq!(canvas.pixel(x, y), Some(DEFAULT_CLEAR), "({x},{y})");
        }
    }
    assert_eq!(canvas.pixels().iter().filter(|&&p| p == RED).count(), 100);
}

#[test]
fn line_across_canvas_clips_silently() {
    let mut canvas = PixelCanvas::new(20, 20);
    draw_line_bresenham(&mut canvas, (-50, 0), (50, 0), RED, true);
    let row: Vec<_> = (0..20).map(|x| canvas.pixel(x, 10)).collect();
    assert!(row.iter().all(|p| *p == Some(RED)));
    assert_eq!(canvas.pixels().iter().filter(|&&p| p == RED).count(), 20);
}

fn three_spheres() -> SphereScene {
    SphereScene {
        camera: Vec3::ZERO,
        spheres: vec![
            Sphere { center: Vec3::new(-1.0, 0.0, 4.0), radius: 0.5, color: Vec3::new(1.0, 0.0, 0.0), specular: 50.0 },
            Sphere { center: Vec3::new(0.0, 0.0, 5.0), radius: 0.5, color: Vec3::new(0.0, 1.0, 0.0), specular: 50.0 },
            Sphere { center: Vec3::new(1.0, 0.0, 6.0), radius: 0.5, color: Vec3::new(0.0, 0.0, 1.0), specular: 50.0 },
        ],
        light: Light { intensity: 0.6, direction: Vec3::new(0.0, 0.0, -1.0) },
        background: Vec3::ZERO,
        viewport: Viewport::default(),
    }
}

/// Index of the largest RGB channel.
fn dominant(c: Vec4) -> usize {
    let rgb = [c.x, c.y, c.z];
    (0..3).max_by(|&a, &b| rgb[a].total_cmp(&rgb[b])).unwrap()
}

#[test]
fn three_spheres_show_their_own_colors() {
    let scene = three_spheres();
    let mut canvas = PixelCanvas::new(100, 100);
    tracer::render(&scene, &mut canvas);
    let (ox, oy) = canvas.origin();

    for (i, sphere) in scene.spheres.iter().enumerate() {
        // Perspective projection of the center onto the 100px canvas.
        let x = (sphere.center.x / sphere.center.z * 100.0).round() as i32;
        let px = canvas.pixel(x + ox, oy).unwrap();
        assert_ne!(px.truncate(), Vec3::ZERO, "sphere {i} at x={x}");
        assert_eq!(dominant(px), i, "sphere {i}: {px:?}");
    }

    // Top corner sees nothing.
    assert_eq!(canvas.pixel(0, 99), Some(Vec4::new(0.0, 0.0, 0.0, 1.0)));
}

#[test]
fn moving_the_camera_behind_everything_changes_the_image() {
    let mut scene = three_spheres();
    let mut before = PixelCanvas::new(40, 40);
    tracer::render(&scene, &mut before);
    scene.move_camera(Vec3::new(0.0, 0.0, 1.0), 20.0);
    let mut after = PixelCanvas::new(40, 40);
    tracer::render(&scene, &mut after);
    assert_ne!(before.pixels(), after.pixels());
    let black = Vec4::new(0.0, 0.0, 0.0, 1.0);
    assert!(after.pixels().iter().all(|&p| p == black));
}

/* ---------- scripted window ---------- */

struct ScriptedWindow {
    frames: Vec<(Vec<Key>, (usize, usize))>, // keys held + window size per frame
    current: usize,
    presented: usize,
}

impl ScriptedWindow {
    fn new(frames: Vec<(Vec<Key>, (usize, usize))>) -> Self {
        Self { frames, current: 0, presented: 0 }
    }

    fn held(&self) -> HashSet<Key> {
        self.frames.get(self.current).map(|(k, _)| k.iter().copied().collect()).unwrap_or_default()
    }
}

impl Input for ScriptedWindow {
    fn is_key_down(&self, key: Key) -> bool {
        self.held().contains(&key)
    }
    fn is_key_released(&self, _key: Key) -> bool {
        false
    }
    fn mouse_pos(&self) -> Option<(f32, f32)> {
        Some((3.0, 3.0))
    }
}

impl Platform for ScriptedWindow {
    fn is_open(&self) -> bool {
        self.current < self.frames.len()
    }
    fn size(&self) -> (usize, usize) {
        let i = self.current.min(self.frames.len().saturating_sub(1));
        self.frames.get(i).map(|(_, s)| *s).unwrap_or((0, 0))
    }
    fn present(&mut self, screen: &FrameBuffer) -> Result<(), Error> {
        assert_eq!(screen.pixels.len(), screen.width * screen.height);
        self.presented += 1;
        self.current += 1;
        Ok(())
    }
}

#[derive(Default)]
struct Recording {
    loads: Vec<(usize, usize)>,
    resizes: Vec<(usize, usize)>,
    renders: usize,
    panels: Vec<PlayState>,
    unloaded: bool,
}

impl Scene for Recording {
    fn load(&mut self, w: usize, h: usize) -> Result<(), Error> {
        self.loads.push((w, h));
        Ok(())
    }
    fn update(&mut self, _input: &dyn Input, _dt: f32) {}
    fn render(&mut self, _screen: &mut FrameBuffer, _dt: f32) -> Result<(), Error> {
        self.renders += 1;
        Ok(())
    }
    fn resize(&mut self, w: usize, h: usize) -> Result<(), Error> {
        self.resizes.push((w, h));
        Ok(())
    }
    fn panel(&mut self, stats: &FrameStats, _screen: &mut FrameBuffer) {
        self.panels.push(stats.state);
    }
    fn unload(&mut self) {
        self.unloaded = true;
    }
}

#[test_log::test]
fn loop_resizes_only_on_change_and_honours_pause() {
    let s = (32, 24);
    let big = (48, 30);
    let mut window = ScriptedWindow::new(vec![
        (vec![], s),
        (vec![Key::Space], s),
        (vec![Key::Space], big),
        (vec![], big),
        (vec![Key::Space], big),
        (vec![], big),
    ]);
    let mut o = FrameOrchestrator::new(Recording::default(), 10, 10);
    o.run(&mut window).unwrap();

    let scene = o.scene();
    assert_eq!(scene.loads, vec![s]);
    assert_eq!(scene.resizes, vec![big]);
    assert_eq!(scene.renders, 3);
    use PlayState::*;
    assert_eq!(scene.panels, vec![Rendering, Paused, Paused, Paused, Rendering, Rendering]);
    assert!(scene.unloaded);
    assert_eq!(window.presented, 6);
    assert_eq!((o.screen().width, o.screen().height), big);
}

#[test]
fn escape_stops_at_the_frame_boundary() {
    let s = (16, 16);
    let mut window = ScriptedWindow::new(vec![(vec![], s), (vec![Key::Escape], s), (vec![], s)]);
    let mut o = FrameOrchestrator::new(Recording::default(), 16, 16);
    o.run(&mut window).unwrap();
    assert_eq!(window.presented, 1);
    assert_eq!(o.scene().renders, 1);
}

#[test]
fn milwaukee_runs_through_resize_and_guides() {
    let mut window = ScriptedWindow::new(vec![
        (vec![Key::G], (64, 48)),
        (vec![Key::D, Key::Up], (64, 48)),
        (vec![Key::Equal], (80, 60)),
        (vec![], (80, 60)),
    ]);
    let mut o = FrameOrchestrator::new(Milwaukee::new(Config::default()), 64, 48);
    o.run(&mut window).unwrap();
    assert_eq!(window.presented, 4);
    let screen = o.screen();
    assert_eq!((screen.width, screen.height), (80, 60));
    // Grown canvas (35x26 at origin 17,13): this pixel's ray misses everything.
    assert_eq!(screen.get(30, 27), Some(0x00FF_FFFF));
    // The sphere and the camera moved during the second frame only.
    let moved = o.scene().sphere_scene();
    let start = Config::default().initial_scene();
    assert!(moved.spheres[0].center.x > start.spheres[0].center.x);
    assert!(moved.camera.z > start.camera.z);
}
