// Window + HUD text.
// 1) A minifb window that shows the screen buffer and reports input.
// 2) A tiny 5x7 bitmap font for the stats panel drawn over the image.

use crate::error::Error;
use crate::orchestrator::{Input, Key, Platform};
use crate::raster::PixelSink;
use crate::types::{Color, FrameBuffer};
use minifb::{MouseMode, Window, WindowOptions};

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create a resizable window. Visual: a new empty window appears.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let options = WindowOptions { resize: true, ..WindowOptions::default() };
        let mut window =
            Window::new(title, width, height, options).map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(60);
        Ok(Self { window })
    }
}

fn to_minifb(key: Key) -> minifb::Key {
    match key {
        Key::W => minifb::Key::W,
        Key::A => minifb::Key::A,
        Key::S => minifb::Key::S,
        Key::D => minifb::Key::D,
        Key::Q => minifb::Key::Q,
        Key::E => minifb::Key::E,
        Key::Up => minifb::Key::Up,
        Key::Down => minifb::Key::Down,
        Key::Left => minifb::Key::Left,
        Key::Right => minifb::Key::Right,
        Key::PageUp => minifb::Key::PageUp,
        Key::PageDown => minifb::Key::PageDown,
        Key::Space => minifb::Key::Space,
        Key::Equal => minifb::Key::Equal,
        Key::Minus => minifb::Key::Minus,
        Key::C => minifb::Key::C,
        Key::G => minifb::Key::G,
        Key::P => minifb::Key::P,
        Key::Escape => minifb::Key::Escape,
    }
}

impl Input for Drawer {
    fn is_key_down(&self, key: Key) -> bool {
        self.window.is_key_down(to_minifb(key))
    }

    fn is_key_released(&self, key: Key) -> bool {
        self.window.is_key_released(to_minifb(key))
    }

    fn mouse_pos(&self) -> Option<(f32, f32)> {
        self.window.get_mouse_pos(MouseMode::Discard)
    }
}

impl Platform for Drawer {
    /// Returns false when the user closes the window (so we can stop the loop).
    fn is_open(&self) -> bool {
        self.window.is_open()
    }

    fn size(&self) -> (usize, usize) {
        self.window.get_size()
    }

    /// Push the pixels for this frame to the screen (also polls input).
    fn present(&mut self, screen: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&screen.pixels, screen.width, screen.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))
    }
}

/* ---------- 5x7 bitmap font (digits, uppercase, a little punctuation) ---------- */

/// Return a 5x7 glyph bitmap. Each u8 is a row; the low 5 bits are the
/// pixels (bit 4 = leftmost). Lowercase letters use the uppercase glyph.
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        ',' => g!(0b00000,0b00000,0b00000,0b00000,0b00100,0b00100,0b01000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '(' => g!(0b00010,0b00100,0b01000,0b01000,0b01000,0b00100,0b00010),
        ')' => g!(0b01000,0b00100,0b00010,0b00010,0b00010,0b00100,0b01000),

        _ => None,
    }
}

/// Pixel width of `text` when drawn with `draw_text_5x7`.
pub fn text_width_5x7(text: &str) -> usize {
    text.chars().count() * 6
}

/// Draw a single 5x7 character at (x,y), y growing downward.
/// Visual: a tiny glyph with a 1-pixel black shadow for contrast.
fn draw_char_5x7<S: PixelSink + ?Sized>(sink: &mut S, x: i32, y: i32, ch: char, color: Color) {
    let Some(rows) = glyph5x7(ch) else { return };
    let shadow = Color::new(0.0, 0.0, 0.0, 1.0);
    for (dx, dy, c) in [(1, 1, shadow), (0, 0, color)] {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    sink.put_pixel(x + rx + dx, y + ry as i32 + dy, c);
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs (5 pixels + 1 pixel spacing each).
pub fn draw_text_5x7<S: PixelSink + ?Sized>(sink: &mut S, mut x: i32, y: i32, text: &str, color: Color) {
    for ch in text.chars() {
        draw_char_5x7(sink, x, y, ch, color);
        x += 6;
    }
}
