// Core types shared by the canvas, the frame target and the window.

use glam::{Vec3, Vec4};

/// RGBA color with float channels; 1.0 is full intensity.
/// Values above 1.0 are allowed on the canvas and saturate on upload.
pub type Color = Vec4;

/// Neutral gray the canvas is cleared to by default.
pub const DEFAULT_CLEAR: Color = Vec4::new(0.2, 0.2, 0.2, 1.0);

/// Opaque color from an RGB triple.
#[inline]
pub fn opaque(rgb: Vec3) -> Color {
    rgb.extend(1.0)
}

/// Quantize one float channel to 8 bits (clamped to [0,1]).
#[inline]
pub fn channel_to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

/// Quantize a float color to RGBA8.
#[inline]
pub fn color_to_rgba8(c: Color) -> [u8; 4] {
    [
        channel_to_u8(c.x),
        channel_to_u8(c.y),
        channel_to_u8(c.z),
        channel_to_u8(c.w),
    ]
}

/// Pack RGBA8 into the window's 0x00RRGGBB layout (alpha dropped).
#[inline]
pub fn rgba8_to_packed(t: [u8; 4]) -> u32 {
    ((t[0] as u32) << 16) | ((t[1] as u32) << 8) | t[2] as u32
}

/// What the window shows. Row 0 is the top of the window.
#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,     // how wide the window is (pixels)
    pub height: usize,    // how tall the window is (pixels)
    pub pixels: Vec<u32>, // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// Black screen of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    /// Reallocate for a new window size (contents become black).
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, 0);
    }

    /// Packed pixel at (x,y), None if outside.
    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }
}
