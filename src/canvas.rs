// CPU-side pixel canvas: a dense RGBA float buffer with a movable origin.
// Row 0 is the bottom row, same as the frame target's texel rows.

use crate::raster::PixelSink;
use crate::target::FrameTarget;
use crate::types::{Color, DEFAULT_CLEAR};

pub struct PixelCanvas {
    width: usize,
    height: usize,
    origin: (i32, i32), // buffer position of logical (0,0); also the upload offset
    pixels: Vec<Color>, // row-major, len == width * height
}

impl PixelCanvas {
    /// New canvas cleared to the default gray, origin at the center.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            origin: ((width / 2) as i32, (height / 2) as i32),
            pixels: vec![DEFAULT_CLEAR; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn origin(&self) -> (i32, i32) {
        self.origin
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Color at buffer coordinate (x,y), None if outside.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    /// Write a pixel given relative to the origin.
    /// Anything that lands outside the buffer is dropped.
    #[inline]
    pub fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        let (Some(bx), Some(by)) = (x.checked_add(self.origin.0), y.checked_add(self.origin.1)) else {
            return;
        };
        if let Some(i) = self.index(bx, by) {
            self.pixels[i] = color;
        }
    }

    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    pub fn clear_default(&mut self) {
        self.clear(DEFAULT_CLEAR);
    }

    /// Reallocate to the new size; old contents are discarded and the
    /// origin moves back to the center.
    pub fn resize(&mut self, width: usize, height: usize) {
        log::debug!("canvas resize {}x{} -> {width}x{height}", self.width, self.height);
        self.width = width;
        self.height = height;
        self.pixels = vec![DEFAULT_CLEAR; width * height];
        self.recenter();
    }

    /// Only affects future draws and uploads; pixels stay where they are.
    pub fn set_origin(&mut self, x: i32, y: i32) {
        self.origin = (x, y);
    }

    pub fn recenter(&mut self) {
        self.set_origin((self.width / 2) as i32, (self.height / 2) as i32);
    }

    /// Upload the whole canvas into `target` at the origin offset.
    ///
    /// Panics if the target is smaller than the canvas or the origin lies
    /// outside the target; both mean the caller sized things wrong.
    pub fn draw_to_target(&self, target: &mut FrameTarget) {
        assert!(
            target.width() >= self.width && target.height() >= self.height,
            "canvas {}x{} does not fit frame target {}x{}",
            self.width,
            self.height,
            target.width(),
            target.height()
        );
        let (ox, oy) = self.origin;
        assert!(
            ox >= 0 && oy >= 0 && (ox as usize) < target.width() && (oy as usize) < target.height(),
            "canvas origin ({ox},{oy}) outside frame target {}x{}",
            target.width(),
            target.height()
        );
        target.upload_region(ox as usize, oy as usize, self.width, self.height, &self.pixels);
    }
}

/// Buffer addressing; the center used for centered drawing is the origin.
impl PixelSink for PixelCanvas {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    fn put_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    fn center_offset(&self) -> (i32, i32) {
        self.origin
    }
}
