// Frame target: fixed-size RGBA8 texel storage the canvas is uploaded into,
// then blitted onto the window buffer.
// Storage is never resized in place; `resize` allocates a fresh store.

use crate::error::Error;
use crate::raster::PixelSink;
use crate::types::{Color, FrameBuffer, color_to_rgba8, rgba8_to_packed};

pub struct FrameTarget {
    width: usize,
    height: usize,
    texels: Box<[[u8; 4]]>, // row 0 = bottom row
    clear_color: Color,
}

/// Allocate `width * height` texels filled with `fill`, or report why not.
fn alloc_texels(width: usize, height: usize, fill: [u8; 4]) -> Result<Box<[[u8; 4]]>, Error> {
    if width == 0 || height == 0 {
        return Err(Error::TargetAlloc(format!("zero-sized target {width}x{height}")));
    }
    let len = width
        .checked_mul(height)
        .ok_or_else(|| Error::TargetAlloc(format!("{width}x{height} overflows")))?;
    let mut texels = Vec::new();
    texels
        .try_reserve_exact(len)
        .map_err(|e| Error::TargetAlloc(format!("{width}x{height}: {e}")))?;
    texels.resize(len, fill);
    Ok(texels.into_boxed_slice())
}

impl FrameTarget {
    pub fn new(width: usize, height: usize, clear_color: Color) -> Result<Self, Error> {
        let texels = alloc_texels(width, height, color_to_rgba8(clear_color))?;
        log::debug!("frame target created {width}x{height}");
        Ok(Self { width, height, texels, clear_color })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// RGBA8 texel at (x,y), None if outside.
    pub fn texel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.texels[y * self.width + x])
    }

    pub fn clear(&mut self) {
        self.texels.fill(color_to_rgba8(self.clear_color));
    }

    /// Replace the storage with a new allocation of the given size.
    /// Expensive: only call when the size actually changes.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), Error> {
        let texels = alloc_texels(width, height, color_to_rgba8(self.clear_color))?;
        log::debug!("frame target recreated {}x{} -> {width}x{height}", self.width, self.height);
        self.texels = texels;
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Write one texel at (x + x_offset, y + y_offset), skipping the canvas.
    /// Slow path for pixel-exact debug drawing; out of range is dropped.
    #[inline]
    pub fn draw_pixel(&mut self, x: i32, y: i32, color: Color, x_offset: i32, y_offset: i32) {
        let (Some(x), Some(y)) = (x.checked_add(x_offset), y.checked_add(y_offset)) else {
            return;
        };
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        self.texels[y * self.width + x] = color_to_rgba8(color);
    }

    /// Copy a `width x height` block of colors (row-major) into the storage
    /// with its lower-left corner at (x,y). Parts past the edge are clipped.
    pub fn upload_region(&mut self, x: usize, y: usize, width: usize, height: usize, colors: &[Color]) {
        debug_assert_eq!(colors.len(), width * height);
        if x >= self.width || y >= self.height {
            return;
        }
        let cols = width.min(self.width - x);
        let rows = height.min(self.height - y);
        for row in 0..rows {
            let src = &colors[row * width..row * width + cols];
            let dst_start = (y + row) * self.width + x;
            let dst = &mut self.texels[dst_start..dst_start + cols];
            for (d, s) in dst.iter_mut().zip(src) {
                *d = color_to_rgba8(*s);
            }
        }
    }

    /// Copy the overlapping region onto the window buffer.
    /// Target row 0 ends up on the bottom row of the screen.
    pub fn blit_to(&self, screen: &mut FrameBuffer) {
        let cols = self.width.min(screen.width);
        let rows = self.height.min(screen.height);
        for row in 0..rows {
            let src = &self.texels[row * self.width..row * self.width + cols];
            let screen_row = screen.height - 1 - row;
            let dst = &mut screen.pixels[screen_row * screen.width..screen_row * screen.width + cols];
            for (d, s) in dst.iter_mut().zip(src) {
                *d = rgba8_to_packed(*s);
            }
        }
    }
}

/// Direct texel addressing; centered drawing uses half the target size.
impl PixelSink for FrameTarget {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    fn put_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.draw_pixel(x, y, color, 0, 0);
    }
}
