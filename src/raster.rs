// Software drawing primitives: single pixels, Bresenham lines, filled squares.
// They draw into anything implementing `PixelSink`; the caller picks the sink
// (CPU canvas, frame target texels, or the window buffer).

use crate::types::{Color, FrameBuffer, color_to_rgba8, rgba8_to_packed};

/// Something pixels can be written into.
pub trait PixelSink {
    /// (width, height) in pixels.
    fn size(&self) -> (usize, usize);

    /// Write one pixel in the sink's own addressing. Out-of-range writes
    /// must be dropped silently.
    fn put_pixel(&mut self, x: i32, y: i32, color: Color);

    /// Offset that maps a centered logical coordinate to sink addressing.
    fn center_offset(&self) -> (i32, i32) {
        let (w, h) = self.size();
        ((w / 2) as i32, (h / 2) as i32)
    }
}

/// The window buffer, addressed top-down.
impl PixelSink for FrameBuffer {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    fn put_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = y * self.width + x;
        self.pixels[idx] = rgba8_to_packed(color_to_rgba8(color));
    }
}

#[inline]
fn offset_for<S: PixelSink + ?Sized>(sink: &S, center_origin: bool) -> (i64, i64) {
    let (ox, oy) = if center_origin { sink.center_offset() } else { (0, 0) };
    (i64::from(ox), i64::from(oy))
}

/// Write at a widened coordinate; anything outside `i32` cannot be on any sink.
#[inline]
fn put_wide<S: PixelSink + ?Sized>(sink: &mut S, x: i64, y: i64, color: Color) {
    if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
        sink.put_pixel(x, y, color);
    }
}

/// Step indices `k` in `0..=steps` for which `pos + step * k` lies in `0..extent`.
/// Returns `None` when no step is visible.
fn visible_steps(pos: i64, step: i64, steps: i64, extent: usize) -> Option<(i64, i64)> {
    let last_cell = i64::try_from(extent).unwrap_or(i64::MAX) - 1;
    let (lo, hi) = if step > 0 { (-pos, last_cell - pos) } else { (pos - last_cell, pos) };
    let (first, last) = (lo.max(0), hi.min(steps));
    (first <= last).then_some((first, last))
}

/// Put a pixel given in centered coordinates (0,0 = sink center).
#[inline]
pub fn draw_pixel_center_origin<S: PixelSink + ?Sized>(sink: &mut S, x: i32, y: i32, color: Color) {
    let (ox, oy) = offset_for(sink, true);
    put_wide(sink, i64::from(x) + ox, i64::from(y) + oy, color);
}

/// Draw a 1-pixel line from `start` to `end` (inclusive) using Bresenham.
/// Works in every octant. The decision variables run in `i64`, and only the
/// stretch of the major axis that crosses the sink is walked; the pixels that
/// land are the same as walking the whole line.
pub fn draw_line_bresenham<S: PixelSink + ?Sized>(
    sink: &mut S,
    start: (i32, i32),
    end: (i32, i32),
    color: Color,
    center_origin: bool,
) {
    let (ox, oy) = offset_for(sink, center_origin);
    let (mut x0, mut y0) = (i64::from(start.0) + ox, i64::from(start.1) + oy);
    let (x1, y1) = (i64::from(end.0) + ox, i64::from(end.1) + oy);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };

    // Every iteration moves exactly one step along the major axis.
    let x_major = dx >= -dy;
    let steps = dx.max(-dy);
    let (w, h) = sink.size();
    let visible = if x_major { visible_steps(x0, sx, steps, w) } else { visible_steps(y0, sy, steps, h) };
    let Some((first, last)) = visible else { return };

    // Jump to the first visible step. After `k` major steps the minor axis has
    // moved (2k * minor + major) / (2 * major) times, and the error term is
    // dx + dy + (x steps) * dy + (y steps) * dx.
    let (major, minor) = (i128::from(steps), i128::from(dx.min(-dy)));
    let k = i128::from(first);
    let m = if major == 0 { 0 } else { (2 * k * minor + major) / (2 * major) };
    let (x_steps, y_steps) = if x_major { (k, m) } else { (m, k) };
    x0 += sx * x_steps as i64;
    y0 += sy * y_steps as i64;
    let mut err = (i128::from(dx + dy) + x_steps * i128::from(dy) + y_steps * i128::from(dx)) as i64;

    for _ in first..=last {
        put_wide(sink, x0, y0, color);
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Fill the axis-aligned square of `side` pixels centered on `center`,
/// one pixel at a time. Side 0 draws nothing, side 1 only the center.
/// Only the part that overlaps the sink is walked.
pub fn draw_filled_square<S: PixelSink + ?Sized>(
    sink: &mut S,
    center: (i32, i32),
    color: Color,
    side: u32,
    center_origin: bool,
) {
    let (ox, oy) = offset_for(sink, center_origin);
    let side = i64::from(side);
    let x_start = i64::from(center.0) + ox - side / 2;
    let y_start = i64::from(center.1) + oy - side / 2;
    let (w, h) = sink.size();
    let clip = |start: i64, extent: usize| {
        let extent = i64::try_from(extent).unwrap_or(i64::MAX);
        start.max(0)..(start + side).min(extent)
    };
    for y in clip(y_start, h) {
        for x in clip(x_start, w) {
            put_wide(sink, x, y, color);
        }
    }
}
