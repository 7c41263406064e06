// Save what the canvas holds to an image file (PNG by extension).
// Canvas row 0 is the bottom, image row 0 is the top, so rows are flipped.

use std::path::Path;

use image::{Rgba, RgbaImage};

use crate::canvas::PixelCanvas;
use crate::error::Error;
use crate::types::color_to_rgba8;

/// Convert the canvas into an 8-bit RGBA image, top row first.
pub fn canvas_to_image(canvas: &PixelCanvas) -> RgbaImage {
    let (w, h) = (canvas.width() as u32, canvas.height() as u32);
    let pixels = canvas.pixels();
    RgbaImage::from_fn(w, h, |x, y| {
        let row = (h - 1 - y) as usize;
        Rgba(color_to_rgba8(pixels[row * w as usize + x as usize]))
    })
}

/// Write the canvas to `path`; the format follows the file extension.
pub fn save_canvas(canvas: &PixelCanvas, path: &Path) -> Result<(), Error> {
    canvas_to_image(canvas)
        .save(path)
        .map_err(|e| Error::Snapshot(format!("{}: {e}", path.display())))?;
    log::info!("snapshot written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn image_is_flipped_top_to_bottom() {
        let mut c = PixelCanvas::new(3, 2);
        c.set_origin(0, 0);
        c.draw_pixel(2, 0, Vec4::new(1.0, 0.0, 0.0, 1.0));
        let img = canvas_to_image(&c);
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(2, 1), &Rgba([255, 0, 0, 255]));
        assert_eq!(img.get_pixel(2, 0), &Rgba([51, 51, 51, 255]));
    }

    #[test]
    fn unknown_extension_is_a_snapshot_error() {
        let c = PixelCanvas::new(2, 2);
        let path = std::env::temp_dir().join("milwaukee-snapshot.not-an-image-format");
        assert!(matches!(save_canvas(&c, &path), Err(Error::Snapshot(_))));
    }
}
