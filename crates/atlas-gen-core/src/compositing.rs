use image::{Rgba, RgbaImage};

use crate::model::Placement;

/// New canvas filled with `background` (transparent when `None`).
pub fn new_canvas(width: u32, height: u32, background: Option<[u8; 4]>) -> RgbaImage {
    match background {
        Some(px) => RgbaImage::from_pixel(width, height, Rgba(px)),
        None => RgbaImage::new(width, height),
    }
}

/// Blit `src` into `canvas` with its top-left at (dx, dy), clipping at the canvas edges,
/// then optionally draw a red 1px outline around the blitted area for debugging.
pub fn blit_rgba(src: &RgbaImage, canvas: &mut RgbaImage, dx: u32, dy: u32, outlines: bool) {
    let (cw, ch) = canvas.dimensions();
    let (sw, sh) = src.dimensions();

    for yy in 0..sh {
        for xx in 0..sw {
            if dx + xx < cw && dy + yy < ch {
                canvas.put_pixel(dx + xx, dy + yy, *src.get_pixel(xx, yy));
            }
        }
    }

    if outlines && sw > 0 && sh > 0 {
        let red = Rgba([255, 0, 0, 255]);
        for xx in 0..sw {
            if dx + xx < cw && dy < ch {
                canvas.put_pixel(dx + xx, dy, red);
            }
            let by = dy + sh - 1;
            if dx + xx < cw && by < ch {
                canvas.put_pixel(dx + xx, by, red);
            }
        }
        for yy in 0..sh {
            if dx < cw && dy + yy < ch {
                canvas.put_pixel(dx, dy + yy, red);
            }
            let rx = dx + sw - 1;
            if rx < cw && dy + yy < ch {
                canvas.put_pixel(rx, dy + yy, red);
            }
        }
    }
}

/// Draws every placement's image at its content position.
/// `lookup` resolves a key to the (possibly resized) source image; unknown keys are skipped.
pub fn compose<'a, K, F>(
    placements: &[Placement<K>],
    canvas: &mut RgbaImage,
    outlines: bool,
    mut lookup: F,
) where
    F: FnMut(&K) -> Option<&'a RgbaImage>,
{
    for p in placements {
        if let Some(src) = lookup(&p.key) {
            blit_rgba(src, canvas, p.x, p.y, outlines);
        }
    }
}
