use image::RgbaImage;

/// Copy all of `src` into `canvas` with its top-left at (dx, dy).
///
/// Source pixels replace destination pixels (no blending). Anything falling
/// outside the canvas is dropped, so an oversized frame spills into the
/// neighbouring cells until the canvas edge.
pub fn blit_rgba(src: &RgbaImage, canvas: &mut RgbaImage, dx: u32, dy: u32) {
    let (cw, ch) = canvas.dimensions();
    let (sw, sh) = src.dimensions();
    let rw = sw.min(cw.saturating_sub(dx));
    let rh = sh.min(ch.saturating_sub(dy));

    for yy in 0..rh {
        for xx in 0..rw {
            let px = *src.get_pixel(xx, yy);
            canvas.put_pixel(dx + xx, dy + yy, px);
        }
    }
}
