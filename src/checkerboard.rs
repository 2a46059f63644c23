//! Checkerboard backgrounds for anything that shows transparency.
//!
//! Everything here works on straight RGBA8 buffers so the result can be
//! handed to the renderer as an image.

use crate::constants::{CHECKER_CELL, CHECKER_DARK, CHECKER_LIGHT};

/// Checker color at pixel `(x, y)`.
fn checker_at(x: u32, y: u32) -> [u8; 3] {
    if (x / CHECKER_CELL + y / CHECKER_CELL) % 2 == 0 {
        CHECKER_LIGHT
    } else {
        CHECKER_DARK
    }
}

/// Blend `color` with opacity `alpha` over an opaque background pixel.
pub(crate) fn over(color: [u8; 3], alpha: f64, bg: [u8; 3]) -> [u8; 3] {
    let a = alpha.clamp(0.0, 1.0);
    let mix = |c: u8, b: u8| (c as f64 * a + b as f64 * (1.0 - a) + 0.5) as u8;
    [mix(color[0], bg[0]), mix(color[1], bg[1]), mix(color[2], bg[2])]
}

/// Opaque checkerboard, `width` x `height` pixels.
pub fn rasterize_checkerboard(width: u32, height: u32) -> Vec<u8> {
    rasterize_with(width, height, |_, _, bg| bg)
}

/// The color preview: `rgba` composited over a checkerboard.
pub fn rasterize_preview(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let alpha = rgba[3] as f64 / 255.0;
    let color = [rgba[0], rgba[1], rgba[2]];
    rasterize_with(width, height, |_, _, bg| over(color, alpha, bg))
}

/// Fill a buffer pixel by pixel from the checker color underneath.
pub(crate) fn rasterize_with(
    width: u32,
    height: u32,
    mut pixel: impl FnMut(u32, u32, [u8; 3]) -> [u8; 3],
) -> Vec<u8> {
    let mut buf = vec![0u8; (width * height * 4) as usize];
    for y in 0..height {
        let row = (y * width * 4) as usize;
        for x in 0..width {
            let [r, g, b] = pixel(x, y, checker_at(x, y));
            let offset = row + (x * 4) as usize;
            buf[offset] = r;
            buf[offset + 1] = g;
            buf[offset + 2] = b;
            buf[offset + 3] = 255;
        }
    }
    buf
}
