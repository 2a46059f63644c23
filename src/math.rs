//! HSV and RGB conversions.
//!
//! Hue is in degrees (0–360), saturation and value in percent (0–100),
//! RGB channels in 0–255. RGB results are left unrounded; rounding happens
//! only when a color is rendered to text.

/// RGB → HSV.
///
/// Returns `None` for the hue of an achromatic color (all channels equal),
/// where hue is mathematically undefined.
pub fn rgb_to_hsv(r: f64, g: f64, b: f64) -> (Option<f64>, f64, f64) {
    let r = r / 255.0;
    let g = g / 255.0;
    let b = b / 255.0;
    let n = r.min(g).min(b);
    let v = r.max(g).max(b);
    let m = v - n;
    if m == 0.0 {
        return (None, 0.0, 100.0 * v);
    }
    // Sector offset is chosen by whichever channel is the minimum.
    let h = if r == n {
        3.0 + (b - g) / m
    } else if g == n {
        5.0 + (r - b) / m
    } else {
        1.0 + (g - r) / m
    };
    let h = if h == 6.0 { 0.0 } else { h };
    (Some(60.0 * h), 100.0 * (m / v), 100.0 * v)
}

/// HSV → RGB.
///
/// An undefined hue yields the achromatic triple `(u, u, u)` with
/// `u = 255 * v / 100`, regardless of saturation.
pub fn hsv_to_rgb(h: Option<f64>, s: f64, v: f64) -> (f64, f64, f64) {
    let u = 255.0 * (v / 100.0);
    let Some(h) = h else {
        return (u, u, u);
    };

    let h = h / 60.0;
    let s = s / 100.0;
    let i = h.floor();
    let f = if i as i64 % 2 != 0 { h - i } else { 1.0 - (h - i) };
    let m = u * (1.0 - s);
    let n = u * (1.0 - s * f);
    match i as i64 {
        1 => (n, u, m),
        2 => (m, u, n),
        3 => (m, n, u),
        4 => (n, m, u),
        5 => (u, m, n),
        // sector 6 (h == 360) wraps onto sector 0
        _ => (u, n, m),
    }
}

/// Perceived brightness on the 0–255 scale.
pub fn luma(r: f64, g: f64, b: f64) -> f64 {
    0.213 * r + 0.715 * g + 0.072 * b
}
