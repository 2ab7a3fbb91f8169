use image::{imageops, RgbImage};
use ndarray::Array2;

fn sat01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

/// Jet ramp: dark blue at 0, through cyan, yellow, to dark red at 1.
pub fn jet(t: f64) -> [u8; 3] {
    let four_t = 4.0 * sat01(t);
    let r = sat01((four_t - 1.5).min(-four_t + 4.5));
    let g = sat01((four_t - 0.5).min(-four_t + 3.5));
    let b = sat01((four_t + 0.5).min(-four_t + 2.5));
    [to_u8(r), to_u8(g), to_u8(b)]
}

/// Reversed jet, so low velocities are red and high velocities blue.
pub fn jet_r(t: f64) -> [u8; 3] {
    jet(1.0 - sat01(t))
}

fn to_u8(c: f64) -> u8 {
    (c * 255.0).round() as u8
}

/// Position of `value` inside `[lo, hi]`, `0` for a degenerate range.
pub fn normalize(value: f64, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        sat01((value - lo) / (hi - lo))
    } else {
        0.0
    }
}

/// Colors every cell with `jet_r`, row-major.
pub fn render_model(values: &Array2<f64>, lo: f64, hi: f64) -> Vec<[u8; 3]> {
    values.iter().map(|&v| jet_r(normalize(v, lo, hi))).collect()
}

/// Longest side a display raster may have before it is shrunk.
pub const DEFAULT_MAX_TEXTURE_SIDE: usize = 8192;

/// Colored raster of `values` as it is drawn: mirrored along each reversed
/// axis and shrunk, aspect kept, so neither side exceeds `max_side`.
pub fn display_image(
    values: &Array2<f64>,
    lo: f64,
    hi: f64,
    flip_x: bool,
    flip_z: bool,
    max_side: usize,
) -> RgbImage {
    let (rows, cols) = values.dim();
    let pixels: Vec<u8> = render_model(values, lo, hi).into_iter().flatten().collect();
    let Some(mut img) = RgbImage::from_raw(cols as u32, rows as u32, pixels) else {
        return RgbImage::new(0, 0);
    };

    if flip_x {
        imageops::flip_horizontal_in_place(&mut img);
    }
    if flip_z {
        imageops::flip_vertical_in_place(&mut img);
    }

    let max_side = u32::try_from(max_side).unwrap_or(u32::MAX).max(1);
    let (width, height) = fit_within(img.width(), img.height(), max_side);
    if (width, height) == img.dimensions() {
        return img;
    }
    tracing::debug!(
        "display raster {}x{} shrunk to {}x{}",
        img.width(),
        img.height(),
        width,
        height
    );
    imageops::resize(&img, width, height, imageops::FilterType::Nearest)
}

fn fit_within(width: u32, height: u32, max_side: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_side {
        return (width, height);
    }
    let scale = max_side as f64 / longest as f64;
    let shrink = |side: u32| ((side as f64 * scale).round() as u32).clamp(1, max_side);
    (shrink(width), shrink(height))
}
