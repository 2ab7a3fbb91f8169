use image::{imageops::FilterType, GrayImage};
use ndarray::Array2;

/// Resamples a grayscale image onto an `nx` by `nz` grid with bicubic
/// (Catmull-Rom) interpolation.
///
/// # Arguments
/// * `img` - The source intensities.
/// * `nx` - Number of output columns.
/// * `nz` - Number of output rows.
///
/// # Returns
/// A `GrayImage` of exactly `nx x nz` pixels. Values overshooting the 8-bit
/// range are saturated.
pub fn resize_bicubic(img: &GrayImage, nx: u32, nz: u32) -> GrayImage {
    if img.dimensions() == (nx, nz) {
        return img.clone();
    }
    image::imageops::resize(img, nx, nz, FilterType::CatmullRom)
}

/// Copies a grayscale image into a `(height, width)` float array.
pub fn gray_to_array(img: &GrayImage) -> Array2<f64> {
    let (width, height) = img.dimensions();
    Array2::from_shape_fn((height as usize, width as usize), |(row, col)| {
        img.get_pixel(col as u32, row as u32)[0] as f64
    })
}

/// Min-max normalizes `intensity` into `[vmin, vmax]`.
///
/// A constant array (including an empty one) carries no contrast to stretch,
/// so every cell is set to `vmin`.
pub fn remap_to_range(intensity: &Array2<f64>, vmin: f64, vmax: f64) -> Array2<f64> {
    let (lo, hi) = intensity
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    if intensity.is_empty() || lo == hi {
        return Array2::from_elem(intensity.raw_dim(), vmin);
    }

    let span = hi - lo;
    intensity.mapv(|v| vmin + (vmax - vmin) * (v - lo) / span)
}
