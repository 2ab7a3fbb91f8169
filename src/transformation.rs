use std::path::Path;

use image::{DynamicImage, GenericImageView, GrayImage, Luma};

use crate::error::{ModelError, Result};

/// Opens a raster file and converts it straight to grayscale intensities.
pub fn load_grayscale(path: &Path) -> Result<GrayImage> {
    let img = image::open(path).map_err(|source| ModelError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(
        "loaded {} ({}x{})",
        path.display(),
        img.width(),
        img.height()
    );
    Ok(to_grayscale(&img))
}

/// Converts an image to 8-bit grayscale.
///
/// Uses the perceptually weighted luminance `0.299 R + 0.587 G + 0.114 B`,
/// rounded to the nearest integer. Alpha is ignored, so a transparent pixel
/// keeps the intensity of its color channels.
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut gray = GrayImage::new(width, height);

    for (x, y, pixel) in img.pixels() {
        let r = pixel[0] as f32;
        let g = pixel[1] as f32;
        let b = pixel[2] as f32;

        let luma = 0.299 * r + 0.587 * g + 0.114 * b;
        gray.put_pixel(x, y, Luma([luma.round().clamp(0.0, 255.0) as u8]));
    }

    gray
}

/// Smallest and largest intensity in the image, `(0, 0)` when it has no pixels.
pub fn intensity_range(img: &GrayImage) -> (u8, u8) {
    let mut pixels = img.pixels().map(|p| p[0]);
    let Some(first) = pixels.next() else {
        return (0, 0);
    };

    pixels.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)))
}
