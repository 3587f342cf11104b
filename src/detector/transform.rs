//! Detector input preprocessing

use image::imageops::FilterType;
use image::RgbImage;
use ndarray::Array4;

/// Target length of the shorter side
pub const MIN_SIZE: u32 = 800;
/// Cap on the longer side
pub const MAX_SIZE: u32 = 1333;

/// ImageNet normalization
pub const MEAN: [f32; 3] = [0.485, 0.456, 0.406];
pub const STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Output `(width, height)` when resizing the shorter side to `size`,
/// shrinking `size` so the longer side stays within `max_size`.
pub fn resized_dims(width: u32, height: u32, size: u32, max_size: Option<u32>) -> (u32, u32) {
    let (w, h) = (width as f64, height as f64);
    let mut size = size as f64;

    if let Some(max_size) = max_size {
        let (min_orig, max_orig) = (w.min(h), w.max(h));
        if max_orig / min_orig * size > max_size as f64 {
            size = (max_size as f64 * min_orig / max_orig).round_ties_even();
        }
    }

    let size_px = size as u32;
    if (width <= height && width == size_px) || (height <= width && height == size_px) {
        return (width, height);
    }

    if width < height {
        (size_px, (size * h / w) as u32)
    } else {
        ((size * w / h) as u32, size_px)
    }
}

/// Resize, scale to [0, 1] and normalize into a `[1, 3, H, W]` tensor.
pub fn preprocess(image: &RgbImage) -> Array4<f32> {
    let (width, height) = resized_dims(image.width(), image.height(), MIN_SIZE, Some(MAX_SIZE));
    tracing::debug!(
        "preprocess {}x{} -> {}x{}",
        image.width(),
        image.height(),
        width,
        height
    );

    let resized = if (width, height) == image.dimensions() {
        image.clone()
    } else {
        image::imageops::resize(image, width, height, FilterType::Triangle)
    };

    Array4::from_shape_fn(
        (1, 3, height as usize, width as usize),
        |(_, c, y, x)| {
            let v = resized.get_pixel(x as u32, y as u32)[c] as f32 / 255.0;
            (v - MEAN[c]) / STD[c]
        },
    )
}
