use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

/// Dimensions after scaling `(width, height)` to exactly `target_width`.
///
/// Narrower images are enlarged. Height is rounded to the nearest pixel and
/// never drops below 1.
pub fn target_dimensions(width: u32, height: u32, target_width: u32) -> (u32, u32) {
    if width == 0 {
        return (width, height);
    }
    let scaled = (height as u64 * target_width as u64 + width as u64 / 2) / width as u64;
    (target_width, scaled.max(1) as u32)
}

/// Scale `img` to `target_width` with Lanczos3, preserving aspect ratio.
pub fn resize_to_width(img: DynamicImage, target_width: u32) -> DynamicImage {
    let (width, height) = img.dimensions();
    let (new_width, new_height) = target_dimensions(width, height, target_width);
    if (new_width, new_height) == (width, height) {
        return img;
    }

    log::debug!(
        "Resizing {}x{} -> {}x{}",
        width,
        height,
        new_width,
        new_height
    );
    img.resize_exact(new_width, new_height, FilterType::Lanczos3)
}
