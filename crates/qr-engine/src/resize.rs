//! Aspect-preserving thumbnailing for logo images.
//!
//! Uses Lanczos3 filtering for high-quality downsampling.

use image::DynamicImage;
use image::imageops::FilterType;
use tracing::debug;

/// Shrink `img` to fit within `max_w` x `max_h`, preserving aspect ratio.
///
/// Images that already fit are returned unchanged; images are never
/// enlarged. Both output sides are at least 1px.
pub fn thumbnail(img: &DynamicImage, max_w: u32, max_h: u32) -> DynamicImage {
    let (orig_w, orig_h) = (img.width(), img.height());
    let (max_w, max_h) = (max_w.max(1), max_h.max(1));

    if orig_w <= max_w && orig_h <= max_h {
        debug!(orig_w, orig_h, "Image already fits, skipping resize");
        return img.clone();
    }

    let ratio = (f64::from(max_w) / f64::from(orig_w)).min(f64::from(max_h) / f64::from(orig_h));
    let new_width = ((f64::from(orig_w) * ratio).round() as u32).clamp(1, max_w);
    let new_height = ((f64::from(orig_h) * ratio).round() as u32).clamp(1, max_h);

    debug!(
        orig_w,
        orig_h, new_width, new_height, "Thumbnailing image"
    );

    img.resize_exact(new_width, new_height, FilterType::Lanczos3)
}
