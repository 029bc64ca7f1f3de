//! QR symbol encoding and rasterization.

use image::{Rgb, RgbImage};
use qrcode::{Color, EcLevel, QrCode};
use tracing::debug;

use crate::QrError;

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Symbol parameters used for every label.
///
/// The defaults (level L, 10px modules, 4-module quiet zone) are what the
/// labels are sized for; changing them changes the printed scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrStyle {
    pub error_correction: EcLevel,
    /// Side length of one module in pixels.
    pub module_px: u32,
    /// Quiet zone width in modules.
    pub border_modules: u32,
}

impl Default for QrStyle {
    fn default() -> Self {
        Self {
            error_correction: EcLevel::L,
            module_px: 10,
            border_modules: 4,
        }
    }
}

impl QrStyle {
    /// Pixel side length of the rendered image for a symbol of `modules` width.
    pub fn image_side(&self, modules: u32) -> u32 {
        (modules + 2 * self.border_modules) * self.module_px
    }
}

/// Encode `payload` using the smallest symbol version that fits.
pub fn encode_payload(payload: &str, style: &QrStyle) -> Result<QrCode, QrError> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), style.error_correction)?;
    debug!(
        modules = code.width(),
        version = ?code.version(),
        "Encoded QR payload"
    );
    Ok(code)
}

/// Rasterize a QR symbol to a black-on-white RGB image.
///
/// Every module maps to an exact `module_px` square, so the output has no
/// intermediate gray values.
pub fn render_qr(code: &QrCode, style: &QrStyle) -> RgbImage {
    let module_count = code.width() as u32;
    let scale = style.module_px.max(1);
    let offset = style.border_modules * scale;
    let img_size = style.image_side(module_count).max(1);

    let mut img = RgbImage::from_pixel(img_size, img_size, WHITE);

    for (i, color) in code.to_colors().iter().enumerate() {
        if *color != Color::Dark {
            continue;
        }
        let x = (i as u32) % module_count;
        let y = (i as u32) / module_count;
        for dy in 0..scale {
            for dx in 0..scale {
                img.put_pixel(offset + x * scale + dx, offset + y * scale + dy, BLACK);
            }
        }
    }

    img
}
