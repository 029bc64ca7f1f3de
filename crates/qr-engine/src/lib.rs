//! QR label image generation.
//!
//! Encodes lookup URLs as QR symbols, rasterizes them black-on-white,
//! optionally appends a caption band, and thumbnails logo images.

pub mod caption;
pub mod font;
pub mod qr;
pub mod resize;

// Re-exports for convenience
pub use caption::append_caption;
pub use font::{CaptionFont, DEFAULT_FONT_CANDIDATES, load_caption_font};
pub use qr::{QrStyle, encode_payload, render_qr};
pub use resize::thumbnail;

/// Errors that can occur while building label images.
#[derive(Debug, thiserror::Error)]
pub enum QrError {
    #[error("QR encode error: {0}")]
    Encode(#[from] qrcode::types::QrError),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
