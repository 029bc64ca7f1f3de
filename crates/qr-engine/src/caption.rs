//! Caption band rendering below a QR image.

use ab_glyph::{Font, PxScale, ScaleFont};
use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::{Rgb, RgbImage, imageops};
use imageproc::drawing::draw_text_mut;

use crate::font::CaptionFont;

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Pixel size of one built-in glyph cell before scaling.
const BUILTIN_CELL: u32 = 8;

/// Measure the pixel width of a string at the given font and scale.
fn measure_text_width<F: Font>(font: &F, scale: PxScale, text: &str) -> u32 {
    let scaled = font.as_scaled(scale);
    let mut width = 0.0f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for ch in text.chars() {
        let glyph_id = scaled.glyph_id(ch);
        if let Some(prev) = prev_glyph {
            width += scaled.kern(prev, glyph_id);
        }
        width += scaled.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    width.ceil() as u32
}

fn builtin_scale(size_px: f32) -> u32 {
    ((size_px / BUILTIN_CELL as f32).round() as u32).max(1)
}

/// Rendered `(width, height)` of `text` in pixels.
pub fn text_extent(font: &CaptionFont, size_px: f32, text: &str) -> (u32, u32) {
    match font {
        CaptionFont::TrueType(f) => {
            let scale = PxScale::from(size_px);
            let scaled = f.as_scaled(scale);
            let height = (scaled.ascent() - scaled.descent()).ceil() as u32;
            (measure_text_width(f, scale, text), height)
        }
        CaptionFont::Builtin => {
            let cell = BUILTIN_CELL * builtin_scale(size_px);
            (cell * text.chars().count() as u32, cell)
        }
    }
}

/// Draw `text` in black with its top-left corner at `(x, y)`.
pub fn draw_text(img: &mut RgbImage, font: &CaptionFont, size_px: f32, x: i32, y: i32, text: &str) {
    match font {
        CaptionFont::TrueType(f) => {
            draw_text_mut(img, BLACK, x, y, PxScale::from(size_px), f, text);
        }
        CaptionFont::Builtin => draw_builtin_text(img, builtin_scale(size_px), x, y, text),
    }
}

fn draw_builtin_text(img: &mut RgbImage, scale: u32, x: i32, y: i32, text: &str) {
    let (w, h) = (img.width() as i64, img.height() as i64);
    let advance = (BUILTIN_CELL * scale) as i64;

    for (i, ch) in text.chars().enumerate() {
        let Some(glyph) = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?')) else {
            continue;
        };
        let origin_x = x as i64 + i as i64 * advance;
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..BUILTIN_CELL {
                if *bits & (1u8 << col) == 0 {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        let px = origin_x + (col * scale + dx) as i64;
                        let py = y as i64 + (row as u32 * scale + dy) as i64;
                        if (0..w).contains(&px) && (0..h).contains(&py) {
                            img.put_pixel(px as u32, py as u32, BLACK);
                        }
                    }
                }
            }
        }
    }
}

/// Append a white band below `qr` containing `text` centered horizontally.
///
/// The band is as tall as the rendered text plus `padding_px`, with the
/// padding split evenly above and below the text.
pub fn append_caption(
    qr: &RgbImage,
    text: &str,
    font: &CaptionFont,
    size_px: f32,
    padding_px: u32,
) -> RgbImage {
    let (text_w, text_h) = text_extent(font, size_px, text);
    let width = qr.width();
    let height = qr.height() + text_h + padding_px;

    let mut out = RgbImage::from_pixel(width, height, WHITE);
    imageops::replace(&mut out, qr, 0, 0);

    let x = ((width as i64 - text_w as i64).max(0) / 2) as i32;
    let y = (qr.height() + padding_px / 2) as i32;
    draw_text(&mut out, font, size_px, x, y, text);

    out
}
