//! Caption font loading with a built-in fallback.
//!
//! TrueType fonts are tried from an ordered list of system paths; if none
//! of them can be read and parsed, the 8x8 bitmap font compiled into the
//! binary is used instead. Loading therefore never fails.

use std::path::Path;

use ab_glyph::FontVec;
use tracing::{debug, info, warn};

/// System font paths tried in order for caption text.
pub const DEFAULT_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
    "arial.ttf",
];

/// Font used to draw caption text onto raster images.
pub enum CaptionFont {
    TrueType(FontVec),
    /// Built-in 8x8 bitmap glyphs.
    Builtin,
}

impl std::fmt::Debug for CaptionFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TrueType(_) => f.write_str("CaptionFont::TrueType"),
            Self::Builtin => f.write_str("CaptionFont::Builtin"),
        }
    }
}

impl CaptionFont {
    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin)
    }
}

/// Load the first usable font from `candidates`, falling back to the
/// built-in bitmap font.
pub fn load_caption_font<P: AsRef<Path>>(candidates: &[P]) -> CaptionFont {
    for path in candidates {
        let path = path.as_ref();
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                debug!(path = %path.display(), "Font not readable: {e}");
                continue;
            }
        };
        match FontVec::try_from_vec(data) {
            Ok(font) => {
                info!(path = %path.display(), "Using system font for captions");
                return CaptionFont::TrueType(font);
            }
            Err(_) => warn!(path = %path.display(), "Failed to parse font data (TTF/OTF)"),
        }
    }
    info!("No system font found, using built-in caption font");
    CaptionFont::Builtin
}
