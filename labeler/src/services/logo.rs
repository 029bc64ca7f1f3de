//! Logo normalization into a temporary working copy.

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, ImageReader};
use qr_engine::thumbnail;
use tracing::{info, warn};

/// File name of the normalized logo, placed next to the output document.
pub const TEMP_LOGO_NAME: &str = "temp_logo_optimized.png";

/// Used instead of [`TEMP_LOGO_NAME`] when the configured logo is that file.
pub const ALT_TEMP_LOGO_NAME: &str = "temp_logo_optimized_copy.png";

/// A normalized logo file that is deleted when dropped.
#[derive(Debug)]
pub struct TempLogo {
    path: PathBuf,
}

impl TempLogo {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempLogo {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => info!("Cleaned up temporary file: {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Could not remove temporary file {}: {e}", self.path.display()),
        }
    }
}

/// Normalize the logo at `source` into `work_dir`, or return `None`.
///
/// A missing or unreadable logo is only a warning; labels are then drawn
/// without one.
pub fn prepare_logo(source: &Path, work_dir: &Path, max_px: u32) -> Option<TempLogo> {
    if !source.is_file() {
        warn!("Logo file {} not found. Proceeding without logo.", source.display());
        return None;
    }
    info!("Using logo file: {}", source.display());

    let mut target = work_dir.join(TEMP_LOGO_NAME);
    if same_file(source, &target) {
        warn!(
            "Logo file {} has the temporary logo's name; writing the optimized copy to {}",
            source.display(),
            ALT_TEMP_LOGO_NAME
        );
        target = work_dir.join(ALT_TEMP_LOGO_NAME);
    }

    match normalize_logo(source, &target, max_px) {
        Ok(logo) => {
            info!("Created optimized logo: {}", logo.path.display());
            Some(logo)
        }
        Err(e) => {
            warn!("Could not process logo file - {e}");
            None
        }
    }
}

/// Whether both paths name one existing file.
fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Thumbnail to `max_px` square, convert to RGB, and save as PNG.
fn normalize_logo(source: &Path, target: &Path, max_px: u32) -> Result<TempLogo, image::ImageError> {
    let img = ImageReader::open(source)?.with_guessed_format()?.decode()?;
    let rgb = DynamicImage::ImageRgb8(thumbnail(&img, max_px, max_px).to_rgb8());

    // Owns the target from here so a failed write leaves nothing behind.
    let logo = TempLogo {
        path: target.to_path_buf(),
    };
    rgb.save_with_format(&logo.path, ImageFormat::Png)?;
    Ok(logo)
}
