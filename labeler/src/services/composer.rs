//! Sheet composer: generated QR images to a printable label sheet.

use std::path::{Path, PathBuf};

use label_sheet::{LabelContent, LabelSheet, SheetError, SheetSummary};
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::services::logo::prepare_logo;

#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("{0} directory not found")]
    MissingInput(PathBuf),

    #[error("failed to read {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    InvalidSheet(SheetError),

    #[error("error saving PDF: {0}")]
    OutputWrite(SheetError),
}

/// Result of a composer run that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeReport {
    /// The image directory holds no PNG files; no document was written.
    NothingToDo,
    Written(SheetSummary),
}

/// PNG files in `dir`, sorted by file name.
pub fn find_label_images(dir: &Path) -> Result<Vec<PathBuf>, ComposeError> {
    let entries = std::fs::read_dir(dir).map_err(|source| ComposeError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut images: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.path()),
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {e}", dir.display());
                None
            }
        })
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "png"))
        .collect();
    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(images)
}

/// Lay every image in the configured directory out on label sheets and
/// write one PDF.
///
/// The output file is left untouched unless there is something to write.
pub fn run(config: &AppConfig) -> Result<ComposeReport, ComposeError> {
    let image_dir = &config.image_dir;
    if !image_dir.is_dir() {
        error!(
            "{} directory not found. Please run gen-qr-codes first.",
            image_dir.display()
        );
        return Err(ComposeError::MissingInput(image_dir.clone()));
    }

    let images = find_label_images(image_dir)?;
    if images.is_empty() {
        warn!("No PNG files found in {} directory.", image_dir.display());
        return Ok(ComposeReport::NothingToDo);
    }
    info!(
        "Found {} QR code files in {} directory",
        images.len(),
        image_dir.display()
    );

    let mut sheet = LabelSheet::new(config.sheet_options()).map_err(|e| {
        error!("{e}");
        ComposeError::InvalidSheet(e)
    })?;

    let spec = &config.sheet;
    let grid = sheet.grid();
    info!("Label configuration:");
    info!(
        "  - Label size: {:.1}mm x {:.1}mm",
        spec.label_width_mm, spec.label_height_mm
    );
    info!(
        "  - Page size: {:.1}mm x {:.1}mm",
        spec.page_width_mm, spec.page_height_mm
    );
    info!(
        "  - Grid: {} columns x {} rows = {} labels per page",
        grid.columns,
        grid.rows,
        grid.per_page()
    );

    // Held until the document is written; removed on every exit path.
    let logo = prepare_logo(&config.logo_path, config.work_dir(), config.logo_max_px);
    if let Some(logo) = &logo {
        sheet = sheet.with_logo(logo.path());
    }

    info!("Extracting WISE IDs from QR code filenames...");
    for path in images {
        sheet.add_label(LabelContent::from_image_path(path));
    }

    info!("Saving PDF...");
    let summary = sheet.save(&config.output_pdf).map_err(|e| {
        error!("Error saving PDF: {e}");
        ComposeError::OutputWrite(e)
    })?;
    drop(logo);

    if summary.degraded > 0 {
        warn!(
            "{} label(s) could not use their QR image and show the ID only",
            summary.degraded
        );
    }
    info!("Generated PDF: {}", summary.path.display());
    info!(
        "Total labels: {} on {} page(s)",
        summary.labels, summary.pages
    );
    info!(
        "Label specifications: {} columns x {} rows per page",
        grid.columns, grid.rows
    );
    Ok(ComposeReport::Written(summary))
}
