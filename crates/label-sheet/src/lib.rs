//! Label sheet composition.
//!
//! Lays QR label images out on a fixed grid of adhesive labels and writes
//! the result as a multi-page PDF.

mod document;
pub mod geometry;
pub mod metrics;
pub mod sheet;

use std::path::PathBuf;

// Re-exports for convenience
pub use geometry::{Grid, LabelLayout, LayoutFractions, MM_TO_PT, SheetSpec, Square};
pub use metrics::StandardFont;
pub use sheet::{
    LabelContent, LabelSheet, RenderedSheet, SheetOptions, SheetSummary, asset_id_from_file_name,
};

/// Errors that can occur while building or saving a sheet.
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("invalid sheet specification: {0}")]
    InvalidSpec(String),

    #[error("failed to load image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to compress image data: {0}")]
    Compress(#[source] std::io::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("PDF file was not created or is empty: {0}")]
    EmptyOutput(PathBuf),
}
