//! Asset registry loading.
//!
//! Reads the inventory spreadsheet export (`WISE_ID`, `Shelf_QR_ID`,
//! `QR Code Printed`) into [`AssetRecord`]s and selects the rows that
//! still need a label, and resolves a scanned asset id back to its shelf
//! URL.

pub mod loader;
pub mod record;
pub mod resolve;

pub use loader::{load_records, load_records_from_reader};
pub use record::{AssetRecord, unprinted};
pub use resolve::{LOOKUP_PARAM, asset_id_from_query, find_by_asset_id, target_url};

/// Header of the primary identifier column.
pub const COL_ASSET_ID: &str = "WISE_ID";

/// Header of the secondary (shelf) identifier column.
pub const COL_SHELF_CODE: &str = "Shelf_QR_ID";

/// Header of the printed flag column.
pub const COL_PRINTED: &str = "QR Code Printed";

/// Columns that must be present in the header row.
pub const REQUIRED_COLUMNS: [&str; 3] = [COL_ASSET_ID, COL_SHELF_CODE, COL_PRINTED];

/// Errors that can occur while loading the registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("asset table not found: {0}")]
    NotFound(std::path::PathBuf),

    #[error("failed to open asset table: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse asset table: {0}")]
    Csv(#[from] csv::Error),

    #[error("asset table is missing required column '{0}'")]
    MissingColumn(&'static str),
}

pub type Result<T> = std::result::Result<T, RegistryError>;
