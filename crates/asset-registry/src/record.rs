//! Asset record model.

/// One inventory row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    /// Primary identifier, e.g. `WISE-01`. Used verbatim in the lookup URL.
    pub asset_id: String,
    /// Secondary identifier; only used to keep image filenames unique.
    pub shelf_code: String,
    /// Whether a label has already been printed for this asset.
    pub printed: bool,
}

impl AssetRecord {
    pub fn new(asset_id: impl Into<String>, shelf_code: impl Into<String>, printed: bool) -> Self {
        Self {
            asset_id: asset_id.into(),
            shelf_code: shelf_code.into(),
            printed,
        }
    }

    /// Image filename for this record: `<asset_id>_<shelf_code>.png`.
    pub fn image_file_name(&self) -> String {
        format!("{}_{}.png", self.asset_id, self.shelf_code)
    }
}

/// Select the records whose printed flag is `false`, keeping input order.
pub fn unprinted(records: &[AssetRecord]) -> Vec<&AssetRecord> {
    records.iter().filter(|r| !r.printed).collect()
}
